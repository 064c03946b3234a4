//! HTTP inbound adapter exposing the JSON API.

pub mod defects;
pub mod dto;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler and the JSON error mapping for
/// extractor rejections.
///
/// Callers mount this inside `web::scope("/api/v1")` wrapped with a session
/// middleware.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    error::extractor_config(cfg);
    cfg.service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::list_engineers)
        .service(defects::list_defects)
        .service(defects::create_defect)
        .service(defects::get_defect)
        .service(defects::update_status)
        .service(defects::stats);
}

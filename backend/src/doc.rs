//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! response DTOs, and the domain error wrappers. The document backs Swagger UI
//! in debug builds and is exported by `cargo run --bin openapi-dump`.

use crate::inbound::http::defects::{CreateDefectRequest, UpdateStatusRequest};
use crate::inbound::http::dto::{
    DefectResponse, PriorityCountResponse, StatsResponse, StatusCountResponse, UserResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the defect tracker API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Defect tracker API",
        description = "Role-based defect tracking for engineers, managers, and leaders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_engineers,
        crate::inbound::http::defects::list_defects,
        crate::inbound::http::defects::create_defect,
        crate::inbound::http::defects::get_defect,
        crate::inbound::http::defects::update_status,
        crate::inbound::http::defects::stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LoginRequest,
        UserResponse,
        CreateDefectRequest,
        UpdateStatusRequest,
        DefectResponse,
        StatsResponse,
        StatusCountResponse,
        PriorityCountResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "Current user and engineer directory"),
        (name = "defects", description = "Filing defects and moving them through the workflow"),
        (name = "stats", description = "Aggregate counts for leaders"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

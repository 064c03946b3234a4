//! Defect tracker entry-point: loads settings, prepares storage, provisions
//! the bootstrap roster, and serves the JSON API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use defect_tracker::bootstrap::{BootstrapSettings, bootstrap_users};
use defect_tracker::inbound::http::health::HealthState;
use defect_tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use defect_tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, build_services, create_server};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let bootstrap = BootstrapSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
    );
    match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url).await.map_err(io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections))
                .await
                .map_err(io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("DEFECTS_DATABASE_URL not set; using the in-memory store"),
    }

    let services = build_services(&config);
    bootstrap_users(&bootstrap, services.provisioning.as_ref())
        .await
        .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, services.http)?;
    health_state.mark_ready();
    info!("defect tracker listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}

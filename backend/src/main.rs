//! Daybook server entry-point: loads settings, prepares storage, and serves
//! the REST API.

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use daybook::inbound::http::health::HealthState;
use daybook::inbound::http::session_config::{BuildMode, session_settings};
use daybook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, build_http_state, create_server};

fn init_tracing() {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }
}

/// Apply migrations, then open the pool used by the repositories.
async fn prepare_database(config: PoolConfig) -> io::Result<DbPool> {
    let applied = run_pending_migrations(config.database_url())
        .await
        .map_err(io::Error::other)?;
    info!(applied, "database migrations up to date");
    DbPool::new(config)
        .await
        .map_err(|error| io::Error::other(error.into_message()))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("daybook")
        .endpoint("/metrics")
        .build()
        .map_err(|error| io::Error::other(format!("configure Prometheus metrics: {error}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|error| io::Error::other(format!("failed to load settings: {error}")))?;
    let session = session_settings(settings.session_toggles(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let bootstrap = settings.bootstrap_admin().map_err(io::Error::other)?;

    let pool = match settings.pool_config() {
        Some(config) => Some(prepare_database(config).await?),
        None => None,
    };
    let http_state = build_http_state(pool, bootstrap)
        .await
        .map_err(io::Error::other)?;

    #[cfg(feature = "metrics")]
    let config = ServerConfig::new(session, bind_addr, make_metrics()?);
    #[cfg(not(feature = "metrics"))]
    let config = ServerConfig::new(session, bind_addr);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "daybook listening");
    server.await
}

//! Backend entry-point: loads settings, wires storage, and serves the API.

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lejio::inbound::http::health::HealthState;
use lejio::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use lejio::server::{Repositories, ServerConfig, create_server};
use lejio::settings::{LejioSettings, StorageMode};

async fn build_repositories(settings: &LejioSettings) -> Result<Repositories> {
    let mode = settings.storage()?;
    info!(storage = %mode, "configuring storage");
    match mode {
        StorageMode::Memory => Ok(Repositories::in_memory()),
        StorageMode::File => {
            let data_dir = settings.data_dir();
            Repositories::json_files(&data_dir)
                .wrap_err_with(|| format!("open data directory {}", data_dir.display()))
        }
        StorageMode::Postgres => {
            let database_url = settings.database_url()?;
            run_migrations(database_url)
                .await
                .wrap_err("apply database migrations")?;
            let pool_config =
                PoolConfig::new(database_url).with_max_connections(settings.db_pool_size());
            let pool = DbPool::connect(pool_config)
                .await
                .wrap_err("build database pool")?;
            Ok(Repositories::postgres(&pool))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = LejioSettings::load().map_err(|err| eyre!("load settings: {err}"))?;
    let repositories = build_repositories(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr()?, repositories)
        .with_root_domain(settings.root_domain())
        .with_trial_days(settings.trial_days())
        .with_token_secret(settings.token_secret())
        .with_token_ttl(settings.token_ttl());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

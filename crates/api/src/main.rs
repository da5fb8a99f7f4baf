use anyhow::Result;
use domain::ports::{InMemoryInvitationRepository, InvitationRepository};
use persistence::repositories::PgInvitationRepository;
use std::sync::Arc;
use tracing::{info, warn};

use referrals_api::app;
use referrals_api::config::{Config, StorageBackend};
use referrals_api::middleware;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting referrals API v{}", env!("CARGO_PKG_VERSION"));

    let repository: Arc<dyn InvitationRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config: persistence::db::DatabaseConfig = (&config.database).into();
            let pool = persistence::db::create_pool(&db_config).await?;
            persistence::db::run_migrations(&pool).await?;
            Arc::new(PgInvitationRepository::new(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory invitation store; invitations are lost on restart");
            Arc::new(InMemoryInvitationRepository::new())
        }
    };

    let addr = config.socket_addr()?;
    let app = app::create_app(config, repository);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

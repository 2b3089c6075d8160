use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use eventsync::bus::{Broadcaster, SessionRegistry};
use eventsync::config::AppConfig;
use eventsync::db::{seed, Database};
use eventsync::server::{build_router, AppState};
use eventsync::service::SyncService;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eventsync=info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();

    let db = Arc::new(Database::open(&config.db_path)?);
    seed::seed_initial_users(&db)?;

    let registry = Arc::new(SessionRegistry::new());
    let broadcaster = Arc::new(Broadcaster::new(registry.clone()));
    let service = Arc::new(SyncService::new(db, broadcaster));

    let app = build_router(AppState { service, registry });

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

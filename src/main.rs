use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use consistency_api::config::Config;
use consistency_api::db::{self, MemoryStore, PgStore, Store};
use consistency_api::services::judge::CodeforcesClient;
use consistency_api::services::rollover::spawn_rollover_worker;
use consistency_api::services::tracker::Tracker;
use consistency_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "consistency_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Storage
    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .context("Failed to create database pool")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let judge = Arc::new(CodeforcesClient::new(&config).context("Failed to build HTTP client")?);
    let tracker = Tracker::new(store, judge, config.clone());

    // Create today's log at startup and after each midnight
    spawn_rollover_worker(
        tracker.clone(),
        Duration::from_secs(config.rollover_check_secs.max(1)),
    );

    let state = AppState::new(tracker, config.clone());
    let app = app(state);

    let addr = config.listen_addr();
    tracing::info!(utc_offset = %config.utc_offset, "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

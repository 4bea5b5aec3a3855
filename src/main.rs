use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beer_catalog::{blob::FileSystemBlobStore, build_app, config::AppConfig, database::Database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);
    info!("Configuration loaded for {} environment", config.environment);

    // Initialize database
    let db = Arc::new(Database::new(&config.database_url).await?);
    info!("Database initialized successfully");

    // Run migrations
    db.migrate().await?;
    info!("Database migrations completed");

    let blobs = Arc::new(FileSystemBlobStore::new(&config.uploads_dir));
    let app = build_app(config.clone(), db, blobs)?;
    let consumer = app.spawn_event_consumer();

    app.health_check().await?;
    info!("Beer catalog is ready, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    consumer.abort();

    Ok(())
}

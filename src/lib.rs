use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub mod audit;
pub mod beers;
pub mod behaviors;
pub mod blob;
pub mod breweries;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod filtering;
pub mod images;
pub mod mediator;
pub mod opinions;
pub mod store;
pub mod styles;
pub mod users;
pub mod validation;

pub use config::AppConfig;
pub use database::Database;
pub use error::AppError;
pub use mediator::{Mediator, RequestContext};

use audit::AuditEntry;
use beers::Beer;
use behaviors::{
    AuditBehavior, AuthorizationBehavior, LoggingBehavior, PerformanceBehavior,
    UnhandledErrorBehavior, ValidationBehavior, ValidatorRegistry,
};
use blob::BlobStore;
use breweries::Brewery;
use events::{EventConsumer, EventPublisher, InProcessEventBus};
use images::Image;
use opinions::Opinion;
use store::{Repository, SqliteRepository};
use styles::BeerStyle;
use users::User;

/// One repository per entity, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub beers: Arc<dyn Repository<Beer>>,
    pub breweries: Arc<dyn Repository<Brewery>>,
    pub styles: Arc<dyn Repository<BeerStyle>>,
    pub users: Arc<dyn Repository<User>>,
    pub opinions: Arc<dyn Repository<Opinion>>,
    pub images: Arc<dyn Repository<Image>>,
    pub audit: Arc<dyn Repository<AuditEntry>>,
}

impl Repositories {
    pub fn sqlite(db: &Arc<Database>) -> Self {
        Self {
            beers: Arc::new(SqliteRepository::new(db.clone())),
            breweries: Arc::new(SqliteRepository::new(db.clone())),
            styles: Arc::new(SqliteRepository::new(db.clone())),
            users: Arc::new(SqliteRepository::new(db.clone())),
            opinions: Arc::new(SqliteRepository::new(db.clone())),
            images: Arc::new(SqliteRepository::new(db.clone())),
            audit: Arc::new(SqliteRepository::new(db.clone())),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<AppConfig>,
    pub mediator: Arc<Mediator>,
    pub events: Arc<InProcessEventBus>,
    pub repositories: Repositories,
}

impl AppState {
    pub fn event_consumer(&self) -> EventConsumer {
        EventConsumer::new(self.mediator.clone())
    }

    /// Starts reacting to domain events in the background.
    pub fn spawn_event_consumer(&self) -> JoinHandle<()> {
        self.event_consumer().spawn(self.events.subscribe())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await.inspect_err(|e| {
            warn!("Health check failed: {}", e);
        })
    }
}

/// Wires the mediator: pipeline behaviors in order, then every service.
pub fn build_app(
    config: Arc<AppConfig>,
    db: Arc<Database>,
    blobs: Arc<dyn BlobStore>,
) -> Result<AppState, AppError> {
    let repositories = Repositories::sqlite(&db);
    let events = Arc::new(InProcessEventBus::new(config.event_bus_capacity));
    let publisher: Arc<dyn EventPublisher> = events.clone();
    let validators = Arc::new(ValidatorRegistry::new());

    let mediator = Mediator::new()
        .with_behavior(UnhandledErrorBehavior)
        .with_behavior(LoggingBehavior)
        .with_behavior(PerformanceBehavior::new(Duration::from_millis(
            config.slow_request_threshold_ms,
        )))
        .with_behavior(AuthorizationBehavior)
        .with_behavior(AuditBehavior::new(repositories.audit.clone()))
        .with_behavior(ValidationBehavior::new(validators.clone()));

    styles::register(&mediator, &validators, &repositories)?;
    breweries::register(&mediator, &validators, &repositories, publisher.clone())?;
    beers::register(&mediator, &validators, &repositories, publisher.clone())?;
    users::register(&mediator, &validators, &repositories, publisher.clone())?;
    opinions::register(&mediator, &validators, &repositories, publisher.clone())?;
    images::register(
        &mediator,
        &validators,
        &repositories,
        blobs,
        publisher,
        config.max_image_bytes,
    )?;
    audit::register(&mediator, &validators, repositories.audit.clone())?;

    info!(
        "Registered {} request handlers",
        mediator.registered_requests().len()
    );

    Ok(AppState {
        db,
        config,
        mediator: Arc::new(mediator),
        events,
        repositories,
    })
}

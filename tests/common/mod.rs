use beer_catalog::{
    blob::{BlobStore, FileSystemBlobStore},
    breweries::{Address, BreweryDto, BreweryInput, CreateBrewery},
    build_app,
    config::AppConfig,
    database::Database,
    events::DomainEvent,
    mediator::Role,
    users::{CreateUser, UserDto},
    AppState, RequestContext,
};
use std::sync::Arc;
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

/// Creates a test app state with a unique temporary database and uploads directory
pub async fn create_test_app_state() -> AppState {
    create_test_app_state_with(|_| {}).await
}

/// Like [`create_test_app_state`], with config overrides.
#[allow(dead_code)]
pub async fn create_test_app_state_with(customize: impl FnOnce(&mut AppConfig)) -> AppState {
    let config = test_config(customize);
    let blobs = Arc::new(FileSystemBlobStore::new(&config.uploads_dir));
    create_test_app_state_on(config, blobs).await
}

/// Builds the app on a caller-provided blob store.
#[allow(dead_code)]
pub async fn create_test_app_state_on(config: Arc<AppConfig>, blobs: Arc<dyn BlobStore>) -> AppState {
    let db = Arc::new(Database::new(&config.database_url).await.unwrap());
    db.migrate().await.unwrap();

    build_app(config, db, blobs).unwrap()
}

pub fn test_config(customize: impl FnOnce(&mut AppConfig)) -> Arc<AppConfig> {
    let temp_dir = std::env::temp_dir();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let test_db_path = temp_dir
        .join(format!("test_beer_catalog_{}.db", timestamp))
        .to_string_lossy()
        .to_string();

    let test_uploads_dir = temp_dir
        .join(format!("test_uploads_{}", timestamp))
        .to_string_lossy()
        .to_string();

    let mut config = AppConfig {
        database_url: test_db_path,
        environment: "test".to_string(),
        uploads_dir: test_uploads_dir,
        max_image_bytes: 1024,
        ..AppConfig::default()
    };
    customize(&mut config);
    Arc::new(config)
}

#[allow(dead_code)]
pub fn admin() -> RequestContext {
    RequestContext::for_user(1000, "admin", Role::Admin)
}

#[allow(dead_code)]
pub fn as_user(user: &UserDto) -> RequestContext {
    RequestContext::for_user(user.id, user.username.clone(), user.role)
}

#[allow(dead_code)]
pub async fn sign_up(app: &AppState, username: &str) -> UserDto {
    app.mediator
        .send(
            &RequestContext::anonymous(),
            CreateUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "correct-horse".to_string(),
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap()
}

#[allow(dead_code)]
pub fn brewery_input(name: &str) -> BreweryInput {
    BreweryInput {
        name: name.to_string(),
        address: Address {
            street: "Piwna".to_string(),
            number: "1".to_string(),
            flat_number: None,
            post_code: "00-001".to_string(),
            city: "Warszawa".to_string(),
            state: None,
            country: "Poland".to_string(),
        },
        website: None,
        email: None,
        phone: None,
    }
}

#[allow(dead_code)]
pub async fn create_brewery(app: &AppState, name: &str) -> BreweryDto {
    app.mediator
        .send(
            &admin(),
            CreateBrewery {
                input: brewery_input(name),
            },
        )
        .await
        .unwrap()
}

/// Feeds every pending event, including the ones it causes, to the consumer.
#[allow(dead_code)]
pub async fn drain_events(app: &AppState, events: &mut Receiver<DomainEvent>) -> Vec<DomainEvent> {
    let consumer = app.event_consumer();
    let mut seen = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => {
                consumer.dispatch(&event).await.unwrap();
                seen.push(event);
            }
            Err(TryRecvError::Lagged(skipped)) => panic!("lost {} event(s)", skipped),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    seen
}

use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub environment: String,
    pub uploads_dir: String,
    /// Requests slower than this are logged as warnings.
    pub slow_request_threshold_ms: u64,
    pub max_image_bytes: usize,
    pub event_bus_capacity: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Add local configuration (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "BEER_CATALOG_"
            .add_source(Environment::with_prefix("BEER_CATALOG"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/beer_catalog.db".to_string(),
            environment: "development".to_string(),
            uploads_dir: "data/uploads".to_string(),
            slow_request_threshold_ms: 500,
            max_image_bytes: 10 * 1024 * 1024,
            event_bus_capacity: 256,
        }
    }
}

use crate::error::{ApiError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime settings, layered from defaults and `RECOMMENDER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub fuzzy_threshold: f64,
    pub max_features: usize,
    pub default_recommendations: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_source(config::Environment::with_prefix("RECOMMENDER").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 5000)?
            .set_default("catalog_path", "books.csv")?
            .set_default("fuzzy_threshold", 70.0)?
            .set_default("max_features", 1000)?
            .set_default("default_recommendations", 5)?
            .add_source(source)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(ApiError::ConfigError(format!(
                "fuzzy_threshold must be within 0-100, got {}",
                self.fuzzy_threshold
            )));
        }
        if self.max_features == 0 {
            return Err(ApiError::ConfigError(
                "max_features must be at least 1".to_string(),
            ));
        }
        if self.default_recommendations == 0 {
            return Err(ApiError::ConfigError(
                "default_recommendations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

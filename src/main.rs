use anyhow::Context;
use book_recommender::{
    app::Application,
    config::Config,
    error::Result,
    services::{IndexSettings, RecommendationService},
};
use log::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenv::dotenv().ok();

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Default to info level if RUST_LOG is not set
                "book_recommender=info,actix_web=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Loading configuration...");
    let config = Config::load()?;

    info!("Starting Book Recommendation System Server...");
    let settings = IndexSettings {
        max_features: config.max_features,
        fuzzy_threshold: config.fuzzy_threshold,
    };
    let catalog_path = config.catalog_path.clone();
    let default_recommendations = config.default_recommendations;

    // A catalog that cannot be loaded is fatal: nothing could be served
    let service = tokio::task::spawn_blocking(move || {
        RecommendationService::from_catalog_path(&catalog_path, settings)
    })
    .await
    .context("Catalog build task panicked")?
    .map_err(|e| {
        error!("{}", e);
        e
    })?
    .with_default_recommendations(default_recommendations);

    let application = Application::new(&config, service);
    application.run().await
}

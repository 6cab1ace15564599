pub mod health;
pub mod prewarm;
pub mod recommendations;
pub mod stats;

pub use health::health_check;
pub use prewarm::prewarm as prewarm_endpoint;
pub use recommendations::recommendations_config;
pub use stats::get_stats;

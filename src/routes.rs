use actix_web::{web, Scope};

use crate::handlers::{get_stats, health_check, prewarm_endpoint, recommendations_config};

/// Configure all routes for the API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .service(get_stats)
        .service(prewarm_endpoint)
        .configure(recommendations_config)
}

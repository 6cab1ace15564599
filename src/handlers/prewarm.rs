//! Prewarm endpoint that exercises the query path against the most-rated books

use crate::{error::Result, services::RecommendationService};
use actix_web::{web, HttpResponse};
use log::{debug, info};
use serde_json::json;

/// Runs sample recommendations for the most-rated books and reports how each fared.
#[actix_web::get("/prewarm")]
pub async fn prewarm(recommendation_service: web::Data<RecommendationService>) -> Result<HttpResponse> {
    info!("Prewarming recommendation index...");

    let service = recommendation_service.clone();
    let runs = web::block(move || service.diagnostics())
        .await
        .map_err(|e| crate::error::ApiError::InternalError(e.to_string()))?;

    let all_ok = runs.iter().all(|run| run.succeeded());
    debug!("Prewarm ran {} sample queries", runs.len());

    Ok(HttpResponse::Ok().json(json!({
        "status": if all_ok { "ok" } else { "partial" },
        "catalog_id": recommendation_service.snapshot().id().to_string(),
        "runs": runs,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

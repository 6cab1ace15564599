use crate::{models::HealthResponse, services::RecommendationService};
use actix_web::{get, web, HttpResponse};

#[get("/health")]
pub async fn health_check(service: web::Data<RecommendationService>) -> HttpResponse {
    let snapshot = service.snapshot();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        catalog_id: snapshot.id().to_string(),
        books: snapshot.len(),
    })
}

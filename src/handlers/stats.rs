use crate::services::RecommendationService;
use actix_web::{get, web, HttpResponse};

/// Aggregate catalog statistics.
#[get("/stats")]
pub async fn get_stats(service: web::Data<RecommendationService>) -> HttpResponse {
    HttpResponse::Ok().json(service.stats())
}

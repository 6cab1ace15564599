use crate::{
    error::ApiError,
    models::{RecommendationRequest, RecommendationResponse},
    services::RecommendationService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use log::info;

pub fn recommendations_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recommend").route(web::post().to(get_recommendations)));
}

/// Get books similar to the given title.
///
/// Responds 400 for a blank title or a zero count, 404 when no title matches even
/// approximately, 500 if the index is inconsistent.
pub async fn get_recommendations(
    request: Json<RecommendationRequest>,
    recommendation_service: web::Data<RecommendationService>,
) -> Result<HttpResponse, ApiError> {
    if request.book_title.trim().is_empty() {
        return Err(ApiError::InvalidInput("Book title is required".to_string()));
    }

    let count = request
        .num_recommendations
        .unwrap_or_else(|| recommendation_service.default_recommendations());
    if count == 0 {
        return Err(ApiError::InvalidInput(
            "num_recommendations must be a positive integer".to_string(),
        ));
    }

    info!("Recommending {} books for '{}'", count, request.book_title);
    let service = recommendation_service.clone();
    let title = request.book_title.clone();
    let result = web::block(move || service.recommend(&title, count))
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))??;

    Ok(HttpResponse::Ok().json(RecommendationResponse {
        success: true,
        result,
    }))
}

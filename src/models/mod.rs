use serde::{Deserialize, Serialize};

pub use book::{BookRecord, RawBookRow, RowRejection, DEFAULT_LANGUAGE, DEFAULT_NUM_PAGES};
pub use recommendation::{MatchKind, Recommendation, RecommendationSet};

mod book;
mod recommendation;

/// Request structure for book recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Title of a book the user liked; typos are tolerated
    #[serde(default)]
    pub book_title: String,
    /// Number of recommendations to return; the service default applies when omitted
    #[serde(default)]
    pub num_recommendations: Option<usize>,
}

/// Response structure for book recommendations
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: RecommendationSet,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    /// Identifier of the catalog snapshot currently served
    pub catalog_id: String,
    pub books: usize,
}

use serde::Serialize;

/// One ranked neighbour of the anchor book. Scores are raw, rounding happens at the edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rank: usize,
    pub title: String,
    pub author: String,
    pub rating: f64,
    pub similarity: f32,
}

/// How the user's query was mapped onto a catalog title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy { score: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    /// The title exactly as the caller supplied it.
    pub query: String,
    /// The catalog title the ranking was anchored on.
    pub resolved_title: String,
    #[serde(rename = "match")]
    pub match_kind: MatchKind,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn was_fuzzy(&self) -> bool {
        matches!(self.match_kind, MatchKind::Fuzzy { .. })
    }
}

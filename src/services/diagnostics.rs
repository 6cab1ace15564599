//! Smoke checks that run sample recommendations for the most-rated books.

use crate::{models::RecommendationSet, services::index::CatalogIndex};
use serde::Serialize;
use tracing::{info, warn};

pub const DEFAULT_SAMPLES: usize = 3;
pub const DEFAULT_SAMPLE_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticOutcome {
    Recommendations(RecommendationSet),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRun {
    pub title: String,
    #[serde(flatten)]
    pub outcome: DiagnosticOutcome,
}

impl DiagnosticRun {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, DiagnosticOutcome::Recommendations(_))
    }
}

/// Titles of the `samples` books with the highest ratings count, in descending order.
/// Books without a count are skipped; ties keep catalog order.
pub fn most_rated_titles(index: &CatalogIndex, samples: usize) -> Vec<String> {
    let mut counted: Vec<(u64, &str)> = index
        .catalog()
        .records()
        .filter_map(|r| r.ratings_count.map(|count| (count, r.title.as_str())))
        .collect();
    counted.sort_by(|a, b| b.0.cmp(&a.0));
    counted
        .into_iter()
        .take(samples)
        .map(|(_, title)| title.to_string())
        .collect()
}

pub fn sample_runs(index: &CatalogIndex, samples: usize, k: usize) -> Vec<DiagnosticRun> {
    let titles = most_rated_titles(index, samples);
    if titles.is_empty() {
        warn!("No ratings counts available; skipping sample recommendations");
    }

    titles
        .into_iter()
        .map(|title| {
            info!("Testing with: {}", title);
            let outcome = match index.recommend(&title, k) {
                Ok(set) => DiagnosticOutcome::Recommendations(set),
                Err(e) => {
                    warn!("Sample recommendation for '{}' failed: {}", title, e);
                    DiagnosticOutcome::Error(e.to_string())
                }
            };
            DiagnosticRun { title, outcome }
        })
        .collect()
}

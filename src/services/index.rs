use crate::{
    error::EngineError,
    ml::{SimilarityMatrix, SparseVector, TfidfVectorizer, DEFAULT_MAX_FEATURES},
    models::{MatchKind, Recommendation, RecommendationSet},
    services::{
        catalog::{Catalog, CatalogLoader},
        fuzzy::{FuzzyResolver, DEFAULT_FUZZY_THRESHOLD},
        stats::CatalogStats,
    },
};
use chrono::{DateTime, Utc};
use std::{path::Path, time::Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Knobs applied when building an index.
#[derive(Debug, Clone, Copy)]
pub struct IndexSettings {
    pub max_features: usize,
    pub fuzzy_threshold: f64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// Immutable snapshot of a catalog and everything derived from it.
///
/// Catalog positions, feature vectors and similarity rows share one coordinate space,
/// so they are only ever built and replaced together.
#[derive(Debug)]
pub struct CatalogIndex {
    id: Uuid,
    built_at: DateTime<Utc>,
    source: String,
    catalog: Catalog,
    vectorizer: TfidfVectorizer,
    features: Vec<SparseVector>,
    similarity: SimilarityMatrix,
    resolver: FuzzyResolver,
}

impl CatalogIndex {
    pub fn from_path(path: &Path, settings: IndexSettings) -> Result<Self, EngineError> {
        let (catalog, _report) = CatalogLoader::load_path(path)?;
        Self::build(catalog, &path.display().to_string(), settings)
    }

    pub fn build(
        catalog: Catalog,
        source: &str,
        settings: IndexSettings,
    ) -> Result<Self, EngineError> {
        if catalog.is_empty() {
            return Err(EngineError::load(source, "catalog contains no usable books"));
        }

        info!("Creating book features for {} books...", catalog.len());
        let started = Instant::now();

        let documents: Vec<String> = catalog.records().map(|r| r.feature_text()).collect();
        let vectorizer = TfidfVectorizer::fit(&documents, settings.max_features)
            .map_err(|e| EngineError::load(source, e))?;
        let features = vectorizer.transform_all(&documents);
        let similarity = SimilarityMatrix::build(&features, vectorizer.vocabulary_size());

        let index = Self {
            id: Uuid::new_v4(),
            built_at: Utc::now(),
            source: source.to_string(),
            catalog,
            vectorizer,
            features,
            similarity,
            resolver: FuzzyResolver::new(settings.fuzzy_threshold),
        };

        info!(
            "Features created! Index {} holds {} books over {} terms (took {:?})",
            index.id,
            index.len(),
            index.vectorizer.vocabulary_size(),
            started.elapsed()
        );
        Ok(index)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn features(&self) -> &[SparseVector] {
        &self.features
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::compute(&self.catalog)
    }

    /// Rank the `k` books most similar to `query`, excluding the anchor itself.
    pub fn recommend(&self, query: &str, k: usize) -> Result<RecommendationSet, EngineError> {
        let (anchor, match_kind) = match self.catalog.find_by_title(query) {
            Some(book) => (book, MatchKind::Exact),
            None => {
                let found = self
                    .resolver
                    .resolve(query, self.catalog.titles())
                    .ok_or_else(|| EngineError::NotFound {
                        query: query.to_string(),
                    })?;
                info!(
                    "Did you mean '{}'? (Match: {:.0}%)",
                    found.title, found.score
                );
                let book = self.catalog.get(found.position).ok_or(
                    EngineError::InternalInconsistency {
                        index: found.position,
                        size: self.len(),
                    },
                )?;
                (book, MatchKind::Fuzzy { score: found.score })
            }
        };

        let row = self
            .similarity
            .row(anchor.position)
            .ok_or(EngineError::InternalInconsistency {
                index: anchor.position,
                size: self.similarity.len(),
            })?;

        let mut scored: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(idx, _)| *idx != anchor.position)
            .collect();
        // Stable: equal scores keep catalog order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        let recommendations = scored
            .into_iter()
            .enumerate()
            .map(|(i, (idx, similarity))| {
                let book = self.catalog.get(idx).ok_or(EngineError::InternalInconsistency {
                    index: idx,
                    size: self.len(),
                })?;
                Ok(Recommendation {
                    rank: i + 1,
                    title: book.record.title.clone(),
                    author: book.record.authors.clone(),
                    rating: book.record.average_rating,
                    similarity,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        debug!(
            "Top {} recommendations for '{}': {:?}",
            recommendations.len(),
            anchor.record.title,
            recommendations.iter().map(|r| &r.title).collect::<Vec<_>>()
        );

        Ok(RecommendationSet {
            query: query.to_string(),
            resolved_title: anchor.record.title.clone(),
            match_kind,
            recommendations,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::BookRecord;

    pub(crate) fn book(title: &str, authors: &str, rating: f64) -> BookRecord {
        BookRecord {
            title: title.into(),
            authors: authors.into(),
            average_rating: rating,
            language_code: "eng".into(),
            num_pages: 200.0,
            ratings_count: None,
        }
    }

    pub(crate) fn sample_index() -> CatalogIndex {
        let catalog = Catalog::from_records(vec![
            book("The Hobbit", "J.R.R. Tolkien", 4.27),
            book("The Silmarillion", "J.R.R. Tolkien", 3.9),
            book("Dune", "Frank Herbert", 4.25),
            book("Dune Messiah", "Frank Herbert", 3.88),
            book("Emma", "Jane Austen", 4.0),
            book("Persuasion", "Jane Austen", 4.14),
        ]);
        CatalogIndex::build(catalog, "sample", IndexSettings::default()).unwrap()
    }

    #[test]
    fn shared_author_ranks_first() {
        let index = CatalogIndex::build(
            Catalog::from_records(vec![
                book("Alpha", "Xavier Stone", 4.0),
                book("Beta", "Xavier Stone", 4.5),
                book("Gamma", "Yolanda Reed", 3.0),
            ]),
            "abc",
            IndexSettings::default(),
        )
        .unwrap();

        let result = index.recommend("Alpha", 2).unwrap();
        let titles: Vec<&str> = result.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Gamma"]);
        assert_eq!(result.match_kind, MatchKind::Exact);
        assert_eq!(result.recommendations[0].rank, 1);
        assert_eq!(result.recommendations[0].author, "Xavier Stone");
        assert_eq!(result.recommendations[0].rating, 4.5);
    }

    #[test]
    fn anchor_is_never_recommended() {
        let index = sample_index();
        for title in index.catalog().titles() {
            let result = index.recommend(title, 10).unwrap();
            assert!(result.recommendations.iter().all(|r| r.title != title));
        }
    }

    #[test]
    fn result_size_is_bounded_by_catalog() {
        let index = sample_index();
        for k in [1, 3, 5, 6, 50] {
            let result = index.recommend("Dune", k).unwrap();
            assert_eq!(result.recommendations.len(), k.min(index.len() - 1));
        }
        assert!(index.recommend("Dune", 0).unwrap().recommendations.is_empty());
    }

    #[test]
    fn scores_are_bounded_and_non_increasing() {
        let index = sample_index();
        let result = index.recommend("The Hobbit", 5).unwrap();
        let scores: Vec<f32> = result.recommendations.iter().map(|r| r.similarity).collect();
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(result.recommendations[0].title, "The Silmarillion");
    }

    #[test]
    fn ties_keep_catalog_order() {
        let index = sample_index();
        // Emma shares only "eng" with the other four; the two Tolkien rows weigh it
        // identically and tie, the longer Herbert rows weigh it less.
        let result = index.recommend("Emma", 5).unwrap();
        assert_eq!(result.recommendations[0].title, "Persuasion");
        let tail: Vec<&str> = result.recommendations[1..]
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(tail, vec!["The Hobbit", "The Silmarillion", "Dune", "Dune Messiah"]);
    }

    #[test]
    fn recommendations_are_deterministic() {
        let index = sample_index();
        let first = index.recommend("Persuasion", 4).unwrap();
        for _ in 0..5 {
            assert_eq!(index.recommend("Persuasion", 4).unwrap(), first);
        }
    }

    #[test]
    fn fuzzy_query_behaves_like_the_resolved_title() {
        let index = sample_index();
        let fuzzy = index.recommend("The Hobbitt", 3).unwrap();
        let exact = index.recommend("The Hobbit", 3).unwrap();

        assert_eq!(fuzzy.query, "The Hobbitt");
        assert_eq!(fuzzy.resolved_title, "The Hobbit");
        assert!(fuzzy.was_fuzzy());
        assert_eq!(fuzzy.recommendations, exact.recommendations);
    }

    #[test]
    fn unknown_query_is_not_found() {
        let index = sample_index();
        let err = index.recommend("Zzzzz", 1).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotFound {
                query: "Zzzzz".into()
            }
        );
    }

    #[test]
    fn empty_catalog_cannot_be_indexed() {
        let err = CatalogIndex::build(Catalog::default(), "empty", IndexSettings::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::LoadFailure { .. }));
    }

    #[test]
    fn similarity_rows_match_catalog_positions() {
        let index = sample_index();
        assert_eq!(index.similarity().len(), index.len());
        assert_eq!(index.features().len(), index.len());
        for book in index.catalog().iter() {
            assert!(index.similarity().row(book.position).is_some());
        }
    }
}

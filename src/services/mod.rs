pub mod catalog;
pub mod diagnostics;
pub mod fuzzy;
pub mod index;
pub mod recommendation;
pub mod stats;

// Re-export public types
pub use catalog::{Catalog, CatalogLoader, IndexedBook, LoadReport};
pub use diagnostics::{DiagnosticOutcome, DiagnosticRun};
pub use fuzzy::{FuzzyMatch, FuzzyResolver};
pub use index::{CatalogIndex, IndexSettings};
pub use recommendation::RecommendationService;
pub use stats::CatalogStats;

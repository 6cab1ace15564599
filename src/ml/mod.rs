pub mod similarity;
pub mod stop_words;
pub mod tfidf;

pub use similarity::SimilarityMatrix;
pub use tfidf::{FeatureError, SparseVector, TfidfVectorizer, DEFAULT_MAX_FEATURES};

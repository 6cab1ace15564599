//! TF-IDF text features over a frozen, frequency-capped vocabulary.
//!
//! Tokens are runs of two or more word characters after lowercasing, with English
//! stop words removed. Weights are raw term counts times smoothed inverse document
//! frequency, `ln((1 + n) / (1 + df)) + 1`, and every document vector is L2 normalised.

use super::stop_words::is_stop_word;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

pub const DEFAULT_MAX_FEATURES: usize = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("empty vocabulary; documents contain only stop words or no tokens")]
    EmptyVocabulary,
    #[error("max_features must be at least 1")]
    ZeroFeatures,
}

/// Split text into lowercase tokens, dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Sparse vector with strictly increasing indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseVector {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    fn from_sorted(entries: BTreeMap<usize, f32>) -> Self {
        let (indices, values) = entries.into_iter().unzip();
        Self { indices, values }
    }

    fn normalize(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            self.values.iter_mut().for_each(|v| *v /= norm);
        }
        self
    }
}

/// A fitted vectorizer. The vocabulary cannot change after `fit`.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and idf weights over the whole corpus.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Result<Self, FeatureError> {
        if max_features == 0 {
            return Err(FeatureError::ZeroFeatures);
        }

        let mut corpus_counts: HashMap<String, u64> = HashMap::new();
        let mut document_counts: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let tokens = tokenize(document.as_ref());
            let mut seen = std::collections::HashSet::new();
            for token in tokens {
                if seen.insert(token.clone()) {
                    *document_counts.entry(token.clone()).or_insert(0) += 1;
                }
                *corpus_counts.entry(token).or_insert(0) += 1;
            }
        }

        if corpus_counts.is_empty() {
            return Err(FeatureError::EmptyVocabulary);
        }

        // Alphabetical first so the stable frequency sort breaks ties by term.
        let mut candidates: Vec<(String, u64)> = corpus_counts.into_iter().collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates.truncate(max_features);

        let mut terms: Vec<String> = candidates.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = document_counts.get(term).copied().unwrap_or(0) as f64;
                (((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32
            })
            .collect();

        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        debug!("Fitted TF-IDF vocabulary with {} terms", terms.len());

        Ok(Self {
            vocabulary,
            terms,
            idf,
        })
    }

    /// Project one document onto the frozen vocabulary.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, weight) in counts.iter_mut() {
            *weight *= self.idf[*idx];
        }
        SparseVector::from_sorted(counts).normalize()
    }

    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents
            .iter()
            .map(|document| self.transform(document.as_ref()))
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

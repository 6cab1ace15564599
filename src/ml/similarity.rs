use super::tfidf::SparseVector;
use ndarray::{Array2, ArrayView1};
use tracing::debug;

/// Dense all-pairs cosine similarity over unit-length feature vectors.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Array2<f32>,
}

impl SimilarityMatrix {
    /// Build the full N×N matrix. `dimensions` is the vocabulary size the vectors index into.
    pub fn build(vectors: &[SparseVector], dimensions: usize) -> Self {
        let n = vectors.len();
        let mut features = Array2::<f32>::zeros((n, dimensions));
        for (row, vector) in vectors.iter().enumerate() {
            for (&col, &value) in vector.indices().iter().zip(vector.values()) {
                features[[row, col]] = value;
            }
        }

        let mut scores = features.dot(&features.t());

        for i in 0..n {
            scores[[i, i]] = 1.0;
            for j in (i + 1)..n {
                let value = scores[[i, j]].clamp(0.0, 1.0);
                scores[[i, j]] = value;
                scores[[j, i]] = value;
            }
        }

        debug!("Built {}x{} similarity matrix", n, n);
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.len()).then(|| self.scores.row(index))
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        self.scores.get([i, j]).copied()
    }
}

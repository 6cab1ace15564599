pub const DEFAULT_FUZZY_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    /// Position of the title in the iteration order it was resolved from.
    pub position: usize,
    pub title: &'a str,
    /// Similarity ratio on a 0-100 scale.
    pub score: f64,
}

/// Resolves free-text queries to the closest known title by indel similarity ratio.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyResolver {
    threshold: f64,
}

impl Default for FuzzyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl FuzzyResolver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 100.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `2 * LCS / (len_a + len_b)` on a 0-100 scale, rounded half to even.
    ///
    /// Only identical strings score 100.
    pub fn ratio(a: &str, b: &str) -> f64 {
        if a == b {
            return 100.0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        let common = longest_common_subsequence(&a, &b);
        let score = (200.0 * common as f64 / total as f64).round_ties_even();
        score.min(99.0)
    }

    /// Best-scoring title at or above the threshold. The earliest title wins ties.
    pub fn resolve<'a, I>(&self, query: &str, titles: I) -> Option<FuzzyMatch<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<FuzzyMatch<'a>> = None;
        for (position, title) in titles.into_iter().enumerate() {
            let score = Self::ratio(query, title);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(FuzzyMatch {
                    position,
                    title,
                    score,
                });
            }
        }
        best.filter(|m| m.score >= self.threshold)
    }
}

/// Length of the longest common subsequence, one DP row at a time.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

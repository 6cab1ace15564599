use crate::services::catalog::Catalog;
use serde::Serialize;
use std::collections::HashSet;

/// Aggregate figures about the loaded catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_books: usize,
    pub unique_authors: usize,
    /// Mean rating, rounded to two decimals.
    pub average_rating: f64,
    pub languages: usize,
    /// Mean page count, rounded to the nearest integer.
    pub average_pages: f64,
}

impl CatalogStats {
    pub fn compute(catalog: &Catalog) -> Self {
        let total_books = catalog.len();
        let unique_authors = catalog
            .records()
            .map(|r| r.authors.as_str())
            .collect::<HashSet<_>>()
            .len();
        let languages = catalog
            .records()
            .map(|r| r.language_code.as_str())
            .collect::<HashSet<_>>()
            .len();

        let (rating_sum, pages_sum) = catalog
            .records()
            .fold((0.0, 0.0), |(rating, pages), r| {
                (rating + r.average_rating, pages + r.num_pages)
            });

        let mean = |sum: f64| {
            if total_books == 0 {
                0.0
            } else {
                sum / total_books as f64
            }
        };

        Self {
            total_books,
            unique_authors,
            average_rating: (mean(rating_sum) * 100.0).round() / 100.0,
            languages,
            average_pages: mean(pages_sum).round(),
        }
    }

    /// Labelled rows for terminal display.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Books", self.total_books.to_string()),
            ("Unique Authors", self.unique_authors.to_string()),
            ("Average Rating", format!("{:.2}", self.average_rating)),
            ("Languages", self.languages.to_string()),
            ("Average Pages", format!("{:.0}", self.average_pages)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookRecord;

    fn record(title: &str, authors: &str, rating: f64, language: &str, pages: f64) -> BookRecord {
        BookRecord {
            title: title.into(),
            authors: authors.into(),
            average_rating: rating,
            language_code: language.into(),
            num_pages: pages,
            ratings_count: None,
        }
    }

    #[test]
    fn aggregates_catalog() {
        let catalog = Catalog::from_records(vec![
            record("A", "X", 4.0, "eng", 200.0),
            record("B", "X", 4.5, "eng", 301.0),
            record("C", "Y", 3.0, "spa", 300.0),
        ]);
        let stats = CatalogStats::compute(&catalog);

        assert_eq!(stats.total_books, 3);
        assert_eq!(stats.unique_authors, 2);
        assert_eq!(stats.languages, 2);
        assert_eq!(stats.average_rating, 3.83);
        assert_eq!(stats.average_pages, 267.0);
    }

    #[test]
    fn empty_catalog_reports_zeros() {
        let stats = CatalogStats::compute(&Catalog::default());
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.average_pages, 0.0);
    }

    #[test]
    fn display_rows_are_rounded() {
        let catalog = Catalog::from_records(vec![record("A", "X", 4.126, "eng", 200.4)]);
        let rows = CatalogStats::compute(&catalog).rows();
        assert_eq!(rows[2], ("Average Rating", "4.13".to_string()));
        assert_eq!(rows[4], ("Average Pages", "200".to_string()));
    }
}

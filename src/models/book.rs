use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "eng";
pub const DEFAULT_NUM_PAGES: f64 = 300.0;

/// A catalog row after normalization. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub authors: String,
    pub average_rating: f64,
    pub language_code: String,
    pub num_pages: f64,
    pub ratings_count: Option<u64>,
}

impl BookRecord {
    /// Text used for feature extraction: title, authors and language code.
    pub fn feature_text(&self) -> String {
        format!("{} {} {}", self.title, self.authors, self.language_code)
    }
}

/// Raw CSV row restricted to the recognized columns; anything else in the file is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawBookRow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub num_pages: Option<String>,
    #[serde(default)]
    pub ratings_count: Option<String>,
}

/// Why a raw row did not make it into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    MissingTitleOrAuthors,
    InvalidRating,
}

fn present(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RawBookRow {
    /// Normalize the row, returning the record and whether `num_pages` fell back to the default.
    pub fn normalize(self) -> Result<(BookRecord, bool), RowRejection> {
        let (title, authors) = match (present(self.title), present(self.authors)) {
            (Some(title), Some(authors)) => (title, authors),
            _ => return Err(RowRejection::MissingTitleOrAuthors),
        };

        let average_rating = present(self.average_rating)
            .and_then(|r| r.parse::<f64>().ok())
            .filter(|r| r.is_finite())
            .ok_or(RowRejection::InvalidRating)?;

        let language_code =
            present(self.language_code).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let parsed_pages = present(self.num_pages)
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|p| p.is_finite());
        let pages_defaulted = parsed_pages.is_none();

        let ratings_count = present(self.ratings_count).and_then(|c| {
            c.parse::<u64>()
                .ok()
                .or_else(|| c.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        });

        Ok((
            BookRecord {
                title,
                authors,
                average_rating,
                language_code,
                num_pages: parsed_pages.unwrap_or(DEFAULT_NUM_PAGES),
                ratings_count,
            },
            pages_defaulted,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, authors: &str, rating: &str) -> RawBookRow {
        RawBookRow {
            title: Some(title.into()),
            authors: Some(authors.into()),
            average_rating: Some(rating.into()),
            ..Default::default()
        }
    }

    #[test]
    fn fills_language_and_pages_defaults() {
        let (record, defaulted) = row("Dune", "Frank Herbert", "4.25").normalize().unwrap();
        assert_eq!(record.language_code, "eng");
        assert_eq!(record.num_pages, 300.0);
        assert!(defaulted);
        assert_eq!(record.feature_text(), "Dune Frank Herbert eng");
    }

    #[test]
    fn non_numeric_pages_default_instead_of_dropping() {
        let mut raw = row("Dune", "Frank Herbert", "4.25");
        raw.num_pages = Some("lots".into());
        let (record, defaulted) = raw.normalize().unwrap();
        assert_eq!(record.num_pages, 300.0);
        assert!(defaulted);
    }

    #[test]
    fn rejects_blank_title_and_bad_rating() {
        assert_eq!(
            row("   ", "Someone", "4.0").normalize().unwrap_err(),
            RowRejection::MissingTitleOrAuthors
        );
        assert_eq!(
            row("Dune", "Frank Herbert", "great").normalize().unwrap_err(),
            RowRejection::InvalidRating
        );
        assert_eq!(
            row("Dune", "Frank Herbert", "NaN").normalize().unwrap_err(),
            RowRejection::InvalidRating
        );
    }

    #[test]
    fn ratings_count_accepts_float_strings() {
        let mut raw = row("Dune", "Frank Herbert", "4.25");
        raw.ratings_count = Some("1200.0".into());
        let (record, _) = raw.normalize().unwrap();
        assert_eq!(record.ratings_count, Some(1200));
    }
}

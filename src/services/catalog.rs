use crate::{
    error::EngineError,
    models::{BookRecord, RawBookRow, RowRejection},
};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::{info, warn};

/// A catalog row paired with its similarity-matrix coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedBook {
    pub position: usize,
    pub record: BookRecord,
}

/// Dense, ordered set of books. Positions are always `0..len()`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<IndexedBook>,
}

impl Catalog {
    pub fn from_records(records: Vec<BookRecord>) -> Self {
        let books = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| IndexedBook { position, record })
            .collect();
        Self { books }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&IndexedBook> {
        self.books.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedBook> {
        self.books.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &BookRecord> {
        self.books.iter().map(|book| &book.record)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records().map(|record| record.title.as_str())
    }

    /// First book whose title is exactly `title`.
    pub fn find_by_title(&self, title: &str) -> Option<&IndexedBook> {
        self.books.iter().find(|book| book.record.title == title)
    }
}

/// Counters gathered while reading a catalog source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub kept: usize,
    pub missing_fields: usize,
    pub invalid_rating: usize,
    pub unreadable: usize,
    pub pages_defaulted: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.missing_fields + self.invalid_rating + self.unreadable
    }
}

/// Reads delimited catalog files into a normalized [`Catalog`].
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load_path(path: &Path) -> Result<(Catalog, LoadReport), EngineError> {
        info!("Loading book catalog from {}", path.display());
        let file = File::open(path).map_err(|e| EngineError::load(path.display().to_string(), e))?;
        Self::load_reader(file, &path.display().to_string())
    }

    pub fn load_reader<R: Read>(
        reader: R,
        source_name: &str,
    ) -> Result<(Catalog, LoadReport), EngineError> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| EngineError::load(source_name, e))?
            .clone();
        if !headers.iter().any(|h| h == "title") || !headers.iter().any(|h| h == "authors") {
            warn!(
                "Catalog {} lacks a title or authors column; every row will be dropped",
                source_name
            );
        }

        let mut report = LoadReport::default();
        let mut records = Vec::new();

        for result in rdr.deserialize::<RawBookRow>() {
            report.rows_read += 1;

            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping unreadable row {}: {}", report.rows_read, e);
                    report.unreadable += 1;
                    continue;
                }
            };

            match row.normalize() {
                Ok((record, pages_defaulted)) => {
                    if pages_defaulted {
                        report.pages_defaulted += 1;
                    }
                    records.push(record);
                }
                Err(RowRejection::MissingTitleOrAuthors) => report.missing_fields += 1,
                Err(RowRejection::InvalidRating) => report.invalid_rating += 1,
            }
        }

        report.kept = records.len();
        info!(
            "Loaded {} books successfully ({} rows read, {} dropped, {} page counts defaulted)",
            report.kept,
            report.rows_read,
            report.dropped(),
            report.pages_defaulted
        );

        Ok((Catalog::from_records(records), report))
    }
}

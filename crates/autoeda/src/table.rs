//! Immutable in-memory table.
//!
//! [`Table`] wraps a polars [`DataFrame`] and only hands out shared borrows,
//! so nothing downstream of the loader can mutate the snapshot being
//! analysed.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;

/// An ordered collection of equally long, named columns.
#[derive(Debug, Clone)]
pub struct Table {
    name: Option<String>,
    frame: DataFrame,
}

impl Table {
    /// Wrap a data frame. Polars already guarantees equal column lengths.
    pub fn new(frame: DataFrame) -> Self {
        Self { name: None, frame }
    }

    /// Wrap a data frame and attach a dataset identifier (usually the file name).
    pub fn with_name(frame: DataFrame, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            frame,
        }
    }

    /// Dataset identifier, if one was attached at load time.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Read-only view of the underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Look up a column by name.
    pub fn series(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map(|column| column.as_materialized_series())
            .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))
    }

    /// Iterate over all columns in table order.
    pub fn iter_series(&self) -> impl Iterator<Item = &Series> {
        self.frame
            .get_columns()
            .iter()
            .map(|column| column.as_materialized_series())
    }
}

static_assertions::assert_impl_all!(Table: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_accessors() {
        let frame = df!(
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"],
        )
        .unwrap();
        let table = Table::with_name(frame, "sample.csv");

        assert_eq!(table.name(), Some("sample.csv"));
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.series("a").unwrap().len(), 3);
        assert_eq!(table.iter_series().count(), 2);
    }

    #[test]
    fn test_missing_column() {
        let table = Table::new(df!("a" => [1i64]).unwrap());
        let err = table.series("nope").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}

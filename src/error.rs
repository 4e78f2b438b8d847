//! Error taxonomy for index building and batch lookups.
//!
//! Only whole-build and whole-batch failures are errors. A SKU that is not in
//! the index is a normal [`LookupResult::NotFound`](crate::query::LookupResult)
//! and never shows up here.

use crate::index::schema::MissingColumns;
use thiserror::Error;

/// A single sheet could not be used. Recoverable: the sheet is skipped and
/// the build carries on with the remaining sheets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceTableError {
    #[error("Error reading sheet {table}: missing {missing} column")]
    MissingColumns {
        table: String,
        missing: MissingColumns,
    },
    #[error("Error reading sheet {table}: {reason}")]
    Unreadable { table: String, reason: String },
}

impl SourceTableError {
    /// Name of the sheet that failed
    pub fn table(&self) -> &str {
        match self {
            SourceTableError::MissingColumns { table, .. } => table,
            SourceTableError::Unreadable { table, .. } => table,
        }
    }
}

/// Fatal build failure: no index can be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("no usable sheets in source ({attempted} attempted, {} failed)", .warnings.len())]
    EmptySource {
        attempted: usize,
        warnings: Vec<SourceTableError>,
    },
}

/// Fatal failure of one batch call. No partial results are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("No 'SKU' column found in uploaded file (columns: {})", .headers.join(", "))]
    MalformedBatchInput { headers: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = SourceTableError::MissingColumns {
            table: "Dies".to_string(),
            missing: MissingColumns {
                sku: true,
                description: false,
            },
        };
        assert_eq!(err.table(), "Dies");
        assert_eq!(err.to_string(), "Error reading sheet Dies: missing SKU column");
    }

    #[test]
    fn test_empty_source_message() {
        let err = BuildError::EmptySource {
            attempted: 0,
            warnings: Vec::new(),
        };
        assert!(err.to_string().contains("0 attempted"));
    }

    #[test]
    fn test_malformed_batch_lists_headers() {
        let err = BatchError::MalformedBatchInput {
            headers: vec!["Part".to_string(), "Qty".to_string()],
        };
        assert!(err.to_string().contains("Part, Qty"));
    }
}

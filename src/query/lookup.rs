//! Point and batch lookups against a built [`SkuIndex`].

use crate::error::BatchError;
use crate::index::schema::{find_column, DESCRIPTION_COLUMN, SKU_COLUMN};
use crate::index::types::{RawTable, RawValue, SkuIndex};
use serde::Serialize;

/// Text shown in place of a description for unknown SKUs
pub const NOT_FOUND_MESSAGE: &str = "SKU not found.";

/// Outcome of resolving one SKU. `NotFound` is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "description", rename_all = "snake_case")]
pub enum LookupResult {
    Found(String),
    NotFound,
}

impl LookupResult {
    pub fn description(&self) -> Option<&str> {
        match self {
            LookupResult::Found(description) => Some(description),
            LookupResult::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    /// Description, or `not_found` for unknown SKUs
    pub fn display_or<'a>(&'a self, not_found: &'a str) -> &'a str {
        self.description().unwrap_or(not_found)
    }
}

/// Resolve a single SKU. Surrounding whitespace is ignored; the match is
/// exact and case-sensitive.
pub fn lookup_one(index: &SkuIndex, identifier: &str) -> LookupResult {
    match index.get(identifier.trim()) {
        Some(description) => LookupResult::Found(description.to_string()),
        None => LookupResult::NotFound,
    }
}

/// One line of a batch result: the SKU as submitted and what it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub sku: String,
    pub result: LookupResult,
}

/// Resolve every identifier in order. The output has the same length and
/// order as the input, duplicates included.
pub fn lookup_batch<S: AsRef<str>>(index: &SkuIndex, identifiers: &[S]) -> Vec<BatchEntry> {
    identifiers
        .iter()
        .map(|identifier| {
            let sku = identifier.as_ref();
            BatchEntry {
                sku: sku.to_string(),
                result: lookup_one(index, sku),
            }
        })
        .collect()
}

/// SKUs pulled out of an uploaded list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    column: usize,
    identifiers: Vec<String>,
}

impl BatchRequest {
    /// Take the SKU column of an uploaded table. Every row yields one
    /// identifier; empty cells become `""` and resolve to `NotFound`.
    pub fn from_table(table: &RawTable) -> Result<Self, BatchError> {
        let column = find_column(&table.headers, SKU_COLUMN).ok_or_else(|| {
            BatchError::MalformedBatchInput {
                headers: table.headers.clone(),
            }
        })?;

        let identifiers = table
            .rows
            .iter()
            .map(|row| row.get(column).to_canonical_string().unwrap_or_default())
            .collect();

        Ok(Self {
            column,
            identifiers,
        })
    }

    /// Position of the SKU column in the uploaded table
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn resolve(&self, index: &SkuIndex) -> Vec<BatchEntry> {
        lookup_batch(index, &self.identifiers)
    }
}

/// Copy an uploaded table with a Description column filled in from the
/// index. An existing Description column is overwritten, otherwise one is
/// appended. Unknown SKUs get `not_found` as their description.
pub fn annotate_table(
    index: &SkuIndex,
    table: &RawTable,
    not_found: &str,
) -> Result<RawTable, BatchError> {
    let request = BatchRequest::from_table(table)?;
    let entries = request.resolve(index);

    let mut annotated = table.clone();
    let description_column = match find_column(&annotated.headers, DESCRIPTION_COLUMN) {
        Some(column) => column,
        None => {
            annotated.headers.push(DESCRIPTION_COLUMN.to_string());
            annotated.headers.len() - 1
        }
    };

    for (row, entry) in annotated.rows.iter_mut().zip(&entries) {
        let description = entry.result.display_or(not_found).to_string();
        row.set(description_column, RawValue::Text(description));
    }

    Ok(annotated)
}

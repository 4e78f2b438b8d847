use super::TableSource;
use crate::error::SourceTableError;
use crate::index::types::{RawRow, RawTable, RawValue, SheetResult};
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Spreadsheet catalog: every worksheet becomes one table, in workbook order
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for WorkbookSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_tables(&self) -> Result<Vec<SheetResult>> {
        let mut workbook = open_workbook_auto(&self.path)
            .with_context(|| format!("Failed to open workbook {}", self.path.display()))?;

        let names = workbook.sheet_names().to_vec();
        debug!(path = %self.path.display(), sheets = names.len(), "opened workbook");

        let sheets = names
            .into_iter()
            .map(|name| match workbook.worksheet_range(&name) {
                Ok(range) => Ok(range_to_table(name, &range)),
                Err(e) => Err(SourceTableError::Unreadable {
                    table: name,
                    reason: e.to_string(),
                }),
            })
            .collect();

        Ok(sheets)
    }
}

/// Read the first worksheet of a workbook (used for uploaded SKU lists)
pub fn read_first_sheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("No worksheet found in {}", path.display()))?;

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("Failed to read sheet {} of {}", name, path.display()))?;

    Ok(range_to_table(name, &range))
}

/// First row is the header, the rest are data rows. An empty sheet has no
/// headers (and so fails column resolution later).
pub fn range_to_table(name: String, range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => Vec::new(),
    };

    let mut table = RawTable::new(name, headers);
    for row in rows {
        table.push_row(RawRow::new(row.iter().map(cell_value).collect()));
    }
    table
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Error cells (#N/A, #REF!, ...) count as missing data
pub fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Int(i) => RawValue::Int(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        other => RawValue::Text(other.to_string()),
    }
}

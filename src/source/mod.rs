//! Table sources: the collaborators that turn spreadsheet files into
//! [`RawTable`]s for the index builder.
//!
//! - [`WorkbookSource`] - every sheet of an xlsx/xlsm/xlsb/xls/ods workbook
//! - [`CsvSource`] - one table per CSV file
//! - [`MemorySource`] - tables already in memory
//!
//! A source fails as a whole (`Err`) when the file can't be opened. Sheets
//! that open but can't be parsed come back as per-sheet
//! [`SourceTableError`](crate::error::SourceTableError)s so the build can
//! skip them.

pub mod delimited;
pub mod workbook;

pub use delimited::{read_csv_table, CsvSource};
pub use workbook::{read_first_sheet, WorkbookSource};

use crate::index::types::{RawTable, SheetResult};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

pub trait TableSource {
    /// Human readable name for logs and reports
    fn describe(&self) -> String;

    /// Read every table, in source order
    fn load_tables(&self) -> Result<Vec<SheetResult>>;
}

impl<T: TableSource + ?Sized> TableSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load_tables(&self) -> Result<Vec<SheetResult>> {
        (**self).load_tables()
    }
}

/// Tables handed over directly by the caller
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: Vec<RawTable>,
}

impl MemorySource {
    pub fn new(tables: Vec<RawTable>) -> Self {
        Self { tables }
    }
}

impl TableSource for MemorySource {
    fn describe(&self) -> String {
        format!("{} in-memory table(s)", self.tables.len())
    }

    fn load_tables(&self) -> Result<Vec<SheetResult>> {
        Ok(self.tables.iter().cloned().map(Ok).collect())
    }
}

/// File formats understood by the sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "xlam" | "ods" => {
                Some(SourceFormat::Workbook)
            }
            "csv" | "tsv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

/// Pick a source for a catalog file based on its extension
pub fn open_source(path: &Path) -> Result<Box<dyn TableSource>> {
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Workbook) => Ok(Box::new(WorkbookSource::new(path))),
        Some(SourceFormat::Csv) => Ok(Box::new(CsvSource::new(vec![path.to_path_buf()]))),
        None => bail!("Unsupported catalog file type: {}", path.display()),
    }
}

/// Open several CSV files as the sheets of one catalog, or a single
/// workbook.
pub fn open_sources(paths: &[PathBuf]) -> Result<Box<dyn TableSource>> {
    match paths {
        [] => bail!("No catalog source given"),
        [single] => open_source(single),
        many => {
            if let Some(other) = many
                .iter()
                .find(|p| SourceFormat::from_path(p) != Some(SourceFormat::Csv))
            {
                bail!(
                    "Only CSV files can be combined into one catalog: {}",
                    other.display()
                );
            }
            Ok(Box::new(CsvSource::new(many.to_vec())))
        }
    }
}

/// Read an uploaded SKU list: the first sheet of a workbook, or a CSV file
pub fn read_batch_table(path: &Path) -> Result<RawTable> {
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Workbook) => read_first_sheet(path),
        Some(SourceFormat::Csv) => read_csv_table(path),
        None => bail!("Unsupported batch file type: {}", path.display()),
    }
}

/// Sheet name for a file-backed table
pub(crate) fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string()
}

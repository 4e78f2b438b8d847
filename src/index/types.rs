use crate::error::SourceTableError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A single cell as handed over by a table source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl RawValue {
    /// True for cells that count as missing data
    pub fn is_absent(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Float(f) => f.is_nan(),
            RawValue::Int(_) | RawValue::Bool(_) => false,
        }
    }

    /// Canonical string form of the cell, or `None` when the cell is absent.
    ///
    /// Spreadsheets store every number as a float, so integral floats are
    /// rendered without a fractional part: `101.0` becomes `"101"`.
    pub fn to_canonical_string(&self) -> Option<String> {
        if self.is_absent() {
            return None;
        }

        let s = match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Int(i) => i.to_string(),
            RawValue::Float(f) => format_float(*f),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Empty => return None,
        };
        Some(s)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

// Integers above 2^53 are not exactly representable, leave those alone.
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT_INT {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// One source record. Rows may be shorter than the header row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRow(pub Vec<RawValue>);

static EMPTY_CELL: RawValue = RawValue::Empty;

impl RawRow {
    pub fn new(cells: Vec<RawValue>) -> Self {
        Self(cells)
    }

    /// Cell at `column`, `Empty` when the row is too short
    pub fn get(&self, column: usize) -> &RawValue {
        self.0.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// Overwrite a cell, padding the row with empty cells if needed
    pub fn set(&mut self, column: usize, value: RawValue) {
        if self.0.len() <= column {
            self.0.resize(column + 1, RawValue::Empty);
        }
        self.0[column] = value;
    }

    pub fn cells(&self) -> &[RawValue] {
        &self.0
    }
}

impl<V: Into<RawValue>> FromIterator<V> for RawRow {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One sheet of a source workbook (or one CSV file)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<RawRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn push_row(&mut self, row: RawRow) {
        self.rows.push(row);
    }
}

/// Result of reading one sheet from a source
pub type SheetResult = Result<RawTable, SourceTableError>;

/// SKU → description map. Keys are trimmed identifiers.
#[derive(Debug, Clone, Default)]
pub struct SkuIndex {
    entries: AHashMap<String, String>,
}

impl SkuIndex {
    pub fn get(&self, sku: &str) -> Option<&str> {
        self.entries.get(sku).map(String::as_str)
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.entries.contains_key(sku)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Last write wins
    pub(crate) fn insert(&mut self, sku: String, description: String) {
        self.entries.insert(sku, description);
    }
}

/// One valid source row, in the order it was read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub sku: String,
    pub description: String,
}

/// Every valid (sku, description) pair in source order, duplicates kept.
///
/// Lowercased copies of the descriptions are kept alongside so substring
/// search doesn't fold the whole corpus on every query.
#[derive(Debug, Clone, Default)]
pub struct DescriptionCorpus {
    entries: Vec<CorpusEntry>,
    folded: Vec<String>,
}

impl DescriptionCorpus {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CorpusEntry> {
        self.entries.iter()
    }

    /// Entries paired with their lowercased description
    pub(crate) fn iter_folded(&self) -> impl Iterator<Item = (usize, &CorpusEntry, &str)> {
        self.entries
            .iter()
            .zip(self.folded.iter())
            .enumerate()
            .map(|(position, (entry, folded))| (position, entry, folded.as_str()))
    }

    pub(crate) fn push(&mut self, sku: String, description: String) {
        self.folded.push(description.to_lowercase());
        self.entries.push(CorpusEntry { sku, description });
    }
}

/// Per-sheet outcome of a successful sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_dropped: usize,
}

/// What happened to each sheet during a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub tables: Vec<TableSummary>,
    pub warnings: Vec<SourceTableError>,
}

impl BuildReport {
    pub fn rows_accepted(&self) -> usize {
        self.tables.iter().map(|t| t.rows_accepted).sum()
    }

    pub fn rows_dropped(&self) -> usize {
        self.tables.iter().map(|t| t.rows_dropped).sum()
    }
}

/// Output of a build cycle. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub index: SkuIndex,
    pub corpus: DescriptionCorpus,
    pub report: BuildReport,
}

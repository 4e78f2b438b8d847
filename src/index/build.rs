use crate::error::{BuildError, SourceTableError};
use crate::index::schema::{resolve_columns, ColumnResolution, SkuColumns};
use crate::index::types::{
    BuildReport, BuiltIndex, DescriptionCorpus, RawTable, SheetResult, SkuIndex, TableSummary,
};
use tracing::{debug, info, warn};

/// Valid pairs extracted from one sheet (computed before merging)
struct ExtractedTable {
    pairs: Vec<(String, String)>,
    summary: TableSummary,
}

/// Pull the (sku, description) pairs out of a sheet, dropping rows where
/// either field is missing.
fn extract_pairs(table: &RawTable) -> Result<ExtractedTable, SourceTableError> {
    let SkuColumns { sku, description } = match resolve_columns(&table.headers) {
        ColumnResolution::ColumnsFound(columns) => columns,
        ColumnResolution::ColumnsMissing(missing) => {
            return Err(SourceTableError::MissingColumns {
                table: table.name.clone(),
                missing,
            });
        }
    };

    let mut pairs = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let Some(raw_sku) = row.get(sku).to_canonical_string() else {
            continue;
        };
        let Some(desc) = row.get(description).to_canonical_string() else {
            continue;
        };

        pairs.push((raw_sku.trim().to_string(), desc));
    }

    let rows_read = table.rows.len();
    let rows_accepted = pairs.len();

    Ok(ExtractedTable {
        pairs,
        summary: TableSummary {
            name: table.name.clone(),
            rows_read,
            rows_accepted,
            rows_dropped: rows_read - rows_accepted,
        },
    })
}

/// Incremental builder: sheets are merged one at a time in source order,
/// then [`IndexBuilder::finish`] decides whether the result is usable.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: SkuIndex,
    corpus: DescriptionCorpus,
    report: BuildReport,
    attempted: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one sheet. A sheet whose header can't be resolved is recorded
    /// as a warning and contributes nothing.
    pub fn add_table(&mut self, table: &RawTable) {
        self.attempted += 1;

        match extract_pairs(table) {
            Ok(extracted) => {
                for (sku, description) in extracted.pairs {
                    self.corpus.push(sku.clone(), description.clone());
                    self.index.insert(sku, description);
                }

                debug!(
                    sheet = %extracted.summary.name,
                    accepted = extracted.summary.rows_accepted,
                    dropped = extracted.summary.rows_dropped,
                    "merged sheet"
                );
                self.report.tables.push(extracted.summary);
            }
            Err(error) => self.record_failure(error),
        }
    }

    /// Record a sheet the source could not read at all
    pub fn add_failure(&mut self, error: SourceTableError) {
        self.attempted += 1;
        self.record_failure(error);
    }

    fn record_failure(&mut self, error: SourceTableError) {
        warn!(sheet = %error.table(), "{}", error);
        self.report.warnings.push(error);
    }

    /// Merge a sheet as delivered by a source
    pub fn add_sheet(&mut self, sheet: &SheetResult) {
        match sheet {
            Ok(table) => self.add_table(table),
            Err(error) => self.add_failure(error.clone()),
        }
    }

    /// Finish the build. Fails when no sheet was usable.
    pub fn finish(self) -> Result<BuiltIndex, BuildError> {
        if self.report.tables.is_empty() {
            return Err(BuildError::EmptySource {
                attempted: self.attempted,
                warnings: self.report.warnings,
            });
        }

        info!(
            sheets = self.report.tables.len(),
            skipped = self.report.warnings.len(),
            skus = self.index.len(),
            descriptions = self.corpus.len(),
            "index built"
        );

        Ok(BuiltIndex {
            index: self.index,
            corpus: self.corpus,
            report: self.report,
        })
    }
}

/// Build the SKU index and description corpus from parsed sheets
pub fn build_index(tables: &[RawTable]) -> Result<BuiltIndex, BuildError> {
    let mut builder = IndexBuilder::new();
    for table in tables {
        builder.add_table(table);
    }
    builder.finish()
}

/// Build from the per-sheet results of a source, keeping read failures in
/// the report.
pub fn build_index_from_sheets(sheets: &[SheetResult]) -> Result<BuiltIndex, BuildError> {
    let mut builder = IndexBuilder::new();
    for sheet in sheets {
        builder.add_sheet(sheet);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{RawRow, RawValue};

    fn table(name: &str, rows: &[(&str, &str)]) -> RawTable {
        RawTable::new(name, vec!["SKU".to_string(), "Description".to_string()]).with_rows(
            rows.iter()
                .map(|(sku, desc)| [*sku, *desc].into_iter().collect())
                .collect(),
        )
    }

    #[test]
    fn test_single_table_indexes_every_row() {
        let built = build_index(&[table(
            "Punches",
            &[("101", "Round punch"), (" 202 ", "Hex punch")],
        )])
        .unwrap();

        assert_eq!(built.index.len(), 2);
        assert_eq!(built.index.get("101"), Some("Round punch"));
        assert_eq!(built.index.get("202"), Some("Hex punch"));
        assert_eq!(built.corpus.len(), 2);
    }

    #[test]
    fn test_later_sheet_wins() {
        let built = build_index(&[
            table("A", &[("101", "Round punch")]),
            table("B", &[("101", "Hex punch")]),
        ])
        .unwrap();

        assert_eq!(built.index.len(), 1);
        assert_eq!(built.index.get("101"), Some("Hex punch"));
    }

    #[test]
    fn test_later_row_wins_within_sheet() {
        let built = build_index(&[table("A", &[("101", "First"), ("101", "Second")])]).unwrap();
        assert_eq!(built.index.get("101"), Some("Second"));
        assert_eq!(built.corpus.len(), 2);
    }

    #[test]
    fn test_corpus_not_deduplicated() {
        let built = build_index(&[table("A", &[("101", "X")]), table("B", &[("101", "Y")])])
            .unwrap();

        assert_eq!(built.index.len(), 1);
        assert_eq!(built.corpus.len(), 2);
        let descriptions: Vec<_> = built.corpus.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["X", "Y"]);
    }

    #[test]
    fn test_numeric_skus_are_stringified() {
        let sheet = RawTable::new("Dies", vec!["sku".to_string(), "DESCRIPTION".to_string()])
            .with_rows(vec![
                RawRow::new(vec![RawValue::Float(101.0), RawValue::from("Round die")]),
                RawRow::new(vec![RawValue::Int(202), RawValue::from("Square die")]),
            ]);

        let built = build_index(&[sheet]).unwrap();
        assert_eq!(built.index.get("101"), Some("Round die"));
        assert_eq!(built.index.get("202"), Some("Square die"));
    }

    #[test]
    fn test_rows_missing_fields_are_dropped() {
        let sheet = RawTable::new("A", vec!["SKU".to_string(), "Description".to_string()])
            .with_rows(vec![
                RawRow::new(vec![RawValue::from("101"), RawValue::Empty]),
                RawRow::new(vec![RawValue::Empty, RawValue::from("Orphan")]),
                RawRow::new(vec![RawValue::from("  "), RawValue::from("Blank sku")]),
                RawRow::new(vec![RawValue::from("303")]),
                RawRow::new(vec![RawValue::from("404"), RawValue::from("Oval punch")]),
            ]);

        let built = build_index(&[sheet]).unwrap();
        assert_eq!(built.index.len(), 1);
        assert_eq!(built.index.get("404"), Some("Oval punch"));
        assert_eq!(built.report.tables[0].rows_read, 5);
        assert_eq!(built.report.tables[0].rows_dropped, 4);
        assert_eq!(built.report.rows_accepted(), 1);
    }

    #[test]
    fn test_bad_sheet_is_skipped_with_warning() {
        let bad = RawTable::new("Notes", vec!["Comment".to_string()])
            .with_rows(vec![["anything"].into_iter().collect()]);

        let built = build_index(&[bad, table("Punches", &[("101", "Round punch")])]).unwrap();

        assert_eq!(built.index.len(), 1);
        assert_eq!(built.report.tables.len(), 1);
        assert_eq!(built.report.warnings.len(), 1);
        assert_eq!(built.report.warnings[0].table(), "Notes");
    }

    #[test]
    fn test_empty_input_is_empty_source() {
        let err = build_index(&[]).unwrap_err();
        assert_eq!(
            err,
            BuildError::EmptySource {
                attempted: 0,
                warnings: Vec::new()
            }
        );
    }

    #[test]
    fn test_all_sheets_failing_is_empty_source() {
        let bad = RawTable::new("Notes", vec!["Comment".to_string()]);
        let unreadable: SheetResult = Err(SourceTableError::Unreadable {
            table: "Broken".to_string(),
            reason: "corrupt".to_string(),
        });

        let err = build_index_from_sheets(&[Ok(bad), unreadable]).unwrap_err();
        let BuildError::EmptySource {
            attempted,
            warnings,
        } = err;
        assert_eq!(attempted, 2);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_sheet_with_no_valid_rows_still_counts() {
        let built = build_index(&[table("Empty", &[])]).unwrap();
        assert!(built.index.is_empty());
        assert!(built.corpus.is_empty());
        assert_eq!(built.report.tables.len(), 1);
    }

    #[test]
    fn test_every_indexed_sku_has_corpus_entry() {
        let built = build_index(&[
            table("A", &[("1", "a"), ("2", "b")]),
            table("B", &[("2", "c"), ("3", "d")]),
        ])
        .unwrap();

        for (sku, _) in built.index.iter() {
            assert!(built.corpus.iter().any(|e| e.sku == sku));
        }
    }
}

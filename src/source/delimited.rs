use super::{table_name, TableSource};
use crate::error::SourceTableError;
use crate::index::types::{RawRow, RawTable, RawValue, SheetResult};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};

/// CSV catalog: each file is one sheet, in the order given
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: Vec<PathBuf>,
}

impl CsvSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl TableSource for CsvSource {
    fn describe(&self) -> String {
        match self.paths.as_slice() {
            [single] => single.display().to_string(),
            many => format!("{} CSV files", many.len()),
        }
    }

    fn load_tables(&self) -> Result<Vec<SheetResult>> {
        let mut sheets = Vec::with_capacity(self.paths.len());

        for path in &self.paths {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            // A file that opens but doesn't parse is a bad sheet, not a bad source
            let sheet = parse_csv(table_name(path), delimiter_for(path), file).map_err(|e| {
                SourceTableError::Unreadable {
                    table: table_name(path),
                    reason: e.to_string(),
                }
            });
            sheets.push(sheet);
        }

        Ok(sheets)
    }
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Read a whole CSV file as one table
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_csv(table_name(path), delimiter_for(path), file)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse CSV content. The first record is the header row; rows may be
/// ragged. Empty fields become [`RawValue::Empty`].
pub fn parse_csv<R: Read>(name: String, delimiter: u8, reader: R) -> Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(name, headers);

    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    RawValue::Empty
                } else {
                    RawValue::Text(field.to_string())
                }
            })
            .collect::<Vec<_>>();
        table.push_row(RawRow::new(row));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_csv_ragged_rows() {
        let content = "SKU,Description,Price\n101,Round punch,4.50\n202,Hex punch\n303\n";
        let table = parse_csv("Punches".to_string(), b',', content.as_bytes()).unwrap();

        assert_eq!(table.name, "Punches");
        assert_eq!(table.headers, vec!["SKU", "Description", "Price"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].get(1), &RawValue::from("Hex punch"));
        assert_eq!(table.rows[2].get(1), &RawValue::Empty);
    }

    #[test]
    fn test_parse_csv_empty_fields_and_quotes() {
        let content = "sku,description\n,\"Punch, round\"\n\"101\",\n";
        let table = parse_csv("A".to_string(), b',', content.as_bytes()).unwrap();

        assert_eq!(table.rows[0].get(0), &RawValue::Empty);
        assert_eq!(table.rows[0].get(1), &RawValue::from("Punch, round"));
        assert_eq!(table.rows[1].get(1), &RawValue::Empty);
    }

    #[test]
    fn test_csv_source_one_sheet_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("Punches.csv");
        let b = dir.path().join("Dies.tsv");
        fs::write(&a, "SKU,Description\n101,Round punch\n").unwrap();
        fs::write(&b, "SKU\tDescription\n101\tRound die\n").unwrap();

        let source = CsvSource::new(vec![a, b]);
        assert_eq!(source.describe(), "2 CSV files");

        let sheets = source.load_tables().unwrap();
        let tables: Vec<_> = sheets.into_iter().map(|s| s.unwrap()).collect();
        assert_eq!(tables[0].name, "Punches");
        assert_eq!(tables[1].name, "Dies");
        assert_eq!(tables[1].rows[0].get(1), &RawValue::from("Round die"));
    }

    #[test]
    fn test_csv_source_missing_file_fails_whole_source() {
        let source = CsvSource::new(vec![PathBuf::from("/nonexistent/catalog.csv")]);
        assert!(source.load_tables().is_err());
    }

    #[test]
    fn test_read_csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        fs::write(&path, "SKU\n101\n999\n").unwrap();

        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.name, "upload");
        assert_eq!(table.rows.len(), 2);
    }
}

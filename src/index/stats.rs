use crate::index::types::BuiltIndex;
use std::io::{self, Write};

/// Display build statistics for a loaded index
pub fn show_stats(built: &BuiltIndex, source: &str) -> io::Result<()> {
    let stdout = io::stdout();
    write_stats(&mut stdout.lock(), built, source)
}

pub fn write_stats<W: Write>(out: &mut W, built: &BuiltIndex, source: &str) -> io::Result<()> {
    let report = &built.report;

    writeln!(out, "Index Statistics")?;
    writeln!(out, "================")?;
    writeln!(out)?;
    writeln!(out, "Source:           {}", source)?;
    writeln!(out, "Sheets indexed:   {}", report.tables.len())?;
    writeln!(out, "Sheets skipped:   {}", report.warnings.len())?;
    writeln!(out, "Unique SKUs:      {}", built.index.len())?;
    writeln!(out, "Descriptions:     {}", built.corpus.len())?;
    writeln!(out, "Rows dropped:     {}", report.rows_dropped())?;

    // Rows whose SKU was overwritten by a later row
    let shadowed = built.corpus.len().saturating_sub(built.index.len());
    writeln!(out, "Duplicate SKUs:   {}", shadowed)?;

    if !report.tables.is_empty() {
        writeln!(out)?;
        writeln!(out, "Rows by sheet:")?;
        let width = report
            .tables
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(15);

        for table in &report.tables {
            writeln!(
                out,
                "  {:width$} {} accepted, {} dropped",
                table.name,
                table.rows_accepted,
                table.rows_dropped,
                width = width
            )?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Skipped sheets:")?;
        for warning in &report.warnings {
            writeln!(out, "  {}", warning)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build::build_index;
    use crate::index::types::RawTable;

    #[test]
    fn test_write_stats_counts() {
        let punches = RawTable::new("Punches", vec!["SKU".to_string(), "Description".to_string()])
            .with_rows(vec![
                ["101", "Round punch"].into_iter().collect(),
                ["101", "Hex punch"].into_iter().collect(),
            ]);
        let notes = RawTable::new("Notes", vec!["Text".to_string()]);
        let built = build_index(&[punches, notes]).unwrap();

        let mut out = Vec::new();
        write_stats(&mut out, &built, "catalog.xlsx").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Source:           catalog.xlsx"));
        assert!(text.contains("Unique SKUs:      1"));
        assert!(text.contains("Descriptions:     2"));
        assert!(text.contains("Duplicate SKUs:   1"));
        assert!(text.contains("Error reading sheet Notes"));
    }
}

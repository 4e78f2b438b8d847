//! Terminal rendering of lookup, batch and search results, plus CSV export
//! of annotated batch tables.

use crate::index::types::{RawTable, RawValue};
use crate::query::{LookupResult, MatchResult, SearchOutcome};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Default file name for exported batch results
pub const BATCH_RESULTS_FILE: &str = "sku_lookup_results.csv";

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print a single lookup result
pub fn print_lookup(result: &LookupResult, not_found: &str, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);
    write_lookup(&mut stdout, result, not_found)
}

pub fn write_lookup<W: WriteColor>(
    out: &mut W,
    result: &LookupResult,
    not_found: &str,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "Description:")?;
    out.reset()?;

    match result {
        LookupResult::Found(description) => writeln!(out, " {}", description)?,
        LookupResult::NotFound => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, " {}", not_found)?;
            out.reset()?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Print search results with the matched term highlighted
pub fn print_matches(outcome: &SearchOutcome, term: &str, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);
    write_matches(&mut stdout, outcome, term)
}

pub fn write_matches<W: WriteColor>(
    out: &mut W,
    outcome: &SearchOutcome,
    term: &str,
) -> io::Result<()> {
    let matches = match outcome {
        SearchOutcome::Skipped => return Ok(()),
        SearchOutcome::Matches(matches) => matches,
    };

    if matches.is_empty() {
        writeln!(out, "No matching descriptions found.")?;
        return Ok(());
    }

    writeln!(out, "Found {} matching descriptions:", matches.len())?;
    let width = matches
        .iter()
        .map(|m| m.sku.chars().count())
        .max()
        .unwrap_or(0);

    for m in matches {
        write_match_line(out, m, term, width)?;
    }

    Ok(())
}

fn write_match_line<W: WriteColor>(
    out: &mut W,
    m: &MatchResult,
    term: &str,
    width: usize,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{:width$}", m.sku, width = width)?;
    out.reset()?;
    write!(out, "  ")?;

    match highlight_span(&m.description, term) {
        Some((start, end)) => {
            write!(out, "{}", &m.description[..start])?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "{}", &m.description[start..end])?;
            out.reset()?;
            writeln!(out, "{}", &m.description[end..])?;
        }
        None => writeln!(out, "{}", m.description)?,
    }

    Ok(())
}

/// Byte span of the first case-insensitive occurrence of `term`.
///
/// Only used for highlighting, so terms whose lowercase form changes
/// length (rare outside ASCII) simply aren't highlighted.
fn highlight_span(description: &str, term: &str) -> Option<(usize, usize)> {
    if term.is_empty() {
        return None;
    }
    let folded = description.to_lowercase();
    if folded.len() != description.len() {
        return None;
    }
    let start = folded.find(&term.to_lowercase())?;
    let end = start + term.len();
    (description.is_char_boundary(start) && description.is_char_boundary(end))
        .then_some((start, end))
}

fn cell_text(value: &RawValue) -> String {
    value.to_canonical_string().unwrap_or_default()
}

/// Print an annotated batch table as aligned columns
pub fn print_table(table: &RawTable, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);
    write_table(&mut stdout, table)
}

pub fn write_table<W: WriteColor>(out: &mut W, table: &RawTable) -> io::Result<()> {
    let columns = table
        .rows
        .iter()
        .map(|r| r.cells().len())
        .max()
        .unwrap_or(0)
        .max(table.headers.len());

    let mut widths = vec![0usize; columns];
    for (i, header) in table.headers.iter().enumerate() {
        widths[i] = header.chars().count();
    }
    for row in &table.rows {
        for (i, cell) in row.cells().iter().enumerate() {
            widths[i] = widths[i].max(cell_text(cell).chars().count());
        }
    }

    out.set_color(ColorSpec::new().set_bold(true))?;
    for (i, width) in widths.iter().enumerate() {
        let header = table.headers.get(i).map(String::as_str).unwrap_or("");
        write!(out, "{:width$}  ", header, width = *width)?;
    }
    out.reset()?;
    writeln!(out)?;

    for row in &table.rows {
        for (i, width) in widths.iter().enumerate() {
            write!(out, "{:width$}  ", cell_text(row.get(i)), width = *width)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Write a table to a CSV file (header row first)
pub fn write_table_csv(table: &RawTable, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(&table.headers)
        .context("Failed to write header row")?;

    for row in &table.rows {
        let record: Vec<String> = (0..table.headers.len().max(row.cells().len()))
            .map(|i| cell_text(row.get(i)))
            .collect();
        writer
            .write_record(&record)
            .context("Failed to write result row")?;
    }

    writer.flush().context("Failed to flush results")?;
    Ok(())
}

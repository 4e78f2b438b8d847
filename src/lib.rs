//! # skulookup - SKU catalog lookup
//!
//! Resolves stock-keeping units to descriptions from a multi-sheet
//! spreadsheet catalog, in three ways: single lookup, batch lookup over an
//! uploaded list, and reverse lookup by searching descriptions.
//!
//! ## Architecture
//!
//! - [`index`] - Builds the SKU → description index and the description corpus
//! - [`query`] - Point lookup, batch lookup and substring search
//! - [`source`] - Reads workbooks and CSV files into raw tables
//! - [`output`] - Terminal rendering and CSV export
//! - [`error`] - Build and batch error types
//! - [`utils`] - Config, logging, progress spinner
//!
//! ## Quick Start
//!
//! ```
//! use skulookup::index::{build_index, RawTable};
//! use skulookup::query::{lookup_one, search_descriptions, LookupResult};
//!
//! let sheet = RawTable::new("Punches", vec!["SKU".into(), "Description".into()])
//!     .with_rows(vec![["101", "Hex punch"].into_iter().collect()]);
//!
//! let built = build_index(&[sheet]).unwrap();
//! assert_eq!(
//!     lookup_one(&built.index, " 101 "),
//!     LookupResult::Found("Hex punch".to_string())
//! );
//! assert_eq!(search_descriptions(&built.corpus, "hex").matches().len(), 1);
//! ```
//!
//! The built index is immutable. To pick up catalog changes, hold it in an
//! [`index::IndexHandle`] and call `refresh`.

pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod source;
pub mod utils;

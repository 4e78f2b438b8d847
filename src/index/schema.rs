//! Header resolution for source sheets and uploaded batch lists.

use std::fmt;

pub const SKU_COLUMN: &str = "SKU";
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Column positions of a sheet whose header resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkuColumns {
    pub sku: usize,
    pub description: usize,
}

/// Which of the required columns a header row lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingColumns {
    pub sku: bool,
    pub description: bool,
}

impl fmt::Display for MissingColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sku, self.description) {
            (true, true) => write!(f, "{} and {}", SKU_COLUMN, DESCRIPTION_COLUMN),
            (true, false) => write!(f, "{}", SKU_COLUMN),
            (false, true) => write!(f, "{}", DESCRIPTION_COLUMN),
            (false, false) => write!(f, "no"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnResolution {
    ColumnsFound(SkuColumns),
    ColumnsMissing(MissingColumns),
}

/// Position of the first header equal to `name`, ignoring ASCII case and
/// surrounding whitespace.
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

/// Resolve the SKU and Description columns of a header row
pub fn resolve_columns(headers: &[String]) -> ColumnResolution {
    let sku = find_column(headers, SKU_COLUMN);
    let description = find_column(headers, DESCRIPTION_COLUMN);

    match (sku, description) {
        (Some(sku), Some(description)) => {
            ColumnResolution::ColumnsFound(SkuColumns { sku, description })
        }
        (sku, description) => ColumnResolution::ColumnsMissing(MissingColumns {
            sku: sku.is_none(),
            description: description.is_none(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_exact_headers() {
        let resolved = resolve_columns(&headers(&["SKU", "Description"]));
        assert_eq!(
            resolved,
            ColumnResolution::ColumnsFound(SkuColumns {
                sku: 0,
                description: 1
            })
        );
    }

    #[test]
    fn test_resolve_loose_case_and_extra_columns() {
        let resolved = resolve_columns(&headers(&["Price", " description ", "sku", "Notes"]));
        assert_eq!(
            resolved,
            ColumnResolution::ColumnsFound(SkuColumns {
                sku: 2,
                description: 1
            })
        );
    }

    #[test]
    fn test_first_matching_header_wins() {
        let resolved = resolve_columns(&headers(&["SKU", "Description", "sku"]));
        assert!(matches!(
            resolved,
            ColumnResolution::ColumnsFound(SkuColumns { sku: 0, .. })
        ));
    }

    #[test]
    fn test_missing_columns_reported() {
        let resolved = resolve_columns(&headers(&["Part Number", "Description"]));
        assert_eq!(
            resolved,
            ColumnResolution::ColumnsMissing(MissingColumns {
                sku: true,
                description: false
            })
        );

        let resolved = resolve_columns(&[]);
        assert_eq!(
            resolved,
            ColumnResolution::ColumnsMissing(MissingColumns {
                sku: true,
                description: true
            })
        );
    }

    #[test]
    fn test_missing_columns_display() {
        let both = MissingColumns {
            sku: true,
            description: true,
        };
        assert_eq!(both.to_string(), "SKU and Description");
    }
}

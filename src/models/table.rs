use serde::{Deserialize, Serialize};

use super::TreeError;

/// Marker in the `Parent Category` column meaning "no parent".
pub const ROOT_SENTINEL: &str = "-";

/// Column headers of the exchange table, in column order.
pub const TABLE_HEADER: [&str; 2] = ["Category", "Parent Category"];

/// Name of the worksheet the spreadsheet codec reads and writes.
pub const TABLE_SHEET_NAME: &str = "Category Tree";

/// One data row of the flat exchange format.
///
/// Serialized with the same column names the spreadsheet uses, so a JSON
/// export reads like the table it stands in for:
///
/// ```json
/// { "Category": "Sneakers", "Parent Category": "Shoes" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Parent Category")]
    pub parent: String,
}

impl TableRow {
    pub fn root(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            parent: ROOT_SENTINEL.to_string(),
        }
    }

    pub fn child(category: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            parent: parent.into(),
        }
    }

    /// The parent name, or `None` when the row carries the root sentinel.
    pub fn parent_name(&self) -> Option<&str> {
        if self.parent == ROOT_SENTINEL {
            None
        } else {
            Some(&self.parent)
        }
    }
}

/// Trim every cell and reject rows the importer cannot build a tree from.
///
/// Both cells must be non-empty after trimming; a root row uses the
/// sentinel rather than an empty parent cell. The sentinel is never a
/// category name.
pub fn normalize_rows(rows: Vec<TableRow>) -> Result<Vec<TableRow>, TreeError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let category = row.category.trim();
            let parent = row.parent.trim();
            // Data rows are reported 1-based after the header row.
            let line = i + 2;
            if category.is_empty() {
                return Err(TreeError::MalformedTable(format!(
                    "row {}: empty {} cell",
                    line, TABLE_HEADER[0]
                )));
            }
            if category == ROOT_SENTINEL {
                return Err(TreeError::MalformedTable(format!(
                    "row {}: \"{}\" cannot be a {}",
                    line, ROOT_SENTINEL, TABLE_HEADER[0]
                )));
            }
            if parent.is_empty() {
                return Err(TreeError::MalformedTable(format!(
                    "row {}: empty {} cell (use \"{}\" for a root)",
                    line, TABLE_HEADER[1], ROOT_SENTINEL
                )));
            }
            Ok(TableRow::child(category, parent))
        })
        .collect()
}

//! Request and response types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{OwnerId, TableRow};

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ViewTreeRequest {
    #[schemars(description = "The chat whose category tree to show")]
    pub owner_id: OwnerId,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddRootCategoryRequest {
    #[schemars(description = "The chat that owns the tree")]
    pub owner_id: OwnerId,
    #[schemars(description = "Name of the new root category. May contain spaces.")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddChildCategoryRequest {
    #[schemars(description = "The chat that owns the tree")]
    pub owner_id: OwnerId,
    #[schemars(
        description = "Existing parent name followed by the child name, separated by spaces (e.g. 'Fruit Green Apple'). The shortest leading words that name an existing category become the parent; the rest is the child. An existing child is moved under the parent."
    )]
    pub path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RemoveCategoryRequest {
    #[schemars(description = "The chat that owns the tree")]
    pub owner_id: OwnerId,
    #[schemars(description = "Exact name of the category to remove, with everything beneath it")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportTableRequest {
    #[schemars(description = "The chat whose tree to export")]
    pub owner_id: OwnerId,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ImportTableRequest {
    #[schemars(description = "The chat whose tree receives the rows")]
    pub owner_id: OwnerId,
    #[schemars(description = "Table rows in order, without the header row")]
    pub rows: Vec<TableRowInput>,
}

/// One table row for MCP input, with the same column names as the table.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TableRowInput {
    #[serde(rename = "Category")]
    #[schemars(description = "Category name")]
    pub category: String,
    #[serde(rename = "Parent Category")]
    #[schemars(description = "Parent category name, or '-' for a root category")]
    pub parent: String,
}

impl From<TableRowInput> for TableRow {
    fn from(input: TableRowInput) -> Self {
        TableRow::child(input.category, input.parent)
    }
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExportTableResponse {
    /// Column names, in order
    pub header: Vec<String>,
    /// One `[category, parent]` pair per category, in outline order
    pub rows: Vec<[String; 2]>,
}

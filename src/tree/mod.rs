//! The category tree engine.
//!
//! [`CategoryTree`] is the entry point every outer surface goes through. Each
//! method is one logical operation and runs in one database transaction, so
//! a multi-row import or a re-parenting edit is either fully visible or not
//! at all.

mod mutator;
mod render;
mod table;

use std::collections::HashMap;

use uuid::Uuid;

use crate::db::Database;
use crate::models::*;

pub use render::{render_forest, NO_CATEGORIES};
pub use table::export_rows;

#[derive(Clone)]
pub struct CategoryTree {
    db: Database,
}

impl CategoryTree {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Add a parentless category.
    pub fn add_root(&self, owner_id: OwnerId, name: &str) -> TreeResult {
        self.db
            .write(|store| mutator::add_root(store, owner_id, name))
    }

    /// Add a child under the parent named by the leading tokens.
    ///
    /// The parent is the shortest token prefix that names an existing
    /// category; the remaining tokens, joined by single spaces, name the
    /// child. An existing child is moved rather than duplicated.
    pub fn add_child(&self, owner_id: OwnerId, tokens: &[&str]) -> TreeResult {
        self.db
            .write(|store| mutator::add_child(store, owner_id, tokens))
    }

    /// [`CategoryTree::add_child`] on whitespace-separated text.
    pub fn add_child_text(&self, owner_id: OwnerId, text: &str) -> TreeResult {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        self.add_child(owner_id, &tokens)
    }

    /// Remove a category and everything beneath it.
    pub fn remove(&self, owner_id: OwnerId, name: &str) -> TreeResult {
        self.db.write(|store| mutator::remove(store, owner_id, name))
    }

    pub fn exists(&self, owner_id: OwnerId, name: &str) -> TreeResult<bool> {
        self.db
            .read(|store| store.exists(owner_id, name).map_err(TreeError::from))
    }

    /// Top-level categories only, in creation order.
    pub fn roots(&self, owner_id: OwnerId) -> TreeResult<Vec<Category>> {
        self.db
            .read(|store| store.find_roots(owner_id).map_err(TreeError::from))
    }

    /// The owner's whole forest, roots and children in stored order.
    pub fn forest(&self, owner_id: OwnerId) -> TreeResult<Vec<CategoryTreeNode>> {
        let categories = self
            .db
            .read(|store| store.find_all(owner_id).map_err(TreeError::from))?;
        Ok(build_forest(categories))
    }

    /// Text outline of the owner's forest.
    pub fn render(&self, owner_id: OwnerId) -> TreeResult<String> {
        let forest = self.forest(owner_id)?;
        tracing::debug!(
            "Rendering {} root categories for owner {}",
            forest.len(),
            owner_id
        );
        Ok(render_forest(&forest))
    }

    /// Flat `(Category, Parent Category)` rows for the owner's forest.
    pub fn export(&self, owner_id: OwnerId) -> TreeResult<Vec<TableRow>> {
        let forest = self.forest(owner_id)?;
        Ok(export_rows(&forest))
    }

    /// Apply decoded table rows (header excluded) as one transaction.
    pub fn import(&self, owner_id: OwnerId, rows: Vec<TableRow>) -> TreeResult {
        self.db
            .write(|store| table::import_rows(store, owner_id, rows))
    }
}

/// Nest a flat, position-ordered list of categories.
fn build_forest(categories: Vec<Category>) -> Vec<CategoryTreeNode> {
    let mut children_map: HashMap<Option<Uuid>, Vec<Category>> = HashMap::new();
    for category in categories {
        children_map
            .entry(category.parent_id)
            .or_default()
            .push(category);
    }

    fn build_subtree(
        parent_id: Option<Uuid>,
        children_map: &mut HashMap<Option<Uuid>, Vec<Category>>,
    ) -> Vec<CategoryTreeNode> {
        let Some(categories) = children_map.remove(&parent_id) else {
            return Vec::new();
        };
        categories
            .into_iter()
            .map(|category| {
                let children = build_subtree(Some(category.id), children_map);
                CategoryTreeNode { category, children }
            })
            .collect()
    }

    build_subtree(None, &mut children_map)
}

//! Conversion between a category forest and the flat two-column table.

use std::collections::HashSet;

use crate::db::Store;
use crate::models::*;

/// Flatten a forest into table rows.
///
/// Rows come out in the same pre-order as the text outline: each root in
/// stored order, followed by its whole subtree, before the next root.
pub fn export_rows(roots: &[CategoryTreeNode]) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for root in roots {
        root.walk(&mut |node, _depth, parent| {
            let name = node.category.name.clone();
            rows.push(match parent {
                Some(parent) => TableRow::child(name, parent),
                None => TableRow::root(name),
            });
        });
    }
    rows
}

/// Apply table rows to an owner's forest, one row at a time in input order.
///
/// A name may appear in several rows; later rows see whatever earlier rows
/// created. A parent referenced before its own row exists is created as a root
/// placeholder, and moves under its real parent if a later row names one
/// (provided that parent does not exist yet either). When both the subject
/// and its parent already exist the row is left alone, even if the stored
/// parent differs from the one in the table.
pub(crate) fn import_rows(
    store: &Store<'_>,
    owner_id: OwnerId,
    rows: Vec<TableRow>,
) -> TreeResult {
    let rows = normalize_rows(rows)?;
    let count = rows
        .iter()
        .map(|row| row.category.as_str())
        .collect::<HashSet<_>>()
        .len();

    for row in &rows {
        let subject = row.category.as_str();
        match store.find_by_name(owner_id, subject)? {
            None => match row.parent_name() {
                None => {
                    store.create(owner_id, subject, None)?;
                }
                Some(parent) if parent == subject => {
                    tracing::warn!(
                        "Row for {} names itself as parent; importing it as a root",
                        subject
                    );
                    store.create(owner_id, subject, None)?;
                }
                Some(parent_name) => {
                    let mut node = store.create(owner_id, subject, None)?;
                    let parent = match store.find_by_name(owner_id, parent_name)? {
                        Some(parent) => parent,
                        None => store.create(owner_id, parent_name, None)?,
                    };
                    store.attach(&mut node, parent.id)?;
                }
            },
            Some(mut existing) => {
                let Some(parent_name) = row.parent_name() else {
                    continue;
                };
                if store.find_by_name(owner_id, parent_name)?.is_none() {
                    let parent = store.create(owner_id, parent_name, None)?;
                    store.attach(&mut existing, parent.id)?;
                } else {
                    tracing::debug!(
                        "{} and {} both exist; leaving {} where it is",
                        subject,
                        parent_name,
                        subject
                    );
                }
            }
        }
    }

    tracing::info!(
        "Imported {} categories for owner {} ({} in tree)",
        count,
        owner_id,
        store.count(owner_id)?
    );
    Ok(Outcome::Imported { count })
}

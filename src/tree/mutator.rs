//! Single-category edits: add a root, add (or adopt) a child, remove a subtree.
//!
//! Every function here runs against a [`Store`] that is already inside a
//! write transaction; the caller decides the transaction boundary.

use crate::db::Store;
use crate::models::*;

/// Names must be non-empty and must not collide with the table's root sentinel.
fn check_name(name: &str) -> Result<(), TreeError> {
    if name.is_empty() {
        return Err(TreeError::EmptyName);
    }
    if name == ROOT_SENTINEL {
        tracing::warn!("Rejected reserved category name {:?}", name);
        return Err(TreeError::ReservedName {
            name: name.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn add_root(store: &Store<'_>, owner_id: OwnerId, name: &str) -> TreeResult {
    let name = name.trim();
    check_name(name)?;

    if store.exists(owner_id, name)? {
        tracing::warn!(
            "Category with name {} already exists for owner {}",
            name,
            owner_id
        );
        return Err(TreeError::AlreadyExists {
            name: name.to_string(),
        });
    }

    store.create(owner_id, name, None)?;
    tracing::info!("Root category {} added for owner {}", name, owner_id);
    Ok(Outcome::RootAdded {
        name: name.to_string(),
    })
}

/// Split `tokens` into a parent name and a child name.
///
/// Names may contain spaces and nothing marks the boundary, so candidate
/// parents are built one token at a time and the first (shortest) one that
/// names an existing category wins. The child always gets at least one
/// token. With categories "Fruit" and "Fruit Tree", `Fruit Tree Red`
/// resolves to parent "Fruit" and child "Tree Red".
pub(crate) fn resolve_parent(
    store: &Store<'_>,
    owner_id: OwnerId,
    tokens: &[&str],
) -> anyhow::Result<Option<(String, String)>> {
    for split in 1..tokens.len() {
        let candidate = tokens[..split].join(" ");
        if store.exists(owner_id, &candidate)? {
            let child = tokens[split..].join(" ");
            return Ok(Some((candidate, child)));
        }
    }
    Ok(None)
}

pub(crate) fn add_child(store: &Store<'_>, owner_id: OwnerId, tokens: &[&str]) -> TreeResult {
    let Some((parent_name, child_name)) = resolve_parent(store, owner_id, tokens)? else {
        tracing::warn!(
            "No parent category found in {:?} for owner {}",
            tokens,
            owner_id
        );
        return Err(TreeError::ParentNotFound);
    };

    check_name(&child_name)?;
    if parent_name == child_name {
        tracing::warn!("Category {} given as its own parent", parent_name);
        return Err(TreeError::SelfParent { name: parent_name });
    }

    let parent = store
        .find_by_name(owner_id, &parent_name)?
        .ok_or(TreeError::ParentNotFound)?;

    let mut child = match store.find_by_name(owner_id, &child_name)? {
        Some(existing) => {
            if existing.parent_id == Some(parent.id) {
                tracing::warn!(
                    "Category {} is already a child of {} for owner {}",
                    child_name,
                    parent_name,
                    owner_id
                );
                return Err(TreeError::AlreadyChild {
                    parent: parent_name,
                    child: child_name,
                });
            }
            if store.is_ancestor(existing.id, parent.id)? {
                tracing::warn!(
                    "Refusing to move {} under its descendant {}",
                    child_name,
                    parent_name
                );
                return Err(TreeError::WouldCreateCycle {
                    parent: parent_name,
                    child: child_name,
                });
            }
            existing
        }
        None => store.create(owner_id, &child_name, None)?,
    };

    store.attach(&mut child, parent.id)?;
    tracing::info!(
        "Category {} added under {} for owner {}",
        child_name,
        parent_name,
        owner_id
    );
    Ok(Outcome::ChildAdded {
        parent: parent_name,
        child: child_name,
    })
}

pub(crate) fn remove(store: &Store<'_>, owner_id: OwnerId, name: &str) -> TreeResult {
    let Some(category) = store.find_by_name(owner_id, name)? else {
        tracing::warn!(
            "Category with name {} does not exist for owner {}",
            name,
            owner_id
        );
        return Err(TreeError::NotFound {
            name: name.to_string(),
        });
    };

    // Children are derived from parent_id, so dropping the row also drops
    // it from its parent's children.
    store.delete(category.id)?;
    tracing::info!("Category {} removed for owner {}", name, owner_id);
    Ok(Outcome::Removed {
        name: name.to_string(),
    })
}

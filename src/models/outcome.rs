use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Successful result of a tree operation.
///
/// `Display` renders the reply text shown to the chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    RootAdded { name: String },
    ChildAdded { parent: String, child: String },
    Removed { name: String },
    /// `count` is the number of distinct subject rows, not the number of
    /// categories created.
    Imported { count: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootAdded { name } => {
                write!(f, "Successfully added root category with name: {}", name)
            }
            Self::ChildAdded { parent, child } => {
                write!(f, "Successfully added child: {} to parent: {}", child, parent)
            }
            Self::Removed { name } => {
                write!(f, "Successfully removed category with name: {}", name)
            }
            Self::Imported { count } => write!(f, "Successfully added {} categories.", count),
        }
    }
}

/// Rejected tree operation.
///
/// Everything except [`TreeError::Storage`] is an expected, user-facing
/// outcome: the message is safe to send back to the chat. Storage failures
/// are the only fatal kind and should be logged and replaced with a generic
/// retry prompt.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Category with name {name} already exists. Please enter another name for the root category.")]
    AlreadyExists { name: String },

    #[error("Category name must not be empty.")]
    EmptyName,

    #[error("\"{name}\" is reserved for root rows in tables and cannot be a category name.")]
    ReservedName { name: String },

    #[error("Parent category does not exist.")]
    ParentNotFound,

    #[error("Category {name} cannot be its own parent. Please enter a correct category name.")]
    SelfParent { name: String },

    #[error("The category {child} is already a child of {parent}.")]
    AlreadyChild { parent: String, child: String },

    #[error("Category with name {name} does not exist. Please enter an existing category.")]
    NotFound { name: String },

    #[error("Category {child} cannot be moved under its own descendant {parent}.")]
    WouldCreateCycle { parent: String, child: String },

    #[error("Malformed category table: {0}")]
    MalformedTable(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TreeError {
    /// Whether this error came from the storage layer rather than user input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "already_exists",
            Self::EmptyName => "empty_name",
            Self::ReservedName { .. } => "reserved_name",
            Self::ParentNotFound => "parent_not_found",
            Self::SelfParent { .. } => "self_parent",
            Self::AlreadyChild { .. } => "already_child",
            Self::NotFound { .. } => "not_found",
            Self::WouldCreateCycle { .. } => "would_create_cycle",
            Self::MalformedTable(_) => "malformed_table",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<rusqlite::Error> for TreeError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.into())
    }
}

/// Result of a tree operation.
pub type TreeResult<T = Outcome> = std::result::Result<T, TreeError>;

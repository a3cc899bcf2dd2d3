//! Domain models for category trees.
//!
//! # Core Concepts
//!
//! - [`Category`]: One named node in an owner's forest. Names are unique per owner,
//!   and the parent edge is stored on the child as `parent_id`.
//! - [`CategoryTreeNode`]: A category with its nested children, built from a
//!   single read of the owner's rows.
//! - [`TableRow`]: One `(Category, Parent Category)` pair of the flat exchange format.
//! - [`Outcome`] / [`TreeError`]: What a tree operation reports back to the caller.

mod category;
mod outcome;
mod table;

pub use category::*;
pub use outcome::*;
pub use table::*;

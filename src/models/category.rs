use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the chat that owns a forest.
///
/// Every category belongs to exactly one owner, and no query ever crosses
/// owners: two chats may both have a category called "Fruit" without
/// seeing each other's.
pub type OwnerId = i64;

/// A single named node in an owner's category forest.
///
/// The parent edge lives on the child (`parent_id`); the list of children is
/// derived by querying for rows that point at this one, so there is never a
/// second copy of the structure to keep in sync.
///
/// `position` is a per-owner ordinal. Roots and siblings are listed in
/// ascending `position`, which is insertion order. Attaching a node to a new
/// parent gives it a fresh ordinal so it lands at the end of that parent's
/// children.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// A category with its nested children, used for tree responses.
///
/// The `category` fields are flattened into the JSON response, with an additional
/// `children` array containing nested `CategoryTreeNode` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTreeNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryTreeNode>,
}

impl CategoryTreeNode {
    /// Visit this node and its descendants in pre-order, passing the depth
    /// relative to this node (0 for `self`) and the parent's name.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a CategoryTreeNode, usize, Option<&'a str>),
    {
        self.walk_from(0, None, f);
    }

    fn walk_from<'a, F>(&'a self, depth: usize, parent: Option<&'a str>, f: &mut F)
    where
        F: FnMut(&'a CategoryTreeNode, usize, Option<&'a str>),
    {
        f(self, depth, parent);
        for child in &self.children {
            child.walk_from(depth + 1, Some(self.category.name.as_str()), f);
        }
    }

    /// Number of categories in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CategoryTreeNode::subtree_size)
            .sum::<usize>()
    }
}

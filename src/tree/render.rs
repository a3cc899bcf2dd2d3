//! Indented text outline of a category forest.

use crate::models::CategoryTreeNode;

/// Reply used when an owner has no categories at all.
pub const NO_CATEGORIES: &str = "There are no categories";

const INDENT: &str = "    ";
const MARKER: &str = "-   ";

/// Render a forest as an indented outline.
///
/// Roots and siblings keep their stored order; nothing is sorted.
///
/// Example output:
/// ```text
/// -   Fruit
///     -   Apple
///         -   Granny Smith
///     -   Pear
/// -   Vegetables
/// ```
pub fn render_forest(roots: &[CategoryTreeNode]) -> String {
    if roots.is_empty() {
        return NO_CATEGORIES.to_string();
    }

    let mut output = String::new();
    for root in roots {
        root.walk(&mut |node, depth, _parent| {
            output.push_str(&INDENT.repeat(depth));
            output.push_str(MARKER);
            output.push_str(&node.category.name);
            output.push('\n');
        });
    }
    output
}

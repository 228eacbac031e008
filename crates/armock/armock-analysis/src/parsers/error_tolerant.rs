//! Error-node detection on error-tolerant tree-sitter parses.

use tree_sitter::Node;

/// First ERROR or MISSING node in document order.
pub fn first_error(root: Node) -> Option<Node> {
    if root.is_error() || root.is_missing() {
        return Some(root);
    }
    if !root.has_error() {
        return None;
    }
    for i in 0..root.child_count() {
        if let Some(child) = root.child(i) {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query`'s arena tree. A [`NodeRef`] is a `Copy`
//! handle (`NodeId` + tree reference), so element identity is the node id and
//! never depends on object addresses.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef};

pub use tendril::StrTendril;

// === Microdata attribute names ===

/// Item-scope marker.
pub const ITEMSCOPE: &str = "itemscope";
/// Property-name marker.
pub const ITEMPROP: &str = "itemprop";
/// Type list.
pub const ITEMTYPE: &str = "itemtype";
/// Global identifier.
pub const ITEMID: &str = "itemid";
/// Reference list.
pub const ITEMREF: &str = "itemref";

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Check if attribute exists
#[inline]
#[must_use]
pub fn has_attribute(node: &NodeRef, name: &str) -> bool {
    node.attr(name).is_some()
}

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(node: &NodeRef) -> Option<String> {
    get_attribute(node, "id")
}

/// Split an attribute into whitespace-separated tokens, order preserved.
///
/// Missing or blank attributes yield an empty list.
#[must_use]
pub fn attribute_tokens(node: &NodeRef, name: &str) -> Vec<String> {
    node.attr(name)
        .map(|value| value.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Whether the node is an element carrying `itemscope`.
#[inline]
#[must_use]
pub fn is_item_scope(node: &NodeRef) -> bool {
    node.is_element() && has_attribute(node, ITEMSCOPE)
}

/// Whether the node is an element carrying `itemprop`.
#[inline]
#[must_use]
pub fn is_property(node: &NodeRef) -> bool {
    node.is_element() && has_attribute(node, ITEMPROP)
}

// === Text Content ===

/// Get all text content of node and descendants, in document order.
///
/// Entities are already decoded by the tree builder.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

// === Tree Navigation ===

/// Get direct element children
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
        .into_iter()
        .filter(NodeRef::is_element)
        .collect()
}

/// Pre-order walk over the elements below `node` (not `node` itself).
///
/// `descend` is asked for every visited element; returning `false` keeps the
/// element in the output but skips its subtree. The walk uses an explicit
/// stack, so deep documents cannot overflow the call stack.
#[must_use]
pub fn descendant_elements<'a, F>(node: &NodeRef<'a>, mut descend: F) -> Vec<NodeRef<'a>>
where
    F: FnMut(&NodeRef<'a>) -> bool,
{
    let mut out = Vec::new();
    let mut stack: Vec<NodeRef<'a>> = element_children(node).into_iter().rev().collect();

    while let Some(current) = stack.pop() {
        out.push(current);
        if descend(&current) {
            stack.extend(element_children(&current).into_iter().rev());
        }
    }

    out
}

/// Every element of the document in document order.
#[must_use]
pub fn all_elements(doc: &Document) -> Vec<NodeRef<'_>> {
    descendant_elements(&doc.root(), |_| true)
}

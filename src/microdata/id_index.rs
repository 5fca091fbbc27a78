//! Document-wide `id` lookup used to resolve `itemref` tokens.

use std::collections::HashMap;

use crate::dom::{self, NodeRef};

/// Map from `id` attribute value to the element declaring it.
///
/// Built once per document before any item is built. The first element
/// carrying a given id wins; empty ids are not indexed. Elements are shared,
/// so the same target may feed any number of items.
#[derive(Default)]
pub struct IdIndex<'a> {
    by_id: HashMap<String, NodeRef<'a>>,
}

impl<'a> IdIndex<'a> {
    /// Index `elements`, which must be in document order.
    #[must_use]
    pub fn build(elements: &[NodeRef<'a>]) -> Self {
        let mut by_id = HashMap::new();
        for node in elements {
            if let Some(id) = dom::id(node).filter(|id| !id.is_empty()) {
                by_id.entry(id).or_insert(*node);
            }
        }
        Self { by_id }
    }

    /// Element declaring `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<NodeRef<'a>> {
        self.by_id.get(id).copied()
    }

    /// Resolve `itemref` tokens in textual order, skipping unknown ids.
    #[must_use]
    pub fn resolve(&self, tokens: &[String]) -> Vec<NodeRef<'a>> {
        tokens
            .iter()
            .filter_map(|token| {
                let found = self.get(token);
                if found.is_none() {
                    tracing::trace!(id = %token, "itemref target not found");
                }
                found
            })
            .collect()
    }

    /// Number of indexed ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the document declares no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

//! Item construction.
//!
//! An item's properties come from its own subtree (stopping at nested item
//! scopes) followed by the subtrees of its `itemref` targets. Nested
//! `itemscope` property elements are built recursively into owned values.

use std::collections::{HashMap, HashSet};

use url::Url;

use super::id_index::IdIndex;
use super::values::{self, ValueRule};
use crate::dom::{self, NodeId, NodeRef, ITEMID, ITEMPROP, ITEMREF, ITEMTYPE};
use crate::result::{Item, Properties, Value};

/// A finished item and the number of items in its tree, itself included.
struct Built {
    item: Item,
    size: usize,
}

/// Builds [`Item`]s for one document.
///
/// Holds the per-document memo of finished items and the set of item roots
/// on the current build chain. The chain set is what breaks `itemref`
/// cycles: a candidate whose item is still being built is skipped.
///
/// Every nested item placed into a value slot is charged against a
/// per-document budget, memo copies by their full tree size. Once the
/// budget is spent, further nested items keep their types and id only.
pub struct ItemBuilder<'d, 'a> {
    index: &'d IdIndex<'a>,
    base: Option<&'d Url>,
    max_depth: usize,
    max_items: usize,
    remaining: usize,
    budget_warned: bool,
    in_progress: HashSet<NodeId>,
    built: HashMap<NodeId, Built>,
}

impl<'d, 'a> ItemBuilder<'d, 'a> {
    /// Create a builder over a document's id index.
    #[must_use]
    pub fn new(index: &'d IdIndex<'a>, base: Option<&'d Url>, max_depth: usize, max_items: usize) -> Self {
        Self {
            index,
            base,
            max_depth,
            max_items,
            remaining: max_items,
            budget_warned: false,
            in_progress: HashSet::new(),
            built: HashMap::new(),
        }
    }

    /// Build the item rooted at `root`.
    pub fn build(&mut self, root: &NodeRef<'a>) -> Item {
        self.build_at(root, 0).0
    }

    fn build_at(&mut self, root: &NodeRef<'a>, depth: usize) -> (Item, usize) {
        if let Some(memo) = self.built.get(&root.id) {
            return (memo.item.clone(), memo.size);
        }

        let mut item = bare_item(root);

        if depth >= self.max_depth {
            tracing::warn!(depth, max_depth = self.max_depth, "item nesting too deep; dropping properties");
            return (item, 1);
        }

        self.in_progress.insert(root.id);

        let mut size = 1;
        for candidate in self.candidates(root) {
            let names = dom::attribute_tokens(&candidate, ITEMPROP);
            if names.is_empty() {
                continue;
            }

            let rule = ValueRule::for_element(&candidate);
            if rule != ValueRule::NestedItem {
                if let Some(text) = values::extract_text(&candidate, rule, self.base) {
                    for name in &names {
                        item.properties.push(name, Value::Text(text.clone()));
                    }
                }
                continue;
            }

            let Some(first) = self.nested_item(&candidate, depth) else {
                continue;
            };
            let mut copies = vec![first];
            while copies.len() < names.len() {
                let extra = self.charged_copy(&copies[0].0, copies[0].1);
                copies.push(extra);
            }
            for (name, (nested, nested_size)) in names.iter().zip(copies) {
                size += nested_size;
                item.properties.push(name, Value::from(nested));
            }
        }

        self.in_progress.remove(&root.id);

        tracing::trace!(types = ?item.types, properties = item.properties.len(), size, depth, "built item");

        self.built.insert(
            root.id,
            Built {
                item: item.clone(),
                size,
            },
        );
        (item, size)
    }

    /// The item for a nested `itemscope` property element, with its size.
    fn nested_item(&mut self, node: &NodeRef<'a>, depth: usize) -> Option<(Item, usize)> {
        if self.in_progress.contains(&node.id) {
            tracing::debug!("itemref cycle detected; skipping property");
            return None;
        }

        if let Some(size) = self.built.get(&node.id).map(|memo| memo.size) {
            let charged = self.charge(size);
            return self.built.get(&node.id).map(|memo| {
                if charged {
                    (memo.item.clone(), size)
                } else {
                    (truncated(&memo.item), 1)
                }
            });
        }

        if !self.charge(1) {
            return Some((bare_item(node), 1));
        }
        Some(self.build_at(node, depth + 1))
    }

    /// Another copy of an item placed under a further property name.
    fn charged_copy(&mut self, item: &Item, size: usize) -> (Item, usize) {
        if self.charge(size) {
            (item.clone(), size)
        } else {
            (truncated(item), 1)
        }
    }

    /// Take `items` from the budget; false when not enough is left.
    fn charge(&mut self, items: usize) -> bool {
        if items <= self.remaining {
            self.remaining -= items;
            return true;
        }
        if !self.budget_warned {
            tracing::warn!(max_items = self.max_items, "item budget exhausted; dropping properties of further nested items");
            self.budget_warned = true;
        }
        false
    }

    /// Property candidates of `root`: its subtree, then each `itemref` target
    /// with its subtree, de-duplicated by node identity in first-seen order.
    fn candidates(&self, root: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut out = Vec::new();

        let mut add = |node: NodeRef<'a>| {
            if node.id != root.id && seen.insert(node.id) {
                out.push(node);
            }
        };

        for node in scope_elements(root) {
            add(node);
        }

        let refs = dom::attribute_tokens(root, ITEMREF);
        for target in self.index.resolve(&refs) {
            add(target);
            if !dom::is_item_scope(&target) {
                for node in scope_elements(&target) {
                    add(node);
                }
            }
        }

        out
    }
}

/// An item with the types and id of `root` and no properties.
fn bare_item(root: &NodeRef<'_>) -> Item {
    let types = dom::attribute_tokens(root, ITEMTYPE);
    let id = if types.is_empty() {
        None
    } else {
        dom::get_attribute(root, ITEMID)
    };
    Item {
        types,
        properties: Properties::default(),
        id,
    }
}

/// `item` without its properties.
fn truncated(item: &Item) -> Item {
    Item {
        types: item.types.clone(),
        properties: Properties::default(),
        id: item.id.clone(),
    }
}

/// Elements below `node`, not descending into nested item scopes.
fn scope_elements<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    dom::descendant_elements(node, |n| !dom::is_item_scope(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{all_elements, Document};

    fn build_by_id(html: &str, id: &str) -> Item {
        let doc = Document::from(html);
        let elements = all_elements(&doc);
        let index = IdIndex::build(&elements);
        let Some(root) = index.get(id) else {
            panic!("no element #{id}");
        };
        ItemBuilder::new(&index, None, 64, 10_000).build(&root)
    }

    fn texts<'i>(item: &'i Item, name: &str) -> Vec<&'i str> {
        item.properties
            .get(name)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_text)
            .collect()
    }

    #[test]
    fn types_and_id() {
        let item = build_by_id(
            r#"<ul id="r" itemscope itemtype="http://example.com/Book  http://example.com/Work" itemid="urn:isbn:1"></ul>"#,
            "r",
        );
        assert_eq!(item.types, vec!["http://example.com/Book", "http://example.com/Work"]);
        assert_eq!(item.id.as_deref(), Some("urn:isbn:1"));
    }

    #[test]
    fn id_ignored_without_type() {
        let item = build_by_id(r#"<div id="r" itemscope itemid="urn:x"></div>"#, "r");
        assert!(item.types.is_empty());
        assert!(item.id.is_none());
    }

    #[test]
    fn multiple_names_on_one_element() {
        let item = build_by_id(r#"<div id="r" itemscope><span itemprop="a b a">v</span></div>"#, "r");
        assert_eq!(item.properties.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(texts(&item, "a"), vec!["v", "v"]);
        assert_eq!(texts(&item, "b"), vec!["v"]);
    }

    #[test]
    fn nested_scope_interior_not_scanned() {
        let item = build_by_id(
            r#"<div id="r" itemscope>
                 <span itemprop="name">outer</span>
                 <div itemprop="child" itemscope><span itemprop="name">inner</span></div>
               </div>"#,
            "r",
        );
        assert_eq!(texts(&item, "name"), vec!["outer"]);
        let Some(child) = item.property("child").and_then(Value::as_item) else {
            panic!("child item missing");
        };
        assert_eq!(child.text("name"), Some("inner"));
    }

    #[test]
    fn itemref_targets_follow_subtree_in_token_order() {
        let item = build_by_id(
            r#"<div id="r" itemscope itemref="second first missing"><span itemprop="p">own</span></div>
               <p id="first" itemprop="p">one</p>
               <ul id="second"><li itemprop="p">two</li></ul>"#,
            "r",
        );
        assert_eq!(texts(&item, "p"), vec!["own", "two", "one"]);
    }

    #[test]
    fn duplicate_refs_counted_once() {
        let item = build_by_id(
            r#"<div id="r" itemscope itemref="x x"><b id="x" itemprop="p">v</b></div>"#,
            "r",
        );
        assert_eq!(texts(&item, "p"), vec!["v"]);
    }

    #[test]
    fn self_reference_terminates() {
        let item = build_by_id(
            r#"<div id="r" itemscope itemprop="me" itemref="r"><i itemprop="k">v</i></div>"#,
            "r",
        );
        assert_eq!(texts(&item, "k"), vec!["v"]);
        assert!(item.property("me").is_none());
    }

    #[test]
    fn mutual_itemref_cycle_terminates() {
        let item = build_by_id(
            r#"<div id="a" itemprop="peer" itemscope itemref="b"><i itemprop="x">1</i></div>
               <div id="b" itemprop="peer" itemscope itemref="a"><i itemprop="y">2</i></div>"#,
            "a",
        );
        assert_eq!(item.text("x"), Some("1"));
        let Some(peer) = item.property("peer").and_then(Value::as_item) else {
            panic!("peer missing");
        };
        assert_eq!(peer.text("y"), Some("2"));
        assert!(peer.property("x").is_none());
        assert!(peer.property("peer").is_none());
    }

    #[test]
    fn depth_limit_drops_properties_of_deep_items() {
        let doc = Document::from(
            r#"<div id="r" itemscope><div itemprop="a" itemscope itemtype="t:A"><div itemprop="b" itemscope itemtype="t:B"><i itemprop="c">x</i></div></div></div>"#,
        );
        let elements = all_elements(&doc);
        let index = IdIndex::build(&elements);
        let Some(root) = index.get("r") else {
            panic!("no root");
        };
        let item = ItemBuilder::new(&index, None, 2, 10_000).build(&root);
        let Some(a) = item.property("a").and_then(Value::as_item) else {
            panic!("a missing");
        };
        let Some(b) = a.property("b").and_then(Value::as_item) else {
            panic!("b missing");
        };
        assert_eq!(b.types, vec!["t:B"]);
        assert!(b.properties.is_empty());
    }

    #[test]
    fn item_budget_truncates_further_nested_items() {
        let doc = Document::from(
            r#"<div id="r" itemscope>
                 <div itemprop="a" itemscope itemtype="t:A" itemref="leaf"></div>
                 <div itemprop="b" itemscope itemtype="t:B" itemref="leaf"></div>
               </div>
               <div id="leaf" itemprop="leaf" itemscope itemtype="t:Leaf"><i itemprop="v">x</i></div>"#,
        );
        let elements = all_elements(&doc);
        let index = IdIndex::build(&elements);
        let Some(root) = index.get("r") else {
            panic!("no root");
        };
        let item = ItemBuilder::new(&index, None, 64, 2).build(&root);

        let Some(a) = item.property("a").and_then(Value::as_item) else {
            panic!("a missing");
        };
        let Some(leaf) = a.property("leaf").and_then(Value::as_item) else {
            panic!("leaf missing under a");
        };
        assert_eq!(leaf.text("v"), Some("x"));

        let Some(b) = item.property("b").and_then(Value::as_item) else {
            panic!("b missing");
        };
        assert_eq!(b.types, vec!["t:B"]);
        assert!(b.properties.is_empty());
    }

    #[test]
    fn repeated_names_share_one_built_item() {
        let item = build_by_id(
            r#"<div id="r" itemscope><div itemprop="x y" itemscope itemtype="t:N"><i itemprop="v">1</i></div></div>"#,
            "r",
        );
        let x = item.property("x").and_then(Value::as_item);
        let y = item.property("y").and_then(Value::as_item);
        assert!(x.is_some());
        assert_eq!(x, y);
    }
}

//! Microdata extraction.
//!
//! One pass over the document finds every `itemscope` element; those without
//! `itemprop` are top-level items and are built in document order. Items
//! carrying `itemprop` are only reachable as property values of the item
//! that owns them.
//!
//! Submodules:
//! - [`id_index`]: `id` lookup for `itemref`
//! - [`values`]: per-tag value rules
//! - [`builder`]: item construction, cycle guard and nesting bound

pub mod builder;
pub mod id_index;
pub mod values;

use url::Url;

use crate::dom::{self, Document, NodeRef};
use crate::error::Result;
use crate::options::Options;
use crate::result::{Item, Microdata};
use crate::url_utils;

pub use builder::ItemBuilder;
pub use id_index::IdIndex;
pub use values::ValueRule;

/// Extract all top-level items from a parsed document.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidUrl`] if `options.base_url` is set but
/// cannot be parsed. Extraction itself never fails.
pub fn extract(doc: &Document, options: &Options) -> Result<Microdata> {
    let configured = options.parsed_base_url()?;
    let elements = dom::all_elements(doc);
    let base = url_utils::effective_base(configured, base_href(&elements).as_deref());

    let index = IdIndex::build(&elements);
    let roots = top_level_roots(&elements);

    tracing::debug!(
        elements = elements.len(),
        ids = index.len(),
        top_level = roots.len(),
        base = base.as_ref().map(Url::as_str),
        "extracting microdata"
    );

    let mut builder = ItemBuilder::new(&index, base.as_ref(), options.max_depth, options.max_items);
    let items: Vec<Item> = roots.iter().map(|root| builder.build(root)).collect();

    Ok(Microdata { items })
}

/// Elements that carry `itemscope` but no `itemprop`, in document order.
///
/// The scan is not bounded by item scopes: nested top-level candidates are
/// found as well.
#[must_use]
pub fn top_level_roots<'a>(elements: &[NodeRef<'a>]) -> Vec<NodeRef<'a>> {
    elements
        .iter()
        .filter(|node| dom::is_item_scope(node) && !dom::is_property(node))
        .copied()
        .collect()
}

/// `href` of the first `<base>` element that has one.
fn base_href(elements: &[NodeRef]) -> Option<String> {
    elements
        .iter()
        .filter(|node| dom::tag_name(node).as_deref() == Some("base"))
        .find_map(|node| dom::get_attribute(node, "href"))
}

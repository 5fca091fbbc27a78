//! Property value extraction.
//!
//! Every element contributing a property is classified into exactly one
//! [`ValueRule`]; the rule decides where the value comes from.

use url::Url;

use crate::dom::{self, NodeRef};
use crate::url_utils;

/// Where a property element's value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// `itemscope` element: a nested item.
    NestedItem,
    /// `meta`: the `content` attribute.
    Content,
    /// Media elements: `src`, resolved against the base URL.
    Source,
    /// Hyperlinks: `href`, resolved against the base URL.
    Link,
    /// `data`/`meter`: the `value` attribute, else text content.
    ValueAttribute,
    /// `time`: the `datetime` attribute, else text content.
    DateTime,
    /// Anything else: descendant text.
    TextContent,
}

impl ValueRule {
    /// Rule for a lowercase tag name, ignoring `itemscope`.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "meta" => Self::Content,
            "audio" | "embed" | "iframe" | "img" | "source" | "track" | "video" => Self::Source,
            "a" | "area" | "link" => Self::Link,
            "data" | "meter" => Self::ValueAttribute,
            "time" => Self::DateTime,
            _ => Self::TextContent,
        }
    }

    /// Rule for an element. `itemscope` takes precedence over the tag.
    #[must_use]
    pub fn for_element(node: &NodeRef) -> Self {
        if dom::is_item_scope(node) {
            return Self::NestedItem;
        }
        dom::tag_name(node).map_or(Self::TextContent, |tag| Self::for_tag(&tag))
    }
}

/// Text value of `node` under `rule`.
///
/// Returns `None` only for [`ValueRule::NestedItem`], whose value is built by
/// the item builder. Missing attributes yield an empty string.
#[must_use]
pub fn extract_text(node: &NodeRef, rule: ValueRule, base: Option<&Url>) -> Option<String> {
    let text = match rule {
        ValueRule::NestedItem => return None,
        ValueRule::Content => dom::get_attribute(node, "content").unwrap_or_default(),
        ValueRule::Source => url_attribute(node, "src", base),
        ValueRule::Link => url_attribute(node, "href", base),
        ValueRule::ValueAttribute => attribute_or_text(node, "value"),
        ValueRule::DateTime => attribute_or_text(node, "datetime"),
        ValueRule::TextContent => dom::text_content(node).to_string(),
    };
    Some(text)
}

fn url_attribute(node: &NodeRef, name: &str, base: Option<&Url>) -> String {
    node.attr(name)
        .map(|raw| url_utils::resolve_url(&raw, base))
        .unwrap_or_default()
}

fn attribute_or_text(node: &NodeRef, name: &str) -> String {
    dom::get_attribute(node, name).unwrap_or_else(|| dom::text_content(node).to_string())
}

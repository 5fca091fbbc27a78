//! Result types for extraction output.
//!
//! This module defines the item forest produced by the extractor and its
//! serialized shape:
//!
//! ```json
//! {"items":[{"type":["http://example.com/Person"],"properties":{"name":["Penelope"]}}]}
//! ```
//!
//! Property keys are emitted in lexicographic order; each key's values keep
//! discovery order. `id` is only present when one was recorded.

use std::collections::{BTreeMap, HashMap};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A property value: plain text or a nested item owned by this slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Text, attribute content or resolved URL.
    Text(String),
    /// Nested item.
    Item(Box<Item>),
}

impl Value {
    /// The text of a `Value::Text`, `None` for nested items.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Item(_) => None,
        }
    }

    /// The nested item of a `Value::Item`, `None` for text.
    #[must_use]
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Text(_) => None,
            Self::Item(item) => Some(item),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Self::Item(Box::new(item))
    }
}

/// Property names mapped to their values, in discovery order.
///
/// Keys are unique; pushing under an existing key appends to its values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, Vec<Value>)>,
    positions: HashMap<String, usize>,
}

impl Properties {
    /// Append `value` under `name`, creating the key on first use.
    pub fn push(&mut self, name: &str, value: Value) {
        if let Some(&position) = self.positions.get(name) {
            self.entries[position].1.push(value);
        } else {
            self.positions.insert(name.to_string(), self.entries.len());
            self.entries.push((name.to_string(), vec![value]));
        }
    }

    /// Values recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.positions
            .get(name)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Number of distinct property names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no property was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&str, &[Value]> = self.iter().collect();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (key, values) in sorted {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// A typed bag of properties rooted at one `itemscope` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    /// `itemtype` tokens in document order. Empty when none declared.
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Properties keyed by `itemprop` name.
    pub properties: Properties,

    /// `itemid`, only recorded for typed items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Item {
    /// First value recorded for `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).and_then(<[Value]>::first)
    }

    /// Text of the first value recorded for `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_text)
    }
}

/// Extraction result: the top-level items of one document in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Microdata {
    /// Top-level items.
    pub items: Vec<Item>,
}

impl Microdata {
    /// Compact JSON rendering of the result.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures, which do not occur for this shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON rendering of the result.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures, which do not occur for this shape.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The result as a `serde_json::Value` tree.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures, which do not occur for this shape.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

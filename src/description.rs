//! Declarative node descriptions.
//!
//! A [`NodeDescription`] describes one element and, recursively, its subtree.
//! Descriptions are plain data: they can be assembled in code with the
//! builder-style helpers or loaded from JSON.
//!
//! ```
//! use trellis::NodeDescription;
//!
//! let json = r#"{
//!     "elementType": "div",
//!     "metadataTags": { "state": "box" },
//!     "children": [{ "elementType": "span", "text": "hi" }]
//! }"#;
//! let desc = NodeDescription::from_json(json).unwrap();
//! assert_eq!(desc.element_type.as_deref(), Some("div"));
//! assert_eq!(desc.metadata_tags.get("state"), Some("box"));
//! ```

use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use trellis_core::BoundaryMode;

/// An ordered list of `(name, value)` pairs.
///
/// Serialized as a map; document order is kept on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairs(Vec<(String, String)>);

impl Pairs {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a pair, replacing the value of an existing name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Pairs {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut pairs = Self::new();
        for (name, value) in iter {
            pairs.insert(name, value);
        }
        pairs
    }
}

impl Serialize for Pairs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Pairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Pairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Pairs, A::Error> {
                let mut pairs = Pairs::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    pairs.insert(name, value);
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

/// An event declared on a node: fire `action_name` when `event_type` happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescription {
    /// Event type, such as `click`.
    #[serde(rename = "type", default)]
    pub event_type: String,
    /// Name looked up in the action registry.
    #[serde(default)]
    pub action_name: String,
    /// Caller-chosen identifier handed to the handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl EventDescription {
    /// Declares `action_name` to run on `event_type`.
    pub fn new(event_type: impl Into<String>, action_name: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            action_name: action_name.into(),
            node_id: None,
        }
    }

    /// Sets the node identifier handed to the handler.
    #[must_use]
    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }
}

/// Description of one element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    /// Tag name. A description without one is rejected by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// Plain attributes.
    #[serde(default, skip_serializing_if = "Pairs::is_empty")]
    pub attributes: Pairs,
    /// Attributes set through the namespaced setter, namespace taken from the prefix.
    #[serde(default, skip_serializing_if = "Pairs::is_empty")]
    pub namespaced_attributes: Pairs,
    /// Dataset entries. The state tag also registers the element by key.
    #[serde(default, skip_serializing_if = "Pairs::is_empty")]
    pub metadata_tags: Pairs,
    /// Plain text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw markup content.
    #[serde(default, alias = "html", skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    /// Declared event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventDescription>,
    /// Child descriptions in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
    /// Attach an isolated rendering boundary and build children inside it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_boundary_mode: Option<BoundaryMode>,
}

impl NodeDescription {
    /// Starts a description for `element_type`.
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: Some(element_type.into()),
            ..Self::default()
        }
    }

    /// Parses a description tree from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the description tree to JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Returns the element type when present and non-empty.
    #[must_use]
    pub fn element_type(&self) -> Option<&str> {
        self.element_type.as_deref().filter(|ty| !ty.is_empty())
    }

    /// Adds a plain attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Adds a namespaced attribute.
    #[must_use]
    pub fn namespaced_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.namespaced_attributes.insert(name, value);
        self
    }

    /// Adds a metadata tag.
    #[must_use]
    pub fn metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata_tags.insert(name, value);
        self
    }

    /// Sets plain text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets raw markup content.
    #[must_use]
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html_content = Some(html.into());
        self
    }

    /// Declares an event.
    #[must_use]
    pub fn event(mut self, event: EventDescription) -> Self {
        self.event = Some(event);
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Requests a rendering boundary.
    #[must_use]
    pub const fn boundary(mut self, mode: BoundaryMode) -> Self {
        self.render_boundary_mode = Some(mode);
        self
    }

    /// Counts the descriptions in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_attribute_order() {
        let desc = NodeDescription::from_json(
            r#"{"elementType":"svg","attributes":{"width":"10","height":"10","viewBox":"0 0 10 10"}}"#,
        )
        .unwrap();
        let names: Vec<_> = desc.attributes.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["width", "height", "viewBox"]);
    }

    #[test]
    fn json_reads_events_boundaries_and_html_alias() {
        let desc = NodeDescription::from_json(
            r#"{
                "elementType": "section",
                "renderBoundaryMode": "closed",
                "html": "<b>x</b>",
                "event": {"type": "click", "actionName": "save", "nodeId": "n7"}
            }"#,
        )
        .unwrap();
        assert_eq!(desc.render_boundary_mode, Some(BoundaryMode::Closed));
        assert_eq!(desc.html_content.as_deref(), Some("<b>x</b>"));
        assert_eq!(
            desc.event,
            Some(EventDescription::new("click", "save").with_node_id("n7"))
        );
    }

    #[test]
    fn missing_element_type_is_representable() {
        let desc = NodeDescription::from_json(r#"{"text":"orphan"}"#).unwrap();
        assert_eq!(desc.element_type(), None);
        assert_eq!(NodeDescription::new("").element_type(), None);
    }

    #[test]
    fn builder_helpers_compose() {
        let desc = NodeDescription::new("ul")
            .metadata("state", "list")
            .child(NodeDescription::new("li").text("one"))
            .child(NodeDescription::new("li").text("two"));
        assert_eq!(desc.node_count(), 3);

        let back = NodeDescription::from_json(&desc.to_json().unwrap()).unwrap();
        assert_eq!(back, desc);
    }
}

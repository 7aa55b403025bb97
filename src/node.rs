//! Content nodes exchanged with the page authoring endpoints.
//!
//! On the wire a text node is a bare JSON string and an element is an object
//! `{"tag": .., "attrs": {..}, "children": [..]}` whose `attrs` and `children`
//! are omitted when empty.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node of page content: either a run of text or an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// An element node. An empty `attrs` map means "no attributes".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attrs: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// An element with no attributes and no children, such as `br` or `hr`.
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element(Element {
            tag: tag.into(),
            ..Element::default()
        })
    }

    pub fn element_with(
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<Node>,
    ) -> Self {
        Node::Element(Element {
            tag: tag.into(),
            attrs,
            children,
        })
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => Some(&element.tag),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Element(element) => &element.children,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// Concatenated text of this node and all of its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

//! DOM Node
//!
//! Arena-resident node data. Links are `NodeId`s into the owning
//! [`DomTree`](crate::DomTree); shadow roots are parentless nodes that
//! point back at their host.

use std::collections::BTreeMap;

use crate::forms::ControlState;
use crate::shadow::ShadowRootData;
use crate::style::InlineStyle;
use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (`None` for the document, shadow roots and detached nodes)
    pub(crate) parent: Option<NodeId>,
    /// Children in tree order
    pub(crate) children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(TextData { content: content.into() }))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a shadow root node
    pub fn shadow_root(data: ShadowRootData) -> Self {
        Self::with_data(NodeData::ShadowRoot(data))
    }

    fn with_data(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in tree order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Shadow root attached to a host element
    ShadowRoot(ShadowRootData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase local name
    tag: String,
    /// Attributes in insertion order
    attrs: Vec<Attribute>,
    /// Inline `style` declarations
    pub style: InlineStyle,
    /// Form control state for `<input>` and `<button>`
    pub(crate) control: Option<ControlState>,
    /// IDL properties assigned on non-control elements
    pub(crate) properties: BTreeMap<String, String>,
    /// Attached shadow root
    pub(crate) shadow_root: Option<NodeId>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let control = ControlState::for_tag(&tag);
        Self {
            tag,
            attrs: Vec::new(),
            style: InlineStyle::default(),
            control,
            properties: BTreeMap::new(),
            shadow_root: None,
        }
    }

    /// Local name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        None
    }

    /// Remove an attribute, returning the previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(idx).value)
    }

    /// Attributes in insertion order
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Classes from the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Form control state, if this element is a native control
    pub fn control(&self) -> Option<&ControlState> {
        self.control.as_ref()
    }

    /// Attached shadow root, regardless of mode
    pub fn shadow_root(&self) -> Option<NodeId> {
        self.shadow_root
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_returns_previous() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag(), "div");
        assert_eq!(elem.set_attr("id", "a"), None);
        assert_eq!(elem.set_attr("id", "b"), Some("a".to_string()));
        assert_eq!(elem.get_attr("id"), Some("b"));
        assert_eq!(elem.remove_attr("id"), Some("b".to_string()));
        assert_eq!(elem.remove_attr("id"), None);
    }

    #[test]
    fn test_classes() {
        let mut elem = ElementData::new("span");
        elem.set_attr("class", "error  big");
        assert!(elem.has_class("error"));
        assert!(elem.has_class("big"));
        assert!(!elem.has_class("err"));
    }

    #[test]
    fn test_controls_only_for_form_tags() {
        assert!(ElementData::new("input").control().is_some());
        assert!(ElementData::new("button").control().is_some());
        assert!(ElementData::new("span").control().is_none());
    }
}

//! Document - High-level document API
//!
//! Owns the tree together with everything hung off it: listeners, custom
//! element instances, `ElementInternals` and the submission log.

use std::collections::{HashMap, HashSet};

use crate::custom_elements::{CustomElement, CustomElementRegistry};
use crate::error::DomError;
use crate::events::EventListeners;
use crate::forms::{ControlState, ElementInternals, FormSubmission, ValidationReport};
use crate::node::{ElementData, Node};
use crate::style::InlineStyle;
use crate::{DomTree, NodeId};

/// Attributes that set the same-named state on `<input>` and `<button>`
const REFLECTED_CONTROL_ATTRS: &[&str] = &[
    "value", "type", "name", "placeholder", "pattern", "required", "disabled",
];

/// Host capabilities that can be switched off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Form-associated custom elements get `ElementInternals`
    pub form_association: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self { form_association: true }
    }
}

/// HTML Document
pub struct Document {
    pub(crate) tree: DomTree,
    pub(crate) options: DocumentOptions,
    pub(crate) listeners: EventListeners,
    pub(crate) registry: CustomElementRegistry,
    pub(crate) instances: HashMap<NodeId, Box<dyn CustomElement>>,
    pub(crate) internals: HashMap<NodeId, ElementInternals>,
    pub(crate) discarded: HashSet<NodeId>,
    pub(crate) submissions: Vec<FormSubmission>,
    pub(crate) validation_reports: Vec<ValidationReport>,
    body_element: NodeId,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // fresh nodes under the document node cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            options,
            listeners: EventListeners::default(),
            registry: CustomElementRegistry::new(),
            instances: HashMap::new(),
            internals: HashMap::new(),
            discarded: HashSet::new(),
            submissions: Vec::new(),
            validation_reports: Vec::new(),
            body_element: body,
        }
    }

    pub fn options(&self) -> DocumentOptions {
        self.options
    }

    /// `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Underlying tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.tree.get(id).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.tree
            .get_mut(id)
            .ok_or(DomError::NodeNotFound(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    // ---- tree ----

    /// Create an element, upgrading it when its tag is a defined custom
    /// element
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        let id = self.tree.create_element(tag);
        self.upgrade(id)?;
        Ok(id)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append `child` to `parent`, running connection reactions for the
    /// moved subtree
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let was_connected = self.tree.is_connected(child);
        self.tree.append_child(parent, child)?;

        let subtree = self.tree.shadow_including_inclusive_descendants(child);
        if was_connected {
            self.disconnected_reactions(&subtree);
        }
        if self.tree.is_connected(child) {
            self.connected_reactions(&subtree);
        }
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let was_connected = self.tree.is_connected(child);
        self.tree.remove_child(parent, child)?;
        if was_connected {
            let subtree = self.tree.shadow_including_inclusive_descendants(child);
            self.disconnected_reactions(&subtree);
        }
        Ok(())
    }

    /// Detach `node` and drop every instance, internals and listener in its
    /// subtree. The ids stay allocated but are dead.
    pub fn discard(&mut self, node: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.node(node)?.parent() {
            self.remove_child(parent, node)?;
        }
        for id in self.tree.shadow_including_inclusive_descendants(node) {
            self.instances.remove(&id);
            self.internals.remove(&id);
            self.listeners.remove_node(id);
            self.discarded.insert(id);
        }
        tracing::debug!("Discarded {:?}", node);
        Ok(())
    }

    pub fn is_discarded(&self, node: NodeId) -> bool {
        self.discarded.contains(&node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.get(node).and_then(Node::parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.tree.children(node)
    }

    /// Light-tree descendants in tree order
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.descendants(node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_connected(node)
    }

    /// Tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree.get(node)?.as_element().map(ElementData::tag)
    }

    // ---- attributes ----

    /// Set an attribute and run the `attribute_changed` reaction if it is
    /// observed
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        let element = self.element_mut(node)?;
        let old = element.set_attr(&name, value);
        if let Some(control) = element.control.as_mut() {
            if REFLECTED_CONTROL_ATTRS.contains(&name.as_str()) {
                control.set_property(&name, Some(value));
            }
        }
        self.attribute_changed_reaction(node, &name, old.as_deref(), Some(value))
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        let element = self.element_mut(node)?;
        let Some(old) = element.remove_attr(&name) else {
            return Ok(());
        };
        if let Some(control) = element.control.as_mut() {
            if REFLECTED_CONTROL_ATTRS.contains(&name.as_str()) {
                control.set_property(&name, None);
            }
        }
        self.attribute_changed_reaction(node, &name, Some(&old), None)
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok()?.get_attr(&name.to_ascii_lowercase())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    // ---- properties ----

    /// `element[name] = value`. `None` stands for `null`/`false`.
    pub fn set_property(&mut self, node: NodeId, name: &str, value: Option<&str>) -> Result<(), DomError> {
        let element = self.element_mut(node)?;
        match element.control.as_mut() {
            Some(control) => control.set_property(name, value),
            None => match value {
                Some(v) => {
                    element.properties.insert(name.to_string(), v.to_string());
                }
                None => {
                    element.properties.remove(name);
                }
            },
        }
        tracing::trace!("Property {} on {:?} = {:?}", name, node, value);
        Ok(())
    }

    /// `element[name]`: custom element getters, then built-in properties,
    /// then previously assigned values
    pub fn property(&self, node: NodeId, name: &str) -> Option<String> {
        if let Some(value) = self.instances.get(&node).and_then(|i| i.property(self, name)) {
            return Some(value);
        }
        let element = self.element(node).ok()?;
        match name {
            "tagName" => return Some(element.tag().to_ascii_uppercase()),
            "id" => return Some(element.get_attr("id").unwrap_or_default().to_string()),
            _ => {}
        }
        if let Some(value) = element.control.as_ref().and_then(|c| c.property(name)) {
            return Some(value);
        }
        element.properties.get(name).cloned()
    }

    /// Native control state
    pub fn control(&self, node: NodeId) -> Option<&ControlState> {
        self.tree.get(node)?.as_element()?.control()
    }

    pub fn control_value(&self, node: NodeId) -> Option<&str> {
        self.control(node).map(|c| c.value.as_str())
    }

    pub fn set_control_value(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.set_property(node, "value", Some(value))
    }

    /// Disabled through the property or the attribute
    pub fn is_disabled(&self, node: NodeId) -> Result<bool, DomError> {
        let element = self.element(node)?;
        Ok(element.control().is_some_and(|c| c.disabled) || element.get_attr("disabled").is_some())
    }

    // ---- style & classes ----

    pub fn style(&self, node: NodeId) -> Option<&InlineStyle> {
        Some(&self.tree.get(node)?.as_element()?.style)
    }

    /// `element.style[prop] = value`; returns `false` when the value was
    /// rejected
    pub fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>) -> Result<bool, DomError> {
        Ok(self.element_mut(node)?.style.set(property, value))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let element = self.element(node)?;
        if element.has_class(class) {
            return Ok(());
        }
        let classes = match element.get_attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &classes)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_ok_and(|e| e.has_class(class))
    }

    // ---- queries ----

    /// Elements under `root` carrying `class`, in tree order
    pub fn elements_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.tree
            .descendants(root)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    pub fn first_element_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.tree
            .descendants(root)
            .into_iter()
            .find(|&id| self.tag_name(id) == Some(tag.as_str()))
    }

    /// Concatenated text of `node` and its light-tree descendants
    pub fn text_content(&self, node: NodeId) -> String {
        std::iter::once(node)
            .chain(self.tree.descendants(node))
            .filter_map(|id| self.tree.get(id)?.as_text())
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let doc = Document::new();
        let body = doc.body();
        assert_eq!(doc.tag_name(body), Some("body"));
        assert!(doc.is_connected(body));
        assert_eq!(doc.first_element_by_tag(NodeId::ROOT, "HEAD").map(|h| doc.tag_name(h)), Some(Some("head")));
    }

    #[test]
    fn test_attributes_reflect_into_controls() {
        let mut doc = Document::new();
        let input = doc.create_element("input").unwrap();
        doc.set_attribute(input, "Required", "").unwrap();
        assert!(doc.has_attribute(input, "required"));
        assert!(doc.control(input).unwrap().required);

        doc.remove_attribute(input, "required").unwrap();
        assert!(!doc.control(input).unwrap().required);
    }

    #[test]
    fn test_properties() {
        let mut doc = Document::new();
        let input = doc.create_element("input").unwrap();
        doc.set_property(input, "placeholder", Some("Search")).unwrap();
        assert_eq!(doc.property(input, "placeholder").as_deref(), Some("Search"));
        assert_eq!(doc.property(input, "tagName").as_deref(), Some("INPUT"));

        let div = doc.create_element("div").unwrap();
        doc.set_property(div, "title", Some("x")).unwrap();
        assert_eq!(doc.property(div, "title").as_deref(), Some("x"));
        assert_eq!(doc.property(div, "value"), None);
    }

    #[test]
    fn test_classes_and_queries() {
        let mut doc = Document::new();
        let span = doc.create_element("span").unwrap();
        doc.add_class(span, "error").unwrap();
        doc.add_class(span, "error").unwrap();
        doc.add_class(span, "big").unwrap();
        assert_eq!(doc.get_attribute(span, "class"), Some("error big"));

        let text = doc.create_text("oops");
        doc.append_child(span, text).unwrap();
        doc.append_child(doc.body(), span).unwrap();
        assert_eq!(doc.elements_by_class(doc.body(), "error"), vec![span]);
        assert_eq!(doc.text_content(span), "oops");
    }

    #[test]
    fn test_discard_drops_listeners() {
        let mut doc = Document::new();
        let div = doc.create_element("div").unwrap();
        doc.append_child(doc.body(), div).unwrap();
        doc.add_event_listener(div, "x", std::rc::Rc::new(|_: &mut Document, _: &mut crate::Event| {}))
            .unwrap();
        doc.discard(div).unwrap();
        assert_eq!(doc.listener_count(div, "x"), 0);
        assert!(doc.children(doc.body()).is_empty());
        assert!(doc.is_discarded(div));
    }
}

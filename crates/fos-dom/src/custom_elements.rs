//! Custom Elements
//!
//! Registry, element definitions and lifecycle reactions. Element instances
//! are owned by the [`Document`]; while a reaction runs the instance is
//! taken out of the document so it can receive `&mut Document`. Reactions
//! triggered re-entrantly on the same element during that window are
//! skipped.

use std::any::Any;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use crate::document::Document;
use crate::error::DomError;
use crate::forms::ElementInternals;
use crate::NodeId;

/// Error returned by a lifecycle reaction
pub type ReactionError = Box<dyn Error + Send + Sync>;

pub type ReactionResult = Result<(), ReactionError>;

/// Builds the instance for a newly created (or upgraded) element
pub type ElementConstructor =
    Rc<dyn Fn(&mut Document, NodeId) -> Result<Box<dyn CustomElement>, ReactionError>>;

/// Behaviour of an autonomous custom element
pub trait CustomElement: Any {
    /// Element became connected to the document
    fn connected(&mut self, _doc: &mut Document) {}

    /// Element was removed from the document
    fn disconnected(&mut self, _doc: &mut Document) {}

    /// An observed attribute changed
    fn attribute_changed(
        &mut self,
        _doc: &mut Document,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> ReactionResult {
        Ok(())
    }

    /// IDL property getter; `None` falls back to the host element
    fn property(&self, _doc: &Document, _name: &str) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Custom element definition
#[derive(Clone)]
pub struct CustomElementDefinition {
    pub name: String,
    pub observed_attributes: Vec<String>,
    /// Whether elements get `ElementInternals` and join forms
    pub form_associated: bool,
    pub constructor: ElementConstructor,
}

impl CustomElementDefinition {
    pub fn new(name: &str, constructor: ElementConstructor) -> Self {
        Self {
            name: name.to_string(),
            observed_attributes: Vec::new(),
            form_associated: false,
            constructor,
        }
    }

    pub fn with_observed_attributes(mut self, attrs: &[&str]) -> Self {
        self.observed_attributes = attrs.iter().map(|a| a.to_ascii_lowercase()).collect();
        self
    }

    pub fn form_associated(mut self, form_associated: bool) -> Self {
        self.form_associated = form_associated;
        self
    }

    pub fn observes(&self, attr: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == attr)
    }
}

impl fmt::Debug for CustomElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomElementDefinition")
            .field("name", &self.name)
            .field("observed_attributes", &self.observed_attributes)
            .field("form_associated", &self.form_associated)
            .finish_non_exhaustive()
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("'{0}' is not a valid custom element name")]
    InvalidName(String),
    #[error("'{0}' has already been defined as a custom element")]
    AlreadyDefined(String),
}

/// Custom elements registry
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, CustomElementDefinition>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    pub fn define(&mut self, definition: CustomElementDefinition) -> Result<(), CustomElementError> {
        let name = definition.name.clone();
        if !Self::is_valid_name(&name) {
            return Err(CustomElementError::InvalidName(name));
        }
        if self.definitions.contains_key(&name) {
            return Err(CustomElementError::AlreadyDefined(name));
        }
        self.definitions.insert(name, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CustomElementDefinition> {
        self.definitions.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Validate custom element name
    pub fn is_valid_name(name: &str) -> bool {
        // Must contain hyphen
        if !name.contains('-') {
            return false;
        }

        // Must start with lowercase letter
        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return false;
        }

        const RESERVED: &[&str] = &[
            "annotation-xml", "color-profile", "font-face",
            "font-face-src", "font-face-uri", "font-face-format",
            "font-face-name", "missing-glyph",
        ];
        if RESERVED.contains(&name) {
            return false;
        }

        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
    }
}

impl Document {
    /// Define a custom element and upgrade matching connected elements
    pub fn define_element(&mut self, definition: CustomElementDefinition) -> Result<(), DomError> {
        let name = definition.name.clone();
        self.registry.define(definition)?;
        tracing::debug!("Defined custom element <{}>", name);

        let candidates: Vec<NodeId> = self
            .tree
            .shadow_including_inclusive_descendants(NodeId::ROOT)
            .into_iter()
            .filter(|&id| self.tree.get(id).and_then(|n| n.as_element()).is_some_and(|e| e.tag() == name))
            .collect();
        let mut first_error = None;
        for node in candidates {
            if let Err(err) = self.upgrade(node) {
                tracing::warn!("Upgrading {:?} failed: {}", node, err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn custom_elements(&self) -> &CustomElementRegistry {
        &self.registry
    }

    /// Whether `node` has a custom element instance
    pub fn is_custom(&self, node: NodeId) -> bool {
        self.instances.contains_key(&node)
    }

    /// Typed view of a custom element instance
    pub fn custom_element<T: CustomElement>(&self, node: NodeId) -> Option<&T> {
        self.instances.get(&node)?.as_any().downcast_ref::<T>()
    }

    /// Run `f` with the typed instance and the document
    pub fn with_custom_element<T: CustomElement, R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut T, &mut Document) -> R,
    ) -> Option<R> {
        let mut instance = self.instances.remove(&node)?;
        let result = instance
            .as_any_mut()
            .downcast_mut::<T>()
            .map(|element| f(element, self));
        if !self.discarded.contains(&node) {
            self.instances.entry(node).or_insert(instance);
        }
        result
    }

    /// Run the element constructor if `node`'s tag is defined
    pub(crate) fn upgrade(&mut self, node: NodeId) -> Result<(), DomError> {
        if self.instances.contains_key(&node) {
            return Ok(());
        }
        let tag = self.element(node)?.tag().to_string();
        let Some(definition) = self.registry.get(&tag).cloned() else {
            return Ok(());
        };

        if definition.form_associated && self.options.form_association {
            self.internals.insert(node, ElementInternals::new(node));
        }

        let instance = match (definition.constructor)(self, node) {
            Ok(instance) => instance,
            Err(source) => {
                self.internals.remove(&node);
                return Err(DomError::Construction { element: tag, source });
            }
        };
        self.instances.insert(node, instance);
        tracing::debug!("Upgraded <{}> {:?}", tag, node);

        let observed: Vec<(String, String)> = self
            .element(node)?
            .attrs()
            .iter()
            .filter(|a| definition.observes(&a.name))
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        // A failing reaction does not stop the upgrade; the first error is
        // reported once the element is fully upgraded.
        let mut first_error = None;
        for (name, value) in observed {
            if let Err(err) = self.attribute_changed_reaction(node, &name, None, Some(&value)) {
                first_error.get_or_insert(err);
            }
        }

        if self.is_connected(node) {
            self.run_reaction(node, |element, doc| element.connected(doc));
        }
        first_error.map_or(Ok(()), Err)
    }

    pub(crate) fn attribute_changed_reaction(
        &mut self,
        node: NodeId,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), DomError> {
        let Some(tag) = self.tree.get(node).and_then(|n| n.as_element()).map(|e| e.tag().to_string()) else {
            return Ok(());
        };
        let observes = self.registry.get(&tag).is_some_and(|d| d.observes(name));
        if !observes {
            return Ok(());
        }

        match self.run_reaction(node, |element, doc| element.attribute_changed(doc, name, old, new)) {
            Some(Err(source)) => Err(DomError::Reaction {
                element: tag,
                attribute: name.to_string(),
                source,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn connected_reactions(&mut self, nodes: &[NodeId]) {
        for &node in nodes {
            self.run_reaction(node, |element, doc| element.connected(doc));
        }
    }

    pub(crate) fn disconnected_reactions(&mut self, nodes: &[NodeId]) {
        for &node in nodes {
            self.run_reaction(node, |element, doc| element.disconnected(doc));
        }
    }

    fn run_reaction<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut dyn CustomElement, &mut Document) -> R,
    ) -> Option<R> {
        let mut instance = self.instances.remove(&node)?;
        let result = f(instance.as_mut(), self);
        if !self.discarded.contains(&node) {
            self.instances.entry(node).or_insert(instance);
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl CustomElement for Recorder {
        fn connected(&mut self, _doc: &mut Document) {
            self.log.borrow_mut().push("connected".into());
        }

        fn disconnected(&mut self, _doc: &mut Document) {
            self.log.borrow_mut().push("disconnected".into());
        }

        fn attribute_changed(
            &mut self,
            _doc: &mut Document,
            name: &str,
            old: Option<&str>,
            new: Option<&str>,
        ) -> ReactionResult {
            if new == Some("boom") {
                return Err("boom".into());
            }
            self.log.borrow_mut().push(format!("{}: {:?} -> {:?}", name, old, new));
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn define_recorder(doc: &mut Document) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let shared = log.clone();
        let constructor: ElementConstructor = Rc::new(move |_doc: &mut Document, _node: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
            Ok(Box::new(Recorder { log: shared.clone() }) as Box<dyn CustomElement>)
        });
        doc.define_element(CustomElementDefinition::new("x-rec", constructor).with_observed_attributes(&["label"]))
            .unwrap();
        log
    }

    #[test]
    fn test_valid_names() {
        assert!(CustomElementRegistry::is_valid_name("my-element"));
        assert!(CustomElementRegistry::is_valid_name("pj1-input"));
        assert!(CustomElementRegistry::is_valid_name("x-foo-bar"));
        assert!(!CustomElementRegistry::is_valid_name("myelement")); // no hyphen
        assert!(!CustomElementRegistry::is_valid_name("My-Element")); // uppercase
        assert!(!CustomElementRegistry::is_valid_name("1-element")); // starts with number
        assert!(!CustomElementRegistry::is_valid_name("font-face")); // reserved
    }

    #[test]
    fn test_define_twice_fails() {
        let mut doc = Document::new();
        define_recorder(&mut doc);
        let constructor: ElementConstructor =
            Rc::new(|_: &mut Document, _: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
                Ok(Box::new(Recorder::default()))
            });
        let again = CustomElementDefinition::new("x-rec", constructor);
        assert!(matches!(
            doc.define_element(again),
            Err(DomError::CustomElement(CustomElementError::AlreadyDefined(_)))
        ));
    }

    #[test]
    fn test_lifecycle_reactions() {
        let mut doc = Document::new();
        let log = define_recorder(&mut doc);
        let el = doc.create_element("x-rec").unwrap();
        doc.set_attribute(el, "label", "a").unwrap();
        doc.set_attribute(el, "title", "ignored").unwrap();
        doc.append_child(doc.body(), el).unwrap();
        doc.remove_child(doc.body(), el).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "label: None -> Some(\"a\")".to_string(),
                "connected".to_string(),
                "disconnected".to_string(),
            ]
        );
        assert!(doc.custom_element::<Recorder>(el).is_some());
    }

    #[test]
    fn test_upgrade_replays_attributes() {
        let mut doc = Document::new();
        let el = doc.create_element("x-rec").unwrap();
        doc.set_attribute(el, "label", "early").unwrap();
        doc.append_child(doc.body(), el).unwrap();
        assert!(!doc.is_custom(el));

        let log = define_recorder(&mut doc);
        assert!(doc.is_custom(el));
        assert_eq!(
            *log.borrow(),
            vec!["label: None -> Some(\"early\")".to_string(), "connected".to_string()]
        );
    }

    #[test]
    fn test_upgrade_completes_despite_reaction_error() {
        let mut doc = Document::new();
        let broken = doc.create_element("x-rec").unwrap();
        doc.set_attribute(broken, "label", "boom").unwrap();
        let fine = doc.create_element("x-rec").unwrap();
        doc.set_attribute(fine, "label", "ok").unwrap();
        doc.append_child(doc.body(), broken).unwrap();
        doc.append_child(doc.body(), fine).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let shared = log.clone();
        let constructor: ElementConstructor = Rc::new(move |_doc: &mut Document, _node: NodeId| -> Result<Box<dyn CustomElement>, ReactionError> {
            Ok(Box::new(Recorder { log: shared.clone() }) as Box<dyn CustomElement>)
        });
        let err = doc
            .define_element(CustomElementDefinition::new("x-rec", constructor).with_observed_attributes(&["label"]))
            .unwrap_err();
        assert!(matches!(err, DomError::Reaction { ref attribute, .. } if attribute == "label"));

        assert!(doc.is_custom(broken));
        assert!(doc.is_custom(fine));
        assert_eq!(
            *log.borrow(),
            vec![
                "connected".to_string(),
                "label: None -> Some(\"ok\")".to_string(),
                "connected".to_string(),
            ]
        );
    }

    #[test]
    fn test_reaction_error_propagates() {
        let mut doc = Document::new();
        define_recorder(&mut doc);
        let el = doc.create_element("x-rec").unwrap();
        let err = doc.set_attribute(el, "label", "boom").unwrap_err();
        assert!(matches!(err, DomError::Reaction { ref attribute, .. } if attribute == "label"));
    }
}

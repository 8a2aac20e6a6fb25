//! `<pj1-input>` element
//!
//! [`TextInput`] is the custom element instance the document owns;
//! [`StyledInput`] is the `Copy` handle callers use to reach it.

use std::any::Any;
use std::rc::Rc;

use fos_dom::forms::ValidityState;
use fos_dom::{
    CustomElement, Document, NodeId, ReactionResult, ShadowRootInit, ShadowRootMode,
};

use crate::annotation;
use crate::bridge::BridgeListeners;
use crate::error::InputError;
use crate::handler::{ChangeHandler, InstalledHandler};
use crate::participant;
use crate::reflector;
use crate::theme::InputTheme;
use crate::{CHANGE_EVENT, TAG_NAME};

/// Instance state of one `<pj1-input>`
#[derive(Debug)]
pub struct TextInput {
    pub(crate) host: NodeId,
    pub(crate) root: NodeId,
    /// The rendered `<input>`; lives as long as the instance
    pub(crate) input: NodeId,
    pub(crate) theme: Rc<InputTheme>,
    bridge: Option<BridgeListeners>,
    change_handler: Option<InstalledHandler>,
}

impl TextInput {
    /// Build the shadow tree for `host`
    pub(crate) fn construct(doc: &mut Document, host: NodeId, theme: Rc<InputTheme>) -> Result<Self, InputError> {
        let root = doc.attach_shadow(
            host,
            ShadowRootInit {
                mode: ShadowRootMode::Open,
                delegates_focus: true,
            },
        )?;

        let style = doc.create_element("style")?;
        let css = doc.create_text(&theme.stylesheet());
        doc.append_child(style, css)?;
        doc.append_child(root, style)?;

        let input = doc.create_element("input")?;
        doc.set_attribute(input, "type", "text")?;
        doc.add_class(input, "custom-input")?;
        doc.append_child(root, input)?;

        participant::sync_form_value(doc, host, input);
        tracing::debug!("Constructed <{}> {:?}", TAG_NAME, host);

        Ok(Self {
            host,
            root,
            input,
            theme,
            bridge: None,
            change_handler: None,
        })
    }

    /// Replace the `onchange` listener on the host
    pub(crate) fn install_handler(
        &mut self,
        doc: &mut Document,
        handler: Option<ChangeHandler>,
    ) -> Result<(), InputError> {
        if let Some(previous) = self.change_handler.take() {
            doc.remove_event_listener(previous.listener);
        }
        let Some(handler) = handler else {
            tracing::debug!("Cleared onchange handler on {:?}", self.host);
            return Ok(());
        };
        let listener = doc.add_event_listener(self.host, CHANGE_EVENT, handler.callback(self.host))?;
        tracing::debug!("Installed {:?} on {:?}", handler, self.host);
        self.change_handler = Some(InstalledHandler { handler, listener });
        Ok(())
    }

    pub(crate) fn handler(&self) -> Option<&ChangeHandler> {
        self.change_handler.as_ref().map(|installed| &installed.handler)
    }
}

impl CustomElement for TextInput {
    fn connected(&mut self, doc: &mut Document) {
        if self.bridge.is_none() {
            match BridgeListeners::attach(doc, self.host, self.input) {
                Ok(bridge) => self.bridge = Some(bridge),
                Err(err) => tracing::warn!("Failed to attach event bridge on {:?}: {}", self.host, err),
            }
        }
        participant::sync_form_value(doc, self.host, self.input);
        participant::update_validity(doc, self.host, self.input);
    }

    fn disconnected(&mut self, doc: &mut Document) {
        if let Some(bridge) = self.bridge.take() {
            bridge.detach(doc);
        }
    }

    fn attribute_changed(
        &mut self,
        doc: &mut Document,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> ReactionResult {
        reflector::reflect(self, doc, name, old, new)?;
        Ok(())
    }

    fn property(&self, doc: &Document, name: &str) -> Option<String> {
        match name {
            "value" => doc.control_value(self.input).map(str::to_string),
            "name" => doc.get_attribute(self.host, "name").map(str::to_string),
            "type" => Some(TAG_NAME.to_string()),
            "validationMessage" => Some(
                doc.internals(self.host)
                    .map(|i| i.validation_message().to_string())
                    .unwrap_or_default(),
            ),
            "required" => doc.control(self.input).map(|c| c.required.to_string()),
            "disabled" => doc.control(self.input).map(|c| c.disabled.to_string()),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Handle to a `<pj1-input>` host element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledInput {
    host: NodeId,
    root: NodeId,
    input: NodeId,
}

impl StyledInput {
    /// Create a new, unattached `<pj1-input>`. The element must be
    /// registered first.
    pub fn create(doc: &mut Document) -> Result<Self, InputError> {
        let host = doc.create_element(TAG_NAME)?;
        Self::from_host(doc, host)
    }

    pub fn from_host(doc: &Document, host: NodeId) -> Result<Self, InputError> {
        let element = doc
            .custom_element::<TextInput>(host)
            .ok_or(InputError::NotAnInput(host))?;
        Ok(Self {
            host,
            root: element.root,
            input: element.input,
        })
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// The `<input>` inside the shadow root
    pub fn rendered_input(&self) -> NodeId {
        self.input
    }

    /// Always the rendered input's current value
    pub fn value(&self, doc: &Document) -> String {
        doc.control_value(self.input).unwrap_or_default().to_string()
    }

    pub fn set_value(&self, doc: &mut Document, value: &str) -> Result<(), InputError> {
        doc.set_control_value(self.input, value)?;
        participant::sync_form_value(doc, self.host, self.input);
        participant::update_validity(doc, self.host, self.input);
        Ok(())
    }

    /// Owning form; `None` without form association
    pub fn form(&self, doc: &Document) -> Option<NodeId> {
        participant::form(doc, self.host)
    }

    pub fn name(&self, doc: &Document) -> Option<String> {
        doc.get_attribute(self.host, "name").map(str::to_string)
    }

    /// Control type reported to forms
    pub fn type_name(&self) -> &'static str {
        TAG_NAME
    }

    pub fn validity(&self, doc: &Document) -> Option<ValidityState> {
        doc.internals(self.host).map(|i| i.validity())
    }

    pub fn validation_message(&self, doc: &Document) -> Option<String> {
        doc.internals(self.host).map(|i| i.validation_message().to_string())
    }

    pub fn will_validate(&self, doc: &Document) -> Option<bool> {
        doc.internals(self.host)?;
        Some(doc.will_validate(self.host))
    }

    /// `checkValidity()`; valid when the host has no internals
    pub fn check_validity(&self, doc: &mut Document) -> Result<bool, InputError> {
        if doc.internals(self.host).is_none() {
            return Ok(true);
        }
        Ok(doc.check_validity(self.host)?)
    }

    /// `reportValidity()`; valid when the host has no internals
    pub fn report_validity(&self, doc: &mut Document) -> Result<bool, InputError> {
        if doc.internals(self.host).is_none() {
            return Ok(true);
        }
        Ok(doc.report_validity(self.host)?)
    }

    pub fn onchange(&self, doc: &Document) -> Option<ChangeHandler> {
        doc.custom_element::<TextInput>(self.host)?.handler().cloned()
    }

    /// Install `handler` as the `onchange` listener, replacing any previous
    /// one; `None` clears it
    pub fn set_onchange(&self, doc: &mut Document, handler: Option<ChangeHandler>) -> Result<(), InputError> {
        doc.with_custom_element::<TextInput, _>(self.host, |element, doc| element.install_handler(doc, handler))
            .ok_or(InputError::NotAnInput(self.host))?
    }

    /// Text of the error annotation, if one is shown
    pub fn error_message(&self, doc: &Document) -> Option<String> {
        annotation::current_error(doc, self.root)
    }
}

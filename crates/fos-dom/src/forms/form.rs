//! Form Submission
//!
//! Form ownership, constraint validation and the entry list. Submissions
//! are recorded on the document instead of being sent anywhere.

use url::form_urlencoded;

use super::control::InputType;
use super::internals::{ElementInternals, FormValue};
use super::validation::ValidityState;
use crate::document::Document;
use crate::error::DomError;
use crate::events::{Event, EventInit, event_type};
use crate::NodeId;

/// Form submission method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
    Dialog,
}

impl FormMethod {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "post" => Self::Post,
            "dialog" => Self::Dialog,
            _ => Self::Get,
        }
    }
}

/// Entry list built for a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// Create empty form data
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entry
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Get first value for name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get all values for name
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn delete(&mut self, name: &str) {
        self.entries.retain(|(n, _)| n != name);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `application/x-www-form-urlencoded` body
    pub fn to_url_encoded(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.entries.iter())
            .finish()
    }
}

/// A completed form submission
#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub form: NodeId,
    pub submitter: Option<NodeId>,
    pub method: FormMethod,
    pub action: String,
    pub data: FormData,
}

/// Validation message shown to the user by `reportValidity`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub element: NodeId,
    pub message: String,
}

impl Document {
    /// Nearest ancestor `<form>` in the same tree
    pub fn form_owner(&self, node: NodeId) -> Option<NodeId> {
        self.tree
            .inclusive_ancestors(node)
            .skip(1)
            .find(|&id| self.tag_is(id, "form"))
    }

    /// First submit button owned by `form`, in tree order
    pub fn submit_control(&self, form: NodeId) -> Option<NodeId> {
        self.tree.descendants(form).into_iter().find(|&id| {
            self.control(id).is_some_and(|c| c.is_submit()) && self.form_owner(id) == Some(form)
        })
    }

    /// Activate `node` as a click would. Disabled controls ignore the click.
    ///
    /// Returns `false` when nothing happened or a listener canceled it.
    pub fn click(&mut self, node: NodeId) -> Result<bool, DomError> {
        if self.is_disabled(node)? {
            tracing::debug!("Ignoring click on disabled {:?}", node);
            return Ok(false);
        }

        let init = EventInit { bubbles: true, cancelable: true, composed: true };
        let proceed = self.dispatch_event(node, &mut Event::new(event_type::CLICK, init))?;
        if !proceed {
            return Ok(false);
        }

        let is_submit = self.control(node).is_some_and(|c| c.is_submit());
        if let (true, Some(form)) = (is_submit, self.form_owner(node)) {
            self.request_submit(form, Some(node))?;
        }
        Ok(true)
    }

    /// Submit `form` with interactive validation, as `form.requestSubmit()`.
    ///
    /// Returns whether a submission was recorded.
    pub fn request_submit(&mut self, form: NodeId, submitter: Option<NodeId>) -> Result<bool, DomError> {
        self.element(form)?;
        let listed = self.listed_elements(form);

        let no_validate = self.has_attribute(form, "novalidate")
            || submitter.is_some_and(|s| self.has_attribute(s, "formnovalidate"));
        if !no_validate && !self.interactively_validate(&listed)? {
            tracing::debug!("Submission of {:?} blocked by invalid controls", form);
            return Ok(false);
        }

        let init = EventInit { bubbles: true, cancelable: true, composed: false };
        if !self.dispatch_event(form, &mut Event::new(event_type::SUBMIT, init))? {
            tracing::debug!("Submission of {:?} canceled", form);
            return Ok(false);
        }

        let data = self.entry_list(&listed, submitter)?;
        let method = submitter
            .and_then(|s| self.get_attribute(s, "formmethod"))
            .or_else(|| self.get_attribute(form, "method"))
            .map(FormMethod::parse)
            .unwrap_or_default();
        let action = submitter
            .and_then(|s| self.get_attribute(s, "formaction"))
            .or_else(|| self.get_attribute(form, "action"))
            .unwrap_or_default()
            .to_string();

        tracing::info!(
            "Submitting {:?} ({:?} {:?}): {}",
            form,
            method,
            action,
            data.to_url_encoded()
        );
        self.submissions.push(FormSubmission {
            form,
            submitter,
            method,
            action,
            data,
        });
        Ok(true)
    }

    /// Recorded submissions, oldest first
    pub fn submissions(&self) -> &[FormSubmission] {
        &self.submissions
    }

    /// Messages shown by `reportValidity` and interactive validation
    pub fn validation_reports(&self) -> &[ValidationReport] {
        &self.validation_reports
    }

    /// Internals of a form-associated custom element
    pub fn internals(&self, node: NodeId) -> Option<&ElementInternals> {
        self.internals.get(&node)
    }

    pub fn internals_mut(&mut self, node: NodeId) -> Option<&mut ElementInternals> {
        self.internals.get_mut(&node)
    }

    /// Whether `node` is a candidate for constraint validation
    pub fn will_validate(&self, node: NodeId) -> bool {
        if matches!(self.is_disabled(node), Ok(true) | Err(_)) {
            return false;
        }
        if let Some(control) = self.control(node) {
            return control.submits_value() && control.input_type != InputType::Hidden;
        }
        self.internals.contains_key(&node)
    }

    /// Current validity flags and message of a control or internals host
    pub fn validity_of(&self, node: NodeId) -> Option<(ValidityState, String)> {
        if let Some(control) = self.control(node) {
            let validity = control.validity();
            return Some((validity, validity.default_message().to_string()));
        }
        self.internals
            .get(&node)
            .map(|i| (i.validity(), i.validation_message().to_string()))
    }

    /// `checkValidity()`: fires a cancelable `invalid` event when invalid
    pub fn check_validity(&mut self, node: NodeId) -> Result<bool, DomError> {
        Ok(self.fire_invalid_if_needed(node)?.is_none())
    }

    /// `reportValidity()`: like `check_validity`, and reports the message
    /// unless the `invalid` event was canceled
    pub fn report_validity(&mut self, node: NodeId) -> Result<bool, DomError> {
        match self.fire_invalid_if_needed(node)? {
            None => Ok(true),
            Some((canceled, message)) => {
                if !canceled {
                    self.record_report(node, message);
                }
                Ok(false)
            }
        }
    }

    /// `None` when valid; otherwise whether `invalid` was canceled and the
    /// validation message
    fn fire_invalid_if_needed(&mut self, node: NodeId) -> Result<Option<(bool, String)>, DomError> {
        self.node(node)?;
        if !self.will_validate(node) {
            return Ok(None);
        }
        let Some((validity, message)) = self.validity_of(node) else {
            return Ok(None);
        };
        if validity.valid() {
            return Ok(None);
        }

        let init = EventInit { bubbles: false, cancelable: true, composed: false };
        let proceed = self.dispatch_event(node, &mut Event::new(event_type::INVALID, init))?;
        Ok(Some((!proceed, message)))
    }

    fn record_report(&mut self, element: NodeId, message: String) {
        tracing::info!("Validation report for {:?}: {}", element, message);
        self.validation_reports.push(ValidationReport { element, message });
    }

    /// Checks every candidate; reports the first invalid one whose `invalid`
    /// event was not canceled
    fn interactively_validate(&mut self, listed: &[NodeId]) -> Result<bool, DomError> {
        let mut first_report = None;
        let mut all_valid = true;
        for &node in listed {
            if let Some((canceled, message)) = self.fire_invalid_if_needed(node)? {
                all_valid = false;
                if !canceled && first_report.is_none() {
                    first_report = Some((node, message));
                }
            }
        }
        if let Some((node, message)) = first_report {
            self.record_report(node, message);
        }
        Ok(all_valid)
    }

    /// Controls and form-associated elements owned by `form`, in tree order
    fn listed_elements(&self, form: NodeId) -> Vec<NodeId> {
        self.tree
            .descendants(form)
            .into_iter()
            .filter(|&id| self.control(id).is_some() || self.internals.contains_key(&id))
            .filter(|&id| self.form_owner(id) == Some(form))
            .collect()
    }

    fn entry_list(&self, listed: &[NodeId], submitter: Option<NodeId>) -> Result<FormData, DomError> {
        let mut data = FormData::new();
        for &node in listed {
            if self.is_disabled(node)? {
                continue;
            }
            let name = self.get_attribute(node, "name").unwrap_or_default();
            if name.is_empty() {
                continue;
            }

            if let Some(control) = self.control(node) {
                if control.input_type.is_button() || !control.submits_value() {
                    if submitter == Some(node) {
                        data.append(name, control.value.as_str());
                    }
                    continue;
                }
                if matches!(control.input_type, InputType::Checkbox | InputType::Radio) {
                    if self.has_attribute(node, "checked") {
                        let value = if control.value.is_empty() { "on" } else { control.value.as_str() };
                        data.append(name, value);
                    }
                    continue;
                }
                data.append(name, control.value.as_str());
            } else if let Some(internals) = self.internals.get(&node) {
                match internals.form_value() {
                    Some(FormValue::String(value)) => data.append(name, value.as_str()),
                    Some(FormValue::Entries(entries)) => {
                        for (n, v) in entries {
                            data.append(n.as_str(), v.as_str());
                        }
                    }
                    None => {}
                }
            }
        }
        Ok(data)
    }

    fn tag_is(&self, node: NodeId, tag: &str) -> bool {
        self.tree
            .get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.tag() == tag)
    }
}

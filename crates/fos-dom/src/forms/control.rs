//! Native control state
//!
//! IDL state of `<input>` and `<button>` elements. Property assignment is
//! string based (`element[name] = value`); boolean properties follow
//! attribute presence.

use std::collections::BTreeMap;

use super::validation::ValidityState;

/// HTML input types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Tel,
    Url,
    Search,
    Date,
    Time,
    Color,
    Range,
    Hidden,
    Checkbox,
    Radio,
    Submit,
    Reset,
    Button,
}

impl InputType {
    /// Parse from string; unknown types fall back to `None`
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "password" => Self::Password,
            "email" => Self::Email,
            "number" => Self::Number,
            "tel" => Self::Tel,
            "url" => Self::Url,
            "search" => Self::Search,
            "date" => Self::Date,
            "time" => Self::Time,
            "color" => Self::Color,
            "range" => Self::Range,
            "hidden" => Self::Hidden,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "button" => Self::Button,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Search => "search",
            Self::Date => "date",
            Self::Time => "time",
            Self::Color => "color",
            Self::Range => "range",
            Self::Hidden => "hidden",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Button => "button",
        }
    }

    /// Check if this is a text-like input
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Password | Self::Email | Self::Number | Self::Tel | Self::Url | Self::Search
        )
    }

    /// Check if this is a button type
    pub fn is_button(&self) -> bool {
        matches!(self, Self::Submit | Self::Reset | Self::Button)
    }
}

/// Which native element owns the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Input,
    Button,
}

/// Native control state
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub kind: ControlKind,
    pub input_type: InputType,
    pub value: String,
    pub name: Option<String>,
    pub placeholder: String,
    pub pattern: Option<String>,
    pub required: bool,
    pub disabled: bool,
    /// Other assigned properties, kept verbatim
    extra: BTreeMap<String, String>,
}

impl ControlState {
    /// State for a freshly created element, if `tag` is a control
    pub fn for_tag(tag: &str) -> Option<Self> {
        let (kind, input_type) = match tag {
            "input" => (ControlKind::Input, InputType::Text),
            "button" => (ControlKind::Button, InputType::Submit),
            _ => return None,
        };
        Some(Self {
            kind,
            input_type,
            value: String::new(),
            name: None,
            placeholder: String::new(),
            pattern: None,
            required: false,
            disabled: false,
            extra: BTreeMap::new(),
        })
    }

    /// Assign a property. `None` is an absent attribute value.
    pub fn set_property(&mut self, name: &str, value: Option<&str>) {
        match name {
            "value" => self.value = value.unwrap_or_default().to_string(),
            "type" => self.input_type = self.parse_type(value),
            "name" => self.name = value.map(str::to_string),
            "placeholder" => self.placeholder = value.unwrap_or_default().to_string(),
            "pattern" => self.pattern = value.map(str::to_string),
            "required" => self.required = value.is_some(),
            "disabled" => self.disabled = value.is_some(),
            _ => match value {
                Some(v) => {
                    self.extra.insert(name.to_string(), v.to_string());
                }
                None => {
                    self.extra.remove(name);
                }
            },
        }
    }

    /// Read a property back as a string
    pub fn property(&self, name: &str) -> Option<String> {
        match name {
            "value" => Some(self.value.clone()),
            "type" => Some(self.input_type.as_str().to_string()),
            "name" => Some(self.name.clone().unwrap_or_default()),
            "placeholder" => Some(self.placeholder.clone()),
            "pattern" => Some(self.pattern.clone().unwrap_or_default()),
            "required" => Some(self.required.to_string()),
            "disabled" => Some(self.disabled.to_string()),
            _ => self.extra.get(name).cloned(),
        }
    }

    fn parse_type(&self, value: Option<&str>) -> InputType {
        let parsed = value.and_then(InputType::parse);
        match self.kind {
            ControlKind::Input => parsed.unwrap_or(InputType::Text),
            ControlKind::Button => parsed.filter(InputType::is_button).unwrap_or(InputType::Submit),
        }
    }

    /// Submit button (`<button type=submit>` or `<input type=submit>`)
    pub fn is_submit(&self) -> bool {
        self.input_type == InputType::Submit
    }

    /// Whether this control contributes its value to form submission
    pub fn submits_value(&self) -> bool {
        self.kind == ControlKind::Input && !self.input_type.is_button()
    }

    /// Constraint validation for the value
    pub fn validity(&self) -> ValidityState {
        let mut state = ValidityState::default();
        if self.required && self.value.is_empty() && self.submits_value() {
            state.value_missing = true;
        }
        if self.input_type == InputType::Email && !self.value.is_empty() && !self.value.contains('@') {
            state.type_mismatch = true;
        }
        if self.input_type == InputType::Number
            && !self.value.is_empty()
            && self.value.parse::<f64>().is_err()
        {
            state.bad_input = true;
        }
        state
    }
}

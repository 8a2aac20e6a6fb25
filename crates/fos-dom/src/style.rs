//! Inline style
//!
//! `element.style` declarations. Values are validated with lightningcss;
//! an invalid value is ignored and the previous declaration survives, as
//! with CSSOM property assignment.

use lightningcss::properties::Property;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute};

const WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

/// Inline declarations in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a declared value
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Assign a property. `None` or an empty string removes the declaration.
    ///
    /// Returns `false` when the value does not parse for that property, in
    /// which case nothing changes.
    pub fn set(&mut self, property: &str, value: Option<&str>) -> bool {
        let property = property.trim().to_ascii_lowercase();
        let value = value.map(str::trim).filter(|v| !v.is_empty());

        let Some(value) = value else {
            self.remove(&property);
            return true;
        };

        if !is_valid_declaration(&property, value) {
            tracing::debug!("Ignoring invalid declaration {}: {}", property, value);
            return false;
        }

        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
        true
    }

    /// Remove a declaration, returning its value
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let idx = self.declarations.iter().position(|(p, _)| p == property)?;
        Some(self.declarations.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialized `style` attribute text
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Whether `property: value` is a declaration lightningcss accepts.
///
/// lightningcss keeps values it cannot type as `Unparsed` token lists; those
/// only count when they carry a substitution or a CSS-wide keyword.
fn is_valid_declaration(property: &str, value: &str) -> bool {
    let source = format!("{}: {}", property, value);
    let Ok(attr) = StyleAttribute::parse(&source, ParserOptions::default()) else {
        return false;
    };

    let block = &attr.declarations;
    let mut parsed = block
        .declarations
        .iter()
        .chain(block.important_declarations.iter())
        .peekable();
    if parsed.peek().is_none() {
        return false;
    }

    parsed.all(|decl| match decl {
        Property::Unparsed(_) | Property::Custom(_) => {
            let lower = value.to_ascii_lowercase();
            lower.contains("var(") || lower.contains("env(") || WIDE_KEYWORDS.contains(&lower.as_str())
        }
        _ => true,
    })
}

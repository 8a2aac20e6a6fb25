//! Input theme
//!
//! Colors and size presets for `<pj1-input>`, and the stylesheet rendered
//! into every shadow root.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// `size` attribute presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSize {
    Md,
    Xs,
}

impl InputSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "md" => Some(Self::Md),
            "xs" => Some(Self::Xs),
            _ => None,
        }
    }
}

/// Heights for each [`InputSize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizePresets {
    pub md: String,
    pub xs: String,
}

impl Default for SizePresets {
    fn default() -> Self {
        Self {
            md: "32px".into(),
            xs: "26px".into(),
        }
    }
}

/// Visual configuration shared by all inputs registered together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputTheme {
    /// Border color without an error
    pub border_color: String,
    /// Border and message color with an error
    pub danger_color: String,
    pub sizes: SizePresets,
    pub font_size: String,
    pub disabled_background: String,
    pub disabled_color: String,
}

impl Default for InputTheme {
    fn default() -> Self {
        Self {
            border_color: "#d9d9d9".into(),
            danger_color: "#DE3535".into(),
            sizes: SizePresets::default(),
            font_size: "14px".into(),
            disabled_background: "#f5f5f5".into(),
            disabled_color: "rgba(0, 0, 0, 0.25)".into(),
        }
    }
}

impl InputTheme {
    /// Load a theme from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn height(&self, size: InputSize) -> &str {
        match size {
            InputSize::Md => &self.sizes.md,
            InputSize::Xs => &self.sizes.xs,
        }
    }

    /// Stylesheet placed in each shadow root
    pub fn stylesheet(&self) -> String {
        format!(
            "* {{ box-sizing: border-box; }}
.custom-input {{
  border: 1px solid {border};
  padding: 6px 8px;
  border-radius: 2px;
  font-size: {font_size};
  outline: none;
  height: {height};
}}
.custom-input:disabled {{
  background-color: {disabled_bg};
  color: {disabled_color};
  cursor: not-allowed;
}}
.error {{
  color: {danger};
  font-size: 12px;
  font-family: Roboto;
  line-height: 140%;
  display: block;
}}
input::-webkit-outer-spin-button,
input::-webkit-inner-spin-button {{
  -webkit-appearance: none;
  margin: 0;
}}
input[type=number] {{
  appearance: textfield;
}}
",
            border = self.border_color,
            font_size = self.font_size,
            height = self.sizes.md,
            disabled_bg = self.disabled_background,
            disabled_color = self.disabled_color,
            danger = self.danger_color,
        )
    }
}

//! Form Validation
//!
//! Constraint Validation API flags.

/// Validity state for form controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    /// The element's value is missing (for required)
    pub value_missing: bool,
    /// The element's value doesn't match the type
    pub type_mismatch: bool,
    /// The element's value doesn't match the pattern
    pub pattern_mismatch: bool,
    /// The element's value is too long
    pub too_long: bool,
    /// The element's value is too short
    pub too_short: bool,
    /// The element's value is below the minimum
    pub range_underflow: bool,
    /// The element's value is above the maximum
    pub range_overflow: bool,
    /// The element's value doesn't match step
    pub step_mismatch: bool,
    /// The element has a bad input format
    pub bad_input: bool,
    /// Custom validity message set
    pub custom_error: bool,
}

impl ValidityState {
    /// Flags for a required control with no value
    pub fn value_missing() -> Self {
        Self {
            value_missing: true,
            ..Self::default()
        }
    }

    /// Check if the element is valid
    pub fn valid(&self) -> bool {
        !self.value_missing
            && !self.type_mismatch
            && !self.pattern_mismatch
            && !self.too_long
            && !self.too_short
            && !self.range_underflow
            && !self.range_overflow
            && !self.step_mismatch
            && !self.bad_input
            && !self.custom_error
    }

    /// Default user-facing message for the first failing flag
    pub fn default_message(&self) -> &'static str {
        if self.value_missing {
            "Please fill out this field."
        } else if self.type_mismatch || self.step_mismatch || self.bad_input {
            "Please enter a valid value."
        } else if self.pattern_mismatch {
            "Please match the requested format."
        } else if self.too_long {
            "Please shorten this text."
        } else if self.too_short {
            "Please lengthen this text."
        } else if self.range_underflow {
            "Value must be greater or equal to minimum."
        } else if self.range_overflow {
            "Value must be less or equal to maximum."
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_state_valid() {
        let state = ValidityState::default();
        assert!(state.valid());
        assert_eq!(state.default_message(), "");
    }

    #[test]
    fn test_validity_state_invalid() {
        let state = ValidityState::value_missing();
        assert!(!state.valid());
        assert_eq!(state.default_message(), "Please fill out this field.");
    }
}

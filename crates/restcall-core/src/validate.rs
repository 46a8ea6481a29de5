//! The parameter validator: one rule, one candidate value, a yes/fail
//! decision with no side effects.

use serde_json::Value;

use crate::types::ParamRule;
use crate::value::{as_numeric, display, matches_type};

/// A single parameter failed validation against its declared rule.
///
/// Every variant names the offending parameter so the failure can be
/// reported without further context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidateError {
    /// The rule is `required` and the caller supplied no value.
    #[error("'{name}' is a required parameter")]
    RequiredMissing {
        /// The parameter's name.
        name: String,
    },

    /// The value's runtime kind matches no member of the type union.
    #[error("'{name}' is not the correct type")]
    WrongType {
        /// The parameter's name.
        name: String,
    },

    /// The value is not a member of the declared `enum` set.
    #[error("'{name}' is not one of the accepted values")]
    NotAccepted {
        /// The parameter's name.
        name: String,
    },

    /// The value's string form does not match the declared `pattern`.
    #[error("'{name}' does not match the expected pattern")]
    PatternMismatch {
        /// The parameter's name.
        name: String,
    },

    /// The value is below the declared `minimum`.
    #[error("'{name}' is less than the minimum value")]
    BelowMinimum {
        /// The parameter's name.
        name: String,
    },

    /// The value is above the declared `maximum`.
    #[error("'{name}' is more than the maximum value")]
    AboveMaximum {
        /// The parameter's name.
        name: String,
    },
}

/// Validate a candidate value against a resolved rule.
///
/// An absent or null value passes unless the rule is `required`.
/// Present values run the declared constraints in a fixed order —
/// type, enum, pattern, minimum/maximum — and the first failure wins.
/// Bounds apply only when the type union admits numeric values, so
/// `minimum: 5` on a `type: string` rule never rejects anything.
///
/// # Errors
///
/// The [`ValidateError`] variant matching the first failed constraint.
pub fn validate(name: &str, rule: &ParamRule, value: Option<&Value>) -> Result<(), ValidateError> {
    let value = match value {
        None | Some(Value::Null) => {
            if rule.required {
                return Err(ValidateError::RequiredMissing { name: name.to_owned() });
            }
            return Ok(());
        }
        Some(value) => value,
    };

    if !rule.types.iter().any(|&kind| matches_type(kind, value)) {
        return Err(ValidateError::WrongType { name: name.to_owned() });
    }

    if let Some(choices) = &rule.choices {
        if !choices.contains(value) {
            return Err(ValidateError::NotAccepted { name: name.to_owned() });
        }
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(&display(value)) {
            return Err(ValidateError::PatternMismatch { name: name.to_owned() });
        }
    }

    if rule.is_numeric() {
        if let Some(candidate) = as_numeric(value) {
            if let Some(minimum) = rule.minimum {
                if candidate < minimum {
                    return Err(ValidateError::BelowMinimum { name: name.to_owned() });
                }
            }
            if let Some(maximum) = rule.maximum {
                if candidate > maximum {
                    return Err(ValidateError::AboveMaximum { name: name.to_owned() });
                }
            }
        }
    }

    Ok(())
}

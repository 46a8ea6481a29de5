//! Runtime value kind checks over [`serde_json::Value`].
//!
//! Caller arguments, defaults, and enum members all flow through the
//! engine as generic JSON values; these helpers stand in for the
//! dynamic type tests a declarative rule needs.

use serde_json::Value;

use crate::types::ParamType;

/// Whether `value`'s runtime kind satisfies a single declared kind.
///
/// `null` matches only an actual [`Value::Null`] — an absent argument
/// never reaches type checking, so there is no "falsy" reading here.
#[must_use]
pub fn matches_type(kind: ParamType, value: &Value) -> bool {
    match kind {
        ParamType::String => value.is_string(),
        ParamType::Object => value.is_object(),
        ParamType::Array => value.is_array(),
        ParamType::Integer => value.is_i64() || value.is_u64(),
        ParamType::Boolean => value.is_boolean(),
        ParamType::Number | ParamType::Numeric => as_numeric(value).is_some(),
        ParamType::Null => value.is_null(),
        ParamType::Any => true,
    }
}

/// Numeric reading of a value: any JSON number, or a string that parses
/// as one. Non-numeric shapes yield `None`.
#[must_use]
pub fn as_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// String form used for path substitution and query encoding: strings
/// verbatim (no JSON quoting), numbers and booleans via `Display`,
/// null as the empty string. Lists and maps fall back to compact JSON,
/// though rules for `uri`/`query` parameters rarely admit them.
#[must_use]
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn string_matches_only_strings() {
        assert!(matches_type(ParamType::String, &json!("bar")));
        assert!(!matches_type(ParamType::String, &json!(42)));
        assert!(!matches_type(ParamType::String, &json!(true)));
    }

    #[test]
    fn integer_requires_whole_number() {
        assert!(matches_type(ParamType::Integer, &json!(42)));
        assert!(matches_type(ParamType::Integer, &json!(-7)));
        assert!(!matches_type(ParamType::Integer, &json!(1.5)));
        assert!(!matches_type(ParamType::Integer, &json!("42")));
    }

    #[test]
    fn number_accepts_numeric_strings() {
        assert!(matches_type(ParamType::Number, &json!(1.5)));
        assert!(matches_type(ParamType::Number, &json!("3.14")));
        assert!(matches_type(ParamType::Numeric, &json!("10")));
        assert!(!matches_type(ParamType::Number, &json!("ten")));
        assert!(!matches_type(ParamType::Number, &json!(true)));
    }

    #[test]
    fn null_matches_only_null() {
        assert!(matches_type(ParamType::Null, &Value::Null));
        assert!(!matches_type(ParamType::Null, &json!("")));
        assert!(!matches_type(ParamType::Null, &json!(0)));
        assert!(!matches_type(ParamType::Null, &json!(false)));
    }

    #[test]
    fn any_matches_everything() {
        for value in [json!(null), json!("x"), json!(0), json!([1]), json!({"k": 1})] {
            assert!(matches_type(ParamType::Any, &value));
        }
    }

    #[test]
    fn container_kinds() {
        assert!(matches_type(ParamType::Array, &json!([1, 2])));
        assert!(matches_type(ParamType::Object, &json!({"k": 1})));
        assert!(!matches_type(ParamType::Array, &json!({"k": 1})));
        assert!(!matches_type(ParamType::Object, &json!([1, 2])));
    }

    #[test]
    fn as_numeric_parses_strings_and_numbers() {
        assert_eq!(as_numeric(&json!(5)), Some(5.0));
        assert_eq!(as_numeric(&json!("5.5")), Some(5.5));
        assert_eq!(as_numeric(&json!(" 7 ")), Some(7.0));
        assert_eq!(as_numeric(&json!("abc")), None);
        assert_eq!(as_numeric(&json!(true)), None);
    }

    #[test]
    fn display_is_unquoted() {
        assert_eq!(display(&json!("bar")), "bar");
        assert_eq!(display(&json!(42)), "42");
        assert_eq!(display(&json!(true)), "true");
        assert_eq!(display(&Value::Null), "");
        assert_eq!(display(&json!([1, 2])), "[1,2]");
    }
}

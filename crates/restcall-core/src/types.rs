//! Parameter descriptor model.
//!
//! Rules arrive from a declarative service definition where almost every
//! field is optional, so the as-deserialized shape
//! ([`RawParameterRule`]) keeps everything `Option` and defers the
//! "type and location are mandatory" check to [`RawParameterRule::resolve`].
//! That way a missing field surfaces as a schema error naming the
//! offending operation and parameter instead of an opaque serde error.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// A single acceptable runtime kind for a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// A string value.
    String,
    /// A map value.
    Object,
    /// A list value.
    Array,
    /// A whole-number value.
    Integer,
    /// A boolean value.
    Boolean,
    /// Anything numeric-parseable (a number, or a string holding one).
    Number,
    /// Alias of [`ParamType::Number`]; kept as a distinct spelling
    /// because definitions use both.
    Numeric,
    /// Only an actual null value.
    Null,
    /// Matches everything.
    Any,
}

/// The declared `type` field of a rule: one kind, or an ordered union.
///
/// Union semantics are OR'd — a value is well-typed if its runtime kind
/// matches any member, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// A single acceptable kind, e.g. `type: string`.
    One(ParamType),
    /// An ordered union of kinds, e.g. `type: [string, integer]`.
    Many(Vec<ParamType>),
}

impl TypeSpec {
    /// The declared kinds as a slice, regardless of spelling.
    #[must_use]
    pub fn members(&self) -> &[ParamType] {
        match self {
            Self::One(kind) => std::slice::from_ref(kind),
            Self::Many(kinds) => kinds,
        }
    }
}

/// Where a parameter's value ends up in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Substituted into a `{name}` placeholder in the URI path.
    Uri,
    /// Appended to the query string as `name=value`.
    Query,
}

/// Declared decode format for an operation's response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Body decodes via the JSON decoder.
    Json,
    /// Body decodes via the XML decoder.
    Xml,
}

impl ResponseType {
    /// Canonical lowercase name, as written in definitions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// MIME type sent in the `Accept` header for this format.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter rule exactly as it deserializes from a definition.
///
/// Every field is optional here; [`RawParameterRule::resolve`] enforces
/// which ones are actually mandatory and compiles the `pattern`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawParameterRule {
    /// Acceptable runtime kind(s). Mandatory after resolution.
    #[serde(rename = "type")]
    pub type_spec: Option<TypeSpec>,
    /// `uri` or `query`. Mandatory after resolution.
    pub location: Option<Location>,
    /// Whether an absent value fails validation.
    pub required: Option<bool>,
    /// Closed set of accepted values.
    #[serde(rename = "enum")]
    pub choices: Option<Vec<Value>>,
    /// Regular expression the value's string form must match.
    pub pattern: Option<String>,
    /// Lower bound, applied only to numeric-typed rules.
    pub minimum: Option<f64>,
    /// Upper bound, applied only to numeric-typed rules.
    pub maximum: Option<f64>,
    /// Value used when the caller supplies none.
    pub default: Option<Value>,
}

impl RawParameterRule {
    /// Check mandatory fields and compile the pattern, producing the
    /// resolved [`ParamRule`].
    ///
    /// # Errors
    ///
    /// [`RuleError::MissingType`] / [`RuleError::MissingLocation`] when
    /// the mandatory fields are absent, [`RuleError::EmptyTypeUnion`]
    /// for a `type: []` declaration, and [`RuleError::BadPattern`] when
    /// the regex fails to compile.
    pub fn resolve(&self) -> Result<ParamRule, RuleError> {
        let types = match &self.type_spec {
            None => return Err(RuleError::MissingType),
            Some(spec) if spec.members().is_empty() => return Err(RuleError::EmptyTypeUnion),
            Some(spec) => spec.members().to_vec(),
        };
        let location = self.location.ok_or(RuleError::MissingLocation)?;
        let pattern = match &self.pattern {
            None => None,
            Some(raw) => Some(Regex::new(raw).map_err(RuleError::BadPattern)?),
        };

        Ok(ParamRule {
            types,
            location,
            required: self.required.unwrap_or(false),
            choices: self.choices.clone(),
            pattern,
            minimum: self.minimum,
            maximum: self.maximum,
            default: self.default.clone(),
        })
    }
}

/// A fully resolved, construction-validated parameter rule.
#[derive(Debug, Clone)]
pub struct ParamRule {
    /// Acceptable runtime kinds, in declared order.
    pub types: Vec<ParamType>,
    /// Where the value lands in the request.
    pub location: Location,
    /// Whether an absent value fails validation.
    pub required: bool,
    /// Closed set of accepted values, if declared.
    pub choices: Option<Vec<Value>>,
    /// Compiled pattern, if declared.
    pub pattern: Option<Regex>,
    /// Lower bound, applied only to numeric-typed rules.
    pub minimum: Option<f64>,
    /// Upper bound, applied only to numeric-typed rules.
    pub maximum: Option<f64>,
    /// Value used when the caller supplies none.
    pub default: Option<Value>,
}

impl ParamRule {
    /// Whether the declared type union admits numeric values, which is
    /// the precondition for `minimum`/`maximum` to apply at all.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.types
            .iter()
            .any(|kind| matches!(kind, ParamType::Integer | ParamType::Number | ParamType::Numeric))
    }
}

/// Why a [`RawParameterRule`] failed to resolve.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The rule declares no `type` field.
    #[error("missing 'type' field")]
    MissingType,

    /// The rule declares `type: []`.
    #[error("'type' union must not be empty")]
    EmptyTypeUnion,

    /// The rule declares no `location` field.
    #[error("missing 'location' field")]
    MissingLocation,

    /// The declared `pattern` is not a valid regular expression.
    #[error("invalid 'pattern' regex: {0}")]
    BadPattern(#[source] regex::Error),
}

//! The declarative service definition, as it deserializes from config.
//!
//! A definition has four sections mirroring the config file layout:
//!
//! ```yaml
//! service:
//!   name: "httpbin: HTTP Request & Response Service"
//!   apiVersion: "1"
//!   baseUrl: http://httpbin.org/
//!
//! defaults:
//!   foo: bar
//!
//! parameters:          # the named parameter library
//!   global:
//!     bat:
//!       type: string
//!       location: query
//!
//! operations:
//!   testing:
//!     httpMethod: GET
//!     uri: get
//!     responseType: json
//!     parameters:
//!       foo: { type: string, location: query }
//!       bat: "global:bat"        # reference into the library
//! ```
//!
//! Fields that the engine requires (`baseUrl`, operation `httpMethod` /
//! `uri` / `responseType` / `parameters`, rule `type` / `location`) stay
//! optional at this layer so that their absence surfaces as a schema
//! error naming the offender, not as a serde error. The checking
//! happens in [`ServiceDescription::new`](crate::ServiceDescription::new).

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use restcall_core::RawParameterRule;

/// Service-level metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceMetadata {
    /// Human-readable service name.
    pub name: Option<String>,
    /// Declared remote API version.
    pub api_version: Option<String>,
    /// Free-form service description.
    pub description: Option<String>,
    /// Base URL every operation URI is resolved against. The only
    /// mandatory field in the whole section.
    pub base_url: Option<String>,
}

/// One operation parameter entry: an inline rule, or a reference into
/// the named parameter library.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamEntry {
    /// A `"namespace:key"` reference, resolved at construction.
    Reference(String),
    /// A rule declared directly on the operation.
    Inline(RawParameterRule),
}

/// One named operation, as deserialized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawOperation {
    /// HTTP method. Only read-style retrieval is supported, but the
    /// field is still mandatory in the definition.
    pub http_method: Option<String>,
    /// URI template, joined onto the base URL; `{name}` placeholders
    /// mark path parameters.
    pub uri: Option<String>,
    /// Declared decode format, `json` or `xml`. Kept as a raw string
    /// here so an unknown value becomes a schema error at construction.
    pub response_type: Option<String>,
    /// Parameter entries in declaration order. Mandatory, may be empty.
    pub parameters: Option<IndexMap<String, ParamEntry>>,
}

/// A complete declarative service definition.
///
/// This is plain deserialized data; hand it to
/// [`ServiceDescription::new`](crate::ServiceDescription::new) to get a
/// resolved, validated description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceDefinition {
    /// Service metadata.
    pub service: ServiceMetadata,
    /// Service-wide default argument values.
    pub defaults: Map<String, Value>,
    /// The named parameter library: `namespace -> key -> rule`. Only
    /// consulted during reference resolution, never at call time.
    pub parameters: BTreeMap<String, BTreeMap<String, RawParameterRule>>,
    /// Named operations, in declaration order.
    pub operations: IndexMap<String, RawOperation>,
}

impl ServiceDefinition {
    /// Parse a definition from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error if the document is not valid
    /// JSON or does not fit the definition shape.
    pub fn from_json_str(raw: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse a definition from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error if the document is not valid
    /// YAML or does not fit the definition shape.
    pub fn from_yaml_str(raw: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml_ng::from_str(raw)?)
    }

    /// Load a definition from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use restcall_core::{Location, ParamType, TypeSpec};

    use super::*;

    #[test]
    fn deserialize_defaults_to_empty_sections() {
        let definition = ServiceDefinition::from_yaml_str("service:\n  baseUrl: http://x/\n")
            .expect("should parse");
        assert!(definition.defaults.is_empty());
        assert!(definition.parameters.is_empty());
        assert!(definition.operations.is_empty());
        assert_eq!(definition.service.base_url.as_deref(), Some("http://x/"));
    }

    #[test]
    fn string_entry_is_a_reference() {
        let yaml = indoc! {"
            service:
              baseUrl: http://x/
            operations:
              fetch:
                httpMethod: GET
                uri: get
                responseType: json
                parameters:
                  bat: 'global:bat'
        "};
        let definition = ServiceDefinition::from_yaml_str(yaml).expect("should parse");
        let parameters = definition.operations["fetch"].parameters.as_ref().expect("map");
        assert_eq!(parameters["bat"], ParamEntry::Reference("global:bat".to_owned()));
    }

    #[test]
    fn map_entry_is_an_inline_rule() {
        let yaml = indoc! {"
            service:
              baseUrl: http://x/
            operations:
              fetch:
                httpMethod: GET
                uri: get
                responseType: json
                parameters:
                  foo:
                    type: string
                    location: query
        "};
        let definition = ServiceDefinition::from_yaml_str(yaml).expect("should parse");
        let parameters = definition.operations["fetch"].parameters.as_ref().expect("map");
        let ParamEntry::Inline(rule) = &parameters["foo"] else {
            panic!("expected inline rule");
        };
        assert_eq!(rule.type_spec, Some(TypeSpec::One(ParamType::String)));
        assert_eq!(rule.location, Some(Location::Query));
    }

    #[test]
    fn parameter_order_is_preserved() {
        let yaml = indoc! {"
            service:
              baseUrl: http://x/
            operations:
              fetch:
                httpMethod: GET
                uri: get
                responseType: json
                parameters:
                  zebra: { type: string, location: query }
                  apple: { type: string, location: query }
                  mango: { type: string, location: query }
        "};
        let definition = ServiceDefinition::from_yaml_str(yaml).expect("should parse");
        let parameters = definition.operations["fetch"].parameters.as_ref().expect("map");
        let names: Vec<&str> = parameters.keys().map(String::as_str).collect();
        assert_eq!(names, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn json_and_yaml_agree() {
        let yaml = "service:\n  baseUrl: http://x/\ndefaults:\n  foo: bar\n";
        let json = r#"{"service": {"baseUrl": "http://x/"}, "defaults": {"foo": "bar"}}"#;
        let from_yaml = ServiceDefinition::from_yaml_str(yaml).expect("yaml");
        let from_json = ServiceDefinition::from_json_str(json).expect("json");
        assert_eq!(from_yaml.service.base_url, from_json.service.base_url);
        assert_eq!(from_yaml.defaults, from_json.defaults);
    }

    #[test]
    fn missing_operation_fields_still_deserialize() {
        // Schema checking is the engine's job, not serde's.
        let yaml = indoc! {"
            service:
              baseUrl: http://x/
            operations:
              broken:
                uri: get
        "};
        let definition = ServiceDefinition::from_yaml_str(yaml).expect("should parse");
        let op = &definition.operations["broken"];
        assert!(op.http_method.is_none());
        assert!(op.response_type.is_none());
        assert!(op.parameters.is_none());
    }
}

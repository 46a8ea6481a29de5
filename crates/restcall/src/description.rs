//! The service description engine.
//!
//! [`ServiceDescription::new`] ingests a raw [`ServiceDefinition`],
//! resolves `namespace:key` references against the named parameter
//! library, validates every operation and parameter rule, and seeds the
//! service-wide defaults from parameter-level `default` fields.
//! Construction is all-or-nothing: any schema problem aborts with an
//! error and no partially-valid description is ever observable.
//!
//! After construction the description is immutable; [`build_uri`] and
//! [`response_type`] only read it, so a description may be shared
//! freely across threads.
//!
//! [`build_uri`]: ServiceDescription::build_uri
//! [`response_type`]: ServiceDescription::response_type

use indexmap::IndexMap;
use serde_json::{Map, Value};

use restcall_core::{ParamRule, RawParameterRule, ResponseType};

use crate::definition::{ParamEntry, ServiceDefinition, ServiceMetadata};
use crate::error::{Error, Result};
use crate::uri;

/// One resolved, validated operation.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Declared HTTP method (informational; dispatch is GET-only).
    pub http_method: String,
    /// URI template joined onto the base URL at call time.
    pub uri: String,
    /// Declared decode format for the response body.
    pub response_type: ResponseType,
    /// Resolved parameter rules in declaration order. Every reference
    /// has been replaced by the rule it named.
    pub parameters: IndexMap<String, ParamRule>,
}

/// The resolved, validated schema for one service.
///
/// Built once per service via [`ServiceDescription::new`]; read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct ServiceDescription {
    service_name: String,
    metadata: ServiceMetadata,
    base_url: String,
    defaults: Map<String, Value>,
    operations: IndexMap<String, Operation>,
}

impl ServiceDescription {
    /// Resolve and validate a raw definition.
    ///
    /// The passes run in order: base-URL check, reference resolution,
    /// operation validation, parameter-rule validation, and default
    /// seeding (parameter-level defaults fill gaps in the service-wide
    /// defaults; explicit service defaults win).
    ///
    /// # Errors
    ///
    /// [`Error::MissingBaseUrl`], [`Error::NamedParameterNotFound`],
    /// [`Error::InvalidOperation`], or [`Error::InvalidParameter`],
    /// each naming the offending piece of the definition.
    pub fn new(service_name: impl Into<String>, definition: ServiceDefinition) -> Result<Self> {
        let service_name = service_name.into();

        let base_url = match definition.service.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_owned(),
            _ => return Err(Error::MissingBaseUrl { service: service_name }),
        };

        let mut defaults = definition.defaults;
        let mut operations = IndexMap::with_capacity(definition.operations.len());

        for (op_name, raw_op) in &definition.operations {
            let invalid_op = |reason: &str| Error::InvalidOperation {
                service: service_name.clone(),
                operation: op_name.clone(),
                reason: reason.to_owned(),
            };

            let http_method = raw_op
                .http_method
                .clone()
                .ok_or_else(|| invalid_op("missing 'httpMethod'"))?;
            let uri = raw_op.uri.clone().ok_or_else(|| invalid_op("missing 'uri'"))?;
            let response_type = match raw_op.response_type.as_deref() {
                Some("json") => ResponseType::Json,
                Some("xml") => ResponseType::Xml,
                Some(other) => {
                    return Err(invalid_op(&format!(
                        "'responseType' must be 'json' or 'xml', got '{other}'",
                    )))
                }
                None => return Err(invalid_op("missing 'responseType'")),
            };
            let raw_parameters = raw_op
                .parameters
                .as_ref()
                .ok_or_else(|| invalid_op("missing 'parameters' map"))?;

            let mut parameters = IndexMap::with_capacity(raw_parameters.len());
            for (param_name, entry) in raw_parameters {
                let raw_rule = resolve_entry(
                    &service_name,
                    op_name,
                    param_name,
                    entry,
                    &definition.parameters,
                )?;
                let rule = raw_rule.resolve().map_err(|err| Error::InvalidParameter {
                    service: service_name.clone(),
                    operation: op_name.clone(),
                    parameter: param_name.clone(),
                    reason: err.to_string(),
                })?;

                // Parameter-declared defaults only fill gaps; whatever
                // the service-level defaults already name stays.
                if let Some(default) = &rule.default {
                    if !defaults.contains_key(param_name) {
                        defaults.insert(param_name.clone(), default.clone());
                    }
                }

                parameters.insert(param_name.clone(), rule);
            }

            operations.insert(
                op_name.clone(),
                Operation { http_method, uri, response_type, parameters },
            );
        }

        Ok(Self {
            service_name,
            metadata: definition.service,
            base_url,
            defaults,
            operations,
        })
    }

    /// Build the request URI for one operation invocation.
    ///
    /// Caller-supplied `args` overlay the resolved defaults (caller
    /// wins per key), then every declared parameter is validated and
    /// placed in order. A validation failure aborts with no partial
    /// URI.
    ///
    /// # Errors
    ///
    /// [`Error::OperationNotFound`] for an undeclared operation name
    /// (carrying the attempted arguments), or [`Error::Validation`]
    /// from the first failing parameter.
    pub fn build_uri(&self, operation: &str, args: &Map<String, Value>) -> Result<String> {
        let Some(op) = self.operations.get(operation) else {
            return Err(Error::OperationNotFound {
                service: self.service_name.clone(),
                operation: operation.to_owned(),
                arguments: args.clone(),
            });
        };

        let mut merged = self.defaults.clone();
        for (name, value) in args {
            merged.insert(name.clone(), value.clone());
        }

        uri::build(&self.base_url, &op.uri, &op.parameters, &merged)
    }

    /// The declared decode format for an operation's response body.
    ///
    /// # Errors
    ///
    /// [`Error::OperationNotFound`] for an undeclared operation name.
    pub fn response_type(&self, operation: &str) -> Result<ResponseType> {
        self.operations
            .get(operation)
            .map(|op| op.response_type)
            .ok_or_else(|| Error::OperationNotFound {
                service: self.service_name.clone(),
                operation: operation.to_owned(),
                arguments: Map::new(),
            })
    }

    /// The service name this description was constructed under.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Service-level metadata from the definition.
    #[must_use]
    pub fn metadata(&self) -> &ServiceMetadata {
        &self.metadata
    }

    /// The base URL, as declared (trailing slash included if present).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The fully seeded defaults map.
    #[must_use]
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// The resolved operations, in declaration order.
    #[must_use]
    pub fn operations(&self) -> &IndexMap<String, Operation> {
        &self.operations
    }
}

/// Dereference a parameter entry: inline rules pass through, string
/// entries are looked up in the named parameter library.
fn resolve_entry(
    service_name: &str,
    op_name: &str,
    param_name: &str,
    entry: &ParamEntry,
    library: &std::collections::BTreeMap<String, std::collections::BTreeMap<String, RawParameterRule>>,
) -> Result<RawParameterRule> {
    match entry {
        ParamEntry::Inline(rule) => Ok(rule.clone()),
        ParamEntry::Reference(reference) => {
            let Some((namespace, key)) = reference.split_once(':') else {
                return Err(Error::InvalidParameter {
                    service: service_name.to_owned(),
                    operation: op_name.to_owned(),
                    parameter: param_name.to_owned(),
                    reason: format!("'{reference}' is not a 'namespace:key' reference"),
                });
            };
            library
                .get(namespace)
                .and_then(|entries| entries.get(key))
                .cloned()
                .ok_or_else(|| Error::NamedParameterNotFound {
                    service: service_name.to_owned(),
                    operation: op_name.to_owned(),
                    reference: reference.clone(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use restcall_core::{Location, ParamType};

    use super::*;

    fn definition(yaml: &str) -> ServiceDefinition {
        ServiceDefinition::from_yaml_str(yaml).expect("definition should parse")
    }

    fn httpbin() -> ServiceDefinition {
        definition(indoc! {"
            service:
              name: 'httpbin: HTTP Request & Response Service'
              apiVersion: '1'
              baseUrl: http://httpbin.org/
            defaults:
              foo: bar
              bat: baz
            parameters:
              global:
                bat:
                  type: string
                  location: query
            operations:
              testing:
                httpMethod: GET
                uri: get
                responseType: json
                parameters:
                  foo:
                    type: string
                    location: query
                  bat: 'global:bat'
        "})
    }

    #[test]
    fn missing_base_url_aborts_construction() {
        let err = ServiceDescription::new("svc", definition("service:\n  name: x\n"))
            .expect_err("should fail");
        assert!(matches!(err, Error::MissingBaseUrl { service } if service == "svc"));
    }

    #[test]
    fn empty_base_url_aborts_construction() {
        let err = ServiceDescription::new("svc", definition("service:\n  baseUrl: ''\n"))
            .expect_err("should fail");
        assert!(matches!(err, Error::MissingBaseUrl { .. }));
    }

    #[test]
    fn reference_resolves_to_the_library_rule() {
        let description = ServiceDescription::new("httpbin", httpbin()).expect("should build");
        let rule = &description.operations()["testing"].parameters["bat"];
        assert_eq!(rule.types, vec![ParamType::String]);
        assert_eq!(rule.location, Location::Query);
    }

    #[test]
    fn resolution_is_idempotent_with_inlining() {
        // A reference and the directly-inlined rule resolve identically.
        let referenced = ServiceDescription::new("httpbin", httpbin()).expect("should build");
        let mut inlined_def = httpbin();
        let library_rule = inlined_def.parameters["global"]["bat"].clone();
        let op = inlined_def.operations.get_mut("testing").expect("op");
        op.parameters
            .as_mut()
            .expect("map")
            .insert("bat".to_owned(), ParamEntry::Inline(library_rule));
        let inlined = ServiceDescription::new("httpbin", inlined_def).expect("should build");

        let via_reference = &referenced.operations()["testing"].parameters["bat"];
        let via_inline = &inlined.operations()["testing"].parameters["bat"];
        assert_eq!(via_reference.types, via_inline.types);
        assert_eq!(via_reference.location, via_inline.location);
        assert_eq!(via_reference.required, via_inline.required);
    }

    #[test]
    fn unresolvable_reference_is_fatal() {
        let mut def = httpbin();
        let op = def.operations.get_mut("testing").expect("op");
        op.parameters
            .as_mut()
            .expect("map")
            .insert("ghost".to_owned(), ParamEntry::Reference("missing:ref".to_owned()));
        let err = ServiceDescription::new("httpbin", def).expect_err("should fail");
        assert!(matches!(
            err,
            Error::NamedParameterNotFound { reference, .. } if reference == "missing:ref",
        ));
    }

    #[test]
    fn reference_without_colon_is_invalid_parameter() {
        let mut def = httpbin();
        let op = def.operations.get_mut("testing").expect("op");
        op.parameters
            .as_mut()
            .expect("map")
            .insert("bad".to_owned(), ParamEntry::Reference("nocolon".to_owned()));
        let err = ServiceDescription::new("httpbin", def).expect_err("should fail");
        assert!(matches!(err, Error::InvalidParameter { parameter, .. } if parameter == "bad"));
    }

    #[test]
    fn operation_missing_fields_is_invalid() {
        for missing in ["httpMethod", "uri", "responseType", "parameters"] {
            let mut def = httpbin();
            let op = def.operations.get_mut("testing").expect("op");
            match missing {
                "httpMethod" => op.http_method = None,
                "uri" => op.uri = None,
                "responseType" => op.response_type = None,
                _ => op.parameters = None,
            }
            let err = ServiceDescription::new("httpbin", def).expect_err(missing);
            assert!(
                matches!(&err, Error::InvalidOperation { operation, .. } if operation == "testing"),
                "{missing}: {err}",
            );
        }
    }

    #[test]
    fn unknown_response_type_is_invalid() {
        let mut def = httpbin();
        def.operations.get_mut("testing").expect("op").response_type = Some("yaml".to_owned());
        let err = ServiceDescription::new("httpbin", def).expect_err("should fail");
        assert!(err.to_string().contains("responseType"), "{err}");
    }

    #[test]
    fn parameter_missing_type_or_location_is_invalid() {
        let mut def = httpbin();
        let op = def.operations.get_mut("testing").expect("op");
        op.parameters.as_mut().expect("map").insert(
            "bare".to_owned(),
            ParamEntry::Inline(RawParameterRule::default()),
        );
        let err = ServiceDescription::new("httpbin", def).expect_err("should fail");
        assert!(matches!(err, Error::InvalidParameter { parameter, .. } if parameter == "bare"));
    }

    #[test]
    fn service_defaults_win_over_parameter_defaults() {
        let def = definition(indoc! {"
            service:
              baseUrl: http://x/
            defaults:
              bat: baz
            operations:
              testing:
                httpMethod: GET
                uri: get
                responseType: json
                parameters:
                  bat:
                    type: string
                    location: query
                    default: other
        "});
        let description = ServiceDescription::new("svc", def).expect("should build");
        assert_eq!(description.defaults()["bat"], json!("baz"));
    }

    #[test]
    fn parameter_default_fills_missing_service_default() {
        let def = definition(indoc! {"
            service:
              baseUrl: http://x/
            operations:
              testing:
                httpMethod: GET
                uri: get
                responseType: json
                parameters:
                  page:
                    type: integer
                    location: query
                    default: 1
        "});
        let description = ServiceDescription::new("svc", def).expect("should build");
        assert_eq!(description.defaults()["page"], json!(1));
    }

    #[test]
    fn build_uri_matches_httpbin_example() {
        let description = ServiceDescription::new("httpbin", httpbin()).expect("should build");
        let uri = description.build_uri("testing", &Map::new()).expect("should build uri");
        assert_eq!(uri, "http://httpbin.org/get?foo=bar&bat=baz");
    }

    #[test]
    fn caller_arguments_override_defaults() {
        let description = ServiceDescription::new("httpbin", httpbin()).expect("should build");
        let mut args = Map::new();
        args.insert("bat".to_owned(), json!("qux"));
        let uri = description.build_uri("testing", &args).expect("should build uri");
        assert_eq!(uri, "http://httpbin.org/get?foo=bar&bat=qux");
    }

    #[test]
    fn required_parameter_missing_fails_the_call() {
        let def = definition(indoc! {"
            service:
              baseUrl: http://x/
            operations:
              fetch:
                httpMethod: GET
                uri: items/{id}
                responseType: json
                parameters:
                  id:
                    type: string
                    location: uri
                    required: true
        "});
        let description = ServiceDescription::new("svc", def).expect("should build");
        let err = description.build_uri("fetch", &Map::new()).expect_err("should fail");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_operation_from_build_uri_and_response_type() {
        let description = ServiceDescription::new("httpbin", httpbin()).expect("should build");
        let mut args = Map::new();
        args.insert("x".to_owned(), json!(1));

        let err = description.build_uri("noSuchOp", &args).expect_err("should fail");
        let Error::OperationNotFound { service, operation, arguments } = err else {
            panic!("expected OperationNotFound");
        };
        assert_eq!(service, "httpbin");
        assert_eq!(operation, "noSuchOp");
        assert_eq!(arguments["x"], json!(1));

        let err = description.response_type("noSuchOp").expect_err("should fail");
        assert!(matches!(err, Error::OperationNotFound { operation, .. } if operation == "noSuchOp"));
    }

    #[test]
    fn response_type_reports_the_declared_format() {
        let description = ServiceDescription::new("httpbin", httpbin()).expect("should build");
        assert_eq!(description.response_type("testing").expect("ok"), ResponseType::Json);
    }

    #[test]
    fn path_substitution_uses_declared_order() {
        let def = definition(indoc! {"
            service:
              baseUrl: http://x/
            operations:
              nested:
                httpMethod: GET
                uri: '{org}/{repo}/issues'
                responseType: json
                parameters:
                  org:
                    type: string
                    location: uri
                    required: true
                  repo:
                    type: string
                    location: uri
                    required: true
        "});
        let description = ServiceDescription::new("svc", def).expect("should build");
        let mut args = Map::new();
        args.insert("org".to_owned(), json!("rust-lang"));
        args.insert("repo".to_owned(), json!("cargo"));
        let uri = description.build_uri("nested", &args).expect("should build uri");
        assert_eq!(uri, "http://x/rust-lang/cargo/issues");
    }
}

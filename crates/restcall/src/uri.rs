//! URI template builder: ordered substitution into path segments,
//! accumulation into a query string.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use url::form_urlencoded;

use restcall_core::{validate, Location, ParamRule};

use crate::error::Result;

/// Build the final request URI for one operation invocation.
///
/// Walks the parameters in declared order; each one is validated before
/// it is placed, and the first failure aborts the whole build — no
/// partial URI ever escapes. `uri`-location values replace literal
/// `{name}` placeholders with their string form (no URL-encoding; path
/// parameters are expected to already be URL-safe segments, and the
/// caller owns their safety). `query`-location values accumulate and
/// are percent-encoded as `key=value&...` at the end.
pub(crate) fn build(
    base_url: &str,
    template: &str,
    parameters: &IndexMap<String, ParamRule>,
    merged: &Map<String, Value>,
) -> Result<String> {
    let mut uri = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        template.trim_start_matches('/'),
    );
    let mut query: Vec<(&str, String)> = Vec::new();

    for (name, rule) in parameters {
        let value = merged.get(name);
        validate(name, rule, value)?;

        match rule.location {
            Location::Uri => {
                // An absent optional value substitutes as empty, the
                // same as a declared-null value.
                let rendered = value.map(restcall_core::value::display).unwrap_or_default();
                uri = uri.replace(&format!("{{{name}}}"), &rendered);
            }
            Location::Query => {
                if let Some(value) = value {
                    if !value.is_null() {
                        query.push((name, restcall_core::value::display(value)));
                    }
                }
            }
        }
    }

    if !query.is_empty() {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &query {
            serializer.append_pair(name, value);
        }
        uri.push('?');
        uri.push_str(&serializer.finish());
    }

    Ok(uri)
}

//! Response body decoders.
//!
//! Both decoders normalize the body first — byte-order mark stripped,
//! invalid byte sequences and disallowed control characters scrubbed to
//! a single space — and both decode an empty body to `null` rather than
//! erroring, since plenty of feeds legitimately return nothing.
//!
//! The XML decoder converts the parsed tree into the same generic
//! [`serde_json::Value`] shape the JSON decoder produces, rooted at the
//! single top-level element name, so callers consume either format
//! uniformly: text-only elements become strings, attributes land under
//! `"@attributes"`, and repeated child names collapse into arrays.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// A response body could not be decoded as its declared format.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The body is non-empty, not the literal text `null`, and not
    /// parseable as JSON.
    #[error("unable to parse response as JSON")]
    Json(#[source] serde_json::Error),

    /// The body is non-empty and not parseable as XML.
    #[error("unable to parse response as XML: {0}")]
    Xml(String),
}

/// Decode a JSON response body.
///
/// An empty (or whitespace-only) body decodes to `null`. A body that is
/// literally the text `null` in any letter casing also decodes to
/// `null` rather than erroring.
///
/// # Errors
///
/// [`DecodeError::Json`] for any other unparsable body.
pub fn decode_json(body: &[u8]) -> Result<Value, DecodeError> {
    let body = strip_bom(body);
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(_) if trimmed.eq_ignore_ascii_case("null") => Ok(Value::Null),
        Err(err) => Err(DecodeError::Json(err)),
    }
}

/// Decode an XML response body into the generic value shape.
///
/// Malformed feeds are common, so invalid UTF-8 sequences and control
/// characters are replaced with a space before parsing instead of
/// failing the whole decode. An empty body decodes to `null`.
///
/// # Errors
///
/// [`DecodeError::Xml`] when the scrubbed body still fails to parse.
pub fn decode_xml(body: &[u8]) -> Result<Value, DecodeError> {
    let text = scrub(strip_bom(body));
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    let mut reader = Reader::from_str(&text);

    loop {
        match read_event(&mut reader)? {
            Event::Start(start) => {
                let name = element_name(&start);
                let value = element(&mut reader, &start)?;
                let mut root = Map::new();
                root.insert(name, value);
                return Ok(Value::Object(root));
            }
            Event::Empty(start) => {
                let name = element_name(&start);
                let value = leaf(attributes(&start)?, Map::new(), "");
                let mut root = Map::new();
                root.insert(name, value);
                return Ok(Value::Object(root));
            }
            Event::Eof => return Err(DecodeError::Xml("document has no root element".to_owned())),
            // Declarations, comments, doctype, whitespace before the root.
            _ => {}
        }
    }
}

/// Parse one element's subtree into a value, starting just past its
/// opening tag.
fn element(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Value, DecodeError> {
    let attrs = attributes(start)?;
    let mut children: Map<String, Value> = Map::new();
    let mut text = String::new();

    loop {
        match read_event(reader)? {
            Event::Start(child) => {
                let name = element_name(&child);
                let value = element(reader, &child)?;
                push_child(&mut children, name, value);
            }
            Event::Empty(child) => {
                let name = element_name(&child);
                let value = leaf(attributes(&child)?, Map::new(), "");
                push_child(&mut children, name, value);
            }
            Event::Text(chunk) => {
                let chunk = chunk
                    .decode()
                    .map_err(|err| DecodeError::Xml(err.to_string()))?;
                text.push_str(&chunk);
            }
            // Entity and character references arrive as their own
            // events; resolved text goes into the same accumulator so
            // `a &amp; b` stays one string.
            Event::GeneralRef(reference) => {
                let name = reference
                    .decode()
                    .map_err(|err| DecodeError::Xml(err.to_string()))?;
                match resolve_reference(&name) {
                    Some(resolved) => text.push(resolved),
                    None => {
                        return Err(DecodeError::Xml(format!(
                            "unresolvable entity reference '&{name};'",
                        )))
                    }
                }
            }
            Event::CData(chunk) => {
                text.push_str(&String::from_utf8_lossy(&chunk.into_inner()));
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(DecodeError::Xml(format!(
                    "unexpected end of document inside '{}'",
                    element_name(start),
                )))
            }
            _ => {}
        }
    }

    Ok(leaf(attrs, children, &text))
}

/// Assemble an element's final value from its parts.
fn leaf(attrs: Map<String, Value>, children: Map<String, Value>, text: &str) -> Value {
    let text = text.trim();
    if attrs.is_empty() && children.is_empty() {
        if text.is_empty() {
            Value::Object(Map::new())
        } else {
            Value::String(text.to_owned())
        }
    } else {
        let mut map = Map::new();
        if !attrs.is_empty() {
            map.insert("@attributes".to_owned(), Value::Object(attrs));
        }
        for (name, value) in children {
            map.insert(name, value);
        }
        // Mixed text alongside children is dropped, matching the
        // map/list projection of the original format.
        Value::Object(map)
    }
}

/// Insert a child value, collapsing repeated names into an array.
fn push_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        None => {
            children.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn attributes(start: &BytesStart<'_>) -> Result<Map<String, Value>, DecodeError> {
    let mut attrs = Map::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| DecodeError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| DecodeError::Xml(err.to_string()))?
            .into_owned();
        attrs.insert(key, Value::String(value));
    }
    Ok(attrs)
}

/// Resolve a general reference name: the five predefined XML entities
/// plus decimal (`#65`) and hex (`#x41`) character references.
fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, DecodeError> {
    reader.read_event().map_err(|err| DecodeError::Xml(err.to_string()))
}

fn strip_bom(body: &[u8]) -> &[u8] {
    body.strip_prefix(UTF8_BOM).unwrap_or(body)
}

/// Replace invalid byte sequences (already folded to U+FFFD by the
/// lossy conversion) and disallowed control characters with a space so
/// a sloppy feed does not kill the parser.
fn scrub(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .map(|c| match c {
            '\u{fffd}' => ' ',
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => ' ',
            c => c,
        })
        .collect()
}

#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference
//!
//! # Types
//!
//! - [`ServiceDefinition`] — the raw declarative definition (serde)
//! - [`ServiceDescription`] — resolved, validated schema; `build_uri` + `response_type`
//! - [`Client`] — dispatches a named operation over a [`Transport`]
//! - [`Registry`] — memoizing client factory keyed by service name
//! - [`decode_json`] / [`decode_xml`] — body decoders producing one generic value shape
//! - [`Error`] — the full failure taxonomy, from schema errors to decode errors
//!
//! # Companion Crate
//!
//! | Crate                  | Purpose                             |
//! |------------------------|-------------------------------------|
//! | `restcall` (this)      | Definition model, engine, transport |
//! | `restcall-core`        | Parameter rules + validator         |

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod uri;

pub mod client;
pub mod decode;
pub mod definition;
pub mod description;
pub mod error;
pub mod registry;
pub mod transport;

pub use client::Client;
pub use decode::{decode_json, decode_xml, DecodeError};
pub use definition::{ParamEntry, RawOperation, ServiceDefinition, ServiceMetadata};
pub use description::{Operation, ServiceDescription};
pub use error::{Error, Result};
pub use registry::Registry;
pub use transport::{Transport, TransportError};

#[cfg(feature = "reqwest")]
pub use transport::HttpTransport;

// Rule and value types come from the core crate; re-exported so most
// callers only ever name one crate.
pub use restcall_core::{
    validate, Location, ParamRule, ParamType, RawParameterRule, ResponseType, TypeSpec,
    ValidateError,
};

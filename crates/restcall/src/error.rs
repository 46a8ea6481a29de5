//! Typed error enum for the `restcall` library API.
//!
//! Construction-time schema errors, call-time lookup/validation errors,
//! and the transport/decode failures raised by the I/O collaborators
//! all surface through one [`Error`] so callers can match on the
//! variant they care about. Nothing is retried or downgraded inside
//! the engine; every failure propagates synchronously to the caller.

use serde_json::{Map, Value};

use crate::decode::DecodeError;
use crate::transport::TransportError;
use restcall_core::ValidateError;

/// Errors produced by `restcall` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure while loading a definition file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure while loading a definition.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing failure while loading a definition.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The definition declares no (or an empty) `service.baseUrl`.
    #[error("'baseUrl' is a required field for service '{service}'")]
    MissingBaseUrl {
        /// The service being constructed.
        service: String,
    },

    /// An operation parameter references a `namespace:key` entry that
    /// does not exist in the named parameter library.
    #[error("named parameter '{reference}' not found in service '{service}'")]
    NamedParameterNotFound {
        /// The service being constructed.
        service: String,
        /// The operation declaring the dangling reference.
        operation: String,
        /// The unresolved `namespace:key` string.
        reference: String,
    },

    /// An operation is missing `httpMethod`, `uri`, `responseType`, or
    /// its `parameters` map, or declares an unknown response type.
    #[error("invalid operation configuration for '{operation}': {reason}")]
    InvalidOperation {
        /// The service being constructed.
        service: String,
        /// The offending operation.
        operation: String,
        /// What exactly is missing or malformed.
        reason: String,
    },

    /// A resolved parameter rule is missing `type`/`location` or
    /// carries a pattern that does not compile.
    #[error("invalid parameter configuration for '{operation}:{parameter}': {reason}")]
    InvalidParameter {
        /// The service being constructed.
        service: String,
        /// The operation declaring the parameter.
        operation: String,
        /// The offending parameter.
        parameter: String,
        /// What exactly is missing or malformed.
        reason: String,
    },

    /// No definition has been registered under the requested service
    /// name.
    #[error("no definition registered for service '{service}'")]
    ServiceNotFound {
        /// The unknown service name.
        service: String,
    },

    /// The requested operation is not declared by the service.
    ///
    /// Carries the attempted arguments so callers can log exactly what
    /// was asked for. Distinct from validation errors so "does this
    /// service support X" can be special-cased.
    #[error("operation '{operation}' not found in service '{service}'")]
    OperationNotFound {
        /// The service that was asked.
        service: String,
        /// The unknown operation name.
        operation: String,
        /// The arguments the caller supplied.
        arguments: Map<String, Value>,
    },

    /// A caller-supplied argument failed its parameter rule.
    #[error(transparent)]
    Validation(#[from] ValidateError),

    /// The HTTP transport failed (network error or non-2xx status).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be decoded as the declared format.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The invocation arguments were neither null nor a string-keyed
    /// map. Rejected before any description logic runs; no request is
    /// issued.
    #[error("operations take null or a map of named arguments")]
    InvalidArguments,
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;

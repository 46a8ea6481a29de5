//! Parameter descriptor types and the rule validator for the restcall
//! ecosystem.
//!
//! This crate holds the pure, I/O-free layer: the declared shape of a
//! parameter rule ([`RawParameterRule`]), its resolved form
//! ([`ParamRule`]), runtime value kind checks over
//! [`serde_json::Value`], and the [`validate`] function that applies a
//! rule to a candidate value.
//!
//! The higher-level `restcall` crate builds the service-description
//! engine on top of these types. You should not normally need to depend
//! on this crate directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod types;
pub mod validate;
pub mod value;

pub use types::{Location, ParamRule, ParamType, RawParameterRule, ResponseType, RuleError, TypeSpec};
pub use validate::{validate, ValidateError};

//! The operation dispatcher: a named call becomes one validated URI,
//! one GET, and one decoded body.

use serde_json::{Map, Value};

use restcall_core::ResponseType;

use crate::decode::{decode_json, decode_xml};
use crate::definition::ServiceDefinition;
use crate::description::ServiceDescription;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// A client for one declaratively-described service.
///
/// Owns the service's resolved [`ServiceDescription`] and a
/// [`Transport`]; every invocation is a single synchronous
/// validate-template-fetch-decode pass.
///
/// ```no_run
/// use restcall::{Client, ServiceDefinition};
/// use serde_json::json;
///
/// let definition = ServiceDefinition::load("httpbin.yaml")?;
/// let client = Client::open("httpbin", definition)?;
/// let body = client.invoke("testing", json!({"foo": "qux"}))?;
/// # Ok::<(), restcall::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client<T: Transport> {
    description: ServiceDescription,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl Client<crate::transport::HttpTransport> {
    /// Construct a client over the default blocking HTTP transport.
    ///
    /// # Errors
    ///
    /// Any schema error from [`ServiceDescription::new`].
    pub fn open(service_name: impl Into<String>, definition: ServiceDefinition) -> Result<Self> {
        Self::with_transport(service_name, definition, crate::transport::HttpTransport::new())
    }
}

impl<T: Transport> Client<T> {
    /// Construct a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Any schema error from [`ServiceDescription::new`].
    pub fn with_transport(
        service_name: impl Into<String>,
        definition: ServiceDefinition,
        transport: T,
    ) -> Result<Self> {
        Ok(Self {
            description: ServiceDescription::new(service_name, definition)?,
            transport,
        })
    }

    /// Invoke a named operation.
    ///
    /// `args` must be `null` or a string-keyed map (empty is fine) —
    /// any other shape is a caller error, rejected before any
    /// description logic runs and without issuing a request.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArguments`] for a malformed `args` shape, plus
    /// everything [`Client::invoke_with`] can return.
    pub fn invoke(&self, operation: &str, args: Value) -> Result<Value> {
        let args = match args {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => return Err(Error::InvalidArguments),
        };
        self.invoke_with(operation, &args)
    }

    /// Invoke a named operation with an argument map.
    ///
    /// # Errors
    ///
    /// [`Error::OperationNotFound`], [`Error::Validation`],
    /// [`Error::Transport`], or [`Error::Decode`], depending on which
    /// stage fails; every failure is surfaced synchronously.
    pub fn invoke_with(&self, operation: &str, args: &Map<String, Value>) -> Result<Value> {
        let uri = self.description.build_uri(operation, args)?;
        let response_type = self.description.response_type(operation)?;
        let body = self.transport.get(&uri, response_type)?;
        let decoded = match response_type {
            ResponseType::Json => decode_json(&body)?,
            ResponseType::Xml => decode_xml(&body)?,
        };
        Ok(decoded)
    }

    /// The resolved description backing this client.
    #[must_use]
    pub fn description(&self) -> &ServiceDescription {
        &self.description
    }

    /// The transport this client dispatches through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

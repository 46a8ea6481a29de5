//! The HTTP transport seam.
//!
//! The engine never talks to the network directly; it hands a finished
//! URI to a [`Transport`] and gets raw body bytes back. The default
//! [`HttpTransport`] (behind the `reqwest` feature) performs one
//! blocking GET per call — no caching, retries, or pipelining. Tests
//! substitute their own implementations to run without a network.

use restcall_core::ResponseType;

/// The transport failed to produce a response body.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Connection, TLS, or protocol failure from the HTTP client.
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("GET {uri} returned status {status}")]
    Status {
        /// The requested URI.
        uri: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Failure from a custom transport implementation.
    #[error("{0}")]
    Other(String),
}

/// A blocking HTTP GET collaborator.
///
/// One call, one request; any timeout or retry policy lives inside the
/// implementation, not in the engine.
pub trait Transport {
    /// Fetch `uri`, advertising the declared response format in the
    /// `Accept` header, and return the raw body bytes.
    ///
    /// # Errors
    ///
    /// [`TransportError`] for network failures and non-2xx statuses.
    fn get(&self, uri: &str, response_type: ResponseType) -> Result<Vec<u8>, TransportError>;
}

/// The default transport: a shared [`reqwest::blocking::Client`].
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "reqwest")]
impl HttpTransport {
    /// Create a transport with a fresh client and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a preconfigured client (custom timeouts, proxies, ...).
    #[must_use]
    pub const fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "reqwest")]
impl Transport for HttpTransport {
    fn get(&self, uri: &str, response_type: ResponseType) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(uri)
            .header(reqwest::header::ACCEPT, response_type.mime())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                uri: uri.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

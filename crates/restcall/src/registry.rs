//! A memoizing factory for clients, keyed by service name.

use std::collections::HashMap;

use crate::client::Client;
use crate::definition::ServiceDefinition;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// Holds service definitions and constructs each [`Client`] at most
/// once per distinct service name, returning the same instance on
/// every later request.
///
/// This is a simple memoizing factory, not a concurrency primitive —
/// lookups take `&mut self`. Failed constructions are not cached, so a
/// corrected definition can be re-registered and retried.
#[derive(Debug)]
pub struct Registry<T: Transport> {
    transport: T,
    definitions: HashMap<String, ServiceDefinition>,
    clients: HashMap<String, Client<T>>,
}

#[cfg(feature = "reqwest")]
impl Registry<crate::transport::HttpTransport> {
    /// A registry whose clients share the default blocking HTTP
    /// transport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(crate::transport::HttpTransport::new())
    }
}

#[cfg(feature = "reqwest")]
impl Default for Registry<crate::transport::HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport + Clone> Registry<T> {
    /// A registry whose clients clone the given transport.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            definitions: HashMap::new(),
            clients: HashMap::new(),
        }
    }

    /// Register (or replace) the definition for a service name.
    ///
    /// Replacing a definition does not evict an already-constructed
    /// client; the registry contract is construct-once per name.
    pub fn define(&mut self, service_name: impl Into<String>, definition: ServiceDefinition) {
        self.definitions.insert(service_name.into(), definition);
    }

    /// The client for a service, constructing it on first request.
    ///
    /// # Errors
    ///
    /// [`Error::ServiceNotFound`] when no definition is registered
    /// under `service_name`, or any schema error from the first
    /// construction.
    pub fn client(&mut self, service_name: &str) -> Result<&Client<T>> {
        if !self.clients.contains_key(service_name) {
            let definition = self
                .definitions
                .get(service_name)
                .cloned()
                .ok_or_else(|| Error::ServiceNotFound { service: service_name.to_owned() })?;
            let client =
                Client::with_transport(service_name, definition, self.transport.clone())?;
            self.clients.insert(service_name.to_owned(), client);
        }
        Ok(&self.clients[service_name])
    }
}

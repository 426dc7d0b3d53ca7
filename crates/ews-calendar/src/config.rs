//! Configuration for the EWS gateway.

use secrecy::{ExposeSecret, SecretString};

/// Configuration for connecting to the Exchange Web Services endpoint.
#[derive(Debug, Clone)]
pub struct EwsConfig {
    /// Server host name, or a full endpoint URL starting with `http`.
    pub server: String,
    /// Service account user name with impersonation rights.
    pub username: String,
    /// Service account password.
    password: SecretString,
    /// Accept invalid TLS certificates. Off by default; enabling it is an
    /// explicit operator decision and is logged loudly at client creation.
    pub accept_invalid_certs: bool,
}

impl EwsConfig {
    /// Create a new configuration with the given server and credentials.
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            accept_invalid_certs: false,
        }
    }

    /// Builder method to accept invalid TLS certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Get the SOAP endpoint URL.
    ///
    /// A bare host name resolves to the standard `/EWS/Exchange.asmx` path.
    pub fn endpoint_url(&self) -> String {
        if self.server.starts_with("http://") || self.server.starts_with("https://") {
            self.server.clone()
        } else {
            format!("https://{}/EWS/Exchange.asmx", self.server)
        }
    }

    /// Get the password (exposes the secret).
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

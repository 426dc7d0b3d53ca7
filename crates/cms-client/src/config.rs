//! Configuration for the conferencing directory client.

use secrecy::{ExposeSecret, SecretString};

/// Configuration for connecting to the conferencing directory API.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// Base API URL, e.g. `https://cms.example.com:445/api/v1/`.
    pub base_url: String,
    /// Basic-auth user name.
    pub username: String,
    /// Basic-auth password.
    password: SecretString,
    /// Accept invalid TLS certificates. Off by default; enabling it is an
    /// explicit operator decision and is logged loudly at client creation.
    pub accept_invalid_certs: bool,
    /// Suffix of the composite personal-room key, e.g. `space`. A user's
    /// room is looked up with the filter `{user}.{suffix}`.
    pub personal_room_suffix: String,
    /// Base URL of the web join page, e.g. `https://join.example.com/`.
    pub web_base_url: String,
    /// SIP domain suffix appended to the room URI, e.g. `@example.com`.
    pub sip_domain: String,
}

impl CmsConfig {
    /// Create a new configuration with the given endpoint and credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            accept_invalid_certs: false,
            personal_room_suffix: String::new(),
            web_base_url: String::new(),
            sip_domain: String::new(),
        }
    }

    /// Builder method to accept invalid TLS certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Builder method to set the personal-room key suffix.
    pub fn with_personal_room_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.personal_room_suffix = suffix.into();
        self
    }

    /// Builder method to set the web join page base URL.
    pub fn with_web_base_url(mut self, url: impl Into<String>) -> Self {
        self.web_base_url = url.into();
        self
    }

    /// Builder method to set the SIP domain suffix.
    pub fn with_sip_domain(mut self, domain: impl Into<String>) -> Self {
        self.sip_domain = domain.into();
        self
    }

    /// Get the password (exposes the secret).
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Get the paginated user listing URL.
    pub fn users_url(&self, offset: usize, limit: usize) -> String {
        format!("{}users?offset={}&limit={}", self.api_base(), offset, limit)
    }

    /// Get the coSpace listing URL for a composite-key filter.
    pub fn cospaces_url(&self, filter: &str) -> String {
        format!(
            "{}coSpaces?filter={}",
            self.api_base(),
            urlencoding::encode(filter)
        )
    }

    /// Get the coSpace detail URL for a room identifier.
    pub fn cospace_detail_url(&self, cospace_id: &str) -> String {
        format!("{}coSpaces/{}/", self.api_base(), cospace_id)
    }

    /// Base URL normalized to end with a slash.
    fn api_base(&self) -> String {
        if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        }
    }
}

//! Response types for the conferencing directory API.

/// PIN text substituted when a room has no passcode configured.
pub const DEFAULT_PIN: &str = "нет";

/// A conferencing room reference from the coSpace listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoSpace {
    /// Room identifier used by the detail endpoint.
    pub id: String,
}

/// Raw connection parameters parsed from a coSpace detail document.
///
/// All fields are optional at this level; validation happens when composing
/// [`JoinDetails`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoSpaceDetails {
    pub uri: Option<String>,
    pub call_id: Option<String>,
    pub passcode: Option<String>,
    pub secret: Option<String>,
}

/// Resolved join parameters for one enrichment attempt.
///
/// Transient: composed per attempt, rendered into a meeting body once and
/// discarded. Carries both the composed fields and the raw parsed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinDetails {
    /// Web join link, `{web_base}meeting/{call_id}?secret={secret}`.
    pub web_link: String,
    /// SIP dial address, `{uri}{sip_domain}`.
    pub sip_address: String,
    /// Numeric call identifier.
    pub call_id: String,
    /// Room PIN, or [`DEFAULT_PIN`] when the room has none.
    pub pin: String,
    /// Raw room URI as parsed from the detail document.
    pub uri: String,
    /// Raw passcode as parsed, absent when the room has none.
    pub passcode: Option<String>,
    /// Raw shared secret as parsed.
    pub secret: String,
}

//! Conferencing directory HTTP client.

use std::time::Duration;

use reqwest::Client;
use roxmltree::Document;
use tracing::{debug, info, warn};

use crate::config::CmsConfig;
use crate::error::CmsError;
use crate::types::{CoSpace, CoSpaceDetails, JoinDetails, DEFAULT_PIN};
use crate::xml;

/// Page size used when listing directory users.
const USERS_PAGE_LIMIT: usize = 20;

/// Client for the conferencing directory API.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: Client,
    config: CmsConfig,
}

impl CmsClient {
    /// Create a client from the given configuration.
    pub fn new(config: CmsConfig) -> Result<Self, CmsError> {
        if config.accept_invalid_certs {
            warn!(
                "TLS certificate verification disabled for the conferencing directory at {}",
                config.base_url
            );
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(CmsError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    /// List all user JIDs from the directory, paging until the reported total.
    ///
    /// A non-success page response ends the listing at whatever was collected
    /// so far; transport errors are returned to the caller.
    pub async fn list_user_jids(&self) -> Result<Vec<String>, CmsError> {
        let mut jids: Vec<String> = Vec::new();
        let mut offset = 0;

        loop {
            let url = self.config.users_url(offset, USERS_PAGE_LIMIT);
            debug!("fetching directory users: {}", url);

            let response = self.get_xml(&url).await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                warn!(
                    "failed to fetch users from directory: {} {}",
                    status.as_u16(),
                    body
                );
                break;
            }

            let doc = Document::parse(&body)?;
            let root = doc.root_element();

            for user in root
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "user")
            {
                let jid = user
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "userJid")
                    .and_then(|n| n.text())
                    .filter(|s| !s.is_empty());

                match jid {
                    Some(jid) => jids.push(jid.to_string()),
                    None => warn!("skipping directory user without a valid userJid"),
                }
            }

            let total: usize = root
                .attribute("total")
                .and_then(|t| t.parse().ok())
                .unwrap_or(jids.len());

            if jids.len() >= total {
                break;
            }
            offset += USERS_PAGE_LIMIT;
        }

        Ok(jids)
    }

    /// Look up a user's personal coSpace by composite filter key.
    ///
    /// Returns the first matching room, or `None` when the filter matches
    /// nothing or the listing call does not succeed.
    pub async fn find_cospace(&self, filter: &str) -> Result<Option<CoSpace>, CmsError> {
        let url = self.config.cospaces_url(filter);
        let response = self.get_xml(&url).await?;

        let status = response.status();
        if !status.is_success() {
            warn!("failed to get coSpace (filter: {}): {}", filter, status.as_u16());
            return Ok(None);
        }

        let body = response.text().await?;
        let doc = Document::parse(&body)?;

        let cospace = xml::find_element(&doc, "coSpace")
            .and_then(|n| n.attribute("id"))
            .map(|id| CoSpace { id: id.to_string() });

        Ok(cospace)
    }

    /// Fetch the raw connection parameters of a coSpace.
    pub async fn cospace_details(&self, cospace_id: &str) -> Result<CoSpaceDetails, CmsError> {
        let url = self.config.cospace_detail_url(cospace_id);
        let response = self.get_xml(&url).await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("coSpace detail XML: {}", body);
        let doc = Document::parse(&body)?;

        Ok(CoSpaceDetails {
            uri: xml::find_text(&doc, "uri").map(str::to_string),
            call_id: xml::find_text(&doc, "callId").map(str::to_string),
            passcode: xml::find_text(&doc, "passcode")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            secret: xml::find_text(&doc, "secret").map(str::to_string),
        })
    }

    /// Resolve the join details for a user's personal room.
    ///
    /// This is the surface the enrichment pipeline calls. It never raises:
    /// transport failures, missing rooms and incomplete detail documents are
    /// all logged here and become `None` ("nothing to enrich with").
    pub async fn resolve_personal_room(&self, user_id: &str) -> Option<JoinDetails> {
        let filter = format!("{}.{}", user_id, self.config.personal_room_suffix);

        let cospace = match self.find_cospace(&filter).await {
            Ok(Some(cospace)) => cospace,
            Ok(None) => {
                info!("no coSpace found for {} (filter: {})", user_id, filter);
                return None;
            }
            Err(e) => {
                warn!("coSpace lookup failed for {}: {}", user_id, e);
                return None;
            }
        };

        let details = match self.cospace_details(&cospace.id).await {
            Ok(details) => details,
            Err(e) => {
                warn!("failed to get room details for {}: {}", user_id, e);
                return None;
            }
        };

        let pin = details
            .passcode
            .clone()
            .unwrap_or_else(|| DEFAULT_PIN.to_string());

        let (Some(uri), Some(call_id), Some(secret)) = (
            details.uri.clone(),
            details.call_id.clone(),
            details.secret.clone(),
        ) else {
            warn!(
                "incomplete coSpace details for {}! parsed: {:?}, {:?}, {}, {:?}",
                user_id, details.uri, details.call_id, pin, details.secret
            );
            return None;
        };

        let join = JoinDetails {
            web_link: format!(
                "{}meeting/{}?secret={}",
                self.config.web_base_url, call_id, secret
            ),
            sip_address: format!("{}{}", uri, self.config.sip_domain),
            call_id,
            pin,
            uri,
            passcode: details.passcode,
            secret,
        };

        info!(
            "join details for {}: web_link={}, sip_address={}, call_id={}, pin={}",
            user_id, join.web_link, join.sip_address, join.call_id, join.pin
        );

        Some(join)
    }

    async fn get_xml(&self, url: &str) -> Result<reqwest::Response, CmsError> {
        self.http
            .get(url)
            .basic_auth(&self.config.username, Some(self.config.password()))
            .header("Accept", "application/xml")
            .send()
            .await
            .map_err(CmsError::Http)
    }
}

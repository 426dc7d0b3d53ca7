//! EWS SOAP gateway client.

use std::time::Duration;

use async_trait::async_trait;
use calendar_core::{CalendarError, CalendarEvent, CalendarGateway};
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::EwsConfig;
use crate::{parse, soap};

/// Calendar gateway speaking EWS SOAP with per-call mailbox impersonation.
#[derive(Debug, Clone)]
pub struct EwsClient {
    http: Client,
    config: EwsConfig,
}

impl EwsClient {
    /// Create a client from the given configuration.
    pub fn new(config: EwsConfig) -> Result<Self, CalendarError> {
        if config.accept_invalid_certs {
            warn!(
                "TLS certificate verification disabled for the calendar service at {}",
                config.endpoint_url()
            );
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| CalendarError::Transport(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &EwsConfig {
        &self.config
    }

    async fn soap_call(&self, request: String) -> Result<String, CalendarError> {
        let response = self
            .http
            .post(self.config.endpoint_url())
            .basic_auth(&self.config.username, Some(self.config.password()))
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(request)
            .send()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;

        // A SOAP fault arrives as HTTP 500 with the fault in the body; let
        // the parser classify it. Anything else non-success is transport.
        if !status.is_success() && status.as_u16() != 500 {
            return Err(CalendarError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl CalendarGateway for EwsClient {
    async fn upcoming_events(
        &self,
        mailbox: &str,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        debug!("fetching up to {} upcoming events for {}", limit, mailbox);

        let request = soap::find_item_request(mailbox, Utc::now(), limit);
        let response = self.soap_call(request).await?;
        let mut events = parse::parse_find_item(&response, mailbox)?;

        if events.is_empty() {
            return Ok(events);
        }

        let item_refs: Vec<(String, String)> = events
            .iter()
            .map(|e| (e.id.clone(), e.change_key.clone()))
            .collect();
        let request = soap::get_item_request(mailbox, &item_refs);
        let response = self.soap_call(request).await?;
        let bodies = parse::parse_item_bodies(&response, mailbox)?;

        for event in &mut events {
            if let Some(body) = bodies.get(&event.id) {
                event.body = body.clone();
            }
        }

        Ok(events)
    }

    async fn update_body(
        &self,
        mailbox: &str,
        event_id: &str,
        change_key: &str,
        body: &str,
    ) -> Result<(), CalendarError> {
        debug!("updating body of {} for {}", event_id, mailbox);

        let request = soap::update_body_request(mailbox, event_id, change_key, body);
        let response = self.soap_call(request).await?;
        parse::parse_update_response(&response, mailbox)
    }

    fn name(&self) -> &str {
        "EwsClient"
    }
}

//! The enrichment poll loop.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use calendar_core::{CalendarError, CalendarEvent, CalendarGateway};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::error::EnricherError;
use crate::matcher;
use crate::memory::MatchMemory;
use crate::render::{render_invitation, InvitationFields};
use crate::resolver::RoomResolver;
use crate::roster::RosterStore;

/// Log target for permanent mailbox failures. The binary routes this target
/// to a dedicated failure log file.
pub const FAILURE_LOG_TARGET: &str = "mailbox_failures";

/// Default delay between poll cycles (60 seconds).
const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(60);

/// Default number of soonest-starting future events fetched per mailbox.
const DEFAULT_FETCH_LIMIT: usize = 20;

/// Configuration for the enrichment worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Marker word that must appear in an event's location field.
    pub marker: String,
    /// Path of the invitation template file, re-read on every enrichment.
    pub template_path: PathBuf,
    /// Delay between poll cycles.
    pub poll_period: Duration,
    /// Events fetched per mailbox per cycle.
    pub fetch_limit: usize,
}

impl WorkerConfig {
    /// Create a config with the given marker and template path.
    pub fn new(marker: impl Into<String>, template_path: impl Into<PathBuf>) -> Self {
        Self {
            marker: marker.into(),
            template_path: template_path.into(),
            poll_period: DEFAULT_POLL_PERIOD,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    /// Builder method to set the poll period.
    pub fn with_poll_period(mut self, period: Duration) -> Self {
        self.poll_period = period;
        self
    }

    /// Builder method to set the per-mailbox fetch limit.
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }
}

/// The poll loop driving the enrichment pipeline.
///
/// On a fixed cadence the worker re-reads the roster, fetches each mailbox's
/// near-future events through the gateway, applies the match predicate and,
/// on a match, resolves join details and writes the rendered body back.
/// Failures are contained at the smallest possible scope: one bad mailbox or
/// one malformed response never affects the others.
pub struct EnrichmentWorker<G: CalendarGateway, R: RoomResolver> {
    gateway: G,
    resolver: R,
    config: WorkerConfig,
    roster: RosterStore,
    memory: MatchMemory,
    started_at: DateTime<Utc>,
}

impl<G: CalendarGateway, R: RoomResolver> EnrichmentWorker<G, R> {
    /// Create a worker. The match memory is injected so a future durable
    /// implementation can replace the in-process one.
    pub fn new(
        gateway: G,
        resolver: R,
        config: WorkerConfig,
        roster: RosterStore,
        memory: MatchMemory,
    ) -> Self {
        Self {
            gateway,
            resolver,
            config,
            roster,
            memory,
            started_at: Utc::now(),
        }
    }

    /// Get the match memory.
    pub fn memory(&self) -> &MatchMemory {
        &self.memory
    }

    /// The instant this worker considers its own start. Events created at or
    /// before it never match.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Run one full poll cycle without any shutdown checks.
    pub async fn run_once(&mut self) {
        let mut idle = std::future::pending::<()>();
        self.cycle(Pin::new(&mut idle)).await;
    }

    /// Run the worker until the shutdown future completes.
    ///
    /// The signal is honored between mailboxes and between cycles, never in
    /// the middle of a write-back, so no partial notifications are sent.
    pub async fn run_with_shutdown<S>(mut self, shutdown: S) -> Result<(), EnricherError>
    where
        S: Future<Output = ()> + Send,
    {
        info!(
            gateway = self.gateway.name(),
            resolver = self.resolver.name(),
            marker = %self.config.marker,
            poll_period = ?self.config.poll_period,
            "starting enrichment worker"
        );

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(self.config.poll_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = shutdown.as_mut() => {
                    info!("shutdown signal received, stopping enrichment worker");
                    return Ok(());
                }

                _ = ticker.tick() => {
                    if self.cycle(shutdown.as_mut()).await {
                        info!("shutdown signal received, stopping enrichment worker");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Run the worker indefinitely.
    pub async fn run(self) -> Result<(), EnricherError> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// One poll cycle. Returns `true` when the shutdown future completed
    /// between mailboxes.
    async fn cycle<S: Future<Output = ()>>(&mut self, mut shutdown: Pin<&mut S>) -> bool {
        let roster = match self.roster.read() {
            Ok(roster) => roster,
            Err(e) => {
                error!("failed to read roster, skipping cycle: {}", e);
                return false;
            }
        };

        debug!(
            mailboxes = roster.mailboxes.len(),
            refreshed_at = ?roster.refreshed_at,
            "starting poll cycle"
        );

        for mailbox in &roster.mailboxes {
            if shutdown.as_mut().now_or_never().is_some() {
                return true;
            }
            if self.memory.is_failed(mailbox) {
                debug!("skipping memoized failed mailbox {}", mailbox);
                continue;
            }

            if let Err(e) = self.process_mailbox(mailbox).await {
                if e.is_permanent() {
                    self.memory.mark_failed(mailbox);
                    error!(
                        target: FAILURE_LOG_TARGET,
                        "failed to process {}: {}", mailbox, e
                    );
                } else {
                    error!("failed to process {}: {}", mailbox, e);
                }
            }
        }

        false
    }

    /// Fetch one mailbox's events and enrich every match.
    async fn process_mailbox(&mut self, mailbox: &str) -> Result<(), CalendarError> {
        let events = self
            .gateway
            .upcoming_events(mailbox, self.config.fetch_limit)
            .await?;

        for event in &events {
            match matcher::qualifies(
                event,
                mailbox,
                &self.config.marker,
                self.started_at,
                &self.memory,
            ) {
                Ok(()) => {
                    // The event is seen from here on, whatever the attempt
                    // yields: no retries within this process run.
                    self.memory.mark_seen(&event.id);
                    info!(
                        "match: {} | {} | {}",
                        event.subject,
                        event.start,
                        event.location.as_deref().unwrap_or("")
                    );
                    self.enrich(mailbox, event).await;
                }
                Err(reason) => {
                    debug!("skipping {} for {}: {}", event.id, mailbox, reason);
                }
            }
        }

        Ok(())
    }

    /// One enrichment attempt: resolve, render, write back. All failures are
    /// contained here and only logged.
    async fn enrich(&self, mailbox: &str, event: &CalendarEvent) {
        let user_id = mailbox.split('@').next().unwrap_or(mailbox);

        let Some(details) = self.resolver.resolve(user_id).await else {
            info!("no join details for {}, nothing to enrich with", user_id);
            return;
        };

        let template = match std::fs::read_to_string(&self.config.template_path) {
            Ok(template) => template,
            Err(e) => {
                error!(
                    "failed to read invitation template {}: {}",
                    self.config.template_path.display(),
                    e
                );
                return;
            }
        };

        let body = render_invitation(&event.body, &template, &InvitationFields::from(&details));

        match self
            .gateway
            .update_body(mailbox, &event.id, &event.change_key, &body)
            .await
        {
            Ok(()) => info!("meeting updated and participants notified"),
            Err(e) => error!("failed to update meeting for {}: {}", mailbox, e),
        }
    }
}

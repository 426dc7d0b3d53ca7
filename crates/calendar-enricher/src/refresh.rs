//! Daily roster refresh from the conferencing directory.

use std::future::Future;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use cms_client::CmsClient;
use tracing::{debug, error, info, warn};

use crate::error::EnricherError;
use crate::roster::RosterStore;

/// Timestamp format of the roster file's first line.
const ROSTER_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Background task that rebuilds the roster from the directory's user
/// listing once a day at a fixed local time.
///
/// Shares nothing with the poll loop except the roster file, which is
/// swapped atomically by [`RosterStore::write`].
pub struct RosterRefresher {
    cms: CmsClient,
    store: RosterStore,
    mail_domain: String,
    sync_time: NaiveTime,
}

impl RosterRefresher {
    /// Create a refresher.
    ///
    /// `mail_domain` is appended to each directory JID's local part to form
    /// a mailbox address, and must include the `@`, e.g. `@corp.example.com`.
    pub fn new(
        cms: CmsClient,
        store: RosterStore,
        mail_domain: impl Into<String>,
        sync_time: NaiveTime,
    ) -> Self {
        Self {
            cms,
            store,
            mail_domain: mail_domain.into(),
            sync_time,
        }
    }

    /// Run one refresh: list directory users and rewrite the roster.
    ///
    /// An empty listing never overwrites the existing roster. Returns the
    /// number of mailboxes written.
    pub async fn refresh_once(&self) -> Result<usize, EnricherError> {
        let jids = self.cms.list_user_jids().await?;
        let mailboxes: Vec<String> = jids
            .iter()
            .map(|jid| jid_to_mailbox(jid, &self.mail_domain))
            .collect();

        if mailboxes.is_empty() {
            warn!("no users retrieved from the directory, keeping existing roster");
            return Ok(0);
        }

        let stamp = Local::now().format(ROSTER_STAMP_FORMAT).to_string();
        self.store.write(&stamp, &mailboxes)?;
        info!(
            "saved {} mailboxes to {}",
            mailboxes.len(),
            self.store.path().display()
        );
        Ok(mailboxes.len())
    }

    /// Run the daily schedule until the shutdown future completes.
    pub async fn run_with_shutdown<S>(self, shutdown: S) -> Result<(), EnricherError>
    where
        S: Future<Output = ()> + Send,
    {
        info!(sync_time = %self.sync_time, "starting roster refresher");
        tokio::pin!(shutdown);

        loop {
            let wait = duration_until_next(self.sync_time);
            debug!("next roster refresh in {:?}", wait);

            tokio::select! {
                biased;

                () = shutdown.as_mut() => {
                    info!("shutdown signal received, stopping roster refresher");
                    return Ok(());
                }

                _ = tokio::time::sleep(wait) => {
                    info!("scheduled roster refresh starting");
                    if let Err(e) = self.refresh_once().await {
                        error!("roster refresh failed: {}", e);
                    }
                }
            }
        }
    }
}

/// Map a directory JID to a mailbox address.
fn jid_to_mailbox(jid: &str, mail_domain: &str) -> String {
    let local = jid.split('@').next().unwrap_or(jid);
    format!("{local}{mail_domain}")
}

fn duration_until_next(at: NaiveTime) -> Duration {
    let now = Local::now().naive_local();
    (next_occurrence(now, at) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// The next instant the schedule fires: today if `at` is still ahead,
/// otherwise tomorrow. Firing exactly at `at` schedules the next run for
/// tomorrow, so a fast refresh cannot re-trigger within the same minute.
fn next_occurrence(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let date = if now.time() < at {
        now.date()
    } else {
        now.date().succ_opt().unwrap_or(now.date())
    };
    date.and_time(at)
}

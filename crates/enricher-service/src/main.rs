//! Calendar conferencing enrichment service.
//!
//! Wires the EWS gateway, the conferencing directory client, the enrichment
//! worker and the daily roster refresher together, then runs until ctrl-c.

mod config;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use secrecy::ExposeSecret;
use tracing::{error, info};

use calendar_enricher::{
    EnrichmentWorker, MatchMemory, RosterRefresher, RosterStore, WorkerConfig,
};
use cms_client::{CmsClient, CmsConfig};
use ews_calendar::{EwsClient, EwsConfig};

use crate::config::ServiceConfig;

#[derive(Debug, Parser)]
#[command(name = "enricher-service")]
#[command(about = "Watch mailbox calendars and enrich marked meetings with conferencing join details")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config/enricher.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ServiceConfig::load(&args.config)?;
    let sync_time = config.cms.sync_time()?;
    let _log_guards = logging::init(&config.logging)?;

    info!("starting calendar enrichment service");

    let cms_config = CmsConfig::new(
        &config.cms.base_url,
        &config.cms.username,
        config.cms.password.expose_secret(),
    )
    .with_accept_invalid_certs(config.cms.accept_invalid_certs)
    .with_personal_room_suffix(&config.cms.personal_room_suffix)
    .with_web_base_url(&config.cms.web_base_url)
    .with_sip_domain(&config.cms.sip_domain);
    let cms = CmsClient::new(cms_config)?;

    let ews_config = EwsConfig::new(
        &config.ews.server,
        &config.ews.username,
        config.ews.password.expose_secret(),
    )
    .with_accept_invalid_certs(config.ews.accept_invalid_certs);
    let gateway = EwsClient::new(ews_config)?;

    let store = RosterStore::new(&config.enricher.roster_path);
    let refresher = RosterRefresher::new(
        cms.clone(),
        store.clone(),
        &config.ews.mail_domain,
        sync_time,
    );

    info!("running initial roster refresh");
    if let Err(e) = refresher.refresh_once().await {
        error!("initial roster refresh failed: {}", e);
    }

    let worker_config = WorkerConfig::new(
        &config.enricher.marker_word,
        &config.enricher.template_path,
    )
    .with_poll_period(config.enricher.poll_period())
    .with_fetch_limit(config.enricher.fetch_limit);
    let worker = EnrichmentWorker::new(gateway, cms, worker_config, store, MatchMemory::new());

    // One ctrl-c fans out to both long-running tasks. Each honors the signal
    // at its own safe points only.
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);
    {
        let shutdown_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(());
            }
        });
    }

    let refresher_shutdown = {
        let mut rx = shutdown_tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    };
    let refresh_task = tokio::spawn(refresher.run_with_shutdown(refresher_shutdown));

    let worker_shutdown = {
        let mut rx = shutdown_tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    };
    worker.run_with_shutdown(worker_shutdown).await?;

    match refresh_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("roster refresher exited with error: {}", e),
        Err(e) => error!("roster refresher task panicked: {}", e),
    }

    info!("service stopped");
    Ok(())
}

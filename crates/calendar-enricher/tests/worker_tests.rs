//! End-to-end tests of the enrichment worker against scripted collaborators.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use calendar_core::CalendarEvent;
use calendar_enricher::{
    EnrichmentWorker, MatchMemory, RoomResolver, RosterStore, WorkerConfig,
};
use chrono::{Duration, Utc};
use cms_client::JoinDetails;
use mock_calendar::{async_trait, FailureMode, ScriptedCalendar};
use tempfile::TempDir;

const TEMPLATE: &str =
    "Join: {{WEB_LINK}}<br>SIP: {{SIP_ADDRESS}}<br>ID: {{callid}}<br>PIN: {{PIN}}";

/// Resolver that records the user ids it was asked about and returns a
/// scripted answer.
#[derive(Clone, Default)]
struct RecordingResolver {
    details: Option<JoinDetails>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingResolver {
    fn returning(details: JoinDetails) -> Self {
        Self {
            details: Some(details),
            calls: Arc::default(),
        }
    }

    fn empty() -> Self {
        Self::default()
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoomResolver for RecordingResolver {
    async fn resolve(&self, user_id: &str) -> Option<JoinDetails> {
        self.calls.lock().unwrap().push(user_id.to_string());
        self.details.clone()
    }

    fn name(&self) -> &str {
        "RecordingResolver"
    }
}

fn sample_details() -> JoinDetails {
    JoinDetails {
        web_link: "https://wb/meeting/123?secret=abc".to_string(),
        sip_address: "sip123@x.com".to_string(),
        call_id: "123".to_string(),
        pin: "нет".to_string(),
        uri: "sip123".to_string(),
        passcode: None,
        secret: "abc".to_string(),
    }
}

/// Write a roster and template into a temp dir, returning paths.
fn fixture(mailboxes: &[&str]) -> (TempDir, PathBuf, RosterStore) {
    let dir = TempDir::new().unwrap();

    let template_path = dir.path().join("invitation.html");
    fs::write(&template_path, TEMPLATE).unwrap();

    let roster_path = dir.path().join("users.txt");
    let store = RosterStore::new(&roster_path);
    let lines: Vec<String> = mailboxes.iter().map(|m| m.to_string()).collect();
    store.write("2026-08-06 00:00:01", &lines).unwrap();

    (dir, template_path, store)
}

/// An event that satisfies every match condition for `mailbox`.
fn matching_event(id: &str, mailbox: &str) -> CalendarEvent {
    CalendarEvent::new(id, Utc::now() + Duration::hours(4))
        .with_change_key("CK")
        .with_created(Utc::now() + Duration::seconds(2))
        .with_subject("Planning")
        .with_location("Conf MAGICWORD Room")
        .with_organizer(mailbox)
        .with_body("<p>agenda</p>")
}

fn worker(
    gateway: &ScriptedCalendar,
    resolver: &RecordingResolver,
    template_path: &PathBuf,
    store: &RosterStore,
) -> EnrichmentWorker<ScriptedCalendar, RecordingResolver> {
    let config = WorkerConfig::new("MAGICWORD", template_path);
    EnrichmentWorker::new(
        gateway.clone(),
        resolver.clone(),
        config,
        store.clone(),
        MatchMemory::new(),
    )
}

#[tokio::test]
async fn happy_path_enriches_and_notifies_once() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::returning(sample_details());
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.add_event("a@x.com", matching_event("ev-1", "a@x.com"));
    worker.run_once().await;

    // resolver is asked for the local part of the mailbox address
    assert_eq!(resolver.calls(), vec!["a".to_string()]);

    let saves = gateway.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].mailbox, "a@x.com");
    assert_eq!(saves[0].event_id, "ev-1");
    assert!(saves[0].body.starts_with("<p>agenda</p><br><br>"));
    assert!(saves[0].body.contains("https://wb/meeting/123?secret=abc"));
    assert!(saves[0].body.contains("sip123@x.com"));
    assert!(saves[0].body.contains("ID: 123"));
    assert!(saves[0].body.contains("PIN: нет"));

    assert!(worker.memory().is_seen("ev-1"));
}

#[tokio::test]
async fn no_details_leaves_body_unchanged_but_marks_seen() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::empty();
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.add_event("a@x.com", matching_event("ev-1", "a@x.com"));
    worker.run_once().await;

    assert_eq!(resolver.calls().len(), 1);
    assert!(gateway.saves().is_empty());
    assert!(worker.memory().is_seen("ev-1"));
}

#[tokio::test]
async fn seen_events_are_never_reprocessed() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::returning(sample_details());
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.add_event("a@x.com", matching_event("ev-1", "a@x.com"));
    worker.run_once().await;
    worker.run_once().await;
    worker.run_once().await;

    assert_eq!(resolver.calls().len(), 1);
    assert_eq!(gateway.saves().len(), 1);
}

#[tokio::test]
async fn organizer_mismatch_never_mutates() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::returning(sample_details());
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    // a@x.com only attends; b@x.com organizes
    gateway.add_event("a@x.com", matching_event("ev-1", "b@x.com"));
    worker.run_once().await;

    assert!(resolver.calls().is_empty());
    assert!(gateway.saves().is_empty());
    assert!(!worker.memory().is_seen("ev-1"));
}

#[tokio::test]
async fn failed_mailbox_is_never_fetched_again() {
    let (_dir, template_path, store) = fixture(&["ghost@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::empty();
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.fail_mailbox("ghost@x.com", FailureMode::NoMailbox);
    worker.run_once().await;
    worker.run_once().await;
    worker.run_once().await;

    assert_eq!(gateway.fetches(), vec!["ghost@x.com".to_string()]);
    assert!(worker.memory().is_failed("ghost@x.com"));
}

#[tokio::test]
async fn transient_failure_is_retried_next_cycle() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::empty();
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.fail_mailbox("a@x.com", FailureMode::Transient);
    worker.run_once().await;
    worker.run_once().await;

    assert_eq!(gateway.fetches().len(), 2);
    assert!(!worker.memory().is_failed("a@x.com"));
}

#[tokio::test]
async fn save_failure_is_not_retried() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::returning(sample_details());
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.add_event("a@x.com", matching_event("ev-1", "a@x.com"));
    gateway.fail_save("ev-1", FailureMode::Transient);
    worker.run_once().await;
    worker.run_once().await;

    // the first attempt consumed the event; the save failure is not retried
    assert_eq!(resolver.calls().len(), 1);
    assert!(gateway.saves().is_empty());
    assert!(worker.memory().is_seen("ev-1"));
}

#[tokio::test]
async fn unreadable_template_aborts_attempt_but_marks_seen() {
    let (_dir, _template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::returning(sample_details());

    let config = WorkerConfig::new("MAGICWORD", "/nonexistent/invitation.html");
    let mut worker = EnrichmentWorker::new(
        gateway.clone(),
        resolver.clone(),
        config,
        store.clone(),
        MatchMemory::new(),
    );

    gateway.add_event("a@x.com", matching_event("ev-1", "a@x.com"));
    worker.run_once().await;
    worker.run_once().await;

    assert!(gateway.saves().is_empty());
    assert!(worker.memory().is_seen("ev-1"));
    assert_eq!(resolver.calls().len(), 1);
}

#[tokio::test]
async fn one_bad_mailbox_does_not_affect_others() {
    let (_dir, template_path, store) = fixture(&["bad@x.com", "a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::returning(sample_details());
    let mut worker = worker(&gateway, &resolver, &template_path, &store);

    gateway.fail_mailbox("bad@x.com", FailureMode::Transient);
    gateway.add_event("a@x.com", matching_event("ev-1", "a@x.com"));
    worker.run_once().await;

    assert_eq!(gateway.saves().len(), 1);
    assert_eq!(gateway.saves()[0].mailbox, "a@x.com");
}

#[tokio::test]
async fn unreadable_roster_skips_cycle() {
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::empty();
    let config = WorkerConfig::new("MAGICWORD", "/nonexistent/invitation.html");
    let mut worker = EnrichmentWorker::new(
        gateway.clone(),
        resolver,
        config,
        RosterStore::new("/nonexistent/users.txt"),
        MatchMemory::new(),
    );

    worker.run_once().await;
    assert!(gateway.fetches().is_empty());
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let (_dir, template_path, store) = fixture(&["a@x.com"]);
    let gateway = ScriptedCalendar::new();
    let resolver = RecordingResolver::empty();
    let worker = worker(&gateway, &resolver, &template_path, &store);

    // an already-completed shutdown future stops the worker immediately
    let result = worker.run_with_shutdown(async {}).await;
    assert!(result.is_ok());
    assert!(gateway.fetches().is_empty());
}

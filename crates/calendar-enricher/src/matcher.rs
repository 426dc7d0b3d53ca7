//! The event match predicate.

use calendar_core::CalendarEvent;
use chrono::{DateTime, Utc};

use crate::memory::MatchMemory;

/// Check whether an event qualifies for enrichment.
///
/// All conditions must hold:
/// - the event has a non-empty identifier not already enriched this run;
/// - it was created strictly after the worker started (pre-existing events
///   are never re-enriched by this run);
/// - its location contains the marker word, case-insensitively;
/// - its organizer is the mailbox being polled, compared case-insensitively.
///
/// Returns the reason the event was skipped, for debug logging. The check is
/// pure: it performs no I/O and mutates nothing.
pub fn qualifies(
    event: &CalendarEvent,
    mailbox: &str,
    marker: &str,
    started_at: DateTime<Utc>,
    memory: &MatchMemory,
) -> Result<(), String> {
    if event.id.is_empty() {
        return Err("event has no identifier".to_string());
    }
    if memory.is_seen(&event.id) {
        return Err("already enriched this run".to_string());
    }

    match event.created {
        None => return Err("no creation timestamp".to_string()),
        Some(created) if created <= started_at => {
            return Err("created before the worker started".to_string());
        }
        Some(_) => {}
    }

    let location_matches = event
        .location
        .as_deref()
        .map(|location| location.to_lowercase().contains(&marker.to_lowercase()))
        .unwrap_or(false);
    if !location_matches {
        return Err(format!("location does not contain \"{marker}\""));
    }

    let organizer_matches = event
        .organizer_email
        .as_deref()
        .map(|organizer| organizer.eq_ignore_ascii_case(mailbox))
        .unwrap_or(false);
    if !organizer_matches {
        return Err("organizer is not the mailbox owner".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn started_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap()
    }

    fn matching_event() -> CalendarEvent {
        CalendarEvent::new("ev-1", started_at() + chrono::Duration::hours(24))
            .with_created(started_at() + chrono::Duration::minutes(5))
            .with_location("Conf MAGICWORD Room")
            .with_organizer("a@x.com")
    }

    #[test]
    fn test_full_match() {
        let memory = MatchMemory::new();
        let result = qualifies(&matching_event(), "a@x.com", "MAGICWORD", started_at(), &memory);
        assert!(result.is_ok());
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let memory = MatchMemory::new();
        let event = matching_event().with_location("conf magicword room");
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_ok());
        assert!(qualifies(&event, "a@x.com", "MagicWord", started_at(), &memory).is_ok());
    }

    #[test]
    fn test_organizer_is_case_insensitive() {
        let memory = MatchMemory::new();
        let event = matching_event().with_organizer("A@X.COM");
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_ok());
    }

    #[test]
    fn test_empty_id_is_skipped() {
        let memory = MatchMemory::new();
        let mut event = matching_event();
        event.id = String::new();
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_err());
    }

    #[test]
    fn test_seen_event_is_skipped() {
        let mut memory = MatchMemory::new();
        memory.mark_seen("ev-1");
        let err = qualifies(&matching_event(), "a@x.com", "MAGICWORD", started_at(), &memory)
            .unwrap_err();
        assert!(err.contains("already enriched"));
    }

    #[test]
    fn test_pre_existing_event_is_skipped() {
        let memory = MatchMemory::new();
        let event = matching_event().with_created(started_at() - chrono::Duration::minutes(5));
        let err =
            qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).unwrap_err();
        assert!(err.contains("before the worker started"));
    }

    #[test]
    fn test_created_exactly_at_start_is_skipped() {
        let memory = MatchMemory::new();
        let event = matching_event().with_created(started_at());
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_err());
    }

    #[test]
    fn test_missing_creation_timestamp_is_skipped() {
        let memory = MatchMemory::new();
        let mut event = matching_event();
        event.created = None;
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_err());
    }

    #[test]
    fn test_location_without_marker_is_skipped() {
        let memory = MatchMemory::new();
        let event = matching_event().with_location("Conf Room 4");
        let err =
            qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).unwrap_err();
        assert!(err.contains("location"));
    }

    #[test]
    fn test_missing_location_is_skipped() {
        let memory = MatchMemory::new();
        let mut event = matching_event();
        event.location = None;
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_err());
    }

    #[test]
    fn test_foreign_organizer_is_skipped() {
        let memory = MatchMemory::new();
        let event = matching_event().with_organizer("b@x.com");
        let err =
            qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).unwrap_err();
        assert!(err.contains("organizer"));
    }

    #[test]
    fn test_missing_organizer_is_skipped() {
        let memory = MatchMemory::new();
        let mut event = matching_event();
        event.organizer_email = None;
        assert!(qualifies(&event, "a@x.com", "MAGICWORD", started_at(), &memory).is_err());
    }
}

//! Validator - checks that every envelope selected by a checklist entry
//! carries the shape its discriminator promises.
//!
//! Entries are processed in checklist order and the first violation aborts
//! the whole pass. The expected shape of a discriminator is its canonical
//! [`EventKind`]; a checklist entry with no canonical shape only verifies when
//! the feed has no envelope carrying it.

use gravity_model::{Envelope, EventKind};

use crate::error::{CoreError, Result};

/// Envelopes verified for one checklist entry, in feed order.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedSubset<'a> {
    pub discriminator: String,
    pub envelopes: Vec<&'a Envelope>,
}

/// Shape the feed promises for `discriminator`.
pub fn expected_kind(discriminator: &str) -> Option<EventKind> {
    EventKind::from_discriminator(discriminator)
}

/// Validate `envelopes` against `checklist`.
///
/// Duplicate checklist entries are checked once, at their first position.
/// Discriminators outside the checklist are not inspected.
///
/// # Errors
///
/// `CoreError::VariantMismatch` naming the first checklist entry (in checklist
/// order) that selects an envelope of a different shape.
pub fn validate<'a, S: AsRef<str>>(
    envelopes: &'a [Envelope],
    checklist: &[S],
) -> Result<Vec<VerifiedSubset<'a>>> {
    let mut verified: Vec<VerifiedSubset<'a>> = Vec::with_capacity(checklist.len());

    for discriminator in checklist.iter().map(AsRef::as_ref) {
        if verified.iter().any(|v| v.discriminator == discriminator) {
            tracing::debug!(discriminator, "skipping duplicate checklist entry");
            continue;
        }

        let expected = expected_kind(discriminator);
        let selected: Vec<&Envelope> = envelopes
            .iter()
            .filter(|e| e.discriminator == discriminator)
            .collect();

        if let Some(offender) = selected
            .iter()
            .find(|e| Some(e.payload.kind()) != expected)
        {
            return Err(CoreError::VariantMismatch {
                discriminator: discriminator.to_string(),
                envelope_id: offender.id.clone(),
                expected,
                actual: offender.payload.kind(),
            });
        }

        verified.push(VerifiedSubset {
            discriminator: discriminator.to_string(),
            envelopes: selected,
        });
    }

    Ok(verified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravity_model::{Event, UnknownEvent, WatchEvent};
    use serde_json::Map;

    fn envelope(id: &str, discriminator: &str, payload: Event) -> Envelope {
        Envelope {
            id: id.to_string(),
            discriminator: discriminator.to_string(),
            created_at: None,
            actor: None,
            organization: None,
            repository: None,
            payload,
        }
    }

    fn watch() -> Event {
        Event::Watch(WatchEvent {
            action: "started".to_string(),
        })
    }

    fn unknown() -> Event {
        Event::Unknown(UnknownEvent::new(Map::new()))
    }

    #[test]
    fn test_verified_subsets_keep_feed_order() {
        let feed = vec![
            envelope("1", "WatchEvent", watch()),
            envelope("2", "PushEvent", unknown()),
            envelope("3", "WatchEvent", watch()),
        ];
        let verified = validate(&feed, &["WatchEvent"]).unwrap();
        assert_eq!(verified.len(), 1);
        let ids: Vec<_> = verified[0].envelopes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_vacuous_entry_verifies_empty() {
        let feed = vec![envelope("1", "WatchEvent", watch())];
        let verified = validate(&feed, &["ForkEvent"]).unwrap();
        assert_eq!(verified[0].discriminator, "ForkEvent");
        assert!(verified[0].envelopes.is_empty());
    }

    #[test]
    fn test_empty_checklist() {
        let feed = vec![envelope("1", "WatchEvent", watch())];
        let checklist: [&str; 0] = [];
        assert!(validate(&feed, &checklist).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_payload_under_known_tag_mismatches() {
        let feed = vec![envelope("9", "WatchEvent", unknown())];
        match validate(&feed, &["WatchEvent"]) {
            Err(CoreError::VariantMismatch {
                discriminator,
                envelope_id,
                expected,
                actual,
            }) => {
                assert_eq!(discriminator, "WatchEvent");
                assert_eq!(envelope_id, "9");
                assert_eq!(expected, Some(EventKind::Watch));
                assert_eq!(actual, EventKind::Unknown);
            }
            other => panic!("Expected VariantMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_checklist_entry_present_in_feed_mismatches() {
        let feed = vec![envelope("5", "StarEvent", unknown())];
        let err = validate(&feed, &["StarEvent"]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::VariantMismatch { expected: None, actual: EventKind::Unknown, .. }
        ));
    }

    #[test]
    fn test_duplicate_entries_checked_once() {
        let feed = vec![envelope("1", "WatchEvent", watch())];
        let verified = validate(&feed, &["WatchEvent", "ForkEvent", "WatchEvent"]).unwrap();
        let names: Vec<_> = verified.iter().map(|v| v.discriminator.as_str()).collect();
        assert_eq!(names, vec!["WatchEvent", "ForkEvent"]);
    }

    #[test]
    fn test_first_violation_in_checklist_order_wins() {
        let feed = vec![
            envelope("1", "WatchEvent", unknown()),
            envelope("2", "ForkEvent", watch()),
        ];
        let err = validate(&feed, &["ForkEvent", "WatchEvent"]).unwrap_err();
        assert_eq!(err.discriminator(), Some("ForkEvent"));

        let err = validate(&feed, &["WatchEvent", "ForkEvent"]).unwrap_err();
        assert_eq!(err.discriminator(), Some("WatchEvent"));
    }
}

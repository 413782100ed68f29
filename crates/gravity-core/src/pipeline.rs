//! Decode → resolve → validate, as one synchronous pass.
//!
//! A pass either returns every verified checklist subset or the first error;
//! nothing partial escapes.

use gravity_model::Envelope;

use crate::decoder::{decode_envelopes, RawEnvelope};
use crate::error::Result;
use crate::metrics::METRICS;
use crate::obs;
use crate::registry::Registry;
use crate::validator::validate;

/// Verified checklist subsets, keyed by discriminator in checklist order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifiedFeed {
    subsets: Vec<(String, Vec<Envelope>)>,
}

impl VerifiedFeed {
    /// Subset for `discriminator`; `None` when it was not on the checklist.
    pub fn get(&self, discriminator: &str) -> Option<&[Envelope]> {
        self.subsets
            .iter()
            .find(|(d, _)| d == discriminator)
            .map(|(_, envelopes)| envelopes.as_slice())
    }

    pub fn discriminators(&self) -> impl Iterator<Item = &str> {
        self.subsets.iter().map(|(d, _)| d.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Envelope])> {
        self.subsets
            .iter()
            .map(|(d, envelopes)| (d.as_str(), envelopes.as_slice()))
    }

    /// Remove and return the subset for `discriminator`.
    pub fn take(&mut self, discriminator: &str) -> Option<Vec<Envelope>> {
        let pos = self.subsets.iter().position(|(d, _)| d == discriminator)?;
        Some(self.subsets.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }
}

impl IntoIterator for VerifiedFeed {
    type Item = (String, Vec<Envelope>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Envelope>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.subsets.into_iter()
    }
}

/// Runs the pipeline against one registry.
#[derive(Debug, Clone, Copy)]
pub struct FeedDecoder<'r> {
    registry: &'r Registry,
}

impl Default for FeedDecoder<'static> {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}

impl<'r> FeedDecoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Decode and resolve every envelope of a raw feed document.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<Envelope>> {
        let raw = decode_envelopes(bytes)?;
        let mut envelopes = Vec::with_capacity(raw.len());
        let mut unknown = 0usize;

        for envelope in raw {
            let envelope = self.resolve(envelope)?;
            if envelope.payload.is_unknown() {
                unknown += 1;
                METRICS.inc_unknown_payloads();
                obs::emit_payload_unknown(&envelope.discriminator, &envelope.id);
            }
            envelopes.push(envelope);
        }

        METRICS.add_envelopes_decoded(envelopes.len() as u64);
        obs::emit_feed_decoded(envelopes.len(), unknown);
        Ok(envelopes)
    }

    /// Resolve the payload of one raw envelope.
    pub fn resolve(&self, raw: RawEnvelope) -> Result<Envelope> {
        let RawEnvelope {
            id,
            discriminator,
            created_at,
            actor,
            organization,
            repository,
            payload,
        } = raw;
        let payload = self.registry.resolve(&discriminator, payload)?;
        Ok(Envelope {
            id,
            discriminator,
            created_at,
            actor,
            organization,
            repository,
            payload,
        })
    }

    /// Decode a raw feed document and validate it against `checklist`.
    pub fn decode_and_validate<S: AsRef<str>>(
        &self,
        bytes: &[u8],
        checklist: &[S],
    ) -> Result<VerifiedFeed> {
        let envelopes = self.decode(bytes)?;

        let verified = validate(&envelopes, checklist).inspect_err(|e| {
            METRICS.inc_variant_mismatches();
            obs::emit_checklist_mismatch(e);
        })?;

        let subsets = verified
            .into_iter()
            .map(|subset| {
                obs::emit_checklist_verified(&subset.discriminator, subset.envelopes.len());
                let owned = subset.envelopes.into_iter().cloned().collect();
                (subset.discriminator, owned)
            })
            .collect();

        Ok(VerifiedFeed { subsets })
    }
}

/// Decode and resolve a feed with the standard registry.
pub fn decode_feed(bytes: &[u8]) -> Result<Vec<Envelope>> {
    FeedDecoder::default().decode(bytes)
}

/// Decode a feed with the standard registry and validate it against
/// `checklist`, in checklist order.
pub fn decode_and_validate<S: AsRef<str>>(bytes: &[u8], checklist: &[S]) -> Result<VerifiedFeed> {
    FeedDecoder::default().decode_and_validate(bytes, checklist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use gravity_model::EventKind;

    const FEED: &[u8] = br#"[
        {"id": "1", "type": "WatchEvent", "payload": {"action": "started"}},
        {"id": "2", "type": "CreateEvent", "payload": {"ref": "v1", "ref_type": "tag"}},
        {"id": "3", "type": "WatchEvent", "payload": {"action": "started"}}
    ]"#;

    #[test]
    fn test_decode_resolves_in_order() {
        let envelopes = decode_feed(FEED).unwrap();
        let kinds: Vec<_> = envelopes.iter().map(|e| e.payload.kind()).collect();
        assert_eq!(kinds, vec![EventKind::Watch, EventKind::Unknown, EventKind::Watch]);
    }

    #[test]
    fn test_decode_and_validate_exposes_subsets() {
        let mut feed = decode_and_validate(FEED, &["WatchEvent", "ForkEvent"]).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.get("WatchEvent").unwrap().len(), 2);
        assert!(feed.get("ForkEvent").unwrap().is_empty());
        assert!(feed.get("CreateEvent").is_none());

        let names: Vec<_> = feed.discriminators().collect();
        assert_eq!(names, vec!["WatchEvent", "ForkEvent"]);

        let watch = feed.take("WatchEvent").unwrap();
        assert_eq!(watch[0].id, "1");
        assert_eq!(watch[1].id, "3");
        assert!(feed.get("WatchEvent").is_none());
    }

    #[test]
    fn test_shape_error_aborts_whole_pass() {
        let feed = br#"[
            {"id": "1", "type": "WatchEvent", "payload": {"action": "started"}},
            {"id": "2", "type": "ForkEvent", "payload": {"forkee": "nope"}}
        ]"#;
        let err = decode_and_validate(feed, &["WatchEvent"]).unwrap_err();
        assert!(matches!(err, CoreError::PayloadShapeMismatch { ref field, .. } if field == "forkee"));
    }

    #[test]
    fn test_custom_registry() {
        let registry = Registry::builder().build();
        let decoder = FeedDecoder::new(&registry);
        let envelopes = decoder.decode(FEED).unwrap();
        assert!(envelopes.iter().all(|e| e.payload.is_unknown()));
    }
}

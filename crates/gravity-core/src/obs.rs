//! Structured observability hooks for the decode / validate pipeline.
//!
//! Events are emitted at `info!` level unless noted (configurable via
//! `RUST_LOG`). For JSON output pass `json = true` to
//! [`crate::init_tracing`].

use tracing::{debug, info, warn};

/// RAII guard that enters a pass-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = FeedSpan::enter("pingcap/tidb");
/// // every event until the guard drops carries source = "pingcap/tidb"
/// ```
pub struct FeedSpan {
    _span: tracing::span::EnteredSpan,
}

impl FeedSpan {
    pub fn enter(source: &str) -> Self {
        let span = tracing::info_span!("gravity.feed", source = %source);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a feed document was decoded and resolved.
pub fn emit_feed_decoded(envelopes: usize, unknown: usize) {
    info!(event = "feed.decoded", envelopes = envelopes, unknown = unknown);
}

/// Emit event: a payload was kept verbatim under an unregistered tag.
pub fn emit_payload_unknown(discriminator: &str, envelope_id: &str) {
    debug!(event = "payload.unknown", discriminator = %discriminator, envelope_id = %envelope_id);
}

/// Emit event: one checklist entry verified.
pub fn emit_checklist_verified(discriminator: &str, matched: usize) {
    info!(event = "checklist.verified", discriminator = %discriminator, matched = matched);
}

/// Emit event: a checklist entry failed (warning level).
pub fn emit_checklist_mismatch(error: &dyn std::fmt::Display) {
    warn!(event = "checklist.mismatch", error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitters_do_not_panic_without_subscriber() {
        let _span = FeedSpan::enter("pingcap/tidb");
        emit_feed_decoded(3, 1);
        emit_payload_unknown("StarEvent", "1");
        emit_checklist_verified("ForkEvent", 0);
        emit_checklist_mismatch(&"variant mismatch for WatchEvent");
    }
}

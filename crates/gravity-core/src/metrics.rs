//! Global atomic counters for feed decoding.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. before the CLI exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lock-free atomic counters.
pub struct Metrics {
    envelopes_decoded: AtomicU64,
    unknown_payloads: AtomicU64,
    variant_mismatches: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            envelopes_decoded: AtomicU64::new(0),
            unknown_payloads: AtomicU64::new(0),
            variant_mismatches: AtomicU64::new(0),
        }
    }

    pub fn add_envelopes_decoded(&self, n: u64) {
        self.envelopes_decoded.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "envelopes_decoded", n, "counter incremented");
    }

    pub fn inc_unknown_payloads(&self) {
        self.unknown_payloads.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "unknown_payloads", "counter incremented");
    }

    pub fn inc_variant_mismatches(&self) {
        self.variant_mismatches.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "variant_mismatches", "counter incremented");
    }

    /// Snapshot of (envelopes_decoded, unknown_payloads, variant_mismatches).
    pub fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.envelopes_decoded.load(Ordering::Relaxed),
            self.unknown_payloads.load(Ordering::Relaxed),
            self.variant_mismatches.load(Ordering::Relaxed),
        )
    }

    /// Emit current counter values as a single structured event.
    pub fn flush(&self) {
        let (decoded, unknown, mismatches) = self.snapshot();
        tracing::info!(
            event = "metrics.flush",
            envelopes_decoded = decoded,
            unknown_payloads = unknown,
            variant_mismatches = mismatches,
        );
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.envelopes_decoded.store(0, Ordering::Relaxed);
        self.unknown_payloads.store(0, Ordering::Relaxed);
        self.variant_mismatches.store(0, Ordering::Relaxed);
    }
}

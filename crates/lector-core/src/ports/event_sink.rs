//! Synthesis event sink port.
//!
//! The orchestrator delivers progress through a single serialized channel
//! and hands each event to exactly one sink. Implementations render the
//! events (CLI progress bar, GUI, logs); they must not block.

use crate::events::SynthesisEvent;

/// Port for receiving pipeline progress events.
///
/// Events arrive from a single dispatcher task, already serialized:
/// implementations never see interleaved or out-of-order deliveries from
/// concurrent workers.
pub trait SynthesisEventSink: Send + Sync {
    /// Deliver one event. Must return promptly.
    fn emit(&self, event: SynthesisEvent);
}

/// A sink that discards every event.
///
/// Useful for tests and for callers that only care about the final
/// result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Create a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SynthesisEventSink for NoopSink {
    fn emit(&self, _event: SynthesisEvent) {
        // Intentionally do nothing
    }
}

//! Completion accounting and serialized event delivery.
//!
//! Workers never talk to the event sink directly: the orchestrator's
//! collector loop records completions on the tracker and pushes the
//! resulting events into one mpsc channel. A single dispatcher task
//! drains the channel and hands events to the sink, decoupling sink
//! latency from scheduling and keeping deliveries serialized and
//! ordered even when workers complete concurrently.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use lector_core::events::SynthesisEvent;
use lector_core::ports::SynthesisEventSink;

/// Shared completion counter with ETA derivation.
pub(crate) struct ProgressTracker {
    total: usize,
    completed: AtomicUsize,
    started_at: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record one completed chunk and build the progress event for it.
    pub(crate) fn record_completion(&self) -> SynthesisEvent {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let elapsed = self.started_at.elapsed().as_secs_f64();
        SynthesisEvent::chunk_synthesized(done, self.total, elapsed)
    }

    #[cfg(test)]
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Spawn the single-consumer dispatcher task.
///
/// Returns the sender workers and the orchestrator push events into, and
/// the handle to await once the sender side is dropped (flushes any
/// queued events before the run returns).
pub(crate) fn spawn_dispatcher(
    sink: Arc<dyn SynthesisEventSink>,
) -> (mpsc::UnboundedSender<SynthesisEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<SynthesisEvent>();
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            sink.emit(event);
        }
    });
    (tx, handle)
}

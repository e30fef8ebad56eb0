//! Synthesis events - discriminated union for all pipeline state changes.
//!
//! Workers never emit events directly; the orchestrator's dispatcher task
//! is the single producer, so sinks observe a serialized, ordered stream.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Start of the overall-progress span reserved for synthesis.
///
/// The range below is reserved for upstream extraction, the range above
/// for downstream assembly.
pub const SYNTHESIS_SPAN_START: f64 = 0.15;

/// End of the overall-progress span reserved for synthesis.
pub const SYNTHESIS_SPAN_END: f64 = 0.75;

/// Overall fraction reported when merging begins.
pub const MERGE_FRACTION: f64 = 0.9;

/// Overall fraction reported when mixing begins.
pub const MIX_FRACTION: f64 = 0.95;

/// Single discriminated union for all synthesis pipeline events.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SynthesisEvent {
    /// The chunk plan is built and synthesis is about to start.
    PlanReady {
        /// Number of chunks scheduled.
        total_chunks: usize,
    },

    /// One chunk finished (fresh synthesis or cache hit).
    ChunkSynthesized {
        /// Chunks completed so far.
        completed: usize,
        /// Total chunks in the plan.
        total: usize,
        /// Estimated seconds remaining, from average time per chunk.
        eta_seconds: f64,
        /// Overall pipeline fraction, mapped into the synthesis span.
        fraction: f64,
        /// Human-readable progress line.
        message: String,
    },

    /// All chunks are done; ordered artifacts are being concatenated.
    Merging {
        /// Overall pipeline fraction.
        fraction: f64,
    },

    /// The merged track is being mixed (gain, optional background).
    Mixing {
        /// Overall pipeline fraction.
        fraction: f64,
    },

    /// The run finished; `path` is the surviving artifact.
    Completed {
        /// Final artifact path.
        path: PathBuf,
    },

    /// The run failed and was cleaned up.
    Failed {
        /// Error description.
        error: String,
    },

    /// The run was cancelled and cleaned up; there is no result.
    Cancelled,
}

impl SynthesisEvent {
    /// Create a plan-ready event.
    #[must_use]
    pub const fn plan_ready(total_chunks: usize) -> Self {
        Self::PlanReady { total_chunks }
    }

    /// Create a chunk-progress event from completion counts and elapsed
    /// wall time.
    ///
    /// ETA is `avg_per_chunk * remaining`; the fraction maps completion
    /// linearly into `[SYNTHESIS_SPAN_START, SYNTHESIS_SPAN_END]`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn chunk_synthesized(completed: usize, total: usize, elapsed_secs: f64) -> Self {
        let ratio = if total > 0 {
            completed as f64 / total as f64
        } else {
            0.0
        };
        let eta_seconds = if completed > 0 {
            (elapsed_secs / completed as f64) * (total - completed) as f64
        } else {
            0.0
        };
        let fraction =
            (SYNTHESIS_SPAN_END - SYNTHESIS_SPAN_START).mul_add(ratio, SYNTHESIS_SPAN_START);
        let message = format!("Synthesizing {completed}/{total} - ETA: {eta_seconds:.0}s");
        Self::ChunkSynthesized {
            completed,
            total,
            eta_seconds,
            fraction,
            message,
        }
    }

    /// Create a merging event.
    #[must_use]
    pub const fn merging() -> Self {
        Self::Merging {
            fraction: MERGE_FRACTION,
        }
    }

    /// Create a mixing event.
    #[must_use]
    pub const fn mixing() -> Self {
        Self::Mixing {
            fraction: MIX_FRACTION,
        }
    }

    /// Create a completed event.
    #[must_use]
    pub const fn completed(path: PathBuf) -> Self {
        Self::Completed { path }
    }

    /// Create a failed event.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::PlanReady { .. } => "synthesis:plan",
            Self::ChunkSynthesized { .. } => "synthesis:progress",
            Self::Merging { .. } => "synthesis:merging",
            Self::Mixing { .. } => "synthesis:mixing",
            Self::Completed { .. } => "synthesis:completed",
            Self::Failed { .. } => "synthesis:failed",
            Self::Cancelled => "synthesis:cancelled",
        }
    }

    /// The overall pipeline fraction this event represents, if it
    /// carries one.
    #[must_use]
    pub const fn fraction(&self) -> Option<f64> {
        match self {
            Self::ChunkSynthesized { fraction, .. }
            | Self::Merging { fraction }
            | Self::Mixing { fraction } => Some(*fraction),
            Self::Completed { .. } => Some(1.0),
            Self::PlanReady { .. } | Self::Failed { .. } | Self::Cancelled => None,
        }
    }
}

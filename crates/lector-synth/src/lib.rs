//! Synthesis pipeline for lector.
//!
//! This crate owns the concurrent heart of the system: the
//! content-addressed audio cache, the retrying speech client, and the
//! orchestrator that schedules chunk synthesis across a bounded worker
//! pool, reassembles artifacts in chunk order, and guarantees cleanup on
//! every exit path.

pub mod cache;
pub mod orchestrator;
pub mod retry;

pub use cache::FsAudioCache;
pub use orchestrator::{OrchestratorConfig, SynthesisOrchestrator};
pub use retry::{RetryPolicy, RetryingSpeechClient};

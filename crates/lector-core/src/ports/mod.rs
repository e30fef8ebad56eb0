//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core pipeline expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No HTTP, process, or filesystem-layout types in any signature
//! - Paths flow through as plain `Path`/`PathBuf` values
//! - Each port carries its own error type; the pipeline composes them

pub mod assembly;
pub mod cache;
pub mod document;
pub mod event_sink;
pub mod speech;

pub use assembly::{AssemblyError, AudioAssemblyPort};
pub use cache::{AudioCachePort, CacheError};
pub use document::{DocumentExtractorPort, ExtractionError, ExtractionInfo, OcrPort};
pub use event_sink::{NoopSink, SynthesisEventSink};
pub use speech::{SpeechError, SpeechSynthesizerPort, VoiceInfo};

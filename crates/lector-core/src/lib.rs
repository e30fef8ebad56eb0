//! Core domain types and port definitions for lector.
//!
//! This crate is the hexagonal center of the workspace: pure domain types,
//! text services, the pipeline error taxonomy, progress events, and the
//! trait contracts (ports) that adapter crates implement. It contains no
//! adapter dependencies - no HTTP client, no process spawning, no
//! filesystem layout knowledge beyond `PathBuf` values flowing through.

pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod settings;
pub mod text;

// Re-export the types adapters and the CLI touch most often
pub use domain::{AudioProject, Chunk, VoiceSettings};
pub use errors::PipelineError;
pub use events::{SynthesisEvent, SYNTHESIS_SPAN_END, SYNTHESIS_SPAN_START};
pub use ports::{
    AssemblyError, AudioAssemblyPort, AudioCachePort, CacheError, DocumentExtractorPort,
    ExtractionError, ExtractionInfo, NoopSink, OcrPort, SpeechError, SpeechSynthesizerPort,
    SynthesisEventSink, VoiceInfo,
};
pub use settings::{Settings, SettingsError};

//! Domain model for a narration run.
//!
//! These are pure value types. An [`AudioProject`] is owned by exactly one
//! orchestration run; its ephemeral members (chunks, generated files) are
//! discarded when the run ends and only `final_path` survives.

mod project;
mod voice;

pub use project::{AudioProject, Chunk};
pub use voice::VoiceSettings;

//! Progress-bar rendering of synthesis events.

use indicatif::{ProgressBar, ProgressStyle};

use lector_core::events::SynthesisEvent;
use lector_core::ports::SynthesisEventSink;

/// Renders the serialized event stream as a single progress bar.
///
/// The bar tracks the overall pipeline fraction (0-100), so synthesis
/// fills the reserved mid-range and assembly completes the tail.
pub struct IndicatifSink {
    bar: ProgressBar,
}

impl IndicatifSink {
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("[{bar:40.cyan/blue}] {percent:>3}% {msg}")
                .expect("valid progress template")
                .progress_chars("=>-"),
        );
        Self { bar }
    }
}

impl Default for IndicatifSink {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
impl SynthesisEventSink for IndicatifSink {
    fn emit(&self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::PlanReady { total_chunks } => {
                self.bar.set_message(format!("{total_chunks} chunks planned"));
            }
            SynthesisEvent::ChunkSynthesized {
                fraction, message, ..
            } => {
                self.bar.set_position((fraction * 100.0) as u64);
                self.bar.set_message(message);
            }
            SynthesisEvent::Merging { fraction } => {
                self.bar.set_position((fraction * 100.0) as u64);
                self.bar.set_message("Merging segments...");
            }
            SynthesisEvent::Mixing { fraction } => {
                self.bar.set_position((fraction * 100.0) as u64);
                self.bar.set_message("Mixing...");
            }
            SynthesisEvent::Completed { path } => {
                self.bar.set_position(100);
                self.bar
                    .finish_with_message(format!("Done: {}", path.display()));
            }
            SynthesisEvent::Failed { error } => {
                self.bar.abandon_with_message(format!("Failed: {error}"));
            }
            SynthesisEvent::Cancelled => {
                self.bar.abandon_with_message("Cancelled");
            }
        }
    }
}

//! Clap argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Narrate documents through a cloud speech service.
#[derive(Parser)]
#[command(name = "lector", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Narrate a document into a single audio file
    Narrate {
        /// Input document (plain text or markdown)
        input: PathBuf,

        /// Base output directory (a per-document subdirectory is created)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Voice identifier
        #[arg(long)]
        voice: Option<String>,

        /// Speaking rate offset in percent
        #[arg(long, allow_hyphen_values = true)]
        rate: Option<i32>,

        /// Pitch offset in Hz
        #[arg(long, allow_hyphen_values = true)]
        pitch: Option<i32>,

        /// Voice gain applied at mix time
        #[arg(long)]
        volume: Option<f32>,

        /// Background music file to loop under the narration
        #[arg(long)]
        bgm: Option<PathBuf>,

        /// Background music gain
        #[arg(long)]
        bgm_volume: Option<f32>,

        /// Synthesis worker pool size
        #[arg(long)]
        workers: Option<usize>,

        /// Maximum words per chunk
        #[arg(long)]
        word_limit: Option<usize>,
    },

    /// Synthesize a short audition sample of the configured voice
    Preview {
        /// Input document to sample the opening words from
        input: PathBuf,

        /// Voice identifier
        #[arg(long)]
        voice: Option<String>,

        /// Speaking rate offset in percent
        #[arg(long, allow_hyphen_values = true)]
        rate: Option<i32>,

        /// Pitch offset in Hz
        #[arg(long, allow_hyphen_values = true)]
        pitch: Option<i32>,
    },

    /// List the voices the speech service offers
    Voices,

    /// Manage the audio cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// View or change persisted narration settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Remove every cached synthesis artifact
    Clear,
}

/// Settings command variants.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show all current settings
    Show,
    /// Update settings and persist them
    Set {
        /// Voice identifier
        #[arg(long)]
        voice: Option<String>,

        /// Speaking rate offset in percent
        #[arg(long, allow_hyphen_values = true)]
        rate: Option<i32>,

        /// Pitch offset in Hz
        #[arg(long, allow_hyphen_values = true)]
        pitch: Option<i32>,

        /// Voice gain applied at mix time
        #[arg(long)]
        volume: Option<f32>,

        /// Background music gain
        #[arg(long)]
        bgm_volume: Option<f32>,

        /// Synthesis worker pool size
        #[arg(long)]
        workers: Option<usize>,

        /// Maximum words per chunk
        #[arg(long)]
        word_limit: Option<usize>,

        /// Base output directory for narrations
        #[arg(long)]
        output_dir: Option<String>,

        /// Audio cache directory
        #[arg(long)]
        cache_dir: Option<String>,
    },
    /// Reset all settings to defaults
    Reset,
}

//! CLI entry point - the composition root.
//!
//! Infrastructure is wired in `bootstrap`; command dispatch routes to
//! handlers which drive the pipeline.

use clap::Parser;

use lector_cli::commands::{self, NarrateArgs, SettingsSetArgs};
use lector_cli::{CacheCommand, Cli, Commands, SettingsCommand, config_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables (service endpoint, API key)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = config_file::load();

    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Narrate {
            input,
            output_dir,
            voice,
            rate,
            pitch,
            volume,
            bgm,
            bgm_volume,
            workers,
            word_limit,
        } => {
            commands::narrate(
                settings,
                NarrateArgs {
                    input,
                    output_dir,
                    voice,
                    rate,
                    pitch,
                    volume,
                    bgm,
                    bgm_volume,
                    workers,
                    word_limit,
                },
            )
            .await
        }
        Commands::Preview {
            input,
            voice,
            rate,
            pitch,
        } => commands::preview(settings, input, voice, rate, pitch).await,
        Commands::Voices => commands::voices().await,
        Commands::Cache {
            command: CacheCommand::Clear,
        } => commands::cache_clear(&settings).await,
        Commands::Settings { command } => match command {
            SettingsCommand::Show => commands::settings_show(&settings),
            SettingsCommand::Set {
                voice,
                rate,
                pitch,
                volume,
                bgm_volume,
                workers,
                word_limit,
                output_dir,
                cache_dir,
            } => commands::settings_set(
                settings,
                &SettingsSetArgs {
                    voice,
                    rate,
                    pitch,
                    volume,
                    bgm_volume,
                    workers,
                    word_limit,
                    output_dir,
                    cache_dir,
                },
            ),
            SettingsCommand::Reset => commands::settings_reset(),
        },
    }
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use multiview_core::{key_bindings, AppConfig, Command};
use tracing_subscriber::EnvFilter;

mod session;

use session::SessionScript;

fn main() -> multiview_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_json_path(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Replay { script } => run_replay(&script, config),
        Commands::Keys => {
            print_keys(&config);
            Ok(())
        }
    }
}

fn run_replay(script: &Path, config: AppConfig) -> multiview_core::Result<()> {
    tracing::info!(?script, "replaying review session");

    let session = SessionScript::from_json_path(script)?;
    let snapshot = session::replay(&session, config.player)?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn print_keys(config: &AppConfig) {
    for (key, action) in key_bindings() {
        println!("{key:<12} {action}");
    }
    println!();
    println!("transport buttons:");
    for command in Command::transport_row(&config.player) {
        println!("  {command:?}");
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Side-by-side review of multi-angle recordings", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scripted session against the simulated backend and print the
    /// final state as JSON.
    Replay {
        /// Path to the session script.
        script: PathBuf,
    },
    /// List the keyboard bindings and transport buttons.
    Keys,
}

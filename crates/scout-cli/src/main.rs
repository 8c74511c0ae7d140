use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout::config::Settings;
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;
mod session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read credentials and settings from this env file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session (default)
    Session,

    /// Ask a single question and print the answer
    Run {
        /// The question to ask
        #[arg(short, long)]
        text: String,
    },

    /// Show the resolved configuration and any missing credentials
    Check,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings(cli.env_file.as_deref())?;

    match cli.command.unwrap_or(Command::Session) {
        Command::Session => commands::session::execute(settings),
        Command::Run { text } => commands::run::execute(settings, &text),
        Command::Check => commands::check::execute(&settings),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(env_file: Option<&Path>) -> Result<Settings> {
    let settings = match env_file {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::new().context("Failed to load settings")?,
    };
    Ok(settings)
}

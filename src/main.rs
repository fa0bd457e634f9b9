//! CLI entry point for the roadie tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;

use cli::{Args, Command, CookiesCommand};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match &args.command {
        Command::Cookies { command } => match command {
            CookiesCommand::Dump(dump_args) => commands::run_cookies_dump_command(dump_args)?,
            CookiesCommand::Sync(sync_args) => commands::run_cookies_sync_command(sync_args)?,
        },
        Command::Speak(speak_args) => commands::run_speak_command(speak_args).await?,
        Command::SongId(song_args) => commands::run_song_id_command(song_args).await?,
    }

    Ok(())
}

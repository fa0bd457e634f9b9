//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use roadie::relay::{
    DEFAULT_EXPORT_FILE, DEFAULT_EXPORT_HOST, DEFAULT_PATCH_HOST, DEFAULT_PATCH_NAME,
    DEFAULT_VALUE_FILE,
};
use roadie::songid;
use roadie::speech;

/// Streaming-desk automation toolkit.
///
/// Roadie hands browser cookies to the tools that need them, speaks lines
/// through a synthesis service, and identifies songs in captured clips.
#[derive(Parser, Debug)]
#[command(name = "roadie")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browser cookie handoff
    Cookies {
        #[command(subcommand)]
        command: CookiesCommand,
    },
    /// Speak a line through the synthesis service
    Speak(SpeakArgs),
    /// Identify the song playing in a video clip
    SongId(SongIdArgs),
}

/// Cookie subcommands.
#[derive(Subcommand, Debug)]
pub enum CookiesCommand {
    /// Read the browser store and write every consumer's file
    Dump(DumpArgs),
    /// Apply a dumped value file to the local config
    Sync(SyncArgs),
}

/// Arguments for `cookies dump`.
#[derive(clap::Args, Debug)]
pub struct DumpArgs {
    /// Firefox profile root (default: app-data Mozilla/Firefox/Profiles)
    #[arg(long)]
    pub profile_root: Option<PathBuf>,

    /// Profile directory name, bypassing discovery
    #[arg(long)]
    pub profile: Option<String>,

    /// Path to the syrics config file (default: app-data syrics/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the cookie and value files
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Host whose cookies are exported in Netscape format
    #[arg(long, default_value = DEFAULT_EXPORT_HOST)]
    pub export_host: String,

    /// File name for the Netscape export, within the output directory
    #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
    pub export_file: String,

    /// Host holding the cookie to patch into the config
    #[arg(long, default_value = DEFAULT_PATCH_HOST)]
    pub patch_host: String,

    /// Cookie name; doubles as the config key receiving the value
    #[arg(long, default_value = DEFAULT_PATCH_NAME)]
    pub patch_name: String,

    /// File name for the raw value file, within the output directory
    #[arg(long, default_value = DEFAULT_VALUE_FILE)]
    pub value_file: String,
}

/// Arguments for `cookies sync`.
#[derive(clap::Args, Debug)]
pub struct SyncArgs {
    /// Path to the raw value file produced by `cookies dump`
    #[arg(long, default_value = DEFAULT_VALUE_FILE)]
    pub value_file: PathBuf,

    /// Path to the syrics config file (default: app-data syrics/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Config key receiving the value
    #[arg(long, default_value = DEFAULT_PATCH_NAME)]
    pub key: String,
}

/// Arguments for `speak`.
#[derive(clap::Args, Debug)]
pub struct SpeakArgs {
    /// Text to speak
    pub text: String,

    /// Voice name (default: a random pick from the voice table)
    #[arg(long)]
    pub voice: Option<String>,

    /// Synthesis service endpoint
    #[arg(long, default_value = speech::DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

/// Arguments for `song-id`.
#[derive(clap::Args, Debug)]
pub struct SongIdArgs {
    /// Video file to identify
    pub video: PathBuf,

    /// Print only the primary genre
    #[arg(long)]
    pub genre_only: bool,

    /// Recognition service endpoint
    #[arg(long, default_value = songid::DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

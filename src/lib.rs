//! Roadie Core Library
//!
//! This library provides the core functionality for the roadie tool, a
//! streaming-desk sidekick that hands browser cookies to the tools that
//! need them, speaks lines through a synthesis service, and identifies
//! songs in captured clips.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cookies`] - Firefox profile discovery, cookie store reads, Netscape export
//! - [`config_patch`] - Single-key patching of an external JSON config
//! - [`relay`] - The dump and sync routines tying the cookie pieces together
//! - [`paths`] - Platform app-data path resolution
//! - [`speech`] - Text sanitizing, synthesis client, audio playback
//! - [`songid`] - Audio extraction and song recognition client

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config_patch;
pub mod cookies;
pub mod paths;
pub mod relay;
pub mod songid;
pub mod speech;

// Re-export commonly used types
pub use config_patch::{PatchError, patch_key};
pub use cookies::{
    CookieJar, CookieRecord, DEFAULT_PROFILE_SUFFIX, ExportError, HostCookies, ProfileError,
    STORE_FILE_NAME, StoreError, discover_profile, export_host, load_jar, select_profile,
};
pub use paths::{AppPaths, PathsError};
pub use relay::{RelayError, RelayPlan, SyncError, run_dump, run_sync};
pub use songid::{RecognitionClient, SongIdError, Track, identify};
pub use speech::{SpeechClient, SpeechError, VOICES, pick_voice, sanitize_text};

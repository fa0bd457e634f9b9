//! CLI command handlers.

mod cookies;
mod songid;
mod speak;

pub use cookies::{run_cookies_dump_command, run_cookies_sync_command};
pub use songid::run_song_id_command;
pub use speak::run_speak_command;

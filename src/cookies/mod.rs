//! Browser cookie extraction and redistribution.
//!
//! Firefox keeps its cookies in a per-profile SQLite database. This module
//! locates the profile, reads the database without ever writing to it, and
//! hands the cookies back out in the shapes other tools want: a
//! Netscape-format cookie file, or a single value for a config entry.
//!
//! # Example
//!
//! ```no_run
//! use roadie::cookies;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let profile =
//!     cookies::discover_profile(Path::new("/profiles"), cookies::DEFAULT_PROFILE_SUFFIX)?;
//! let jar = cookies::load_jar(&profile)?;
//! cookies::export_host(&jar, ".youtube.com", Path::new("youtube_cookies.txt"))?;
//! # Ok(())
//! # }
//! ```

mod jar;
mod netscape;
mod profile;
mod store;

pub use jar::{CookieJar, CookieRecord, HostCookies};
pub use netscape::{ExportError, NETSCAPE_HEADER, export_host, render};
pub use profile::{DEFAULT_PROFILE_SUFFIX, ProfileError, discover_profile, select_profile};
pub use store::{STORE_FILE_NAME, StoreError, load_jar};

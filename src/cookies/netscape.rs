//! Netscape cookie file export.
//!
//! Renders one host's cookies in the classic seven-field tab-separated
//! format that `yt-dlp` and friends accept: domain, include-subdomains
//! flag, path, secure flag, expiry, name, value. The file carries the
//! standard header line, a blank separator line, and no trailing newline.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cookies::jar::{CookieJar, HostCookies};

/// Header line consumers use to recognise the format.
pub const NETSCAPE_HEADER: &str = "# Netscape HTTP Cookie File";

/// Errors exporting a host's cookies to a file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The jar holds no cookies for the requested host.
    #[error("no cookies stored for host '{host}'")]
    HostNotFound {
        /// Host that was requested.
        host: String,
    },

    /// The cookie file could not be written.
    #[error("failed to write cookie file '{}': {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Renders the Netscape-format body for one host.
///
/// Rows keep the jar's insertion order. Every row claims path `/` and
/// includes subdomains; the browser's own path scoping is deliberately
/// flattened so downstream tools always send the cookie.
#[must_use]
pub fn render(host: &str, cookies: &HostCookies) -> String {
    let rows: Vec<String> = cookies
        .iter()
        .map(|(name, record)| {
            let secure = if record.secure { "TRUE" } else { "FALSE" };
            format!(
                "{host}\tTRUE\t/\t{secure}\t{}\t{name}\t{}",
                record.expiry,
                record.value()
            )
        })
        .collect();
    format!("{NETSCAPE_HEADER}\n\n{}", rows.join("\n"))
}

/// Exports every cookie the jar holds for `host` to `path`.
///
/// The body is rendered in full before the file is touched, so an
/// unknown host never leaves a partial or empty file behind. An
/// existing file is overwritten; repeat runs over the same jar produce
/// byte-identical output.
///
/// # Errors
///
/// Returns [`ExportError::HostNotFound`] when the jar has no entry for
/// `host`, or [`ExportError::Write`] when the file cannot be written.
pub fn export_host(jar: &CookieJar, host: &str, path: &Path) -> Result<(), ExportError> {
    let cookies = jar.host(host).ok_or_else(|| ExportError::HostNotFound {
        host: host.to_string(),
    })?;

    let body = render(host, cookies);
    fs::write(path, body).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        host,
        cookies = cookies.len(),
        file = %path.display(),
        "exported cookie file"
    );
    Ok(())
}

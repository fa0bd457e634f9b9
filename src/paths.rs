//! Filesystem locations for everything roadie touches.
//!
//! All operations take an explicit [`AppPaths`] rather than reading the
//! environment themselves; [`AppPaths::from_env`] is the one place the
//! platform app-data conventions are applied.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Errors resolving the platform app-data root.
#[derive(Debug, thiserror::Error)]
pub enum PathsError {
    /// No usable app-data root could be derived from the environment.
    #[error("unable to determine app data root (set APPDATA, XDG_CONFIG_HOME, or HOME)")]
    AppDataUnavailable,
}

/// Resolved locations for a run.
///
/// `profile_root` is the directory containing Firefox profile directories,
/// `config_path` is the syrics `config.json` owned by that tool, and
/// `output_dir` is where the export and raw-value files land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory scanned for browser profile directories.
    pub profile_root: PathBuf,
    /// The external JSON config file patched by the redistribution run.
    pub config_path: PathBuf,
    /// Destination directory for exported cookie files.
    pub output_dir: PathBuf,
}

impl AppPaths {
    /// Resolves all paths from the platform app-data conventions.
    ///
    /// # Errors
    ///
    /// Returns [`PathsError::AppDataUnavailable`] when no app-data root can
    /// be derived from the environment.
    pub fn from_env() -> Result<Self, PathsError> {
        let root = default_app_data_root()?;
        Ok(Self::from_app_data_root(&root))
    }

    /// Derives the conventional layout under a known app-data root.
    ///
    /// Both the Firefox profile tree and the syrics config live under the
    /// same root; the output directory defaults to the working directory.
    #[must_use]
    pub fn from_app_data_root(root: &Path) -> Self {
        Self {
            profile_root: root.join("Mozilla").join("Firefox").join("Profiles"),
            config_path: root.join("syrics").join("config.json"),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Resolves the app-data root from the process environment.
///
/// Priority: `APPDATA` (the convention the cookie store and syrics config
/// were laid out under), then `XDG_CONFIG_HOME`, then `$HOME/.config`.
///
/// # Errors
///
/// Returns [`PathsError::AppDataUnavailable`] when none of the sources is set.
pub fn default_app_data_root() -> Result<PathBuf, PathsError> {
    resolve_app_data_root(
        sanitize_env_path(env::var_os("APPDATA")),
        sanitize_env_path(env::var_os("XDG_CONFIG_HOME")),
        sanitize_env_path(env::var_os("HOME")),
    )
}

fn resolve_app_data_root(
    app_data: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, PathsError> {
    if let Some(app_data) = app_data {
        return Ok(app_data);
    }
    if let Some(xdg) = xdg_config_home {
        return Ok(xdg);
    }
    if let Some(home) = home {
        return Ok(home.join(".config"));
    }

    Err(PathsError::AppDataUnavailable)
}

fn sanitize_env_path(value: Option<OsString>) -> Option<PathBuf> {
    let value = value?;
    if value.to_string_lossy().trim().is_empty() {
        return None;
    }

    Some(PathBuf::from(value))
}

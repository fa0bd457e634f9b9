//! Cookie relay runs.
//!
//! A dump run pulls the browser jar once and fans it out to every consumer:
//! a Netscape cookie file for the export host, a patched key in the syrics
//! config, and a raw value file a companion machine can pick up. The sync
//! run is that companion's half, applying a previously dumped value file to
//! its own config.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::config_patch::{self, PatchError};
use crate::cookies::{self, CookieJar, ExportError, ProfileError, StoreError};
use crate::paths::AppPaths;

/// Host whose cookies are exported by default.
pub const DEFAULT_EXPORT_HOST: &str = ".youtube.com";
/// Default file name for the Netscape export.
pub const DEFAULT_EXPORT_FILE: &str = "youtube_cookies.txt";
/// Host carrying the cookie that is patched into the config by default.
pub const DEFAULT_PATCH_HOST: &str = ".spotify.com";
/// Default cookie name, and config key, for the patch.
pub const DEFAULT_PATCH_NAME: &str = "sp_dc";
/// Default file name for the raw value file.
pub const DEFAULT_VALUE_FILE: &str = "spotify_sp_dc_cookies.txt";

/// One dump run: which cookies leave the jar and where they land.
#[derive(Debug, Clone)]
pub struct RelayPlan {
    /// Host whose cookies are exported in Netscape format.
    pub export_host: String,
    /// File name under the output directory for the Netscape export.
    pub export_file: String,
    /// Host holding the cookie to patch into the config.
    pub patch_host: String,
    /// Cookie name; doubles as the config key that receives the value.
    pub patch_name: String,
    /// File name under the output directory for the raw value file.
    pub value_file: String,
}

impl Default for RelayPlan {
    fn default() -> Self {
        Self {
            export_host: DEFAULT_EXPORT_HOST.to_string(),
            export_file: DEFAULT_EXPORT_FILE.to_string(),
            patch_host: DEFAULT_PATCH_HOST.to_string(),
            patch_name: DEFAULT_PATCH_NAME.to_string(),
            value_file: DEFAULT_VALUE_FILE.to_string(),
        }
    }
}

/// Errors from a dump run, in stage order.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Profile discovery or selection failed.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The browser cookie store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The Netscape export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The cookie to patch into the config is not in the jar.
    #[error("cookie '{name}' not found for host '{host}'")]
    CookieNotFound {
        /// Host that was searched.
        host: String,
        /// Cookie name that was searched for.
        name: String,
    },

    /// Patching the config failed.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The raw value file could not be written.
    #[error("failed to write value file '{}': {source}", path.display())]
    ValueFile {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors applying a dumped value file on the companion machine.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The value file could not be read.
    #[error("failed to read value file '{}': {source}", path.display())]
    Read {
        /// Location of the value file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The value file's first line is empty or whitespace.
    #[error("value file '{}' holds no value", path.display())]
    MissingValue {
        /// Location of the value file.
        path: PathBuf,
    },

    /// Patching the config failed.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Loads the browser jar for `paths`, honoring an explicit profile choice.
///
/// # Errors
///
/// Returns [`RelayError::Profile`] or [`RelayError::Store`] when the
/// profile cannot be located or its store cannot be read.
pub fn load_browser_jar(
    paths: &AppPaths,
    profile: Option<&str>,
) -> Result<CookieJar, RelayError> {
    let profile_dir = cookies::select_profile(
        &paths.profile_root,
        cookies::DEFAULT_PROFILE_SUFFIX,
        profile,
    )?;
    let jar = cookies::load_jar(&profile_dir)?;
    Ok(jar)
}

/// Runs a full dump: Netscape export, then config patch, then value file.
///
/// Each file is written only once everything it needs has been resolved,
/// so a failing stage never leaves a half-written file. Stages run in
/// order and the first failure ends the run; files written by earlier
/// stages stay in place.
///
/// # Errors
///
/// Returns [`RelayError`] naming the stage that failed.
#[instrument(skip_all, fields(export_host = %plan.export_host, patch_host = %plan.patch_host))]
pub fn run_dump(
    paths: &AppPaths,
    plan: &RelayPlan,
    profile: Option<&str>,
) -> Result<(), RelayError> {
    let jar = load_browser_jar(paths, profile)?;

    let export_path = paths.output_dir.join(&plan.export_file);
    cookies::export_host(&jar, &plan.export_host, &export_path)?;

    let record = jar.get(&plan.patch_host, &plan.patch_name).ok_or_else(|| {
        RelayError::CookieNotFound {
            host: plan.patch_host.clone(),
            name: plan.patch_name.clone(),
        }
    })?;
    let value = record.value().to_string();
    config_patch::patch_key(&paths.config_path, &plan.patch_name, &value)?;

    let value_path = paths.output_dir.join(&plan.value_file);
    write_value_file(&value_path, &value)?;

    info!("cookie relay complete");
    Ok(())
}

/// Applies a previously dumped value file to the config at `config_path`.
///
/// Only the first line of the file is consumed, trimmed of surrounding
/// whitespace. An absent file or a blank first line leaves the config
/// unmodified.
///
/// # Errors
///
/// Returns [`SyncError`] when the value file is unreadable or empty, or
/// when the config patch fails.
#[instrument(skip_all)]
pub fn run_sync(value_path: &Path, config_path: &Path, key: &str) -> Result<(), SyncError> {
    let raw = fs::read_to_string(value_path).map_err(|source| SyncError::Read {
        path: value_path.to_path_buf(),
        source,
    })?;

    let value = raw.lines().next().unwrap_or("").trim();
    if value.is_empty() {
        return Err(SyncError::MissingValue {
            path: value_path.to_path_buf(),
        });
    }

    config_patch::patch_key(config_path, key, value)?;
    info!(key, "synced value into config");
    Ok(())
}

/// Writes the raw value as a single line with no trailing newline.
fn write_value_file(path: &Path, value: &str) -> Result<(), RelayError> {
    let to_err = |source| RelayError::ValueFile {
        path: path.to_path_buf(),
        source,
    };
    fs::write(path, value).map_err(to_err)?;
    // The file holds live cookie material; keep it out of other users' reach.
    set_owner_only_permissions(path).map_err(to_err)?;
    Ok(())
}

#[cfg(unix)]
fn set_owner_only_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn set_owner_only_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

//! Firefox profile directory discovery.
//!
//! Profiles live as directories under the profile root, named with a random
//! prefix and a fixed suffix (e.g. `abcd1234.default-release`). Discovery
//! matches on the suffix and refuses to guess when more than one directory
//! matches; an explicit profile name bypasses discovery entirely.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Suffix of the profile Firefox creates for the default release channel.
pub const DEFAULT_PROFILE_SUFFIX: &str = ".default-release";

/// Errors locating the browser profile directory.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The profile root could not be scanned.
    #[error("failed to scan profile root '{}': {source}", root.display())]
    Scan {
        /// Directory that was being scanned.
        root: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No profile directory matched the suffix.
    #[error("no profile directory ending in '{suffix}' under '{}'", root.display())]
    NotFound {
        /// Directory that was scanned.
        root: PathBuf,
        /// Suffix that was matched against.
        suffix: String,
    },

    /// More than one profile directory matched the suffix.
    #[error(
        "multiple profile directories end in '{suffix}' under '{}' ({}); select one with --profile",
        root.display(),
        candidates.join(", ")
    )]
    Ambiguous {
        /// Directory that was scanned.
        root: PathBuf,
        /// Suffix that was matched against.
        suffix: String,
        /// All matching directory names, sorted.
        candidates: Vec<String>,
    },

    /// An explicitly named profile directory does not exist.
    #[error("profile directory '{}' does not exist", dir.display())]
    ExplicitMissing {
        /// The directory that was requested.
        dir: PathBuf,
    },
}

/// Locates the profile directory for a run.
///
/// With `explicit` set, returns `root/<explicit>` (which must exist) and
/// never scans. Otherwise scans `root` for directories whose name ends in
/// `suffix` and requires exactly one match.
///
/// # Errors
///
/// Returns [`ProfileError`] when the root cannot be read, no directory
/// matches, several match, or the explicit profile does not exist.
pub fn select_profile(
    root: &Path,
    suffix: &str,
    explicit: Option<&str>,
) -> Result<PathBuf, ProfileError> {
    if let Some(name) = explicit {
        let dir = root.join(name);
        if dir.is_dir() {
            debug!(profile = name, "using explicitly selected profile");
            return Ok(dir);
        }
        return Err(ProfileError::ExplicitMissing { dir });
    }

    discover_profile(root, suffix)
}

/// Scans `root` for the single profile directory ending in `suffix`.
///
/// # Errors
///
/// Returns [`ProfileError::NotFound`] for zero matches and
/// [`ProfileError::Ambiguous`] for more than one; picking an arbitrary
/// match would silently read the wrong browser profile.
pub fn discover_profile(root: &Path, suffix: &str) -> Result<PathBuf, ProfileError> {
    let entries = fs::read_dir(root).map_err(|source| ProfileError::Scan {
        root: root.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ProfileError::Scan {
            root: root.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(suffix) && entry.path().is_dir() {
            candidates.push(name);
        }
    }
    candidates.sort();

    match candidates.as_slice() {
        [] => Err(ProfileError::NotFound {
            root: root.to_path_buf(),
            suffix: suffix.to_string(),
        }),
        [single] => {
            debug!(profile = %single, "discovered profile directory");
            Ok(root.join(single))
        }
        _ => Err(ProfileError::Ambiguous {
            root: root.to_path_buf(),
            suffix: suffix.to_string(),
            candidates,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_single_match() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("abc123.default-release")).unwrap();
        fs::create_dir(root.path().join("xyz789.dev-edition")).unwrap();

        let found = discover_profile(root.path(), DEFAULT_PROFILE_SUFFIX).unwrap();
        assert_eq!(found, root.path().join("abc123.default-release"));
    }

    #[test]
    fn test_discover_zero_matches_is_not_found() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("xyz789.dev-edition")).unwrap();

        let result = discover_profile(root.path(), DEFAULT_PROFILE_SUFFIX);
        assert!(matches!(result, Err(ProfileError::NotFound { .. })));
    }

    #[test]
    fn test_discover_multiple_matches_is_ambiguous() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("bbb.default-release")).unwrap();
        fs::create_dir(root.path().join("aaa.default-release")).unwrap();

        let result = discover_profile(root.path(), DEFAULT_PROFILE_SUFFIX);
        match result {
            Err(ProfileError::Ambiguous { candidates, .. }) => {
                assert_eq!(
                    candidates,
                    vec!["aaa.default-release".to_string(), "bbb.default-release".to_string()],
                    "candidates should be sorted"
                );
            }
            other => panic!("expected Ambiguous, got: {other:?}"),
        }
    }

    #[test]
    fn test_discover_ignores_matching_plain_files() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("stray.default-release"), b"not a dir").unwrap();
        fs::create_dir(root.path().join("abc.default-release")).unwrap();

        let found = discover_profile(root.path(), DEFAULT_PROFILE_SUFFIX).unwrap();
        assert_eq!(found, root.path().join("abc.default-release"));
    }

    #[test]
    fn test_discover_missing_root_is_scan_error() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope");

        let result = discover_profile(&missing, DEFAULT_PROFILE_SUFFIX);
        assert!(matches!(result, Err(ProfileError::Scan { .. })));
    }

    #[test]
    fn test_select_explicit_bypasses_ambiguity() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("aaa.default-release")).unwrap();
        fs::create_dir(root.path().join("bbb.default-release")).unwrap();

        let found =
            select_profile(root.path(), DEFAULT_PROFILE_SUFFIX, Some("bbb.default-release"))
                .unwrap();
        assert_eq!(found, root.path().join("bbb.default-release"));
    }

    #[test]
    fn test_select_explicit_missing_is_error() {
        let root = TempDir::new().unwrap();

        let result = select_profile(root.path(), DEFAULT_PROFILE_SUFFIX, Some("ghost"));
        assert!(matches!(result, Err(ProfileError::ExplicitMissing { .. })));
    }
}

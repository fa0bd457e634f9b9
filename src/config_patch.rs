//! Surgical edits to another tool's JSON config file.
//!
//! The config belongs to the other tool; this module only ever replaces the
//! value of a single top-level key. Every other key keeps its value and its
//! position, and the file is rewritten with four-space indentation to match
//! what the owning tool writes itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use tracing::info;

/// Errors patching a JSON config file.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The config file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// Location of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON.
    #[error("config '{}' is not valid JSON: {source}", path.display())]
    Parse {
        /// Location of the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The config file parses, but its top level is not a JSON object.
    #[error("config '{}' does not hold a JSON object at the top level", path.display())]
    NotAnObject {
        /// Location of the config file.
        path: PathBuf,
    },

    /// The updated config could not be serialized.
    #[error("failed to serialize updated config: {source}")]
    Serialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The updated config could not be written back.
    #[error("failed to write config '{}': {source}", path.display())]
    Write {
        /// Location of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Replaces the value of `key` in the JSON object stored at `path`.
///
/// An existing key keeps its position in the file; a new key is appended
/// after the existing ones. The file is only rewritten once the whole
/// config has parsed, so a malformed file is left exactly as it was.
///
/// # Errors
///
/// Returns [`PatchError`] when the file cannot be read, does not parse,
/// is not a JSON object, or cannot be written back.
pub fn patch_key(path: &Path, key: &str, value: &str) -> Result<(), PatchError> {
    let raw = fs::read_to_string(path).map_err(|source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Value = serde_json::from_str(&raw).map_err(|source| PatchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Object(mut map) = parsed else {
        return Err(PatchError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    map.insert(key.to_string(), Value::String(value.to_string()));

    let rendered = render(&map).map_err(|source| PatchError::Serialize { source })?;
    fs::write(path, rendered).map_err(|source| PatchError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(key, config = %path.display(), "patched config key");
    Ok(())
}

/// Serializes the config with four-space indentation and no trailing newline.
fn render(map: &Map<String, Value>) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    map.serialize(&mut ser)?;
    Ok(buf)
}

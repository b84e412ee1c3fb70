//! Device identity configuration.
//!
//! Each installation names itself with a 2-byte device ID kept in a small
//! JSON file next to the binary:
//!
//! ```json
//! { "device_id": "0x0002" }
//! ```
//!
//! Loading happens synchronously, once, before any session exists. Every
//! failure mode is a [`ConfigError`] surfaced to the caller; the program
//! decides whether to exit, never this module.

use std::path::{Path, PathBuf};

use pairchat_core::errors::DeviceIdParseError;
use pairchat_core::DeviceId;
use serde::Deserialize;
use thiserror::Error;

/// The configuration file could not be turned into a device ID.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File missing or unreadable.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Not valid JSON, or the `device_id` field is absent.
    #[error("config file {path} is malformed: {source}")]
    Json {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The `device_id` value does not fit in 2 bytes.
    #[error("config file {path}: {source}")]
    DeviceId {
        /// Path that was attempted.
        path: PathBuf,
        /// What was wrong with the value.
        #[source]
        source: DeviceIdParseError,
    },
}

#[derive(Deserialize)]
struct ConfigFile {
    device_id: DeviceIdField,
}

/// The field accepts either the documented `"0x0002"` string form or a bare
/// JSON integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeviceIdField {
    Text(String),
    Raw(u64),
}

/// Load the device ID from `path`.
pub fn load_device_id(path: &Path) -> Result<DeviceId, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    let parsed: ConfigFile = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_owned(),
        source,
    })?;
    match parsed.device_id {
        DeviceIdField::Text(s) => s.parse().map_err(|source| ConfigError::DeviceId {
            path: path.to_owned(),
            source,
        }),
        DeviceIdField::Raw(n) => u16::try_from(n).map(DeviceId::new).map_err(|_| {
            ConfigError::DeviceId {
                path: path.to_owned(),
                source: DeviceIdParseError(n.to_string()),
            }
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_hex_string_form() {
        let file = write_config(r#"{ "device_id": "0x0002" }"#);
        let id = load_device_id(file.path()).unwrap();
        assert_eq!(id, DeviceId::new(2));
    }

    #[test]
    fn loads_bare_integer_form() {
        let file = write_config(r#"{ "device_id": 513 }"#);
        let id = load_device_id(file.path()).unwrap();
        assert_eq!(id, DeviceId::new(513));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_device_id(Path::new("/nonexistent/config.json")).unwrap_err();
        assert_matches!(err, ConfigError::Io { .. });
    }

    #[test]
    fn invalid_json_is_json_error() {
        let file = write_config("not json at all");
        assert_matches!(
            load_device_id(file.path()).unwrap_err(),
            ConfigError::Json { .. }
        );
    }

    #[test]
    fn missing_field_is_json_error() {
        let file = write_config(r#"{ "other": 1 }"#);
        assert_matches!(
            load_device_id(file.path()).unwrap_err(),
            ConfigError::Json { .. }
        );
    }

    #[test]
    fn out_of_range_integer_rejected() {
        let file = write_config(r#"{ "device_id": 65536 }"#);
        assert_matches!(
            load_device_id(file.path()).unwrap_err(),
            ConfigError::DeviceId { .. }
        );
    }

    #[test]
    fn out_of_range_hex_rejected() {
        let file = write_config(r#"{ "device_id": "0x10000" }"#);
        assert_matches!(
            load_device_id(file.path()).unwrap_err(),
            ConfigError::DeviceId { .. }
        );
    }
}

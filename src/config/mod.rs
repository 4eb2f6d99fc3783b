//! Configuration file loading
//!
//! A config file is sniffed by extension and decoded into a plain JSON-style
//! mapping. The loader is a dispatch table: each supported format is one
//! [`Format`] entry, and adding a format means adding an entry.

use crate::cli::output::Console;
use crate::error::ConfigError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

mod highlight;
mod settings;

pub use highlight::highlight_json;
pub use settings::ExportSettings;

/// Decoded top-level configuration mapping.
pub type ConfigMap = serde_json::Map<String, Value>;

type Decoder = fn(&str) -> Result<Value, String>;

/// One supported configuration format.
pub struct Format {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    /// `None` when the format was compiled out.
    decode: Option<Decoder>,
}

impl Format {
    pub fn is_available(&self) -> bool {
        self.decode.is_some()
    }
}

#[cfg(feature = "toml")]
const TOML_DECODER: Option<Decoder> = Some(decode_toml);
#[cfg(not(feature = "toml"))]
const TOML_DECODER: Option<Decoder> = None;

pub const FORMATS: &[Format] = &[
    Format {
        name: "TOML",
        extensions: &["toml"],
        decode: TOML_DECODER,
    },
    Format {
        name: "YAML",
        extensions: &["yaml", "yml"],
        decode: Some(decode_yaml),
    },
    Format {
        name: "JSON",
        extensions: &["json"],
        decode: Some(decode_json),
    },
];

#[cfg(feature = "toml")]
fn decode_toml(content: &str) -> Result<Value, String> {
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    serde_json::to_value(table).map_err(|e| e.to_string())
}

fn decode_yaml(content: &str) -> Result<Value, String> {
    serde_yml::from_str(content).map_err(|e| e.to_string())
}

fn decode_json(content: &str) -> Result<Value, String> {
    serde_json::from_str(content).map_err(|e| e.to_string())
}

/// Format entry for `path`'s extension, compared case-insensitively.
pub fn format_for_path(path: &Path) -> Option<&'static Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    FORMATS.iter().find(|f| f.extensions.contains(&ext.as_str()))
}

/// Load `path` as a mapping, or report why it could not be loaded.
pub fn try_load(path: &Path) -> Result<ConfigMap, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let format = format_for_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        ConfigError::UnsupportedFormat(ext)
    })?;
    let decode = format.decode.ok_or(ConfigError::FormatUnavailable(format.name))?;

    let value = decode(&content).map_err(|message| ConfigError::Decode {
        format: format.name,
        path: path.to_path_buf(),
        message,
    })?;

    match value {
        Value::Object(map) => {
            tracing::debug!(path = %path.display(), format = format.name, keys = map.len(), "loaded config");
            Ok(map)
        }
        _ => Err(ConfigError::NotAMapping {
            format: format.name,
            path: path.to_path_buf(),
        }),
    }
}

/// Load a TOML, YAML or JSON configuration file.
///
/// Every failure is reported once through `console` and yields `None`.
pub fn load_config_file(path: impl AsRef<Path>, console: &dyn Console) -> Option<ConfigMap> {
    let path = path.as_ref();
    match try_load(path) {
        Ok(map) => Some(map),
        Err(err) => {
            console.error(&format!("Error: {err}"));
            tracing::error!(path = %path.display(), error = %err, "config load failed");
            None
        }
    }
}

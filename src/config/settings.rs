//! Typed view of the export keys in a loaded config mapping.

use super::ConfigMap;
use crate::export::ExportFormat;
use serde_json::Value;

/// Export options a config file may supply. Every key is optional and
/// command-line flags take precedence over all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSettings {
    pub report_name: Option<String>,
    pub dir: Option<String>,
    pub report_types: Vec<ExportFormat>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub aws_profile: Option<String>,
    pub region: Option<String>,
}

impl ExportSettings {
    pub fn from_map(map: &ConfigMap) -> Self {
        Self {
            report_name: string_key(map, "report_name"),
            dir: string_key(map, "dir"),
            report_types: report_types(map),
            s3_bucket: string_key(map, "s3_bucket"),
            s3_prefix: string_key(map, "s3_prefix"),
            aws_profile: string_key(map, "aws_profile"),
            region: string_key(map, "region"),
        }
    }
}

fn string_key(map: &ConfigMap, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            tracing::warn!(key, value = %other, "ignoring config key: expected a string");
            None
        }
    }
}

/// `report_type` as a list, or a single string, of format names.
fn report_types(map: &ConfigMap) -> Vec<ExportFormat> {
    let names: Vec<&Value> = match map.get("report_type") {
        None => return Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::String(_)) => vec![single],
        Some(other) => {
            tracing::warn!(value = %other, "ignoring config key report_type: expected a list");
            return Vec::new();
        }
    };

    let mut formats = Vec::new();
    for name in names {
        match name.as_str().map(str::parse::<ExportFormat>) {
            Some(Ok(format)) if !formats.contains(&format) => formats.push(format),
            Some(Ok(_)) => {}
            Some(Err(err)) => tracing::warn!("ignoring report_type entry: {err}"),
            None => tracing::warn!(value = %name, "ignoring non-string report_type entry"),
        }
    }
    formats
}

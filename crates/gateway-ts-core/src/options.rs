//! Plugin parameters (`--gateway-ts_opt=k=v,...`) → [`GeneratorOptions`].

use std::collections::BTreeMap;

pub const ENABLE_STYLING_CHECK: &str = "enable_styling_check";
pub const USE_PROTO_NAMES: &str = "use_proto_names";
pub const FETCH_MODULE_DIRECTORY: &str = "fetch_module_directory";
pub const FETCH_MODULE_FILENAME: &str = "fetch_module_filename";
pub const LOG_LEVEL: &str = "loglevel";

pub const DEFAULT_FETCH_MODULE_DIRECTORY: &str = ".";
pub const DEFAULT_FETCH_MODULE_FILENAME: &str = "fetch.pb.ts";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const KNOWN_OPTIONS: &[&str] = &[
    ENABLE_STYLING_CHECK,
    USE_PROTO_NAMES,
    FETCH_MODULE_DIRECTORY,
    FETCH_MODULE_FILENAME,
    LOG_LEVEL,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Stricter, lint-friendly output (no `@ts-nocheck`).
    pub enable_styling_check: bool,
    /// Use proto field names as TypeScript property names.
    pub use_proto_names: bool,
    pub fetch_module_directory: String,
    pub fetch_module_filename: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            enable_styling_check: false,
            use_proto_names: false,
            fetch_module_directory: DEFAULT_FETCH_MODULE_DIRECTORY.to_string(),
            fetch_module_filename: DEFAULT_FETCH_MODULE_FILENAME.to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Build options from parsed parameters. `loglevel` is accepted but
    /// read by the binary before the subscriber is installed.
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        for key in params.keys() {
            if !KNOWN_OPTIONS.contains(&key.as_str()) {
                tracing::warn!(option = %key, "ignoring unknown plugin option");
            }
        }

        let defaults = Self::default();
        Self {
            enable_styling_check: flag(params, ENABLE_STYLING_CHECK),
            use_proto_names: flag(params, USE_PROTO_NAMES),
            fetch_module_directory: non_empty(params, FETCH_MODULE_DIRECTORY)
                .unwrap_or(defaults.fetch_module_directory),
            fetch_module_filename: non_empty(params, FETCH_MODULE_FILENAME)
                .unwrap_or(defaults.fetch_module_filename),
        }
    }

    /// Slash-normalized `<fetch_module_directory>/<fetch_module_filename>`.
    pub fn fetch_module_path(&self) -> String {
        crate::naming::join_clean(&self.fetch_module_directory, &self.fetch_module_filename)
    }
}

/// Only the literal `"true"` turns a flag on.
fn flag(params: &BTreeMap<String, String>, key: &str) -> bool {
    params.get(key).map(|v| v == "true").unwrap_or(false)
}

fn non_empty(params: &BTreeMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Split protoc's `parameter` string. Bare keys map to `""`; later
/// duplicates win.
pub fn parse_parameter(parameter: &str) -> BTreeMap<String, String> {
    parameter
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}

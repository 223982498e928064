//! Configuration file loading for vellum.
//!
//! Reads `vellum.config.json` from a project directory. The file only
//! carries compiler settings today.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vellum_atelier::CompilerOptions;

pub const CONFIG_FILE_NAME: &str = "vellum.config.json";

/// Top-level vellum configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VellumConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<std::string::String>,

    /// Template compiler settings.
    #[serde(default)]
    pub compiler: CompilerOptions,
}

/// Load `vellum.config.json` from the given directory (or CWD if None).
///
/// A missing file gives the defaults. A file that cannot be read or parsed
/// is reported with a warning and also gives the defaults.
pub fn load_config(dir: Option<&Path>) -> VellumConfig {
    let base = dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config_path = base.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return VellumConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(path = %config_path.display(), %error, "failed to parse config");
                VellumConfig::default()
            }
        },
        Err(error) => {
            tracing::warn!(path = %config_path.display(), %error, "failed to read config");
            VellumConfig::default()
        }
    }
}

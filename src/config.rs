use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Placeholder token accepted in `configPath`, substituted with the first
/// workspace root.
pub const WORKSPACE_FOLDER_TOKEN: &str = "${workspaceFolder}";

/// Conventional config file names probed in the first workspace root when no
/// explicit `configPath` is set. First existing file wins.
pub const CONFIG_FILE_CANDIDATES: [&str; 4] = [
    ".php-cs-fixer.php",
    ".php-cs-fixer.dist.php",
    ".php-cs.php",
    ".php-cs.dist.php",
];

/// Process-wide settings, hot-reloadable via `workspace/didChangeConfiguration`.
///
/// The wire format is camelCase, matching the `advancedPhpCsFixer.*`
/// configuration section of the editor client.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Run dry-run checks on open/change/save and publish diagnostics
    pub enable_diagnostics: bool,
    /// Serve textDocument/formatting requests
    pub enable_formatting: bool,
    /// Path or name of the php-cs-fixer executable
    pub executable_path: String,
    /// Explicit config file path; empty means auto-discovery
    pub config_path: String,
    /// Pass `--allow-risky=yes` to the fixer
    pub allow_risky: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_diagnostics: true,
            enable_formatting: true,
            executable_path: "php-cs-fixer".to_string(),
            config_path: String::new(),
            allow_risky: false,
        }
    }
}

impl Settings {
    /// Deserialize a settings payload.
    ///
    /// Clients send either the bare settings object or the object nested under
    /// an `advancedPhpCsFixer` key (VS Code sends the whole configuration
    /// tree). Unknown fields are ignored; a payload that does not decode at
    /// all falls back to defaults.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let section = value.get("advancedPhpCsFixer").unwrap_or(value);
        match serde_json::from_value(section.clone()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to decode settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Resolve the config file to pass via `--config`, if any.
    ///
    /// An explicit `configPath` wins, with `${workspaceFolder}` substituted
    /// against the first workspace root. Otherwise the conventional file names
    /// are probed in the workspace root; none found means no `--config` flag.
    pub fn resolve_config_path(&self, workspace_root: Option<&Path>) -> Option<PathBuf> {
        if !self.config_path.is_empty() {
            let resolved = match workspace_root {
                Some(root) => self
                    .config_path
                    .replace(WORKSPACE_FOLDER_TOKEN, &root.to_string_lossy()),
                None => self.config_path.clone(),
            };
            return Some(PathBuf::from(resolved));
        }

        let root = workspace_root?;
        CONFIG_FILE_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|candidate| candidate.exists())
    }
}

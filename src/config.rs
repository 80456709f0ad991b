//! Engine configuration.
//!
//! A small JSON file the host may provide; every field has a default and any
//! load failure falls back to defaults with a warning, matching the
//! "degrade, never fail" posture of the rest of the crate.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default cap on how many trailing characters of the pre-caret text the
/// scanner inspects per keystroke.
pub const DEFAULT_MAX_SCAN_LEN: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scan window: trigger prefixes further back than this many characters
    /// before the caret are not considered.
    #[serde(default = "default_max_scan_len", rename = "maxScanLen")]
    pub max_scan_len: usize,
    /// When true (default), a matched `#`-prefixed trigger is forwarded to
    /// the popup collaborator; when false it is replaced in place like a
    /// `/`-prefixed one.
    #[serde(default = "default_popup_triggers", rename = "popupTriggers")]
    pub popup_triggers: bool,
}

fn default_max_scan_len() -> usize {
    DEFAULT_MAX_SCAN_LEN
}

fn default_popup_triggers() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_scan_len: DEFAULT_MAX_SCAN_LEN,
            popup_triggers: true,
        }
    }
}

/// Loads the config from a JSON file, falling back to defaults if the file
/// is missing or malformed.
pub fn load_config(path: &Path) -> EngineConfig {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return EngineConfig::default();
    }

    match std::fs::read_to_string(path) {
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to read config, using defaults");
            EngineConfig::default()
        }
        Ok(raw) => match serde_json::from_str::<EngineConfig>(raw.trim()) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to parse config, using defaults");
                EngineConfig::default()
            }
        },
    }
}

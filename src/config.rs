//! Packing options and their discovery from a JSON configuration file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "pack.config.json";

/// Options recognised by the packer. Unknown keys are ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackOptions {
    /// Wrap JavaScript output in a UMD registration shell.
    pub umd: bool,
    /// Append an inline source map to JavaScript output.
    pub development: bool,
}

impl PackOptions {
    /// Attempt to load options from `pack.config.json` in the provided directory.
    ///
    /// A missing or malformed file yields the defaults.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read options from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Enable or disable the UMD wrapper.
    pub fn with_umd(mut self, umd: bool) -> Self {
        self.umd = umd;
        self
    }

    /// Enable or disable the inline source map.
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }
}

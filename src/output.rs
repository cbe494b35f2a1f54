//! Writing packed artifacts to their destination.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Write `text` to `path`, creating missing parent directories.
pub fn write_bundle(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

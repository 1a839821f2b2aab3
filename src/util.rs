use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::patch_key::PatchKey;

#[derive(Debug, Clone)]
pub struct ToggleEntry {
    pub key: PatchKey,
    pub full_path: PathBuf,
}

/// Read a whole file.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Overwrite a file with `data`, creating parent directories first.
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, data).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Collect every `<key>.txt` file directly inside `dir`, sorted by key.
/// Files whose stem does not parse as a key are skipped.
pub fn walk_toggle_files(dir: &Path) -> Result<Vec<ToggleEntry>> {
    let mut entries = Vec::new();
    if !dir.is_dir() {
        return Ok(entries);
    }

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }

        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(PatchKey::parse);
        match key {
            Some(key) => entries.push(ToggleEntry {
                key,
                full_path: path.to_path_buf(),
            }),
            None => log::debug!("Skipping non-key file {}", path.display()),
        }
    }

    entries.sort_by_key(|e| e.key);
    Ok(entries)
}

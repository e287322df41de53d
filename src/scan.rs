//! Base directory loading.
//!
//! Every pass starts here: the base directory is read one level deep and each
//! hook folder's Readme becomes an [`Item`].
//!
//! ## Directory Structure
//!
//! ```text
//! base/
//! ├── .categories.csv          # Registry (hidden, not a hook)
//! ├── __pycache__/             # Private folder, skipped
//! ├── 000/
//! │   ├── Readme.md            # Title line + body
//! │   └── img/capa.png         # Cover referenced from the body
//! ├── 001/
//! │   └── Readme.md
//! └── 002/                     # No Readme: skipped
//! ```
//!
//! ## Rules
//!
//! - Only immediate subdirectories count; nothing deeper is scanned.
//! - Folders starting with `.` or `__` are never hooks.
//! - A folder without the configured Readme is silently skipped.
//! - Items come back sorted by hook name.
//! - [`load_items`] normalizes the Readme on disk (see [`Item::load`]);
//!   [`read_items`] leaves every file untouched.

use crate::item::Item;
use crate::title::TitleFormat;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("base directory not found: {0}")]
    MissingBase(PathBuf),
}

/// Load every hook under `base`, normalizing Readmes on disk.
pub fn load_items(base: &Path, readme: &str, format: &TitleFormat) -> Result<Vec<Item>, ScanError> {
    collect(base, readme, |path| Item::load(path, format))
}

/// Read every hook under `base` without writing to any file.
pub fn read_items(base: &Path, readme: &str, format: &TitleFormat) -> Result<Vec<Item>, ScanError> {
    collect(base, readme, |path| Item::read(path, format))
}

fn collect(
    base: &Path,
    readme: &str,
    mut open: impl FnMut(&Path) -> io::Result<Item>,
) -> Result<Vec<Item>, ScanError> {
    if !base.is_dir() {
        return Err(ScanError::MissingBase(base.to_path_buf()));
    }

    let mut items = Vec::new();
    for dir in hook_dirs(base)? {
        let path = dir.join(readme);
        if !path.is_file() {
            log::debug!("skipping {}: no {readme}", dir.display());
            continue;
        }
        items.push(open(&path)?);
    }
    items.sort_by(|a, b| a.hook.cmp(&b.hook));
    log::info!("loaded {} items from {}", items.len(), base.display());
    Ok(items)
}

fn hook_dirs(base: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(base)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            !name.starts_with('.') && !name.starts_with("__")
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Covers whose file is missing, logged as warnings.
///
/// Returns `(hook, cover path)` pairs in item order.
pub fn check_covers(items: &[Item]) -> Vec<(String, PathBuf)> {
    let mut missing = Vec::new();
    for item in items {
        if let Some(cover) = item.cover_path()
            && !cover.is_file()
        {
            log::warn!("{}: cover {} not found", item.hook, cover.display());
            missing.push((item.hook.clone(), cover));
        }
    }
    missing
}

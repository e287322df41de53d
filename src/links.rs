//! Per-item link files.
//!
//! Writes one `<title>.md` per item into a directory, each holding a single
//! relative link to the item's Readme. Browsing that directory gives an
//! alphabetical listing of hooks by title.
//!
//! Markdown files already in the directory are removed first so renamed
//! items do not leave stale links behind.

use crate::item::Item;
use crate::naming;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name for an item's link: its title, or the hook when untitled.
pub fn link_name(item: &Item) -> String {
    let title = item.title.title.trim();
    let stem = if title.is_empty() { item.hook.as_str() } else { title };
    format!("{}.md", stem.replace(['/', '\\'], "-"))
}

/// Write all link files into `dir`, returning the paths written.
pub fn write_links(items: &[Item], dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "md") {
            fs::remove_file(&path)?;
        }
    }

    let mut written = Vec::new();
    for item in items {
        let path = dir.join(link_name(item));
        if written.contains(&path) {
            log::warn!("{}: link {} already written, overwriting", item.hook, path.display());
        }
        fs::write(&path, format!("[LINK]({})\n", naming::directions(&path, &item.path())))?;
        written.push(path);
    }
    Ok(written)
}

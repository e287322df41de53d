//! Modification-time change detection.
//!
//! Generated files (boards, indexes, views) only need rewriting when one of
//! their sources changed after they were last written. Freshness is decided by
//! mtime alone; content is never hashed.
//!
//! For a directory the relevant time is the newest mtime of any *file* below
//! it, so touching a Readme three levels deep marks the whole tree as changed.
//! Hidden files count too: the category registry, the base-level config and
//! cover thumbnails all live under dot names and all feed generated output.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Last modification time of a file, or of the newest file under a directory.
///
/// A directory with no files reports its own mtime.
pub fn last_update(path: &Path) -> io::Result<SystemTime> {
    let meta = fs::metadata(path)?;
    if !meta.is_dir() {
        return meta.modified();
    }

    let mut newest: Option<SystemTime> = None;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = entry.metadata().map_err(io::Error::other)?.modified()?;
        if newest.is_none_or(|n| modified > n) {
            newest = Some(modified);
        }
    }
    match newest {
        Some(time) => Ok(time),
        None => meta.modified(),
    }
}

/// Whether `derived` is missing or older than `source`.
pub fn needs_rebuild(source: &Path, derived: &Path) -> io::Result<bool> {
    if !derived.exists() {
        return Ok(true);
    }
    Ok(last_update(source)? > last_update(derived)?)
}

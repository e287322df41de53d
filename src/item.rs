//! One hook Readme: parsed title, body and location.
//!
//! An item lives at `<base>/<hook>/<filename>`:
//!
//! ```text
//! arcade/base/000/Readme.md
//! └─ base ──┘ └┬┘ └──┬────┘
//!             hook  filename
//! ```
//!
//! The first line of the file is the title line (see [`crate::title`]); the
//! rest is the body, kept verbatim. The cover image is the first markdown
//! image in the body whose target has no `:` (so remote URLs never count).
//! Images in the title line itself are never covers.

use crate::naming;
use crate::title::{Title, TitleFormat};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static COVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\(([^:]*?)\)").unwrap());

/// Title line used when a Readme is empty.
const PLACEHOLDER_TITLE: &str = "# Empty";

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Directory holding the hook folder.
    pub base: PathBuf,
    /// Hook folder name, unique within a base.
    pub hook: String,
    pub filename: String,
    pub title: Title,
    #[serde(skip)]
    pub body: String,
    /// Cover image path relative to the hook folder.
    pub cover: Option<String>,
    fulltitle: String,
}

impl Item {
    /// Build an item from file text without touching the disk.
    pub fn new(path: &Path, text: &str, format: &TitleFormat) -> Self {
        let path = naming::normalize(path);
        let filename = file_name(&path);
        let hook_dir = path.parent().unwrap_or(Path::new(""));
        let hook = file_name(hook_dir);
        let base = match hook_dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (first_line, body) = match text.split_once('\n') {
            Some((line, rest)) => (line, rest),
            None => (text, ""),
        };
        let title = format.parse(first_line);
        let fulltitle = format.assemble(&title);

        Self {
            base,
            hook,
            filename,
            title,
            body: body.to_string(),
            cover: find_cover(body),
            fulltitle,
        }
    }

    /// Read an item from disk, normalizing the file first.
    ///
    /// The file is rewritten only when normalization changed it.
    pub fn load(path: &Path, format: &TitleFormat) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if raw.is_empty() {
            log::warn!("filling empty file {}", path.display());
        }
        let text = normalize_text(&raw);
        if text != raw {
            fs::write(path, &text)?;
        }
        Ok(Self::new(path, &text, format))
    }

    /// Read an item without writing anything; normalization stays in memory.
    pub fn read(path: &Path, format: &TitleFormat) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::new(path, &normalize_text(&raw), format))
    }

    /// Write the canonical title line and the body back to disk.
    pub fn save(&self) -> io::Result<()> {
        fs::write(self.path(), format!("{}\n{}", self.fulltitle, self.body))
    }

    /// Replace the title, refreshing the assembled title line.
    pub fn retitle(&mut self, title: Title, format: &TitleFormat) {
        self.fulltitle = format.assemble(&title);
        self.title = title;
    }

    /// The assembled title line, level and all markers included.
    pub fn fulltitle(&self) -> &str {
        &self.fulltitle
    }

    pub fn hook_dir(&self) -> PathBuf {
        self.base.join(&self.hook)
    }

    pub fn path(&self) -> PathBuf {
        naming::normalize(&self.hook_dir().join(&self.filename))
    }

    pub fn cover_path(&self) -> Option<PathBuf> {
        self.cover
            .as_ref()
            .map(|c| naming::normalize(&self.hook_dir().join(c)))
    }

    /// Hidden sibling of the cover (`img/.cover.jpg`) where thumbnails live.
    pub fn thumb_path(&self) -> Option<PathBuf> {
        let cover = self.cover_path()?;
        let name = cover.file_name()?.to_string_lossy().to_string();
        Some(cover.with_file_name(format!(".{name}")))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.base.display(), self.hook, self.filename)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// First local image referenced in `body`.
pub fn find_cover(body: &str) -> Option<String> {
    COVER_RE.captures(body).map(|caps| {
        naming::normalize(Path::new(&caps[2]))
            .to_string_lossy()
            .to_string()
    })
}

/// Canonical on-disk shape of a Readme.
///
/// Line endings become `\n`, an empty file gets a placeholder title line and
/// a blank body, and a lone title line gets its missing newline.
pub fn normalize_text(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n");
    if text.is_empty() {
        text = format!("{PLACEHOLDER_TITLE}\n\n");
    } else if !text.contains('\n') {
        text.push('\n');
    }
    text
}

//! Board: a flat text file for reviewing and bulk-editing titles.
//!
//! One line per item, three columns separated by ` : `:
//!
//! ```text
//! [](../base/001/Readme.md) : ## Busca binaria cat:vetor #recursao date:2021-03-02 : versao iterativa
//! [](../base/000/Readme.md) : ## Soma de vetores cat:vetor #loop author:ana         :
//! ```
//!
//! The link points at the item's Readme relative to the board's own
//! directory. The middle column is the assembled title line without the
//! subtitle, the last one is the subtitle text. Link and title columns are
//! padded so the separators line up.
//!
//! ## Editing
//!
//! After editing titles in the board, [`update_from_board`] re-reads it,
//! finds every line whose columns differ from the item's own rendering and
//! retitles and saves those items. Reading back an untouched board finds no
//! updates.
//!
//! ## Escaping
//!
//! A `:` at the start of a column or after a space is written as `\:`, and a
//! backslash as `\\`, so the ` : ` separators are the only unescaped ones:
//!
//! ```text
//! [](../base/000/Readme.md) : ## Soma \: parte #loop : Parte 1 \: vetores
//! ```
//!
//! When reading, the link ends at the first ` : ` and the subtitle starts
//! after the last unescaped ` :`.
//!
//! Links are matched against items after anchoring both at the working
//! directory, so a relative board still finds items of an absolute base.

use crate::item::Item;
use crate::naming;
use crate::sort::{self, Field};
use crate::title::{Part, TitleFormat};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed board line.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLine {
    /// Item file the link resolves to, relative to where the board lives.
    pub path: PathBuf,
    pub fulltitle: String,
    pub subtitle: String,
}

/// A board line that disagrees with its item.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Position of the item in the slice the update was computed against.
    pub index: usize,
    pub fulltitle: String,
    pub subtitle: String,
}

/// The title and subtitle columns of an item.
pub fn columns(item: &Item, format: &TitleFormat) -> (String, String) {
    let order = format.order.without(Part::Subtitle);
    let fulltitle = item.title.assemble(&format.symbols, &order);
    let subtitle = item.title.subtitle.clone().unwrap_or_default();
    (fulltitle, subtitle)
}

/// Escape a column so it holds no bare ` :`.
fn escape(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut prev = ' ';
    for c in column.chars() {
        if c == '\\' || (c == ':' && prev == ' ') {
            out.push('\\');
        }
        out.push(c);
        prev = c;
    }
    out
}

fn unescape(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut chars = column.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

/// Render the board text for `items`, in the given order.
pub fn render(items: &[&Item], board_file: &Path, format: &TitleFormat) -> String {
    let rows: Vec<(String, String, String)> = items
        .iter()
        .map(|item| {
            let link = format!("[]({})", naming::directions(board_file, &item.path()));
            let (fulltitle, subtitle) = columns(item, format);
            (link, escape(&fulltitle), escape(&subtitle))
        })
        .collect();

    let link_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0);
    let title_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (link, fulltitle, subtitle) in rows {
        let line = format!("{link:<link_width$} : {fulltitle:<title_width$} : {subtitle}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Parse one line, `None` when it is malformed.
fn parse_line(line: &str, board_dir: &Path) -> Option<BoardLine> {
    let (link, rest) = line.split_once(" : ")?;
    let target = link.trim().strip_prefix("[](")?.strip_suffix(')')?;
    if target.is_empty() {
        return None;
    }
    let (fulltitle, subtitle) = rest.rsplit_once(" :").unwrap_or((rest, ""));
    Some(BoardLine {
        path: naming::normalize(&board_dir.join(target)),
        fulltitle: unescape(fulltitle.trim()),
        subtitle: unescape(subtitle.trim()),
    })
}

/// Parse board text written at `board_file`.
///
/// Blank lines are skipped; malformed lines are logged and skipped.
pub fn parse(text: &str, board_file: &Path) -> Vec<BoardLine> {
    let board_dir = board_file.parent().unwrap_or(Path::new(""));
    let mut lines = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        match parse_line(raw, board_dir) {
            Some(line) => lines.push(line),
            None => log::warn!("{}:{}: malformed board line", board_file.display(), n + 1),
        }
    }
    lines
}

/// Lines whose columns differ from the matching item.
///
/// Lines pointing at no known item are logged and ignored.
pub fn pending_updates(lines: &[BoardLine], items: &[Item], format: &TitleFormat) -> Vec<Update> {
    let paths: Vec<PathBuf> = items.iter().map(|i| naming::absolute(&i.path())).collect();
    let mut updates = Vec::new();
    for line in lines {
        let target = naming::absolute(&line.path);
        let Some(index) = paths.iter().position(|p| *p == target) else {
            log::warn!("board entry {} matches no item", line.path.display());
            continue;
        };
        let (fulltitle, subtitle) = columns(&items[index], format);
        if fulltitle != line.fulltitle || subtitle != line.subtitle {
            updates.push(Update {
                index,
                fulltitle: line.fulltitle.clone(),
                subtitle: line.subtitle.clone(),
            });
        }
    }
    updates
}

/// Retitle items from their updates. The caller saves them.
pub fn apply_updates(items: &mut [Item], updates: &[Update], format: &TitleFormat) {
    for update in updates {
        let line = match format.subtitle_marker() {
            Some(marker) if !update.subtitle.is_empty() => {
                format!("{} {marker} {}", update.fulltitle, update.subtitle)
            }
            _ => update.fulltitle.clone(),
        };
        let item = &mut items[update.index];
        log::info!("{}: {} -> {line}", item.hook, item.fulltitle());
        item.retitle(format.parse(&line), format);
    }
}

/// Apply the edits in `board_file` to `items` and save the changed ones.
///
/// Returns the hooks that changed. A missing board changes nothing.
pub fn update_from_board(
    items: &mut [Item],
    board_file: &Path,
    format: &TitleFormat,
) -> Result<Vec<String>, BoardError> {
    if !board_file.is_file() {
        log::warn!("board {} not found, nothing to apply", board_file.display());
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(board_file)?;
    let lines = parse(&text, board_file);
    let updates = pending_updates(&lines, items, format);
    apply_updates(items, &updates, format);

    let mut changed = Vec::new();
    for update in &updates {
        let item = &items[update.index];
        item.save()?;
        changed.push(item.hook.clone());
    }
    Ok(changed)
}

/// Write the board for `items`, ordered by `sort_by`.
pub fn write_board(
    items: &[Item],
    board_file: &Path,
    sort_by: &[Field],
    format: &TitleFormat,
) -> Result<(), BoardError> {
    let sorted = sort::sort_by_keys(items, sort_by, false);
    if let Some(parent) = board_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(board_file, render(&sorted, board_file, format))?;
    Ok(())
}

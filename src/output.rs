//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each item leads with
//! its hook and title; the source path and parsed fields follow as indented
//! context lines. Generated files are listed by generator name with the path
//! written.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Items (2)
//! 000 Soma de vetores
//!     Source: base/000/Readme.md
//!     Fields: l[##] T[Soma de vetores] c[vetor] t[loop] a[ana]
//!     Cover: img/capa.png
//! 001 Busca binaria
//!     Source: base/001/Readme.md
//!     Fields: l[##] T[Busca binaria] s[versao iterativa] c[vetor] t[recursao] d[2021-03-02]
//! ```
//!
//! ## Build
//!
//! ```text
//! Updated from board
//!     003 ## Fatorial recursivo #recursao #loop
//!
//! board → .indexer/board.md
//! index → .indexer/cat_index.md (up to date)
//! summary (disabled)
//!
//! 5 items
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::categories::Registry;
use crate::item::Item;
use crate::pipeline::{BuildReport, Outcome, Status};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Path shown relative to `root` when it lives below it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

/// Item header: hook then title, `(untitled)` when the title is empty.
fn item_header(item: &Item) -> String {
    if item.title.title.is_empty() {
        format!("{} (untitled)", item.hook)
    } else {
        format!("{} {}", item.hook, item.title.title)
    }
}

fn outcome_line(outcome: &Outcome, root: &Path) -> String {
    let path = outcome
        .path
        .as_deref()
        .map(|p| display_path(p, root))
        .unwrap_or_default();
    match outcome.status {
        Status::Written => format!("{} → {}", outcome.name, path),
        Status::UpToDate => format!("{} → {} (up to date)", outcome.name, path),
        Status::Disabled => format!("{} (disabled)", outcome.name),
    }
}

// ============================================================================
// Scan / check
// ============================================================================

/// Format the parsed items of a base.
pub fn format_scan_output(items: &[Item], root: &Path) -> Vec<String> {
    let mut lines = vec![format!("Items ({})", items.len())];
    for item in items {
        lines.push(item_header(item));
        lines.push(format!("    Source: {}", display_path(&item.path(), root)));
        let fields = item.title.describe();
        if !fields.is_empty() {
            lines.push(format!("    Fields: {fields}"));
        }
        if let Some(cover) = &item.cover {
            lines.push(format!("    Cover: {cover}"));
        }
    }
    lines
}

pub fn print_scan_output(items: &[Item], root: &Path) {
    for line in format_scan_output(items, root) {
        println!("{}", line);
    }
}

/// Format the result of a dry run over the base.
pub fn format_check_output(items: &[Item], missing_covers: &[(String, std::path::PathBuf)]) -> Vec<String> {
    let untitled: Vec<&str> = items
        .iter()
        .filter(|i| i.title.title.is_empty())
        .map(|i| i.hook.as_str())
        .collect();

    let mut lines = vec![format!("{} items parsed", items.len())];
    if !untitled.is_empty() {
        lines.push(format!("Untitled: {}", untitled.join(" ")));
    }
    if !missing_covers.is_empty() {
        lines.push("Missing covers".to_string());
        for (hook, cover) in missing_covers {
            lines.push(format!("    {hook} {}", cover.display()));
        }
    }
    if untitled.is_empty() && missing_covers.is_empty() {
        lines.push("No problems found".to_string());
    }
    lines
}

pub fn print_check_output(items: &[Item], missing_covers: &[(String, std::path::PathBuf)]) {
    for line in format_check_output(items, missing_covers) {
        println!("{}", line);
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Format board edits applied to Readmes.
pub fn format_updates(items: &[Item], updated: &[String]) -> Vec<String> {
    if updated.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Updated from board".to_string()];
    for hook in updated {
        match items.iter().find(|i| &i.hook == hook) {
            Some(item) => lines.push(format!("    {} {}", hook, item.fulltitle())),
            None => lines.push(format!("    {hook}")),
        }
    }
    lines
}

/// Format generator outcomes, one per line.
pub fn format_outcomes(outcomes: &[Outcome], root: &Path) -> Vec<String> {
    outcomes.iter().map(|o| outcome_line(o, root)).collect()
}

pub fn print_outcomes(outcomes: &[Outcome], root: &Path) {
    for line in format_outcomes(outcomes, root) {
        println!("{}", line);
    }
}

/// Format a full build: board edits, outputs, item count.
pub fn format_build_output(report: &BuildReport, items: &[Item], root: &Path) -> Vec<String> {
    let mut lines = format_updates(items, &report.updated);
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(format_outcomes(&report.outcomes, root));
    lines.push(String::new());
    lines.push(format!("{} items", report.items));
    lines
}

pub fn print_build_output(report: &BuildReport, items: &[Item], root: &Path) {
    for line in format_build_output(report, items, root) {
        println!("{}", line);
    }
}

/// Format the category registry as an aligned table.
pub fn format_categories(registry: &Registry) -> Vec<String> {
    let rows = registry.rows();
    let width = rows.iter().map(|c| c.key.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|c| format!("{:>4} {:<width$} {}", c.count, c.key, c.label))
        .collect()
}

pub fn print_categories(registry: &Registry) {
    for line in format_categories(registry) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

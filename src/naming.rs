//! Path and label helpers shared by every generator.
//!
//! Generated markdown files link back into the base with *relative* paths so
//! the links work both on disk and on a git forge. All path handling here is
//! lexical: nothing touches the filesystem, so links can be computed for
//! files that do not exist yet. The one exception is [`absolute`], which reads
//! the working directory.
//!
//! - [`normalize`]: collapse `.` and `name/..` components.
//! - [`absolute`]: anchor a path at the working directory, then normalize.
//! - [`directions`]: relative path from one file to another.
//! - [`md_anchor`]: the anchor a markdown renderer gives a heading.
//! - [`key_filter`]: display label for numbered keys (`01_Loops` → `Loops`).

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// `./a/b/../c` → `a/c`. Leading `..` components that cannot be resolved are
/// kept. An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// `path` made absolute against the working directory and normalized.
///
/// Falls back to the normalized input when the working directory cannot be
/// read.
pub fn absolute(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(abs) => normalize(&abs),
        Err(_) => normalize(path),
    }
}

fn parts(path: &Path) -> Vec<String> {
    normalize(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect()
}

/// Relative path from the directory of `from_file` to `to`, `/`-separated.
///
/// ```text
/// directions("folder1/folder2/one.md", "folder1/two.md") == "../two.md"
/// directions("board.md", "base/000/Readme.md")           == "base/000/Readme.md"
/// ```
///
/// When one path is absolute and the other relative, or the source directory
/// climbs out with `..` where the target does not, both are anchored at the
/// working directory first.
pub fn directions(from_file: &Path, to: &Path) -> String {
    if from_file.is_absolute() != to.is_absolute() || climbs_out(from_file, to) {
        return relative(&absolute(from_file), &absolute(to));
    }
    relative(from_file, to)
}

fn split_common(from_file: &Path, to: &Path) -> (Vec<String>, Vec<String>, usize) {
    let mut from_dir = parts(from_file);
    from_dir.pop();
    let to = parts(to);
    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    (from_dir, to, common)
}

/// Whether the source directory leaves through a `..` the target does not share.
fn climbs_out(from_file: &Path, to: &Path) -> bool {
    let (from_dir, _, common) = split_common(from_file, to);
    from_dir[common..].iter().any(|c| c == "..")
}

fn relative(from_file: &Path, to: &Path) -> String {
    let (from_dir, to, common) = split_common(from_file, to);
    let mut out: Vec<&str> = vec![".."; from_dir.len() - common];
    out.extend(to[common..].iter().map(String::as_str));
    out.join("/")
}

/// Anchor generated for a markdown heading.
///
/// Leading `#` and spaces are dropped, the text is lowercased, spaces and
/// dashes become `-`, underscores stay, other punctuation disappears.
pub fn md_anchor(heading: &str) -> String {
    let text = heading.trim_start_matches([' ', '#']).trim_end().to_lowercase();
    text.chars()
        .filter_map(|c| match c {
            ' ' | '-' => Some('-'),
            '_' => Some('_'),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Display label for a group key.
///
/// Underscores become spaces and a leading number word is dropped, so keys
/// can carry an ordering prefix without showing it:
/// - `"01_Teste_Infinito"` → `"Teste Infinito"`
/// - `"loops"` → `"loops"`
/// - `"2021"` → `""`
pub fn key_filter(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut words: Vec<&str> = spaced.split(' ').collect();
    if words.first().is_some_and(|w| w.parse::<i64>().is_ok()) {
        words.remove(0);
    }
    words.join(" ").trim().to_string()
}

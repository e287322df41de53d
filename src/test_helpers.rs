//! Shared test utilities for the hook-indexer test suite.
//!
//! Provides fixture setup, in-memory item builders and lookup helpers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let items = load_items(&tmp.path().join("base"), "Readme.md", &TitleFormat::default()).unwrap();
//! let soma = find_item(&items, "000");
//! assert_eq!(soma.title.title, "Soma de vetores");
//!
//! let items = items_from(&[("b/0/R.md", "## a #x"), ("b/1/R.md", "## b #y")]);
//! assert_eq!(hooks(&sort_by_keys(&items, &[Field::Title], true)), ["1", "0"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::item::Item;
use crate::title::TitleFormat;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` to a temp directory and return it.
///
/// The copy holds `base/` with five hooks (`000`-`004`), a folder without a
/// Readme, hidden and private folders, and a category registry.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// In-memory items
// =========================================================================

/// Build items from `(path, text)` pairs with the default title format.
pub fn items_from(entries: &[(&str, &str)]) -> Vec<Item> {
    let format = TitleFormat::default();
    entries
        .iter()
        .map(|(path, text)| Item::new(Path::new(path), text, &format))
        .collect()
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// Find an item by hook. Panics if not found.
pub fn find_item<'a>(items: &'a [Item], hook: &str) -> &'a Item {
    items.iter().find(|i| i.hook == hook).unwrap_or_else(|| {
        let all: Vec<&str> = items.iter().map(|i| i.hook.as_str()).collect();
        panic!("item '{hook}' not found. Available: {all:?}")
    })
}

/// Hooks of a list of item references, in order.
pub fn hooks<'a>(items: &[&'a Item]) -> Vec<&'a str> {
    items.iter().map(|i| i.hook.as_str()).collect()
}

//! Project configuration.
//!
//! Handles loading, validating, and merging `indexer.toml` files. Configuration
//! is layered: stock defaults are overridden by the project file, which is in
//! turn overridden by an optional file inside the base directory.
//!
//! ## Config File Location
//!
//! ```text
//! arcade/
//! ├── indexer.toml            # Project config (overrides stock defaults)
//! ├── .indexer/               # Generated files (board, index, view, links)
//! └── base/
//!     ├── .indexer.toml       # Base config (overrides project config)
//!     ├── .categories.csv     # Category registry
//!     ├── 000/Readme.md
//!     └── 001/Readme.md
//! ```
//!
//! Paths in the project file are relative to the directory holding it. The
//! base-level file may override everything except `base` itself.
//!
//! ## Partial Configuration
//!
//! Config files are sparse, override just the values you want:
//!
//! ```toml
//! [index.sorting]
//! group_by = "tags"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Output paths set to `""`
//! disable that generator.

use crate::naming;
use crate::sort::Field;
use crate::symbols::SymbolTable;
use crate::title::{FieldOrder, TitleFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default project config file name.
pub const CONFIG_FILE: &str = "indexer.toml";

/// Name of the optional config file inside the base directory.
pub const BASE_CONFIG_FILE: &str = ".indexer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Indexer configuration loaded from `indexer.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// Directory holding one folder per hook.
    pub base: String,
    /// File read inside each hook folder.
    pub readme: String,
    /// Category registry, relative to the base.
    pub categories: String,
    /// Field order used when writing title lines back.
    pub order: FieldOrder,
    pub symbols: SymbolTable,
    pub board: BoardConfig,
    pub index: IndexConfig,
    pub summary: SummaryConfig,
    pub view: ViewConfig,
    pub links: LinksConfig,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            base: "base".to_string(),
            readme: "Readme.md".to_string(),
            categories: ".categories.csv".to_string(),
            order: FieldOrder::default(),
            symbols: SymbolTable::default(),
            board: BoardConfig::default(),
            index: IndexConfig::default(),
            summary: SummaryConfig::default(),
            view: ViewConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl IndexerConfig {
    /// Validate values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base.trim().is_empty() {
            return Err(ConfigError::Validation("base must not be empty".into()));
        }
        if self.readme.trim().is_empty() {
            return Err(ConfigError::Validation("readme must not be empty".into()));
        }
        self.symbols.validate().map_err(ConfigError::Validation)?;
        if self.view.posts_per_row == 0 {
            return Err(ConfigError::Validation(
                "view.posts_per_row must be greater than zero".into(),
            ));
        }
        if self.board.sort_by.is_empty() {
            return Err(ConfigError::Validation(
                "board.sort_by must name at least one field".into(),
            ));
        }
        Ok(())
    }

    pub fn title_format(&self) -> TitleFormat {
        TitleFormat::new(self.symbols.clone(), self.order.clone())
    }
}

/// How a generator groups and orders items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sorting {
    pub group_by: Field,
    pub sort_by: Field,
    pub reverse: bool,
    /// Heading for items with no value in `group_by`.
    pub orphan: String,
}

impl Default for Sorting {
    fn default() -> Self {
        Self {
            group_by: Field::Categories,
            sort_by: Field::Fulltitle,
            reverse: false,
            orphan: "No category".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub path: String,
    /// Line order, most significant key first.
    pub sort_by: Vec<Field>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            path: ".indexer/board.md".to_string(),
            sort_by: vec![Field::Fulltitle],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub path: String,
    /// Markdown file copied verbatim to the top of the index.
    pub intro: String,
    /// Emit a `## Links` table of contents before the groups.
    pub insert_toc: bool,
    /// Prefix each entry with `@<hook>`.
    pub insert_hook: bool,
    /// Strip numeric ordering prefixes from group headings.
    pub key_filter: bool,
    pub sorting: Sorting,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: ".indexer/cat_index.md".to_string(),
            intro: String::new(),
            insert_toc: false,
            insert_hook: false,
            key_filter: false,
            sorting: Sorting::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    pub path: String,
    pub intro: String,
    pub sorting: Sorting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub path: String,
    pub intro: String,
    pub posts_per_row: usize,
    /// Image shown for items without a cover, relative to the project.
    pub empty_fig: String,
    pub key_filter: bool,
    pub sorting: Sorting,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            path: ".indexer/cat_view.md".to_string(),
            intro: String::new(),
            posts_per_row: 3,
            empty_fig: String::new(),
            key_filter: false,
            sorting: Sorting::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    pub dir: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            dir: ".indexer/links".to_string(),
        }
    }
}

/// A loaded configuration anchored at the directory it was read from.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory relative paths in the config resolve against.
    pub root: PathBuf,
    /// Resolved base directory.
    pub base: PathBuf,
    pub config: IndexerConfig,
}

impl Project {
    /// Resolve a configured path, `None` when it is empty (disabled).
    pub fn path(&self, configured: &str) -> Option<PathBuf> {
        if configured.trim().is_empty() {
            return None;
        }
        Some(naming::normalize(&self.root.join(configured)))
    }

    pub fn categories_path(&self) -> PathBuf {
        naming::normalize(&self.base.join(&self.config.categories))
    }

    pub fn title_format(&self) -> TitleFormat {
        self.config.title_format()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(IndexerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<IndexerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IndexerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the full layered configuration.
///
/// `config_file` is the project file (it may be missing; stock defaults then
/// apply). `base_override` replaces the configured base and is resolved
/// against the working directory, not the project. Root and base always come
/// back absolute. The base-level `.indexer.toml` is merged last
/// and must not set `base`.
pub fn load_config(config_file: &Path, base_override: Option<&Path>) -> Result<Project, ConfigError> {
    let root = match config_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => naming::absolute(p),
        _ => naming::absolute(Path::new(".")),
    };

    let project_layer = match load_raw_config(config_file)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => {
            log::debug!("no {} found, using stock defaults", config_file.display());
            stock_defaults_value()
        }
    };
    let project_config = resolve_config(project_layer.clone(), None)?;

    let base = match base_override {
        Some(dir) => naming::absolute(dir),
        None => naming::normalize(&root.join(&project_config.base)),
    };

    let base_overlay = load_raw_config(&base.join(BASE_CONFIG_FILE))?;
    if let Some(toml::Value::Table(table)) = &base_overlay
        && table.contains_key("base")
    {
        return Err(ConfigError::Validation(format!(
            "\"base\" cannot be set in {}",
            base.join(BASE_CONFIG_FILE).display()
        )));
    }
    let config = resolve_config(project_layer, base_overlay)?;

    Ok(Project { root, base, config })
}

/// Returns a fully-commented stock `indexer.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Hook Indexer Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Config files are layered:
#   indexer.toml           -> project (overrides stock defaults)
#   <base>/.indexer.toml   -> base (overrides project, cannot change `base`)
#
# Paths are relative to the directory holding this file.
# An output path set to "" disables that generator.
# Unknown keys will cause an error.
#
# Fields usable in `group_by` / `sort_by`:
#   hook, title, subtitle, fulltitle, level, tags, categories, authors,
#   date, filename

# Directory holding one folder per hook.
base = "base"

# File read inside each hook folder.
readme = "Readme.md"

# Category registry (count,key,label,description), relative to the base.
categories = ".categories.csv"

# Order fields are written back to title lines:
#   l level, T title, s subtitle, c categories, t tags, a authors, d date
# Letters left out are dropped from the files. `l` must come first.
order = "lTctads"

# ---------------------------------------------------------------------------
# Title markers (first marker of each field is the one written back)
# ---------------------------------------------------------------------------
[symbols]
tag = ["#"]
category = ["cat:", "©"]
date = ["date:", "ð"]
author = ["author:", "æ"]
subtitle = ["sub:", "ß"]

# ---------------------------------------------------------------------------
# Board: one editable line per hook
# ---------------------------------------------------------------------------
[board]
path = ".indexer/board.md"
sort_by = ["fulltitle"]

# ---------------------------------------------------------------------------
# Index: grouped list of links
# ---------------------------------------------------------------------------
[index]
path = ".indexer/cat_index.md"
# Markdown file copied to the top of the index.
intro = ""
insert_toc = false
insert_hook = false
# Turn "01_Loops" headings into "Loops".
key_filter = false

[index.sorting]
group_by = "categories"
sort_by = "fulltitle"
reverse = false
orphan = "No category"

# ---------------------------------------------------------------------------
# Summary: hooks per group
# ---------------------------------------------------------------------------
[summary]
path = ""
intro = ""

[summary.sorting]
group_by = "categories"
sort_by = "fulltitle"
reverse = false
orphan = "No category"

# ---------------------------------------------------------------------------
# View: markdown table of covers
# ---------------------------------------------------------------------------
[view]
path = ".indexer/cat_view.md"
intro = ""
posts_per_row = 3
# Image used for hooks without a cover.
empty_fig = ""
key_filter = false

[view.sorting]
group_by = "categories"
sort_by = "fulltitle"
reverse = false
orphan = "No category"

# ---------------------------------------------------------------------------
# Links: one file per hook pointing at its Readme
# ---------------------------------------------------------------------------
[links]
dir = ".indexer/links"
"##
}

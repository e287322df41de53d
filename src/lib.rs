//! # Hook Indexer
//!
//! Metadata engine for a directory of exercises ("hooks"). Every hook is a
//! folder under a *base* directory holding a Readme whose first line is a
//! structured title line:
//!
//! ```text
//! ## Busca binaria cat:vetor #recursao date:2021-03-02 sub: versao iterativa
//! ```
//!
//! The filesystem is the data source. The indexer parses those title lines,
//! rewrites them in canonical form, and derives markdown views of the whole
//! collection from them.
//!
//! # Architecture: Parse, Group, Generate
//!
//! ```text
//! 1. Scan      base/*/Readme.md  →  Vec<Item>         (title micro-syntax → records)
//! 2. Group     Vec<Item>         →  [(key, [&Item])]  (stable sort + fan-out grouping)
//! 3. Generate  groups            →  board, index, summary, view, links, categories
//! ```
//!
//! Rendering is pure: every generator turns items into a `String` and only
//! the [`pipeline`] layer touches the disk. Outputs are rewritten only when
//! something in the base changed after them.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`symbols`] | Field markers (`#`, `cat:`, `date:` ...) and their validation |
//! | [`title`] | Title line parser, canonical serializer, field order |
//! | [`item`] | One hook: title record, body, location, cover image |
//! | [`sort`] | Sort keys, stable multi-key sort, fan-out grouping |
//! | [`rebuild`] | mtime-based change detection |
//! | [`scan`] | Loads every hook of a base directory |
//! | [`board`] | Editable one-line-per-hook board and applying its edits back |
//! | [`categories`] | Category registry CSV with labels and counts |
//! | [`index`] | Markdown index and summary |
//! | [`view`] | Markdown table of covers |
//! | [`links`] | One link file per hook |
//! | [`naming`] | Path normalization, relative links, heading anchors |
//! | [`config`] | Layered `indexer.toml` loading and validation |
//! | [`pipeline`] | Runs each generator against a loaded project |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Empty Fields Are a Value
//!
//! A title without tags has the single tag [`title::EMPTY`] (`_`). Sorting and
//! grouping never deal with missing values: an untagged hook simply lands in
//! the `_` bucket, shown under the configured orphan heading.
//!
//! ## The Board Is the Editor
//!
//! Renaming fifty hooks one Readme at a time is tedious. The board lists every
//! title on one line next to a link to its Readme; edit the board, run
//! `board --set`, and the changed titles are parsed and written back in
//! canonical form.
//!
//! ## Config Layering (Stock → Project → Base)
//!
//! ```text
//! (stock defaults)
//! indexer.toml          ← project (overrides stock defaults)
//! base/.indexer.toml    ← base (overrides project)
//! ```
//!
//! An empty output path disables that generator.

pub mod board;
pub mod categories;
pub mod config;
pub mod index;
pub mod item;
pub mod links;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod rebuild;
pub mod scan;
pub mod sort;
pub mod symbols;
pub mod title;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;

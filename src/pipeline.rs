//! Command orchestration over a loaded [`Project`].
//!
//! Each function runs one generator end to end: resolve its configured
//! output, decide whether it is stale, render, write. The CLI calls these and
//! hands the returned [`Outcome`]s to [`crate::output`] for display.
//!
//! Generated files are only rewritten when the base changed after them (see
//! [`crate::rebuild`]) unless `force` is set. Boards and link files are cheap
//! and always rewritten.

use crate::board::{self, BoardError};
use crate::categories::{self, CategoryError, Registry};
use crate::config::Project;
use crate::index;
use crate::item::Item;
use crate::links;
use crate::naming;
use crate::rebuild;
use crate::scan::{self, ScanError};
use crate::view;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error("{0} has no output path configured")]
    Disabled(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Written,
    UpToDate,
    Disabled,
}

/// What happened to one generated output.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub name: &'static str,
    pub path: Option<PathBuf>,
    pub status: Status,
}

impl Outcome {
    fn written(name: &'static str, path: PathBuf) -> Self {
        Self { name, path: Some(path), status: Status::Written }
    }

    fn up_to_date(name: &'static str, path: PathBuf) -> Self {
        Self { name, path: Some(path), status: Status::UpToDate }
    }

    fn disabled(name: &'static str) -> Self {
        Self { name, path: None, status: Status::Disabled }
    }
}

/// Everything a full `build` pass did.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub items: usize,
    pub updated: Vec<String>,
    pub outcomes: Vec<Outcome>,
}

/// Load all items of the project and warn about missing covers.
pub fn load(project: &Project) -> Result<Vec<Item>, PipelineError> {
    let items = scan::load_items(&project.base, &project.config.readme, &project.title_format())?;
    scan::check_covers(&items);
    Ok(items)
}

fn is_stale(project: &Project, out: &Path, force: bool) -> Result<bool, PipelineError> {
    Ok(force || rebuild::needs_rebuild(&project.base, out)?)
}

fn read_intro(project: &Project, configured: &str) -> Result<String, PipelineError> {
    match project.path(configured) {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => Ok(String::new()),
    }
}

/// Write the board, applying its edits first when `set` is true.
///
/// Returns the hooks whose Readme was rewritten.
pub fn board(
    project: &Project,
    items: &mut [Item],
    file: Option<&Path>,
    set: bool,
) -> Result<(Vec<String>, Outcome), PipelineError> {
    let path = match file {
        Some(f) => naming::absolute(f),
        None => project
            .path(&project.config.board.path)
            .ok_or(PipelineError::Disabled("board"))?,
    };
    let format = project.title_format();
    let updated = if set {
        board::update_from_board(items, &path, &format)?
    } else {
        Vec::new()
    };
    board::write_board(items, &path, &project.config.board.sort_by, &format)?;
    Ok((updated, Outcome::written("board", path)))
}

/// Refresh the category registry.
pub fn categories(project: &Project, items: &[Item]) -> Result<Registry, PipelineError> {
    Ok(categories::refresh_registry(&project.categories_path(), items)?)
}

/// Write the index and, when configured, the summary.
pub fn index(
    project: &Project,
    items: &[Item],
    registry: Option<&Registry>,
    force: bool,
) -> Result<Vec<Outcome>, PipelineError> {
    let config = &project.config;
    let mut outcomes = Vec::new();

    match project.path(&config.index.path) {
        None => outcomes.push(Outcome::disabled("index")),
        Some(out) if !is_stale(project, &out, force)? => {
            outcomes.push(Outcome::up_to_date("index", out))
        }
        Some(out) => {
            let intro = read_intro(project, &config.index.intro)?;
            let text = index::render_index(items, &out, &config.index, &intro, registry);
            index::write_markdown(&out, &text)?;
            outcomes.push(Outcome::written("index", out));
        }
    }

    match project.path(&config.summary.path) {
        None => outcomes.push(Outcome::disabled("summary")),
        Some(out) if !is_stale(project, &out, force)? => {
            outcomes.push(Outcome::up_to_date("summary", out))
        }
        Some(out) => {
            let intro = read_intro(project, &config.summary.intro)?;
            index::write_markdown(&out, &index::render_summary(items, &config.summary, &intro))?;
            outcomes.push(Outcome::written("summary", out));
        }
    }
    Ok(outcomes)
}

/// Write the photo-board view.
pub fn view(
    project: &Project,
    items: &[Item],
    registry: Option<&Registry>,
    force: bool,
) -> Result<Outcome, PipelineError> {
    let config = &project.config.view;
    let Some(out) = project.path(&config.path) else {
        return Ok(Outcome::disabled("view"));
    };
    if !is_stale(project, &out, force)? {
        return Ok(Outcome::up_to_date("view", out));
    }
    let intro = read_intro(project, &config.intro)?;
    let empty_fig = project.path(&config.empty_fig);
    let text = view::render_view(items, &out, config, &intro, empty_fig.as_deref(), registry);
    index::write_markdown(&out, &text)?;
    Ok(Outcome::written("view", out))
}

/// Write the per-item link files.
pub fn links(project: &Project, items: &[Item]) -> Result<Outcome, PipelineError> {
    let Some(dir) = project.path(&project.config.links.dir) else {
        return Ok(Outcome::disabled("links"));
    };
    links::write_links(items, &dir)?;
    Ok(Outcome::written("links", dir))
}

/// Full pass over loaded items: board edits, categories, board, index,
/// summary, view, links.
pub fn build(project: &Project, items: &mut [Item], force: bool) -> Result<BuildReport, PipelineError> {
    let mut report = BuildReport {
        items: items.len(),
        ..BuildReport::default()
    };

    if project.path(&project.config.board.path).is_some() {
        let (updated, outcome) = board(project, items, None, true)?;
        report.updated = updated;
        report.outcomes.push(outcome);
    } else {
        report.outcomes.push(Outcome::disabled("board"));
    }

    let registry = categories(project, items)?;
    report
        .outcomes
        .push(Outcome::written("categories", project.categories_path()));
    report.outcomes.extend(index(project, items, Some(&registry), force)?);
    report.outcomes.push(view(project, items, Some(&registry), force)?);
    report.outcomes.push(links(project, items)?);
    Ok(report)
}

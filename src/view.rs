//! Photo-board view: covers laid out in markdown tables.
//!
//! Each group becomes a heading followed by tables of `posts_per_row` cells.
//! A table row pair shows the cover images, linked to the items, over their
//! captions:
//!
//! ```text
//! ## vetor
//!
//! [![](../base/000/img/.capa.png)](../base/000/Readme.md#soma)|[![](../base/001/img/c.png)](...)|-
//! -|-|-
//! @000<br>Soma|@2021-03-02<br>Busca|*
//! ```
//!
//! The image of a cell is the first of: the thumbnail (hidden `.name`
//! sibling of the cover), the cover itself, the configured `empty_fig`.
//! Without any of them the cell is a bare `-`. The last row is padded with
//! filler cells.

use crate::categories::Registry;
use crate::config::ViewConfig;
use crate::index::{group_heading, item_link};
use crate::item::Item;
use crate::naming;
use crate::sort;
use std::path::Path;

struct Cell {
    image: String,
    caption: String,
}

fn item_cell(item: &Item, out_file: &Path, empty_fig: Option<&Path>) -> Cell {
    let picture = item
        .thumb_path()
        .filter(|p| p.is_file())
        .or_else(|| item.cover_path().filter(|p| p.is_file()))
        .or_else(|| empty_fig.map(Path::to_path_buf));
    let image = match picture {
        Some(path) => format!(
            "[![]({})]({})",
            naming::directions(out_file, &path),
            item_link(out_file, item)
        ),
        None => "-".to_string(),
    };
    let stamp = item.title.date.as_deref().unwrap_or(&item.hook);
    Cell {
        image,
        caption: format!("@{stamp}<br>{}", item.title.title),
    }
}

fn filler(out_file: &Path, empty_fig: Option<&Path>) -> Cell {
    match empty_fig {
        Some(fig) => Cell {
            image: format!("![]({})", naming::directions(out_file, fig)),
            caption: " ".to_string(),
        },
        None => Cell {
            image: "-".to_string(),
            caption: "*".to_string(),
        },
    }
}

fn render_table(cells: &[Cell], per_row: usize) -> String {
    let mut out = String::new();
    for row in cells.chunks(per_row) {
        let images: Vec<&str> = row.iter().map(|c| c.image.as_str()).collect();
        let captions: Vec<&str> = row.iter().map(|c| c.caption.as_str()).collect();
        out.push_str(&images.join("|"));
        out.push('\n');
        out.push_str(&vec!["-"; row.len()].join("|"));
        out.push('\n');
        out.push_str(&captions.join("|"));
        out.push_str("\n\n");
    }
    out
}

/// Render the view text as it will be written to `out_file`.
///
/// `empty_fig` is the already resolved placeholder image, if any.
pub fn render_view(
    items: &[Item],
    out_file: &Path,
    config: &ViewConfig,
    intro: &str,
    empty_fig: Option<&Path>,
    registry: Option<&Registry>,
) -> String {
    let sorting = &config.sorting;
    let per_row = config.posts_per_row.max(1);
    let groups = sort::group_by(items, sorting.group_by, sorting.sort_by, sorting.reverse);

    let mut out = String::from(intro);
    for (key, members) in &groups {
        let heading = group_heading(key, sorting, registry, config.key_filter);
        out.push_str(&format!("\n## {heading}\n\n"));

        let mut cells: Vec<Cell> = members
            .iter()
            .map(|item| item_cell(item, out_file, empty_fig))
            .collect();
        while cells.len() % per_row != 0 {
            cells.push(filler(out_file, empty_fig));
        }
        out.push_str(&render_table(&cells, per_row));
    }
    out
}

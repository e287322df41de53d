//! Markdown index and summary generators.
//!
//! The index lists every item under a heading per group, each entry linking
//! straight to the item's title inside its Readme:
//!
//! ```text
//! ## Links
//! - [ed](#ed)
//! - [poo](#poo)
//!
//! ## ed
//!
//! - [@2 d teste 2](b/2/2.md#d-teste-2-ed)
//! ```
//!
//! The `## Links` table of contents and the `@hook` prefixes are optional.
//! The summary is the compact variant: one heading per group followed by the
//! hooks in it.

use crate::categories::Registry;
use crate::config::{IndexConfig, Sorting, SummaryConfig};
use crate::item::Item;
use crate::naming;
use crate::sort::{self, Field};
use crate::title::EMPTY;
use std::fs;
use std::io;
use std::path::Path;

/// Heading text for a group key.
///
/// The sentinel key shows the orphan label, category keys their registry
/// label, and `key_filter` strips numeric ordering prefixes.
pub fn group_heading(
    key: &str,
    sorting: &Sorting,
    registry: Option<&Registry>,
    key_filter: bool,
) -> String {
    if key == EMPTY {
        return sorting.orphan.clone();
    }
    let label = match (sorting.group_by, registry) {
        (Field::Categories, Some(reg)) => reg.label(key).unwrap_or(key),
        _ => key,
    };
    if key_filter {
        let filtered = naming::key_filter(label);
        if !filtered.is_empty() {
            return filtered;
        }
    }
    label.to_string()
}

/// Link from `out_file` to the item's title heading.
pub fn item_link(out_file: &Path, item: &Item) -> String {
    format!(
        "{}#{}",
        naming::directions(out_file, &item.path()),
        naming::md_anchor(item.fulltitle())
    )
}

/// Render the index text as it will be written to `out_file`.
pub fn render_index(
    items: &[Item],
    out_file: &Path,
    config: &IndexConfig,
    intro: &str,
    registry: Option<&Registry>,
) -> String {
    let sorting = &config.sorting;
    let groups = sort::group_by(items, sorting.group_by, sorting.sort_by, sorting.reverse);
    let headings: Vec<String> = groups
        .iter()
        .map(|(key, _)| group_heading(key, sorting, registry, config.key_filter))
        .collect();

    let mut out = String::from(intro);
    if config.insert_toc {
        out.push_str("\n## Links\n");
        for heading in &headings {
            out.push_str(&format!("- [{heading}](#{})\n", naming::md_anchor(heading)));
        }
    }
    for ((_, members), heading) in groups.iter().zip(&headings) {
        out.push_str(&format!("\n## {heading}\n\n"));
        for item in members {
            let label = if config.insert_hook {
                format!("@{} {}", item.hook, item.title.title)
            } else {
                item.title.title.clone()
            };
            out.push_str(&format!("- [{label}]({})\n", item_link(out_file, item)));
        }
    }
    out
}

/// Render the summary: each group heading followed by its hooks.
pub fn render_summary(items: &[Item], config: &SummaryConfig, intro: &str) -> String {
    let sorting = &config.sorting;
    let groups = sort::group_by(items, sorting.group_by, sorting.sort_by, sorting.reverse);
    let mut out = String::from(intro);
    for (key, members) in &groups {
        let heading = group_heading(key, sorting, None, false);
        let hooks: Vec<&str> = members.iter().map(|i| i.hook.as_str()).collect();
        out.push_str(&format!("\n## {heading}\n{}\n", hooks.join(" ")));
    }
    out
}

/// Write generated markdown, creating parent directories.
pub fn write_markdown(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::items_from;

    fn sample() -> Vec<Item> {
        items_from(&[
            ("b/0/0.md", "## a teste 0 #fup"),
            ("b/3/3.md", "## e teste 3 #poo"),
            ("b/1/1.md", "## c teste 1 #poo"),
            ("b/4/4.md", "## b teste 4 #poo"),
            ("b/2/2.md", "## d teste 2 #ed"),
            ("b/5/5.md", "## f teste 5 #ed"),
        ])
    }

    fn by_tag(sort_by: Field) -> IndexConfig {
        IndexConfig {
            sorting: Sorting {
                group_by: Field::Tags,
                sort_by,
                ..Sorting::default()
            },
            ..IndexConfig::default()
        }
    }

    #[test]
    fn index_with_toc_and_hooks() {
        let config = IndexConfig {
            insert_toc: true,
            insert_hook: true,
            ..by_tag(Field::Title)
        };
        let out = render_index(&sample(), Path::new("index.md"), &config, "", None);
        let expected = "
## Links
- [ed](#ed)
- [fup](#fup)
- [poo](#poo)

## ed

- [@2 d teste 2](b/2/2.md#d-teste-2-ed)
- [@5 f teste 5](b/5/5.md#f-teste-5-ed)

## fup

- [@0 a teste 0](b/0/0.md#a-teste-0-fup)

## poo

- [@4 b teste 4](b/4/4.md#b-teste-4-poo)
- [@1 c teste 1](b/1/1.md#c-teste-1-poo)
- [@3 e teste 3](b/3/3.md#e-teste-3-poo)
";
        assert_eq!(out, expected);
    }

    #[test]
    fn plain_index_starts_with_intro() {
        let out = render_index(
            &sample()[..1],
            Path::new("out/index.md"),
            &by_tag(Field::Hook),
            "# Exercicios\n",
            None,
        );
        assert_eq!(
            out,
            "# Exercicios\n\n## fup\n\n- [a teste 0](../b/0/0.md#a-teste-0-fup)\n"
        );
    }

    #[test]
    fn orphans_get_configured_heading() {
        let items = items_from(&[("b/0/0.md", "## solto")]);
        let mut config = by_tag(Field::Hook);
        config.sorting.orphan = "Sem tag".into();
        let out = render_index(&items, Path::new("index.md"), &config, "", None);
        assert!(out.contains("\n## Sem tag\n"));
    }

    #[test]
    fn category_headings_use_registry_labels() {
        let tmp = tempfile::TempDir::new().unwrap();
        let csv = tmp.path().join(".categories.csv");
        fs::write(&csv, "0,vetor,Vetores,\n").unwrap();
        let items = items_from(&[("b/0/0.md", "## x cat:vetor"), ("b/1/1.md", "## y cat:novo")]);
        let mut registry = Registry::load(&csv).unwrap();
        registry.refresh(&items);

        let config = IndexConfig::default();
        let labeled = render_index(&items, Path::new("index.md"), &config, "", Some(&registry));
        assert!(labeled.contains("\n## Vetores\n"));
        assert!(labeled.contains("\n## novo\n"));
        let raw = render_index(&items, Path::new("index.md"), &config, "", None);
        assert!(raw.contains("\n## vetor\n"));
    }

    #[test]
    fn key_filter_strips_number_prefix() {
        let sorting = Sorting {
            group_by: Field::Tags,
            ..Sorting::default()
        };
        assert_eq!(group_heading("01_Laços_simples", &sorting, None, true), "Laços simples");
        assert_eq!(group_heading("01_Laços_simples", &sorting, None, false), "01_Laços_simples");
        assert_eq!(group_heading("2021", &sorting, None, true), "2021");
        assert_eq!(group_heading(EMPTY, &sorting, None, true), "No category");
    }

    #[test]
    fn summary_lists_hooks_per_group() {
        let config = SummaryConfig {
            sorting: Sorting {
                group_by: Field::Tags,
                sort_by: Field::Hook,
                ..Sorting::default()
            },
            ..SummaryConfig::default()
        };
        let out = render_summary(&sample(), &config, "");
        assert_eq!(out, "\n## ed\n2 5\n\n## fup\n0\n\n## poo\n1 3 4\n");
    }

    #[test]
    fn write_markdown_creates_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a/b/index.md");
        write_markdown(&path, "x").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }
}

//! Ordering and grouping of items.
//!
//! Every generator consumes items either as a flat ordered list (board) or as
//! ordered groups (index, summary, view). Both orderings must be reproducible
//! across runs so regenerated files diff cleanly: all sorts here are stable,
//! so items with equal keys keep their input order.
//!
//! ## List-valued fields
//!
//! Tags, categories and authors hold several values. For *sorting* only the
//! first value counts: an item tagged `#loop #fup` sorts as `loop`. For
//! *grouping* the item fans out into one bucket per value, so the same item
//! can appear under `loop` and under `fup`.

use crate::item::Item;
use crate::title::EMPTY;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SortError {
    #[error("unknown key \"{key}\", the options are: {}", valid.join(", "))]
    UnknownKey { key: String, valid: Vec<&'static str> },
}

/// An item attribute usable as a sort or group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Hook,
    Title,
    Subtitle,
    Fulltitle,
    Level,
    #[serde(alias = "tag")]
    Tags,
    #[serde(alias = "category")]
    Categories,
    #[serde(alias = "author")]
    Authors,
    Date,
    Filename,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Hook,
        Field::Title,
        Field::Subtitle,
        Field::Fulltitle,
        Field::Level,
        Field::Tags,
        Field::Categories,
        Field::Authors,
        Field::Date,
        Field::Filename,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Hook => "hook",
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::Fulltitle => "fulltitle",
            Field::Level => "level",
            Field::Tags => "tags",
            Field::Categories => "categories",
            Field::Authors => "authors",
            Field::Date => "date",
            Field::Filename => "filename",
        }
    }

    /// Parse a comma-separated key list such as `"tag, title"`.
    pub fn parse_list(list: &str) -> Result<Vec<Field>, SortError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Field {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let alias = match key.as_str() {
            "tag" => Some(Field::Tags),
            "category" => Some(Field::Categories),
            "author" => Some(Field::Authors),
            _ => None,
        };
        alias
            .or_else(|| Field::ALL.into_iter().find(|f| f.name() == key))
            .ok_or_else(|| SortError::UnknownKey {
                key: s.to_string(),
                valid: Field::ALL.iter().map(|f| f.name()).collect(),
            })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All values of `field` on `item`, single values as one-element lists.
///
/// Never empty: a missing subtitle or date reads as [`EMPTY`].
pub fn values(item: &Item, field: Field) -> Vec<&str> {
    let t = &item.title;
    match field {
        Field::Hook => vec![item.hook.as_str()],
        Field::Title => vec![t.title.as_str()],
        Field::Subtitle => vec![t.subtitle.as_deref().unwrap_or(EMPTY)],
        Field::Fulltitle => vec![item.fulltitle()],
        Field::Level => vec![t.level.as_str()],
        Field::Tags => t.tags.iter().map(String::as_str).collect(),
        Field::Categories => t.categories.iter().map(String::as_str).collect(),
        Field::Authors => t.authors.iter().map(String::as_str).collect(),
        Field::Date => vec![t.date.as_deref().unwrap_or(EMPTY)],
        Field::Filename => vec![item.filename.as_str()],
    }
}

/// Sort key of `field`: its first value.
pub fn key(item: &Item, field: Field) -> &str {
    values(item, field).first().copied().unwrap_or(EMPTY)
}

fn compare(a: &Item, b: &Item, fields: &[Field]) -> Ordering {
    fields
        .iter()
        .map(|f| key(a, *f).cmp(key(b, *f)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable sort by any number of keys, the first one most significant.
pub fn sort_by_keys<'a>(items: &'a [Item], fields: &[Field], reverse: bool) -> Vec<&'a Item> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sort_refs(&mut sorted, fields, reverse);
    sorted
}

fn sort_refs(items: &mut [&Item], fields: &[Field], reverse: bool) {
    items.sort_by(|a, b| {
        let ord = compare(a, b, fields);
        if reverse { ord.reverse() } else { ord }
    });
}

/// Stable sort by `primary`, ties broken by `secondary`.
pub fn sort(items: &[Item], primary: Field, secondary: Field, reverse: bool) -> Vec<&Item> {
    sort_by_keys(items, &[primary, secondary], reverse)
}

/// Fan items out into one bucket per value of `field`.
///
/// Buckets come back ordered by key and each bucket is sorted by `sort_by`;
/// `reverse` flips both orders. Input order decides among equal keys.
pub fn group_by<'a>(
    items: &'a [Item],
    field: Field,
    sort_by: Field,
    reverse: bool,
) -> Vec<(String, Vec<&'a Item>)> {
    let mut buckets: BTreeMap<String, Vec<&Item>> = BTreeMap::new();
    for item in items {
        let mut seen: Vec<&str> = Vec::new();
        for value in values(item, field) {
            if seen.contains(&value) {
                continue;
            }
            seen.push(value);
            buckets.entry(value.to_string()).or_default().push(item);
        }
    }

    let mut groups: Vec<(String, Vec<&Item>)> = buckets
        .into_iter()
        .map(|(k, mut list)| {
            sort_refs(&mut list, &[sort_by], reverse);
            (k, list)
        })
        .collect();
    if reverse {
        groups.reverse();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{hooks, items_from};

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

    #[test]
    fn sort_by_hook() {
        let items = sample();
        let sorted = sort_by_keys(&items, &[Field::Hook], false);
        assert_eq!(hooks(&sorted), ["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn sort_by_fulltitle() {
        let items = sample();
        let sorted = sort_by_keys(&items, &[Field::Fulltitle], false);
        assert_eq!(hooks(&sorted), ["0", "4", "1", "2", "3", "5"]);
    }

    #[test]
    fn sort_by_tag_keeps_input_order_on_ties() {
        let items = sample();
        let sorted = sort_by_keys(&items, &[Field::Tags], false);
        assert_eq!(hooks(&sorted), ["2", "5", "0", "3", "1", "4"]);
    }

    #[test]
    fn secondary_key_breaks_ties() {
        let items = sample();
        let sorted = sort(&items, Field::Tags, Field::Title, false);
        assert_eq!(hooks(&sorted), ["2", "5", "0", "4", "1", "3"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let items = items_from(&[
            ("b/9/R.md", "## x #t"),
            ("b/1/R.md", "## x #t"),
            ("b/5/R.md", "## x #t"),
        ]);
        let sorted = sort(&items, Field::Tags, Field::Title, false);
        assert_eq!(hooks(&sorted), ["9", "1", "5"]);
        let reversed = sort(&items, Field::Tags, Field::Title, true);
        assert_eq!(hooks(&reversed), ["9", "1", "5"]);
    }

    #[test]
    fn reverse_sort_descends() {
        let items = sample();
        let sorted = sort(&items, Field::Hook, Field::Title, true);
        assert_eq!(hooks(&sorted), ["5", "4", "3", "2", "1", "0"]);
    }

    #[test]
    fn list_fields_sort_by_first_value() {
        let items = items_from(&[("b/0/R.md", "## x #z #a"), ("b/1/R.md", "## y #m")]);
        let sorted = sort_by_keys(&items, &[Field::Tags], false);
        assert_eq!(hooks(&sorted), ["1", "0"]);
    }

    #[test]
    fn group_by_tag_with_fulltitle_inside() {
        let items = sample();
        let groups = group_by(&items, Field::Tags, Field::Fulltitle, false);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["ed", "fup", "poo"]);
        assert_eq!(hooks(&groups[0].1), ["2", "5"]);
        assert_eq!(hooks(&groups[1].1), ["0"]);
        assert_eq!(hooks(&groups[2].1), ["4", "1", "3"]);
    }

    #[test]
    fn group_by_tag_with_hook_inside() {
        let items = sample();
        let groups = group_by(&items, Field::Tags, Field::Hook, false);
        assert_eq!(hooks(&groups[2].1), ["1", "3", "4"]);
    }

    #[test]
    fn grouping_is_stable() {
        let items = items_from(&[
            ("b/7/R.md", "## z #ed"),
            ("b/8/R.md", "## y #fup"),
            ("b/9/R.md", "## z #ed"),
        ]);
        let groups = group_by(&items, Field::Tags, Field::Title, false);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["ed", "fup"]);
        assert_eq!(hooks(&groups[0].1), ["7", "9"]);
    }

    #[test]
    fn grouping_fans_out() {
        let items = items_from(&[("b/0/R.md", "## x #a #b #c"), ("b/1/R.md", "## y #b")]);
        let groups = group_by(&items, Field::Tags, Field::Hook, false);
        let sizes: Vec<(&str, usize)> = groups.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        assert_eq!(sizes, [("a", 1), ("b", 2), ("c", 1)]);
    }

    #[test]
    fn item_without_tags_lands_in_sentinel_bucket() {
        let items = items_from(&[("b/0/R.md", "## sem tags")]);
        assert_eq!(items[0].title.tags, vec![EMPTY]);
        let groups = group_by(&items, Field::Tags, Field::Hook, false);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, EMPTY);
    }

    #[test]
    fn missing_date_groups_under_sentinel() {
        let items = items_from(&[("b/0/R.md", "## x date:2020"), ("b/1/R.md", "## y")]);
        let groups = group_by(&items, Field::Date, Field::Hook, false);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["2020", EMPTY]);
    }

    #[test]
    fn reverse_grouping_flips_buckets_and_members() {
        let items = sample();
        let groups = group_by(&items, Field::Tags, Field::Hook, true);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["poo", "fup", "ed"]);
        assert_eq!(hooks(&groups[0].1), ["4", "3", "1"]);
    }

    #[test]
    fn field_names_and_aliases_parse() {
        assert_eq!("tag".parse::<Field>(), Ok(Field::Tags));
        assert_eq!("Categories".parse::<Field>(), Ok(Field::Categories));
        assert_eq!(
            Field::parse_list("tag, title"),
            Ok(vec![Field::Tags, Field::Title])
        );
    }

    #[test]
    fn unknown_key_lists_options() {
        let err = "colour".parse::<Field>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("colour"));
        assert!(msg.contains("fulltitle"));
        assert!(msg.contains("hook"));
    }

    #[test]
    fn field_deserializes_with_alias() {
        #[derive(Deserialize)]
        struct Wrap {
            f: Field,
        }
        let w: Wrap = toml::from_str("f = \"category\"").unwrap();
        assert_eq!(w.f, Field::Categories);
        assert!(toml::from_str::<Wrap>("f = \"colour\"").is_err());
    }
}

//! Title-line parsing and canonical re-assembly.
//!
//! The first line of every hook Readme is a *title line*: an optional markdown
//! heading marker, plain title words, and marker-prefixed fields in any order.
//!
//! ```text
//! ## eu cat:a #b cat:d sub: ia la date:e author:g
//! ```
//!
//! [`parse`] splits such a line into a [`Title`]; [`Title::assemble`] writes it
//! back in a caller-chosen [`FieldOrder`]. On-disk order is not preserved, but
//! one parse/assemble pass reaches a fixpoint:
//!
//! ```text
//! assemble(parse(assemble(parse(line)))) == assemble(parse(line))
//! ```
//!
//! ## Parsing order
//!
//! Fields are extracted in a fixed priority: tags, categories, authors, dates.
//! Only the words left over are joined and split on the first subtitle marker,
//! so a subtitle marker can never swallow a tag, category, author or date.
//!
//! ## Empty values
//!
//! List fields are never empty: with no value present they hold the single
//! sentinel [`EMPTY`], which gives every item a group key in every dimension.
//! The subtitle uses `Option`: `None` when no marker is present, `Some("")`
//! for a marker with no text after it.

use crate::symbols::{SymbolTable, canonical};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel value of a list field with no entries.
pub const EMPTY: &str = "_";

#[derive(Error, Debug, PartialEq)]
pub enum TitleError {
    #[error("unknown field letter '{0}' in order \"{1}\" (valid letters: l T s c t a d)")]
    UnknownLetter(char, String),
    #[error("field letter '{0}' repeated in order \"{1}\"")]
    Repeated(char, String),
    #[error("heading level 'l' must come first in order \"{0}\"")]
    LevelNotFirst(String),
}

/// Structured view of one title line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Heading marker (`##`), empty when the line has none.
    pub level: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub date: Option<String>,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            level: String::new(),
            title: String::new(),
            subtitle: None,
            tags: vec![EMPTY.to_string()],
            categories: vec![EMPTY.to_string()],
            authors: vec![EMPTY.to_string()],
            date: None,
        }
    }
}

/// One slot of a [`FieldOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Level,
    Title,
    Subtitle,
    Categories,
    Tags,
    Authors,
    Date,
}

impl Part {
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'l' => Some(Part::Level),
            'T' => Some(Part::Title),
            's' => Some(Part::Subtitle),
            'c' => Some(Part::Categories),
            't' => Some(Part::Tags),
            'a' => Some(Part::Authors),
            'd' => Some(Part::Date),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            Part::Level => 'l',
            Part::Title => 'T',
            Part::Subtitle => 's',
            Part::Categories => 'c',
            Part::Tags => 't',
            Part::Authors => 'a',
            Part::Date => 'd',
        }
    }
}

/// Order in which [`Title::assemble`] writes fields, as compact letters.
///
/// `l` level, `T` title, `s` subtitle, `c` categories, `t` tags, `a` authors,
/// `d` date. Letters left out are not written. The level has to come first:
/// a heading marker anywhere else is discarded when the line is read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldOrder(Vec<Part>);

impl FieldOrder {
    pub fn parse(letters: &str) -> Result<Self, TitleError> {
        let mut parts: Vec<Part> = Vec::new();
        for c in letters.chars() {
            let part =
                Part::from_letter(c).ok_or_else(|| TitleError::UnknownLetter(c, letters.into()))?;
            if parts.contains(&part) {
                return Err(TitleError::Repeated(c, letters.into()));
            }
            parts.push(part);
        }
        if parts.iter().skip(1).any(|p| *p == Part::Level) {
            return Err(TitleError::LevelNotFirst(letters.into()));
        }
        Ok(Self(parts))
    }

    pub fn parts(&self) -> &[Part] {
        &self.0
    }

    /// The same order without the given part.
    pub fn without(&self, part: Part) -> Self {
        Self(self.0.iter().copied().filter(|p| *p != part).collect())
    }
}

impl Default for FieldOrder {
    fn default() -> Self {
        Self(vec![
            Part::Level,
            Part::Title,
            Part::Categories,
            Part::Tags,
            Part::Authors,
            Part::Date,
            Part::Subtitle,
        ])
    }
}

impl fmt::Display for FieldOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: String = self.0.iter().map(|p| p.letter()).collect();
        f.write_str(&letters)
    }
}

impl TryFrom<String> for FieldOrder {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldOrder> for String {
    fn from(order: FieldOrder) -> Self {
        order.to_string()
    }
}

/// Everything needed to read and write title lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleFormat {
    pub symbols: SymbolTable,
    pub order: FieldOrder,
}

impl TitleFormat {
    pub fn new(symbols: SymbolTable, order: FieldOrder) -> Self {
        Self { symbols, order }
    }

    pub fn parse(&self, line: &str) -> Title {
        parse(line, &self.symbols)
    }

    pub fn assemble(&self, title: &Title) -> String {
        title.assemble(&self.symbols, &self.order)
    }

    /// Marker written in front of a subtitle, if subtitles are configured.
    pub fn subtitle_marker(&self) -> Option<&str> {
        canonical(&self.symbols.subtitle)
    }
}

fn is_heading(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c == '#')
}

/// Move every word starting with one of `markers` out of `words`, marker stripped.
fn take_marked(words: &mut Vec<&str>, markers: &[String]) -> Vec<String> {
    let mut found = Vec::new();
    for marker in markers {
        words.retain(|word| match word.strip_prefix(marker.as_str()) {
            Some(value) => {
                found.push(value.to_string());
                false
            }
            None => true,
        });
    }
    found
}

fn or_empty(values: Vec<String>) -> Vec<String> {
    if values.is_empty() {
        vec![EMPTY.to_string()]
    } else {
        values
    }
}

/// Split at the earliest occurrence of any subtitle marker.
fn split_subtitle(text: &str, markers: &[String]) -> (String, Option<String>) {
    let earliest = markers
        .iter()
        .filter_map(|m| text.find(m.as_str()).map(|pos| (pos, m.len())))
        .min_by_key(|(pos, _)| *pos);
    match earliest {
        Some((pos, len)) => (
            text[..pos].trim().to_string(),
            Some(text[pos + len..].trim().to_string()),
        ),
        None => (text.trim().to_string(), None),
    }
}

/// Parse one title line.
pub fn parse(line: &str, symbols: &SymbolTable) -> Title {
    let mut words: Vec<&str> = line.split_whitespace().collect();

    let mut level = String::new();
    if let Some(first) = words.first()
        && is_heading(first)
    {
        level = first.to_string();
        words.remove(0);
    }
    words.retain(|w| !is_heading(w));

    let tags = take_marked(&mut words, &symbols.tag);
    let categories = take_marked(&mut words, &symbols.category);
    let authors = take_marked(&mut words, &symbols.author);
    let dates = take_marked(&mut words, &symbols.date);

    let (title, subtitle) = split_subtitle(&words.join(" "), &symbols.subtitle);

    Title {
        level,
        title,
        subtitle,
        tags: or_empty(tags),
        categories: or_empty(categories),
        authors: or_empty(authors),
        date: dates.into_iter().next(),
    }
}

fn push_marked(tokens: &mut Vec<String>, markers: &[String], values: &[String]) {
    let Some(marker) = canonical(markers) else {
        return;
    };
    for value in values.iter().filter(|v| v.as_str() != EMPTY) {
        tokens.push(format!("{marker}{value}"));
    }
}

impl Title {
    /// Write the title line back in `order`.
    ///
    /// Sentinel values and absent fields are skipped, list fields produce one
    /// marked token per value, and tokens are joined by single spaces.
    pub fn assemble(&self, symbols: &SymbolTable, order: &FieldOrder) -> String {
        let mut tokens: Vec<String> = Vec::new();
        for part in order.parts() {
            match part {
                Part::Level if !self.level.is_empty() => tokens.push(self.level.clone()),
                Part::Title if !self.title.is_empty() => tokens.push(self.title.clone()),
                Part::Subtitle => {
                    if let (Some(sub), Some(marker)) = (&self.subtitle, canonical(&symbols.subtitle))
                    {
                        if sub.is_empty() {
                            tokens.push(marker.to_string());
                        } else {
                            tokens.push(format!("{marker} {sub}"));
                        }
                    }
                }
                Part::Categories => push_marked(&mut tokens, &symbols.category, &self.categories),
                Part::Tags => push_marked(&mut tokens, &symbols.tag, &self.tags),
                Part::Authors => push_marked(&mut tokens, &symbols.author, &self.authors),
                Part::Date => {
                    if let (Some(date), Some(marker)) = (&self.date, canonical(&symbols.date)) {
                        tokens.push(format!("{marker}{date}"));
                    }
                }
                _ => {}
            }
        }
        tokens.join(" ")
    }

    /// Compact field dump, e.g. `l[##] T[eu] s[ia] c[a,d] t[b] d[e]`.
    pub fn describe(&self) -> String {
        fn list(values: &[String]) -> Option<String> {
            let kept: Vec<&str> = values
                .iter()
                .map(String::as_str)
                .filter(|v| *v != EMPTY)
                .collect();
            (!kept.is_empty()).then(|| kept.join(","))
        }

        let mut parts: Vec<String> = Vec::new();
        if !self.level.is_empty() {
            parts.push(format!("l[{}]", self.level));
        }
        if !self.title.is_empty() {
            parts.push(format!("T[{}]", self.title));
        }
        if let Some(sub) = &self.subtitle {
            parts.push(format!("s[{sub}]"));
        }
        for (letter, values) in [
            ('c', &self.categories),
            ('t', &self.tags),
            ('a', &self.authors),
        ] {
            if let Some(joined) = list(values) {
                parts.push(format!("{letter}[{joined}]"));
            }
        }
        if let Some(date) = &self.date {
            parts.push(format!("d[{date}]"));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(line: &str) -> String {
        parse(line, &SymbolTable::default()).describe()
    }

    fn assemble(line: &str, order: &str) -> String {
        let symbols = SymbolTable::default();
        parse(line, &symbols).assemble(&symbols, &FieldOrder::parse(order).unwrap())
    }

    // =========================================================================
    // parse
    // =========================================================================

    #[test]
    fn parse_title_and_tags() {
        assert_eq!(describe("hoje eu vou #dia #noite"), "T[hoje eu vou] t[dia,noite]");
        assert_eq!(describe("hoje"), "T[hoje]");
    }

    #[test]
    fn parse_fields_in_any_position() {
        assert_eq!(describe("hoje eu vou #dia cat:noite"), "T[hoje eu vou] c[noite] t[dia]");
        assert_eq!(describe("eu cat:a #b cat:d ia #e"), "T[eu ia] c[a,d] t[b,e]");
    }

    #[test]
    fn parse_mixed_fields() {
        let t = parse("eu cat:a #b cat:d ia date:e", &SymbolTable::default());
        assert_eq!(t.title, "eu ia");
        assert_eq!(t.categories, vec!["a", "d"]);
        assert_eq!(t.tags, vec!["b"]);
        assert_eq!(t.date.as_deref(), Some("e"));
        assert_eq!(t.subtitle, None);
    }

    #[test]
    fn subtitle_collects_leftover_words_after_marker() {
        assert_eq!(
            describe("eu cat:a #b cat:d sub: ia date:e la author:g author:u"),
            "T[eu] s[ia la] c[a,d] t[b] a[g,u] d[e]"
        );
    }

    #[test]
    fn heading_level_kept_only_in_first_position() {
        assert_eq!(describe("### eu"), "l[###] T[eu]");
        assert_eq!(describe("  eu   ### ## #ia"), "T[eu] t[ia]");
    }

    #[test]
    fn heading_only_line_has_empty_title() {
        let t = parse("##", &SymbolTable::default());
        assert_eq!(t.level, "##");
        assert_eq!(t.title, "");
    }

    #[test]
    fn empty_line_gives_default_record() {
        assert_eq!(parse("", &SymbolTable::default()), Title::default());
    }

    #[test]
    fn missing_lists_hold_the_sentinel() {
        let t = parse("## so o titulo", &SymbolTable::default());
        assert_eq!(t.tags, vec![EMPTY]);
        assert_eq!(t.categories, vec![EMPTY]);
        assert_eq!(t.authors, vec![EMPTY]);
        assert_eq!(t.date, None);
    }

    #[test]
    fn absent_subtitle_differs_from_empty_subtitle() {
        let symbols = SymbolTable::default();
        assert_eq!(parse("eu", &symbols).subtitle, None);
        assert_eq!(parse("eu sub:", &symbols).subtitle, Some(String::new()));
    }

    #[test]
    fn first_date_wins() {
        let t = parse("x date:1 date:2", &SymbolTable::default());
        assert_eq!(t.date.as_deref(), Some("1"));
    }

    #[test]
    fn legacy_markers_are_read() {
        let t = parse("## Soma ©vetor ðontem æana ß de dois", &SymbolTable::default());
        assert_eq!(t.title, "Soma");
        assert_eq!(t.categories, vec!["vetor"]);
        assert_eq!(t.date.as_deref(), Some("ontem"));
        assert_eq!(t.authors, vec!["ana"]);
        assert_eq!(t.subtitle.as_deref(), Some("de dois"));
    }

    #[test]
    fn subtitle_marker_never_takes_marked_tokens() {
        let t = parse("a sub: b cat:x c", &SymbolTable::default());
        assert_eq!(t.title, "a");
        assert_eq!(t.subtitle.as_deref(), Some("b c"));
        assert_eq!(t.categories, vec!["x"]);
    }

    // =========================================================================
    // assemble
    // =========================================================================

    #[test]
    fn assemble_in_canonical_order() {
        let order = "lTctads";
        assert_eq!(assemble("hoje eu vou #dia #noite", order), "hoje eu vou #dia #noite");
        assert_eq!(assemble("hoje", order), "hoje");
        assert_eq!(assemble("hoje eu vou #dia cat:noite", order), "hoje eu vou cat:noite #dia");
        assert_eq!(assemble("eu cat:a #b cat:d ia #e", order), "eu ia cat:a cat:d #b #e");
        assert_eq!(
            assemble("eu cat:a #b cat:d sub: ia date:e", order),
            "eu cat:a cat:d #b date:e sub: ia"
        );
        assert_eq!(assemble("### eu", order), "### eu");
        assert_eq!(assemble("  eu   ### ## #ia", order), "eu #ia");
    }

    #[test]
    fn assemble_without_level_or_authors() {
        assert_eq!(
            assemble("eu cat:a #b cat:d ia date:e", "Tctad"),
            "eu ia cat:a cat:d #b date:e"
        );
    }

    #[test]
    fn assemble_with_subtitle_second() {
        assert_eq!(
            assemble("eu cat:a #b cat:d sub: ia date:e la author:g author:u", "Tsctad"),
            "eu sub: ia la cat:a cat:d #b author:g author:u date:e"
        );
    }

    #[test]
    fn assemble_writes_canonical_markers_for_legacy_input() {
        assert_eq!(assemble("## Soma ©vetor #loop", "lTctads"), "## Soma cat:vetor #loop");
    }

    #[test]
    fn assemble_keeps_explicit_empty_subtitle() {
        assert_eq!(assemble("eu sub:", "lTs"), "eu sub:");
    }

    #[test]
    fn assemble_has_no_trailing_whitespace() {
        let out = assemble("## ", "lTctads");
        assert_eq!(out, "##");
    }

    #[test]
    fn round_trip_reaches_fixpoint() {
        let symbols = SymbolTable::default();
        let lines = [
            "eu cat:a #b cat:d ia date:e",
            "## Straße ß x",
            "a ß b sub: c",
            "  eu   ### ## #ia",
            "### titulo sub:",
            "©a æb ðc ß",
            "cat: #x",
            "",
        ];
        for order in ["lTctads", "Tctad", "lsTcatd", "Tt"] {
            let order = FieldOrder::parse(order).unwrap();
            for line in lines {
                let once = parse(line, &symbols).assemble(&symbols, &order);
                let reparsed = parse(&once, &symbols);
                let twice = reparsed.assemble(&symbols, &order);
                assert_eq!(once, twice, "line {line:?} order {order}");
            }
        }
    }

    #[test]
    fn full_order_round_trip_preserves_record() {
        let symbols = SymbolTable::default();
        let order = FieldOrder::default();
        let first = parse("## eu cat:a #b sub: ia date:e author:z", &symbols);
        let again = parse(&first.assemble(&symbols, &order), &symbols);
        assert_eq!(first, again);
    }

    // =========================================================================
    // FieldOrder
    // =========================================================================

    #[test]
    fn field_order_round_trips_through_string() {
        let order = FieldOrder::parse("lTctads").unwrap();
        assert_eq!(order.to_string(), "lTctads");
        assert_eq!(order, FieldOrder::default());
    }

    #[test]
    fn field_order_rejects_unknown_letter() {
        assert_eq!(
            FieldOrder::parse("Tx"),
            Err(TitleError::UnknownLetter('x', "Tx".into()))
        );
    }

    #[test]
    fn field_order_rejects_repeats() {
        assert!(matches!(
            FieldOrder::parse("TcTd"),
            Err(TitleError::Repeated('T', _))
        ));
    }

    #[test]
    fn field_order_requires_level_first() {
        assert!(matches!(
            FieldOrder::parse("Tl"),
            Err(TitleError::LevelNotFirst(_))
        ));
    }

    #[test]
    fn without_drops_one_part() {
        let order = FieldOrder::default().without(Part::Subtitle);
        assert_eq!(order.to_string(), "lTctad");
    }
}

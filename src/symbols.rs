//! Marker table for the title-line micro-syntax.
//!
//! A title line carries structured fields as marker-prefixed tokens:
//!
//! ```text
//! ## Soma de vetores cat:vetor #loop #fup author:ana date:2021-03-02 sub: dois laços
//! ```
//!
//! Each field may be introduced by several markers. The first marker of a
//! field is the canonical one and is what the serializer writes back; the
//! others are accepted when reading so that files written with the legacy
//! single-character syntax (`©`, `ð`, `æ`, `ß`) keep parsing.
//!
//! | Field | Markers (canonical first) |
//! |-------|---------------------------|
//! | tag | `#` |
//! | category | `cat:`, `©` |
//! | date | `date:`, `ð` |
//! | author | `author:`, `æ` |
//! | subtitle | `sub:`, `ß` |

use serde::{Deserialize, Serialize};

/// Field markers, one list per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymbolTable {
    pub tag: Vec<String>,
    pub category: Vec<String>,
    pub date: Vec<String>,
    pub author: Vec<String>,
    pub subtitle: Vec<String>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            tag: markers(&["#"]),
            category: markers(&["cat:", "©"]),
            date: markers(&["date:", "ð"]),
            author: markers(&["author:", "æ"]),
            subtitle: markers(&["sub:", "ß"]),
        }
    }
}

fn markers(list: &[&str]) -> Vec<String> {
    list.iter().map(|m| m.to_string()).collect()
}

impl SymbolTable {
    /// Check that every marker can actually be matched.
    ///
    /// Empty markers would match every token, and pure-`#` markers other than
    /// the tag marker `#` collide with heading levels, which are stripped
    /// before any field is read.
    pub fn validate(&self) -> Result<(), String> {
        for (field, list) in self.fields() {
            for marker in list {
                if marker.is_empty() {
                    return Err(format!("symbols.{field} contains an empty marker"));
                }
                let pure_hash = marker.chars().all(|c| c == '#');
                if pure_hash && !(field == "tag" && marker == "#") {
                    return Err(format!(
                        "symbols.{field} marker \"{marker}\" is indistinguishable from a heading"
                    ));
                }
            }
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, &[String]); 5] {
        [
            ("tag", &self.tag),
            ("category", &self.category),
            ("date", &self.date),
            ("author", &self.author),
            ("subtitle", &self.subtitle),
        ]
    }
}

/// Canonical marker of a field, if it has any.
pub fn canonical(markers: &[String]) -> Option<&str> {
    markers.first().map(String::as_str)
}

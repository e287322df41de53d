//! Category registry.
//!
//! `<base>/.categories.csv` gives each category key a human label and a
//! description, plus the number of items currently using it:
//!
//! ```text
//! count,key,label,description
//! 2,vetor,Vetores,"Listas, matrizes e vetores"
//! 1,estrutura,estrutura,
//! 0,grafo,Grafos,
//! ```
//!
//! Labels and descriptions are curated by hand; counts are recomputed on
//! every pass by [`Registry::refresh`]. Keys seen for the first time get
//! their own key as label. Keys no item uses any more stay in the file with
//! a zero count, listed after the used ones.
//!
//! Reading and writing go through the `csv` crate, so fields with commas,
//! quotes or line breaks are quoted the usual way.

use crate::item::Item;
use crate::title::EMPTY;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

const HEADER: [&str; 4] = ["count", "key", "label", "description"];

#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{path}: row {row}: {reason}")]
    Malformed {
        path: String,
        row: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub count: usize,
    pub key: String,
    pub label: String,
    pub description: String,
}

/// All known categories by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: BTreeMap<String, Category>,
}

impl Registry {
    /// Read the registry, empty when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, CategoryError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let malformed = |row: usize, reason: String| CategoryError::Malformed {
            path: path.display().to_string(),
            row,
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut entries = BTreeMap::new();
        for (n, record) in reader.records().enumerate() {
            let record: Vec<String> = record?.iter().map(str::to_string).collect();
            if (n == 0 && record == HEADER) || record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            let [count, key, label, description]: [String; 4] = record
                .try_into()
                .map_err(|r: Vec<String>| {
                    malformed(n + 1, format!("expected 4 fields, found {}", r.len()))
                })?;
            let count = count
                .trim()
                .parse()
                .map_err(|_| malformed(n + 1, format!("count \"{count}\" is not a number")))?;
            entries.entry(key.clone()).or_insert(Category {
                count,
                key,
                label,
                description,
            });
        }
        Ok(Self { entries })
    }

    /// Recount categories over `items`, registering unseen keys.
    pub fn refresh(&mut self, items: &[Item]) {
        for category in self.entries.values_mut() {
            category.count = 0;
        }
        for item in items {
            let mut seen: Vec<&str> = Vec::new();
            for key in &item.title.categories {
                if key == EMPTY || seen.contains(&key.as_str()) {
                    continue;
                }
                seen.push(key);
                self.entries
                    .entry(key.clone())
                    .or_insert_with(|| {
                        log::info!("new category {key}");
                        Category {
                            count: 0,
                            key: key.clone(),
                            label: key.clone(),
                            description: String::new(),
                        }
                    })
                    .count += 1;
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.entries.get(key)
    }

    /// Display label of a key, when registered with a non-empty label.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.get(key)
            .map(|c| c.label.as_str())
            .filter(|l| !l.is_empty())
    }

    /// Used categories by key, then unused ones by key.
    pub fn rows(&self) -> Vec<&Category> {
        let (used, unused): (Vec<&Category>, Vec<&Category>) =
            self.entries.values().partition(|c| c.count > 0);
        used.into_iter().chain(unused).collect()
    }

    pub fn to_csv(&self) -> Result<String, CategoryError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for c in self.rows() {
            let count = c.count.to_string();
            writer.write_record([
                count.as_str(),
                c.key.as_str(),
                c.label.as_str(),
                c.description.as_str(),
            ])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the registry, leaving the file untouched when nothing changed.
    pub fn save(&self, path: &Path) -> Result<(), CategoryError> {
        let csv = self.to_csv()?;
        if fs::read_to_string(path).is_ok_and(|old| old == csv) {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, csv)?;
        Ok(())
    }
}

/// Load, recount and save the registry in one go.
pub fn refresh_registry(path: &Path, items: &[Item]) -> Result<Registry, CategoryError> {
    let mut registry = Registry::load(path)?;
    registry.refresh(items);
    registry.save(path)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{items_from, setup_fixtures};
    use tempfile::TempDir;

    fn load_text(text: &str) -> Result<Registry, CategoryError> {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.csv");
        fs::write(&path, text).unwrap();
        Registry::load(&path)
    }

    #[test]
    fn load_handles_quotes() {
        let registry = load_text("1,a,\"x, y\",\"say \"\"hi\"\"\"\n0,b,,\n").unwrap();
        let a = registry.get("a").unwrap();
        assert_eq!(a.label, "x, y");
        assert_eq!(a.description, "say \"hi\"");
        assert_eq!(registry.get("b").map(|c| c.label.as_str()), Some(""));
    }

    #[test]
    fn load_handles_crlf_and_missing_final_newline() {
        let registry = load_text("1,a,b,c\r\n2,d,e,f").unwrap();
        assert_eq!(registry.get("d").map(|c| c.count), Some(2));
        assert_eq!(registry.get("a").map(|c| c.description.as_str()), Some("c"));
    }

    #[test]
    fn quoted_field_may_span_lines() {
        let registry = load_text("1,a,b,\"linha 1\nlinha 2\"\n\n").unwrap();
        assert_eq!(registry.get("a").unwrap().description, "linha 1\nlinha 2");
    }

    #[test]
    fn to_csv_quotes_when_needed() {
        let mut registry = load_text("0,a,\"x, y\",\n0,b,\"q\"\"t\",\n").unwrap();
        registry.refresh(&[]);
        assert_eq!(
            registry.to_csv().unwrap(),
            "count,key,label,description\n0,a,\"x, y\",\n0,b,\"q\"\"t\",\n"
        );
    }

    #[test]
    fn load_fixture_registry() {
        let tmp = setup_fixtures();
        let registry = Registry::load(&tmp.path().join("base/.categories.csv")).unwrap();
        let vetor = registry.get("vetor").unwrap();
        assert_eq!(vetor.label, "Vetores");
        assert_eq!(vetor.description, "Listas, matrizes e vetores");
        assert_eq!(registry.label("grafo"), Some("Grafos"));
        assert_eq!(registry.label("nada"), None);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = Registry::load(&tmp.path().join("none.csv")).unwrap();
        assert!(registry.rows().is_empty());
    }

    #[test]
    fn malformed_row_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.csv");
        fs::write(&path, "1,a,b\n").unwrap();
        assert!(matches!(
            Registry::load(&path),
            Err(CategoryError::Malformed { row: 1, .. })
        ));
        fs::write(&path, "x,a,b,c\n").unwrap();
        assert!(Registry::load(&path).is_err());
    }

    #[test]
    fn refresh_counts_and_registers() {
        let mut registry = Registry::default();
        let items = items_from(&[
            ("b/0/R.md", "## a cat:loop cat:vetor"),
            ("b/1/R.md", "## b cat:loop"),
            ("b/2/R.md", "## c"),
        ]);
        registry.refresh(&items);
        assert_eq!(registry.get("loop").map(|c| c.count), Some(2));
        assert_eq!(registry.get("vetor").map(|c| c.label.as_str()), Some("vetor"));
        assert!(registry.get(EMPTY).is_none());
    }

    #[test]
    fn refresh_resets_stale_counts() {
        let mut registry = Registry::default();
        registry.refresh(&items_from(&[("b/0/R.md", "## a cat:velha")]));
        registry.refresh(&items_from(&[("b/0/R.md", "## a cat:nova")]));
        assert_eq!(registry.get("velha").map(|c| c.count), Some(0));
        assert_eq!(registry.get("nova").map(|c| c.count), Some(1));
    }

    #[test]
    fn used_rows_come_first() {
        let mut registry = Registry::default();
        registry.refresh(&items_from(&[
            ("b/0/R.md", "## a cat:zeta cat:beta"),
            ("b/1/R.md", "## b cat:alfa"),
        ]));
        registry.refresh(&items_from(&[("b/0/R.md", "## a cat:zeta")]));
        let keys: Vec<&str> = registry.rows().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["zeta", "alfa", "beta"]);
    }

    #[test]
    fn refresh_registry_keeps_curated_labels() {
        let tmp = setup_fixtures();
        let path = tmp.path().join("base/.categories.csv");
        let items = items_from(&[
            ("b/0/R.md", "## a cat:vetor"),
            ("b/1/R.md", "## b cat:estrutura"),
        ]);
        refresh_registry(&path, &items).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "count,key,label,description\n\
             1,estrutura,estrutura,\n\
             1,vetor,Vetores,\"Listas, matrizes e vetores\"\n\
             0,grafo,Grafos,\n"
        );
    }

    #[test]
    fn unchanged_registry_not_rewritten() {
        use std::fs::File;
        use std::time::{Duration, SystemTime};

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.csv");
        let items = items_from(&[("b/0/R.md", "## a cat:x")]);
        refresh_registry(&path, &items).unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        File::options().write(true).open(&path).unwrap().set_modified(past).unwrap();
        refresh_registry(&path, &items).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), past);
    }
}

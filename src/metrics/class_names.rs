//! Class id to display name table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Read-only mapping from class id to a human-readable name.
///
/// Ids without an entry resolve to `Class <id>`, so an empty table is a
/// valid (degraded) table.
///
/// Supported sources:
/// ```text
/// classes.txt   one name per line, line index = class id
/// classes.json  ["drone", "car", ...]
/// classes.json  {"0": "drone", "1": "car", ...}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNameTable {
    names: BTreeMap<u32, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassNamesJson {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl ClassNameTable {
    /// Load a table from a `.json` or `.txt` file.
    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let read = || {
            fs::read_to_string(path).map_err(|e| {
                Error::ClassNames(format!(
                    "failed to read class names file '{}': {}",
                    path.display(),
                    e
                ))
            })
        };

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&read()?).map_err(|e| match e {
                Error::ClassNames(msg) => {
                    Error::ClassNames(format!("{}: {}", path.display(), msg))
                }
                other => other,
            }),
            Some("txt") => Ok(Self::from_lines(&read()?)),
            _ => Err(Error::ClassNames(format!(
                "unsupported class names file '{}' (expected .json or .txt)",
                path.display()
            ))),
        }
    }

    /// Parse a JSON list of names, or an object keyed by integer ids.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: ClassNamesJson = serde_json::from_str(json).map_err(|e| {
            Error::ClassNames(format!(
                "expected a list of names or an object with integer keys: {}",
                e
            ))
        })?;

        match parsed {
            ClassNamesJson::List(list) => Ok(Self::from_names(list)),
            ClassNamesJson::Map(map) => {
                let mut names = BTreeMap::new();
                for (key, name) in map {
                    let class_id: u32 = key.trim().parse().map_err(|_| {
                        Error::ClassNames(format!("class key '{}' is not an integer", key))
                    })?;
                    names.insert(class_id, name);
                }
                Ok(Self { names })
            }
        }
    }

    /// One name per line; blank lines keep their index but carry no name.
    pub fn from_lines(contents: &str) -> Self {
        Self::from_names(contents.lines().map(|l| l.trim().to_string()))
    }

    fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        let names = names
            .into_iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(idx, name)| (idx as u32, name))
            .collect();
        Self { names }
    }

    /// Display name for a class id.
    pub fn name_for(&self, class_id: u32) -> String {
        self.names
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| format!("Class {}", class_id))
    }

    /// Registered name, without fallback.
    pub fn get(&self, class_id: u32) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

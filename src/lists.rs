//! Loading named word lists from YAML.
//!
//! A list file maps list names to either a sequence of words or a single
//! word. A file may hold several YAML documents. Lists with the same name in
//! several documents or files are unioned.
//!
//! ```yaml
//! PREFIXES: [של, ב, ל]
//! VAV_EXCEPTIONS:
//!   - יום
//!   - לילה
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value as Yaml;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::ListRegistry;

/// Failure to read a single list file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read list file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed list file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parse list documents from `input`.
///
/// Top-level documents that are not mappings, and values that are neither a
/// string nor a sequence of strings, are skipped with a warning.
///
/// # Errors
///
/// Returns the YAML error if any document is malformed.
pub fn parse(input: &str) -> Result<ListRegistry, serde_yaml::Error> {
    let mut lists = ListRegistry::new();
    for document in serde_yaml::Deserializer::from_str(input) {
        let value = Yaml::deserialize(document)?;
        merge_document(&mut lists, value);
    }
    Ok(lists)
}

fn merge_document(lists: &mut ListRegistry, document: Yaml) {
    let map = match document {
        Yaml::Null => return,
        Yaml::Mapping(map) => map,
        _ => {
            warn!("skipping list document that is not a mapping");
            return;
        }
    };
    for (key, value) in map {
        let Some(name) = key.as_str() else {
            warn!(key = ?key, "skipping list with non-string name");
            continue;
        };
        match value {
            Yaml::String(word) => lists.extend(name, [word]),
            Yaml::Sequence(items) => {
                let words: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Yaml::String(word) => Some(word),
                        other => {
                            warn!(list = name, item = ?other, "skipping non-string list member");
                            None
                        }
                    })
                    .collect();
                lists.extend(name, words);
            }
            other => warn!(list = name, value = ?other, "skipping non-list value"),
        }
    }
}

/// Read and parse one list file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or is malformed.
pub fn load_file(path: &Path) -> Result<ListRegistry, LoadError> {
    let input = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse(&input).map_err(|source| LoadError::Yaml {
        path: path.to_owned(),
        source,
    })
}

/// Load and union every `*.yaml` / `*.yml` file in `dir`, in file name order.
///
/// Never fails: a missing directory, a path that is not a directory, and
/// unreadable or malformed files are logged and contribute nothing.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn load_dir(dir: impl AsRef<Path>) -> ListRegistry {
    let dir = dir.as_ref();
    if !dir.exists() {
        warn!("lists directory not found");
        return ListRegistry::new();
    }
    if !dir.is_dir() {
        warn!("lists path is not a directory");
        return ListRegistry::new();
    }

    let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_yaml(p))
            .collect(),
        Err(err) => {
            warn!(error = %err, "cannot read lists directory");
            return ListRegistry::new();
        }
    };
    files.sort();
    if files.is_empty() {
        warn!("no list files found");
    }

    let mut lists = ListRegistry::new();
    for file in &files {
        match load_file(file) {
            Ok(loaded) => {
                debug!(file = %file.display(), lists = loaded.len(), "loaded list file");
                lists.merge(loaded);
            }
            Err(err) => warn!(error = %err, "skipping list file"),
        }
    }
    info!(files = files.len(), lists = lists.len(), "loaded word lists");
    lists
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    #[test]
    fn parse_sequences_and_scalars() {
        let lists = parse("A: [x, y]\nB: z\n").unwrap();
        assert_eq!(lists.lookup("A"), &set(&["x", "y"]));
        assert_eq!(lists.lookup("B"), &set(&["z"]));
    }

    #[test]
    fn parse_skips_unusable_values() {
        let lists = parse("A: 3\nB: {nested: x}\nC: [x, 1, y]\n").unwrap();
        assert!(lists.get("A").is_none());
        assert!(lists.get("B").is_none());
        assert_eq!(lists.lookup("C"), &set(&["x", "y"]));
    }

    #[test]
    fn parse_multi_document_unions() {
        let lists = parse("A: [a]\n---\nA: [b]\n---\n[not, a, mapping]\n").unwrap();
        assert_eq!(lists.lookup("A"), &set(&["a", "b"]));
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn parse_malformed_is_an_error() {
        assert!(parse("A: [x, y").is_err());
    }

    #[test]
    fn load_dir_unions_same_name_across_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.yaml"), "LIST_A: [a, b]\n").unwrap();
        fs::write(dir.path().join("two.yml"), "LIST_A: [b, c]\nLIST_B: d\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "LIST_A: [ignored]\n").unwrap();

        let lists = load_dir(dir.path());
        assert_eq!(lists.lookup("LIST_A"), &set(&["a", "b", "c"]));
        assert_eq!(lists.lookup("LIST_B"), &set(&["d"]));
        assert_eq!(lists.len(), 2);
    }

    #[test]
    fn load_dir_skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.yaml"), "A: [unterminated\n").unwrap();
        fs::write(dir.path().join("good.yaml"), "A: [ok]\n").unwrap();

        let lists = load_dir(dir.path());
        assert_eq!(lists.lookup("A"), &set(&["ok"]));
    }

    #[test]
    fn load_dir_missing_or_not_a_directory() {
        let dir = TempDir::new().unwrap();
        assert!(load_dir(dir.path().join("absent")).is_empty());

        let file = dir.path().join("file.yaml");
        fs::write(&file, "A: [x]\n").unwrap();
        assert!(load_dir(&file).is_empty());
    }

    #[test]
    fn load_dir_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(load_dir(dir.path()).is_empty());
    }

    #[test]
    fn load_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }
}

//! Sound library
//!
//! The library maps a human-readable resource name (e.g. `"56k"`) to the URI a
//! browser can play (e.g. `"/sounds/56k.mp3"`). It is loaded once from a JSON
//! object at startup and never mutated afterwards, so it is shared behind an
//! `Arc` without any lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::playlist::{PlaylistError, Selection};

/// Error loading the library file
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The file could not be read
    #[error("failed to read library {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON object of strings
    #[error("failed to parse library {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only mapping of resource name to playable URI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    entries: HashMap<String, String>,
}

impl Library {
    /// Create a library from an existing map
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load a library from a JSON file such as `sounds.json`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|source| LibraryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let library: Library =
            serde_json::from_str(&raw).map_err(|source| LibraryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            resources = library.len(),
            "Library loaded"
        );

        Ok(library)
    }

    /// Check whether a resource name exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the URI for a resource name
    pub fn uri(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// All resource names, sorted alphabetically
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The underlying name to URI map
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate a resource name and stamp it with the current time
    ///
    /// This is the gate for the push path; the playlist performs the same
    /// check under its own lock.
    pub fn select(&self, name: &str) -> Result<Selection, PlaylistError> {
        if !self.contains(name) {
            return Err(PlaylistError::InvalidResource(name.to_owned()));
        }

        Ok(Selection::new(name, crate::playlist::unix_now()))
    }
}

impl<K, V> FromIterator<(K, V)> for Library
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sounds() -> Library {
        Library::from_iter([
            ("deeper", "/sounds/deeper.mp3"),
            ("56k", "/sounds/56k.mp3"),
        ])
    }

    #[test]
    fn test_lookup() {
        let library = sounds();

        assert!(library.contains("56k"));
        assert!(!library.contains("airhorn"));
        assert_eq!(library.uri("deeper"), Some("/sounds/deeper.mp3"));
        assert_eq!(library.uri("airhorn"), None);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_names_sorted() {
        let library = Library::from_iter([("zap", "/z"), ("airhorn", "/a"), ("56k", "/5")]);

        assert_eq!(library.names(), vec!["56k", "airhorn", "zap"]);
    }

    #[test]
    fn test_select_unknown() {
        let result = sounds().select("airhorn");

        assert_eq!(
            result,
            Err(PlaylistError::InvalidResource("airhorn".into()))
        );
    }

    #[test]
    fn test_select_known() {
        let selection = sounds().select("56k").unwrap();

        assert_eq!(selection.resource(), "56k");
        assert!(selection.timestamp() > 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"56k": "/sounds/56k.mp3", "deeper": "/sounds/deeper.mp3"}}"#
        )
        .unwrap();

        let library = Library::load(file.path()).unwrap();

        assert_eq!(library, sounds());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Library::load(dir.path().join("sounds.json"));

        assert!(matches!(result, Err(LibraryError::Read { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["56k", "deeper"]"#).unwrap();

        let result = Library::load(file.path());

        assert!(matches!(result, Err(LibraryError::Parse { .. })));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let library = Library::from_iter([("56k", "/sounds/56k.mp3")]);
        let json = serde_json::to_value(&library).unwrap();

        assert_eq!(json, serde_json::json!({"56k": "/sounds/56k.mp3"}));
    }
}

//! Dictionary sources: origin tags, the supported JSON schemas, and file loading.
//!
//! A [`TermSource`] is one origin-tagged list of `(source, target)` pairs, usually
//! the contents of a single JSON file. Two on-disk shapes are accepted:
//!
//! - **Flat**: `{"软件": "軟體", ...}`
//! - **Wrapped**: `{"version": "1.0", "description": "...", "terms": {...}}`
//!
//! In both shapes an entry value is either a plain target string or an extended
//! object `{"target": "...", "category": "...", "note": "..."}`. Unknown fields are
//! rejected rather than guessed at.
//!
//! Entries keep file order, and a key repeated inside one file is kept twice so
//! the merge can report it.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::DictionaryError;

/// Category assigned to a user-supplied override dictionary.
pub const CUSTOM_CATEGORY: &str = "custom";

/// Where a group of terms came from.
///
/// `category` is the unit used for conflict classification: two files of the
/// same category redefining a key is a defect, a later category overriding an
/// earlier one is intentional precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Origin {
    pub category: String,
    pub name: String,
}

impl Origin {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    /// Origin of a custom dictionary file, named after its stem.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(CUSTOM_CATEGORY, name)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// One origin-tagged set of dictionary entries, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSource {
    pub origin: Origin,
    pub entries: Vec<(String, String)>,
}

impl TermSource {
    pub fn new(origin: Origin, entries: Vec<(String, String)>) -> Self {
        Self { origin, entries }
    }

    /// Builds a source from in-memory pairs.
    ///
    /// ```
    /// use zhtw::dictionary_lib::{Origin, TermSource};
    ///
    /// let src = TermSource::from_pairs(Origin::new("cn", "base"), [("软件", "軟體")]);
    /// assert_eq!(src.len(), 1);
    /// ```
    pub fn from_pairs<I, K, V>(origin: Origin, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { origin, entries }
    }

    /// Parses dictionary JSON in either supported schema.
    pub fn from_json_str(origin: Origin, json: &str) -> Result<Self, DictionaryError> {
        let file = TermFile::parse(&origin, json)?;
        Ok(Self {
            origin,
            entries: file.into_entries(),
        })
    }

    /// Reads one dictionary file; the origin name is the file stem.
    pub fn from_path(category: &str, path: &Path) -> Result<Self, DictionaryError> {
        let content = fs::read_to_string(path).map_err(|source| DictionaryError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = Self::from_json_str(Origin::new(category, name), &content)?;
        debug!(origin = %source.origin, terms = source.len(), "loaded dictionary file");
        Ok(source)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads every `*.json` file in `dir`, sorted by file name, as sources of `category`.
///
/// A missing directory yields no sources.
pub fn load_directory(category: &str, dir: &Path) -> Result<Vec<TermSource>, DictionaryError> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "dictionary directory not found, skipping");
        return Ok(Vec::new());
    }

    let io_err = |source: std::io::Error| DictionaryError::IoError {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    files
        .iter()
        .map(|path| TermSource::from_path(category, path))
        .collect()
}

/// Supported dictionary file schemas.
enum TermFile {
    Flat(TermEntries),
    Wrapped(WrappedTermFile),
}

/// A JSON object read as an ordered list of entries, duplicates included.
struct TermEntries(Vec<(String, TermValue)>);

impl<'de> Deserialize<'de> for TermEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = TermEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping source terms to targets")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, TermValue>()? {
                    entries.push(entry);
                }
                Ok(TermEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct WrappedTermFile {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    terms: TermEntries,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TermValue {
    Plain(String),
    Extended(ExtendedTerm),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct ExtendedTerm {
    target: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

impl TermFile {
    fn parse(origin: &Origin, json: &str) -> Result<Self, DictionaryError> {
        let value: Value =
            serde_json::from_str(json).map_err(|source| DictionaryError::ParseError {
                origin: origin.to_string(),
                source,
            })?;

        let schema_err = |reason: String| DictionaryError::SchemaError {
            origin: origin.to_string(),
            reason,
        };

        let Value::Object(map) = &value else {
            return Err(schema_err("top level must be a JSON object".to_string()));
        };

        // `Value` collapses repeated keys, so entries are read from the text again
        if matches!(map.get("terms"), Some(Value::Object(_))) {
            serde_json::from_str(json)
                .map(TermFile::Wrapped)
                .map_err(|e| schema_err(e.to_string()))
        } else {
            serde_json::from_str(json)
                .map(TermFile::Flat)
                .map_err(|e| schema_err(e.to_string()))
        }
    }

    fn into_entries(self) -> Vec<(String, String)> {
        let TermEntries(terms) = match self {
            TermFile::Flat(terms) => terms,
            TermFile::Wrapped(file) => file.terms,
        };
        terms
            .into_iter()
            .map(|(source, value)| {
                let target = match value {
                    TermValue::Plain(target) => target,
                    TermValue::Extended(ext) => ext.target,
                };
                (source, target)
            })
            .collect()
    }
}

//! Error types for dictionary loading and configuration.
//!
//! Scanning, resolution and rendering never fail on a table that loaded
//! successfully, so every error in this crate is raised while a
//! [`TermTable`](crate::dictionary_lib::TermTable) or a
//! [`ConverterConfig`](crate::config::ConverterConfig) is being constructed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A term set that cannot be turned into a table.
///
/// Raised by [`TermTable::from_sources`](crate::dictionary_lib::TermTable::from_sources)
/// before any automaton is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTermError {
    /// A term with an empty source string.
    #[error("empty source term (target {target:?}) in {origin}")]
    EmptySource {
        /// Display label of the origin that defined the entry.
        origin: String,
        /// Target the empty key mapped to.
        target: String,
    },

    /// Active mappings that lead back to where they started, e.g. `A→B`, `B→A`.
    #[error("circular mapping: {}", .cycle.join(" → "))]
    CircularMapping {
        /// Source keys along the cycle, first key repeated at the end.
        cycle: Vec<String>,
    },
}

/// Errors raised while reading, parsing or merging dictionary sources.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// File or directory access failed.
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dictionary is not valid JSON.
    #[error("failed to parse dictionary {origin}: {source}")]
    ParseError {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON in a shape no supported dictionary schema accepts.
    #[error("unsupported dictionary schema in {origin}: {reason}")]
    SchemaError { origin: String, reason: String },

    /// The merged terms were rejected.
    #[error(transparent)]
    Malformed(#[from] MalformedTermError),
}

/// Errors raised while loading a [`ConverterConfig`](crate::config::ConverterConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A dictionary source name other than `cn` or `hk`.
    #[error("unknown dictionary source '{0}' (expected cn or hk)")]
    UnknownSource(String),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

//! Loading and merging term dictionaries.
//!
//! This module turns dictionary JSON into a [`TermTable`]: an immutable,
//! provenance-aware mapping from source term to Taiwan-standard target.
//!
//! - [`TermSource`] / [`Origin`]: one origin-tagged set of entries (usually one file).
//! - [`load_directory`]: every `*.json` file of a category directory, sorted by name.
//! - [`builtin_sources`] / [`Region`]: the dictionaries embedded in the crate.
//! - [`TermTable`]: the merged result, with [`Conflict`] records for every
//!   redefinition.
//!
//! Users generally go through [`Converter`](crate::Converter), which builds the
//! table and its automaton in one step.

mod builtin;
mod term_source;
mod term_table;

pub use builtin::{builtin_sources, Region};
pub use term_source::{load_directory, Origin, TermSource, CUSTOM_CATEGORY};
pub use term_table::{Conflict, ConflictKind, Provenance, Term, TermTable};

//! Simplified / Hong Kong → Taiwan Traditional Chinese term conversion.
//!
//! `zhtw` rewrites vocabulary, not characters: `软件` becomes `軟體`, `用户`
//! becomes `使用者`, and a term that is already correct is never rewritten,
//! even when a shorter convertible term sits inside it (`皇后` keeps its `后`).
//!
//! The pipeline is
//!
//! 1. [`TermTable`]: merged dictionaries with provenance,
//! 2. [`Automaton`]: one Aho–Corasick pass over the text,
//! 3. [`matcher::scan`]: every raw occurrence,
//! 4. [`resolver::resolve`]: identity protection plus greedy longest match,
//! 5. [`renderer`]: the rewritten text, or line/column diagnostics.
//!
//! [`Converter`] owns a table and its automaton and exposes the whole pipeline.
//!
//! ```
//! use zhtw::Converter;
//!
//! let zhtw = Converter::builtin().unwrap();
//! assert_eq!(zhtw.convert("用户使用软件"), "使用者使用軟體");
//! assert_eq!(zhtw.convert("皇后之后"), "皇后之後");
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

pub mod automaton;
pub mod config;
pub mod dictionary_lib;
pub mod error;
pub mod matcher;
pub mod renderer;
pub mod resolver;
pub mod utils;
pub mod validator;

pub use crate::automaton::Automaton;
pub use crate::config::ConverterConfig;
pub use crate::dictionary_lib::{Region, TermTable};
pub use crate::error::{ConfigError, DictionaryError, MalformedTermError};
pub use crate::matcher::Match;
pub use crate::renderer::Location;
pub use crate::resolver::Span;
pub use crate::validator::Finding;

use crate::dictionary_lib::{builtin_sources, load_directory};
use crate::renderer::{CharIndex, DEFAULT_CONTEXT_RADIUS};
use crate::utils::{contains_chinese, is_cjk_unified};

/// A located edit with a one-line snippet of the surrounding text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue<'a> {
    pub line: usize,
    pub column: usize,
    pub source: &'a str,
    pub target: &'a str,
    pub context: String,
}

/// Occurrence counts of accepted edits, per source term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats<'a> {
    pub total: usize,
    pub by_source: BTreeMap<&'a str, usize>,
}

impl<'a> MatchStats<'a> {
    fn record(&mut self, m: &Match<'a>) {
        self.total += 1;
        *self.by_source.entry(m.source).or_insert(0) += 1;
    }

    /// Folds `other` into `self`.
    pub fn merge(mut self, other: MatchStats<'a>) -> Self {
        self.total += other.total;
        for (source, n) in other.by_source {
            *self.by_source.entry(source).or_insert(0) += n;
        }
        self
    }

    /// Most frequent sources first; ties in source order.
    pub fn most_common(&self, n: usize) -> Vec<(&'a str, usize)> {
        let mut counts: Vec<(&'a str, usize)> =
            self.by_source.iter().map(|(&s, &c)| (s, c)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        counts.truncate(n);
        counts
    }
}

/// Term converter: one immutable [`TermTable`] and the [`Automaton`] built from it.
///
/// Construction is the only fallible step. Every conversion method takes `&self`,
/// so a single `Converter` can serve any number of threads.
pub struct Converter {
    table: TermTable,
    automaton: Automaton,
    is_parallel: bool,
    is_strict: bool,
    /// Every source holds a CJK ideograph, so text without one cannot match.
    cjk_prefilter: bool,
}

impl Converter {
    /// Compiles `table`. Batch methods run in parallel by default; validation
    /// is lenient by default.
    pub fn new(table: TermTable) -> Self {
        let automaton = Automaton::build(&table);
        let cjk_prefilter = automaton
            .patterns()
            .iter()
            .all(|p| p.source.chars().any(is_cjk_unified));
        Converter {
            table,
            automaton,
            is_parallel: true,
            is_strict: false,
            cjk_prefilter,
        }
    }

    /// Embedded `cn` then `hk` dictionaries.
    pub fn builtin() -> Result<Self, DictionaryError> {
        let table = TermTable::load(builtin_sources(&Region::ALL)?, None)?;
        Ok(Self::new(table))
    }

    /// Builds a converter as described by `config`.
    ///
    /// With `data_dir` set, each region is read from `<data_dir>/<region>/*.json`
    /// instead of the embedded dictionaries.
    pub fn from_config(config: &ConverterConfig) -> Result<Self, ConfigError> {
        let sources = match &config.data_dir {
            Some(dir) => {
                let mut sources = Vec::new();
                for region in &config.sources {
                    sources.extend(load_directory(region.as_str(), &dir.join(region.as_str()))?);
                }
                sources
            }
            None => builtin_sources(&config.sources)?,
        };

        let table = TermTable::load(sources, config.custom_dict.as_deref())?;
        let mut converter = Self::new(table);
        converter.set_parallel(config.parallel);
        converter.set_strict(config.strict);
        debug!(
            terms = converter.table.len(),
            parallel = converter.is_parallel,
            strict = converter.is_strict,
            "converter ready"
        );
        Ok(converter)
    }

    /// Built-in dictionaries plus a custom override file.
    pub fn with_custom_dict(path: &Path) -> Result<Self, DictionaryError> {
        let table = TermTable::load(builtin_sources(&Region::ALL)?, Some(path))?;
        Ok(Self::new(table))
    }

    pub fn set_parallel(&mut self, is_parallel: bool) {
        self.is_parallel = is_parallel;
    }

    pub fn get_parallel(&self) -> bool {
        self.is_parallel
    }

    /// Whether [`findings`](Self::findings) includes overrides and chained targets.
    pub fn set_strict(&mut self, is_strict: bool) {
        self.is_strict = is_strict;
    }

    pub fn get_strict(&self) -> bool {
        self.is_strict
    }

    pub fn table(&self) -> &TermTable {
        &self.table
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Accepted edits for `text`, ordered by start.
    pub fn find_matches(&self, text: &str) -> Vec<Match<'_>> {
        self.find_matches_with_ignore(text, &[])
    }

    /// Accepted edits for `text`, skipping anything that touches `ignore`.
    pub fn find_matches_with_ignore(&self, text: &str, ignore: &[Span]) -> Vec<Match<'_>> {
        resolver::resolve(matcher::scan(&self.automaton, text), ignore)
    }

    /// Rewrites every accepted term in `text`.
    pub fn convert(&self, text: &str) -> String {
        self.convert_with_ignore(text, &[])
    }

    pub fn convert_with_ignore(&self, text: &str, ignore: &[Span]) -> String {
        let edits = self.find_matches_with_ignore(text, ignore);
        renderer::render(text, &edits)
    }

    /// Line and column of every accepted edit.
    pub fn locate(&self, text: &str) -> Vec<Location<'_>> {
        let edits = self.find_matches(text);
        renderer::locate(text, &edits)
    }

    /// Report-mode scan: located edits with context snippets.
    ///
    /// When every dictionary source contains a CJK ideograph, text without one
    /// is skipped outright.
    ///
    /// ```
    /// use zhtw::Converter;
    ///
    /// let zhtw = Converter::builtin().unwrap();
    /// let issues = zhtw.check("第一行\n软件在這裡");
    /// assert_eq!((issues[0].line, issues[0].column), (2, 1));
    /// assert_eq!(issues[0].target, "軟體");
    /// ```
    pub fn check(&self, text: &str) -> Vec<Issue<'_>> {
        self.check_with_ignore(text, &[])
    }

    pub fn check_with_ignore(&self, text: &str, ignore: &[Span]) -> Vec<Issue<'_>> {
        if self.cjk_prefilter && !contains_chinese(text) {
            return Vec::new();
        }

        let edits = self.find_matches_with_ignore(text, ignore);
        if edits.is_empty() {
            return Vec::new();
        }

        let index = CharIndex::new(text);
        renderer::locate(text, &edits)
            .into_iter()
            .map(|loc| Issue {
                line: loc.line,
                column: loc.column,
                source: loc.source,
                target: loc.target,
                context: index.context(loc.start, loc.end, DEFAULT_CONTEXT_RADIUS),
            })
            .collect()
    }

    pub fn has_matches(&self, text: &str) -> bool {
        !self.find_matches(text).is_empty()
    }

    pub fn count_matches(&self, text: &str) -> usize {
        self.find_matches(text).len()
    }

    /// Per-source counts of accepted edits.
    pub fn statistics(&self, text: &str) -> MatchStats<'_> {
        let mut stats = MatchStats::default();
        for m in self.find_matches(text) {
            stats.record(&m);
        }
        stats
    }

    /// Converts each text independently, preserving order.
    pub fn convert_batch<S>(&self, texts: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        if self.is_parallel {
            texts.par_iter().map(|t| self.convert(t.as_ref())).collect()
        } else {
            texts.iter().map(|t| self.convert(t.as_ref())).collect()
        }
    }

    /// [`check`](Self::check) over many texts, one result per input.
    pub fn check_batch<S>(&self, texts: &[S]) -> Vec<Vec<Issue<'_>>>
    where
        S: AsRef<str> + Sync,
    {
        if self.is_parallel {
            texts.par_iter().map(|t| self.check(t.as_ref())).collect()
        } else {
            texts.iter().map(|t| self.check(t.as_ref())).collect()
        }
    }

    /// Statistics summed over many texts.
    pub fn statistics_batch<S>(&self, texts: &[S]) -> MatchStats<'_>
    where
        S: AsRef<str> + Sync,
    {
        if self.is_parallel {
            texts
                .par_iter()
                .map(|t| self.statistics(t.as_ref()))
                .reduce(MatchStats::default, MatchStats::merge)
        } else {
            texts
                .iter()
                .map(|t| self.statistics(t.as_ref()))
                .fold(MatchStats::default(), MatchStats::merge)
        }
    }

    /// Dictionary findings; see [`validator::validate`].
    pub fn validate(&self, strict: bool) -> Vec<Finding> {
        validator::validate(&self.table, strict)
    }

    /// Dictionary findings at the configured strictness.
    pub fn findings(&self) -> Vec<Finding> {
        self.validate(self.is_strict)
    }
}

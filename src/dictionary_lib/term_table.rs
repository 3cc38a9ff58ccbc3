//! The merged term dictionary.
//!
//! [`TermTable`] folds an ordered list of [`TermSource`]s into one mapping from
//! source string to active target. Later sources win; every redefinition with a
//! different target is kept as a [`Conflict`] so the validator can tell a
//! dictionary bug (same category) from a deliberate override (different
//! category) without re-reading any file.

use std::collections::hash_map::Entry;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use super::term_source::{Origin, TermSource, CUSTOM_CATEGORY};
use crate::error::{DictionaryError, MalformedTermError};

/// One active dictionary entry.
///
/// `origin` indexes [`TermTable::origins`]; a higher index was loaded later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub source: String,
    pub target: String,
    pub origin: usize,
}

impl Term {
    /// `true` when the entry only guards its span and never changes text.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

/// A target together with the origin that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub target: String,
    pub origin: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Redefinition inside one category: a typo or duplicate.
    SameOrigin,
    /// A later category overriding an earlier one.
    CrossOrigin,
}

/// A key redefined with a different target during the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub source: String,
    pub kind: ConflictKind,
    pub previous: Provenance,
    pub replacement: Provenance,
}

impl Conflict {
    /// Cross-origin overrides are intentional precedence, not defects.
    #[inline]
    pub fn is_by_design(&self) -> bool {
        self.kind == ConflictKind::CrossOrigin
    }
}

/// Immutable, merged term dictionary.
///
/// Built once per run and shared read-only; the [`Automaton`](crate::automaton::Automaton)
/// is compiled from it.
#[derive(Debug, Default, Clone)]
pub struct TermTable {
    terms: Vec<Term>,
    index: FxHashMap<String, usize>,
    origins: Vec<Origin>,
    origin_sizes: Vec<usize>,
    conflicts: Vec<Conflict>,
    /// Longest source in characters.
    pub max_len: usize,
    /// Shortest source in characters (0 for an empty table).
    pub min_len: usize,
}

impl TermTable {
    /// Merges built-in sources and an optional custom dictionary file.
    ///
    /// The custom file is loaded last under the `custom` category, so its entries
    /// override every built-in one.
    pub fn load(
        mut sources: Vec<TermSource>,
        custom_path: Option<&Path>,
    ) -> Result<Self, DictionaryError> {
        if let Some(path) = custom_path {
            sources.push(TermSource::from_path(CUSTOM_CATEGORY, path)?);
        }
        Ok(Self::from_sources(sources)?)
    }

    /// Merges sources in order. Later sources win for the active target.
    ///
    /// Fails on an empty source string or when the active mappings form a cycle.
    pub fn from_sources(sources: Vec<TermSource>) -> Result<Self, MalformedTermError> {
        let mut table = TermTable::default();

        for source in sources {
            let origin_id = table.origins.len();
            debug!(origin = %source.origin, terms = source.len(), "merging dictionary source");
            table.origin_sizes.push(source.entries.len());
            table.origins.push(source.origin);

            for (key, target) in source.entries {
                if key.is_empty() {
                    return Err(MalformedTermError::EmptySource {
                        origin: table.origins[origin_id].to_string(),
                        target,
                    });
                }
                table.insert(key, target, origin_id);
            }
        }

        table.check_cycles()?;
        table.compute_lengths();

        debug!(
            terms = table.terms.len(),
            origins = table.origins.len(),
            conflicts = table.conflicts.len(),
            "term table ready"
        );
        Ok(table)
    }

    /// Single-origin table from in-memory pairs, mostly for tests and embedding.
    ///
    /// ```
    /// use zhtw::dictionary_lib::TermTable;
    ///
    /// let table = TermTable::from_pairs([("软件", "軟體"), ("用户", "使用者")]).unwrap();
    /// assert_eq!(table.get("用户"), Some("使用者"));
    /// assert_eq!(table.max_len, 2);
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, MalformedTermError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_sources(vec![TermSource::from_pairs(
            Origin::new("inline", "pairs"),
            pairs,
        )])
    }

    fn insert(&mut self, key: String, target: String, origin: usize) {
        match self.index.entry(key) {
            Entry::Vacant(e) => {
                let source = e.key().clone();
                e.insert(self.terms.len());
                self.terms.push(Term {
                    source,
                    target,
                    origin,
                });
            }
            Entry::Occupied(e) => {
                let term = &mut self.terms[*e.get()];
                if term.target == target {
                    // identical redefinition, nothing changes
                    return;
                }

                let kind = if self.origins[term.origin].category == self.origins[origin].category
                {
                    ConflictKind::SameOrigin
                } else {
                    ConflictKind::CrossOrigin
                };

                if kind == ConflictKind::SameOrigin {
                    warn!(
                        source = %term.source,
                        first = %self.origins[term.origin],
                        second = %self.origins[origin],
                        "same-origin redefinition"
                    );
                }

                let previous = Provenance {
                    target: std::mem::replace(&mut term.target, target.clone()),
                    origin: std::mem::replace(&mut term.origin, origin),
                };
                self.conflicts.push(Conflict {
                    source: term.source.clone(),
                    kind,
                    previous,
                    replacement: Provenance { target, origin },
                });
            }
        }
    }

    /// Rejects any chain of active mappings that returns to its start.
    ///
    /// Each non-identity term has at most one successor (the term keyed by its
    /// target), so the mappings form a functional graph and one colouring pass
    /// finds every cycle.
    fn check_cycles(&self) -> Result<(), MalformedTermError> {
        const UNSEEN: u8 = 0;
        const ON_PATH: u8 = 1;
        const DONE: u8 = 2;

        let successor = |i: usize| -> Option<usize> {
            let term = &self.terms[i];
            if term.is_identity() {
                None
            } else {
                self.index.get(term.target.as_str()).copied()
            }
        };

        let mut state = vec![UNSEEN; self.terms.len()];
        let mut path = Vec::new();

        for start in 0..self.terms.len() {
            if state[start] != UNSEEN {
                continue;
            }
            path.clear();
            let mut current = Some(start);

            while let Some(i) = current {
                match state[i] {
                    UNSEEN => {
                        state[i] = ON_PATH;
                        path.push(i);
                        current = successor(i);
                    }
                    ON_PATH => {
                        let from = path.iter().position(|&p| p == i).unwrap_or(0);
                        let mut cycle: Vec<String> = path[from..]
                            .iter()
                            .map(|&p| self.terms[p].source.clone())
                            .collect();
                        cycle.push(self.terms[i].source.clone());
                        return Err(MalformedTermError::CircularMapping { cycle });
                    }
                    _ => break,
                }
            }

            for &p in &path {
                state[p] = DONE;
            }
        }

        Ok(())
    }

    fn compute_lengths(&mut self) {
        let mut max_len = 0usize;
        let mut min_len = usize::MAX;
        for term in &self.terms {
            let len = term.source.chars().count();
            max_len = max_len.max(len);
            min_len = min_len.min(len);
        }
        self.max_len = max_len;
        self.min_len = if min_len == usize::MAX { 0 } else { min_len };
    }

    /// Active target for `source`.
    #[inline]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.term(source).map(|t| t.target.as_str())
    }

    /// Active entry for `source`, with provenance.
    #[inline]
    pub fn term(&self, source: &str) -> Option<&Term> {
        self.index.get(source).map(|&i| &self.terms[i])
    }

    #[inline]
    pub fn contains(&self, source: &str) -> bool {
        self.index.contains_key(source)
    }

    /// Active entries in first-definition order.
    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Origins in load order.
    #[inline]
    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    #[inline]
    pub fn origin(&self, id: usize) -> &Origin {
        &self.origins[id]
    }

    /// Every redefinition with a differing target, in merge order.
    #[inline]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Entries each origin contributed, before overrides, in load order.
    pub fn origin_counts(&self) -> Vec<(&Origin, usize)> {
        self.origins
            .iter()
            .zip(self.origin_sizes.iter().copied())
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(category: &str, name: &str, pairs: &[(&str, &str)]) -> TermSource {
        TermSource::from_pairs(Origin::new(category, name), pairs.iter().copied())
    }

    #[test]
    fn later_source_wins() {
        let table = TermTable::from_sources(vec![
            src("cn", "base", &[("文档", "文件")]),
            src("custom", "mine", &[("文档", "檔案")]),
        ])
        .unwrap();
        assert_eq!(table.get("文档"), Some("檔案"));
        assert_eq!(table.origin(table.term("文档").unwrap().origin).category, "custom");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn classifies_same_and_cross_origin_conflicts() {
        let table = TermTable::from_sources(vec![
            src("cn", "a", &[("文档", "文件")]),
            src("cn", "b", &[("文档", "文檔")]),
            src("hk", "base", &[("文档", "檔案")]),
        ])
        .unwrap();

        let kinds: Vec<_> = table.conflicts().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConflictKind::SameOrigin, ConflictKind::CrossOrigin]);

        let same = &table.conflicts()[0];
        assert_eq!(same.previous.target, "文件");
        assert_eq!(same.replacement.target, "文檔");
        assert!(!same.is_by_design());
        assert!(table.conflicts()[1].is_by_design());
    }

    #[test]
    fn repeated_key_in_one_file_is_same_origin() {
        let source = TermSource::from_json_str(
            Origin::new("cn", "base"),
            r#"{"文档": "文件", "文档": "文檔"}"#,
        )
        .unwrap();
        let table = TermTable::from_sources(vec![source]).unwrap();

        assert_eq!(table.get("文档"), Some("文檔"));
        assert_eq!(table.conflicts().len(), 1);
        let conflict = &table.conflicts()[0];
        assert_eq!(conflict.kind, ConflictKind::SameOrigin);
        assert_eq!(conflict.previous.origin, conflict.replacement.origin);
    }

    #[test]
    fn identical_redefinition_is_not_a_conflict() {
        let table = TermTable::from_sources(vec![
            src("cn", "base", &[("硬件", "硬體")]),
            src("hk", "base", &[("硬件", "硬體")]),
        ])
        .unwrap();
        assert!(table.conflicts().is_empty());
        assert_eq!(table.term("硬件").unwrap().origin, 0);
    }

    #[test]
    fn empty_source_is_malformed() {
        let err = TermTable::from_sources(vec![src("cn", "base", &[("", "空")])]).unwrap_err();
        assert_eq!(
            err,
            MalformedTermError::EmptySource {
                origin: "cn/base".to_string(),
                target: "空".to_string()
            }
        );
    }

    #[test]
    fn two_term_cycle_is_malformed() {
        let err = TermTable::from_pairs([("甲", "乙"), ("乙", "甲")]).unwrap_err();
        match err {
            MalformedTermError::CircularMapping { cycle } => {
                assert_eq!(cycle.first(), cycle.last());
                assert_eq!(cycle.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn longer_cycle_is_malformed() {
        let err = TermTable::from_pairs([("甲", "乙"), ("乙", "丙"), ("丙", "甲")]).unwrap_err();
        assert!(matches!(err, MalformedTermError::CircularMapping { .. }));
    }

    #[test]
    fn chains_and_identities_are_accepted() {
        let table =
            TermTable::from_pairs([("准许", "准許"), ("准許", "准許"), ("甲", "乙"), ("乙", "丙")])
                .unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.term("准許").unwrap().is_identity());
    }

    #[test]
    fn tracks_lengths_and_origin_counts() {
        let table = TermTable::from_sources(vec![
            src("cn", "base", &[("后", "後"), ("方便面", "泡麵")]),
            src("hk", "base", &[("的士", "計程車")]),
        ])
        .unwrap();
        assert_eq!(table.max_len, 3);
        assert_eq!(table.min_len, 1);

        let counts: Vec<_> = table
            .origin_counts()
            .into_iter()
            .map(|(o, n)| (o.to_string(), n))
            .collect();
        assert_eq!(counts, vec![("cn/base".to_string(), 2), ("hk/base".to_string(), 1)]);
    }

    #[test]
    fn empty_table() {
        let table = TermTable::from_sources(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!((table.min_len, table.max_len), (0, 0));
    }
}

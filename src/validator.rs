//! Offline consistency checks over a [`TermTable`].
//!
//! Nothing here looks at input text. Findings are plain data, sorted so that two
//! runs over the same dictionaries print the same report.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;

use crate::dictionary_lib::{ConflictKind, Origin, Provenance, TermTable};

/// A target as defined by one origin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Definition {
    pub target: String,
    pub origin: Origin,
}

impl Definition {
    fn from_provenance(table: &TermTable, p: &Provenance) -> Self {
        Self {
            target: p.target.clone(),
            origin: table.origin(p.origin).clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// One category defines a key twice with different targets.
    SameOriginDuplicate {
        source: String,
        previous: Definition,
        replacement: Definition,
    },
    /// A later category overrides an earlier one. Expected; shown under `strict`.
    CrossOriginOverride {
        source: String,
        overridden: Definition,
        winner: Definition,
    },
    /// An identity entry that no convertible term touches and no longer entry
    /// contains, so it protects nothing.
    OrphanIdentity { source: String, origin: Origin },
    /// A target that is itself a convertible key: converting twice changes the
    /// text again. Shown under `strict`.
    ChainedTarget {
        source: String,
        target: String,
        next: String,
        origin: Origin,
    },
}

impl Finding {
    /// Whether the finding indicates a dictionary defect.
    pub fn is_error(&self) -> bool {
        matches!(self, Finding::SameOriginDuplicate { .. })
    }

    pub fn source(&self) -> &str {
        match self {
            Finding::SameOriginDuplicate { source, .. }
            | Finding::CrossOriginOverride { source, .. }
            | Finding::OrphanIdentity { source, .. }
            | Finding::ChainedTarget { source, .. } => source,
        }
    }
}

/// Proper substrings of dictionary sources, split by position.
///
/// `inner` covers every source, identities included; the other sets cover
/// convertible sources only.
struct Fragments<'t> {
    sources: FxHashSet<&'t str>,
    prefixes: FxHashSet<&'t str>,
    suffixes: FxHashSet<&'t str>,
    inner: FxHashSet<&'t str>,
}

impl<'t> Fragments<'t> {
    fn new(table: &'t TermTable) -> Self {
        let mut f = Fragments {
            sources: FxHashSet::default(),
            prefixes: FxHashSet::default(),
            suffixes: FxHashSet::default(),
            inner: FxHashSet::default(),
        };

        for term in table.terms() {
            let s = term.source.as_str();
            let convertible = !term.is_identity();
            if convertible {
                f.sources.insert(s);
            }

            let bounds = char_bounds(s);
            let last = bounds.len() - 1;
            for i in 0..=last {
                for j in i + 1..=last {
                    if i == 0 && j == last {
                        continue;
                    }
                    let piece = &s[bounds[i]..bounds[j]];
                    f.inner.insert(piece);
                    if convertible && i == 0 {
                        f.prefixes.insert(piece);
                    }
                    if convertible && j == last {
                        f.suffixes.insert(piece);
                    }
                }
            }
        }
        f
    }

    /// `true` when some convertible source lies inside `s` or overlaps one of
    /// its ends, or when any longer source contains `s`.
    fn touches(&self, s: &str) -> bool {
        if self.inner.contains(s) {
            return true;
        }

        let bounds = char_bounds(s);
        let last = bounds.len() - 1;
        for i in 0..last {
            for j in i + 1..=last {
                let piece = &s[bounds[i]..bounds[j]];
                if (i, j) != (0, last) && self.sources.contains(piece) {
                    return true;
                }
                if i == 0 && j < last && self.suffixes.contains(piece) {
                    return true;
                }
                if j == last && i > 0 && self.prefixes.contains(piece) {
                    return true;
                }
            }
        }
        false
    }
}

fn char_bounds(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(s.len()))
        .collect()
}

/// Checks `table` and returns its findings, sorted.
///
/// Same-origin duplicates and orphaned identities are always reported;
/// cross-origin overrides and chained targets only when `strict` is set.
///
/// ```
/// use zhtw::dictionary_lib::{Origin, TermSource, TermTable};
/// use zhtw::validator::{validate, Finding};
///
/// let table = TermTable::from_sources(vec![
///     TermSource::from_pairs(Origin::new("cn", "a"), [("文档", "文件")]),
///     TermSource::from_pairs(Origin::new("cn", "b"), [("文档", "文檔")]),
/// ])
/// .unwrap();
/// let findings = validate(&table, false);
/// assert!(matches!(findings[0], Finding::SameOriginDuplicate { .. }));
/// ```
pub fn validate(table: &TermTable, strict: bool) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut overridden: FxHashSet<&str> = FxHashSet::default();

    for conflict in table.conflicts() {
        overridden.insert(conflict.source.as_str());
        let previous = Definition::from_provenance(table, &conflict.previous);
        let replacement = Definition::from_provenance(table, &conflict.replacement);

        match conflict.kind {
            ConflictKind::SameOrigin => findings.push(Finding::SameOriginDuplicate {
                source: conflict.source.clone(),
                previous,
                replacement,
            }),
            ConflictKind::CrossOrigin if strict => findings.push(Finding::CrossOriginOverride {
                source: conflict.source.clone(),
                overridden: previous,
                winner: replacement,
            }),
            ConflictKind::CrossOrigin => {}
        }
    }

    let fragments = Fragments::new(table);
    for term in table.terms() {
        if term.is_identity() {
            // an identity that replaced a mapping disables it on purpose
            if !overridden.contains(term.source.as_str()) && !fragments.touches(&term.source) {
                findings.push(Finding::OrphanIdentity {
                    source: term.source.clone(),
                    origin: table.origin(term.origin).clone(),
                });
            }
        } else if strict {
            if let Some(next) = table.term(&term.target).filter(|t| !t.is_identity()) {
                findings.push(Finding::ChainedTarget {
                    source: term.source.clone(),
                    target: term.target.clone(),
                    next: next.target.clone(),
                    origin: table.origin(term.origin).clone(),
                });
            }
        }
    }

    findings.sort();
    debug!(findings = findings.len(), strict, "validation finished");
    findings
}

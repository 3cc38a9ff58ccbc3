//! Reduction of raw matches to a non-overlapping edit list.
//!
//! [`resolve`] applies, in order:
//!
//! 1. **Ignore filtering**: a match touching any ignore range is dropped.
//! 2. **Identity protection**: an identity match (`source == target`) protects its
//!    span. A non-identity match inside that span, or crossing one of its
//!    boundaries, is dropped. A match covering the whole span is a longer term and
//!    survives.
//! 3. **Greedy sweep**: candidates sorted by start, longest first at equal start;
//!    each one is accepted if it starts at or after the end of the last accepted
//!    one. Identity matches take part and occupy their span.
//!
//! The accepted identities change nothing and are left out of the result.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::matcher::Match;

/// Half-open range of character offsets, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Sorted, merged, non-empty ranges for overlap lookups.
struct IgnoreSet(Vec<Span>);

impl IgnoreSet {
    fn new(ranges: &[Span]) -> Self {
        let mut sorted: Vec<Span> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
        sorted.sort_unstable();

        let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }
        IgnoreSet(merged)
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        let i = self.0.partition_point(|r| r.end <= start);
        self.0.get(i).is_some_and(|r| r.start < end)
    }
}

/// Identity spans sorted by start, with running maxima of their ends.
struct Protected {
    spans: Vec<(usize, usize)>,
    /// `max_end[i]` is the largest end among `spans[..i]`.
    max_end: Vec<usize>,
}

impl Protected {
    fn new(matches: &[Match<'_>]) -> Self {
        let mut spans: Vec<(usize, usize)> = matches
            .iter()
            .filter(|m| m.is_identity)
            .map(|m| (m.start, m.end))
            .collect();
        spans.sort_unstable();

        let mut max_end = Vec::with_capacity(spans.len() + 1);
        max_end.push(0);
        let mut running = 0;
        for &(_, end) in &spans {
            running = running.max(end);
            max_end.push(running);
        }

        Protected { spans, max_end }
    }

    /// `true` when some protected span overlaps `m` without lying inside it.
    fn blocks(&self, m: &Match<'_>) -> bool {
        if self.spans.is_empty() {
            return false;
        }
        let k = self.spans.partition_point(|&(s, _)| s < m.start);
        // starts before m and reaches into it
        if self.max_end[k] > m.start {
            return true;
        }
        // starts inside m and runs past its end
        self.spans[k..]
            .iter()
            .take_while(|&&(s, _)| s < m.end)
            .any(|&(_, e)| e > m.end)
    }
}

/// Resolves raw matches into the accepted edit list, ordered by start.
///
/// ```
/// use zhtw::automaton::Automaton;
/// use zhtw::matcher::scan;
/// use zhtw::resolver::resolve;
///
/// let ac = Automaton::from_pairs([("皇后", "皇后"), ("后", "後")]);
/// assert!(resolve(scan(&ac, "皇后"), &[]).is_empty());
/// assert_eq!(resolve(scan(&ac, "之后"), &[]).len(), 1);
/// ```
pub fn resolve<'a>(matches: Vec<Match<'a>>, ignore: &[Span]) -> Vec<Match<'a>> {
    let raw = matches.len();
    let ignore = IgnoreSet::new(ignore);

    let mut candidates: Vec<Match<'a>> = if ignore.0.is_empty() {
        matches
    } else {
        matches
            .into_iter()
            .filter(|m| !ignore.overlaps(m.start, m.end))
            .collect()
    };

    let protected = Protected::new(&candidates);
    candidates.retain(|m| m.is_identity || !protected.blocks(m));

    candidates.sort_unstable_by_key(|m| (m.start, Reverse(m.len())));

    let mut cursor = 0usize;
    let mut accepted = Vec::with_capacity(candidates.len());
    for m in candidates {
        if m.start >= cursor {
            cursor = m.end;
            if !m.is_identity {
                accepted.push(m);
            }
        }
    }

    trace!(raw, accepted = accepted.len(), "matches resolved");
    accepted
}

//! Raw match collection.

use serde::Serialize;
use tracing::trace;

use crate::automaton::{Automaton, Pattern};

/// One occurrence of a dictionary term.
///
/// `start..end` is a half-open range of **character** offsets into the scanned
/// text. `source` and `target` borrow from the [`Automaton`] that produced the
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Match<'a> {
    pub start: usize,
    pub end: usize,
    pub source: &'a str,
    pub target: &'a str,
    pub is_identity: bool,
}

impl<'a> Match<'a> {
    pub fn new(start: usize, end: usize, source: &'a str, target: &'a str) -> Self {
        debug_assert!(start < end);
        Self {
            start,
            end,
            source,
            target,
            is_identity: source == target,
        }
    }

    fn from_pattern(end: usize, pattern: &'a Pattern) -> Self {
        Self {
            start: end - pattern.char_len,
            end,
            source: &*pattern.source,
            target: &*pattern.target,
            is_identity: pattern.is_identity(),
        }
    }

    /// Length in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `true` when the two half-open ranges share at least one character.
    #[inline]
    pub fn overlaps(&self, other: &Match<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Every occurrence of every pattern in `text`, overlapping ones included.
///
/// Sorted by ascending `end`; matches sharing an end come longest first.
///
/// ```
/// use zhtw::automaton::Automaton;
/// use zhtw::matcher::scan;
///
/// let ac = Automaton::from_pairs([("皇后", "皇后"), ("后", "後")]);
/// let found: Vec<_> = scan(&ac, "皇后").iter().map(|m| (m.start, m.source)).collect();
/// assert_eq!(found, vec![(0, "皇后"), (1, "后")]);
/// ```
pub fn scan<'a>(automaton: &'a Automaton, text: &str) -> Vec<Match<'a>> {
    let mut matches = Vec::new();
    automaton.for_each_match(text, |end, pattern| {
        matches.push(Match::from_pattern(end, pattern));
    });
    trace!(matches = matches.len(), "scan finished");
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_occurrence() {
        let ac = Automaton::from_pairs([("软件", "軟體"), ("件", "件"), ("用户", "使用者")]);
        let found = scan(&ac, "用户使用软件");
        assert_eq!(
            found,
            vec![
                Match::new(0, 2, "用户", "使用者"),
                Match::new(4, 6, "软件", "軟體"),
                Match::new(5, 6, "件", "件"),
            ]
        );
        assert!(found[2].is_identity);
        assert!(found[1].overlaps(&found[2]));
        assert!(!found[0].overlaps(&found[1]));
    }

    #[test]
    fn repeated_occurrences() {
        let ac = Automaton::from_pairs([("后", "後")]);
        let starts: Vec<_> = scan(&ac, "后后x后").iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 1, 3]);
    }

    #[test]
    fn empty_text() {
        let ac = Automaton::from_pairs([("后", "後")]);
        assert!(scan(&ac, "").is_empty());
    }

    #[test]
    fn match_length() {
        let m = Match::new(3, 6, "方便面", "泡麵");
        assert_eq!(m.len(), 3);
        assert!(!m.is_empty());
        assert!(!m.is_identity);
    }
}

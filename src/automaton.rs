//! Multi-pattern automaton over `char`s (Aho–Corasick).
//!
//! [`Automaton`] is compiled once from a [`TermTable`] and then shared read-only
//! by every scan. A scan is one left-to-right pass: each input character costs
//! one amortised transition plus one step per reported match, whatever the size
//! of the dictionary.
//!
//! ## Layout
//!
//! - A trie of source strings, one [`Node`] per distinct prefix.
//! - **Failure links**: the longest proper suffix of a node's prefix that is also
//!   a prefix in the trie; followed when no edge matches.
//! - **Dictionary links**: the nearest failure-chain node that ends a pattern, so
//!   every pattern ending at a position is enumerated without walking nodes that
//!   end nothing.
//! - **Dense root table**: the root's edges are also stored in a 65,536-entry
//!   array indexed by BMP code point (astral starters fall back to a sparse map).
//!   Outside a partial match the scanner sits at the root, so this is the hot
//!   transition and it costs one array load.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::dictionary_lib::TermTable;

const ROOT: u32 = 0;
const BMP_SIZE: usize = 0x10000;

/// One compiled dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub source: Box<str>,
    pub target: Box<str>,
    /// Source length in characters.
    pub char_len: usize,
}

impl Pattern {
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

#[derive(Debug, Default, Clone)]
struct Node {
    goto: FxHashMap<char, u32>,
    fail: u32,
    /// Pattern whose source is exactly this node's prefix.
    output: Option<u32>,
    /// Nearest node on the failure chain with an `output`.
    dict_link: Option<u32>,
}

/// Read-only pattern automaton; `Send + Sync`, cheap to share behind a reference.
#[derive(Debug, Clone)]
pub struct Automaton {
    nodes: Vec<Node>,
    patterns: Vec<Pattern>,
    root_bmp: Vec<u32>,
    root_astral: FxHashMap<char, u32>,
    max_len: usize,
}

impl Automaton {
    /// Compiles every source string of `table`.
    pub fn build(table: &TermTable) -> Self {
        Self::from_pairs(
            table
                .terms()
                .iter()
                .map(|t| (t.source.as_str(), t.target.as_str())),
        )
    }

    /// Compiles `(source, target)` pairs directly.
    ///
    /// Empty sources are skipped; for a repeated source the first pair wins.
    ///
    /// ```
    /// use zhtw::automaton::Automaton;
    ///
    /// let ac = Automaton::from_pairs([("软件", "軟體"), ("件", "件")]);
    /// let mut ends = Vec::new();
    /// ac.for_each_match("软件", |end, p| ends.push((end, p.source.to_string())));
    /// assert_eq!(ends, vec![(2, "软件".to_string()), (2, "件".to_string())]);
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut ac = Automaton {
            nodes: vec![Node::default()],
            patterns: Vec::new(),
            root_bmp: Vec::new(),
            root_astral: FxHashMap::default(),
            max_len: 0,
        };

        for (source, target) in pairs {
            ac.insert(source, target);
        }
        ac.link();
        ac.index_root();

        debug!(
            patterns = ac.patterns.len(),
            nodes = ac.nodes.len(),
            max_len = ac.max_len,
            "pattern automaton built"
        );
        ac
    }

    fn insert(&mut self, source: &str, target: &str) {
        if source.is_empty() {
            return;
        }

        let mut current = ROOT;
        let mut char_len = 0usize;
        for c in source.chars() {
            char_len += 1;
            current = match self.nodes[current as usize].goto.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len() as u32;
                    self.nodes.push(Node::default());
                    self.nodes[current as usize].goto.insert(c, next);
                    next
                }
            };
        }

        let node = &mut self.nodes[current as usize];
        if node.output.is_some() {
            return;
        }
        node.output = Some(self.patterns.len() as u32);
        self.patterns.push(Pattern {
            source: source.into(),
            target: target.into(),
            char_len,
        });
        self.max_len = self.max_len.max(char_len);
    }

    /// Breadth-first pass computing failure and dictionary links.
    fn link(&mut self) {
        let mut queue = std::collections::VecDeque::new();

        let root_children: Vec<u32> = self.nodes[ROOT as usize].goto.values().copied().collect();
        for child in root_children {
            self.nodes[child as usize].fail = ROOT;
            queue.push_back(child);
        }

        while let Some(current) = queue.pop_front() {
            let children: Vec<(char, u32)> = self.nodes[current as usize]
                .goto
                .iter()
                .map(|(&c, &n)| (c, n))
                .collect();

            for (c, child) in children {
                queue.push_back(child);

                let mut f = self.nodes[current as usize].fail;
                let fail = loop {
                    if let Some(&next) = self.nodes[f as usize].goto.get(&c) {
                        break next;
                    }
                    if f == ROOT {
                        break ROOT;
                    }
                    f = self.nodes[f as usize].fail;
                };

                let fail_node = &self.nodes[fail as usize];
                let dict_link = if fail_node.output.is_some() {
                    Some(fail)
                } else {
                    fail_node.dict_link
                };

                let node = &mut self.nodes[child as usize];
                node.fail = fail;
                node.dict_link = dict_link;
            }
        }
    }

    fn index_root(&mut self) {
        let mut bmp = vec![ROOT; BMP_SIZE];
        for (&c, &next) in &self.nodes[ROOT as usize].goto {
            let u = c as u32 as usize;
            if u < BMP_SIZE {
                bmp[u] = next;
            } else {
                self.root_astral.insert(c, next);
            }
        }
        self.root_bmp = bmp;
    }

    #[inline(always)]
    fn child(&self, state: u32, c: char) -> Option<u32> {
        if state == ROOT {
            let u = c as u32 as usize;
            let next = if u < BMP_SIZE {
                self.root_bmp[u]
            } else {
                self.root_astral.get(&c).copied().unwrap_or(ROOT)
            };
            (next != ROOT).then_some(next)
        } else {
            self.nodes[state as usize].goto.get(&c).copied()
        }
    }

    #[inline]
    fn next_state(&self, mut state: u32, c: char) -> u32 {
        loop {
            if let Some(next) = self.child(state, c) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = self.nodes[state as usize].fail;
        }
    }

    /// Calls `f(end, pattern)` for every occurrence of every pattern in `text`.
    ///
    /// `end` is the exclusive end offset in characters. Occurrences arrive in
    /// ascending `end` order; among those sharing an end, longest first.
    pub fn for_each_match<'s, F>(&'s self, text: &str, mut f: F)
    where
        F: FnMut(usize, &'s Pattern),
    {
        if self.patterns.is_empty() {
            return;
        }

        let mut state = ROOT;
        for (i, c) in text.chars().enumerate() {
            state = self.next_state(state, c);

            let node = &self.nodes[state as usize];
            let mut hit = if node.output.is_some() {
                Some(state)
            } else {
                node.dict_link
            };

            while let Some(n) = hit {
                let node = &self.nodes[n as usize];
                if let Some(p) = node.output {
                    f(i + 1, &self.patterns[p as usize]);
                }
                hit = node.dict_link;
            }
        }
    }

    #[inline]
    pub fn pattern(&self, id: usize) -> &Pattern {
        &self.patterns[id]
    }

    #[inline]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Trie size, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest pattern in characters.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

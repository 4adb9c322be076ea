//! Label trie for exact-match and prefix lookup (§4.2).
//!
//! A direct generalization of the teacher's mapping trie: an arena of nodes
//! connected by lazily-created edges, with a terminal marker at the end of
//! each inserted sequence. Keyed on uppercase `char`s instead of raw key
//! tokens, and the terminal payload is a small list of indices (normally
//! size 1 — a generator producing duplicate labels is a bug, but the trie
//! tolerates it) rather than a single mapping index.

use smallvec::SmallVec;

#[derive(Debug, Clone)]
struct Edge {
    ch: char,
    next: usize,
}

#[derive(Debug, Clone, Default)]
struct Node {
    terminal: SmallVec<[usize; 1]>,
    edges: SmallVec<[Edge; 4]>,
}

/// Trie over uppercase label strings. Must not be mutated after the owning
/// collection finishes inserting (§4.2: "must not be mutated after the
/// collection is built") — enforced by convention, not the type system, the
/// same way `MappingTrie::build` consumes its specs up front.
#[derive(Debug)]
pub struct LabelTrie {
    nodes: Vec<Node>,
}

impl Default for LabelTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Insert `label` pointing at `index`. Idempotent: inserting the same
    /// `(label, index)` pair twice leaves the trie unchanged.
    pub fn insert(&mut self, label: &str, index: usize) {
        let mut cur = 0usize;
        for ch in label.chars().map(|c| c.to_ascii_uppercase()) {
            cur = self.edge_or_create(cur, ch);
        }
        if !self.nodes[cur].terminal.contains(&index) {
            self.nodes[cur].terminal.push(index);
        }
    }

    fn edge_or_create(&mut self, cur: usize, ch: char) -> usize {
        if let Some(e) = self.nodes[cur].edges.iter().find(|e| e.ch == ch) {
            return e.next;
        }
        let new_idx = self.nodes.len();
        self.nodes.push(Node::default());
        self.nodes[cur].edges.push(Edge { ch, next: new_idx });
        new_idx
    }

    fn walk(&self, prefix: &str) -> Option<usize> {
        let mut cur = 0usize;
        for ch in prefix.chars().map(|c| c.to_ascii_uppercase()) {
            let edge = self.nodes[cur].edges.iter().find(|e| e.ch == ch)?;
            cur = edge.next;
        }
        Some(cur)
    }

    /// Exact-label lookup. Empty result and "no such label" are the same thing.
    pub fn find_exact(&self, label: &str) -> &[usize] {
        match self.walk(label) {
            Some(node) => self.nodes[node].terminal.as_slice(),
            None => &[],
        }
    }

    /// DFS-collect every terminal index reachable from `prefix`. Empty prefix
    /// returns every inserted index (§4.2).
    pub fn filter_by_prefix(&self, prefix: &str) -> Vec<usize> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            out.extend(self.nodes[node].terminal.iter().copied());
            for edge in &self.nodes[node].edges {
                stack.push(edge.next);
            }
        }
        out
    }
}

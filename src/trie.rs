//! Prefix-tree index from terms to payloads.
//!
//! Node-per-symbol arena trie. A payload's term is the path from the root
//! to its node; whole terms are never stored at leaves. Nodes are retained
//! after a payload is cleared so later insertions along the same path stay
//! cheap.

use crate::symbol::Symbol;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Identifier of a trie node. Stable for the lifetime of the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node<P> {
    children: HashMap<Symbol, NodeId>,
    payload: Option<P>,
}

impl<P> Node<P> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            payload: None,
        }
    }
}

/// Arena-backed trie keyed by symbol sequences, with at most one payload
/// per node.
#[derive(Debug, Clone)]
pub struct Trie<P> {
    nodes: Vec<Node<P>>,
}

impl<P: Copy> Trie<P> {
    /// Create an empty trie with just the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }

    /// The root node, spelling the empty term.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Step from `node` along `sym`, if such a child exists.
    pub fn child(&self, node: NodeId, sym: &Symbol) -> Option<NodeId> {
        self.nodes[node.index()].children.get(sym).copied()
    }

    /// Payload stored at `node`.
    pub fn payload(&self, node: NodeId) -> Option<P> {
        self.nodes[node.index()].payload
    }

    /// Walk as far as the key's symbols have matching children. Returns the
    /// deepest node reached and the number of symbols consumed.
    pub fn longest_prefix(&self, key: &[Symbol]) -> (NodeId, usize) {
        let mut node = self.root();
        let mut consumed = 0;
        for sym in key {
            match self.child(node, sym) {
                Some(next) => {
                    node = next;
                    consumed += 1;
                }
                None => break,
            }
        }
        (node, consumed)
    }

    /// Payload at exactly `key`, if present.
    pub fn get(&self, key: &[Symbol]) -> Option<P> {
        let (node, consumed) = self.longest_prefix(key);
        if consumed == key.len() {
            self.payload(node)
        } else {
            None
        }
    }

    /// The deepest payload-bearing prefix of `key`: returns the number of
    /// symbols that prefix spans and its payload. A payload at the root
    /// (the empty term) is never reported.
    pub fn longest_match(&self, key: &[Symbol]) -> Option<(usize, P)> {
        let mut node = self.root();
        let mut best = None;
        for (depth, sym) in key.iter().enumerate() {
            match self.child(node, sym) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(payload) = self.payload(node) {
                best = Some((depth + 1, payload));
            }
        }
        best
    }

    /// Store `payload` at `key`, creating intermediate nodes as needed.
    /// Returns the payload previously stored there.
    pub fn insert(&mut self, key: &[Symbol], payload: P) -> Option<P> {
        let mut node = self.root();
        for sym in key {
            let next = self.nodes[node.index()].children.get(sym).copied();
            node = match next {
                Some(id) => id,
                None => {
                    let id = NodeId(self.nodes.len() as u32);
                    self.nodes.push(Node::new());
                    self.nodes[node.index()].children.insert(*sym, id);
                    id
                }
            };
        }
        self.nodes[node.index()].payload.replace(payload)
    }

    /// Clear the payload at `key`, returning it. Nodes are retained.
    pub fn remove(&mut self, key: &[Symbol]) -> Option<P> {
        let (node, consumed) = self.longest_prefix(key);
        if consumed == key.len() {
            self.nodes[node.index()].payload.take()
        } else {
            None
        }
    }

    /// Borrowed view of the subtree reached by `prefix`, or None if no such
    /// path exists.
    pub fn subtree(&self, prefix: &[Symbol]) -> Option<SubTrie<'_, P>> {
        let (node, consumed) = self.longest_prefix(prefix);
        if consumed == prefix.len() {
            Some(self.subtree_at(node))
        } else {
            None
        }
    }

    /// Borrowed view of the subtree rooted at `node`.
    pub fn subtree_at(&self, node: NodeId) -> SubTrie<'_, P> {
        SubTrie { trie: self, root: node }
    }
}

impl<P: Copy> Default for Trie<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of a trie rooted at an interior node.
pub struct SubTrie<'a, P> {
    trie: &'a Trie<P>,
    root: NodeId,
}

impl<'a, P: Copy> SubTrie<'a, P> {
    /// The node this view is rooted at.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Visit every payload in the subtree. The callback receives the path
    /// suffix from the view's root (empty for the root's own payload) and
    /// the payload.
    pub fn for_each_payload<F>(&self, mut action: F)
    where
        F: FnMut(&[Symbol], P),
    {
        let mut path: SmallVec<[Symbol; 8]> = SmallVec::new();
        self.visit(self.root, &mut path, &mut action);
    }

    fn visit<F>(&self, node: NodeId, path: &mut SmallVec<[Symbol; 8]>, action: &mut F)
    where
        F: FnMut(&[Symbol], P),
    {
        if let Some(payload) = self.trie.payload(node) {
            action(path, payload);
        }
        for (sym, child) in self.trie.nodes[node.index()].children.iter() {
            path.push(*sym);
            self.visit(*child, path, action);
            path.pop();
        }
    }
}

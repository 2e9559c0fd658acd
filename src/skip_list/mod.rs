//! Skip list with deterministic levels and doubling rebuilds.
//!
//! Nodes live in an arena and link to each other by index. The head and
//! tail sentinels span every level, so each level is a chain from head to
//! tail in strictly increasing key order:
//!
//! ```text
//! Level 2: HEAD ----------------------------> 4 ---------> TAIL
//! Level 1: HEAD ----------> 2 --------------> 4 ---------> TAIL
//! Level 0: HEAD -> 1 -----> 2 -----> 3 -----> 4 -----> 5 -> TAIL
//! ```
//!
//! Callers choose each node's level on insert. Once the node count outgrows
//! the height budget (`1 + log2(n) > max_level`), the whole list is rebuilt
//! at double height with levels assigned by position: the `i`th node (from
//! 1) gets the number of trailing zero bits of `i`, so level `L` holds
//! exactly `floor(n / 2^L)` nodes. Height never shrinks.
//!
//! Rebuilding discards every node, so a [`NodeId`] is only good until the
//! next mutation.

pub mod levels;
mod search;

pub use search::SearchTrace;
pub use search::Step;

use smallvec::SmallVec;
use smallvec::smallvec;

use crate::config::Config;
use crate::error::Error;
use crate::key::Key;

/// Handle to a node in the list's arena.
pub type NodeId = u32;

/// "No successor": every slot of the tail's pointer array.
pub const NULL: NodeId = NodeId::MAX;

type Pointers = SmallVec<[NodeId; 4]>;

/// A single entry. Sentinels carry no value.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    key: Key<K>,
    value: Option<V>,
    top_level: usize,
    /// `next[L]` is the successor on level `L`, for `L` in `0..=top_level`.
    next: Pointers,
}

impl<K, V> Node<K, V> {
    fn new(key: Key<K>, value: Option<V>, top_level: usize, fill: NodeId) -> Self {
        return Node {
            key,
            value,
            top_level,
            next: smallvec![fill; top_level + 1],
        };
    }

    pub fn key(&self) -> &Key<K> {
        return &self.key;
    }

    pub fn value(&self) -> Option<&V> {
        return self.value.as_ref();
    }

    /// The highest level this node is linked into.
    pub fn top_level(&self) -> usize {
        return self.top_level;
    }

    /// Successor on `level`, or `None` past the tail or above this node.
    pub fn next(&self, level: usize) -> Option<NodeId> {
        return self.next.get(level).copied().filter(|&id| id != NULL);
    }

    /// The full forward-pointer array, `NULL` where there is no successor.
    pub fn pointers(&self) -> &[NodeId] {
        return &self.next;
    }
}

/// An ordered map from `K` to `V`. Keys are unique.
pub struct SkipList<K, V> {
    /// Arena of nodes, sentinels included.
    nodes: Vec<Node<K, V>>,
    head: NodeId,
    tail: NodeId,
    max_level: usize,
    /// Number of interior nodes.
    len: usize,
    /// Arena slots of deleted nodes, reused by later inserts.
    free_list: Vec<NodeId>,
    verbose: bool,
    /// Set while a rebuild reinserts, so it can't trigger itself.
    rebuilding: bool,
}

impl<K: Ord, V> SkipList<K, V> {
    /// An empty list with head and tail spanning levels `0..=max_level`.
    pub fn new(max_level: usize) -> Self {
        return Self::with_config(Config::new(max_level));
    }

    pub fn with_config(config: Config) -> Self {
        let mut list = SkipList {
            nodes: Vec::new(),
            head: NULL,
            tail: NULL,
            max_level: 0,
            len: 0,
            free_list: Vec::new(),
            verbose: config.verbose,
            rebuilding: false,
        };
        list.initialize(config.max_level);
        return list;
    }

    // --- Read access ---

    /// Number of nodes, not counting the sentinels.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    pub fn max_level(&self) -> usize {
        return self.max_level;
    }

    pub fn head(&self) -> NodeId {
        return self.head;
    }

    pub fn tail(&self) -> NodeId {
        return self.tail;
    }

    /// Look up a node by handle. Panics on a handle from before the last
    /// mutation that no longer exists.
    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        return &self.nodes[id as usize];
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        return &mut self.nodes[id as usize];
    }

    /// Walk the chain of `level` from head to tail, both included.
    pub fn chain(&self, level: usize) -> Chain<'_, K, V> {
        assert!(
            level <= self.max_level,
            "level {} above max level {}",
            level,
            self.max_level
        );
        return Chain {
            list: self,
            level,
            current: self.head,
        };
    }

    /// Every node in key order, sentinels included.
    pub fn nodes(&self) -> Chain<'_, K, V> {
        return self.chain(0);
    }

    /// Interior entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        return self.nodes().filter_map(|(_, node)| {
            let key = node.key.finite()?;
            let value = node.value.as_ref()?;
            return Some((key, value));
        });
    }

    /// Top-down descent to the node holding `key`.
    fn find(&self, key: &K) -> Option<NodeId> {
        let mut id = self.head;
        for level in (0..=self.max_level).rev() {
            loop {
                let next = self.node(id).next[level];
                if next == NULL || self.node(next).key.is_after(key) {
                    break;
                }
                id = next;
            }
            if self.node(id).key.is(key) {
                return Some(id);
            }
        }
        return None;
    }

    pub fn contains(&self, key: &K) -> bool {
        return self.find(key).is_some();
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        return self.node(id).value.as_ref();
    }

    // --- Structure ---

    /// Reset to an empty list whose sentinels span `0..=max_level`.
    ///
    /// Drops every node; outstanding handles become stale.
    pub fn initialize(&mut self, max_level: usize) {
        self.nodes.clear();
        self.free_list.clear();

        self.tail = 0;
        self.nodes
            .push(Node::new(Key::PosInf, None, max_level, NULL));
        self.head = 1;
        self.nodes
            .push(Node::new(Key::NegInf, None, max_level, self.tail));

        self.max_level = max_level;
        self.len = 0;
    }

    fn alloc_node(&mut self, key: Key<K>, value: Option<V>, top_level: usize) -> NodeId {
        let node = Node::new(key, value, top_level, self.tail);
        if let Some(id) = self.free_list.pop() {
            *self.node_mut(id) = node;
            return id;
        }
        let id = self.nodes.len() as NodeId;
        assert!(id < NULL, "skip list arena is full");
        self.nodes.push(node);
        return id;
    }

    fn free_node(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.key = Key::NegInf;
        node.value = None;
        node.top_level = 0;
        node.next.clear();
        self.free_list.push(id);
    }

    // --- Insert ---

    /// Insert `key` at levels `0..=top_level`.
    ///
    /// Panics if `key` is already present or `top_level > max_level()`.
    /// Use [`try_insert`](Self::try_insert) to get an error instead.
    pub fn insert(&mut self, key: K, value: V, top_level: usize) {
        if let Err(err) = self.try_insert(key, value, top_level) {
            panic!("insert precondition violated: {}", err);
        }
    }

    /// Insert `key` at levels `0..=top_level`, rebuilding afterwards if the
    /// list has outgrown its height. The list is unchanged on error.
    pub fn try_insert(&mut self, key: K, value: V, top_level: usize) -> Result<(), Error> {
        if top_level > self.max_level {
            return Err(Error::LevelOutOfRange {
                toplevel: top_level,
                max_level: self.max_level,
            });
        }
        if self.contains(&key) {
            return Err(Error::DuplicateKey);
        }
        self.check_invariants();

        self.link(Key::Finite(key), Some(value), top_level);

        self.check_invariants();
        return Ok(());
    }

    /// Allocate a node and splice it into every level it spans.
    fn link(&mut self, key: Key<K>, value: Option<V>, top_level: usize) {
        let id = self.alloc_node(key, value, top_level);
        for level in 0..=top_level {
            self.splice_in(level, id);
        }
        self.len += 1;

        if levels::needs_rebuild(self.len, self.max_level) {
            // Doubling covers the size that triggered the rebuild.
            debug_assert!(!self.rebuilding, "rebuild re-triggered at {} nodes", self.len);
            if !self.rebuilding {
                self.rebuild();
            }
        }
    }

    /// Link `id` into `level` before the first node with a greater key.
    fn splice_in(&mut self, level: usize, id: NodeId) {
        let mut pred = self.head;
        loop {
            let next = self.node(pred).next[level];
            if self.node(next).key > self.node(id).key {
                self.node_mut(id).next[level] = next;
                self.node_mut(pred).next[level] = id;
                if self.verbose {
                    tracing::debug!(level, node = id, pred, succ = next, "spliced in");
                }
                return;
            }
            pred = next;
        }
    }

    // --- Delete ---

    /// Remove `key` from every level.
    ///
    /// Panics if `key` is absent. Use [`try_delete`](Self::try_delete) to
    /// get an error instead.
    pub fn delete(&mut self, key: &K) {
        if let Err(err) = self.try_delete(key) {
            panic!("delete precondition violated: {}", err);
        }
    }

    /// Remove `key` from every level. The list is unchanged on error.
    /// Never rebuilds: height only grows.
    pub fn try_delete(&mut self, key: &K) -> Result<(), Error> {
        self.check_invariants();

        // Every node is on level 0, so a miss there means a miss everywhere.
        let Some(id) = self.splice_out(0, key) else {
            return Err(Error::KeyNotFound);
        };
        for level in 1..=self.max_level {
            self.splice_out(level, key);
        }
        self.free_node(id);
        self.len -= 1;

        self.check_invariants();
        return Ok(());
    }

    /// Unlink the node holding `key` from `level`, if it is there. A node
    /// is absent above its own top level, so a miss is not an error.
    fn splice_out(&mut self, level: usize, key: &K) -> Option<NodeId> {
        let mut pred = self.head;
        loop {
            let next = self.node(pred).next[level];
            if next == NULL {
                return None;
            }
            if self.node(next).key.is(key) {
                let succ = self.node(next).next[level];
                self.node_mut(pred).next[level] = succ;
                if self.verbose {
                    tracing::debug!(level, node = next, pred, succ, "spliced out");
                }
                return Some(next);
            }
            pred = next;
        }
    }

    // --- Rebuild ---

    /// Rebuild at double height with levels assigned by position.
    ///
    /// Every entry is read out in order, the sentinels are recreated, and
    /// the entries are reinserted through the normal insert path.
    pub fn rebuild(&mut self) {
        let old_max_level = self.max_level;
        let new_max_level = levels::grown_max_level(old_max_level);
        let entries = self.drain();
        tracing::debug!(
            len = entries.len(),
            old_max_level,
            new_max_level,
            "rebuilding skip list"
        );

        self.initialize(new_max_level);
        self.rebuilding = true;
        for (idx, (key, value)) in entries.into_iter().enumerate() {
            let top_level = levels::level_for_position(idx + 1, new_max_level);
            self.link(key, value, top_level);
        }
        self.rebuilding = false;

        self.check_invariants();
    }

    /// Move every interior entry out in key order, leaving the arena empty.
    fn drain(&mut self) -> Vec<(Key<K>, Option<V>)> {
        let mut ids = Vec::with_capacity(self.len);
        let mut id = self.node(self.head).next[0];
        while id != self.tail {
            ids.push(id);
            id = self.node(id).next[0];
        }

        let mut nodes = std::mem::take(&mut self.nodes);
        return ids
            .into_iter()
            .map(|id| {
                let node = &mut nodes[id as usize];
                let key = std::mem::replace(&mut node.key, Key::NegInf);
                return (key, node.value.take());
            })
            .collect();
    }

    // --- Invariant checking ---

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        use rustc_hash::FxHashSet;

        let head = self.node(self.head);
        let tail = self.node(self.tail);
        assert!(matches!(head.key, Key::NegInf), "INVARIANT VIOLATED: head key");
        assert!(matches!(tail.key, Key::PosInf), "INVARIANT VIOLATED: tail key");
        assert_eq!(head.next.len(), self.max_level + 1, "INVARIANT VIOLATED: head height");
        assert_eq!(tail.next.len(), self.max_level + 1, "INVARIANT VIOLATED: tail height");
        assert!(
            tail.next.iter().all(|&id| id == NULL),
            "INVARIANT VIOLATED: tail has a successor"
        );

        let mut ground = FxHashSet::default();
        for level in 0..=self.max_level {
            let mut count = 0usize;
            let mut prev = self.head;
            let mut id = head.next[level];
            while id != self.tail {
                assert!(id != NULL, "INVARIANT VIOLATED: level {} never reaches tail", level);
                let node = self.node(id);
                assert!(
                    node.key > self.node(prev).key,
                    "INVARIANT VIOLATED: level {} out of order",
                    level
                );
                assert!(
                    node.top_level >= level,
                    "INVARIANT VIOLATED: node below level {} linked into it",
                    level
                );
                if level == 0 {
                    ground.insert(id);
                } else {
                    assert!(
                        ground.contains(&id),
                        "INVARIANT VIOLATED: level {} node missing from level 0",
                        level
                    );
                }
                count += 1;
                prev = id;
                id = node.next[level];
            }
            if level == 0 {
                assert_eq!(
                    count, self.len,
                    "INVARIANT VIOLATED: level 0 holds {} nodes != len()={}",
                    count, self.len
                );
            }
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        return Self::with_config(Config::default());
    }
}

/// Iterator over one level's chain, head and tail included.
pub struct Chain<'a, K, V> {
    list: &'a SkipList<K, V>,
    level: usize,
    current: NodeId,
}

impl<'a, K: Ord, V> Iterator for Chain<'a, K, V> {
    type Item = (NodeId, &'a Node<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NULL {
            return None;
        }
        let id = self.current;
        let node = self.list.node(id);
        self.current = node.next[self.level];
        return Some((id, node));
    }
}

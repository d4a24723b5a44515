//! Implementation of the forwarding trie.

use log::trace;

use crate::{common_prefix_len, BitPrefix};

mod iter;

pub use iter::*;

/// Longest-prefix-match table implemented as a compressed binary trie.
///
/// All nodes live in a single table and refer to their children by index. Each node stores only
/// the bits it consumes on top of its parent (its *edge*), so the depth of the trie is bounded by
/// the number of places where the inserted prefixes diverge rather than by 32. Nodes without a
/// value always have exactly two children; this is restored immediately after every removal.
#[derive(Clone)]
pub struct ForwardingTrie<T> {
    pub(crate) table: Vec<Node<T>>,
    pub(crate) root: Option<usize>,
    free: Vec<usize>,
    count: usize,
}

impl<T> Default for ForwardingTrie<T> {
    fn default() -> Self {
        Self {
            table: Vec::new(),
            root: None,
            free: Vec::new(),
            count: 0,
        }
    }
}

impl<T> ForwardingTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prefixes stored in the trie.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the trie contains no prefixes.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the value of an element by matching exactly on the prefix.
    ///
    /// ```
    /// # use ip_router::ForwardingTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut fib = ForwardingTrie::new();
    /// fib.insert("192.168.1.0/24".parse()?, 1);
    /// assert_eq!(fib.get(&"192.168.1.0/24".parse()?), Some(&1));
    /// assert_eq!(fib.get(&"192.168.2.0/24".parse()?), None);
    /// assert_eq!(fib.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(fib.get(&"192.168.1.128/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: &BitPrefix) -> Option<&T> {
        self.find(prefix).and_then(|idx| self.table[idx].value.as_ref())
    }

    /// Get a mutable reference to a value of an element by matching exactly on the prefix.
    pub fn get_mut(&mut self, prefix: &BitPrefix) -> Option<&mut T> {
        self.find(prefix).and_then(|idx| self.table[idx].value.as_mut())
    }

    /// Check if a prefix is present in the trie.
    pub fn contains_key(&self, prefix: &BitPrefix) -> bool {
        self.get(prefix).is_some()
    }

    /// Resolve a single address using longest-prefix match.
    ///
    /// ```
    /// # use ip_router::ForwardingTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut fib = ForwardingTrie::new();
    /// fib.insert("10.0.0.0/8".parse()?, 1);
    /// fib.insert("10.1.0.0/16".parse()?, 2);
    /// assert_eq!(fib.lookup(0x0a01_0203), Some(&2));
    /// assert_eq!(fib.lookup(0x0a02_0203), Some(&1));
    /// assert_eq!(fib.lookup(0x0b00_0000), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup(&self, addr: u32) -> Option<&T> {
        self.lookup_prefix(&BitPrefix::host(addr)).map(|(_, v)| v)
    }

    /// Get the longest prefix stored in the trie that contains `prefix`, together with its value.
    ///
    /// ```
    /// # use ip_router::ForwardingTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut fib = ForwardingTrie::new();
    /// fib.insert("192.168.1.0/24".parse()?, 1);
    /// fib.insert("192.168.0.0/23".parse()?, 2);
    /// assert_eq!(fib.lookup_prefix(&"192.168.1.1/32".parse()?), Some(("192.168.1.0/24".parse()?, &1)));
    /// assert_eq!(fib.lookup_prefix(&"192.168.0.0/24".parse()?), Some(("192.168.0.0/23".parse()?, &2)));
    /// assert_eq!(fib.lookup_prefix(&"192.168.0.0/22".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup_prefix(&self, prefix: &BitPrefix) -> Option<(BitPrefix, &T)> {
        let mut idx = self.root?;
        let mut rem = *prefix;
        let mut path = BitPrefix::zero();
        let mut best_match = None;
        loop {
            let node = &self.table[idx];
            let direction = self.get_direction(idx, &rem);
            if let Direction::Diverged = direction {
                return best_match;
            }
            path = path.concat(&node.edge);
            best_match = node.value.as_ref().map(|v| (path, v)).or(best_match);
            match direction {
                Direction::Enter { next, rest, .. } => {
                    idx = next;
                    rem = rest;
                }
                _ => return best_match,
            }
        }
    }

    /// Insert a new item into the trie. This function returns the value that was bound to
    /// `prefix` before, if any.
    ///
    /// ```
    /// # use ip_router::ForwardingTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut fib = ForwardingTrie::new();
    /// assert_eq!(fib.insert("192.168.0.0/23".parse()?, 1), None);
    /// assert_eq!(fib.insert("192.168.1.0/24".parse()?, 2), None);
    /// assert_eq!(fib.insert("192.168.1.0/24".parse()?, 3), Some(2));
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: BitPrefix, value: T) -> Option<T> {
        let (root, old) = self.insert_at(self.root, prefix, value);
        self.root = Some(root);
        if old.is_none() {
            self.count += 1;
        }
        old
    }

    /// Removes a prefix from the trie, returning its value if it was present. Any node left
    /// without a value and with fewer than two children is merged away, so the trie looks as if
    /// the prefix was never inserted.
    ///
    /// ```
    /// # use ip_router::ForwardingTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut fib = ForwardingTrie::new();
    /// let prefix = "192.168.1.0/24".parse()?;
    /// fib.insert(prefix, 1);
    /// assert_eq!(fib.remove(&prefix), Some(1));
    /// assert_eq!(fib.remove(&prefix), None);
    /// assert!(fib.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove(&mut self, prefix: &BitPrefix) -> Option<T> {
        let root = self.root?;
        let (root, value) = self.remove_at(root, *prefix);
        self.root = root;
        if value.is_some() {
            self.count -= 1;
        }
        value
    }

    /// Clear the trie but keep the allocated memory.
    pub fn clear(&mut self) {
        self.table.clear();
        self.free.clear();
        self.root = None;
        self.count = 0;
    }
}

/// Private function implementations
impl<T> ForwardingTrie<T> {
    /// Index of the node that ends exactly at `prefix`, whether it holds a value or not.
    fn find(&self, prefix: &BitPrefix) -> Option<usize> {
        let mut idx = self.root?;
        let mut rem = *prefix;
        loop {
            match self.get_direction(idx, &rem) {
                Direction::Reached => return Some(idx),
                Direction::Enter { next, rest, .. } => {
                    idx = next;
                    rem = rest;
                }
                Direction::Diverged | Direction::Missing => return None,
            }
        }
    }

    /// Insert `value` at `rem` into the subtree rooted at `slot`, and return the index of the node
    /// that now takes the place of `slot`.
    fn insert_at(&mut self, slot: Option<usize>, rem: BitPrefix, value: T) -> (usize, Option<T>) {
        let Some(idx) = slot else {
            return (self.new_node(rem, Some(value)), None);
        };
        match self.get_direction_for_insert(idx, &rem) {
            DirectionForInsert::Reached => (idx, self.table[idx].value.replace(value)),
            DirectionForInsert::Enter { rest, right } => {
                let child = self.get_child(idx, right);
                let (child, old) = self.insert_at(child, rest, value);
                self.set_child(idx, Some(child), right);
                (idx, old)
            }
            DirectionForInsert::NewChild { child_right } => {
                let new = self.new_node(rem, Some(value));
                let node = &mut self.table[idx];
                node.edge = node.edge.suffix(rem.prefix_len());
                trace!("split edge {} below {}", node.edge, rem);
                self.set_child(new, Some(idx), child_right);
                (new, None)
            }
            DirectionForInsert::NewBranch {
                common,
                prefix_right,
            } => {
                let branch = self.new_node(rem.truncate(common), None);
                let leaf = self.new_node(rem.suffix(common), Some(value));
                let node = &mut self.table[idx];
                node.edge = node.edge.suffix(common);
                trace!("branch {} between {} and {}", rem.truncate(common), node.edge, rem.suffix(common));
                self.set_child(branch, Some(leaf), prefix_right);
                self.set_child(branch, Some(idx), !prefix_right);
                (branch, None)
            }
        }
    }

    /// Remove the value at `rem` from the subtree rooted at `idx`. Returns the index of the node
    /// that now takes the place of `idx` (if the subtree still exists) and the removed value.
    fn remove_at(&mut self, idx: usize, rem: BitPrefix) -> (Option<usize>, Option<T>) {
        let value = match self.get_direction(idx, &rem) {
            Direction::Diverged | Direction::Missing => return (Some(idx), None),
            Direction::Reached => self.table[idx].value.take(),
            Direction::Enter { next, rest, right } => {
                let (child, value) = self.remove_at(next, rest);
                self.set_child(idx, child, right);
                value
            }
        };
        if value.is_none() {
            // nothing changed below or at this node.
            return (Some(idx), None);
        }
        (self.compress(idx), value)
    }

    /// Restore the compression invariant at `idx` and return the node that replaces it.
    fn compress(&mut self, idx: usize) -> Option<usize> {
        let node = &mut self.table[idx];
        if node.value.is_some() {
            return Some(idx);
        }
        match (node.left, node.right) {
            (Some(_), Some(_)) => Some(idx),
            (None, None) => {
                self.free_node(idx);
                None
            }
            (Some(child), None) | (None, Some(child)) => {
                let edge = node.edge;
                node.left = None;
                node.right = None;
                let child_node = &mut self.table[child];
                child_node.edge = edge.concat(&child_node.edge);
                trace!("merge {} into its only child, now {}", edge, child_node.edge);
                self.free_node(idx);
                Some(child)
            }
        }
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    fn get_child(&self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right
        } else {
            self.table[idx].left
        }
    }

    /// Set the child of a node (either to the left or the right), and return the old child.
    #[inline(always)]
    fn set_child(&mut self, idx: usize, child: Option<usize>, right: bool) -> Option<usize> {
        let slot = if right {
            &mut self.table[idx].right
        } else {
            &mut self.table[idx].left
        };
        std::mem::replace(slot, child)
    }

    /// insert a new node into the table and return its index.
    #[inline(always)]
    fn new_node(&mut self, edge: BitPrefix, value: Option<T>) -> usize {
        let node = Node {
            edge,
            value,
            left: None,
            right: None,
        };
        if let Some(idx) = self.free.pop() {
            self.table[idx] = node;
            idx
        } else {
            self.table.push(node);
            self.table.len() - 1
        }
    }

    /// Return a node, that is no longer referenced, to the free list.
    fn free_node(&mut self, idx: usize) {
        let node = &mut self.table[idx];
        node.value = None;
        node.left = None;
        node.right = None;
        self.free.push(idx);
    }

    /// Number of nodes currently linked into the trie.
    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.table.len() - self.free.len()
    }

    /// Get the directions from node `cur`, where `rem` are the bits that remain to be matched,
    /// including the edge of `cur`.
    #[inline(always)]
    fn get_direction(&self, cur: usize, rem: &BitPrefix) -> Direction {
        let edge = &self.table[cur].edge;
        if common_prefix_len(edge, rem) < edge.prefix_len() {
            return Direction::Diverged;
        }
        let rest = rem.suffix(edge.prefix_len());
        if rest.prefix_len() == 0 {
            return Direction::Reached;
        }
        let right = rest.is_bit_set(0);
        match self.get_child(cur, right) {
            Some(next) => Direction::Enter { next, rest, right },
            None => Direction::Missing,
        }
    }

    /// Decide how to insert `rem` at node `cur`.
    #[inline(always)]
    fn get_direction_for_insert(&self, cur: usize, rem: &BitPrefix) -> DirectionForInsert {
        let edge = &self.table[cur].edge;
        let m = common_prefix_len(edge, rem);
        if m == edge.prefix_len() {
            if m == rem.prefix_len() {
                DirectionForInsert::Reached
            } else {
                let rest = rem.suffix(m);
                DirectionForInsert::Enter {
                    rest,
                    right: rest.is_bit_set(0),
                }
            }
        } else if m == rem.prefix_len() {
            DirectionForInsert::NewChild {
                child_right: edge.is_bit_set(m),
            }
        } else {
            DirectionForInsert::NewBranch {
                common: m,
                prefix_right: rem.is_bit_set(m),
            }
        }
    }
}

impl<T: PartialEq> PartialEq for ForwardingTrie<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ForwardingTrie<T> {}

/// A node of the trie. `edge` holds only the bits consumed since the parent.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) edge: BitPrefix,
    pub(crate) value: Option<T>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

enum Direction {
    /// The edge of the node does not match the remaining bits.
    Diverged,
    /// The node ends exactly at the searched prefix.
    Reached,
    /// Enter the next index with the remaining bits and search again.
    Enter {
        next: usize,
        rest: BitPrefix,
        right: bool,
    },
    /// The edge matches, but there is no child to continue with.
    Missing,
}

enum DirectionForInsert {
    /// The node ends exactly at the prefix.
    Reached,
    /// The edge of the node is a strict prefix. Continue at the child selected by `right` with the
    /// bits in `rest`.
    Enter { rest: BitPrefix, right: bool },
    /// The prefix ends within the edge of the node. The new node takes its place, and the old node
    /// becomes its child at `child_right`.
    NewChild { child_right: bool },
    /// Both diverge after `common` bits. A new branch takes the place of the node, with the new
    /// leaf at `prefix_right` and the old node on the other side.
    NewBranch { common: u8, prefix_right: bool },
}

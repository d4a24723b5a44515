//! Formatting implementation for the ForwardingTrie

use std::fmt::{Debug, Formatter, Result};

use super::*;

/// Prints the tree structure: every node is shown with the absolute prefix at which it ends.
impl<T: Debug> Debug for ForwardingTrie<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.root {
            Some(root) => DebugNode(self, root, BitPrefix::zero()).fmt(f),
            None => f.debug_map().finish(),
        }
    }
}

struct DebugNode<'a, T>(&'a ForwardingTrie<T>, usize, BitPrefix);

impl<T: Debug> Debug for DebugNode<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie.table[self.1];
        let prefix = self.2.concat(&node.edge);
        let child = |idx| Self(trie, idx, prefix);
        match (node.value.as_ref(), node.left, node.right) {
            (None, None, None) => prefix.fmt(f),
            (None, None, Some(c)) | (None, Some(c), None) => {
                f.debug_map().entry(&prefix, &child(c)).finish()
            }
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&prefix, &(child(left), child(right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&prefix, v).finish(),
            (Some(v), None, Some(c)) | (Some(v), Some(c), None) => {
                f.debug_map().entry(&prefix, &(v, child(c))).finish()
            }
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&prefix, &(v, child(left), child(right)))
                .finish(),
        }
    }
}

//! Module that contains the implementation for the iterators

use crate::*;

/// An iterator over all entries of a [`ForwardingTrie`] in increasing order of the prefix address
/// (and of the prefix length for equal addresses).
///
/// A node is yielded before its children. Since every prefix in the subtree of a node extends the
/// prefix of that node, this preorder traversal (left before right) is exactly the order of
/// [`BitPrefix`].
#[derive(Clone)]
pub struct Iter<'a, T> {
    pub(crate) trie: &'a ForwardingTrie<T>,
    /// Nodes to visit, with the absolute prefix of their parent.
    pub(crate) nodes: Vec<(usize, BitPrefix)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (BitPrefix, &'a T);

    fn next(&mut self) -> Option<(BitPrefix, &'a T)> {
        while let Some((cur, parent)) = self.nodes.pop() {
            let node = &self.trie.table[cur];
            let prefix = parent.concat(&node.edge);
            if let Some(right) = node.right {
                self.nodes.push((right, prefix));
            }
            if let Some(left) = node.left {
                self.nodes.push((left, prefix));
            }
            if let Some(v) = &node.value {
                return Some((prefix, v));
            }
        }
        None
    }
}

/// An iterator over all prefixes of a [`ForwardingTrie`] in order.
#[derive(Clone)]
pub struct Prefixes<'a, T> {
    pub(crate) inner: Iter<'a, T>,
}

impl<T> Iterator for Prefixes<'_, T> {
    type Item = BitPrefix;

    fn next(&mut self) -> Option<BitPrefix> {
        self.inner.next().map(|(p, _)| p)
    }
}

/// An iterator over all values of a [`ForwardingTrie`] in order of their associated prefixes.
#[derive(Clone)]
pub struct Values<'a, T> {
    pub(crate) inner: Iter<'a, T>,
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An iterator over all owned entries of a [`ForwardingTrie`] in order.
#[derive(Clone)]
pub struct IntoIter<T> {
    trie: ForwardingTrie<T>,
    nodes: Vec<(usize, BitPrefix)>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (BitPrefix, T);

    fn next(&mut self) -> Option<(BitPrefix, T)> {
        while let Some((cur, parent)) = self.nodes.pop() {
            let node = &mut self.trie.table[cur];
            let prefix = parent.concat(&node.edge);
            if let Some(right) = node.right {
                self.nodes.push((right, prefix));
            }
            if let Some(left) = node.left {
                self.nodes.push((left, prefix));
            }
            if let Some(v) = node.value.take() {
                return Some((prefix, v));
            }
        }
        None
    }
}

impl<T> IntoIterator for ForwardingTrie<T> {
    type Item = (BitPrefix, T);

    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let nodes = self.root_entry();
        IntoIter { trie: self, nodes }
    }
}

impl<'a, T> IntoIterator for &'a ForwardingTrie<T> {
    type Item = (BitPrefix, &'a T);

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            trie: self,
            nodes: self.root_entry(),
        }
    }
}

impl<T> ForwardingTrie<T> {
    /// An iterator visiting all key-value pairs in increasing order of the prefix. This is the
    /// order in which the table is written to a snapshot.
    ///
    /// ```
    /// # use ip_router::ForwardingTrie;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut fib = ForwardingTrie::new();
    /// fib.insert("192.168.1.0/24".parse()?, 3);
    /// fib.insert("10.0.0.0/16".parse()?, 2);
    /// fib.insert("10.0.0.0/8".parse()?, 1);
    /// assert_eq!(
    ///     fib.iter().map(|(p, v)| (p.to_string(), *v)).collect::<Vec<_>>(),
    ///     vec![
    ///         ("10.0.0.0/8".to_string(), 1),
    ///         ("10.0.0.0/16".to_string(), 2),
    ///         ("192.168.1.0/24".to_string(), 3),
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    /// An iterator visiting all prefixes in order.
    pub fn prefixes(&self) -> Prefixes<'_, T> {
        Prefixes { inner: self.iter() }
    }

    /// An iterator visiting all values in order of their prefixes.
    pub fn values(&self) -> Values<'_, T> {
        Values { inner: self.iter() }
    }

    fn root_entry(&self) -> Vec<(usize, BitPrefix)> {
        self.root
            .map(|root| (root, BitPrefix::zero()))
            .into_iter()
            .collect()
    }
}

impl<T> FromIterator<(BitPrefix, T)> for ForwardingTrie<T> {
    fn from_iter<I: IntoIterator<Item = (BitPrefix, T)>>(iter: I) -> Self {
        let mut trie = ForwardingTrie::new();
        trie.extend(iter);
        trie
    }
}

impl<T> Extend<(BitPrefix, T)> for ForwardingTrie<T> {
    fn extend<I: IntoIterator<Item = (BitPrefix, T)>>(&mut self, iter: I) {
        iter.into_iter().for_each(|(p, v)| {
            self.insert(p, v);
        });
    }
}

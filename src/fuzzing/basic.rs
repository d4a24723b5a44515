use std::collections::HashMap;

use super::*;
use crate::test::invariants_hold;
use itertools::Itertools;

qc!(new, _new);
fn _new(list: Vec<(BitPrefix, i32)>) -> bool {
    let mut trie = ForwardingTrie::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        trie.insert(p, t);
        hmap.insert(p, t);
    }

    trie.len() == hmap.len() && trie.into_iter().eq(hmap.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(list: Vec<Operation<BitPrefix, i32>>) -> bool {
    let mut hmap = HashMap::new();
    let trie = apply(list, &mut hmap);

    trie.len() == hmap.len() && trie.into_iter().eq(hmap.into_iter().sorted())
}

qc!(get, _get);
fn _get((list, probes): (Vec<Operation<BitPrefix, i32>>, Vec<BitPrefix>)) -> bool {
    let mut hmap = HashMap::new();
    let trie = apply(list, &mut hmap);

    hmap.keys().chain(probes.iter()).all(|p| {
        trie.get(p) == hmap.get(p) && trie.contains_key(p) == hmap.contains_key(p)
    })
}

qc!(invariants, _invariants);
fn _invariants(list: Vec<Operation<BitPrefix, i32>>) -> bool {
    let mut trie = ForwardingTrie::new();
    for op in list {
        match op {
            Operation::Add(p, t) => {
                trie.insert(p, t);
            }
            Operation::Remove(p) => {
                trie.remove(&p);
            }
        }
        if !invariants_hold(&trie) {
            return false;
        }
    }
    true
}

qc!(remove_all, _remove_all);
fn _remove_all(trie: ForwardingTrie<i32>) -> bool {
    let mut trie = trie;
    let prefixes = trie.prefixes().collect::<Vec<_>>();
    for p in prefixes {
        if trie.remove(&p).is_none() {
            return false;
        }
    }
    trie.is_empty() && trie.root.is_none() && trie.node_count() == 0
}

qc!(insertion_order, _insertion_order);
fn _insertion_order(list: Vec<(BitPrefix, i32)>) -> bool {
    // the shape of the trie only depends on the set of prefixes.
    let list = list.into_iter().unique_by(|(p, _)| *p).collect::<Vec<_>>();
    let forward = list.iter().copied().collect::<ForwardingTrie<_>>();
    let backward = list.iter().rev().copied().collect::<ForwardingTrie<_>>();
    format!("{forward:?}") == format!("{backward:?}")
}

qc!(reinsert, _reinsert);
fn _reinsert(trie: ForwardingTrie<i32>) -> bool {
    let mut twice = trie.clone();
    for (p, t) in trie.iter() {
        if twice.insert(p, *t) != Some(*t) {
            return false;
        }
    }
    format!("{trie:?}") == format!("{twice:?}") && trie.node_count() == twice.node_count()
}

qc!(remove_restores_shape, _remove_restores_shape);
fn _remove_restores_shape((trie, extra): (ForwardingTrie<i32>, BitPrefix)) -> bool {
    if trie.contains_key(&extra) {
        return true;
    }
    let mut modified = trie.clone();
    modified.insert(extra, 0);
    modified.remove(&extra);
    format!("{trie:?}") == format!("{modified:?}") && trie.node_count() == modified.node_count()
}

qc!(equality, _equality);
fn _equality(list: Vec<Operation<BitPrefix, i32>>) -> bool {
    let trie = apply(list, &mut HashMap::new());
    let clone = trie.clone().into_iter().collect::<ForwardingTrie<_>>();
    trie == clone && trie.len() == clone.len() && trie.is_empty() == clone.is_empty()
}

use std::collections::HashMap;

use super::*;

/// Longest prefix in `hmap` that contains `prefix`, by scanning all entries.
fn brute_force<'a>(hmap: &'a HashMap<BitPrefix, i32>, prefix: &BitPrefix) -> Option<(BitPrefix, &'a i32)> {
    hmap.iter()
        .filter(|(p, _)| p.contains(prefix))
        .max_by_key(|(p, _)| p.prefix_len())
        .map(|(p, t)| (*p, t))
}

qc!(lookup, _lookup);
fn _lookup((list, addrs): (Vec<Operation<BitPrefix, i32>>, Vec<u32>)) -> bool {
    let mut hmap = HashMap::new();
    let trie = apply(list, &mut hmap);

    // probe the stored prefixes themselves as well, since random addresses rarely hit long ones.
    let stored = hmap.keys().map(|p| p.bits()).collect::<Vec<_>>();
    addrs.into_iter().chain(stored).all(|addr| {
        let want = brute_force(&hmap, &BitPrefix::host(addr)).map(|(_, t)| t);
        trie.lookup(addr) == want
    })
}

qc!(lookup_prefix, _lookup_prefix);
fn _lookup_prefix((list, probes): (Vec<Operation<BitPrefix, i32>>, Vec<BitPrefix>)) -> bool {
    let mut hmap = HashMap::new();
    let trie = apply(list, &mut hmap);

    probes
        .iter()
        .chain(hmap.keys())
        .all(|p| trie.lookup_prefix(p) == brute_force(&hmap, p))
}

qc!(default_route, _default_route);
fn _default_route((trie, addr): (ForwardingTrie<i32>, u32)) -> bool {
    let mut trie = trie;
    trie.insert(BitPrefix::zero(), -1);
    trie.lookup(addr).is_some()
}

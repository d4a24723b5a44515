use std::collections::HashMap;

use super::*;

const NUM_NICS: usize = 4;
const UNREACHABLE: Metric = 16;

fn config() -> RouterConfig {
    RouterConfig::new(NUM_NICS, UNREACHABLE)
}

/// Draws from a handful of subnets and interfaces, with metrics around the unreachable threshold.
fn update((subnet, nic, metric): (u8, u8, u8)) -> (Subnet, InterfaceId, Metric) {
    let subnets = ["10.0.0.0/8", "10.1.0.0/16", "192.168.0.0/24"];
    let subnet = subnets[subnet as usize % subnets.len()].parse().unwrap();
    (subnet, nic as usize % NUM_NICS, metric as Metric % (UNREACHABLE + 4))
}

qc!(clamped_and_best, _clamped_and_best);
fn _clamped_and_best(list: Vec<(u8, u8, u8)>) -> bool {
    let mut table = RouteTable::new(config());
    for (id, x) in list.into_iter().enumerate() {
        let (subnet, nic, metric) = update(x);
        table.apply_update(subnet, nic, metric, id as u32);
        let ok = table.iter().all(|(_, entry)| {
            let best = entry
                .metrics()
                .iter()
                .enumerate()
                .filter(|(_, m)| **m < UNREACHABLE)
                .min_by_key(|(nic, m)| (**m, *nic))
                .map(|(nic, _)| nic);
            entry.metrics().iter().all(|m| *m <= UNREACHABLE)
                && best.is_some()
                && entry.best_interface() == best
        });
        if !ok {
            return false;
        }
    }
    true
}

qc!(advertised_on_change, _advertised_on_change);
fn _advertised_on_change(list: Vec<(u8, u8, u8)>) -> bool {
    let mut table = RouteTable::new(config());
    for (id, x) in list.into_iter().enumerate() {
        let (subnet, nic, metric) = update(x);
        let before = table
            .get(&subnet)
            .and_then(|e| e.best_interface().zip(e.best_metric()));
        let adv = table.apply_update(subnet, nic, metric, id as u32);
        let after = table
            .get(&subnet)
            .and_then(|e| e.best_interface().zip(e.best_metric()));
        let ok = match adv {
            None => before == after,
            Some(adv) => {
                before != after
                    && adv.subnet == subnet
                    && adv.update_id == id as u32
                    && adv.interface == after.map(|(nic, _)| nic)
                    && adv.metric == after.map_or(UNREACHABLE, |(_, m)| m)
            }
        };
        if !ok {
            return false;
        }
    }
    true
}

qc!(matches_distance_vectors, _matches_distance_vectors);
fn _matches_distance_vectors(list: Vec<(u8, u8, u8)>) -> bool {
    let mut table = RouteTable::new(config());
    // learned metrics of subnets that are in the table, per interface.
    let mut vectors: HashMap<Subnet, [Metric; NUM_NICS]> = HashMap::new();
    for (id, x) in list.into_iter().enumerate() {
        let (subnet, nic, metric) = update(x);
        table.apply_update(subnet, nic, metric, id as u32);
        let metric = (metric + 1).min(UNREACHABLE);
        match vectors.get_mut(&subnet) {
            Some(v) => {
                v[nic] = metric;
                if v.iter().all(|m| *m >= UNREACHABLE) {
                    vectors.remove(&subnet);
                }
            }
            None if metric < UNREACHABLE => {
                let mut v = [UNREACHABLE; NUM_NICS];
                v[nic] = metric;
                vectors.insert(subnet, v);
            }
            None => {}
        }
    }
    table.len() == vectors.len()
        && table
            .iter()
            .all(|(subnet, entry)| vectors.get(subnet).map(|v| &v[..]) == Some(entry.metrics()))
}

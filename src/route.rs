//! Distance-vector route table with triggered advertisements.

use std::collections::btree_map::{self, BTreeMap, Entry};

use log::debug;

use crate::{RouterConfig, Subnet};

/// Distance of a route. Values at or above [`RouterConfig::metric_unreachable`] mean that the
/// destination cannot be reached.
pub type Metric = u32;

/// Index of a network interface.
pub type InterfaceId = usize;

/// Distance vector of a single subnet: the metric learned on every interface, and the interface
/// currently used to reach the subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    metrics: Vec<Metric>,
    best: Option<InterfaceId>,
}

impl RouteEntry {
    fn new(config: &RouterConfig) -> Self {
        Self {
            metrics: vec![config.metric_unreachable; config.num_nics],
            best: None,
        }
    }

    /// Metric learned on `nic`, or `None` if the router has no such interface.
    pub fn metric(&self, nic: InterfaceId) -> Option<Metric> {
        self.metrics.get(nic).copied()
    }

    /// Metrics of all interfaces, indexed by interface id.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Interface with the smallest metric.
    pub fn best_interface(&self) -> Option<InterfaceId> {
        self.best
    }

    /// Metric of the best interface.
    pub fn best_metric(&self) -> Option<Metric> {
        self.best.map(|nic| self.metrics[nic])
    }

    /// Select the interface with the smallest reachable metric. On equal metrics, the lowest
    /// interface id wins.
    fn select_best(&mut self, unreachable: Metric) -> Option<InterfaceId> {
        self.best = self
            .metrics
            .iter()
            .enumerate()
            .filter(|(_, m)| **m < unreachable)
            .min_by_key(|(nic, m)| (**m, *nic))
            .map(|(nic, _)| nic);
        self.best
    }
}

/// A change of the best route to a subnet, to be announced to the neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advertisement {
    /// The destination.
    pub subnet: Subnet,
    /// The new metric of the best route, or the unreachable metric if the subnet was withdrawn.
    pub metric: Metric,
    /// The new best interface, or `None` if the subnet is no longer reachable.
    pub interface: Option<InterfaceId>,
    /// Identifier of the update that triggered this advertisement.
    pub update_id: u32,
}

impl Advertisement {
    /// Returns `true` if the subnet became unreachable.
    pub fn is_withdrawal(&self) -> bool {
        self.interface.is_none()
    }
}

/// The routing state of a router: an ordered map from subnet to its distance vector. Subnets
/// without an entry are unreachable on every interface.
#[derive(Debug, Clone)]
pub struct RouteTable {
    config: RouterConfig,
    routes: BTreeMap<Subnet, RouteEntry>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl RouteTable {
    /// Create an empty route table.
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            routes: BTreeMap::new(),
        }
    }

    /// The configuration of this table.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Process a route update for `subnet` received on `nic`, where the neighbor announced
    /// `metric`. The hop to the neighbor always costs one. Returns an advertisement if the best
    /// route to `subnet` changed in a way that is visible to others: a new subnet became
    /// reachable, the best interface changed, its metric changed, or the subnet became
    /// unreachable.
    ///
    /// ```
    /// # use ip_router::{RouteTable, Subnet};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = RouteTable::default();
    /// let net: Subnet = "192.168.0.0/24".parse()?;
    /// let adv = table.apply_update(net, 0, 5, 1).unwrap();
    /// assert_eq!((adv.interface, adv.metric, adv.update_id), (Some(0), 6, 1));
    /// assert_eq!(table.apply_update(net, 0, 5, 2), None);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Panics
    /// Panics if `nic` is not an interface of the configured router.
    pub fn apply_update(
        &mut self,
        subnet: Subnet,
        nic: InterfaceId,
        metric: Metric,
        update_id: u32,
    ) -> Option<Advertisement> {
        assert!(
            self.config.is_valid_nic(nic),
            "interface {nic} out of range (router has {} interfaces)",
            self.config.num_nics
        );
        let unreachable = self.config.metric_unreachable;
        let metric = metric.saturating_add(1).min(unreachable);
        let advertise = |interface, metric| Advertisement {
            subnet,
            metric,
            interface,
            update_id,
        };

        let adv = match self.routes.entry(subnet) {
            Entry::Vacant(_) if metric >= unreachable => None,
            Entry::Vacant(e) => {
                let mut route = RouteEntry::new(&self.config);
                route.metrics[nic] = metric;
                route.best = Some(nic);
                e.insert(route);
                Some(advertise(Some(nic), metric))
            }
            Entry::Occupied(mut e) => {
                let route = e.get_mut();
                let old = route.best.map(|b| (b, route.metrics[b]));
                route.metrics[nic] = metric;
                let new = route
                    .select_best(unreachable)
                    .map(|b| (b, route.metrics[b]));
                match new {
                    None => {
                        e.remove();
                        Some(advertise(None, unreachable))
                    }
                    Some((best, best_metric)) if old != new => {
                        Some(advertise(Some(best), best_metric))
                    }
                    Some(_) => None,
                }
            }
        };
        match &adv {
            Some(adv) => debug!(
                "update {update_id}: {subnet} via {nic} at {metric} -> best {:?} at {}",
                adv.interface, adv.metric
            ),
            None => debug!("update {update_id}: {subnet} via {nic} at {metric} -> unchanged"),
        }
        adv
    }

    /// Get the distance vector of `subnet`, if it is reachable.
    pub fn get(&self, subnet: &Subnet) -> Option<&RouteEntry> {
        self.routes.get(subnet)
    }

    /// Iterate over all reachable subnets in increasing order.
    pub fn iter(&self) -> btree_map::Iter<'_, Subnet, RouteEntry> {
        self.routes.iter()
    }

    /// Number of reachable subnets.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no subnet is reachable.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Forget all routes.
    pub fn clear(&mut self) {
        self.routes.clear()
    }
}

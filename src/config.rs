//! Configuration of the route engine.

use crate::route::Metric;

/// Number of network interfaces of a router, unless configured otherwise.
pub const DEFAULT_NUM_NICS: usize = 16;

/// Metric at which a destination is considered unreachable, unless configured otherwise.
pub const DEFAULT_METRIC_UNREACHABLE: Metric = 1000;

/// Limits of a simulated router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    /// Number of interfaces. Valid interface ids are `0..num_nics`.
    pub num_nics: usize,
    /// Any metric equal to or larger than this value means that the destination is unreachable.
    pub metric_unreachable: Metric,
}

impl RouterConfig {
    /// Create a new configuration.
    ///
    /// # Panics
    /// Panics if `num_nics` or `metric_unreachable` is zero.
    pub fn new(num_nics: usize, metric_unreachable: Metric) -> Self {
        assert!(num_nics > 0, "a router needs at least one interface");
        assert!(metric_unreachable > 0, "the unreachable metric must be positive");
        Self {
            num_nics,
            metric_unreachable,
        }
    }

    /// Check whether `nic` names an interface of this router.
    pub fn is_valid_nic(&self, nic: usize) -> bool {
        nic < self.num_nics
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            num_nics: DEFAULT_NUM_NICS,
            metric_unreachable: DEFAULT_METRIC_UNREACHABLE,
        }
    }
}

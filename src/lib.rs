//! This crate provides the two building blocks of a simulated IPv4 router: a forwarding table that
//! resolves addresses by longest-prefix match, and a distance-vector route engine that emits
//! triggered advertisements whenever the best route to a subnet changes.
//!
//! Both are wired together as pipeline stages speaking a line-oriented text protocol (see
//! [`Event`]). The [`RoutingStage`] turns route updates (`U`) into advertisements (`A`) and
//! forwarding-table entries (`T`), and passes packets (`P`) on unchanged. The [`ForwardingStage`]
//! consumes table entries and resolves packets into output lines (`O`), passing advertisements on
//! unchanged. At the end of its input, the forwarding table is written as a snapshot.
//!
//! ```text
//! ip_route < updates.txt | ip_forward fwd_table.txt
//! ```
//!
//! # Description of the Tree
//!
//! The [`ForwardingTrie`] is a compressed binary trie. Each node consists of an *edge* (the bits
//! consumed on top of its parent), a container for a potential value (`Option`), and two optional
//! children. Traversing into the tree is done as follows: we look at the first bit that follows
//! the edge of a node. If it is not set, then we take the left branch, and otherwise, we take the
//! right one. A node without a value always has two children, so the depth of the tree is bounded
//! by the number of places in which the stored prefixes diverge.
//!
//! All nodes are stored in a single table and refer to their children by index. Every insertion
//! and removal computes a replacement for the slot it descended into, which keeps each mutation
//! local to one parent-child link.
//!
//! | Operation                  | Complexity                     |
//! |----------------------------|--------------------------------|
//! | `insert`, `remove`         | `O(depth)`, depth at most 32   |
//! | `get`, `lookup`            | `O(depth)`                     |
//! | `iter`                     | `O(n)`                         |
//! | `len` and `is_empty`       | `O(1)`                         |
//!
//! # Triggered advertisements
//!
//! The [`RouteTable`] keeps, for every reachable subnet, the metric learned on each interface.
//! An update is only advertised if the outcome changed in a way that neighbors can observe: the
//! subnet became reachable or unreachable, or the best interface or its metric changed. There is
//! no periodic broadcast.

#![allow(clippy::collapsible_else_if)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;
mod fmt;
mod prefix;
pub mod route;
#[cfg(feature = "serde")]
mod serde;
pub mod stage;
pub mod trie;

#[cfg(test)]
mod fuzzing;

pub use config::RouterConfig;
pub use error::{Error, Result};
pub use event::{Event, ParseError};
pub use prefix::{common_prefix_len, BitPrefix, Subnet, ADDR_BITS};
pub use route::{Advertisement, InterfaceId, Metric, RouteEntry, RouteTable};
pub use stage::{run, ForwardingStage, RoutingStage, Stage};
pub use trie::ForwardingTrie;

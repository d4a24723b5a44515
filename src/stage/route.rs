//! The routing stage: route updates against a [`RouteTable`].

use std::io::Write;

use crate::{
    Advertisement, Error, Event, InterfaceId, Metric, Result, RouteTable, RouterConfig, Subnet,
};

use super::Stage;

/// Computes best routes from the updates of the neighbors. Every change of a best route is
/// written as an advertisement followed by the matching forwarding-table entry. Packets are copied
/// to the output unchanged, so that the output can be piped into a
/// [`ForwardingStage`](super::ForwardingStage).
#[derive(Debug, Clone, Default)]
pub struct RoutingStage {
    table: RouteTable,
}

impl RoutingStage {
    /// Create a stage with an empty route table.
    pub fn new(config: RouterConfig) -> Self {
        Self {
            table: RouteTable::new(config),
        }
    }

    /// The route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Apply an update, returning the advertisement it triggers, if any. Unlike
    /// [`RouteTable::apply_update`], an unknown interface is reported as an error.
    pub fn update(
        &mut self,
        subnet: Subnet,
        nic: InterfaceId,
        metric: Metric,
        update_id: u32,
    ) -> Result<Option<Advertisement>> {
        let config = self.table.config();
        if !config.is_valid_nic(nic) {
            return Err(Error::InterfaceOutOfRange {
                nic,
                num_nics: config.num_nics,
            });
        }
        Ok(self.table.apply_update(subnet, nic, metric, update_id))
    }
}

impl Advertisement {
    /// The lines announcing this advertisement: the advertisement itself, followed by the new
    /// forwarding-table entry.
    pub fn events(&self) -> [Event; 2] {
        [
            Event::Advertisement {
                subnet: self.subnet,
                metric: self.metric,
                update_id: self.update_id,
            },
            Event::TableEntry {
                prefix: self.subnet,
                nic: self.interface,
            },
        ]
    }
}

impl Stage for RoutingStage {
    fn process_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<()> {
        match line.parse::<Event>()? {
            Event::Update {
                subnet,
                nic,
                metric,
                update_id,
            } => {
                if let Some(adv) = self.update(subnet, nic, metric, update_id)? {
                    for event in adv.events() {
                        writeln!(out, "{event}")?;
                    }
                }
            }
            Event::Packet { .. } => writeln!(out, "{line}")?,
            event => return Err(Error::Unexpected(event.kind())),
        }
        Ok(())
    }
}

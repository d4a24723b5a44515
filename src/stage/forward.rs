//! The forwarding stage: table entries and packets against a [`ForwardingTrie`].

use std::{io::Write, net::Ipv4Addr};

use log::debug;

use crate::{event::Nic, BitPrefix, Error, Event, ForwardingTrie, InterfaceId, Result};

use super::Stage;

/// Forwards packets along the longest matching prefix. Advertisements are copied to the output
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct ForwardingStage {
    fib: ForwardingTrie<InterfaceId>,
}

impl ForwardingStage {
    /// Create a stage with an empty forwarding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The forwarding table.
    pub fn fib(&self) -> &ForwardingTrie<InterfaceId> {
        &self.fib
    }

    /// Bind `prefix` to `nic`, or remove `prefix` if `nic` is `None`.
    pub fn populate(&mut self, prefix: BitPrefix, nic: Option<InterfaceId>) {
        match nic {
            Some(nic) => {
                let old = self.fib.insert(prefix, nic);
                debug!("table entry {prefix} -> {nic} (was {})", Nic(old));
            }
            None => {
                let old = self.fib.remove(&prefix);
                debug!("table entry {prefix} removed (was {})", Nic(old));
            }
        }
    }

    /// Decide where to send a packet. The resulting event has no interface if no prefix matches.
    pub fn forward(&self, dest: Ipv4Addr, id: u32) -> Event {
        Event::Forwarded {
            id,
            nic: self.fib.lookup(dest.into()).copied(),
        }
    }

    /// Write every entry of the forwarding table as `addr/len nic`, in increasing order of the
    /// address, and of the length for equal addresses.
    pub fn write_snapshot<W: Write>(&self, out: &mut W) -> Result<()> {
        for (prefix, nic) in self.fib.iter() {
            writeln!(out, "{prefix} {nic}")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Stage for ForwardingStage {
    fn process_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<()> {
        match line.parse::<Event>()? {
            Event::TableEntry { prefix, nic } => self.populate(prefix, nic),
            Event::Packet { dest, id } => writeln!(out, "{}", self.forward(dest, id))?,
            Event::Advertisement { .. } => writeln!(out, "{line}")?,
            event => return Err(Error::Unexpected(event.kind())),
        }
        Ok(())
    }
}

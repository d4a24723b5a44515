//! The line-oriented event protocol spoken between the stages.

use std::{
    fmt::{Display, Formatter},
    net::Ipv4Addr,
    num::ParseIntError,
    str::FromStr,
};

use thiserror::Error;

use crate::{BitPrefix, InterfaceId, Metric, Subnet};

/// One line of the event protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `T <prefix> <nic>`: bind `prefix` to `nic` in the forwarding table, or remove it if `nic`
    /// is `-1` (`None`).
    TableEntry {
        /// The prefix to modify.
        prefix: BitPrefix,
        /// The outgoing interface, or `None` to delete the entry.
        nic: Option<InterfaceId>,
    },
    /// `P <addr> <id>`: a packet to forward.
    Packet {
        /// Destination address.
        dest: Ipv4Addr,
        /// Opaque packet identifier.
        id: u32,
    },
    /// `U <subnet> <nic> <metric> <update_id>`: a neighbor on `nic` announced `subnet`.
    Update {
        /// The announced destination.
        subnet: Subnet,
        /// Interface on which the update was received.
        nic: InterfaceId,
        /// Metric announced by the neighbor, without the hop to the neighbor.
        metric: Metric,
        /// Correlation identifier.
        update_id: u32,
    },
    /// `A <subnet> <metric> <update_id>`: an advertisement of a changed best route.
    Advertisement {
        /// The destination.
        subnet: Subnet,
        /// The metric of the best route.
        metric: Metric,
        /// Identifier of the triggering update.
        update_id: u32,
    },
    /// `O <id> <nic>`: the result of forwarding a packet (`-1` if no route matched).
    Forwarded {
        /// The packet identifier.
        id: u32,
        /// The chosen interface.
        nic: Option<InterfaceId>,
    },
}

impl Event {
    /// The letter that starts the line of this event.
    pub fn kind(&self) -> char {
        match self {
            Event::TableEntry { .. } => 'T',
            Event::Packet { .. } => 'P',
            Event::Update { .. } => 'U',
            Event::Advertisement { .. } => 'A',
            Event::Forwarded { .. } => 'O',
        }
    }
}

/// Ways in which a line can fail to be an [`Event`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line contains no tokens.
    #[error("empty line")]
    Empty,
    /// The first token does not name an event kind.
    #[error("unknown event kind '{0}'")]
    UnknownKind(String),
    /// The event has too few or too many fields.
    #[error("'{kind}' expects {expected} fields, found {found}")]
    TokenCount {
        /// The event kind.
        kind: char,
        /// Number of fields after the kind.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },
    /// The prefix is not of the form `a.b.c.d/len`.
    #[error("invalid prefix '{token}'")]
    InvalidPrefix {
        /// The offending token.
        token: String,
        /// Reason reported by the parser.
        #[source]
        source: ipnet::AddrParseError,
    },
    /// The address is not of the form `a.b.c.d`.
    #[error("invalid address '{token}'")]
    InvalidAddress {
        /// The offending token.
        token: String,
        /// Reason reported by the parser.
        #[source]
        source: std::net::AddrParseError,
    },
    /// A numeric field cannot be parsed.
    #[error("invalid {field} '{token}'")]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// The offending token.
        token: String,
        /// Reason reported by the parser.
        #[source]
        source: ParseIntError,
    },
    /// An interface id is negative, but not `-1`.
    #[error("invalid interface {0}")]
    InvalidInterface(i64),
}

impl FromStr for Event {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let kind = tokens.next().ok_or(ParseError::Empty)?;
        let fields: Vec<&str> = tokens.collect();
        let kind = match kind.to_ascii_uppercase().as_str() {
            "T" => 'T',
            "P" => 'P',
            "U" => 'U',
            "A" => 'A',
            "O" => 'O',
            _ => return Err(ParseError::UnknownKind(kind.to_string())),
        };
        let expected = match kind {
            'U' => 4,
            'A' => 3,
            _ => 2,
        };
        if fields.len() != expected {
            return Err(ParseError::TokenCount {
                kind,
                expected,
                found: fields.len(),
            });
        }
        Ok(match kind {
            'T' => Event::TableEntry {
                prefix: parse_prefix(fields[0])?,
                nic: parse_optional_nic(fields[1])?,
            },
            'P' => Event::Packet {
                dest: fields[0]
                    .parse::<Ipv4Addr>()
                    .map_err(|source| ParseError::InvalidAddress {
                        token: fields[0].to_string(),
                        source,
                    })?,
                id: parse_number("packet id", fields[1])?,
            },
            'U' => Event::Update {
                subnet: parse_prefix(fields[0])?,
                nic: parse_optional_nic(fields[1])?
                    .ok_or(ParseError::InvalidInterface(-1))?,
                metric: parse_number("metric", fields[2])?,
                update_id: parse_number("update id", fields[3])?,
            },
            'A' => Event::Advertisement {
                subnet: parse_prefix(fields[0])?,
                metric: parse_number("metric", fields[1])?,
                update_id: parse_number("update id", fields[2])?,
            },
            _ => Event::Forwarded {
                id: parse_number("packet id", fields[0])?,
                nic: parse_optional_nic(fields[1])?,
            },
        })
    }
}

fn parse_prefix(token: &str) -> Result<BitPrefix, ParseError> {
    token.parse::<BitPrefix>().map_err(|source| ParseError::InvalidPrefix {
        token: token.to_string(),
        source,
    })
}

fn parse_number<N: FromStr<Err = ParseIntError>>(
    field: &'static str,
    token: &str,
) -> Result<N, ParseError> {
    token.parse::<N>().map_err(|source| ParseError::InvalidNumber {
        field,
        token: token.to_string(),
        source,
    })
}

/// Parse an interface id, where `-1` stands for "no interface".
fn parse_optional_nic(token: &str) -> Result<Option<InterfaceId>, ParseError> {
    match parse_number::<i64>("interface", token)? {
        -1 => Ok(None),
        nic if nic < 0 => Err(ParseError::InvalidInterface(nic)),
        nic => InterfaceId::try_from(nic)
            .map(Some)
            .map_err(|_| ParseError::InvalidInterface(nic)),
    }
}

/// Formats an optional interface the way the protocol expects it (`-1` for none).
pub(crate) struct Nic(pub(crate) Option<InterfaceId>);

impl Display for Nic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(nic) => write!(f, "{nic}"),
            None => f.write_str("-1"),
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::TableEntry { prefix, nic } => write!(f, "T {prefix} {}", Nic(*nic)),
            Event::Packet { dest, id } => write!(f, "P {dest} {id}"),
            Event::Update {
                subnet,
                nic,
                metric,
                update_id,
            } => write!(f, "U {subnet} {nic} {metric} {update_id}"),
            Event::Advertisement {
                subnet,
                metric,
                update_id,
            } => write!(f, "A {subnet} {metric} {update_id}"),
            Event::Forwarded { id, nic } => write!(f, "O {id} {}", Nic(*nic)),
        }
    }
}

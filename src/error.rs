//! Error types of the stages.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{event::ParseError, InterfaceId};

/// Result type of the stages
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot sink could not be opened.
    #[error("cannot open '{}' for writing: {source}", path.display())]
    Snapshot {
        /// Path of the sink.
        path: PathBuf,
        /// Reason reported by the OS.
        #[source]
        source: io::Error,
    },

    /// A line could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The stage does not consume events of this kind.
    #[error("'{0}' events are not handled by this stage")]
    Unexpected(char),

    /// An update names an interface that the router does not have.
    #[error("interface {nic} out of range (router has {num_nics} interfaces)")]
    InterfaceOutOfRange {
        /// The interface named by the update.
        nic: InterfaceId,
        /// Number of configured interfaces.
        num_nics: usize,
    },
}

impl Error {
    /// Returns `true` if the error concerns a single input line, which can be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Parse(_) | Error::Unexpected(_) | Error::InterfaceOutOfRange { .. }
        )
    }
}

//! The two pipeline stages of a router, and the line loop that drives them.
//!
//! Every stage reads one event per line, applies it completely and writes the resulting lines
//! before it reads the next one. Lines that cannot be handled are reported with [`log::warn!`]
//! and skipped.

use std::io::{BufRead, Write};

use log::warn;

use crate::Result;

mod forward;
mod route;

pub use forward::ForwardingStage;
pub use route::RoutingStage;

/// A consumer of protocol lines.
pub trait Stage {
    /// Apply a single line, writing any resulting lines to `out`. Returns a recoverable
    /// [`Error`](crate::Error) if the line is malformed or not meant for this stage.
    fn process_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<()>;
}

/// Feed all lines of `input` into `stage`, in order. Malformed lines, including lines that are
/// not valid UTF-8, are logged and skipped. Only I/O errors abort the loop.
///
/// ```
/// # use ip_router::*;
/// # fn main() -> Result<()> {
/// let mut stage = ForwardingStage::new();
/// let mut out = Vec::new();
/// run(&mut stage, "T 10.0.0.0/8 1\nP 10.1.2.3 42\nP 11.0.0.1 43\n".as_bytes(), &mut out)?;
/// assert_eq!(String::from_utf8(out).unwrap(), "O 42 1\nO 43 -1\n");
/// # Ok(())
/// # }
/// ```
pub fn run<S: Stage, R: BufRead, W: Write>(stage: &mut S, mut input: R, out: &mut W) -> Result<()> {
    let mut buf = Vec::new();
    let mut lineno: usize = 0;
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lineno += 1;
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(&['\n', '\r'][..]),
            Err(e) => {
                warn!("line {lineno}: {e}: {}", String::from_utf8_lossy(&buf).trim_end());
                continue;
            }
        };
        match stage.process_line(line, out) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => warn!("line {lineno}: {e}: {line}"),
            Err(e) => return Err(e),
        }
    }
    out.flush()?;
    Ok(())
}

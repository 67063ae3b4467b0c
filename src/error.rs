//! Crate-wide error type.
//!
//! Every error here is recoverable: the control loop keeps framing and
//! dispatching after reporting one. Nothing in this crate is fatal.

use core::time::Duration;
use snafu::Snafu;

/// Errors reported by the dispatcher and framers.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The requested frequency matches no band plan entry.
    /// VFO state is left untouched and the command is discarded.
    #[snafu(display("frequency {} Hz is outside every configured band", hz))]
    FrequencyOutOfBand { hz: u32 },

    /// A command or reply line exceeded the buffer capacity before a
    /// terminator was seen. The line is clamped, framing continues.
    #[snafu(display("line exceeded {} bytes before a terminator", capacity))]
    BufferOverflow { capacity: usize },

    /// A blocking query did not receive a reply within the deadline.
    #[snafu(display("device did not reply within {:?}", waited))]
    DeviceTimeout { waited: Duration },

    /// The device-facing transport reports the link as down.
    #[snafu(display("device transport is disconnected"))]
    Disconnected,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

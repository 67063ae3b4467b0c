//! Line framing for both directions of serial traffic.
//!
//! Bytes arrive one at a time, at whatever granularity the transport
//! produces them, so both framers are re-entrant per byte and never
//! assume a full line arrives atomically.
//!
//! [`CommandFramer`] handles the controller-facing channel: a `*`
//! sentinel starts (or restarts) a command, CR or LF completes it.
//! [`ReplyFramer`] handles the device-facing channel, which has no
//! sentinel; replies are simply text up to a CR.

use arrayvec::ArrayVec;
use log::{trace, warn};

/// Start-of-command sentinel on the controller channel.
pub const SENTINEL: u8 = b'*';
const CR: u8 = 13;
const LF: u8 = 10;

/// Command buffer capacity, including the terminator slot.
pub const CMD_CAPACITY: usize = 16;
/// Reply buffer capacity, including the terminator slot.
pub const REPLY_CAPACITY: usize = 20;

/// A completed line with its truncation flag.
///
/// `truncated` is set when the sender ran past the buffer capacity
/// before terminating the line; the last byte slot was overwritten
/// rather than grown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<const CAP: usize> {
    bytes: ArrayVec<u8, CAP>,
    truncated: bool,
}

impl<const CAP: usize> Line<CAP> {
    /// Build a line from pre-formatted bytes, e.g. a locally answered
    /// `FA?` reply. Panics if `bytes` exceeds the capacity; callers
    /// only pass fixed-size formatted fields.
    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        let mut out = ArrayVec::new();
        out.try_extend_from_slice(bytes)
            .expect("BUG: local reply exceeds line capacity");
        Self {
            bytes: out,
            truncated: false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The line as a `&str`. Framers only admit ASCII, so this cannot fail.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes).unwrap_or("")
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

/// A completed controller command, sentinel and terminator stripped.
pub type CommandLine = Line<{ CMD_CAPACITY - 1 }>;
/// A completed device reply, terminator stripped.
pub type ReplyLine = Line<{ REPLY_CAPACITY - 1 }>;

/// Appends one upper-cased byte to a bounded buffer, clamping at
/// capacity. Returns true if the byte had to overwrite the last slot.
fn push_clamped<const CAP: usize>(buf: &mut ArrayVec<u8, CAP>, byte: u8) -> bool {
    let byte = byte.to_ascii_uppercase();
    if buf.try_push(byte).is_err() {
        buf.pop();
        buf.push(byte);
        return true;
    }
    false
}

/// Controller-side command framer.
///
/// Three states: idle, collecting after a sentinel, and ready with a
/// complete command. A `*` restarts framing from *any* state, which is
/// what lets the link resynchronize after garbage or a half-sent
/// command.
#[derive(Debug)]
pub enum CommandFramer {
    Idle,
    Collecting {
        buf: ArrayVec<u8, { CMD_CAPACITY - 1 }>,
        truncated: bool,
    },
    Ready(CommandLine),
}

impl CommandFramer {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Feed one byte from the controller channel.
    ///
    /// A terminator moves the framer to `Ready`; the line stays there
    /// until the dispatcher claims it with [`take_line`](Self::take_line).
    /// A completed command left unclaimed is discarded by the next
    /// sentinel, never merged with a later command.
    pub fn push_byte(&mut self, byte: u8) {
        match byte {
            SENTINEL => {
                match self {
                    Self::Collecting { buf, .. } if !buf.is_empty() => {
                        trace!("sentinel received mid-command, restarting framing");
                    }
                    Self::Ready(_) => {
                        warn!("unclaimed command discarded by new sentinel");
                    }
                    _ => {}
                }
                *self = Self::Collecting {
                    buf: ArrayVec::new(),
                    truncated: false,
                };
            }
            CR | LF => {
                if let Self::Collecting { .. } = self {
                    if let Self::Collecting { buf, truncated } =
                        core::mem::replace(self, Self::Idle)
                    {
                        if truncated {
                            warn!("command line clamped to {} bytes", CMD_CAPACITY - 1);
                        }
                        *self = Self::Ready(CommandLine {
                            bytes: buf,
                            truncated,
                        });
                    }
                }
                // Terminator in Idle or Ready: nothing in progress.
            }
            b => {
                if let Self::Collecting { buf, truncated } = self {
                    *truncated |= push_clamped(buf, b);
                }
            }
        }
    }

    /// Claim the completed command, transitioning Ready back to Idle.
    pub fn take_line(&mut self) -> Option<CommandLine> {
        if let Self::Ready(_) = self {
            if let Self::Ready(line) = core::mem::replace(self, Self::Idle) {
                return Some(line);
            }
        }
        None
    }

    /// Feed a slice of bytes, returning the first completed command
    /// and how many bytes were consumed producing it.
    ///
    /// Bytes after the first terminator are *not* consumed: commands
    /// are dispatched strictly in terminator order, one at a time.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> (usize, Option<CommandLine>) {
        for (i, &b) in bytes.iter().enumerate() {
            self.push_byte(b);
            if let Some(line) = self.take_line() {
                return (i + 1, Some(line));
            }
        }
        (bytes.len(), None)
    }
}

impl Default for CommandFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Device-side reply framer.
///
/// Two states only: collecting, and complete-on-CR. The device channel
/// has no sentinel; a reply starts with its first byte. LF and
/// non-ASCII bytes are dropped, matching the board's observed output.
#[derive(Debug, Default)]
pub struct ReplyFramer {
    buf: ArrayVec<u8, { REPLY_CAPACITY - 1 }>,
    truncated: bool,
}

impl ReplyFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte from the device channel. Returns the completed
    /// reply when this byte was its CR terminator, and resets for the
    /// next reply.
    pub fn push_byte(&mut self, byte: u8) -> Option<ReplyLine> {
        match byte {
            CR => {
                let framer = core::mem::take(self);
                if framer.truncated {
                    warn!("device reply clamped to {} bytes", REPLY_CAPACITY - 1);
                }
                Some(ReplyLine {
                    bytes: framer.buf,
                    truncated: framer.truncated,
                })
            }
            LF => None,
            SENTINEL => {
                // A sentinel cancels framing in progress on either
                // channel; the device never emits one inside a reply.
                self.reset();
                None
            }
            b if b.is_ascii() => {
                self.truncated |= push_clamped(&mut self.buf, b);
                None
            }
            _ => None,
        }
    }

    /// Discard any partially collected reply.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.truncated = false;
    }
}

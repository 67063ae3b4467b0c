//! Device-facing transport abstraction.
//!
//! The core never opens or enumerates USB itself; it is handed
//! something that can move bytes to and from the board and report
//! whether the link is up. Real implementations wrap a USB-serial
//! port; tests use an in-memory simulation.

/// Connection state reported by the transport.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Link {
    Connected,
    Disconnected,
}

/// Byte-level access to the device channel.
///
/// The protocol is half-duplex and character-at-a-time, so reads are
/// polled: `read_byte` returns `None` when nothing is pending, and the
/// dispatcher combines `bytes_available` with its own deadline for
/// bounded blocking waits.
pub trait Transport {
    /// Number of bytes ready to read without blocking.
    fn bytes_available(&self) -> usize;

    /// Read one byte if one is pending.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission. Writes on a down link are
    /// expected to be dropped by the implementation.
    fn write(&mut self, bytes: &[u8]);

    /// Current link state.
    fn connection_state(&self) -> Link;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn bytes_available(&self) -> usize {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn write(&mut self, bytes: &[u8]) {
        (**self).write(bytes)
    }

    fn connection_state(&self) -> Link {
        (**self).connection_state()
    }
}

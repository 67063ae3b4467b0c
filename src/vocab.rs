//! Device-native command vocabulary and outbound wire encoding.
//!
//! The board speaks short ASCII commands framed as `*<command><CR>`.
//! The templates here are the subset this layer issues itself; the
//! dispatcher also forwards unrecognized controller commands verbatim
//! through [`encode_raw`].

use arrayvec::ArrayVec;

/// Longest native command body, excluding the `*` prefix and CR.
const TEMPLATE_MAX: usize = 15;

/// An encoded outbound device command: `*` + body + CR.
pub type WireCommand = ArrayVec<u8, { TEMPLATE_MAX + 2 }>;

/// Logical operations with a native command template.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum NativeCommand {
    /// `F` + digits: set LO frequency (3 to 30 MHz range).
    SetFrequency,
    /// `F?`: query current LO frequency.
    QueryFrequency,
    /// `?`: query device name, e.g. "RSHFIQ".
    QueryDeviceName,
    /// `W`: query firmware version, e.g. "RS-HFIQ FW 2.4a".
    QueryVersion,
    /// `X0` / `X1`: transmit off / on.
    TransmitOff,
    TransmitOn,
    /// `T`: on-board temperature in degrees C.
    QueryTemperature,
    /// `L`: analog read.
    QueryAnalogRead,
    /// `E?` / `E` + digits: external/CW frequency (PLL clock 1).
    QueryExtFrequency,
    SetExtFrequency,
    /// `D?` / `D` + digits: offset added to LO, BIT or EXT frequency.
    QueryOffset,
    SetOffset,
    /// `C`: clipping indicator.
    QueryClipping,
    /// `B?` / `B` + digits: built-in-test frequency (PLL clock 2).
    QueryBitFrequency,
    SetBitFrequency,
    /// `OF1`: enable the LO clock output (PLL init).
    InitPll,
}

impl NativeCommand {
    /// The native command template, without framing.
    pub const fn template(self) -> &'static str {
        use NativeCommand::*;
        match self {
            SetFrequency => "F",
            QueryFrequency => "F?",
            QueryDeviceName => "?",
            QueryVersion => "W",
            TransmitOff => "X0",
            TransmitOn => "X1",
            QueryTemperature => "T",
            QueryAnalogRead => "L",
            QueryExtFrequency => "E?",
            SetExtFrequency => "E",
            QueryOffset => "D?",
            SetOffset => "D",
            QueryClipping => "C",
            QueryBitFrequency => "B?",
            SetBitFrequency => "B",
            InitPll => "OF1",
        }
    }

    /// Encode with a variable argument, e.g. frequency digits.
    /// Arguments past the wire capacity are clamped; the board would
    /// reject such a command anyway.
    pub fn encode_with(self, args: &[u8]) -> WireCommand {
        encode_body(self.template().as_bytes(), args)
    }

    /// Encode a fixed (argument-less) command.
    pub fn encode(self) -> WireCommand {
        self.encode_with(b"")
    }
}

/// Frame a verbatim pass-through command for the device channel.
pub fn encode_raw(body: &[u8]) -> WireCommand {
    encode_body(body, b"")
}

fn encode_body(body: &[u8], args: &[u8]) -> WireCommand {
    let mut out = WireCommand::new();
    out.push(b'*');
    for &b in body.iter().chain(args) {
        if out.len() == out.capacity() - 1 {
            break;
        }
        out.push(b);
    }
    out.push(13);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_commands() {
        assert_eq!(NativeCommand::QueryFrequency.encode().as_slice(), b"*F?\r");
        assert_eq!(NativeCommand::QueryDeviceName.encode().as_slice(), b"*?\r");
        assert_eq!(NativeCommand::InitPll.encode().as_slice(), b"*OF1\r");
        assert_eq!(NativeCommand::TransmitOn.encode().as_slice(), b"*X1\r");
    }

    #[test]
    fn variable_commands() {
        assert_eq!(
            NativeCommand::SetFrequency.encode_with(b"7074000").as_slice(),
            b"*F7074000\r"
        );
        assert_eq!(
            NativeCommand::SetOffset.encode_with(b"500").as_slice(),
            b"*D500\r"
        );
    }

    #[test]
    fn raw_passthrough() {
        assert_eq!(encode_raw(b"OF2").as_slice(), b"*OF2\r");
    }

    #[test]
    fn oversize_body_is_clamped() {
        let cmd = NativeCommand::SetExtFrequency.encode_with(b"0123456789012345678");
        assert_eq!(cmd.len(), cmd.capacity());
        assert_eq!(*cmd.last().unwrap(), 13);
        assert_eq!(cmd[0], b'*');
    }
}

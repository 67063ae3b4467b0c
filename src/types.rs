//! Range-checked frequency type and its on-wire representations.

use core::convert::TryFrom;
use core::fmt;
use core::ops::Deref;
use core::str::FromStr;

use arrayvec::ArrayVec;

use crate::error::Error;

/// Maximum number of digits in the device's frequency fields.
pub(crate) const FREQ_DIGITS: usize = 9;

/// A frequency in hertz, limited to what fits in the device's
/// nine-digit ASCII frequency fields.
///
/// ## Example
/// ```
/// use rshfiq_cat::Frequency;
/// let f = Frequency::new(7_074_000).unwrap();
/// assert_eq!(*f, 7_074_000);
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct Frequency(u32);

/// Create a new [`Frequency`], panics if it does not fit nine digits.
pub const fn freq(hz: u32) -> Frequency {
    if hz < 1_000_000_000 {
        return Frequency(hz);
    }
    panic!("Frequency does not fit nine digits.")
}

impl Frequency {
    /// Create a new `Frequency`, checking that it can be represented
    /// in the nine-digit on-wire format.
    ///
    /// # Errors
    /// Returns [`Error::FrequencyOutOfBand`] if `hz` is too large for
    /// the wire format. Band plan membership is checked separately by
    /// the dispatcher.
    pub fn new(hz: u32) -> Result<Self, Error> {
        if hz < 1_000_000_000 {
            Ok(Self(hz))
        } else {
            Err(Error::FrequencyOutOfBand { hz })
        }
    }

    /// The frequency in hertz.
    pub const fn hz(self) -> u32 {
        self.0
    }

    /// Apply a signed step, e.g. from the `,`/`.`/`K`/`L` tuning commands.
    /// Returns `None` on under/overflow; the caller still has to validate
    /// the result against the band plan.
    pub fn checked_step(self, delta: i32) -> Option<Self> {
        let stepped = if delta.is_negative() {
            self.0.checked_sub(delta.unsigned_abs())?
        } else {
            self.0.checked_add(delta as u32)?
        };
        Self::new(stepped).ok()
    }

    /// Minimal decimal digits, as sent in `*F<digits>` device commands.
    pub(crate) fn to_digits(self) -> ArrayVec<u8, FREQ_DIGITS> {
        let mut buf = ArrayVec::new();
        let mut x = self.0;
        loop {
            buf.push(b'0' + (x % 10) as u8);
            x /= 10;
            if x == 0 {
                break;
            }
        }
        buf.reverse();
        buf
    }

    /// Nine-digit zero-padded field, as used in `*FA.../*FB...` replies
    /// to the controller.
    pub(crate) fn to_padded(self) -> [u8; FREQ_DIGITS] {
        let mut buf = [0; FREQ_DIGITS];
        let mut x = self.0;
        for c in buf.iter_mut().rev() {
            *c = b'0' + (x % 10) as u8;
            x /= 10;
        }
        buf
    }
}

impl Deref for Frequency {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

impl PartialEq<u32> for Frequency {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl TryFrom<u32> for Frequency {
    type Error = Error;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::new(hz)
    }
}

impl FromStr for Frequency {
    type Err = Error;

    /// Parses the on-wire decimal digit form. Malformed digit strings map
    /// to `FrequencyOutOfBand { hz: 0 }`, the same rejection the band plan
    /// would produce for a zero frequency.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hz = s.parse().map_err(|_| Error::FrequencyOutOfBand { hz: 0 })?;
        Self::new(hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_limits() {
        assert_eq!(Frequency::new(7_074_000).unwrap(), 7_074_000);
        assert_eq!(Frequency::new(999_999_999).unwrap(), 999_999_999);
        assert!(Frequency::new(1_000_000_000).is_err());
    }

    #[test]
    fn test_wire_digits() {
        let f = freq(7_074_000);
        assert_eq!(f.to_digits().as_slice(), b"7074000");
        assert_eq!(&f.to_padded(), b"007074000");

        assert_eq!(freq(0).to_digits().as_slice(), b"0");
        assert_eq!(&freq(0).to_padded(), b"000000000");
    }

    #[test]
    fn test_parse() {
        assert_eq!("7074000".parse::<Frequency>().unwrap(), freq(7_074_000));
        assert!("".parse::<Frequency>().is_err());
        assert!("7074x".parse::<Frequency>().is_err());
        assert!("1000000000".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_checked_step() {
        let f = freq(7_074_000);
        assert_eq!(f.checked_step(1000), Some(freq(7_075_000)));
        assert_eq!(f.checked_step(-10), Some(freq(7_073_990)));
        assert_eq!(freq(5).checked_step(-10), None);
        assert_eq!(freq(999_999_999).checked_step(10), None);
    }
}

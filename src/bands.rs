//! Frequency-to-band lookup and band plan validation.
//!
//! The transceiver board switches its RF filters per band, so every
//! frequency change is validated against a band plan before it is
//! forwarded. The default plan covers the nine HF bands the board's
//! filters support, 80 m through 10 m, with the 60 m and 30 m entries
//! widened down to the lower side of WWV.

use core::fmt;

use snafu::{ensure, Snafu};

use crate::types::Frequency;

/// Numeric band identifier, compatible with external band tables.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct BandId(pub u8);

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "band {}", self.0)
    }
}

/// One entry in the band plan.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BandEntry {
    pub id: BandId,
    /// Friendly label, at most nine characters.
    pub label: &'static str,
    /// Lower band edge in Hz, inclusive.
    pub lower_hz: u32,
    /// Upper band edge in Hz, inclusive.
    pub upper_hz: u32,
}

impl BandEntry {
    const fn new(id: u8, label: &'static str, lower_hz: u32, upper_hz: u32) -> Self {
        Self {
            id: BandId(id),
            label,
            lower_hz,
            upper_hz,
        }
    }

    fn contains(&self, f: Frequency) -> bool {
        self.lower_hz <= *f && *f <= self.upper_hz
    }
}

/// Errors detected while validating a band plan.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum BandPlanError {
    #[snafu(display("band plan has no entries"))]
    Empty,
    #[snafu(display("{} has lower edge above its upper edge", id))]
    InvertedEdges { id: BandId },
    #[snafu(display("{} overlaps or is out of order with the previous entry", id))]
    Overlap { id: BandId },
    #[snafu(display("{} has a label longer than nine characters", id))]
    LabelTooLong { id: BandId },
}

const DEFAULT_PLAN: [BandEntry; 9] = [
    BandEntry::new(1, "80M", 3_500_000, 4_000_000),
    BandEntry::new(2, "60M", 4_990_000, 5_367_000),
    BandEntry::new(3, "40M", 7_000_000, 7_300_000),
    BandEntry::new(4, "30M", 9_990_000, 10_150_000),
    BandEntry::new(5, "20M", 14_000_000, 14_350_000),
    BandEntry::new(6, "17M", 18_068_000, 18_168_000),
    BandEntry::new(7, "15M", 21_000_000, 21_450_000),
    BandEntry::new(8, "12M", 24_890_000, 24_990_000),
    BandEntry::new(9, "10M", 28_000_000, 29_600_000),
];

/// An immutable, validated band plan.
///
/// Entries are kept in ascending frequency order. Gaps between entries
/// are allowed (e.g. between 60 m and 40 m), overlaps are not.
#[derive(Debug, Clone)]
pub struct BandPlan {
    entries: Vec<BandEntry>,
}

impl BandPlan {
    /// Build a plan from caller-supplied entries, validating edge order
    /// and non-overlap.
    ///
    /// # Errors
    /// Returns a [`BandPlanError`] describing the first invalid entry.
    pub fn new(entries: impl Into<Vec<BandEntry>>) -> Result<Self, BandPlanError> {
        let entries = entries.into();
        ensure!(!entries.is_empty(), EmptySnafu);
        for (i, e) in entries.iter().enumerate() {
            ensure!(e.lower_hz <= e.upper_hz, InvertedEdgesSnafu { id: e.id });
            ensure!(e.label.len() <= 9, LabelTooLongSnafu { id: e.id });
            if i > 0 {
                ensure!(entries[i - 1].upper_hz < e.lower_hz, OverlapSnafu { id: e.id });
            }
        }
        Ok(Self { entries })
    }

    /// Returns the id of the band containing `f`, or `None` if the
    /// frequency falls outside every entry (including gaps between bands).
    ///
    /// Scans from the highest entry down, mirroring the board firmware's
    /// lookup order. Side-effect-free; the caller decides how to react
    /// to a miss.
    pub fn resolve(&self, f: Frequency) -> Option<BandId> {
        self.entries.iter().rev().find(|e| e.contains(f)).map(|e| e.id)
    }

    /// All entries in ascending frequency order.
    pub fn entries(&self) -> &[BandEntry] {
        &self.entries
    }
}

impl Default for BandPlan {
    /// The board's stock nine-band HF plan.
    fn default() -> Self {
        Self {
            entries: DEFAULT_PLAN.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::freq;

    #[test]
    fn resolve_inside_each_band() {
        let plan = BandPlan::default();
        let expected = [
            (3_573_000, 1),
            (5_357_000, 2),
            (7_074_000, 3),
            (10_136_000, 4),
            (14_074_000, 5),
            (18_100_000, 6),
            (21_074_000, 7),
            (24_915_000, 8),
            (28_074_000, 9),
        ];
        for &(hz, id) in &expected {
            assert_eq!(plan.resolve(freq(hz)), Some(BandId(id)), "{} Hz", hz);
        }
    }

    #[test]
    fn resolve_band_edges() {
        let plan = BandPlan::default();
        // Lower edges, inclusive
        assert_eq!(plan.resolve(freq(3_500_000)), Some(BandId(1)));
        assert_eq!(plan.resolve(freq(28_000_000)), Some(BandId(9)));
        // Upper edges, inclusive
        assert_eq!(plan.resolve(freq(4_000_000)), Some(BandId(1)));
        assert_eq!(plan.resolve(freq(29_600_000)), Some(BandId(9)));
        // One hertz outside
        assert_eq!(plan.resolve(freq(3_499_999)), None);
        assert_eq!(plan.resolve(freq(29_600_001)), None);
    }

    #[test]
    fn resolve_gaps_and_out_of_span() {
        let plan = BandPlan::default();
        assert_eq!(plan.resolve(freq(0)), None);
        assert_eq!(plan.resolve(freq(6_000_000)), None); // 60m/40m gap
        assert_eq!(plan.resolve(freq(13_500_000)), None); // broadcast
        assert_eq!(plan.resolve(freq(50_313_000)), None); // above 10m
    }

    #[test]
    fn plan_validation() {
        assert_eq!(BandPlan::new(Vec::new()).unwrap_err(), BandPlanError::Empty);

        let inverted = [BandEntry::new(1, "80M", 4_000_000, 3_500_000)];
        assert_eq!(
            BandPlan::new(inverted.as_ref()).unwrap_err(),
            BandPlanError::InvertedEdges { id: BandId(1) }
        );

        let overlapping = [
            BandEntry::new(1, "80M", 3_500_000, 4_000_000),
            BandEntry::new(2, "60M", 3_900_000, 5_367_000),
        ];
        assert_eq!(
            BandPlan::new(overlapping.as_ref()).unwrap_err(),
            BandPlanError::Overlap { id: BandId(2) }
        );

        let misordered = [
            BandEntry::new(3, "40M", 7_000_000, 7_300_000),
            BandEntry::new(1, "80M", 3_500_000, 4_000_000),
        ];
        assert!(BandPlan::new(misordered.as_ref()).is_err());

        assert!(BandPlan::new(DEFAULT_PLAN.as_ref()).is_ok());
    }
}

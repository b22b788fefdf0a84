//! Thermistor lookup tables
//!
//! A table maps raw ADC counts to temperatures. Rows are ordered by
//! ascending raw value; for NTC thermistors on a pull-up divider that
//! means descending temperature. Temperatures between rows are linearly
//! interpolated, readings past either end clamp to the end row.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::temperature::Temperature;

/// Maximum rows per lookup table
pub const MAX_TABLE_ENTRIES: usize = 32;

/// One (raw, temperature) row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableEntry {
    /// ADC reading
    pub raw: u16,
    /// Temperature at that reading
    pub temp: Temperature,
}

impl TableEntry {
    /// Create a row from an ADC count and a quarter-degree temperature
    pub const fn new(raw: u16, quarters: u16) -> Self {
        Self {
            raw,
            temp: Temperature::from_quarters(quarters),
        }
    }
}

/// 100K thermistor on a 4.7K pull-up, 10-bit ADC
///
/// Generated for r0=100000, t0=25, r2=4700, beta=4066 with 50 points, then
/// trimmed in the low range. The 200-250 °C region was corrected against a
/// thermocouple.
///
/// Format: (adc, temperature * 4)
pub const EXTRUDER_100K: [TableEntry; 20] = [
    TableEntry::new(5, 2000),   // 500 °C
    TableEntry::new(6, 1896),   // 474 °C
    TableEntry::new(8, 1792),   // 448 °C
    TableEntry::new(9, 1688),   // 422 °C
    TableEntry::new(12, 1584),  // 396 °C
    TableEntry::new(15, 1480),  // 370 °C
    TableEntry::new(20, 1376),  // 344 °C
    TableEntry::new(26, 1272),  // 318 °C
    TableEntry::new(35, 1168),  // 292 °C
    TableEntry::new(49, 984),   // 246 °C
    TableEntry::new(70, 916),   // 229 °C
    TableEntry::new(103, 800),  // 200 °C
    TableEntry::new(155, 723),  // 180.75 °C
    TableEntry::new(236, 632),  // 158 °C
    TableEntry::new(359, 544),  // 136 °C
    TableEntry::new(526, 440),  // 110 °C
    TableEntry::new(711, 336),  // 84 °C
    TableEntry::new(867, 232),  // 58 °C
    TableEntry::new(962, 128),  // 32 °C
    TableEntry::new(1005, 24),  // 6 °C
];

/// Owned lookup table loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LookupTable {
    entries: Vec<TableEntry, MAX_TABLE_ENTRIES>,
}

impl LookupTable {
    /// Copy rows into a table
    ///
    /// Only capacity is checked here; ordering is checked by
    /// [`LookupTable::validate`] once the table's index is known.
    pub fn from_entries(entries: &[TableEntry]) -> Result<Self, ConfigError> {
        let entries = Vec::from_slice(entries).map_err(|_| ConfigError::TooManyEntries)?;
        Ok(Self { entries })
    }

    /// Rows in ascending raw order
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Check the table is non-empty and strictly ascending in raw value
    ///
    /// `table` is only used to label the error.
    pub fn validate(&self, table: u8) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyTable { table });
        }

        for (i, pair) in self.entries.windows(2).enumerate() {
            if pair[1].raw <= pair[0].raw {
                return Err(ConfigError::UnsortedTable {
                    table,
                    entry: (i + 1) as u8,
                });
            }
        }

        Ok(())
    }

    /// Convert a raw reading using this table
    pub fn lookup(&self, raw: u16) -> Temperature {
        interpolate(&self.entries, raw)
    }
}

/// Piecewise-linear interpolation over ascending-raw rows
///
/// Finds the first row whose raw value exceeds `raw` and interpolates
/// between it and the row before:
///
/// ```text
/// y = ((x - x0) * y1 + (x1 - x) * y0) / (x1 - x0)
/// ```
///
/// Intermediate products are 32-bit. A reading equal to or past the last
/// row yields the last row's temperature; one below the first row yields
/// the first row's temperature. An empty table yields zero.
pub fn interpolate(entries: &[TableEntry], raw: u16) -> Temperature {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return Temperature::ZERO;
    };

    if raw < first.raw {
        return first.temp;
    }

    for pair in entries.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi.raw > raw {
            let span = u32::from(hi.raw - lo.raw);
            let weighted = u32::from(raw - lo.raw) * u32::from(hi.temp.quarters())
                + u32::from(hi.raw - raw) * u32::from(lo.temp.quarters());
            // convex combination of two u16 values, cannot exceed u16::MAX
            let temp = Temperature::from_quarters((weighted / span) as u16);
            trace!("raw {} between {} and {}: {}", raw, lo.raw, hi.raw, temp);
            return temp;
        }
    }

    last.temp
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference() -> LookupTable {
        LookupTable::from_entries(&EXTRUDER_100K).unwrap()
    }

    #[test]
    fn test_reference_table_is_valid() {
        assert_eq!(reference().validate(0), Ok(()));
    }

    #[test]
    fn test_exact_rows() {
        let table = reference();
        for entry in EXTRUDER_100K.iter() {
            assert_eq!(table.lookup(entry.raw), entry.temp, "raw {}", entry.raw);
        }
    }

    #[test]
    fn test_end_points() {
        let table = reference();
        assert_eq!(table.lookup(5).quarters(), 2000);
        assert_eq!(table.lookup(1005).quarters(), 24);
    }

    #[test]
    fn test_midpoint() {
        // Halfway between (6, 1896) and (8, 1792)
        assert_eq!(reference().lookup(7).quarters(), 1844);
    }

    #[test]
    fn test_truncating_division() {
        // (38 * 24 + 5 * 128) / 43 = 1552 / 43 = 36.09
        assert_eq!(reference().lookup(1000).quarters(), 36);
    }

    #[test]
    fn test_clamp_above_last_row() {
        let table = reference();
        assert_eq!(table.lookup(1006).quarters(), 24);
        assert_eq!(table.lookup(1023).quarters(), 24);
        assert_eq!(table.lookup(u16::MAX).quarters(), 24);
    }

    #[test]
    fn test_clamp_below_first_row() {
        let table = reference();
        assert_eq!(table.lookup(0).quarters(), 2000);
        assert_eq!(table.lookup(4).quarters(), 2000);
    }

    #[test]
    fn test_wide_values_do_not_overflow() {
        let table = LookupTable::from_entries(&[
            TableEntry::new(0, u16::MAX),
            TableEntry::new(u16::MAX, u16::MAX - 1),
        ])
        .unwrap();
        assert_eq!(table.lookup(1).quarters(), u16::MAX - 1);
        assert_eq!(table.lookup(0).quarters(), u16::MAX);
    }

    #[test]
    fn test_single_row_table() {
        let table = LookupTable::from_entries(&[TableEntry::new(100, 400)]).unwrap();
        assert_eq!(table.validate(0), Ok(()));
        assert_eq!(table.lookup(50).quarters(), 400);
        assert_eq!(table.lookup(500).quarters(), 400);
    }

    #[test]
    fn test_empty_table() {
        let table = LookupTable::default();
        assert_eq!(table.validate(2), Err(ConfigError::EmptyTable { table: 2 }));
        assert_eq!(table.lookup(100), Temperature::ZERO);
    }

    #[test]
    fn test_unsorted_table_rejected() {
        let table = LookupTable::from_entries(&[
            TableEntry::new(5, 2000),
            TableEntry::new(9, 1688),
            TableEntry::new(8, 1792),
        ])
        .unwrap();
        assert_eq!(
            table.validate(1),
            Err(ConfigError::UnsortedTable { table: 1, entry: 2 })
        );
    }

    #[test]
    fn test_duplicate_raw_rejected() {
        let table =
            LookupTable::from_entries(&[TableEntry::new(5, 2000), TableEntry::new(5, 1900)])
                .unwrap();
        assert!(matches!(
            table.validate(0),
            Err(ConfigError::UnsortedTable { entry: 1, .. })
        ));
    }

    #[test]
    fn test_too_many_entries() {
        let rows = [TableEntry::new(0, 0); MAX_TABLE_ENTRIES + 1];
        assert_eq!(
            LookupTable::from_entries(&rows),
            Err(ConfigError::TooManyEntries)
        );
    }

    proptest! {
        #[test]
        fn prop_reference_is_non_increasing(a in 0u16..=1100, b in 0u16..=1100) {
            let table = reference();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.lookup(lo) >= table.lookup(hi));
        }

        #[test]
        fn prop_result_within_neighbouring_rows(raw in 5u16..1005) {
            let idx = EXTRUDER_100K.iter().position(|e| e.raw > raw).unwrap();
            let (lo, hi) = (EXTRUDER_100K[idx - 1], EXTRUDER_100K[idx]);
            let temp = reference().lookup(raw);
            prop_assert!(temp <= lo.temp);
            prop_assert!(temp >= hi.temp);
        }
    }
}

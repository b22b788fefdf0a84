//! Configuration errors

use core::fmt;

/// Errors found while building or validating a sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Lookup table has no rows
    EmptyTable { table: u8 },
    /// Row `entry` does not have a larger raw value than the row before it
    UnsortedTable { table: u8, entry: u8 },
    /// Lookup table exceeds its row capacity
    TooManyEntries,
    /// Sensor list exceeds its capacity
    TooManySensors,
    /// Table list exceeds its capacity
    TooManyTables,
    /// Thermistor refers to a table that is not configured
    UnknownTable { sensor: u8, table: u8 },
    /// Sensor kind's conversion routine is not compiled into this build
    KindDisabled { sensor: u8 },
    /// Sensor name does not fit the label buffer
    NameTooLong,
    /// Residency time given with a zero tick period
    ZeroTickPeriod,
    /// Stored configuration image could not be decoded or encoded
    Decode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyTable { table } => write!(f, "lookup table {table} is empty"),
            ConfigError::UnsortedTable { table, entry } => write!(
                f,
                "lookup table {table} row {entry} is not in ascending raw order"
            ),
            ConfigError::TooManyEntries => f.write_str("lookup table has too many rows"),
            ConfigError::TooManySensors => f.write_str("too many sensors"),
            ConfigError::TooManyTables => f.write_str("too many lookup tables"),
            ConfigError::UnknownTable { sensor, table } => {
                write!(f, "sensor {sensor} uses missing lookup table {table}")
            }
            ConfigError::KindDisabled { sensor } => {
                write!(f, "sensor {sensor} uses a kind not built into this firmware")
            }
            ConfigError::NameTooLong => f.write_str("sensor name too long"),
            ConfigError::ZeroTickPeriod => f.write_str("tick period must be non-zero"),
            ConfigError::Decode => f.write_str("malformed configuration image"),
        }
    }
}

impl core::error::Error for ConfigError {}

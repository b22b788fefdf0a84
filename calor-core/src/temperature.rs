//! 14.2 fixed-point temperature
//!
//! Temperatures are unsigned 16-bit integers counting quarter degrees,
//! giving a range of 0 - 16383.75 °C at 0.25 °C resolution. Every value
//! that crosses a module boundary in this crate uses this unit, lookup
//! table entries included.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperature in quarter degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Temperature(u16);

impl Temperature {
    /// 0.00 °C, also "no active target"
    pub const ZERO: Self = Self(0);

    /// 16383.75 °C, the largest representable value
    pub const MAX: Self = Self(u16::MAX);

    /// Create from a raw quarter-degree count
    pub const fn from_quarters(quarters: u16) -> Self {
        Self(quarters)
    }

    /// Create from whole degrees, saturating at [`Temperature::MAX`]
    pub const fn from_celsius(celsius: u16) -> Self {
        if celsius > u16::MAX / 4 {
            Self::MAX
        } else {
            Self(celsius * 4)
        }
    }

    /// Raw quarter-degree count
    pub const fn quarters(self) -> u16 {
        self.0
    }

    /// Integer part in degrees
    pub const fn whole_degrees(self) -> u16 {
        self.0 >> 2
    }

    /// Fractional part in hundredths of a degree (0, 25, 50 or 75)
    pub const fn hundredths(self) -> u8 {
        (self.0 & 3) as u8 * 25
    }

    /// Distance between two temperatures in quarter degrees
    pub const fn abs_diff(self, other: Self) -> u16 {
        self.0.abs_diff(other.0)
    }

    /// One quarter degree closer to `target`, or unchanged if already there
    pub const fn step_toward(self, target: Self) -> Self {
        if target.0 > self.0 {
            Self(self.0 + 1)
        } else if target.0 < self.0 {
            Self(self.0 - 1)
        } else {
            self
        }
    }
}

impl From<u16> for Temperature {
    fn from(quarters: u16) -> Self {
        Self(quarters)
    }
}

impl From<Temperature> for u16 {
    fn from(temp: Temperature) -> Self {
        temp.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.whole_degrees(), self.hundredths())
    }
}

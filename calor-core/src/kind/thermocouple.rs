//! Thermocouple amplifier conversions
//!
//! MAX6675 words look like this, MSB first:
//!
//! ```text
//! D15      D14..D3        D2       D1         D0
//! dummy 0  temp * 4       TC open  device id  three-state
//! ```
//!
//! The AD595 produces 10 mV/°C, which on a 5 V 10-bit ADC is
//! `raw * 500 / 1024` degrees, or `raw * 500 >> 8` quarter degrees.

#[cfg(feature = "max6675")]
use super::{Conversion, SensorFlags};
#[cfg(any(feature = "max6675", feature = "ad595"))]
use crate::temperature::Temperature;

/// Ticks between MAX6675 reads
///
/// The chip needs about 220 ms per conversion; 25 ticks is 250 ms at the
/// reference 10 ms tick.
#[cfg(feature = "max6675")]
pub const MAX6675_REARM_TICKS: u16 = 25;

/// Bits that must read zero when a MAX6675 is answering
#[cfg(feature = "max6675")]
const MAX6675_ID_MASK: u16 = 0x8002;

/// Thermocouple-open bit
#[cfg(feature = "max6675")]
const MAX6675_OPEN: u16 = 0x0004;

/// Status bits below the temperature field
#[cfg(feature = "max6675")]
const MAX6675_STATUS_BITS: u32 = 3;

/// Decode a MAX6675 word
///
/// The flags are authoritative: check them for absent or open sensors.
/// In those cases the reading is [`Temperature::MAX`], which only exists so
/// that a heater acting on the reading alone sees an over-temperature rather
/// than a plausible value. It is not a measurement.
#[cfg(feature = "max6675")]
pub fn decode_max6675(word: u16) -> Conversion {
    if word & MAX6675_ID_MASK != 0 {
        return Conversion {
            reading: Some(Temperature::MAX),
            flags: Some(SensorFlags {
                present: false,
                open: false,
            }),
        };
    }

    if word & MAX6675_OPEN != 0 {
        return Conversion {
            reading: Some(Temperature::MAX),
            flags: Some(SensorFlags {
                present: true,
                open: true,
            }),
        };
    }

    Conversion {
        reading: Some(Temperature::from_quarters(word >> MAX6675_STATUS_BITS)),
        flags: Some(SensorFlags {
            present: true,
            open: false,
        }),
    }
}

/// Scale an AD595 ADC count to quarter degrees, saturating
#[cfg(feature = "ad595")]
pub fn scale_ad595(raw: u16) -> Temperature {
    let quarters = (u32::from(raw) * 500) >> 8;
    Temperature::from_quarters(u16::try_from(quarters).unwrap_or(u16::MAX))
}

//! Sensor kinds and the conversion engine
//!
//! Each configured sensor has one [`SensorKind`]. The kind decides where the
//! raw value comes from ([`SensorKind::sample`]), how it becomes a
//! temperature ([`SensorKind::convert`]) and how many ticks must pass before
//! the sensor may be read again ([`SensorKind::rearm_interval`]).
//!
//! Every kind is always declared so stored configurations decode the same
//! way on every build, but only the kinds selected by cargo features carry a
//! conversion routine. A kind without one converts to nothing and leaves the
//! previous reading in place.

pub mod thermocouple;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::table::LookupTable;
use crate::temperature::Temperature;
use crate::traits::SensorBus;

/// Ticks between reads of a remote temperature board
///
/// Matches the board's reporting cadence of roughly 250 ms at a 10 ms tick.
pub const INTERCOM_REARM_TICKS: u16 = 25;

/// Temperature sensor hardware kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorKind {
    /// NTC thermistor on an ADC input, converted through lookup table `table`
    Thermistor { table: u8 },
    /// MAX6675 thermocouple amplifier, read bit-serially
    Max6675,
    /// AD595 thermocouple amplifier on an ADC input (10 mV/°C)
    Ad595,
    /// Sensor on a remote board reached over a serial link
    Intercom,
    /// Simulated sensor that drifts toward its target
    Dummy,
    /// PT100 RTD (no conversion routine yet)
    Pt100,
}

impl SensorKind {
    /// Whether this build carries a conversion routine for the kind
    pub const fn is_enabled(&self) -> bool {
        match self {
            SensorKind::Thermistor { .. } => cfg!(feature = "thermistor"),
            SensorKind::Max6675 => cfg!(feature = "max6675"),
            SensorKind::Ad595 => cfg!(feature = "ad595"),
            SensorKind::Intercom => cfg!(feature = "intercom"),
            SensorKind::Dummy => cfg!(feature = "dummy"),
            // declared so configs can name it; converts to nothing
            SensorKind::Pt100 => true,
        }
    }

    /// Lookup table used by the kind, if any
    pub const fn table(&self) -> Option<u8> {
        match self {
            SensorKind::Thermistor { table } => Some(*table),
            _ => None,
        }
    }

    /// Whether setpoints must be forwarded over the remote link
    pub const fn forwards_target(&self) -> bool {
        matches!(self, SensorKind::Intercom) && cfg!(feature = "intercom")
    }

    /// Ticks to skip after a read before the sensor is read again
    pub const fn rearm_interval(&self) -> u16 {
        match self {
            #[cfg(feature = "max6675")]
            SensorKind::Max6675 => thermocouple::MAX6675_REARM_TICKS,
            #[cfg(feature = "intercom")]
            SensorKind::Intercom => INTERCOM_REARM_TICKS,
            _ => 0,
        }
    }

    /// Acquire the raw value for this kind from `bus`
    ///
    /// Kinds that do not read hardware return 0.
    pub fn sample<B: SensorBus + ?Sized>(&self, channel: u8, bus: &mut B) -> u16 {
        match self {
            #[cfg(feature = "thermistor")]
            SensorKind::Thermistor { .. } => bus.analog_read(channel),
            #[cfg(feature = "ad595")]
            SensorKind::Ad595 => bus.analog_read(channel),
            #[cfg(feature = "max6675")]
            SensorKind::Max6675 => bus.sync_read(channel),
            #[cfg(feature = "intercom")]
            SensorKind::Intercom => bus.receive_reading(channel),
            _ => 0,
        }
    }

    /// Turn a raw value into a reading
    pub fn convert(&self, raw: u16, ctx: &ConversionContext<'_>) -> Conversion {
        match self {
            #[cfg(feature = "thermistor")]
            SensorKind::Thermistor { table } => match ctx.tables.get(usize::from(*table)) {
                Some(table) => Conversion::reading(table.lookup(raw)),
                None => Conversion::UNCHANGED,
            },
            #[cfg(feature = "max6675")]
            SensorKind::Max6675 => thermocouple::decode_max6675(raw),
            #[cfg(feature = "ad595")]
            SensorKind::Ad595 => Conversion::reading(thermocouple::scale_ad595(raw)),
            // remote board already reports quarter degrees
            #[cfg(feature = "intercom")]
            SensorKind::Intercom => Conversion::reading(Temperature::from_quarters(raw)),
            #[cfg(feature = "dummy")]
            SensorKind::Dummy => Conversion::reading(ctx.last_reading.step_toward(ctx.target)),
            _ => {
                trace!("no conversion for {:?}, raw {}", self, raw);
                Conversion::UNCHANGED
            }
        }
    }
}

/// Status bits reported by digital thermocouple amplifiers
///
/// Other kinds never report flags; the runtime keeps `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFlags {
    /// Amplifier answered with its device id
    pub present: bool,
    /// Amplifier reports no thermocouple on its inputs
    pub open: bool,
}

impl SensorFlags {
    /// Whether the flags describe a broken sensor
    pub const fn is_fault(&self) -> bool {
        !self.present || self.open
    }

    /// Whether these flags are a fault not already reported by `previous`
    ///
    /// A fault on the first report counts as new.
    pub fn is_new_fault(&self, previous: Option<SensorFlags>) -> bool {
        self.is_fault() && previous != Some(*self)
    }
}

/// What the tick driver needs besides the raw value
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
    /// Configured lookup tables
    pub tables: &'a [LookupTable],
    /// Sensor's current reading
    pub last_reading: Temperature,
    /// Sensor's current target
    pub target: Temperature,
}

/// Result of one conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conversion {
    /// New reading, or `None` to keep the previous one
    pub reading: Option<Temperature>,
    /// New status flags, or `None` if the kind does not report any
    pub flags: Option<SensorFlags>,
}

impl Conversion {
    /// Nothing to update
    pub const UNCHANGED: Self = Self {
        reading: None,
        flags: None,
    };

    /// Plain reading without status flags
    pub const fn reading(temp: Temperature) -> Self {
        Self {
            reading: Some(temp),
            flags: None,
        }
    }
}

//! Configuration type definitions
//!
//! These types describe the sensor set: which sensors exist, how each is
//! wired, which lookup tables the thermistors use and how "at temperature"
//! is judged. They are built once at startup and never mutated afterwards.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::kind::SensorKind;
use crate::table::LookupTable;
use crate::temperature::Temperature;
use crate::traits::HeaterId;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum sensors per config
pub const MAX_SENSORS: usize = 8;

/// Maximum lookup tables per config
pub const MAX_TABLES: usize = 4;

/// Tick period of the reference scheduler (ms)
pub const DEFAULT_TICK_MS: u16 = 10;

/// How closely and for how long a sensor must track its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResidencyConfig {
    /// Readings closer than this to the target count as on target
    pub hysteresis: Temperature,
    /// Consecutive on-target ticks required before the target counts as
    /// achieved; also the saturation point of the residency counter
    pub dwell_ticks: u16,
}

impl ResidencyConfig {
    /// Build from human units
    ///
    /// # Arguments
    /// - `hysteresis_c`: tolerance band in whole degrees
    /// - `residency_s`: required dwell time in seconds
    /// - `tick_ms`: period the tick driver is called at
    pub fn from_time(hysteresis_c: u16, residency_s: u16, tick_ms: u16) -> Result<Self, ConfigError> {
        if tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        let ticks = u32::from(residency_s) * 1000 / u32::from(tick_ms);

        Ok(Self {
            hysteresis: Temperature::from_celsius(hysteresis_c),
            dwell_ticks: u16::try_from(ticks).unwrap_or(u16::MAX),
        })
    }
}

impl Default for ResidencyConfig {
    fn default() -> Self {
        Self {
            hysteresis: Temperature::from_celsius(2),
            dwell_ticks: 100, // 1 s at 10 ms
        }
    }
}

/// One configured temperature sensor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Sensor name (e.g., "extruder", "bed")
    pub name: String<MAX_LABEL_LEN>,
    /// Hardware kind, with any kind-specific data
    pub kind: SensorKind,
    /// Acquisition channel (ADC input, chip select, remote board id)
    pub channel: u8,
    /// Heater driven from this sensor, if any
    pub heater: Option<HeaterId>,
}

impl SensorConfig {
    /// Create a sensor definition
    pub fn new(
        name: &str,
        kind: SensorKind,
        channel: u8,
        heater: Option<HeaterId>,
    ) -> Result<Self, ConfigError> {
        let name = String::try_from(name).map_err(|_| ConfigError::NameTooLong)?;
        Ok(Self {
            name,
            kind,
            channel,
            heater,
        })
    }
}

/// Complete sensor set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSetConfig {
    /// Sensors, in index order
    pub sensors: Vec<SensorConfig, MAX_SENSORS>,
    /// Lookup tables, indexed by thermistor `table` numbers
    pub tables: Vec<LookupTable, MAX_TABLES>,
    /// At-temperature criteria shared by all sensors
    pub residency: ResidencyConfig,
}

impl SensorSetConfig {
    /// Create an empty sensor set
    pub fn new(residency: ResidencyConfig) -> Self {
        Self {
            sensors: Vec::new(),
            tables: Vec::new(),
            residency,
        }
    }

    /// Append a lookup table, returning its index
    pub fn add_table(&mut self, table: LookupTable) -> Result<u8, ConfigError> {
        let index = self.tables.len() as u8;
        self.tables
            .push(table)
            .map_err(|_| ConfigError::TooManyTables)?;
        Ok(index)
    }

    /// Append a sensor, returning its index
    pub fn add_sensor(&mut self, sensor: SensorConfig) -> Result<usize, ConfigError> {
        let index = self.sensors.len();
        self.sensors
            .push(sensor)
            .map_err(|_| ConfigError::TooManySensors)?;
        Ok(index)
    }

    /// Check tables are ordered, every kind is built in and every
    /// thermistor's table exists
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, table) in self.tables.iter().enumerate() {
            table.validate(i as u8)?;
        }

        for (i, sensor) in self.sensors.iter().enumerate() {
            if !sensor.kind.is_enabled() {
                return Err(ConfigError::KindDisabled { sensor: i as u8 });
            }
            if let Some(table) = sensor.kind.table() {
                if usize::from(table) >= self.tables.len() {
                    return Err(ConfigError::UnknownTable {
                        sensor: i as u8,
                        table,
                    });
                }
            }
        }

        Ok(())
    }

    /// Single extruder thermistor on ADC channel 0 driving heater 0
    #[cfg(feature = "thermistor")]
    pub fn reference() -> Result<Self, ConfigError> {
        let mut config = Self::new(ResidencyConfig::default());
        let table = config.add_table(LookupTable::from_entries(&crate::table::EXTRUDER_100K)?)?;
        config.add_sensor(SensorConfig::new(
            "extruder",
            SensorKind::Thermistor { table },
            0,
            Some(HeaterId(0)),
        )?)?;
        Ok(config)
    }

    /// Serialize into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Decode)
    }

    /// Decode a stored image and validate it
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableEntry;

    #[test]
    fn test_residency_from_time() {
        let r = ResidencyConfig::from_time(2, 1, 10).unwrap();
        assert_eq!(r.hysteresis.quarters(), 8);
        assert_eq!(r.dwell_ticks, 100);
        assert_eq!(r, ResidencyConfig::default());
    }

    #[test]
    fn test_residency_saturates_ticks() {
        let r = ResidencyConfig::from_time(1, 3600, 1).unwrap();
        assert_eq!(r.dwell_ticks, u16::MAX);
    }

    #[test]
    fn test_residency_zero_tick() {
        assert_eq!(
            ResidencyConfig::from_time(2, 1, 0),
            Err(ConfigError::ZeroTickPeriod)
        );
    }

    #[test]
    fn test_name_too_long() {
        let result = SensorConfig::new("a-very-long-sensor-name", SensorKind::Pt100, 0, None);
        assert_eq!(result, Err(ConfigError::NameTooLong));
    }

    #[test]
    fn test_sensor_capacity() {
        let mut config = SensorSetConfig::default();
        for _ in 0..MAX_SENSORS {
            let sensor = SensorConfig::new("s", SensorKind::Pt100, 0, None).unwrap();
            config.add_sensor(sensor).unwrap();
        }
        let sensor = SensorConfig::new("s", SensorKind::Pt100, 0, None).unwrap();
        assert_eq!(config.add_sensor(sensor), Err(ConfigError::TooManySensors));
    }

    #[cfg(feature = "thermistor")]
    #[test]
    fn test_reference_is_valid() {
        let config = SensorSetConfig::reference().unwrap();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sensors.len(), 1);
        assert_eq!(config.sensors[0].heater, Some(HeaterId(0)));
    }

    #[cfg(feature = "thermistor")]
    #[test]
    fn test_unknown_table() {
        let mut config = SensorSetConfig::reference().unwrap();
        let sensor =
            SensorConfig::new("bed", SensorKind::Thermistor { table: 1 }, 1, None).unwrap();
        config.add_sensor(sensor).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownTable { sensor: 1, table: 1 })
        );
    }

    #[test]
    fn test_kind_gate_follows_features() {
        let mut config = SensorSetConfig::default();
        config
            .add_sensor(SensorConfig::new("pt", SensorKind::Pt100, 0, None).unwrap())
            .unwrap();
        config
            .add_sensor(SensorConfig::new("sim", SensorKind::Dummy, 1, None).unwrap())
            .unwrap();

        let expected = if cfg!(feature = "dummy") {
            Ok(())
        } else {
            Err(ConfigError::KindDisabled { sensor: 1 })
        };
        assert_eq!(SensorKind::Dummy.is_enabled(), cfg!(feature = "dummy"));
        assert_eq!(config.validate(), expected);
    }

    #[cfg(not(feature = "max6675"))]
    #[test]
    fn test_disabled_kind_rejected() {
        let mut config = SensorSetConfig::default();
        config
            .add_sensor(SensorConfig::new("tc", SensorKind::Max6675, 0, None).unwrap())
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::KindDisabled { sensor: 0 })
        );
    }

    #[test]
    fn test_unsorted_table_fails_validation() {
        let mut config = SensorSetConfig::default();
        let table =
            LookupTable::from_entries(&[TableEntry::new(10, 100), TableEntry::new(3, 200)])
                .unwrap();
        config.add_table(table).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsortedTable { table: 0, entry: 1 })
        );
    }

    #[cfg(all(feature = "serde", feature = "thermistor"))]
    #[test]
    fn test_postcard_image() {
        let config = SensorSetConfig::reference().unwrap();
        let mut buf = [0u8; 512];
        let bytes = config.to_postcard(&mut buf).unwrap();
        let decoded = SensorSetConfig::from_postcard(bytes).unwrap();
        assert_eq!(decoded, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_garbage() {
        assert_eq!(
            SensorSetConfig::from_postcard(&[0xFF, 0xFF, 0xFF]),
            Err(ConfigError::Decode)
        );
    }
}

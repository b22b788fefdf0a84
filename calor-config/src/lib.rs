//! Host-side loader for sensor set descriptions
//!
//! Reads a TOML description of the machine's temperature sensors, checks
//! it the same way the firmware will, and produces either the validated
//! [`SensorSetConfig`] or the postcard image the firmware stores.
//!
//! ```toml
//! [residency]
//! hysteresis_c = 2
//! residency_s = 1
//! tick_ms = 10
//!
//! [[table]]
//! entries = [[5, 2000], [6, 1896], [1005, 24]]
//!
//! [[sensor]]
//! name = "extruder"
//! kind = "thermistor"
//! table = 0
//! channel = 0
//! heater = 0
//! ```
//!
//! Every section is optional; `[residency]` defaults to 2 °C for 1 s at a
//! 10 ms tick.

use std::fs;
use std::path::Path;

use calor_core::config::{
    ConfigError, ResidencyConfig, SensorConfig, SensorSetConfig, DEFAULT_TICK_MS,
};
use calor_core::kind::SensorKind;
use calor_core::table::{LookupTable, TableEntry};
use calor_core::traits::HeaterId;
use serde::Deserialize;
use thiserror::Error;

/// Description of the reference machine
pub const REFERENCE_TOML: &str = include_str!("../reference.toml");

/// Errors from loading a sensor set description
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read description: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid sensor set: {0}")]
    Config(#[from] ConfigError),

    #[error("thermistor sensor {sensor:?} has no table")]
    MissingTable { sensor: String },

    #[error("failed to encode image: {0}")]
    Encode(#[from] postcard::Error),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileToml {
    #[serde(default)]
    residency: ResidencyToml,
    #[serde(default, rename = "table")]
    tables: Vec<TableToml>,
    #[serde(default, rename = "sensor")]
    sensors: Vec<SensorToml>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ResidencyToml {
    hysteresis_c: u16,
    residency_s: u16,
    tick_ms: u16,
}

impl Default for ResidencyToml {
    fn default() -> Self {
        Self {
            hysteresis_c: 2,
            residency_s: 1,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableToml {
    /// `[raw, quarter_degrees]` pairs
    entries: Vec<(u16, u16)>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SensorToml {
    name: String,
    kind: KindToml,
    table: Option<u8>,
    #[serde(default)]
    channel: u8,
    heater: Option<u8>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindToml {
    Thermistor,
    Max6675,
    Ad595,
    Intercom,
    Dummy,
    Pt100,
}

impl SensorToml {
    fn kind(&self) -> Result<SensorKind, LoadError> {
        let kind = match self.kind {
            KindToml::Thermistor => {
                let table = self.table.ok_or_else(|| LoadError::MissingTable {
                    sensor: self.name.clone(),
                })?;
                return Ok(SensorKind::Thermistor { table });
            }
            KindToml::Max6675 => SensorKind::Max6675,
            KindToml::Ad595 => SensorKind::Ad595,
            KindToml::Intercom => SensorKind::Intercom,
            KindToml::Dummy => SensorKind::Dummy,
            KindToml::Pt100 => SensorKind::Pt100,
        };

        if self.table.is_some() {
            log::warn!("sensor {:?}: table ignored for {:?}", self.name, kind);
        }
        Ok(kind)
    }
}

/// Parse and validate a description
pub fn load_str(text: &str) -> Result<SensorSetConfig, LoadError> {
    let file: FileToml = toml::from_str(text)?;

    let residency = ResidencyConfig::from_time(
        file.residency.hysteresis_c,
        file.residency.residency_s,
        file.residency.tick_ms,
    )?;
    let mut config = SensorSetConfig::new(residency);

    for table in &file.tables {
        let entries: Vec<TableEntry> = table
            .entries
            .iter()
            .map(|&(raw, quarters)| TableEntry::new(raw, quarters))
            .collect();
        config.add_table(LookupTable::from_entries(&entries)?)?;
    }

    for sensor in &file.sensors {
        let kind = sensor.kind()?;
        config.add_sensor(SensorConfig::new(
            &sensor.name,
            kind,
            sensor.channel,
            sensor.heater.map(HeaterId),
        )?)?;
    }

    config.validate()?;

    log::info!(
        "loaded {} sensors, {} tables, band {} for {} ticks",
        config.sensors.len(),
        config.tables.len(),
        config.residency.hysteresis,
        config.residency.dwell_ticks
    );

    Ok(config)
}

/// Read, parse and validate a description file
pub fn load_file(path: impl AsRef<Path>) -> Result<SensorSetConfig, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    log::debug!("read {}", path.display());
    load_str(&text)
}

/// Encode a configuration as the firmware's stored image
pub fn to_image(config: &SensorSetConfig) -> Result<Vec<u8>, LoadError> {
    Ok(postcard::to_allocvec(config)?)
}

/// Load a description and write its image to `out`
pub fn compile(input: impl AsRef<Path>, out: impl AsRef<Path>) -> Result<usize, LoadError> {
    let image = to_image(&load_file(input)?)?;
    fs::write(out, &image)?;
    Ok(image.len())
}

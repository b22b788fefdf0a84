//! Sensor runtime state and tick driver
//!
//! [`TempSensors`] owns the validated configuration, one [`SensorState`]
//! per configured sensor and the two collaborators it talks to: the
//! [`SensorBus`] raw readings come from and the [`HeaterTick`] sink fresh
//! readings go to.
//!
//! The scheduler calls [`TempSensors::tick`] once per fixed period
//! (10 ms on the reference machine). Each call, for every sensor:
//!
//! 1. If the sensor's re-arm countdown is non-zero, decrement it and move on.
//! 2. Otherwise sample and convert, and restart the countdown from the
//!    kind's re-arm interval.
//! 3. Store the reading.
//! 4. Count the tick towards residency if the reading is within the
//!    hysteresis band of the target, else restart residency.
//! 5. Hand reading and target to the sensor's heater, if it has one.
//!
//! Nothing here returns errors: indices are range-checked and bad input is
//! ignored, since there is nobody to report an error to mid-tick.

pub mod shared;

pub use shared::SharedSensors;

use core::fmt::{self, Write};

use heapless::Vec;

use crate::config::{ConfigError, SensorConfig, SensorSetConfig, MAX_SENSORS};
use crate::kind::{ConversionContext, SensorFlags};
use crate::temperature::Temperature;
use crate::traits::{HeaterTick, SensorBus};

/// Runtime state of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorState {
    last_reading: Temperature,
    target: Temperature,
    residency: u16,
    rearm_countdown: u16,
    flags: Option<SensorFlags>,
}

impl SensorState {
    /// Most recent accepted reading
    pub fn last_reading(&self) -> Temperature {
        self.last_reading
    }

    /// Current setpoint (zero = no active target)
    pub fn target(&self) -> Temperature {
        self.target
    }

    /// Consecutive on-target ticks, saturating at the dwell threshold
    pub fn residency(&self) -> u16 {
        self.residency
    }

    /// Ticks left before the sensor is read again
    pub fn rearm_countdown(&self) -> u16 {
        self.rearm_countdown
    }

    /// Status flags from the last read, `None` for kinds that report none
    pub fn flags(&self) -> Option<SensorFlags> {
        self.flags
    }
}

/// The configured sensor set and its runtime state
pub struct TempSensors<B, H> {
    config: SensorSetConfig,
    state: Vec<SensorState, MAX_SENSORS>,
    bus: B,
    heaters: H,
}

impl<B: SensorBus, H: HeaterTick> TempSensors<B, H> {
    /// Validate `config` and zero-initialize state for every sensor
    pub fn new(config: SensorSetConfig, bus: B, heaters: H) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Vec::new();
        for _ in config.sensors.iter() {
            state
                .push(SensorState::default())
                .map_err(|_| ConfigError::TooManySensors)?;
        }

        info!(
            "{} temperature sensors, {} lookup tables",
            config.sensors.len(),
            config.tables.len()
        );

        Ok(Self {
            config,
            state,
            bus,
            heaters,
        })
    }

    /// Announce a zero target on every remote sensor's link
    ///
    /// Call once after construction so remote boards start from a known
    /// setpoint.
    pub fn init(&mut self) {
        for sensor in self.config.sensors.iter() {
            if sensor.kind.forwards_target() {
                self.bus.send_target(sensor.channel, Temperature::ZERO);
            }
        }
    }

    /// Advance every sensor by one tick
    pub fn tick(&mut self) {
        let residency = self.config.residency;
        let tables = &self.config.tables;

        for (index, (sensor, state)) in self
            .config
            .sensors
            .iter()
            .zip(self.state.iter_mut())
            .enumerate()
        {
            if state.rearm_countdown > 0 {
                state.rearm_countdown -= 1;
                continue;
            }

            let raw = sensor.kind.sample(sensor.channel, &mut self.bus);
            let conversion = sensor.kind.convert(
                raw,
                &ConversionContext {
                    tables,
                    last_reading: state.last_reading,
                    target: state.target,
                },
            );
            state.rearm_countdown = sensor.kind.rearm_interval();

            if let Some(flags) = conversion.flags {
                if flags.is_new_fault(state.flags) {
                    warn!(
                        "sensor {}: present={} open={}",
                        index,
                        flags.present,
                        flags.open
                    );
                }
                state.flags = Some(flags);
            }

            if let Some(reading) = conversion.reading {
                state.last_reading = reading;
            }

            if state.last_reading.abs_diff(state.target) < residency.hysteresis.quarters() {
                if state.residency < residency.dwell_ticks {
                    state.residency += 1;
                }
            } else {
                state.residency = 0;
            }

            if let Some(heater) = sensor.heater {
                self.heaters
                    .heater_tick(heater, index, state.last_reading, state.target);
            }
        }
    }

    /// Set the target for sensor `index`
    ///
    /// Out-of-range indices are ignored. Residency only restarts if the
    /// target actually changes.
    pub fn set_target(&mut self, index: usize, temperature: Temperature) {
        let (Some(sensor), Some(state)) =
            (self.config.sensors.get(index), self.state.get_mut(index))
        else {
            return;
        };

        if state.target == temperature {
            return;
        }

        debug!("sensor {}: target {} -> {}", index, state.target, temperature);
        state.target = temperature;
        state.residency = 0;

        if sensor.kind.forwards_target() {
            self.bus.send_target(sensor.channel, temperature);
        }
    }

    /// Whether every sensor has stayed on target for the dwell time
    pub fn all_achieved(&self) -> bool {
        let dwell = self.config.residency.dwell_ticks;
        self.state.iter().all(|s| s.residency >= dwell)
    }

    /// Access the sensor bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably access the sensor bus (e.g. to feed received link bytes)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Access the heater collaborator
    pub fn heaters(&self) -> &H {
        &self.heaters
    }

    /// Mutably access the heater collaborator
    pub fn heaters_mut(&mut self) -> &mut H {
        &mut self.heaters
    }
}

impl<B, H> TempSensors<B, H> {
    /// Most recent reading of sensor `index`, zero if out of range
    pub fn get_reading(&self, index: usize) -> Temperature {
        self.state
            .get(index)
            .map(|s| s.last_reading)
            .unwrap_or(Temperature::ZERO)
    }

    /// Target of sensor `index`, zero if out of range
    pub fn target(&self, index: usize) -> Temperature {
        self.state
            .get(index)
            .map(|s| s.target)
            .unwrap_or(Temperature::ZERO)
    }

    /// Residency counter of sensor `index`, zero if out of range
    pub fn residency(&self, index: usize) -> u16 {
        self.state.get(index).map(|s| s.residency).unwrap_or(0)
    }

    /// Status flags of sensor `index`
    ///
    /// `None` if out of range or if the sensor's kind reports no flags.
    pub fn flags(&self, index: usize) -> Option<SensorFlags> {
        self.state.get(index).and_then(|s| s.flags)
    }

    /// Whether sensor `index` last reported a fault
    ///
    /// Kinds without status flags never report one.
    pub fn is_fault(&self, index: usize) -> bool {
        self.flags(index).is_some_and(|f| f.is_fault())
    }

    /// Full runtime state of sensor `index`
    pub fn state(&self, index: usize) -> Option<&SensorState> {
        self.state.get(index)
    }

    /// Definition of sensor `index`
    pub fn definition(&self, index: usize) -> Option<&SensorConfig> {
        self.config.sensors.get(index)
    }

    /// The validated configuration
    pub fn config(&self) -> &SensorSetConfig {
        &self.config
    }

    /// Number of configured sensors
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether no sensors are configured
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Write a host status line: `T:<temp>`, plus ` B:<temp>` for `bed`
    ///
    /// Temperatures always carry two decimals, the exact hundredths of the
    /// quarter-degree value (`T:180.75 B:6.00`, never `T:6.0`), so host
    /// parsers must accept a two-digit fraction.
    ///
    /// Nothing is written if `index` is out of range; an out-of-range `bed`
    /// is skipped.
    pub fn write_report<W: Write>(
        &self,
        out: &mut W,
        index: usize,
        bed: Option<usize>,
    ) -> fmt::Result {
        let Some(state) = self.state.get(index) else {
            return Ok(());
        };

        write!(out, "T:{}", state.last_reading)?;

        if let Some(bed) = bed.and_then(|i| self.state.get(i)) {
            write!(out, " B:{}", bed.last_reading)?;
        }

        Ok(())
    }
}

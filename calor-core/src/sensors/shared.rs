//! Sensor set shared between the tick context and foreground code
//!
//! The tick runs from a timer interrupt or a high priority task while the
//! command processor calls `set_target`, `get_reading` and `all_achieved`
//! from the main loop. Every access goes through one blocking mutex, so a
//! tick never observes a half-applied target change and a reader never
//! observes a half-finished tick.
//!
//! ```ignore
//! static SENSORS: StaticCell<SharedSensors<CriticalSectionRawMutex, Bus, Heaters>> = ...;
//!
//! // timer
//! sensors.tick();
//!
//! // command processor
//! sensors.set_target(0, Temperature::from_celsius(210));
//! while !sensors.all_achieved() { /* wait */ }
//! ```

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::TempSensors;
use crate::temperature::Temperature;
use crate::traits::{HeaterTick, SensorBus};

/// [`TempSensors`] behind a blocking mutex
pub struct SharedSensors<M: RawMutex, B, H> {
    inner: Mutex<M, RefCell<TempSensors<B, H>>>,
}

impl<M: RawMutex, B: SensorBus, H: HeaterTick> SharedSensors<M, B, H> {
    /// Wrap an initialized sensor set
    pub const fn new(sensors: TempSensors<B, H>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(sensors)),
        }
    }

    /// Run `f` with exclusive access to the sensor set
    pub fn with<R>(&self, f: impl FnOnce(&mut TempSensors<B, H>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// See [`TempSensors::init`]
    pub fn init(&self) {
        self.with(|s| s.init())
    }

    /// See [`TempSensors::tick`]
    pub fn tick(&self) {
        self.with(|s| s.tick())
    }

    /// See [`TempSensors::set_target`]
    pub fn set_target(&self, index: usize, temperature: Temperature) {
        self.with(|s| s.set_target(index, temperature))
    }

    /// See [`TempSensors::get_reading`]
    pub fn get_reading(&self, index: usize) -> Temperature {
        self.with(|s| s.get_reading(index))
    }

    /// See [`TempSensors::all_achieved`]
    pub fn all_achieved(&self) -> bool {
        self.with(|s| s.all_achieved())
    }

    /// See [`TempSensors::write_report`]
    pub fn write_report<W: fmt::Write>(
        &self,
        out: &mut W,
        index: usize,
        bed: Option<usize>,
    ) -> fmt::Result {
        self.with(|s| s.write_report(out, index, bed))
    }

    /// Unwrap the sensor set
    pub fn into_inner(self) -> TempSensors<B, H> {
        self.inner.into_inner().into_inner()
    }
}

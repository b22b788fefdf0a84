//! Board-agnostic temperature acquisition core
//!
//! This crate polls a fixed set of configured temperature sensors,
//! converts raw readings into 14.2 fixed-point temperatures, tracks a
//! setpoint per sensor and decides when each has settled on it:
//!
//! - Fixed-point temperature type
//! - Thermistor lookup tables with piecewise-linear interpolation
//! - Sensor kinds and their conversion routines
//! - Tick driver with per-kind re-arm schedule and residency tracking
//! - Configuration types and load-time validation
//! - Collaborator traits (sensor bus, heater)
//!
//! All temperatures, including table entries, are in quarter degrees.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// must come first so the logging macros are visible to every module
mod fmt;

pub mod config;
pub mod kind;
pub mod sensors;
pub mod table;
pub mod temperature;
pub mod traits;

pub use sensors::{SharedSensors, TempSensors};
pub use temperature::Temperature;

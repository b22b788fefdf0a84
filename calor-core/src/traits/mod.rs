//! Collaborator traits
//!
//! These traits define the interface between the temperature core and the
//! board: where raw readings come from and where finished readings go.

pub mod bus;
pub mod heater;

pub use bus::SensorBus;
pub use heater::{HeaterId, HeaterTick};

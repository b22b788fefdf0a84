//! Heater collaborator

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::temperature::Temperature;

/// Heater identifier as understood by the heater collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeaterId(pub u8);

/// Receives every fresh reading for sensors that drive a heater
///
/// The implementation decides what to do with the heater output: bang-bang,
/// PID, safety cut-off. It is called from inside the sensor tick, so it must
/// not block.
pub trait HeaterTick {
    /// Feed the latest reading and target for `sensor` to `heater`
    fn heater_tick(
        &mut self,
        heater: HeaterId,
        sensor: usize,
        current: Temperature,
        target: Temperature,
    );
}

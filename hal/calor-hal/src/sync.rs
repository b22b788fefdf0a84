//! Synchronous serial input
//!
//! Used by converters that shift a fixed-width word out on a clock we
//! drive (thermocouple amplifiers and similar). The transfer busy-waits,
//! but its duration is bounded by the word width and clock rate.

use crate::adc::Channel;

/// Clocked serial input
pub trait SyncSerialInput {
    /// Clock in one 16-bit word from the device on `channel`, MSB first
    fn sync_read(&mut self, channel: Channel) -> u16;
}

//! Sensor acquisition bus

use crate::temperature::Temperature;

/// Raw acquisition primitives used by the conversion engine
///
/// Every call must return promptly: analog values come from a background
/// sampler, synchronous reads are bounded bit-bang transfers, and remote
/// readings are whatever the link last buffered.
pub trait SensorBus {
    /// Latest ADC count on `channel`
    fn analog_read(&mut self, channel: u8) -> u16;

    /// One 16-bit word clocked in from the device on `channel`
    fn sync_read(&mut self, channel: u8) -> u16;

    /// Last quarter-degree reading reported by the remote board on `channel`
    fn receive_reading(&mut self, channel: u8) -> u16;

    /// Forward a new setpoint to the remote board on `channel`
    fn send_target(&mut self, channel: u8, target: Temperature);
}

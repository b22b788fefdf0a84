//! Remote temperature board link
//!
//! Some machines place a sensor on a separate board that reports readings
//! periodically and accepts setpoints. Both directions carry temperatures
//! as raw quarter-degree words.

use crate::adc::Channel;

/// Request/response channel to a remote temperature board
pub trait TemperatureLink {
    /// Push a new setpoint (quarter degrees) to the remote board
    fn send_target(&mut self, channel: Channel, quarters: u16);

    /// Return the last reading (quarter degrees) reported on `channel`
    ///
    /// Must return already-buffered data; never waits for the remote end.
    fn receive_reading(&mut self, channel: Channel) -> u16;
}

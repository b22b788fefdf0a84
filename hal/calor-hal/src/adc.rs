//! Analog input abstraction
//!
//! Analog channels are expected to be sampled in the background (free
//! running ADC with an interrupt, DMA ring, ...). A read returns the most
//! recent completed conversion and must never wait for a new one.

/// Analog channel identifier as configured for a sensor
pub type Channel = u8;

/// Buffered analog input
pub trait AnalogInput {
    /// Return the latest raw conversion result for `channel`
    ///
    /// The value is in ADC counts (10-bit on the reference boards).
    /// Unknown channels read as 0.
    fn analog_read(&mut self, channel: Channel) -> u16;
}

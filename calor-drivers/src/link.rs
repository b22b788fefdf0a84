//! UART link to a remote temperature board
//!
//! Both directions use the same fixed five-byte frame:
//!
//! - START (1 byte): 0xAA synchronization byte
//! - CHANNEL (1 byte): sensor channel on the remote board
//! - LOW, HIGH (2 bytes): quarter-degree temperature, little endian
//! - CHECKSUM (1 byte): XOR of CHANNEL, LOW and HIGH
//!
//! Outbound frames carry setpoints, inbound frames carry readings. Inbound
//! bytes are pushed in from the UART receive path with [`UartLink::feed`];
//! the tick only ever sees the cached value.

use calor_hal::{Channel, TemperatureLink, UartTx};
use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Complete frame size
pub const FRAME_LEN: usize = 5;

/// Channels the reading cache holds
pub const MAX_LINK_CHANNELS: usize = 8;

/// Errors seen while decoding inbound frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Checksum mismatch
    InvalidChecksum,
}

fn checksum(channel: u8, lo: u8, hi: u8) -> u8 {
    channel ^ lo ^ hi
}

/// Build a frame for `quarters` on `channel`
pub fn encode_frame(channel: u8, quarters: u16) -> Vec<u8, FRAME_LEN> {
    let [lo, hi] = quarters.to_le_bytes();
    Vec::from_iter([FRAME_START, channel, lo, hi, checksum(channel, lo, hi)])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for START byte
    Start,
    /// Got START, waiting for CHANNEL
    Channel,
    /// Waiting for the low byte
    Low,
    /// Waiting for the high byte
    High,
    /// Waiting for CHECKSUM
    Checksum,
}

/// Byte-at-a-time frame decoder
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    channel: u8,
    lo: u8,
    hi: u8,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Start,
            channel: 0,
            lo: 0,
            hi: 0,
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some((channel, quarters)))` when a frame completes,
    /// `Ok(None)` when more bytes are needed. A bad checksum drops the
    /// frame and resynchronizes on the next START byte.
    pub fn feed(&mut self, byte: u8) -> Result<Option<(u8, u16)>, LinkError> {
        match self.state {
            DecodeState::Start => {
                if byte == FRAME_START {
                    self.state = DecodeState::Channel;
                }
                Ok(None)
            }
            DecodeState::Channel => {
                self.channel = byte;
                self.state = DecodeState::Low;
                Ok(None)
            }
            DecodeState::Low => {
                self.lo = byte;
                self.state = DecodeState::High;
                Ok(None)
            }
            DecodeState::High => {
                self.hi = byte;
                self.state = DecodeState::Checksum;
                Ok(None)
            }
            DecodeState::Checksum => {
                self.state = DecodeState::Start;
                if byte != checksum(self.channel, self.lo, self.hi) {
                    return Err(LinkError::InvalidChecksum);
                }
                Ok(Some((self.channel, u16::from_le_bytes([self.lo, self.hi]))))
            }
        }
    }
}

/// Remote board link over a UART
pub struct UartLink<T> {
    uart: T,
    decoder: FrameDecoder,
    readings: [u16; MAX_LINK_CHANNELS],
    tx_errors: u16,
    rx_errors: u16,
}

impl<T: UartTx> UartLink<T> {
    pub fn new(uart: T) -> Self {
        Self {
            uart,
            decoder: FrameDecoder::new(),
            readings: [0; MAX_LINK_CHANNELS],
            tx_errors: 0,
            rx_errors: 0,
        }
    }

    /// Feed one received byte, caching the reading if a frame completes
    pub fn feed(&mut self, byte: u8) -> Option<(u8, u16)> {
        let (channel, quarters) = match self.decoder.feed(byte) {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(_) => {
                self.rx_errors = self.rx_errors.saturating_add(1);
                return None;
            }
        };

        match self.readings.get_mut(usize::from(channel)) {
            Some(slot) => {
                *slot = quarters;
                Some((channel, quarters))
            }
            None => {
                self.rx_errors = self.rx_errors.saturating_add(1);
                None
            }
        }
    }

    /// Feed a run of received bytes
    pub fn feed_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed(byte);
        }
    }

    /// Setpoint frames the UART refused
    pub fn tx_errors(&self) -> u16 {
        self.tx_errors
    }

    /// Inbound frames dropped for a bad checksum or channel
    pub fn rx_errors(&self) -> u16 {
        self.rx_errors
    }

    pub fn uart(&self) -> &T {
        &self.uart
    }

    pub fn uart_mut(&mut self) -> &mut T {
        &mut self.uart
    }
}

impl<T: UartTx> TemperatureLink for UartLink<T> {
    fn send_target(&mut self, channel: Channel, quarters: u16) {
        let frame = encode_frame(channel, quarters);
        let sent = self
            .uart
            .write_blocking(&frame)
            .and_then(|()| self.uart.flush());
        if sent.is_err() {
            self.tx_errors = self.tx_errors.saturating_add(1);
        }
    }

    fn receive_reading(&mut self, channel: Channel) -> u16 {
        self.readings
            .get(usize::from(channel))
            .copied()
            .unwrap_or(0)
    }
}

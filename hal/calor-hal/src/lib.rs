//! Calor Hardware Abstraction Layer
//!
//! This crate defines the acquisition primitives the temperature core
//! depends on. Chip-specific HALs implement them; the core never touches
//! registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  calor-core (tick driver, conversions)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  calor-drivers (bus, bit-bang, link)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  calor-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`adc::AnalogInput`] - Buffered analog channel reads
//! - [`sync::SyncSerialInput`] - Clocked bit-level reads
//! - [`uart::UartTx`] - Serial transmit
//! - [`link::TemperatureLink`] - Remote temperature board channel

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod link;
pub mod sync;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{AnalogInput, Channel};
pub use gpio::{InputPin, OutputPin};
pub use link::TemperatureLink;
pub use sync::SyncSerialInput;
pub use uart::UartTx;

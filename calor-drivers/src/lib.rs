//! Acquisition driver implementations
//!
//! This crate provides concrete implementations of the acquisition traits
//! defined in calor-hal and calor-core:
//!
//! - Bit-banged reader for clocked thermocouple amplifiers (MAX6675)
//! - UART link to a remote temperature board
//! - [`bus::Bus`], which composes the above into a `SensorBus`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod link;
pub mod max6675;

pub use bus::{Bus, NoAnalog, NoLink, NoSync};
pub use link::UartLink;
pub use max6675::BitBangSync;

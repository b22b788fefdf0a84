//! Configuration types
//!
//! Board-agnostic sensor configuration. Configuration is validated once at
//! load time and stored as postcard binary data.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;

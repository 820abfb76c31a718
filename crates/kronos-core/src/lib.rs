//! Kronos Core — configuration and shared error types.

pub mod config;
pub mod error;

pub use config::{ComposioConfig, KronosConfig};
pub use error::{Error, Result};

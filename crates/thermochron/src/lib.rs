//! Client for Maxim DS192x temperature-logging iButtons on the Linux
//! 1-Wire subsystem.
//!
//! A [`Button`] drives one logger: program and start a mission, stop it,
//! clear the sample memory, and read the mission log back as timestamped
//! temperature samples. Memory reads are CRC-16 checked and temperatures
//! pass through the per-device correction curve from the datasheet.
//!
//! # Crate Structure
//!
//! - [`button`] — the device command surface
//! - [`status`] — decoding of the status register pages
//! - [`clock`] — the packed-BCD real-time-clock codec
//! - [`crc16`] — the Maxim CRC-16 used by memory reads
//! - [`device`] — model table and temperature type

pub mod button;
pub mod clock;
pub mod crc16;
pub mod device;
pub mod error;
pub mod status;

pub use button::{Button, Sample};
pub use device::{DeviceId, Temperature};
pub use error::{ButtonError, Result};
pub use status::Status;

//! Pin-access boundary for pinstream.
//!
//! Exposes the four primitives the poll loop needs from the platform:
//! - one-time subsystem setup
//! - set a pin to input
//! - enable the pin's internal pull-up
//! - read the pin's digital level
//!
//! This is the lowest layer of pinstream. Everything else builds on top of
//! the [`PinAccess`] trait provided here.

pub mod error;
pub mod sim;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod cdev;

pub use error::{AccessError, Result};
pub use sim::{PinOp, SimulatedPins};
pub use traits::{Channel, Level, PinAccess};

#[cfg(target_os = "linux")]
pub use cdev::{CdevPins, DEFAULT_CHIP};

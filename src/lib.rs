//! MSI Keyboard LED Library
//!
//! A Rust driver for MSI SteelSeries laptop keyboard backlights.
//!
//! # Features
//!
//! - Per-region RGB and palette color assignment over HID feature reports
//! - Device-wide lighting effects (normal, gaming, breathe, demo, wave)
//! - A daemon mapping the active keyboard layout and the CPU temperature
//!   onto the key zones
//!
//! # Example
//!
//! ```no_run
//! use msi_kbd_led::device::MsiKeyboard;
//! use msi_kbd_led::protocol::{Mode, Region, Rgb};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The device is opened lazily by the first send.
//!     let mut kbd = MsiKeyboard::new()?;
//!
//!     kbd.set_mode(Mode::Normal)?;
//!     kbd.set_rgb(Region::Left, Rgb::new(32, 16, 0))?;
//!     kbd.set_rgb(Region::Middle, Rgb::new(32, 16, 0))?;
//!
//!     Ok(())
//! }
//! ```

pub mod daemon;
pub mod device;
pub mod error;
pub mod lighting;
pub mod protocol;
pub mod utils;

// Re-exports for convenience
pub use device::MsiKeyboard;
pub use error::{KbdError, Result};
pub use lighting::ThermalGauge;
pub use protocol::{Command, IndexedColor, Intensity, Mode, Region, Rgb};

//! HID protocol implementation for MSI SteelSeries keyboards.
//!
//! This module contains the wire constants, the region/color/mode
//! enumerations, and the 8-byte command encoder.

pub mod commands;

pub use commands::*;

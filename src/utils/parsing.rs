//! Parsing utilities for CLI arguments.
//!
//! This module provides the string-to-enum parsers used by the command-line
//! interface.

use crate::error::{KbdError, Result};
use crate::protocol::{IndexedColor, Intensity, Mode, Region};

/// Parse a region name into a Region enum.
///
/// # Arguments
/// * `name` - Region name: left, middle, right, logo, frl-left, frl-right,
///   or touchpad
pub fn parse_region(name: &str) -> Result<Region> {
    match name.to_lowercase().as_str() {
        "left" => Ok(Region::Left),
        "middle" => Ok(Region::Middle),
        "right" => Ok(Region::Right),
        "logo" => Ok(Region::Logo),
        "frl-left" => Ok(Region::FrlLeft),
        "frl-right" => Ok(Region::FrlRight),
        "touchpad" => Ok(Region::Touchpad),
        _ => Err(KbdError::InvalidInput(format!(
            "Unknown region '{}'. Use: left, middle, right, logo, frl-left, frl-right, touchpad",
            name
        ))),
    }
}

/// Parse a palette color name into an IndexedColor enum.
pub fn parse_indexed_color(name: &str) -> Result<IndexedColor> {
    match name.to_lowercase().as_str() {
        "off" => Ok(IndexedColor::Off),
        "red" => Ok(IndexedColor::Red),
        "orange" => Ok(IndexedColor::Orange),
        "yellow" => Ok(IndexedColor::Yellow),
        "green" => Ok(IndexedColor::Green),
        "sky" => Ok(IndexedColor::Sky),
        "blue" => Ok(IndexedColor::Blue),
        "purple" => Ok(IndexedColor::Purple),
        "white" => Ok(IndexedColor::White),
        _ => Err(KbdError::InvalidInput(format!(
            "Unknown color '{}'. Use: off, red, orange, yellow, green, sky, blue, purple, white",
            name
        ))),
    }
}

/// Parse an intensity name into an Intensity enum.
pub fn parse_intensity(name: &str) -> Result<Intensity> {
    match name.to_lowercase().as_str() {
        "high" => Ok(Intensity::High),
        "medium" => Ok(Intensity::Medium),
        "low" => Ok(Intensity::Low),
        "light" => Ok(Intensity::Light),
        _ => Err(KbdError::InvalidInput(format!(
            "Unknown intensity '{}'. Use: high, medium, low, light",
            name
        ))),
    }
}

/// Parse a lighting mode name into a Mode enum.
pub fn parse_mode(name: &str) -> Result<Mode> {
    match name.to_lowercase().as_str() {
        "normal" => Ok(Mode::Normal),
        "gaming" => Ok(Mode::Gaming),
        "breathe" => Ok(Mode::Breathe),
        "demo" => Ok(Mode::Demo),
        "wave" => Ok(Mode::Wave),
        _ => Err(KbdError::InvalidInput(format!(
            "Unknown mode '{}'. Use: normal, gaming, breathe, demo, wave",
            name
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Color mapping for the two daemon inputs.
//!
//! Layout groups map through a fixed table; temperature samples map through
//! a red/green gradient guarded by a hysteresis gate.

pub mod layout;
pub mod thermal;

pub use layout::{GROUP_COLORS, group_color};
pub use thermal::ThermalGauge;

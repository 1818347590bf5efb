//! Temperature-to-color gradient with a hysteresis gate.
//!
//! Maps a millidegree sample onto a red/green gradient: hotter reads ramp
//! the red channel up and the green channel down, blue stays off. The gate
//! suppresses re-sends whose normalized fraction moved by no more than the
//! tolerance, so a steady CPU does not saturate the control channel.

use crate::error::{KbdError, Result};
use crate::protocol::Rgb;

// =============================================================================
// Constants
// =============================================================================

/// Default gradient floor in millidegrees Celsius.
pub const DEFAULT_TEMP_LOW: i32 = 62_000;

/// Default gradient ceiling in millidegrees Celsius.
pub const DEFAULT_TEMP_HIGH: i32 = 85_000;

/// Default channel scale. Caps the gradient at a quarter of full
/// brightness, which reads clearly on the key zones without glare.
pub const DEFAULT_SCALE: f32 = 64.0;

/// Fractional offset subtracted from the red ramp, visually delaying the
/// onset of red just above the floor.
pub const RED_RAMP_DELAY: f32 = 0.02;

/// Minimum change of the normalized fraction that justifies a re-send.
pub const HYSTERESIS_TOLERANCE: f32 = 0.01;

// =============================================================================
// ThermalGauge
// =============================================================================

/// Gradient mapping plus the last-sent state for the hysteresis gate.
#[derive(Debug, Clone)]
pub struct ThermalGauge {
    low: i32,
    high: i32,
    scale: f32,
    last_fraction: Option<f32>,
}

impl ThermalGauge {
    /// Create a gauge over `(low, high]` millidegrees.
    ///
    /// # Errors
    /// Returns `InvalidInput` unless `low < high`.
    pub fn new(low: i32, high: i32, scale: f32) -> Result<Self> {
        if low >= high {
            return Err(KbdError::InvalidInput(format!(
                "Temperature floor {low} must lie below ceiling {high}"
            )));
        }
        Ok(Self {
            low,
            high,
            scale,
            last_fraction: None,
        })
    }

    /// Normalized position of a sample within the gradient, in `(0, 1]`.
    ///
    /// Samples at or below the floor count as one millidegree above it, so
    /// the fraction never degenerates to an exact zero; samples above the
    /// ceiling clamp to it.
    pub fn fraction(&self, millideg: i32) -> f32 {
        let clamped = millideg.max(self.low + 1).min(self.high);
        (clamped - self.low) as f32 / (self.high - self.low) as f32
    }

    /// Gradient color at a normalized fraction.
    ///
    /// `as`-casts saturate, so the delayed red ramp sits at zero just above
    /// the floor instead of wrapping.
    pub fn color_at(&self, fraction: f32) -> Rgb {
        let r = (self.scale * (fraction - RED_RAMP_DELAY)) as u8;
        let g = (self.scale * (1.0 - fraction)) as u8;
        Rgb::new(r, g, 0)
    }

    /// Feed one sample through the gate.
    ///
    /// Returns the color to send, or `None` when the fraction moved by no
    /// more than [`HYSTERESIS_TOLERANCE`] since the last emitted color.
    /// The first sample always emits.
    pub fn update(&mut self, millideg: i32) -> Option<Rgb> {
        let fraction = self.fraction(millideg);

        if let Some(last) = self.last_fraction
            && (fraction - last).abs() <= HYSTERESIS_TOLERANCE
        {
            return None;
        }

        self.last_fraction = Some(fraction);
        Some(self.color_at(fraction))
    }
}

impl Default for ThermalGauge {
    fn default() -> Self {
        Self {
            low: DEFAULT_TEMP_LOW,
            high: DEFAULT_TEMP_HIGH,
            scale: DEFAULT_SCALE,
            last_fraction: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_samples_sit_one_unit_above_low() {
        let gauge = ThermalGauge::default();
        let floor = gauge.fraction(DEFAULT_TEMP_LOW + 1);

        assert_eq!(gauge.fraction(DEFAULT_TEMP_LOW), floor);
        assert_eq!(gauge.fraction(0), floor);
        assert_eq!(gauge.fraction(-5_000), floor);
        assert!(floor > 0.0);
    }

    #[test]
    fn test_ceiling_samples_clamp_to_high() {
        let gauge = ThermalGauge::default();
        assert_eq!(gauge.fraction(DEFAULT_TEMP_HIGH), 1.0);
        assert_eq!(gauge.fraction(DEFAULT_TEMP_HIGH + 40_000), 1.0);
    }

    #[test]
    fn test_gradient_is_monotonic() {
        let gauge = ThermalGauge::default();
        let mut prev = gauge.color_at(gauge.fraction(DEFAULT_TEMP_LOW));

        let mut sample = DEFAULT_TEMP_LOW;
        while sample <= DEFAULT_TEMP_HIGH {
            let color = gauge.color_at(gauge.fraction(sample));
            assert!(color.r >= prev.r, "red dipped at {sample}");
            assert!(color.g <= prev.g, "green rose at {sample}");
            assert_eq!(color.b, 0);
            prev = color;
            sample += 500;
        }
    }

    #[test]
    fn test_red_saturates_at_zero_near_floor() {
        let gauge = ThermalGauge::default();
        // Just above the floor, fraction - RED_RAMP_DELAY is negative.
        assert_eq!(gauge.color_at(gauge.fraction(DEFAULT_TEMP_LOW)).r, 0);
    }

    #[test]
    fn test_gate_suppresses_small_moves() {
        // Full range is 23000 mC, so the 0.01 tolerance spans 230 mC.
        let mut gauge = ThermalGauge::default();

        assert!(gauge.update(70_000).is_some());
        assert!(gauge.update(70_000).is_none());
        assert!(gauge.update(70_100).is_none());
        assert!(gauge.update(70_500).is_some());
    }

    #[test]
    fn test_gate_tracks_the_last_sent_color() {
        let mut gauge = ThermalGauge::default();
        gauge.update(70_000);

        // Two sub-tolerance steps in the same direction must not creep past
        // the gate: the reference stays at the last sent fraction.
        assert!(gauge.update(70_200).is_none());
        assert!(gauge.update(70_300).is_some());
    }

    #[test]
    fn test_first_sample_always_emits() {
        let mut cold = ThermalGauge::default();
        assert!(cold.update(0).is_some());
    }

    #[test]
    fn test_known_sample_maps_to_reference_color() {
        // 70000 mC over (62000, 85000] normalizes to ~0.3478.
        let mut gauge = ThermalGauge::default();
        let fraction = gauge.fraction(70_000);
        assert!((fraction - 0.3478).abs() < 0.001);
        assert_eq!(gauge.update(70_000), Some(Rgb::new(20, 41, 0)));
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        assert!(ThermalGauge::new(85_000, 62_000, DEFAULT_SCALE).is_err());
        assert!(ThermalGauge::new(62_000, 62_000, DEFAULT_SCALE).is_err());
    }
}

//! Temperature sources for the thermal gauge.
//!
//! The daemon polls a raw hwmon file containing a plain-text millidegree
//! integer. This module reads such files, auto-detects a CPU sensor by the
//! usual label patterns, and wraps `sysinfo` for the diagnostic listing.

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::Components;

use crate::error::{KbdError, Result};

/// Root of the kernel hwmon sysfs tree.
const HWMON_ROOT: &str = "/sys/class/hwmon";

/// Label/name fragments identifying CPU temperature sensors.
const CPU_LABEL_PATTERNS: [&str; 6] = ["cpu", "core", "package", "tdie", "k10temp", "zen"];

// =============================================================================
// Temperature Source
// =============================================================================

/// A sensor file producing millidegree samples.
pub struct TemperatureSource {
    path: PathBuf,
}

impl TemperatureSource {
    /// Use an explicit sensor file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Auto-detect a CPU temperature input under the hwmon tree.
    pub fn discover() -> Result<Self> {
        Ok(Self::new(discover_cpu_sensor(Path::new(HWMON_ROOT))?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one sample in millidegrees Celsius.
    ///
    /// The file is reopened on every call; hwmon values must not be cached.
    ///
    /// # Errors
    /// `SensorRead` when the file cannot be read, `SensorParse` when it does
    /// not start with an integer.
    pub fn read_millidegrees(&self) -> Result<i32> {
        let content = fs::read_to_string(&self.path).map_err(|source| KbdError::SensorRead {
            path: self.path.clone(),
            source,
        })?;

        content
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| KbdError::SensorParse {
                path: self.path.clone(),
            })
    }
}

// =============================================================================
// hwmon Discovery
// =============================================================================

/// Find a CPU temperature input by scanning chip names and channel labels.
///
/// Searches for names/labels containing: cpu, core, package, tdie,
/// k10temp, zen. A chip-level match selects its first temperature channel;
/// otherwise individual `temp*_label` files are consulted.
fn discover_cpu_sensor(root: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(root).map_err(|source| KbdError::SensorRead {
        path: root.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let dir = entry.path();

        let chip = fs::read_to_string(dir.join("name")).unwrap_or_default();
        if is_cpu_label(chip.trim()) {
            let input = dir.join("temp1_input");
            if input.is_file() {
                return Ok(input);
            }
        }

        for channel in 1..=9 {
            let Ok(label) = fs::read_to_string(dir.join(format!("temp{channel}_label"))) else {
                continue;
            };
            if is_cpu_label(label.trim()) {
                let input = dir.join(format!("temp{channel}_input"));
                if input.is_file() {
                    return Ok(input);
                }
            }
        }
    }

    Err(KbdError::NoSensorFound)
}

fn is_cpu_label(label: &str) -> bool {
    let label = label.to_lowercase();
    CPU_LABEL_PATTERNS
        .iter()
        .any(|pattern| label.contains(pattern))
}

// =============================================================================
// Sensor Listing
// =============================================================================

/// Information about a detected sensor.
#[derive(Debug, Clone)]
pub struct SensorInfo {
    /// Sensor label/name.
    pub label: String,
    /// Current temperature in Celsius.
    pub temperature: f32,
    /// Critical temperature threshold (if available).
    pub critical: Option<f32>,
}

/// Wrapper for system sensor access.
pub struct SystemSensors {
    components: Components,
}

impl SystemSensors {
    /// Create a new instance with a refreshed sensor list.
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }

    /// Get all detected sensors as a list of SensorInfo.
    pub fn list_all(&self) -> Vec<SensorInfo> {
        self.components
            .iter()
            .map(|c| SensorInfo {
                label: c.label().to_string(),
                temperature: c.temperature().unwrap_or(0.0),
                critical: c.critical(),
            })
            .collect()
    }
}

impl Default for SystemSensors {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static UNIQUE: AtomicU32 = AtomicU32::new(0);

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "msi-kbd-led-{tag}-{}-{}",
            std::process::id(),
            UNIQUE.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_read_millidegrees() {
        let path = scratch_dir("read").join("temp1_input");
        fs::write(&path, "70000\n").unwrap();

        let source = TemperatureSource::new(path);
        assert_eq!(source.read_millidegrees().unwrap(), 70_000);
    }

    #[test]
    fn test_read_rejects_non_integer_content() {
        let path = scratch_dir("parse").join("temp1_input");
        fs::write(&path, "not-a-number\n").unwrap();

        let source = TemperatureSource::new(path);
        assert!(matches!(
            source.read_millidegrees().unwrap_err(),
            KbdError::SensorParse { .. }
        ));
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let source = TemperatureSource::new(scratch_dir("missing").join("temp1_input"));
        assert!(matches!(
            source.read_millidegrees().unwrap_err(),
            KbdError::SensorRead { .. }
        ));
    }

    #[test]
    fn test_discover_by_chip_name() {
        let root = scratch_dir("chip");
        let hwmon = root.join("hwmon0");
        fs::create_dir_all(&hwmon).unwrap();
        fs::write(hwmon.join("name"), "k10temp\n").unwrap();
        fs::write(hwmon.join("temp1_input"), "55000\n").unwrap();

        let found = discover_cpu_sensor(&root).unwrap();
        assert_eq!(found, hwmon.join("temp1_input"));
    }

    #[test]
    fn test_discover_by_channel_label() {
        let root = scratch_dir("label");
        let hwmon = root.join("hwmon0");
        fs::create_dir_all(&hwmon).unwrap();
        fs::write(hwmon.join("name"), "nvme\n").unwrap();
        fs::write(hwmon.join("temp2_label"), "Package id 0\n").unwrap();
        fs::write(hwmon.join("temp2_input"), "61000\n").unwrap();

        let found = discover_cpu_sensor(&root).unwrap();
        assert_eq!(found, hwmon.join("temp2_input"));
    }

    #[test]
    fn test_discover_ignores_unrelated_chips() {
        let root = scratch_dir("none");
        let hwmon = root.join("hwmon0");
        fs::create_dir_all(&hwmon).unwrap();
        fs::write(hwmon.join("name"), "nvme\n").unwrap();
        fs::write(hwmon.join("temp1_input"), "38000\n").unwrap();

        assert!(matches!(
            discover_cpu_sensor(&root).unwrap_err(),
            KbdError::NoSensorFound
        ));
    }

    #[test]
    fn test_system_sensors_creation() {
        let sensors = SystemSensors::new();
        // Sensor availability depends on the system; just verify the
        // listing does not panic.
        let _ = sensors.list_all();
    }
}

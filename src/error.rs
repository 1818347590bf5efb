//! Custom error types for MSI SteelSeries keyboard devices.
//!
//! This module provides fine-grained error handling for device communication,
//! command encoding, and the layout/temperature input sources.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for keyboard backlight operations.
#[derive(Error, Debug)]
pub enum KbdError {
    /// Device not found during enumeration.
    #[error("MSI SteelSeries keyboard not found. Check USB connection and permissions.")]
    DeviceNotFound,

    /// HID communication error.
    #[error("HID communication error: {0}")]
    HidError(#[from] hidapi::HidError),

    /// Transfer kept reporting short writes after reconnecting.
    #[error("Device dropped the command after {attempts} reconnect attempts")]
    RetriesExhausted { attempts: usize },

    /// Layout group outside the configured color table.
    #[error("No color configured for layout group {0} (known groups: 0-2)")]
    UnknownLayoutGroup(u8),

    /// Temperature source could not be read.
    #[error("Cannot read temperature from {}: {source}", .path.display())]
    SensorRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temperature source did not contain an integer sample.
    #[error("Sensor file {} did not contain a millidegree integer", .path.display())]
    SensorParse { path: PathBuf },

    /// No usable CPU temperature sensor was discovered.
    #[error("No hwmon CPU temperature sensor found. Pass --sensor with an explicit path.")]
    NoSensorFound,

    /// X11 connection could not be established.
    #[error("Cannot connect to X display: {0}")]
    X11Connect(#[from] x11rb::errors::ConnectError),

    /// X11 request could not be sent.
    #[error("X11 connection error: {0}")]
    X11Connection(#[from] x11rb::errors::ConnectionError),

    /// X11 request was rejected by the server.
    #[error("X11 request failed: {0}")]
    X11Reply(#[from] x11rb::errors::ReplyError),

    /// X server does not speak a compatible XKB version.
    #[error("X server does not support the XKB extension")]
    XkbUnsupported,

    /// Generic invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for keyboard operations.
pub type Result<T> = std::result::Result<T, KbdError>;

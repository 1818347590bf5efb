//! MSI SteelSeries keyboard device implementation.
//!
//! High-level session for the backlight controller. The session opens the
//! device lazily on the first send and recovers from stale connections by
//! closing the handle and retrying the same command against a fresh one.

use hidapi::{HidApi, HidDevice};

use crate::error::{KbdError, Result};
use crate::protocol::{
    Command, IndexedColor, Intensity, MSI_VID, Mode, REPORT_LENGTH, Region, Rgb,
    STEELSERIES_KBD_PID,
};

// =============================================================================
// Constants
// =============================================================================

/// How many times a single command is retried against a freshly opened
/// handle before the send is reported as failed. Each attempt that reports
/// a short write closes the handle first, so a permanently absent device
/// cannot loop forever.
pub const MAX_SEND_ATTEMPTS: usize = 8;

// =============================================================================
// Transport
// =============================================================================

/// Low-level feature-report transport.
///
/// The session only ever needs two primitives: open a handle to the fixed
/// vendor/product id, and push one 8-byte report through an existing handle.
/// Keeping them behind a trait lets the retry logic be exercised against a
/// scripted transport.
pub trait Transport {
    type Handle;

    /// Open a handle to the device. Called lazily before the first transfer
    /// and again after every reconnect.
    fn open(&mut self) -> Result<Self::Handle>;

    /// Send one feature report, returning the number of bytes the device
    /// accepted. A count below [`REPORT_LENGTH`] means the connection is
    /// stale; the length check is the sole failure signal for transfers.
    fn send(&mut self, handle: &mut Self::Handle, report: &[u8; REPORT_LENGTH]) -> Result<usize>;
}

/// hidapi-backed transport for the physical keyboard controller.
pub struct HidTransport {
    api: HidApi,
}

impl HidTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: HidApi::new()?,
        })
    }
}

impl Transport for HidTransport {
    type Handle = HidDevice;

    fn open(&mut self) -> Result<HidDevice> {
        // The device list is cached; refresh it so a re-plugged keyboard
        // shows up after a reconnect.
        self.api.refresh_devices()?;

        for info in self.api.device_list() {
            if info.vendor_id() == MSI_VID && info.product_id() == STEELSERIES_KBD_PID {
                return Ok(info.open_device(&self.api)?);
            }
        }

        Err(KbdError::DeviceNotFound)
    }

    fn send(&mut self, handle: &mut HidDevice, report: &[u8; REPORT_LENGTH]) -> Result<usize> {
        match handle.send_feature_report(report) {
            Ok(()) => Ok(report.len()),
            Err(hidapi::HidError::IncompleteSendError { sent, .. }) => Ok(sent),
            // hidapi surfaces an unplugged device as a generic send error;
            // treat it as a zero-length write so the session reconnects.
            Err(_) => Ok(0),
        }
    }
}

// =============================================================================
// MsiKeyboard
// =============================================================================

/// MSI SteelSeries keyboard session.
///
/// At most one handle to the controller exists per session, opened on the
/// first send. A transfer that reports fewer than 8 bytes written closes
/// the handle; the next attempt reopens transparently.
///
/// # Example
///
/// ```no_run
/// use msi_kbd_led::device::MsiKeyboard;
/// use msi_kbd_led::protocol::{IndexedColor, Intensity, Mode, Region, Rgb};
///
/// let mut kbd = MsiKeyboard::new()?;
/// kbd.set_mode(Mode::Normal)?;
/// kbd.set_rgb(Region::Left, Rgb::new(32, 16, 0))?;
/// kbd.set_color(Region::Logo, IndexedColor::Sky, Intensity::High)?;
/// # Ok::<(), msi_kbd_led::error::KbdError>(())
/// ```
pub struct MsiKeyboard<T: Transport = HidTransport> {
    transport: T,
    handle: Option<T::Handle>,
}

impl MsiKeyboard<HidTransport> {
    /// Create a session for the physical keyboard.
    ///
    /// Does not touch the device; the handle is opened by the first send.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HidTransport::new()?))
    }
}

impl<T: Transport> MsiKeyboard<T> {
    /// Create a session over an arbitrary transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            handle: None,
        }
    }

    /// Whether a device handle is currently open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Send one command to the device, blocking until it is accepted.
    ///
    /// Opens the device if no handle exists. A short write closes the
    /// handle and retries the same command, up to [`MAX_SEND_ATTEMPTS`]
    /// times in total.
    ///
    /// # Errors
    /// Open failures propagate immediately (`DeviceNotFound` when the
    /// keyboard is absent); `RetriesExhausted` when every attempt reported
    /// a short write. A command is never silently dropped.
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let report = command.encode();

        for _ in 0..MAX_SEND_ATTEMPTS {
            if self.handle.is_none() {
                self.handle = Some(self.transport.open()?);
            }

            let written = match self.handle.as_mut() {
                Some(handle) => self.transport.send(handle, &report)?,
                None => continue,
            };

            if written == REPORT_LENGTH {
                return Ok(());
            }

            // Stale connection: drop the handle so the next attempt reopens.
            self.handle = None;
        }

        Err(KbdError::RetriesExhausted {
            attempts: MAX_SEND_ATTEMPTS,
        })
    }

    /// Assign a raw RGB triple to one region.
    pub fn set_rgb(&mut self, region: Region, color: Rgb) -> Result<()> {
        self.send(&Command::SetRgb { region, color })
    }

    /// Assign a palette color and intensity to one region.
    pub fn set_color(
        &mut self,
        region: Region,
        color: IndexedColor,
        intensity: Intensity,
    ) -> Result<()> {
        self.send(&Command::SetColor {
            region,
            color,
            intensity,
        })
    }

    /// Select a device-wide lighting effect.
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.send(&Command::SetMode { mode })
    }
}

impl<T: Transport> std::fmt::Debug for MsiKeyboard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsiKeyboard")
            .field("open", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

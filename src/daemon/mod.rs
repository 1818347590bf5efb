//! Daemon wiring: the coordinator, the temperature poll loop, and startup.
//!
//! Two producers feed the keyboard concurrently: the XKB watcher on the
//! calling thread and the temperature sampler on a background thread. The
//! session is shared behind a lock held across each complete transfer, so
//! the device only ever sees whole commands.

pub mod layout_watch;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::device::{MsiKeyboard, Transport};
use crate::error::{KbdError, Result};
use crate::lighting::{ThermalGauge, group_color};
use crate::protocol::{Mode, Region, Rgb};
use crate::utils::sensors::TemperatureSource;

pub use layout_watch::LayoutWatcher;

// =============================================================================
// Constants
// =============================================================================

/// Regions painted with the layout color. The right zone is reserved for
/// the thermal gauge.
pub const LAYOUT_REGIONS: [Region; 2] = [Region::Left, Region::Middle];

/// Region painted with the thermal gradient.
pub const GAUGE_REGION: Region = Region::Right;

// =============================================================================
// Coordinator
// =============================================================================

/// Shared owner of the keyboard session.
///
/// Both producers go through the coordinator; the lock is held across the
/// open-check, transfer and reconnect of every send.
pub struct Coordinator<T: Transport> {
    keyboard: Mutex<MsiKeyboard<T>>,
}

impl<T: Transport> Coordinator<T> {
    pub fn new(keyboard: MsiKeyboard<T>) -> Self {
        Self {
            keyboard: Mutex::new(keyboard),
        }
    }

    fn keyboard(&self) -> MutexGuard<'_, MsiKeyboard<T>> {
        // The session's only state is the optional handle, which stays
        // consistent even if another thread panicked mid-send.
        self.keyboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Select a device-wide lighting effect.
    pub fn apply_mode(&self, mode: Mode) -> Result<()> {
        self.keyboard().set_mode(mode)
    }

    /// Paint the color of a locked layout group onto the layout regions.
    pub fn apply_layout_group(&self, group: u8) -> Result<()> {
        let color = group_color(group)?;
        let mut keyboard = self.keyboard();
        for region in LAYOUT_REGIONS {
            keyboard.set_rgb(region, color)?;
        }
        Ok(())
    }

    /// Paint a gradient color onto the gauge region.
    pub fn apply_gauge_color(&self, color: Rgb) -> Result<()> {
        self.keyboard().set_rgb(GAUGE_REGION, color)
    }
}

// =============================================================================
// Temperature Loop
// =============================================================================

/// Poll the temperature source until the running flag clears.
///
/// Each cycle reads one sample, feeds it through the gauge's hysteresis
/// gate, sends the color if the gate admits it, and sleeps for `period`.
///
/// # Errors
/// A failed sensor read is fatal and aborts the loop: the daemon has no
/// degraded mode without its temperature input.
pub fn run_thermal_loop<T: Transport>(
    coordinator: &Coordinator<T>,
    source: &TemperatureSource,
    mut gauge: ThermalGauge,
    period: Duration,
    running: &AtomicBool,
) -> Result<()> {
    while running.load(Ordering::SeqCst) {
        let sample = source.read_millidegrees()?;
        if let Some(color) = gauge.update(sample) {
            coordinator.apply_gauge_color(color)?;
        }
        thread::sleep(period);
    }
    Ok(())
}

// =============================================================================
// Daemon
// =============================================================================

/// Options for the daemon loops.
pub struct DaemonOptions {
    pub source: TemperatureSource,
    pub gauge: ThermalGauge,
    /// Temperature poll period.
    pub period: Duration,
}

/// Run the daemon: XKB watcher on the calling thread, temperature sampler
/// on a background thread.
///
/// Applies `Mode::Normal` and the current group's color once at startup so
/// the keyboard is coherent before the first event arrives. Only returns
/// when the X connection breaks or a send fails for good; a dead
/// temperature source terminates the process with a diagnostic.
pub fn run<T>(keyboard: MsiKeyboard<T>, options: DaemonOptions, running: &AtomicBool) -> Result<()>
where
    T: Transport + Send,
    T::Handle: Send,
{
    let watcher = LayoutWatcher::connect()?;
    let coordinator = Coordinator::new(keyboard);

    coordinator.apply_mode(Mode::Normal)?;
    apply_group(&coordinator, watcher.current_group()?)?;

    let DaemonOptions {
        source,
        gauge,
        period,
    } = options;

    thread::scope(|scope| {
        let coord = &coordinator;
        scope.spawn(move || {
            if let Err(err) = run_thermal_loop(coord, &source, gauge, period, running) {
                // Lighting is the program's whole purpose; there is nothing
                // to degrade to once the temperature source is gone.
                eprintln!("❌ Temperature loop failed: {err}");
                std::process::exit(1);
            }
        });

        let result = watcher.watch(|group| apply_group(coord, group));
        running.store(false, Ordering::SeqCst);
        result
    })
}

/// Apply a layout group, tolerating groups outside the color table: the
/// previous colors stay up and the daemon keeps running.
fn apply_group<T: Transport>(coordinator: &Coordinator<T>, group: u8) -> Result<()> {
    match coordinator.apply_layout_group(group) {
        Err(KbdError::UnknownLayoutGroup(group)) => {
            eprintln!("⚠️  No color for layout group {group}; keeping previous colors");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockTransport;
    use crate::protocol::{OP_SET_RGB, REPORT_TERMINATOR};
    use std::fs;
    use std::sync::Arc;

    fn coordinator_with_log() -> (
        Arc<Coordinator<MockTransport>>,
        Arc<Mutex<Vec<[u8; crate::protocol::REPORT_LENGTH]>>>,
    ) {
        let transport = MockTransport::new();
        let sent = transport.sent();
        let coordinator = Arc::new(Coordinator::new(MsiKeyboard::with_transport(transport)));
        (coordinator, sent)
    }

    #[test]
    fn test_layout_group_paints_left_and_middle() {
        let (coordinator, sent) = coordinator_with_log();
        coordinator.apply_layout_group(1).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], [1, 2, 64, 1, 127, 0, 127, 236]);
        assert_eq!(sent[1], [1, 2, 64, 2, 127, 0, 127, 236]);
    }

    #[test]
    fn test_unknown_layout_group_sends_nothing() {
        let (coordinator, sent) = coordinator_with_log();
        let err = coordinator.apply_layout_group(5).unwrap_err();

        assert!(matches!(err, KbdError::UnknownLayoutGroup(5)));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_gauge_color_paints_right_only() {
        let (coordinator, sent) = coordinator_with_log();
        coordinator
            .apply_gauge_color(Rgb::new(20, 41, 0))
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], [1, 2, 64, 3, 20, 41, 0, 236]);
    }

    #[test]
    fn test_concurrent_producers_emit_only_complete_commands() {
        let (coordinator, sent) = coordinator_with_log();

        let layout = {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                for i in 0..50u8 {
                    coordinator.apply_layout_group(i % 3).unwrap();
                }
            })
        };
        let gauge = {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                let mut gauge = ThermalGauge::default();
                for i in 0..50 {
                    // 460 mC steps move the fraction by 0.02 per sample,
                    // past the gate every time.
                    if let Some(color) = gauge.update(62_000 + i * 460) {
                        coordinator.apply_gauge_color(color).unwrap();
                    }
                }
            })
        };
        layout.join().unwrap();
        gauge.join().unwrap();

        let sent = sent.lock().unwrap();
        // 50 layout calls x 2 regions, plus 50 admitted gauge updates.
        assert_eq!(sent.len(), 150);
        for report in sent.iter() {
            assert_eq!(report[0], 1);
            assert_eq!(report[1], 2);
            assert_eq!(report[2], OP_SET_RGB);
            assert!((1..=3).contains(&report[3]));
            assert_eq!(report[7], REPORT_TERMINATOR);
        }
        assert_eq!(
            sent.iter().filter(|r| r[3] == GAUGE_REGION.id()).count(),
            50
        );
    }

    #[test]
    fn test_thermal_loop_exits_when_flag_clears() {
        let (coordinator, sent) = coordinator_with_log();

        let dir = std::env::temp_dir().join(format!("msi-kbd-led-loop-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("temp1_input");
        fs::write(&path, "70000\n").unwrap();
        let source = TemperatureSource::new(path);

        let running = AtomicBool::new(true);
        thread::scope(|scope| {
            let handle = scope.spawn(|| {
                run_thermal_loop(
                    &coordinator,
                    &source,
                    ThermalGauge::default(),
                    Duration::from_millis(1),
                    &running,
                )
            });
            thread::sleep(Duration::from_millis(30));
            running.store(false, Ordering::SeqCst);
            handle.join().unwrap().unwrap();
        });

        // A steady sample passes the gate exactly once.
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_thermal_loop_is_fatal_on_unreadable_source() {
        let (coordinator, _sent) = coordinator_with_log();
        let source = TemperatureSource::new(std::env::temp_dir().join("msi-kbd-led-nonexistent"));

        let running = AtomicBool::new(true);
        let err = run_thermal_loop(
            &coordinator,
            &source,
            ThermalGauge::default(),
            Duration::from_millis(1),
            &running,
        )
        .unwrap_err();

        assert!(matches!(err, KbdError::SensorRead { .. }));
    }

    #[test]
    fn test_thermal_loop_skips_reads_once_stopped() {
        let (coordinator, sent) = coordinator_with_log();
        let source = TemperatureSource::new(std::env::temp_dir().join("msi-kbd-led-nonexistent"));

        let running = AtomicBool::new(false);
        run_thermal_loop(
            &coordinator,
            &source,
            ThermalGauge::default(),
            Duration::from_millis(1),
            &running,
        )
        .unwrap();

        assert!(sent.lock().unwrap().is_empty());
    }
}

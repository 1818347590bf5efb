//! MSI SteelSeries Keyboard Backlight CLI
//!
//! Command-line interface for the per-region backlight controller and the
//! layout/temperature daemon.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use msi_kbd_led::daemon::{self, DaemonOptions};
use msi_kbd_led::device::MsiKeyboard;
use msi_kbd_led::lighting::ThermalGauge;
use msi_kbd_led::protocol::{IndexedColor, Intensity, Mode, Region, Rgb};
use msi_kbd_led::utils::parsing::{parse_indexed_color, parse_intensity, parse_mode, parse_region};
use msi_kbd_led::utils::sensors::{SystemSensors, TemperatureSource};

// =============================================================================
// CLI Arguments
// =============================================================================

/// MSI SteelSeries Keyboard Backlight Tool
#[derive(Parser, Debug)]
#[command(name = "msi-kbd-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the layout + temperature daemon
    Run {
        /// Sensor file with millidegree readings (auto-detected when omitted)
        #[arg(short, long)]
        sensor: Option<PathBuf>,

        /// Temperature gradient floor in degrees Celsius
        #[arg(long, default_value = "62")]
        temp_low: i32,

        /// Temperature gradient ceiling in degrees Celsius
        #[arg(long, default_value = "85")]
        temp_high: i32,

        /// Gradient channel scale (brightness cap)
        #[arg(long, default_value = "64")]
        scale: f32,

        /// Temperature poll period in milliseconds
        #[arg(short, long, default_value = "1")]
        interval: u64,
    },

    /// Assign a raw RGB color to one region
    SetRgb {
        /// Region: left, middle, right, logo, frl-left, frl-right, touchpad
        #[arg(value_parser = parse_region)]
        region: Region,

        /// Red channel (0-255)
        red: u8,

        /// Green channel (0-255)
        green: u8,

        /// Blue channel (0-255)
        blue: u8,
    },

    /// Assign a palette color to one region
    SetColor {
        /// Region: left, middle, right, logo, frl-left, frl-right, touchpad
        #[arg(value_parser = parse_region)]
        region: Region,

        /// Color: off, red, orange, yellow, green, sky, blue, purple, white
        #[arg(value_parser = parse_indexed_color)]
        color: IndexedColor,

        /// Intensity: high, medium, low, light
        #[arg(value_parser = parse_intensity, default_value = "high")]
        intensity: Intensity,
    },

    /// Select a device-wide lighting effect
    SetMode {
        /// Mode: normal, gaming, breathe, demo, wave
        #[arg(value_parser = parse_mode)]
        mode: Mode,
    },

    /// Diagnostic: list all available system sensors
    Sensors,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            sensor,
            temp_low,
            temp_high,
            scale,
            interval,
        } => cmd_run(sensor, temp_low, temp_high, scale, interval),
        Command::SetRgb {
            region,
            red,
            green,
            blue,
        } => cmd_set_rgb(region, red, green, blue),
        Command::SetColor {
            region,
            color,
            intensity,
        } => cmd_set_color(region, color, intensity),
        Command::SetMode { mode } => cmd_set_mode(mode),
        Command::Sensors => cmd_sensors(),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_run(
    sensor: Option<PathBuf>,
    temp_low: i32,
    temp_high: i32,
    scale: f32,
    interval: u64,
) -> Result<()> {
    let source = match sensor {
        Some(path) => TemperatureSource::new(path),
        None => TemperatureSource::discover().context("Failed to auto-detect a CPU sensor")?,
    };

    let gauge = ThermalGauge::new(temp_low * 1000, temp_high * 1000, scale)
        .context("Invalid temperature range")?;

    let keyboard = MsiKeyboard::new().context("Failed to initialize HID")?;

    // The watcher blocks in the X event stream, so the handler exits the
    // process directly after signaling the poll loop.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        std::process::exit(0);
    })
    .context("Failed to set Ctrl+C handler")?;

    println!("⌨️  Backlight daemon started (Ctrl+C to stop)");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Sensor:   {}", source.path().display());
    println!("   Range:    {}-{}°C", temp_low, temp_high);
    println!("   Interval: {}ms", interval);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    daemon::run(
        keyboard,
        DaemonOptions {
            source,
            gauge,
            period: Duration::from_millis(interval),
        },
        &running,
    )
    .context("Daemon stopped")?;

    Ok(())
}

fn cmd_set_rgb(region: Region, red: u8, green: u8, blue: u8) -> Result<()> {
    let mut keyboard = MsiKeyboard::new().context("Failed to initialize HID")?;

    let color = Rgb::new(red, green, blue);
    keyboard
        .set_rgb(region, color)
        .with_context(|| format!("Failed to set {} to {}", region, color))?;
    println!("✅ Region {} set to {}", region, color);
    Ok(())
}

fn cmd_set_color(region: Region, color: IndexedColor, intensity: Intensity) -> Result<()> {
    let mut keyboard = MsiKeyboard::new().context("Failed to initialize HID")?;

    keyboard
        .set_color(region, color, intensity)
        .with_context(|| format!("Failed to set {} to {:?}", region, color))?;
    println!("✅ Region {} set to {:?} ({:?})", region, color, intensity);
    Ok(())
}

fn cmd_set_mode(mode: Mode) -> Result<()> {
    let mut keyboard = MsiKeyboard::new().context("Failed to initialize HID")?;

    keyboard
        .set_mode(mode)
        .with_context(|| format!("Failed to set mode {}", mode))?;
    println!("✅ Lighting mode set to {}", mode);
    Ok(())
}

fn cmd_sensors() -> Result<()> {
    let sensors = SystemSensors::new();
    let list = sensors.list_all();

    if list.is_empty() {
        println!("No sensors detected.");
        return Ok(());
    }

    println!("🌡️  Detected sensors:");
    for info in list {
        match info.critical {
            Some(critical) => println!(
                "   {:<40} {:>6.1}°C (critical {:.0}°C)",
                info.label, info.temperature, critical
            ),
            None => println!("   {:<40} {:>6.1}°C", info.label, info.temperature),
        }
    }
    Ok(())
}

// Keyswap CLI
// evdev/uinput host for the remap engine, plus offline configuration checks

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use keyswap_core::event::EventLoop;
use keyswap_core::validate::ValidationReport;
use keyswap_core::{
    commit, validate_buffer, DeviceFilter, FixedForegroundApp, Host, RemapConfig, RemapEngine,
    VirtualKeyboard,
};

/// Key and shortcut remapper
#[derive(Parser, Debug)]
#[command(name = "keyswap", version, about = "Key and shortcut remapper", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a remap configuration and exit
    Check {
        /// Remap configuration (defaults to the user config directory)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    /// Grab keyboards and remap until interrupted
    Run {
        /// Remap configuration (defaults to the user config directory)
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Only grab these devices, by name or path (repeatable)
        #[arg(short, long = "device", value_name = "DEVICE")]
        devices: Vec<String>,

        /// Application name reported as focused, for app-specific remaps
        #[arg(long, value_name = "NAME")]
        app: Option<String>,
    },
    /// List input devices that report key events
    Devices,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(RemapConfig::default_path)
        .context("no --config given and no user config directory available")
}

fn load_config(path: &Path) -> Result<RemapConfig> {
    RemapConfig::from_toml_path(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        eprintln!("error: {}", error);
    }
    for key in &report.orphaned {
        eprintln!("warning: {} is remapped away and nothing maps back to it", key);
    }
}

fn check(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let buffer = config.to_buffer()?;
    let report = validate_buffer(&buffer);
    print_report(&report);
    if !report.is_ok() {
        bail!("{}: {}", path.display(), report);
    }
    println!("{}: {} remap(s) OK", path.display(), config.len());
    Ok(())
}

fn run(path: &Path, devices: Vec<String>, app: Option<String>) -> Result<()> {
    let config = load_config(path)?;
    let tables = match commit(&config.to_buffer()?) {
        Ok(tables) => tables,
        Err(report) => {
            print_report(&report);
            bail!("{}: {}", path.display(), report);
        }
    };
    log::info!("loaded {} remap(s) from {}", tables.len(), path.display());

    let filter = if devices.is_empty() {
        DeviceFilter::autodetect()
    } else {
        DeviceFilter::named(devices)
    };

    let keyboard = VirtualKeyboard::new().context("failed to create the virtual keyboard")?;
    let host = Host::new(keyboard).with_foreground(FixedForegroundApp(app));
    let mut engine = RemapEngine::new(host);
    engine.publish(tables);

    let mut event_loop = EventLoop::grab(&filter).context("failed to grab keyboards")?;
    log::info!("remapping {}", event_loop.device_names().join(", "));

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .context("failed to install signal handler")?;
    }

    event_loop.run(&mut engine, &shutdown)?;
    event_loop.ungrab_all();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { config } => check(&config_path(config)?),
        Command::Run {
            config,
            devices,
            app,
        } => run(&config_path(config)?, devices, app),
        Command::Devices => {
            for device in EventLoop::list_devices() {
                let kind = if device.is_keyboard { "keyboard" } else { "other" };
                println!("{}\t{}\t{}", device.path, kind, device.name);
            }
            Ok(())
        }
    }
}

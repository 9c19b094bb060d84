//! Smart lock host binary.
//!
//! # Usage
//!
//! ```bash
//! # Both nodes in one process, keys from a script
//! smartlock simulate --keys "12345= 12345= +12345="
//!
//! # Control node on a serial port, credential kept in an EEPROM image
//! smartlock control --port /dev/ttyUSB0 --eeprom lock.eeprom
//!
//! # Interface node on a serial port, keys typed on stdin
//! smartlock interface --port /dev/ttyUSB1
//! ```

mod config;
mod console;
mod serial;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use smartlock_control::ControlNode;
use smartlock_emulator::{LockConfig, SimulatedLock};
use smartlock_hardware::{FileEeprom, LCD_COLUMNS, TokioClock};
use smartlock_interface::InterfaceNode;
use smartlock_protocol::Link;

use crate::console::{LoggedBuzzer, LoggedMotor, StdinKeypad, StdoutDisplay, frame_rows};

/// Two-node keypad smart lock
#[derive(Parser, Debug)]
#[command(name = "smartlock")]
#[command(version)]
struct Args {
    /// TOML file with [link], [control] and [interface] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run both nodes in-process against a key script
    Simulate {
        /// Keys to press: 0-9, '=' confirm, '+' open door, '-' change password
        #[arg(short, long)]
        keys: String,
    },

    /// Run the control node on a serial port
    Control {
        /// Serial device
        #[arg(short, long)]
        port: String,

        /// EEPROM image file, created erased if missing
        #[arg(short, long, default_value = "smartlock.eeprom")]
        eeprom: PathBuf,
    },

    /// Run the interface node on a serial port, keys from stdin
    Interface {
        /// Serial device
        #[arg(short, long)]
        port: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load(args.config.as_deref())?;

    match args.command {
        Command::Simulate { keys } => simulate(config, &keys).await,
        Command::Control { port, eeprom } => control(config, &port, eeprom).await,
        Command::Interface { port } => interface(config, &port).await,
    }
}

async fn simulate(config: LockConfig, keys: &str) -> Result<()> {
    let lock = SimulatedLock::builder().with_config(config).build()?;
    let monitors = lock.monitors().clone();

    let report = lock.run_script(keys).await?;

    for frame in monitors.display.frames() {
        println!("{}", frame_rows(frame.rows.as_slice(), LCD_COLUMNS));
    }
    for event in monitors.motor.events() {
        println!("motor {} (duty {}%)", event.direction, event.duty);
    }
    println!("buzzer activations: {}", monitors.buzzer.activations());
    println!(
        "phase: {}, attempts left: {}, lockouts: {}",
        report.interface.phase(),
        report.interface.retries().remaining(),
        report.interface.lockouts()
    );
    Ok(())
}

async fn control(config: LockConfig, port: &str, eeprom: PathBuf) -> Result<()> {
    let stream = serial::open(port, &config.link)?;
    let store = FileEeprom::open(&eeprom)
        .await
        .with_context(|| format!("failed to open EEPROM image {}", eeprom.display()))?;

    let mut node = ControlNode::new(
        Link::with_config(stream, &config.link),
        store,
        LoggedMotor,
        LoggedBuzzer,
        TokioClock,
        config.control,
    );
    let mut session = node.session();

    tokio::select! {
        result = node.run(&mut session) => result?,
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }
    Ok(())
}

async fn interface(config: LockConfig, port: &str) -> Result<()> {
    let stream = serial::open(port, &config.link)?;
    let keypad = StdinKeypad::spawn().context("failed to start stdin keypad")?;

    let mut node = InterfaceNode::new(
        Link::with_config(stream, &config.link),
        keypad,
        StdoutDisplay::new(),
        TokioClock,
        config.interface,
    );
    let mut session = node.session();

    tokio::select! {
        result = node.run(&mut session) => result?,
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }
    Ok(())
}

//! Common definitions shared between the calculator demos

#![allow(dead_code)]

use clap::ValueEnum;
use com_runtime::{FactoryMode, HResult};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Log verbosity for the demos
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    /// Only warnings
    Quiet,
    /// Registration and server locks
    Info,
    /// Construction, destruction and every calculator operation
    Debug,
    /// Every acquire, negotiate and release
    Trace,
}

impl Verbosity {
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Factory mode as a command-line value
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// A fresh factory per lookup
    PerLookup,
    /// One cached factory per class
    Shared,
}

impl From<Mode> for FactoryMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::PerLookup => FactoryMode::PerLookup,
            Mode::Shared => FactoryMode::Shared,
        }
    }
}

/// Install the demo subscriber
pub fn init_tracing(verbosity: Verbosity) -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(verbosity.level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Print a section banner
pub fn banner(title: &str) {
    println!("========================================================");
    println!("  {}", title);
    println!("========================================================");
}

/// Print one arithmetic call and its outcome
pub fn report(expression: &str, hr: HResult, result: i32) {
    if hr.is_success() {
        println!("  {} = {}", expression, result);
    } else {
        println!("  {} failed: {:?}", expression, hr);
    }
}

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use refract::EngineConfig;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Runs propagation passes over a JSON scene and writes out the resolved rays.
#[derive(Parser)]
#[command(name = "run_sim_json")]
pub struct Args {
    /// Path to the scene JSON file
    pub path: String,

    /// Overrides the scene's activation cap
    #[arg(long)]
    pub activation_cap: Option<usize>,

    /// Overrides the scene's minimum ray energy
    #[arg(long)]
    pub min_energy: Option<f64>,

    /// Overrides the scene's unbounded ray length
    #[arg(long)]
    pub unbounded_length: Option<f64>,

    /// Number of passes to run
    #[arg(long, default_value_t = 1)]
    pub frames: usize,

    /// Angle steps (quarter degrees) every seed turns by between passes
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub rotate: i32,

    /// Write line segments instead of rays
    #[arg(long)]
    pub segments: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,
}

impl Args {
    /// Applies the command line overrides on top of `config`.
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(cap) = self.activation_cap {
            config.activation_cap = cap;
        }
        if let Some(min) = self.min_energy {
            config.min_energy = min;
        }
        if let Some(len) = self.unbounded_length {
            config.unbounded_length = len;
        }
    }
}

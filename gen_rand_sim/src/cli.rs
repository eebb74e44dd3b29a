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

/// Generates a random scene and writes it as JSON.
#[derive(Parser)]
#[command(name = "gen_rand_sim")]
pub struct Args {
    /// Where to write the scene
    pub path: String,

    /// Number of surfaces (random if omitted)
    #[arg(long)]
    pub surfaces: Option<usize>,

    /// Number of seed rays (random if omitted)
    #[arg(long)]
    pub rays: Option<usize>,

    /// Seed for the random number generator, for reproducible scenes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Activation cap written into the scene's config
    #[arg(long, default_value_t = EngineConfig::DEFAULT_ACTIVATION_CAP)]
    pub activation_cap: usize,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,
}

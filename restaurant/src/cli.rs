//! Command line arguments
//!
//! Every flag is optional; an unset flag keeps the value [`Config::from_env`]
//! resolved, so the precedence is flag > environment / `.env` > default.

use clap::Parser;
use std::path::PathBuf;

use crate::core::Config;
use crate::trace::TraceFormat;

/// Semaphore restaurant simulation.
///
/// Runs a receptionist, a waiter, a chef and N client groups over a shared
/// restaurant state and writes one state log line per transition.
#[derive(Parser, Debug, Default)]
#[command(name = "restaurant")]
#[command(version)]
#[command(about = "Semaphore restaurant simulation", long_about = None)]
pub struct Cli {
    /// Number of client groups
    #[arg(short = 'g', long, env = "RESTAURANT_GROUPS")]
    pub groups: Option<usize>,

    /// Access key (decimal, 0x hex or leading-0 octal)
    #[arg(short = 'k', long, env = "RESTAURANT_KEY")]
    pub key: Option<String>,

    /// State log file name
    #[arg(short = 'l', long, env = "RESTAURANT_LOG")]
    pub log: Option<PathBuf>,

    /// Directory receiving error_CH / error_WT / error_RT
    #[arg(long, env = "RESTAURANT_DIAGNOSTICS_DIR")]
    pub diagnostics_dir: Option<PathBuf>,

    /// State log format: text or json
    #[arg(long, env = "RESTAURANT_TRACE_FORMAT")]
    pub trace_format: Option<TraceFormat>,

    /// Seed for reproducible delays
    #[arg(long, env = "RESTAURANT_SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "RESTAURANT_MAX_ARRIVAL_MS")]
    pub max_arrival_ms: Option<u64>,

    #[arg(long, env = "RESTAURANT_MAX_COOK_MS")]
    pub max_cook_ms: Option<u64>,

    #[arg(long, env = "RESTAURANT_MAX_EAT_MS")]
    pub max_eat_ms: Option<u64>,

    /// tracing level (RUST_LOG wins when set)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Applies the flags that were given on top of `config`
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(groups) = self.groups {
            config.n_groups = groups;
        }
        if let Some(key) = self.key {
            config.key = key;
        }
        if let Some(log) = self.log {
            config.log = log;
        }
        if let Some(dir) = self.diagnostics_dir {
            config.diagnostics_dir = dir;
        }
        if let Some(format) = self.trace_format {
            config.trace_format = format;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(ms) = self.max_arrival_ms {
            config.delays.max_arrival_ms = ms;
        }
        if let Some(ms) = self.max_cook_ms {
            config.delays.max_cook_ms = ms;
        }
        if let Some(ms) = self.max_eat_ms {
            config.delays.max_eat_ms = ms;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

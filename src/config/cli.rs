use crate::core::spin::Spinner;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_one_of, validate_path, validate_positive_number, validate_range, Validate,
    LOG_FORMATS, MAX_DEDUP_DAYS, MAX_SPIN_INTERVAL_MS, MAX_SPIN_TICKS,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "idle-picker")]
#[command(about = "Draw something to do from your idle pool")]
pub struct CliConfig {
    /// Pool file (.md/.txt one entry per line, or .csv with a title column)
    #[arg(long = "pool", default_value = "./idle_pool.md")]
    pub pool_path: PathBuf,

    /// Pick log, created on first draw
    #[arg(long = "log", default_value = "./logs/idle_pick_log.csv")]
    pub log_path: PathBuf,

    /// Space separated words; any candidate containing one is skipped
    #[arg(long, default_value = "")]
    pub exclude: String,

    #[arg(long, default_value = "30")]
    pub dedup_days: u32,

    #[arg(long, default_value = "1")]
    pub samples: usize,

    #[arg(long, help = "Skip the spin animation")]
    pub no_spin: bool,

    #[arg(long, default_value = "18")]
    pub spin_ticks: u32,

    #[arg(long, default_value = "60")]
    pub spin_interval_ms: u64,

    #[arg(long, help = "Slow the spin down towards the end")]
    pub slowdown: bool,

    #[arg(long, help = "Print the draw report as JSON")]
    pub json: bool,

    #[arg(long, default_value = "text")]
    pub log_format: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn spinner(&self) -> Option<Spinner> {
        (!self.no_spin).then(|| Spinner {
            ticks: self.spin_ticks,
            interval: Duration::from_millis(self.spin_interval_ms),
            slowdown: self.slowdown,
        })
    }
}

impl ConfigProvider for CliConfig {
    fn pool_path(&self) -> &Path {
        &self.pool_path
    }

    fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn exclude(&self) -> &str {
        &self.exclude
    }

    fn dedup_days(&self) -> u32 {
        self.dedup_days
    }

    fn sample_count(&self) -> usize {
        self.samples
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("pool", &self.pool_path.to_string_lossy())?;
        validate_path("log", &self.log_path.to_string_lossy())?;
        validate_positive_number("samples", self.samples, 1)?;
        validate_range("dedup_days", self.dedup_days, 0, MAX_DEDUP_DAYS)?;
        validate_range("spin_ticks", self.spin_ticks, 0, MAX_SPIN_TICKS)?;
        validate_range(
            "spin_interval_ms",
            self.spin_interval_ms,
            0,
            MAX_SPIN_INTERVAL_MS,
        )?;
        validate_one_of("log_format", &self.log_format, LOG_FORMATS)?;
        Ok(())
    }
}

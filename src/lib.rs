pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use app::pipelines::LocalPipeline;
pub use core::{engine::DrawEngine, history::HistoryLog, spin::Spinner};
pub use domain::model::{Candidate, DrawOutcome, DrawReport, FilterTier, LogEntry, SelectionRequest};
pub use utils::error::{PickerError, Result};

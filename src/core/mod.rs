pub mod encoding;
pub mod engine;
pub mod filter;
pub mod history;
pub mod pool;
pub mod recorder;
pub mod selector;
pub mod spin;

pub use crate::domain::model::{Candidate, DrawOutcome, FilterOutcome, SelectionRequest};
pub use crate::domain::ports::{ConfigProvider, PickerPipeline};
pub use crate::utils::error::Result;

use crate::domain::model::{Candidate, FilterOutcome, SelectionRequest};
use crate::utils::error::Result;
use std::path::Path;

pub trait ConfigProvider {
    fn pool_path(&self) -> &Path;
    fn log_path(&self) -> &Path;
    fn exclude(&self) -> &str;
    fn dedup_days(&self) -> u32;
    fn sample_count(&self) -> usize;

    fn selection_request(&self) -> SelectionRequest {
        SelectionRequest::new(self.exclude(), self.dedup_days(), self.sample_count())
    }
}

/// The four steps every front-end drives, in order, once per draw.
pub trait PickerPipeline {
    fn load_pool(&self) -> Result<Vec<Candidate>>;
    fn filter(&self, pool: &[Candidate], request: &SelectionRequest) -> Result<FilterOutcome>;
    fn select(&mut self, candidates: &[Candidate], sample_count: usize) -> Vec<Candidate>;
    fn record(&self, picks: &[Candidate]) -> Result<()>;
}

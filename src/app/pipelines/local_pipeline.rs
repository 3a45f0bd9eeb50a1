use crate::core::filter::filter;
use crate::core::history::HistoryLog;
use crate::core::{pool, recorder, selector};
use crate::domain::model::{Candidate, FilterOutcome, SelectionRequest};
use crate::domain::ports::{ConfigProvider, PickerPipeline};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Pool and history both live on the local filesystem, at the paths the
/// configuration names.
pub struct LocalPipeline<C: ConfigProvider> {
    pub(crate) config: C,
    pub(crate) history: HistoryLog,
    pub(crate) rng: StdRng,
}

impl<C: ConfigProvider> LocalPipeline<C> {
    pub fn new(config: C) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: C, rng: StdRng) -> Self {
        let history = HistoryLog::new(config.log_path());
        Self {
            config,
            history,
            rng,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }
}

impl<C: ConfigProvider> PickerPipeline for LocalPipeline<C> {
    fn load_pool(&self) -> Result<Vec<Candidate>> {
        tracing::debug!("Loading pool from: {}", self.config.pool_path().display());
        pool::load_pool(self.config.pool_path())
    }

    fn filter(&self, pool: &[Candidate], request: &SelectionRequest) -> Result<FilterOutcome> {
        let recent = self.history.read_recent_titles(request.dedup_days)?;
        tracing::debug!(
            "{} titles inside the {}-day window",
            recent.len(),
            request.dedup_days
        );
        Ok(filter(pool, &request.exclusion_words, &recent))
    }

    fn select(&mut self, candidates: &[Candidate], sample_count: usize) -> Vec<Candidate> {
        selector::select(&mut self.rng, candidates, sample_count)
    }

    fn record(&self, picks: &[Candidate]) -> Result<()> {
        recorder::record(&self.history, picks)
    }
}

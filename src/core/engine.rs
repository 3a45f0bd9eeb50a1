use crate::core::spin::{SpinEnd, Spinner};
use crate::domain::model::{
    Candidate, DrawOutcome, DrawReport, FilterOutcome, FilterTier, SelectionRequest,
};
use crate::domain::ports::PickerPipeline;
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;

/// Eligible candidates for one draw, before the final pick.
#[derive(Debug, Clone)]
pub struct PreparedDraw {
    pub pool_size: usize,
    pub outcome: FilterOutcome,
}

impl PreparedDraw {
    pub fn is_exhausted(&self) -> bool {
        self.outcome.tier == FilterTier::Exhausted
    }
}

/// Drives a [`PickerPipeline`] through one draw: load, filter, select, record.
///
/// The pool is cached after the first load and only re-read on
/// [`DrawEngine::reload_pool`].
pub struct DrawEngine<P: PickerPipeline> {
    pipeline: P,
    pool: Option<Vec<Candidate>>,
    spin_rng: StdRng,
}

impl<P: PickerPipeline> DrawEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            pool: None,
            spin_rng: StdRng::from_entropy(),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn reload_pool(&mut self) -> Result<usize> {
        let pool = self.pipeline.load_pool()?;
        let size = pool.len();
        self.pool = Some(pool);
        Ok(size)
    }

    pub fn prepare(&mut self, request: &SelectionRequest) -> Result<PreparedDraw> {
        if self.pool.is_none() {
            self.reload_pool()?;
        }
        let pool = self.pool.as_deref().unwrap_or_default();
        let outcome = self.pipeline.filter(pool, request)?;
        tracing::info!(
            "🎯 {} of {} candidates eligible ({:?})",
            outcome.candidates.len(),
            pool.len(),
            outcome.tier
        );
        Ok(PreparedDraw {
            pool_size: pool.len(),
            outcome,
        })
    }

    /// Pick and record. Runs to completion once called.
    pub fn finalize(
        &mut self,
        prepared: PreparedDraw,
        request: &SelectionRequest,
    ) -> Result<DrawOutcome> {
        if prepared.is_exhausted() {
            tracing::warn!("⚠️ No eligible candidates, nothing recorded");
            return Ok(DrawOutcome::Exhausted {
                pool_size: prepared.pool_size,
            });
        }

        let eligible = prepared.outcome.candidates;
        let picks = self.pipeline.select(&eligible, request.sample_count);
        self.pipeline.record(&picks)?;

        Ok(DrawOutcome::Picked(DrawReport {
            picks,
            pool_size: prepared.pool_size,
            eligible: eligible.len(),
            tier: prepared.outcome.tier,
        }))
    }

    pub fn run(&mut self, request: &SelectionRequest) -> Result<DrawOutcome> {
        let prepared = self.prepare(request)?;
        self.finalize(prepared, request)
    }

    /// Like [`DrawEngine::run`], with the spin animation played over the
    /// eligible candidates first. `stop` cuts the animation short; the final
    /// pick still happens.
    pub async fn run_with_spin<S, F>(
        &mut self,
        request: &SelectionRequest,
        spinner: &Spinner,
        stop: S,
        on_frame: F,
    ) -> Result<(DrawOutcome, SpinEnd)>
    where
        S: Future<Output = ()>,
        F: FnMut(&Candidate),
    {
        let prepared = self.prepare(request)?;
        let end = spinner
            .run(&mut self.spin_rng, &prepared.outcome.candidates, stop, on_frame)
            .await;
        let outcome = self.finalize(prepared, request)?;
        Ok((outcome, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::filter;
    use crate::utils::error::PickerError;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::time::Duration;

    struct MockPipeline {
        items: Vec<&'static str>,
        recent: HashSet<String>,
        missing: bool,
        loads: RefCell<usize>,
        recorded: RefCell<Vec<Vec<String>>>,
    }

    impl MockPipeline {
        fn new(items: Vec<&'static str>) -> Self {
            Self {
                items,
                recent: HashSet::new(),
                missing: false,
                loads: RefCell::new(0),
                recorded: RefCell::new(Vec::new()),
            }
        }
    }

    impl PickerPipeline for MockPipeline {
        fn load_pool(&self) -> Result<Vec<Candidate>> {
            if self.missing {
                return Err(PickerError::NotFound {
                    path: PathBuf::from("pool.md"),
                });
            }
            *self.loads.borrow_mut() += 1;
            Ok(self.items.iter().filter_map(|s| Candidate::parse(s)).collect())
        }

        fn filter(&self, pool: &[Candidate], request: &SelectionRequest) -> Result<FilterOutcome> {
            Ok(filter(pool, &request.exclusion_words, &self.recent))
        }

        fn select(&mut self, candidates: &[Candidate], sample_count: usize) -> Vec<Candidate> {
            candidates.iter().take(sample_count).cloned().collect()
        }

        fn record(&self, picks: &[Candidate]) -> Result<()> {
            self.recorded
                .borrow_mut()
                .push(picks.iter().map(|c| c.title.clone()).collect());
            Ok(())
        }
    }

    fn request(exclude: &str, samples: usize) -> SelectionRequest {
        SelectionRequest::new(exclude, 30, samples)
    }

    #[test]
    fn test_run_records_once() {
        let mut engine = DrawEngine::new(MockPipeline::new(vec!["Walk", "Nap", "Read"]));
        let outcome = engine.run(&request("", 2)).unwrap();

        let DrawOutcome::Picked(report) = outcome else {
            panic!("expected picks");
        };
        assert_eq!(report.picks.len(), 2);
        assert_eq!(report.pool_size, 3);
        assert_eq!(report.eligible, 3);
        assert_eq!(report.tier, FilterTier::Strict);
        assert_eq!(engine.pipeline().recorded.borrow().len(), 1);
    }

    #[test]
    fn test_exhausted_draw_records_nothing() {
        let mut engine = DrawEngine::new(MockPipeline::new(vec!["Walk", "Nap"]));
        let outcome = engine.run(&request("Walk Nap", 1)).unwrap();

        assert!(matches!(outcome, DrawOutcome::Exhausted { pool_size: 2 }));
        assert!(engine.pipeline().recorded.borrow().is_empty());
    }

    #[test]
    fn test_pool_is_cached_until_reload() {
        let mut engine = DrawEngine::new(MockPipeline::new(vec!["Walk"]));
        engine.run(&request("", 1)).unwrap();
        engine.run(&request("", 1)).unwrap();
        assert_eq!(*engine.pipeline().loads.borrow(), 1);

        assert_eq!(engine.reload_pool().unwrap(), 1);
        assert_eq!(*engine.pipeline().loads.borrow(), 2);
    }

    #[test]
    fn test_missing_pool_fails_the_draw() {
        let mut pipeline = MockPipeline::new(vec![]);
        pipeline.missing = true;
        let mut engine = DrawEngine::new(pipeline);

        assert!(matches!(
            engine.run(&request("", 1)),
            Err(PickerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_spin_frames_are_not_recorded() {
        let mut engine = DrawEngine::new(MockPipeline::new(vec!["Walk", "Nap", "Read"]));
        let spinner = Spinner {
            ticks: 4,
            interval: Duration::from_millis(1),
            slowdown: false,
        };
        let mut frames = 0;

        let (outcome, end) = engine
            .run_with_spin(&request("", 1), &spinner, std::future::pending(), |_| frames += 1)
            .await
            .unwrap();

        assert_eq!(end, SpinEnd::Completed { frames: 4 });
        assert_eq!(frames, 4);
        assert!(matches!(outcome, DrawOutcome::Picked(_)));
        assert_eq!(engine.pipeline().recorded.borrow().len(), 1);
        assert_eq!(engine.pipeline().recorded.borrow()[0].len(), 1);
    }
}

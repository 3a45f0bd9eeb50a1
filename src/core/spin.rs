//! Cosmetic "slot machine" phase shown before the real draw.
//!
//! Frames are random picks from the eligible candidates, emitted on a timer.
//! The loop stops on its own after `ticks` frames or as soon as the stop future
//! resolves; either way nothing it shows is recorded.

use crate::core::selector::spin_frame;
use crate::domain::model::Candidate;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinEnd {
    Completed { frames: u32 },
    Stopped { frames: u32 },
}

impl SpinEnd {
    pub fn frames(&self) -> u32 {
        match self {
            SpinEnd::Completed { frames } | SpinEnd::Stopped { frames } => *frames,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spinner {
    pub ticks: u32,
    pub interval: Duration,
    /// Grow the interval linearly from `interval` to `3 * interval`.
    pub slowdown: bool,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            ticks: 18,
            interval: Duration::from_millis(60),
            slowdown: false,
        }
    }
}

impl Spinner {
    /// 網頁版的減速效果：15 格，由 50ms 逐步放慢
    pub fn slowing() -> Self {
        Self {
            ticks: 15,
            interval: Duration::from_millis(50),
            slowdown: true,
        }
    }

    pub fn delay_for(&self, tick: u32) -> Duration {
        if !self.slowdown || self.ticks == 0 {
            return self.interval;
        }
        let extra = self.interval.saturating_mul(2).saturating_mul(tick) / self.ticks;
        self.interval.saturating_add(extra)
    }

    /// Show up to `ticks` frames, each followed by a pause; return early when
    /// `stop` resolves. An empty pool shows nothing.
    pub async fn run<R, S, F>(
        &self,
        rng: &mut R,
        candidates: &[Candidate],
        stop: S,
        mut on_frame: F,
    ) -> SpinEnd
    where
        R: Rng + ?Sized,
        S: Future<Output = ()>,
        F: FnMut(&Candidate),
    {
        tokio::pin!(stop);
        let mut frames = 0;

        for tick in 0..self.ticks {
            let Some(frame) = spin_frame(rng, candidates) else {
                break;
            };
            on_frame(frame);
            frames += 1;

            tokio::select! {
                _ = &mut stop => {
                    tracing::debug!("Spin stopped after {} frames", frames);
                    return SpinEnd::Stopped { frames };
                }
                _ = tokio::time::sleep(self.delay_for(tick)) => {}
            }
        }

        SpinEnd::Completed { frames }
    }
}

/// Resolve once `signal` fires. If the signal handler cannot be installed the
/// returned future never resolves, so the animation runs to completion.
pub async fn stop_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("⚠️ Unable to listen for Ctrl-C, spin cannot be interrupted: {}", e);
        std::future::pending::<()>().await;
    }
}

/// 終端機用的停止訊號 (Ctrl-C)
pub async fn interrupted() {
    stop_on(tokio::signal::ctrl_c()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> Vec<Candidate> {
        ["Walk", "Nap", "Read"]
            .iter()
            .filter_map(|s| Candidate::parse(s))
            .collect()
    }

    #[tokio::test]
    async fn test_spin_completes_all_ticks() {
        let spinner = Spinner {
            ticks: 5,
            interval: Duration::from_millis(1),
            slowdown: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = pool();
        let mut shown = Vec::new();

        let end = spinner
            .run(&mut rng, &candidates, std::future::pending(), |c| {
                shown.push(c.title.clone())
            })
            .await;

        assert_eq!(end, SpinEnd::Completed { frames: 5 });
        assert_eq!(shown.len(), 5);
        assert!(shown.iter().all(|t| ["Walk", "Nap", "Read"].contains(&t.as_str())));
    }

    #[tokio::test]
    async fn test_spin_stops_when_cancelled() {
        let spinner = Spinner {
            ticks: 1000,
            interval: Duration::from_secs(10),
            slowdown: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = pool();
        let mut frames = 0;

        let end = spinner
            .run(&mut rng, &candidates, std::future::ready(()), |_| frames += 1)
            .await;

        assert_eq!(end, SpinEnd::Stopped { frames: 1 });
        assert_eq!(frames, 1);
    }

    #[tokio::test]
    async fn test_spin_with_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let end = Spinner::default()
            .run(&mut rng, &[], std::future::pending(), |_| {})
            .await;
        assert_eq!(end.frames(), 0);
    }

    #[tokio::test]
    async fn test_stop_on_resolves_when_signalled() {
        let stopped =
            tokio::time::timeout(Duration::from_millis(50), stop_on(async { Ok::<(), std::io::Error>(()) })).await;
        assert!(stopped.is_ok());
    }

    #[tokio::test]
    async fn test_stop_on_never_resolves_without_handler() {
        let signal = async { Err::<(), _>(std::io::Error::other("no signal handler")) };
        let stopped = tokio::time::timeout(Duration::from_millis(20), stop_on(signal)).await;
        assert!(stopped.is_err());
    }

    #[tokio::test]
    async fn test_spin_completes_when_handler_fails() {
        let spinner = Spinner {
            ticks: 3,
            interval: Duration::from_millis(1),
            slowdown: false,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = pool();
        let signal = async { Err::<(), _>(std::io::Error::other("no signal handler")) };

        let end = spinner
            .run(&mut rng, &candidates, stop_on(signal), |_| {})
            .await;
        assert_eq!(end, SpinEnd::Completed { frames: 3 });
    }

    #[test]
    fn test_slowdown_delays() {
        let spinner = Spinner::slowing();
        assert_eq!(spinner.delay_for(0), Duration::from_millis(50));
        assert_eq!(spinner.delay_for(15), Duration::from_millis(150));
        assert!(spinner.delay_for(7) > spinner.delay_for(6));
        assert_eq!(Spinner::default().delay_for(10), Duration::from_millis(60));
    }

    #[test]
    fn test_slowdown_saturates_on_huge_interval() {
        let spinner = Spinner {
            ticks: 1000,
            interval: Duration::from_millis(u64::MAX),
            slowdown: true,
        };
        assert!(spinner.delay_for(999) > spinner.interval);
    }
}

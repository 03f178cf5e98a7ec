use std::time::Duration;

/// Counters accumulated over a training session.
#[derive(Debug, Default, Clone)]
pub struct SessionMetrics {
    pub steps_completed: u64,
    pub steps_skipped: u64,
    pub eval_failures: u64,

    pub compute_time: Duration,
}

impl SessionMetrics {
    #[inline]
    pub fn bump_completed(&mut self) {
        self.steps_completed += 1;
    }

    #[inline]
    pub fn bump_skipped(&mut self) {
        self.steps_skipped += 1;
    }

    #[inline]
    pub fn bump_eval_failures(&mut self) {
        self.eval_failures += 1;
    }

    #[inline]
    pub fn add_compute_time(&mut self, elapsed: Duration) {
        self.compute_time += elapsed;
    }
}

use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use log::{info, warn};
use tokio::task;

use crate::{
    Clock, LossEvaluator, Result, SessionError, StepDecision, TelemetrySource, TrainSession,
};

/// Bounds for the polling session loop.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Number of completed steps to reach before returning.
    pub target_steps: NonZeroUsize,

    /// How long to wait before re-polling after a denied or failed
    /// attempt.
    pub retry_poll: Duration,
}

/// Drives a [`TrainSession`] until it reaches a target number of
/// completed steps.
///
/// Design:
/// - The session owns all mutable training state; the loop owns the
///   session, so policy access stays serialized.
/// - Step computation is CPU-bound and runs on Tokio's blocking pool
///   via `spawn_blocking`. The session is moved into the task and back
///   out (O(1) moves, no cloning).
/// - A policy denial is not an error: the loop sleeps `retry_poll` and
///   asks again with fresh telemetry. Evaluator failures are logged
///   and also retried; the policy's backoff decides when the next
///   attempt is admitted.
pub struct SessionLoop<E, T, C> {
    cfg: LoopConfig,
    session: TrainSession<E>,
    telemetry: T,
    clock: C,
}

impl<E, T, C> SessionLoop<E, T, C>
where
    E: LossEvaluator + 'static,
    T: TelemetrySource,
    C: Clock,
{
    pub fn new(cfg: LoopConfig, session: TrainSession<E>, telemetry: T, clock: C) -> Self {
        Self {
            cfg,
            session,
            telemetry,
            clock,
        }
    }

    /// Runs until `cfg.target_steps` steps have completed.
    ///
    /// # Returns
    /// The session, with its accumulated metrics, for inspection or
    /// further use.
    ///
    /// # Errors
    /// Returns `SessionError` on configuration errors or when a
    /// compute task cannot be joined. Evaluator failures do not end
    /// the loop.
    pub async fn run(self) -> Result<TrainSession<E>> {
        let SessionLoop {
            cfg,
            mut session,
            mut telemetry,
            mut clock,
        } = self;

        let target = cfg.target_steps.get() as u64;

        while session.step() < target {
            let sample = telemetry.sample();
            let now_s = clock.now_seconds();

            // Move the session onto the blocking pool for the
            // CPU-bound probes, then take it back.
            let started = Instant::now();
            let (mut session_back, decision) = task::spawn_blocking(move || {
                let mut session = session;
                let decision = session.try_step(&sample, now_s);
                (session, decision)
            })
            .await
            .map_err(|e| SessionError::Compute(e.to_string()))?;

            session_back.metrics_mut().add_compute_time(started.elapsed());
            session = session_back;

            match decision {
                Ok(StepDecision::Completed(outcome)) => {
                    info!(
                        step = session.step(),
                        loss = outcome.loss() as f64,
                        update = outcome.update() as f64;
                        "step completed"
                    );
                }
                Ok(StepDecision::Skipped(_)) => {
                    tokio::time::sleep(cfg.retry_poll).await;
                }
                Err(SessionError::Eval(e)) => {
                    warn!("{e}");
                    tokio::time::sleep(cfg.retry_poll).await;
                }
                Err(other) => return Err(other),
            }
        }

        Ok(session)
    }
}

use fwdgrad::{compute_update, fill_perturbation};
use log::{debug, warn};
use policy::ThermalBatteryPolicy;

use crate::{
    Baseline, EpsilonSchedule, EvalError, LossEvaluator, LossProbe, Result, SeedCycle,
    SessionError, SessionMetrics, TelemetrySample,
};

/// Immutable knobs for a training session.
#[derive(Debug)]
pub struct SessionConfig {
    epsilon: EpsilonSchedule,
    seeds: SeedCycle,
    update_cap: f32,
}

impl SessionConfig {
    /// Creates a new session configuration.
    ///
    /// # Args
    /// * `epsilon` - Perturbation magnitude schedule.
    /// * `seeds` - Seed cycle selecting the perturbation direction per
    ///   step.
    /// * `update_cap` - Maximum absolute value of a step update.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidConfig` when `update_cap` is
    /// negative or not finite.
    pub fn new(
        epsilon: EpsilonSchedule,
        seeds: SeedCycle,
        update_cap: f32,
    ) -> Result<Self> {
        if !update_cap.is_finite() || update_cap < 0.0 {
            return Err(SessionError::InvalidConfig(
                "update cap must be finite and non-negative",
            ));
        }
        Ok(Self {
            epsilon,
            seeds,
            update_cap,
        })
    }
}

/// Report produced by one completed training step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    seed: u64,
    update: f32,
    loss: f32,
    raw_rho: f32,
    epsilon: f32,
}

impl StepOutcome {
    /// Seed that selected this step's perturbation direction.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Baseline-adjusted, capped scalar update for the optimizer.
    pub fn update(&self) -> f32 {
        self.update
    }

    /// Unperturbed loss, reported for observability.
    pub fn loss(&self) -> f32 {
        self.loss
    }

    /// Finite-difference estimate before baseline subtraction and
    /// capping.
    pub fn raw_rho(&self) -> f32 {
        self.raw_rho
    }

    /// Perturbation magnitude used for this step.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

/// Why a step attempt did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The admission policy denied the step (battery, backoff, or
    /// thermal gate).
    PolicyDenied,
}

/// Result of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepDecision {
    Skipped(SkipReason),
    Completed(StepOutcome),
}

/// One forward-gradient training session.
///
/// Owns the admission policy, the loss evaluator, the schedules, the
/// control-variate baseline, and a perturbation buffer reused across
/// steps. All policy access goes through this type, which keeps the
/// read-modify-write state serialized as long as the session itself is
/// not shared.
#[derive(Debug)]
pub struct TrainSession<E> {
    cfg: SessionConfig,
    policy: ThermalBatteryPolicy,
    evaluator: E,
    baseline: Baseline,

    /// Reused across steps to avoid per-step allocations.
    perturbation: Vec<f32>,

    /// Completed-step counter; skipped attempts do not advance it.
    step: u64,

    metrics: SessionMetrics,
}

impl<E: LossEvaluator> TrainSession<E> {
    pub fn new(cfg: SessionConfig, evaluator: E) -> Self {
        let num_params = evaluator.num_params();
        Self {
            cfg,
            policy: ThermalBatteryPolicy::new(),
            evaluator,
            baseline: Baseline::default(),
            perturbation: vec![0.0; num_params],
            step: 0,
            metrics: SessionMetrics::default(),
        }
    }

    /// Attempts one training step.
    ///
    /// The flow per attempt:
    /// 1. Ask the policy for admission; a denial skips the step and
    ///    advances nothing.
    /// 2. Evaluate the baseline loss.
    /// 3. Fill the perturbation buffer from this step's seed.
    /// 4. Evaluate the loss under `+epsilon` and `-epsilon`.
    /// 5. Fold the raw estimate into the control-variate baseline and
    ///    compute the capped update.
    /// 6. Report the outcome back to the policy.
    ///
    /// # Args
    /// * `telemetry` - Current device conditions.
    /// * `now_s` - Current time in whole seconds.
    ///
    /// # Returns
    /// `StepDecision::Skipped` when the policy denies the attempt,
    /// `StepDecision::Completed` with the step report otherwise.
    ///
    /// # Errors
    /// Returns `SessionError::Eval` when the evaluator fails mid-step;
    /// the policy has already been told to back off in that case.
    pub fn try_step(
        &mut self,
        telemetry: &TelemetrySample,
        now_s: u64,
    ) -> Result<StepDecision> {
        if !self.policy.should_run(
            telemetry.temp_c,
            telemetry.battery_percent,
            telemetry.is_charging,
            now_s,
        ) {
            self.metrics.bump_skipped();
            debug!(
                temp_c = telemetry.temp_c,
                battery = telemetry.battery_percent;
                "step denied by admission policy"
            );
            return Ok(StepDecision::Skipped(SkipReason::PolicyDenied));
        }

        let epsilon = self.cfg.epsilon.at(self.step);
        if epsilon == 0.0 {
            return Err(SessionError::InvalidConfig(
                "epsilon schedule produced zero",
            ));
        }
        let seed = self.cfg.seeds.seed_for(self.step);

        let (loss, loss_plus, loss_minus) = match self.run_probes(seed, epsilon) {
            Ok(losses) => losses,
            Err(e) => {
                self.policy.report_failure(now_s);
                self.metrics.bump_eval_failures();
                warn!(
                    step = self.step,
                    next_allowed_run = self.policy.next_allowed_run();
                    "loss evaluation failed, backing off"
                );
                return Err(SessionError::Eval(e));
            }
        };

        let raw_rho = (loss_plus - loss_minus) / (2.0 * epsilon);
        let baseline = self.baseline.observe(raw_rho);
        let update = compute_update(loss_plus, loss_minus, epsilon, baseline, self.cfg.update_cap)?;

        self.policy.report_success();
        self.metrics.bump_completed();
        let outcome = StepOutcome {
            seed,
            update,
            loss,
            raw_rho,
            epsilon,
        };
        debug!(
            step = self.step,
            seed = seed,
            loss = loss as f64,
            update = update as f64;
            "training step completed"
        );
        self.step += 1;

        Ok(StepDecision::Completed(outcome))
    }

    /// Runs the three forward passes of one step: baseline, then the
    /// two antithetic probes along a freshly derived direction.
    fn run_probes(
        &mut self,
        seed: u64,
        epsilon: f32,
    ) -> std::result::Result<(f32, f32, f32), EvalError> {
        let loss = self.evaluator.loss(LossProbe::Baseline)?;

        fill_perturbation(seed, &mut self.perturbation);

        let loss_plus = self.evaluator.loss(LossProbe::Perturbed {
            direction: &self.perturbation,
            epsilon,
        })?;
        let loss_minus = self.evaluator.loss(LossProbe::Perturbed {
            direction: &self.perturbation,
            epsilon: -epsilon,
        })?;

        Ok((loss, loss_plus, loss_minus))
    }

    /// Completed-step count.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn policy(&self) -> &ThermalBatteryPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut ThermalBatteryPolicy {
        &mut self.policy
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut SessionMetrics {
        &mut self.metrics
    }
}

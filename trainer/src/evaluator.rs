use crate::EvalError;

/// One forward pass requested from the evaluator.
#[derive(Debug, Clone, Copy)]
pub enum LossProbe<'a> {
    /// Evaluate the unperturbed model.
    Baseline,

    /// Evaluate with `epsilon * direction` added to the trainable
    /// parameters. A negative `epsilon` probes the antithetic side.
    Perturbed { direction: &'a [f32], epsilon: f32 },
}

/// Abstraction over the host runtime that maps a model plus an
/// optional perturbation to a scalar loss.
///
/// Implementations encapsulate all model-, data-, and batching-specific
/// logic; the session treats this trait as a black box that turns
/// probes into loss values. This is the boundary to the on-device
/// inference runtime: how weights are stored, perturbed in place, or
/// restored afterwards is intentionally outside the training core.
pub trait LossEvaluator: Send {
    /// Number of trainable parameters. Fixes the length of every
    /// perturbation direction handed to [`LossEvaluator::loss`]; must
    /// stay constant for the lifetime of a session.
    fn num_params(&self) -> usize;

    /// Evaluates the loss for one probe.
    ///
    /// # Args
    /// * `probe` - Which forward pass to run.
    ///
    /// # Returns
    /// The scalar loss for this probe.
    ///
    /// # Errors
    /// Returns `EvalError` when the host runtime cannot produce a
    /// loss; the session converts this into a policy backoff.
    fn loss(&mut self, probe: LossProbe<'_>) -> std::result::Result<f32, EvalError>;
}

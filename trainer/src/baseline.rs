/// Exponential moving average of the raw gradient estimate, used as a
/// control variate to reduce update variance.
#[derive(Debug, Clone)]
pub struct Baseline {
    beta: f32,
    value: f32,
}

impl Baseline {
    /// Momentum used by the on-device runtime.
    pub const DEFAULT_BETA: f32 = 0.9;

    pub fn new(beta: f32) -> Self {
        Self { beta, value: 0.0 }
    }

    /// Folds a raw estimate into the running average and returns the
    /// value to subtract for the current step.
    ///
    /// The average is updated first, then subtracted, so a lone
    /// outlier already damps its own step.
    pub fn observe(&mut self, raw_rho: f32) -> f32 {
        self.value = self.beta * self.value + (1.0 - self.beta) * raw_rho;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BETA)
    }
}

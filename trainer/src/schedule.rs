use std::{fmt, num::NonZeroUsize};

use rand::Rng;

use crate::SessionError;

/// Perturbation magnitude per step.
pub enum EpsilonSchedule {
    /// Same magnitude on every step.
    Constant(f32),

    /// Step-indexed magnitude.
    PerStep(Box<dyn Fn(u64) -> f32 + Send>),
}

impl EpsilonSchedule {
    /// Magnitude to use for the given step index.
    pub fn at(&self, step: u64) -> f32 {
        match self {
            EpsilonSchedule::Constant(epsilon) => *epsilon,
            EpsilonSchedule::PerStep(f) => f(step),
        }
    }
}

impl fmt::Debug for EpsilonSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpsilonSchedule::Constant(epsilon) => {
                f.debug_tuple("Constant").field(epsilon).finish()
            }
            EpsilonSchedule::PerStep(_) => f.debug_tuple("PerStep").finish(),
        }
    }
}

/// Ordered seed list consumed round-robin by step index.
///
/// Keeping the seeds as data (rather than drawing them ad hoc) is what
/// makes a whole session replayable: the step index alone determines
/// the perturbation direction.
#[derive(Debug, Clone)]
pub struct SeedCycle {
    seeds: Vec<u64>,
}

impl SeedCycle {
    /// Builds a cycle from an explicit seed list.
    ///
    /// # Errors
    /// Returns `SessionError::InvalidConfig` when the list is empty.
    pub fn new(seeds: Vec<u64>) -> Result<Self, SessionError> {
        if seeds.is_empty() {
            return Err(SessionError::InvalidConfig("seed cycle must not be empty"));
        }
        Ok(Self { seeds })
    }

    /// Draws a fresh list of `n` session seeds.
    pub fn random(n: NonZeroUsize) -> Self {
        let mut rng = rand::rng();
        Self {
            seeds: (0..n.get()).map(|_| rng.random()).collect(),
        }
    }

    /// Seed for the given step index; wraps around at the end of the
    /// list.
    pub fn seed_for(&self, step: u64) -> u64 {
        self.seeds[(step % self.seeds.len() as u64) as usize]
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        // The constructor rejects empty lists.
        false
    }
}

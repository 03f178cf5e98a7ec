use std::fmt;

/// Errors produced when update-rule inputs are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateError {
    /// `epsilon` was exactly zero, so the finite difference is undefined.
    ZeroEpsilon,

    /// `cap` was negative, so the clip interval is empty.
    NegativeCap,
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::ZeroEpsilon => write!(f, "epsilon must be non-zero"),
            UpdateError::NegativeCap => write!(f, "cap must be non-negative"),
        }
    }
}

impl std::error::Error for UpdateError {}

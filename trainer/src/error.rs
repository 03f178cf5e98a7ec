use std::{error::Error, fmt};

use fwdgrad::UpdateError;

/// The trainer module's result type.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Failure reported by a loss evaluator.
#[derive(Debug)]
pub struct EvalError {
    message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loss evaluation failed: {}", self.message)
    }
}

impl Error for EvalError {}

/// Training session failures.
#[derive(Debug)]
pub enum SessionError {
    /// The loss evaluator failed mid-step. The admission policy has
    /// already been told to back off when this is returned from a
    /// step attempt.
    Eval(EvalError),

    /// The update rule rejected its inputs.
    Update(UpdateError),

    /// A configuration value is unusable.
    InvalidConfig(&'static str),

    /// A background compute task could not be joined.
    Compute(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Eval(e) => write!(f, "{e}"),
            SessionError::Update(e) => write!(f, "update rule error: {e}"),
            SessionError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            SessionError::Compute(msg) => write!(f, "compute task failed: {msg}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Eval(e) => Some(e),
            SessionError::Update(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EvalError> for SessionError {
    fn from(value: EvalError) -> Self {
        Self::Eval(value)
    }
}

impl From<UpdateError> for SessionError {
    fn from(value: UpdateError) -> Self {
        Self::Update(value)
    }
}

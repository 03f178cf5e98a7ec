mod baseline;
mod error;
mod evaluator;
mod loop_;
mod metrics;
mod schedule;
mod session;
mod telemetry;

pub use baseline::Baseline;
pub use error::{EvalError, Result, SessionError};
pub use evaluator::{LossEvaluator, LossProbe};
pub use loop_::{LoopConfig, SessionLoop};
pub use metrics::SessionMetrics;
pub use schedule::{EpsilonSchedule, SeedCycle};
pub use session::{SessionConfig, SkipReason, StepDecision, StepOutcome, TrainSession};
pub use telemetry::{Clock, SystemClock, TelemetrySample, TelemetrySource};

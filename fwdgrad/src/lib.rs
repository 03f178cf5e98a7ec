mod error;
mod perturbation;
mod rng;
mod update;

pub use error::UpdateError;
pub use perturbation::{fill_perturbation, generate_perturbation};
pub use rng::{SplitMix64, Xoshiro256StarStar};
pub use update::compute_update;

use crate::error::UpdateError;

/// Collapses a symmetric two-sided loss measurement into a bounded
/// scalar gradient estimate.
///
/// Computes `rho = (loss_plus - loss_minus) / (2 * epsilon)`, subtracts
/// `baseline`, and clips the result into `[-cap, cap]`.
///
/// # Args
/// * `loss_plus` - Loss under the `+epsilon` perturbation.
/// * `loss_minus` - Loss under the `-epsilon` perturbation.
/// * `epsilon` - Perturbation magnitude used for both evaluations.
/// * `baseline` - Control-variate value subtracted from the raw
///   estimate.
/// * `cap` - Maximum absolute value of the returned update.
///
/// # Errors
/// Returns `UpdateError::ZeroEpsilon` when `epsilon == 0.0` and
/// `UpdateError::NegativeCap` when `cap < 0.0`. NaN/Inf inputs are not
/// guarded; they propagate per IEEE-754 arithmetic.
pub fn compute_update(
    loss_plus: f32,
    loss_minus: f32,
    epsilon: f32,
    baseline: f32,
    cap: f32,
) -> Result<f32, UpdateError> {
    if epsilon == 0.0 {
        return Err(UpdateError::ZeroEpsilon);
    }
    if cap < 0.0 {
        return Err(UpdateError::NegativeCap);
    }

    let rho = (loss_plus - loss_minus) / (2.0 * epsilon);
    let adjusted = rho - baseline;

    Ok(adjusted.max(-cap).min(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_estimate() {
        // (10 - 8) / 0.2 = 10.0
        let rho = compute_update(10.0, 8.0, 0.1, 0.0, 100.0).unwrap();
        assert!((rho - 10.0).abs() < 1e-5);
    }

    #[test]
    fn baseline_is_subtracted() {
        let rho = compute_update(10.0, 8.0, 0.1, 2.0, 100.0).unwrap();
        assert!((rho - 8.0).abs() < 1e-5);
    }

    #[test]
    fn cap_clips_both_sides() {
        let rho = compute_update(10.0, 8.0, 0.1, 0.0, 5.0).unwrap();
        assert_eq!(rho, 5.0);

        let rho = compute_update(8.0, 10.0, 0.1, 0.0, 5.0).unwrap();
        assert_eq!(rho, -5.0);
    }

    #[test]
    fn zero_cap_pins_update() {
        let rho = compute_update(10.0, 8.0, 0.1, 0.0, 0.0).unwrap();
        assert_eq!(rho, 0.0);
    }

    #[test]
    fn zero_epsilon_is_rejected() {
        assert_eq!(
            compute_update(10.0, 8.0, 0.0, 0.0, 100.0),
            Err(UpdateError::ZeroEpsilon)
        );
    }

    #[test]
    fn negative_cap_is_rejected() {
        assert_eq!(
            compute_update(10.0, 8.0, 0.1, 0.0, -1.0),
            Err(UpdateError::NegativeCap)
        );
    }

    #[test]
    fn negative_epsilon_flips_sign() {
        let rho = compute_update(10.0, 8.0, -0.1, 0.0, 100.0).unwrap();
        assert!((rho + 10.0).abs() < 1e-5);
    }
}

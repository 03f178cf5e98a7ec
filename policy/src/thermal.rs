/// Thermal operating mode tracked across admission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Cooldown,
}

const TEMP_HIGH_C: f32 = 38.0;
const TEMP_LOW_C: f32 = 35.0;
const BATTERY_MIN_PERCENT: f32 = 20.0;

/// 10 minutes.
const BASE_BACKOFF_SECS: u64 = 600;

/// Largest exponent applied to the backoff base. The capped delay
/// already exceeds any plausible session length; larger shifts would
/// overflow the 64-bit second count.
const MAX_BACKOFF_SHIFT: u32 = 40;

/// Admission-control gate for on-device training steps.
///
/// Combines instantaneous telemetry (temperature, battery level) with
/// failure history (exponential backoff) to decide whether a single
/// step may run right now. The temperature check uses two thresholds
/// so the decision cannot oscillate near a single boundary: once the
/// device runs hot the policy stays in [`Mode::Cooldown`] until the
/// temperature drops below the lower threshold.
///
/// One instance guards one training session. The methods read-modify-
/// write the same record, so concurrent callers must serialize access
/// (confine the instance to one control thread or wrap it in a mutex).
#[derive(Debug, Clone)]
pub struct ThermalBatteryPolicy {
    mode: Mode,
    consecutive_failures: u32,
    next_allowed_run: u64,
}

impl Default for ThermalBatteryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalBatteryPolicy {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            consecutive_failures: 0,
            next_allowed_run: 0,
        }
    }

    /// Decides whether a training step may run right now.
    ///
    /// Gates are evaluated in order and short-circuit: battery, then
    /// backoff, then the thermal hysteresis state machine. Only the
    /// thermal gate mutates state, and only when it is reached.
    ///
    /// `is_charging` is accepted but does not influence the decision;
    /// it is reserved for a future charging-aware policy.
    ///
    /// # Args
    /// * `temp_c` - Current device temperature in Celsius.
    /// * `battery_percent` - Current battery level (0.0 to 100.0).
    /// * `is_charging` - Whether the device is currently charging.
    /// * `now_s` - Current time in whole seconds.
    ///
    /// # Returns
    /// `true` if the step is admitted.
    pub fn should_run(
        &mut self,
        temp_c: f32,
        battery_percent: f32,
        is_charging: bool,
        now_s: u64,
    ) -> bool {
        let _ = is_charging;

        if battery_percent < BATTERY_MIN_PERCENT {
            return false;
        }

        if now_s < self.next_allowed_run {
            return false;
        }

        match self.mode {
            Mode::Idle => {
                if temp_c > TEMP_HIGH_C {
                    self.mode = Mode::Cooldown;
                    return false;
                }
                true
            }
            Mode::Cooldown => {
                if temp_c < TEMP_LOW_C {
                    self.mode = Mode::Idle;
                    return true;
                }
                false
            }
        }
    }

    /// Records a completed step: clears the failure count and any
    /// pending backoff. The thermal mode is untouched.
    pub fn report_success(&mut self) {
        self.consecutive_failures = 0;
        self.next_allowed_run = 0;
    }

    /// Records a failed step and pushes the next allowed run out by
    /// `600 * 2^failures` seconds, keyed on the post-increment count:
    /// the first failure backs off 20 minutes, the second 40, and so
    /// on. The shift saturates at `MAX_BACKOFF_SHIFT` so the delay
    /// stays finite. The thermal mode is untouched.
    ///
    /// # Args
    /// * `now_s` - Current time in whole seconds.
    pub fn report_failure(&mut self, now_s: u64) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        let shift = self.consecutive_failures.min(MAX_BACKOFF_SHIFT);
        let backoff = BASE_BACKOFF_SECS << shift;
        self.next_allowed_run = now_s.saturating_add(backoff);
    }

    /// Restores the initial state unconditionally: `Idle`, zero
    /// failures, no pending backoff.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.consecutive_failures = 0;
        self.next_allowed_run = 0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Earliest second at which a step may run again; 0 means no
    /// backoff is pending.
    pub fn next_allowed_run(&self) -> u64 {
        self.next_allowed_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_cutoff() {
        let mut policy = ThermalBatteryPolicy::new();
        let now = 1000;

        assert!(!policy.should_run(30.0, 19.0, false, now));
        assert!(policy.should_run(30.0, 20.0, false, now));
    }

    #[test]
    fn low_battery_does_not_touch_state() {
        let mut policy = ThermalBatteryPolicy::new();

        // Hot enough to trip the thermal gate, but the battery gate
        // short-circuits first.
        assert!(!policy.should_run(40.0, 10.0, false, 1000));
        assert_eq!(policy.mode(), Mode::Idle);
    }

    #[test]
    fn hysteresis_band() {
        let mut policy = ThermalBatteryPolicy::new();
        let now = 1000;

        // Idle, below the high threshold.
        assert!(policy.should_run(37.0, 50.0, false, now));
        assert_eq!(policy.mode(), Mode::Idle);

        // Above 38.0: denied, switch to Cooldown.
        assert!(!policy.should_run(38.1, 50.0, false, now));
        assert_eq!(policy.mode(), Mode::Cooldown);

        // Inside the band: stay in Cooldown, denied.
        assert!(!policy.should_run(36.0, 50.0, false, now));
        assert_eq!(policy.mode(), Mode::Cooldown);

        // Below 35.0: allowed again, back to Idle.
        assert!(policy.should_run(34.9, 50.0, false, now));
        assert_eq!(policy.mode(), Mode::Idle);
    }

    #[test]
    fn band_sweep_never_oscillates() {
        let mut policy = ThermalBatteryPolicy::new();

        assert!(!policy.should_run(39.0, 50.0, false, 0));
        assert_eq!(policy.mode(), Mode::Cooldown);

        // Any sequence of temperatures inside [35, 38] keeps Cooldown.
        for temp in [35.0, 36.5, 37.9, 35.1, 38.0, 36.0] {
            assert!(!policy.should_run(temp, 50.0, false, 0));
            assert_eq!(policy.mode(), Mode::Cooldown);
        }
    }

    #[test]
    fn boundary_temperatures_do_not_transition() {
        let mut policy = ThermalBatteryPolicy::new();

        // Exactly 38.0 in Idle is not "exceeds": still allowed.
        assert!(policy.should_run(38.0, 50.0, false, 0));
        assert_eq!(policy.mode(), Mode::Idle);

        assert!(!policy.should_run(38.1, 50.0, false, 0));

        // Exactly 35.0 in Cooldown is not "drops below": still denied.
        assert!(!policy.should_run(35.0, 50.0, false, 0));
        assert_eq!(policy.mode(), Mode::Cooldown);
    }

    #[test]
    fn exponential_backoff() {
        let mut policy = ThermalBatteryPolicy::new();
        let now = 1000;

        // First failure: 600 * 2^1 = 1200 seconds.
        policy.report_failure(now);
        assert_eq!(policy.consecutive_failures(), 1);
        let expected_next = now + 1200;
        assert_eq!(policy.next_allowed_run(), expected_next);

        assert!(!policy.should_run(30.0, 50.0, false, now + 100));
        assert!(policy.should_run(30.0, 50.0, false, expected_next + 1));

        // Second failure: 600 * 2^2 = 2400 seconds.
        let now = expected_next + 100;
        policy.report_failure(now);
        assert_eq!(policy.consecutive_failures(), 2);
        assert_eq!(policy.next_allowed_run(), now + 2400);

        policy.report_success();
        assert_eq!(policy.consecutive_failures(), 0);
        assert_eq!(policy.next_allowed_run(), 0);
    }

    #[test]
    fn backoff_deadline_itself_is_allowed() {
        let mut policy = ThermalBatteryPolicy::new();
        policy.report_failure(1000);

        let deadline = policy.next_allowed_run();
        assert!(!policy.should_run(30.0, 50.0, false, deadline - 1));
        assert!(policy.should_run(30.0, 50.0, false, deadline));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let mut policy = ThermalBatteryPolicy::new();
        let now = 1000;

        let mut previous = 0;
        for _ in 0..200 {
            policy.report_failure(now);
            let next = policy.next_allowed_run();
            assert!(next < u64::MAX);
            assert!(next >= previous);
            previous = next;
        }

        assert_eq!(policy.consecutive_failures(), 200);
        assert_eq!(policy.next_allowed_run(), now + (600u64 << 40));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut policy = ThermalBatteryPolicy::new();

        policy.report_failure(5000);
        assert!(!policy.should_run(39.0, 50.0, false, policy.next_allowed_run() + 1));

        for _ in 0..3 {
            policy.reset();
            assert_eq!(policy.mode(), Mode::Idle);
            assert_eq!(policy.consecutive_failures(), 0);
            assert_eq!(policy.next_allowed_run(), 0);
        }
    }

    #[test]
    fn charging_flag_is_inert() {
        let mut on = ThermalBatteryPolicy::new();
        let mut off = ThermalBatteryPolicy::new();

        for (temp, battery) in [(30.0, 50.0), (39.0, 50.0), (30.0, 10.0), (34.0, 50.0)] {
            assert_eq!(
                on.should_run(temp, battery, true, 0),
                off.should_run(temp, battery, false, 0)
            );
            assert_eq!(on.mode(), off.mode());
        }
    }

    #[test]
    fn out_of_range_telemetry_is_taken_literally() {
        let mut policy = ThermalBatteryPolicy::new();

        // Battery above 100 passes the battery gate.
        assert!(policy.should_run(30.0, 150.0, false, 0));

        // Negative temperature is simply "cold".
        assert!(policy.should_run(-10.0, 50.0, false, 0));

        // Negative battery is simply "low".
        assert!(!policy.should_run(30.0, -5.0, false, 0));
    }
}

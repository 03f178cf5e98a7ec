use std::time::{SystemTime, UNIX_EPOCH};

/// One already-sampled snapshot of device conditions.
///
/// How the numbers are obtained (sensor polling, OS callbacks,
/// platform APIs) is outside the training core; it only consumes
/// scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Device temperature in Celsius.
    pub temp_c: f32,

    /// Battery level, 0.0 to 100.0.
    pub battery_percent: f32,

    /// Whether the device is currently charging.
    pub is_charging: bool,
}

/// Supplies device telemetry snapshots to the session loop.
pub trait TelemetrySource: Send {
    fn sample(&mut self) -> TelemetrySample;
}

/// Supplies the current time in whole seconds.
pub trait Clock: Send {
    fn now_seconds(&mut self) -> u64;
}

/// Wall-clock seconds since the Unix epoch.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_seconds(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

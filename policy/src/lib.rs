mod thermal;

pub use thermal::{Mode, ThermalBatteryPolicy};

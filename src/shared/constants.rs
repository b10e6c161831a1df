pub const CONFIG_DIRECTORY: &str = "./config";

/// Probability that an eligible draw grants same-day unlimited status.
pub const DAILY_LUCKY_RATE: f64 = 0.01;

/// Cohort size when enough candidates were active during the window.
pub const WEEKLY_COHORT_SIZE: usize = 3;

/// Trailing window scanned for candidate activity before each rotation.
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

//! Simulation time helpers.
//!
//! Simulation time is counted in whole milliseconds (`u64`) so timers and
//! dwell countdowns use checked integer arithmetic. Only movement needs
//! fractional seconds.

/// Milliseconds per second.
pub const MILLIS_PER_SECOND: u64 = 1000;

/// Convert a millisecond duration to fractional seconds.
#[allow(clippy::cast_precision_loss)] // exact for anything below 2^53 ms
pub const fn millis_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_millis() {
        assert!((millis_to_seconds(1500) - 1.5).abs() < f64::EPSILON);
        assert!(millis_to_seconds(0).abs() < f64::EPSILON);
    }
}

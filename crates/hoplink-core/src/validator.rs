//! Signal Validation
//!
//! A received hop is only trusted when its amplitude and duration both fall
//! inside fixed windows around the nominal values. Windows are inclusive.
//!
//! ```text
//!   amplitude:  [nominal - 0.3 V, nominal + 0.3 V]   (2.7 .. 3.3 V)
//!   time:       [t_hop - 0.1 ms,  t_hop + 0.1 ms]    (1.9 .. 2.1 ms)
//! ```

use serde::{Deserialize, Serialize};

use crate::params::LinkParams;

/// Why a signal failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Amplitude outside its window (reported even if time also failed)
    Amplitude,
    /// Only the duration was outside its window
    Time,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Amplitude => write!(f, "amplitude out of tolerance"),
            RejectReason::Time => write!(f, "time out of tolerance"),
        }
    }
}

/// Outcome of checking one signal against the tolerance windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub is_valid_amplitude: bool,
    pub is_valid_time: bool,
    pub amplitude_v: f64,
    pub time_ms: f64,
    pub min_amplitude_v: f64,
    pub max_amplitude_v: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub amplitude_tolerance_v: f64,
    pub time_tolerance_ms: f64,
}

impl ValidationResult {
    /// The reason for rejection, or `None` when valid
    pub fn reject_reason(&self) -> Option<RejectReason> {
        if self.is_valid {
            None
        } else if !self.is_valid_amplitude {
            Some(RejectReason::Amplitude)
        } else {
            Some(RejectReason::Time)
        }
    }
}

/// Check amplitude and duration against the tolerance windows
pub fn validate_signal(params: &LinkParams, amplitude_v: f64, time_ms: f64) -> ValidationResult {
    let min_amplitude_v = params.nominal_amplitude_v - params.amplitude_tolerance_v;
    let max_amplitude_v = params.nominal_amplitude_v + params.amplitude_tolerance_v;
    let min_time_ms = params.hop_duration_ms - params.time_tolerance_ms;
    let max_time_ms = params.hop_duration_ms + params.time_tolerance_ms;

    let is_valid_amplitude = min_amplitude_v <= amplitude_v && amplitude_v <= max_amplitude_v;
    let is_valid_time = min_time_ms <= time_ms && time_ms <= max_time_ms;

    ValidationResult {
        is_valid: is_valid_amplitude && is_valid_time,
        is_valid_amplitude,
        is_valid_time,
        amplitude_v,
        time_ms,
        min_amplitude_v,
        max_amplitude_v,
        min_time_ms,
        max_time_ms,
        amplitude_tolerance_v: params.amplitude_tolerance_v,
        time_tolerance_ms: params.time_tolerance_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_nominal_signal_is_valid() {
        let params = LinkParams::default();
        let result = validate_signal(&params, 3.0, 2.0);
        assert!(result.is_valid);
        assert!(result.reject_reason().is_none());
    }

    #[test]
    fn test_amplitude_boundaries() {
        let params = LinkParams::default();
        let bounds = validate_signal(&params, 3.0, 2.0);

        assert!(validate_signal(&params, bounds.min_amplitude_v, 2.0).is_valid);
        assert!(validate_signal(&params, bounds.max_amplitude_v, 2.0).is_valid);

        let low = validate_signal(&params, bounds.min_amplitude_v - EPS, 2.0);
        assert!(!low.is_valid);
        assert!(!low.is_valid_amplitude);
        assert!(low.is_valid_time);

        let high = validate_signal(&params, bounds.max_amplitude_v + EPS, 2.0);
        assert!(!high.is_valid);
        assert_eq!(high.reject_reason(), Some(RejectReason::Amplitude));
    }

    #[test]
    fn test_time_boundaries() {
        let params = LinkParams::default();
        let bounds = validate_signal(&params, 3.0, 2.0);

        assert!(validate_signal(&params, 3.0, bounds.min_time_ms).is_valid);
        assert!(validate_signal(&params, 3.0, bounds.max_time_ms).is_valid);

        let early = validate_signal(&params, 3.0, bounds.min_time_ms - EPS);
        assert!(!early.is_valid);
        assert_eq!(early.reject_reason(), Some(RejectReason::Time));

        let late = validate_signal(&params, 3.0, bounds.max_time_ms + EPS);
        assert!(!late.is_valid_time);
    }

    #[test]
    fn test_amplitude_reason_wins() {
        let params = LinkParams::default();
        let result = validate_signal(&params, 10.0, 50.0);
        assert!(!result.is_valid_amplitude);
        assert!(!result.is_valid_time);
        assert_eq!(result.reject_reason(), Some(RejectReason::Amplitude));
    }
}

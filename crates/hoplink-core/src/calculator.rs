//! Frequency Calculator
//!
//! Maps the physical parameters of a hop onto a carrier frequency:
//!
//! ```text
//! f = f0 + (A × k1 + E × k2) / t
//!
//!   A  amplitude (V)        k1  product / k2 for the current schedule entry
//!   E  energy (A² × t)      k2  fixed (100)
//!   t  hop duration (ms)    f0  2000 MHz
//! ```
//!
//! ## Retry policy
//!
//! A pair is accepted when the unclamped result already lies inside the band.
//! Otherwise the next schedule entry is tried, cycling, for at most one full
//! pass over the schedule. If no entry lands in band the result falls back to
//! `f0` with a fixed (10, 100) pair and is flagged invalid.
//!
//! [`compute_frequency`] is pure: it reports which schedule position it
//! settled on and leaves it to the caller to commit that position or not.

use serde::{Deserialize, Serialize};

use crate::params::LinkParams;
use crate::schedule::{CoefficientPair, CoefficientSchedule};

/// Outcome of one frequency computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyResult {
    /// Selected frequency in MHz, inside the band
    pub frequency_mhz: f64,
    /// Value of the formula before band clamping
    pub raw_frequency_mhz: f64,
    pub amplitude_v: f64,
    /// Duration actually used (the hop duration if the input was not positive)
    pub time_ms: f64,
    pub energy: f64,
    pub k1: u32,
    pub k2: u32,
    pub k1_k2_product: u32,
    /// Schedule position the accepted pair came from
    pub coefficient_index: usize,
    pub is_valid: bool,
    /// 0-based index of the accepted attempt
    pub attempt: usize,
    /// Number of pairs evaluated
    pub attempts: usize,
    pub formula: String,
    pub calculation: String,
}

impl FrequencyResult {
    /// Whether the schedule cursor moved past the starting position
    pub fn retried(&self) -> bool {
        self.is_valid && self.attempt > 0
    }
}

/// Evaluate the formula for one pair
fn evaluate(f0_mhz: f64, pair: &CoefficientPair, amplitude_v: f64, energy: f64, time_ms: f64) -> f64 {
    f0_mhz + (amplitude_v * pair.k1 as f64 + energy * pair.k2 as f64) / time_ms
}

/// Compute the hop frequency starting from schedule position `start_index`.
pub fn compute_frequency(
    schedule: &CoefficientSchedule,
    params: &LinkParams,
    start_index: usize,
    amplitude_v: f64,
    time_ms: f64,
    energy: f64,
) -> FrequencyResult {
    let time_ms = if time_ms > 0.0 {
        time_ms
    } else {
        params.hop_duration_ms
    };
    let f0 = params.f0_mhz;
    let max_attempts = schedule.len();

    for attempt in 0..max_attempts {
        let pair = schedule.pair(start_index + attempt);
        let raw = evaluate(f0, &pair, amplitude_v, energy, time_ms);

        if !params.in_band(raw) {
            continue;
        }

        return FrequencyResult {
            frequency_mhz: params.clamp_to_band(raw),
            raw_frequency_mhz: raw,
            amplitude_v,
            time_ms,
            energy,
            k1: pair.k1,
            k2: pair.k2,
            k1_k2_product: pair.effective_product(),
            coefficient_index: pair.index,
            is_valid: true,
            attempt,
            attempts: attempt + 1,
            formula: format!(
                "f = {} + ({:.2} × {} + {:.2} × {}) / {}",
                f0, amplitude_v, pair.k1, energy, pair.k2, time_ms
            ),
            calculation: format!(
                "f = {} + ({:.1} + {:.1}) / {}",
                f0,
                amplitude_v * pair.k1 as f64,
                energy * pair.k2 as f64,
                time_ms
            ),
        };
    }

    tracing::debug!(
        amplitude_v,
        energy,
        time_ms,
        attempts = max_attempts,
        "no schedule entry lands in band, falling back to f0"
    );

    FrequencyResult {
        frequency_mhz: f0,
        raw_frequency_mhz: f0,
        amplitude_v,
        time_ms,
        energy,
        k1: params.fallback_k1,
        k2: params.fallback_k2,
        k1_k2_product: params.fallback_k1.saturating_mul(params.fallback_k2),
        coefficient_index: start_index % max_attempts,
        is_valid: false,
        attempt: max_attempts.saturating_sub(1),
        attempts: max_attempts,
        formula: format!("FALLBACK: f = {} (out of band)", f0),
        calculation: format!("FALLBACK: f = {}", f0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalParameters;
    use approx::assert_relative_eq;

    fn schedule(products: &[u32]) -> CoefficientSchedule {
        CoefficientSchedule::from_products(products.to_vec(), 100).unwrap()
    }

    #[test]
    fn test_formula() {
        let params = LinkParams::default();
        let sched = schedule(&[1500, 2000, 2500]);

        // k1 = 15: 2000 + (3.0 × 15 + 18.0 × 100) / 2 = 2922.5
        let result = compute_frequency(&sched, &params, 0, 3.0, 2.0, 18.0);
        assert!(result.is_valid);
        assert_relative_eq!(result.frequency_mhz, 2922.5, epsilon = 1e-9);
        assert_eq!(result.k1, 15);
        assert_eq!(result.k2, 100);
        assert_eq!(result.k1_k2_product, 1500);
        assert_eq!(result.attempt, 0);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.coefficient_index, 0);
        assert_eq!(result.formula, "f = 2000 + (3.00 × 15 + 18.00 × 100) / 2");
        assert_eq!(result.calculation, "f = 2000 + (45.0 + 1800.0) / 2");
    }

    #[test]
    fn test_zero_and_negative_time_use_hop_duration() {
        let params = LinkParams::default();
        let sched = schedule(&[2000]);

        let nominal = compute_frequency(&sched, &params, 0, 3.0, 2.0, 18.0);
        for t in [0.0, -1.0, -0.0] {
            let guarded = compute_frequency(&sched, &params, 0, 3.0, t, 18.0);
            assert_eq!(guarded.time_ms, 2.0);
            assert_eq!(guarded.frequency_mhz, nominal.frequency_mhz);
            assert!(guarded.frequency_mhz.is_finite());
        }
    }

    #[test]
    fn test_retries_until_in_band() {
        let params = LinkParams::default();
        let sched = schedule(&[1000, 3000]);

        // A = 40, E = 15, t = 1: k1 = 30 → 4700 (out), k1 = 10 → 3900 (in)
        let result = compute_frequency(&sched, &params, 1, 40.0, 1.0, 15.0);
        assert!(result.is_valid);
        assert!(result.retried());
        assert_eq!(result.attempt, 1);
        assert_eq!(result.attempts, 2);
        assert_eq!(result.coefficient_index, 0);
        assert_eq!(result.k1, 10);
        assert_relative_eq!(result.frequency_mhz, 3900.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exhaustion_falls_back() {
        let params = LinkParams::default();
        let sched = schedule(&[1000, 1500, 2000, 2500, 3000]);

        // 10 V over 2 ms: energy 200, 200 × 100 / 2 alone is 10000 MHz
        let result = compute_frequency(&sched, &params, 3, 10.0, 2.0, 200.0);
        assert!(!result.is_valid);
        assert_eq!(result.frequency_mhz, 2000.0);
        assert_eq!(result.k1, 10);
        assert_eq!(result.k2, 100);
        assert_eq!(result.k1_k2_product, 1000);
        assert_eq!(result.attempts, 5);
        assert_eq!(result.coefficient_index, 3);
        assert!(result.formula.starts_with("FALLBACK"));
    }

    #[test]
    fn test_oversized_fallback_does_not_overflow() {
        let params = LinkParams {
            fallback_k1: 100_000,
            fallback_k2: 100_000,
            ..Default::default()
        };
        let sched = schedule(&[1000, 3000]);

        let result = compute_frequency(&sched, &params, 0, 10.0, 2.0, 200.0);
        assert!(!result.is_valid);
        assert_eq!(result.k1_k2_product, u32::MAX);
    }

    #[test]
    fn test_below_band_is_retried_too() {
        let params = LinkParams::default();
        let sched = schedule(&[1000, 2000]);

        // Negative energy drives every entry below f0
        let result = compute_frequency(&sched, &params, 0, 3.0, 2.0, -50.0);
        assert!(!result.is_valid);
        assert_eq!(result.attempts, 2);
    }

    #[test]
    fn test_valid_results_stay_in_band() {
        let params = LinkParams::default();
        let sched = CoefficientSchedule::from_key(99, &params).unwrap();

        for i in 0..200 {
            let amplitude = 0.5 + i as f64 * 0.05;
            let energy = SignalParameters::energy_of(amplitude, 2.0);
            let result = compute_frequency(&sched, &params, i, amplitude, 2.0, energy);
            if result.is_valid {
                assert!(result.frequency_mhz >= 2000.0);
                assert!(result.frequency_mhz <= 4000.0);
            }
            assert!(result.attempts <= sched.len());
        }
    }
}

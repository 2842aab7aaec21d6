//! Secure FHSS Algorithm
//!
//! The algorithm both ends of the link run. It is immutable once built:
//! the synchronization key, the link parameters and the coefficient schedule
//! derived from them. All per-hop state lives in a [`HopState`] owned by the
//! caller, so a sender and a receiver can share one algorithm while keeping
//! their own cursors.
//!
//! ## Example
//!
//! ```rust
//! use hoplink_core::{FhssAlgorithm, HopState, LinkParams};
//! use rand::SeedableRng;
//!
//! let algorithm = FhssAlgorithm::new(12345, LinkParams::default()).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(12345);
//! let mut state = HopState::new();
//!
//! let signal = algorithm.generate_signal_parameters(&mut rng);
//! let result = algorithm.calculate_frequency(&mut state, signal.amplitude_v, signal.time_ms, signal.energy);
//! assert!(result.is_valid);
//! algorithm.next_hop(&mut state);
//! ```

use rand::Rng;

use crate::calculator::{compute_frequency, FrequencyResult};
use crate::error::HopResult;
use crate::hop::{HopAdvance, HopState, SyncCheck};
use crate::params::LinkParams;
use crate::schedule::{CoefficientPair, CoefficientSchedule};
use crate::signal::SignalParameters;
use crate::validator::{validate_signal, ValidationResult};

/// Shared hop-selection algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct FhssAlgorithm {
    sync_key: u64,
    params: LinkParams,
    schedule: CoefficientSchedule,
}

impl FhssAlgorithm {
    /// Build the algorithm for a synchronization key.
    ///
    /// Both ends must use the same key and parameters to derive the same
    /// schedule.
    pub fn new(sync_key: u64, params: LinkParams) -> HopResult<Self> {
        let schedule = CoefficientSchedule::from_key(sync_key, &params)?;

        tracing::debug!(
            sync_key,
            band_min_mhz = params.band_min_mhz,
            band_max_mhz = params.band_max_mhz,
            hop_duration_ms = params.hop_duration_ms,
            schedule = ?schedule.products(),
            "hop algorithm initialized"
        );

        Ok(Self {
            sync_key,
            params,
            schedule,
        })
    }

    /// Algorithm with the default link parameters
    pub fn with_key(sync_key: u64) -> HopResult<Self> {
        Self::new(sync_key, LinkParams::default())
    }

    pub fn sync_key(&self) -> u64 {
        self.sync_key
    }

    pub fn params(&self) -> &LinkParams {
        &self.params
    }

    pub fn schedule(&self) -> &CoefficientSchedule {
        &self.schedule
    }

    /// The (k1, k2) pair for the state's current schedule position
    pub fn coefficients(&self, state: &HopState) -> CoefficientPair {
        self.schedule.pair(state.coefficient_index)
    }

    /// Compute the frequency for the current hop.
    ///
    /// If a retry settles on a later schedule entry, the state's cursor is
    /// moved there. On exhaustion the state is left exactly as it was.
    pub fn calculate_frequency(
        &self,
        state: &mut HopState,
        amplitude_v: f64,
        time_ms: f64,
        energy: f64,
    ) -> FrequencyResult {
        let result = compute_frequency(
            &self.schedule,
            &self.params,
            state.coefficient_index,
            amplitude_v,
            time_ms,
            energy,
        );
        if result.is_valid {
            state.coefficient_index = result.coefficient_index;
        }
        result
    }

    /// Frequency for a set of signal parameters
    pub fn frequency_for(&self, state: &mut HopState, signal: &SignalParameters) -> FrequencyResult {
        self.calculate_frequency(state, signal.amplitude_v, signal.time_ms, signal.energy)
    }

    /// Sender side: draw the parameters for the next transmission
    pub fn generate_signal_parameters<R: Rng + ?Sized>(&self, rng: &mut R) -> SignalParameters {
        SignalParameters::generate(&self.params, rng)
    }

    /// Receiver side: take the measured values as they are
    pub fn measure_signal_parameters(
        &self,
        amplitude_v: f64,
        energy: f64,
        time_ms: f64,
    ) -> SignalParameters {
        SignalParameters::measured(amplitude_v, energy, time_ms)
    }

    pub fn validate_signal(&self, amplitude_v: f64, time_ms: f64) -> ValidationResult {
        validate_signal(&self.params, amplitude_v, time_ms)
    }

    pub fn sync_check(&self, state: &HopState) -> SyncCheck {
        state.sync_check(&self.params)
    }

    /// Advance to the next hop
    pub fn next_hop(&self, state: &mut HopState) -> HopAdvance {
        state.advance(self.schedule.len());
        HopAdvance {
            hop_counter: state.hop_counter,
            coefficient_index: state.coefficient_index,
            next_product: self.schedule.product(state.coefficient_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn algorithm_with(products: &[u32]) -> FhssAlgorithm {
        FhssAlgorithm {
            sync_key: 0,
            params: LinkParams::default(),
            schedule: CoefficientSchedule::from_products(products.to_vec(), 100).unwrap(),
        }
    }

    #[test]
    fn test_same_key_same_algorithm() {
        let a = FhssAlgorithm::with_key(12345).unwrap();
        let b = FhssAlgorithm::with_key(12345).unwrap();
        assert_eq!(a.schedule(), b.schedule());
        assert_eq!(a.sync_key(), 12345);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = LinkParams {
            schedule_len: 0,
            ..Default::default()
        };
        assert!(FhssAlgorithm::new(1, params).is_err());
    }

    #[test]
    fn test_calculate_does_not_move_cursor_without_retry() {
        let algorithm = FhssAlgorithm::with_key(12345).unwrap();
        let mut state = HopState {
            hop_counter: 4,
            coefficient_index: 2,
        };
        let result = algorithm.calculate_frequency(&mut state, 3.0, 2.0, 18.0);
        assert!(result.is_valid);
        assert_eq!(result.coefficient_index, 2);
        assert_eq!(state.coefficient_index, 2);
        assert_eq!(state.hop_counter, 4);
    }

    #[test]
    fn test_retry_commits_cursor() {
        let algorithm = algorithm_with(&[1000, 3000]);
        let mut state = HopState {
            hop_counter: 0,
            coefficient_index: 1,
        };
        let result = algorithm.calculate_frequency(&mut state, 40.0, 1.0, 15.0);
        assert!(result.retried());
        assert_eq!(state.coefficient_index, 0);
    }

    #[test]
    fn test_exhaustion_restores_cursor() {
        let algorithm = FhssAlgorithm::with_key(12345).unwrap();
        for start in 0..5 {
            let mut state = HopState {
                hop_counter: 9,
                coefficient_index: start,
            };
            let before = state;
            let result = algorithm.calculate_frequency(&mut state, 10.0, 2.0, 200.0);
            assert!(!result.is_valid);
            assert_eq!(result.attempts, algorithm.schedule().len());
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_next_hop_reports_next_product() {
        let algorithm = algorithm_with(&[1000, 2000, 3000]);
        let mut state = HopState::new();

        let advance = algorithm.next_hop(&mut state);
        assert_eq!(advance.hop_counter, 1);
        assert_eq!(advance.coefficient_index, 1);
        assert_eq!(advance.next_product, 2000);

        algorithm.next_hop(&mut state);
        let advance = algorithm.next_hop(&mut state);
        assert_eq!(advance.coefficient_index, 0);
        assert_eq!(advance.next_product, 1000);
    }

    #[test]
    fn test_coefficients_follow_state() {
        let algorithm = algorithm_with(&[1234, 2345]);
        let state = HopState {
            hop_counter: 0,
            coefficient_index: 1,
        };
        let pair = algorithm.coefficients(&state);
        assert_eq!(pair.k1, 23);
        assert_eq!(pair.k2, 100);
    }
}

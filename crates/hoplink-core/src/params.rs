//! Link Parameters
//!
//! Every constant the sender and receiver must agree on besides the
//! synchronization key. Both sides of a link are expected to be built from
//! identical parameters; the defaults describe an S-band link hopping
//! every 2 ms across 2000-4000 MHz.
//!
//! ```text
//!   f0 / band_min                                  band_max
//!   2000 MHz ──────────────────────────────────────── 4000 MHz
//!            f = f0 + (A × k1 + E × k2) / t
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{HopError, HopResult};

/// Shared link parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkParams {
    /// Base frequency of the formula in MHz
    pub f0_mhz: f64,
    /// Lower edge of the operating band in MHz
    pub band_min_mhz: f64,
    /// Upper edge of the operating band in MHz
    pub band_max_mhz: f64,
    /// Hop duration in milliseconds
    pub hop_duration_ms: f64,
    /// Nominal transmit amplitude in volts
    pub nominal_amplitude_v: f64,
    /// Accepted amplitude deviation at the receiver (volts)
    pub amplitude_tolerance_v: f64,
    /// Accepted hop duration deviation at the receiver (ms)
    pub time_tolerance_ms: f64,
    /// Half-width of the amplitude jitter the sender applies (volts)
    pub generation_jitter_v: f64,
    /// Fixed k2 coefficient; k1 is derived as product / k2
    pub k2: u32,
    /// Number of products in the coefficient schedule
    pub schedule_len: usize,
    /// Smallest product the schedule may draw (inclusive)
    pub coefficient_min: u32,
    /// Largest product the schedule may draw (inclusive)
    pub coefficient_max: u32,
    /// k1 reported when every pair leaves the band
    pub fallback_k1: u32,
    /// k2 reported when every pair leaves the band
    pub fallback_k2: u32,
    /// Number of hops between synchronization checks
    pub sync_period: u64,
    /// Reference frequency carried by a sync check (MHz)
    pub sync_reference_mhz: f64,
    /// Test burst duration carried by a sync check (ms)
    pub sync_test_duration_ms: f64,
    /// Maximum sender/receiver frequency difference counted as a match (MHz)
    pub match_tolerance_mhz: f64,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            f0_mhz: 2000.0,
            band_min_mhz: 2000.0,
            band_max_mhz: 4000.0,
            hop_duration_ms: 2.0,
            nominal_amplitude_v: 3.0,
            amplitude_tolerance_v: 0.3,
            time_tolerance_ms: 0.1,
            generation_jitter_v: 0.15,
            k2: 100,
            schedule_len: 5,
            coefficient_min: 1000,
            coefficient_max: 3000,
            fallback_k1: 10,
            fallback_k2: 100,
            sync_period: 100,
            sync_reference_mhz: 2750.0,
            sync_test_duration_ms: 5.0,
            match_tolerance_mhz: 40.0,
        }
    }
}

impl LinkParams {
    /// Width of the operating band in MHz
    pub fn bandwidth_mhz(&self) -> f64 {
        self.band_max_mhz - self.band_min_mhz
    }

    /// Whether a frequency lies inside the band (edges included)
    pub fn in_band(&self, frequency_mhz: f64) -> bool {
        self.band_min_mhz <= frequency_mhz && frequency_mhz <= self.band_max_mhz
    }

    /// Clamp a frequency into the band
    pub fn clamp_to_band(&self, frequency_mhz: f64) -> f64 {
        if frequency_mhz < self.band_min_mhz {
            self.band_min_mhz
        } else if frequency_mhz > self.band_max_mhz {
            self.band_max_mhz
        } else {
            frequency_mhz
        }
    }

    /// Check the parameters for internal consistency
    pub fn validate(&self) -> HopResult<()> {
        let finite = [
            ("f0_mhz", self.f0_mhz),
            ("band_min_mhz", self.band_min_mhz),
            ("band_max_mhz", self.band_max_mhz),
            ("hop_duration_ms", self.hop_duration_ms),
            ("nominal_amplitude_v", self.nominal_amplitude_v),
            ("amplitude_tolerance_v", self.amplitude_tolerance_v),
            ("time_tolerance_ms", self.time_tolerance_ms),
            ("generation_jitter_v", self.generation_jitter_v),
            ("sync_reference_mhz", self.sync_reference_mhz),
            ("sync_test_duration_ms", self.sync_test_duration_ms),
            ("match_tolerance_mhz", self.match_tolerance_mhz),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(HopError::InvalidParams(format!("{name} must be finite")));
        }

        if self.band_min_mhz > self.band_max_mhz {
            return Err(HopError::InvalidParams(format!(
                "band is inverted: {} > {} MHz",
                self.band_min_mhz, self.band_max_mhz
            )));
        }
        if self.hop_duration_ms <= 0.0 {
            return Err(HopError::InvalidParams(format!(
                "hop duration must be positive, got {} ms",
                self.hop_duration_ms
            )));
        }
        if self.amplitude_tolerance_v < 0.0
            || self.time_tolerance_ms < 0.0
            || self.generation_jitter_v < 0.0
            || self.match_tolerance_mhz < 0.0
        {
            return Err(HopError::InvalidParams(
                "tolerances and jitter must be non-negative".to_string(),
            ));
        }
        if !(2.0 * self.generation_jitter_v).is_finite() {
            return Err(HopError::InvalidParams(format!(
                "generation jitter too wide to sample: {} V",
                self.generation_jitter_v
            )));
        }
        if self.k2 == 0 {
            return Err(HopError::InvalidParams("k2 must be non-zero".to_string()));
        }
        if self.schedule_len == 0 {
            return Err(HopError::InvalidParams(
                "coefficient schedule must not be empty".to_string(),
            ));
        }
        if self.coefficient_min > self.coefficient_max {
            return Err(HopError::InvalidParams(format!(
                "coefficient range is inverted: {} > {}",
                self.coefficient_min, self.coefficient_max
            )));
        }
        if self.fallback_k1.checked_mul(self.fallback_k2).is_none() {
            return Err(HopError::InvalidParams(format!(
                "fallback product overflows: {} × {}",
                self.fallback_k1, self.fallback_k2
            )));
        }
        if self.sync_period == 0 {
            return Err(HopError::InvalidParams(
                "sync period must be at least one hop".to_string(),
            ));
        }
        Ok(())
    }
}

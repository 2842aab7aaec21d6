//! Signal Parameters
//!
//! The physical-layer quantities that drive the frequency formula. The sender
//! produces them; the receiver measures them from what arrives.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::params::LinkParams;

/// Where a set of signal parameters came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalOrigin {
    /// Produced by the sender
    Generated,
    /// Measured by the receiver
    Measured,
}

/// Amplitude, duration and energy of one hop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalParameters {
    /// Amplitude in volts
    pub amplitude_v: f64,
    /// Duration in milliseconds
    pub time_ms: f64,
    /// Energy, A² × t for generated signals
    pub energy: f64,
    pub origin: SignalOrigin,
}

impl SignalParameters {
    /// Energy of a pulse with the given amplitude and duration
    pub fn energy_of(amplitude_v: f64, time_ms: f64) -> f64 {
        amplitude_v * amplitude_v * time_ms
    }

    /// Sender side: nominal amplitude plus uniform jitter, fixed hop duration.
    pub fn generate<R: Rng + ?Sized>(params: &LinkParams, rng: &mut R) -> Self {
        let jitter = params.generation_jitter_v;
        let offset = if jitter > 0.0 {
            Uniform::new_inclusive(-jitter, jitter).sample(rng)
        } else {
            0.0
        };
        let amplitude_v = params.nominal_amplitude_v + offset;
        let time_ms = params.hop_duration_ms;

        Self {
            amplitude_v,
            time_ms,
            energy: Self::energy_of(amplitude_v, time_ms),
            origin: SignalOrigin::Generated,
        }
    }

    /// Receiver side: record what was measured, unchanged
    pub fn measured(amplitude_v: f64, energy: f64, time_ms: f64) -> Self {
        Self {
            amplitude_v,
            time_ms,
            energy,
            origin: SignalOrigin::Measured,
        }
    }
}

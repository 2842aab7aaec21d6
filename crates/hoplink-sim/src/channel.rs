//! Synthetic Channel
//!
//! Models what happens to a hop's parameters between the sender and the
//! receiver's measurement. Only two impairments are modelled:
//!
//! 1. **Gain noise**: amplitude and energy are scaled by the same factor
//!    `1 + U(-noise_level, +noise_level)`
//! 2. **Timing jitter**: an independent `U(-time_jitter_ms, +time_jitter_ms)`
//!    is added to the hop duration
//!
//! The default noise level of 0.0099 (0.99 %) corresponds to an SNR of
//! roughly 20 dB for a LEO uplink.
//!
//! ## Usage
//!
//! ```rust
//! use hoplink_core::SignalParameters;
//! use hoplink_sim::channel::{Channel, ChannelConfig};
//! use rand::SeedableRng;
//!
//! let channel = Channel::new(ChannelConfig::default()).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let sent = SignalParameters::measured(3.0, 18.0, 2.0);
//! let received = channel.apply(&sent, &mut rng);
//! assert!((received.amplitude_v - 3.0).abs() <= 3.0 * 0.0099);
//! ```

use hoplink_core::{HopError, HopResult, SignalParameters};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Relative gain noise half-width (0.0099 = ±0.99 %)
    pub noise_level: f64,
    /// Additive timing jitter half-width in ms
    pub time_jitter_ms: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            noise_level: 0.0099,
            time_jitter_ms: 0.05,
        }
    }
}

impl ChannelConfig {
    /// A channel that delivers the sender's values untouched
    pub fn ideal() -> Self {
        Self {
            noise_level: 0.0,
            time_jitter_ms: 0.0,
        }
    }

    /// Default timing jitter with the given gain noise
    pub fn with_noise(noise_level: f64) -> Self {
        Self {
            noise_level,
            ..Default::default()
        }
    }

    /// Noise level as a percentage
    pub fn noise_percentage(&self) -> f64 {
        self.noise_level * 100.0
    }

    /// SNR implied by the noise level, `None` for a noiseless channel
    pub fn estimated_snr_db(&self) -> Option<f64> {
        (self.noise_level > 0.0).then(|| 10.0 * (1.0 / self.noise_level).log10())
    }

    pub fn validate(&self) -> HopResult<()> {
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(HopError::InvalidConfig(format!(
                "noise level must be finite and non-negative, got {}",
                self.noise_level
            )));
        }
        if self.noise_level >= 1.0 {
            return Err(HopError::InvalidConfig(format!(
                "noise level must be below 1.0 (100 %), got {}",
                self.noise_level
            )));
        }
        if !self.time_jitter_ms.is_finite()
            || self.time_jitter_ms < 0.0
            || !(2.0 * self.time_jitter_ms).is_finite()
        {
            return Err(HopError::InvalidConfig(format!(
                "time jitter must be finite and non-negative, got {} ms",
                self.time_jitter_ms
            )));
        }
        Ok(())
    }
}

/// Channel simulator
#[derive(Debug, Clone)]
pub struct Channel {
    config: ChannelConfig,
    gain: Option<Uniform<f64>>,
    jitter: Option<Uniform<f64>>,
}

impl Channel {
    /// Create a new channel with the given configuration
    pub fn new(config: ChannelConfig) -> HopResult<Self> {
        config.validate()?;
        let symmetric = |half_width: f64| {
            (half_width > 0.0).then(|| Uniform::new_inclusive(-half_width, half_width))
        };

        Ok(Self {
            config,
            gain: symmetric(config.noise_level),
            jitter: symmetric(config.time_jitter_ms),
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Pass one hop through the channel.
    ///
    /// The gain factor is drawn before the timing jitter, so the draw order
    /// from `rng` is fixed.
    pub fn apply<R: Rng + ?Sized>(&self, sent: &SignalParameters, rng: &mut R) -> SignalParameters {
        let factor = 1.0 + self.gain.as_ref().map_or(0.0, |d| d.sample(rng));
        let offset = self.jitter.as_ref().map_or(0.0, |d| d.sample(rng));

        SignalParameters {
            amplitude_v: sent.amplitude_v * factor,
            time_ms: sent.time_ms + offset,
            energy: sent.energy * factor,
            origin: sent.origin,
        }
    }
}

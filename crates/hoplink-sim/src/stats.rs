//! Link Statistics
//!
//! Aggregates computed once over a finished sender run and its receiver
//! replay.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelConfig;
use crate::simulator::{HopRecord, ReceptionRecord};

/// Noise figure quoted for the reference LEO uplink, in percent.
///
/// Reported as `noise_percentage` whatever noise level the channel actually
/// used; the injected level is reported separately.
pub const REFERENCE_NOISE_PERCENTAGE: f64 = 0.99;

/// SNR in dB for a relative noise level given in percent
pub fn snr_db_from_percentage(noise_percentage: f64) -> f64 {
    10.0 * (1.0 / (noise_percentage / 100.0)).log10()
}

/// Sender-side aggregates over valid hops
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderStatistics {
    pub total_hops: usize,
    pub valid_hops: usize,
    pub avg_frequency_mhz: f64,
    pub min_frequency_mhz: f64,
    pub max_frequency_mhz: f64,
    pub frequency_range_mhz: f64,
}

impl SenderStatistics {
    pub fn compute(records: &[HopRecord]) -> Self {
        let frequencies: Vec<f64> = records
            .iter()
            .filter(|r| r.frequency.is_valid)
            .map(|r| r.frequency.frequency_mhz)
            .collect();

        let mut stats = Self {
            total_hops: records.len(),
            valid_hops: frequencies.len(),
            ..Default::default()
        };
        if frequencies.is_empty() {
            return stats;
        }

        let min = frequencies.iter().copied().fold(f64::INFINITY, f64::min);
        let max = frequencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        stats.avg_frequency_mhz = frequencies.iter().sum::<f64>() / frequencies.len() as f64;
        stats.min_frequency_mhz = min;
        stats.max_frequency_mhz = max;
        stats.frequency_range_mhz = max - min;
        stats
    }
}

/// Receiver-side aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverStatistics {
    pub total_receptions: usize,
    pub valid_receptions: usize,
    pub successful_matches: usize,
    /// successful matches / total receptions × 100
    pub success_rate: f64,
    /// valid receptions / total receptions × 100
    pub validation_rate: f64,
    /// Reference figure, see [`REFERENCE_NOISE_PERCENTAGE`]
    pub noise_percentage: f64,
    pub estimated_snr_db: f64,
    /// Noise level the channel actually applied, in percent
    pub injected_noise_percentage: f64,
    /// SNR implied by the injected level, `None` for a noiseless channel
    pub injected_snr_db: Option<f64>,
}

/// Percentage of `part` in `total`, 0 when `total` is 0
fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl ReceiverStatistics {
    pub fn compute(records: &[ReceptionRecord], channel: &ChannelConfig) -> Self {
        let valid_receptions = records.iter().filter(|r| r.validation.is_valid).count();
        let successful_matches = records
            .iter()
            .filter(|r| r.validation.is_valid && r.is_match)
            .count();

        Self {
            total_receptions: records.len(),
            valid_receptions,
            successful_matches,
            success_rate: rate(successful_matches, records.len()),
            validation_rate: rate(valid_receptions, records.len()),
            noise_percentage: REFERENCE_NOISE_PERCENTAGE,
            estimated_snr_db: snr_db_from_percentage(REFERENCE_NOISE_PERCENTAGE),
            injected_noise_percentage: channel.noise_percentage(),
            injected_snr_db: channel.estimated_snr_db(),
        }
    }
}

/// Statistics for both ends of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub sender: SenderStatistics,
    pub receiver: ReceiverStatistics,
}

impl Statistics {
    pub fn compute(
        sender: &[HopRecord],
        receiver: &[ReceptionRecord],
        channel: &ChannelConfig,
    ) -> Self {
        Self {
            sender: SenderStatistics::compute(sender),
            receiver: ReceiverStatistics::compute(receiver, channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::simulator::Simulation;
    use approx::assert_relative_eq;
    use hoplink_core::LinkParams;

    fn run(hops: usize, channel: ChannelConfig) -> (Vec<HopRecord>, Vec<ReceptionRecord>) {
        let mut sim = Simulation::new(12345, LinkParams::default()).unwrap();
        let channel = Channel::new(channel).unwrap();
        let sender = sim.run_sender(hops);
        let receiver = sim.run_receiver(&sender, &channel);
        (sender, receiver)
    }

    #[test]
    fn test_empty_runs() {
        let stats = Statistics::compute(&[], &[], &ChannelConfig::default());

        assert_eq!(stats.sender.total_hops, 0);
        assert_eq!(stats.sender.avg_frequency_mhz, 0.0);
        assert_eq!(stats.sender.min_frequency_mhz, 0.0);
        assert_eq!(stats.sender.max_frequency_mhz, 0.0);
        assert_eq!(stats.sender.frequency_range_mhz, 0.0);

        assert_eq!(stats.receiver.total_receptions, 0);
        assert_eq!(stats.receiver.success_rate, 0.0);
        assert_eq!(stats.receiver.validation_rate, 0.0);
    }

    #[test]
    fn test_sender_aggregates() {
        let (sender, _) = run(12, ChannelConfig::ideal());
        let stats = SenderStatistics::compute(&sender);

        let freqs: Vec<f64> = sender.iter().map(|r| r.frequency.frequency_mhz).collect();
        let min = freqs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = freqs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(stats.total_hops, 12);
        assert_eq!(stats.valid_hops, 12);
        assert_eq!(stats.min_frequency_mhz, min);
        assert_eq!(stats.max_frequency_mhz, max);
        assert_relative_eq!(stats.frequency_range_mhz, max - min);
        assert_relative_eq!(
            stats.avg_frequency_mhz,
            freqs.iter().sum::<f64>() / 12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_success_rate() {
        let (_, mut receiver) = run(8, ChannelConfig::ideal());

        // Knock out three hops
        for record in receiver.iter_mut().take(3) {
            record.is_match = false;
        }
        let stats = ReceiverStatistics::compute(&receiver, &ChannelConfig::ideal());

        assert_eq!(stats.total_receptions, 8);
        assert_eq!(stats.valid_receptions, 8);
        assert_eq!(stats.successful_matches, 5);
        assert_eq!(stats.success_rate, 5.0 / 8.0 * 100.0);
        assert_eq!(stats.validation_rate, 100.0);
    }

    #[test]
    fn test_noise_figures() {
        let (_, receiver) = run(3, ChannelConfig::with_noise(0.05));
        let stats = ReceiverStatistics::compute(&receiver, &ChannelConfig::with_noise(0.05));

        // Reference figure is fixed; the injected one follows the channel
        assert_eq!(stats.noise_percentage, 0.99);
        assert_relative_eq!(stats.estimated_snr_db, 20.0436, epsilon = 1e-4);
        assert_relative_eq!(stats.injected_noise_percentage, 5.0, epsilon = 1e-12);
        assert_relative_eq!(stats.injected_snr_db.unwrap(), 13.0103, epsilon = 1e-4);

        let quiet = ReceiverStatistics::compute(&receiver, &ChannelConfig::ideal());
        assert!(quiet.injected_snr_db.is_none());
    }
}

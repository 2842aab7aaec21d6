//! Simulation Report
//!
//! Output formats: JSON (exported to disk) and text (console summary).

use std::path::{Path, PathBuf};

use chrono::Utc;
use hoplink_core::{FhssAlgorithm, HopError, HopResult};
use serde::Serialize;

use crate::channel::ChannelConfig;
use crate::simulator::{HopRecord, ReceptionRecord, SimulationRun};
use crate::stats::Statistics;

/// Name recorded in exported reports
pub const SYSTEM_NAME: &str = "Frequency-Hopping Physical-Layer Secure Communication System";

/// Link parameters as recorded in a report
#[derive(Debug, Clone, Serialize)]
pub struct ReportParameters {
    pub f0_mhz: f64,
    pub t_hop_ms: f64,
    pub band_range_mhz: [f64; 2],
    pub amplitude_nominal_v: f64,
    pub amplitude_tolerance_v: f64,
    pub time_tolerance_ms: f64,
    pub k1_k2_list: Vec<u32>,
    pub noise_level: f64,
    pub estimated_snr_db: Option<f64>,
    pub freq_tolerance_mhz: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmInfo {
    pub name: String,
    pub sync_key: u64,
    pub parameters: ReportParameters,
}

/// Complete simulation report
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub algorithm_info: AlgorithmInfo,
    pub sender_results: Vec<HopRecord>,
    pub receiver_results: Vec<ReceptionRecord>,
    pub statistics: Statistics,
    pub timestamp: String,
}

impl SimulationReport {
    /// Create a new report from a finished run
    pub fn new(algorithm: &FhssAlgorithm, channel: &ChannelConfig, run: SimulationRun) -> Self {
        let params = algorithm.params();

        Self {
            algorithm_info: AlgorithmInfo {
                name: SYSTEM_NAME.to_string(),
                sync_key: algorithm.sync_key(),
                parameters: ReportParameters {
                    f0_mhz: params.f0_mhz,
                    t_hop_ms: params.hop_duration_ms,
                    band_range_mhz: [params.band_min_mhz, params.band_max_mhz],
                    amplitude_nominal_v: params.nominal_amplitude_v,
                    amplitude_tolerance_v: params.amplitude_tolerance_v,
                    time_tolerance_ms: params.time_tolerance_ms,
                    k1_k2_list: algorithm.schedule().products().to_vec(),
                    noise_level: channel.noise_level,
                    estimated_snr_db: channel.estimated_snr_db(),
                    freq_tolerance_mhz: params.match_tolerance_mhz,
                },
            },
            sender_results: run.sender,
            receiver_results: run.receiver,
            statistics: run.statistics,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Default export file name for the current time
    pub fn default_file_name() -> String {
        format!("fhss_simulation_{}.json", Utc::now().format("%Y%m%d_%H%M%S"))
    }

    /// Output as JSON
    pub fn to_json(&self) -> HopResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| HopError::Serialization(e.to_string()))
    }

    /// Write the JSON report to `path`, or to [`Self::default_file_name`].
    ///
    /// Returns the path written.
    pub fn export(&self, path: Option<&Path>) -> HopResult<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(Self::default_file_name()));

        let json = self.to_json()?;
        std::fs::write(&path, json).map_err(|e| HopError::io(&path, e))?;

        tracing::info!("Results saved: {}", path.display());
        Ok(path)
    }

    /// Output as human-readable text
    pub fn to_text(&self) -> String {
        let sender = &self.statistics.sender;
        let receiver = &self.statistics.receiver;
        let mut s = String::new();

        s.push_str("Simulation Statistics\n");
        s.push_str("=====================\n\n");

        s.push_str(&format!("Sync key:      {}\n", self.algorithm_info.sync_key));
        s.push_str(&format!(
            "k1×k2 list:    {:?}\n\n",
            self.algorithm_info.parameters.k1_k2_list
        ));

        s.push_str("Sender\n");
        s.push_str("------\n");
        s.push_str(&format!("  Total hops:       {:>10}\n", sender.total_hops));
        s.push_str(&format!("  Valid hops:       {:>10}\n", sender.valid_hops));
        s.push_str(&format!("  Avg frequency:    {:>10.1} MHz\n", sender.avg_frequency_mhz));
        s.push_str(&format!("  Frequency range:  {:>10.1} MHz\n\n", sender.frequency_range_mhz));

        s.push_str("Receiver\n");
        s.push_str("--------\n");
        s.push_str(&format!("  Total receptions: {:>10}\n", receiver.total_receptions));
        s.push_str(&format!("  Valid receptions: {:>10}\n", receiver.valid_receptions));
        s.push_str(&format!("  Matches:          {:>10}\n", receiver.successful_matches));
        s.push_str(&format!("  Success rate:     {:>10.1} %\n", receiver.success_rate));
        s.push_str(&format!("  Noise:            {:>10.2} %\n", receiver.noise_percentage));
        s.push_str(&format!("  Estimated SNR:    {:>10.1} dB\n", receiver.estimated_snr_db));
        s.push_str(&format!(
            "  Injected noise:   {:>10.2} %\n",
            receiver.injected_noise_percentage
        ));

        s
    }
}

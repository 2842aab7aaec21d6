//! Simulation configuration
//!
//! Everything a run needs, loadable from a JSON file. Missing fields take
//! their defaults, so a file only has to name what it changes:
//!
//! ```json
//! { "hop_count": 250, "channel": { "noise_level": 0.02 } }
//! ```

use std::path::{Path, PathBuf};

use hoplink_core::observe::LogConfig;
use hoplink_core::{HopError, HopResult, LinkParams};
use serde::{Deserialize, Serialize};

use crate::channel::ChannelConfig;

/// Configuration for one sender + receiver run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Shared synchronization key, also seeds the simulation generator
    pub sync_key: u64,
    /// Number of sender hops
    pub hop_count: usize,
    pub link: LinkParams,
    pub channel: ChannelConfig,
    /// Write the JSON report after the run
    pub export: bool,
    /// Report path; a timestamped name in the working directory if absent
    pub output: Option<PathBuf>,
    pub log: LogConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sync_key: 12345,
            hop_count: 15,
            link: LinkParams::default(),
            channel: ChannelConfig::default(),
            export: true,
            output: None,
            log: LogConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> HopResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| HopError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| HopError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HopResult<()> {
        self.link.validate()?;
        self.channel.validate()
    }
}

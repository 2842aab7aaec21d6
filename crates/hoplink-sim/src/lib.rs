//! # Hop Link Simulation
//!
//! Runs the shared FHSS algorithm from `hoplink-core` on both ends of a
//! simulated link:
//!
//! - **Channel**: synthetic gain noise and timing jitter
//! - **Simulator**: sender run, receiver replay, per-hop records
//! - **Statistics**: frequency spread, validation and match rates
//! - **Report**: JSON export and a text summary
//! - **Config**: JSON configuration file with defaults for every field
//!
//! ## Example
//!
//! ```rust
//! use hoplink_core::LinkParams;
//! use hoplink_sim::channel::{Channel, ChannelConfig};
//! use hoplink_sim::simulator::Simulation;
//!
//! let mut sim = Simulation::new(12345, LinkParams::default()).unwrap();
//! let channel = Channel::new(ChannelConfig::default()).unwrap();
//! let run = sim.run(15, &channel);
//!
//! assert_eq!(run.statistics.sender.total_hops, 15);
//! assert_eq!(run.statistics.receiver.total_receptions, 15);
//! ```

pub mod channel;
pub mod config;
pub mod report;
pub mod simulator;
pub mod stats;

pub use channel::{Channel, ChannelConfig};
pub use config::SimulationConfig;
pub use report::SimulationReport;
pub use simulator::{
    receive_hop, run_receiver, run_sender, HopRecord, ReceptionRecord, Simulation, SimulationRun,
};
pub use stats::{ReceiverStatistics, SenderStatistics, Statistics};

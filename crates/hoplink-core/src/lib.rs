//! # Hop Link Core
//!
//! The algorithm shared by both ends of a secure frequency-hopping link.
//! Sender and receiver are never told the hop sequence: each derives the
//! same coefficient schedule from a shared synchronization key and computes
//! every hop frequency from the physical parameters of the signal itself.
//!
//! ## Overview
//!
//! - **Coefficient schedule**: five products drawn from the sync key, sorted
//! - **Frequency calculator**: `f = f0 + (A × k1 + E × k2) / t`, band-limited,
//!   with bounded retry across the schedule
//! - **Signal parameters**: generated on the sender, measured on the receiver
//! - **Validator**: tolerance windows on amplitude and hop duration
//! - **Hop state**: hop counter and schedule cursor, plus periodic sync checks
//!
//! ## Signal Flow
//!
//! ```text
//! TX: generate (A, t, E) → schedule[k] → f → transmit → next_hop
//! RX: measure (A, t, E) → validate → schedule[k] → f → compare with TX → next_hop
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hoplink_core::{FhssAlgorithm, HopState};
//!
//! let algorithm = FhssAlgorithm::with_key(12345).unwrap();
//! let mut tx = HopState::new();
//! let mut rx = HopState::new();
//!
//! let sent = algorithm.calculate_frequency(&mut tx, 3.0, 2.0, 18.0);
//! let received = algorithm.calculate_frequency(&mut rx, 3.0, 2.0, 18.0);
//! assert_eq!(sent.frequency_mhz, received.frequency_mhz);
//! ```

pub mod algorithm;
pub mod calculator;
pub mod error;
pub mod hop;
pub mod observe;
pub mod params;
pub mod schedule;
pub mod signal;
pub mod validator;

pub use algorithm::FhssAlgorithm;
pub use calculator::{compute_frequency, FrequencyResult};
pub use error::{HopError, HopResult};
pub use hop::{index_at, HopAdvance, HopState, SyncCheck, SyncReference};
pub use params::LinkParams;
pub use schedule::{CoefficientPair, CoefficientSchedule};
pub use signal::{SignalOrigin, SignalParameters};
pub use validator::{validate_signal, RejectReason, ValidationResult};

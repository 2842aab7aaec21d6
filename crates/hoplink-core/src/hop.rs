//! Hop State Machine
//!
//! The only state a link carries between hops is a hop counter and the
//! current schedule position. Both advance by one per hop; nothing resets
//! them automatically. A receiver replaying a sender's run resets to (0, 0)
//! first so both walk the schedule in lock-step.

use serde::{Deserialize, Serialize};

use crate::params::LinkParams;

/// Hop counter and schedule cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopState {
    /// Hops completed so far
    pub hop_counter: u64,
    /// Current schedule position, always below the schedule length
    pub coefficient_index: usize,
}

/// State after a hop advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopAdvance {
    pub hop_counter: u64,
    pub coefficient_index: usize,
    /// Schedule product the next hop will start from
    pub next_product: u32,
}

/// Diagnostic payload carried when a sync point is reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReference {
    pub reference_mhz: f64,
    pub test_amplitude_v: f64,
    pub test_duration_ms: f64,
    pub message: String,
}

/// Whether the link is at a re-synchronization point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncCheck {
    pub sync_needed: bool,
    pub hop_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<SyncReference>,
}

impl HopState {
    /// Fresh state at hop 0, schedule position 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next hop
    pub fn advance(&mut self, schedule_len: usize) {
        self.hop_counter += 1;
        self.coefficient_index = (self.coefficient_index + 1) % schedule_len.max(1);
    }

    /// Return to hop 0, schedule position 0
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Flag the hops on which a synchronization exchange would be due.
    ///
    /// Nothing is exchanged; the check only reports the moment and the
    /// reference burst the protocol would use.
    pub fn sync_check(&self, params: &LinkParams) -> SyncCheck {
        let period = params.sync_period.max(1);
        let due = self.hop_counter > 0 && self.hop_counter % period == 0;

        SyncCheck {
            sync_needed: due,
            hop_count: self.hop_counter,
            reference: due.then(|| SyncReference {
                reference_mhz: params.sync_reference_mhz,
                test_amplitude_v: params.nominal_amplitude_v,
                test_duration_ms: params.sync_test_duration_ms,
                message: format!("Sync check #{}", self.hop_counter / period),
            }),
        }
    }
}

/// Schedule position of hop `hop_number` when starting from `start_index`
/// with no retries in between.
pub fn index_at(start_index: usize, hop_number: u64, schedule_len: usize) -> usize {
    let len = schedule_len.max(1) as u64;
    ((start_index as u64 % len + hop_number % len) % len) as usize
}

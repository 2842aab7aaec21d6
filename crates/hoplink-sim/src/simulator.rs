//! Sender/Receiver Link Simulator
//!
//! Runs the shared hop algorithm on both ends of a link and checks that the
//! receiver lands on the sender's frequency without ever being told it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Simulation                              │
//! │                                                                  │
//! │  sender:   generate ──► frequency ──► sync check ──► next_hop    │
//! │               │                                                  │
//! │               ▼                                                  │
//! │           HopRecord ──► Channel (gain noise, time jitter)        │
//! │                               │                                  │
//! │  receiver:  reset ──► measure ──► validate ──► frequency ──►     │
//! │                                      │        compare (< 40 MHz) │
//! │                                      └─ reject (Δf = ∞)          │
//! │                                   ──► sync check ──► next_hop    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The driver functions take the algorithm, the hop state and the random
//! generator explicitly. [`Simulation`] bundles the three for the common
//! case of one run with one generator seeded from the sync key.

use chrono::Utc;
use hoplink_core::{
    FhssAlgorithm, FrequencyResult, HopResult, HopState, LinkParams, SignalParameters, SyncCheck,
    ValidationResult,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize, Serializer};

use crate::channel::Channel;
use crate::stats::Statistics;

/// One transmitted hop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopRecord {
    /// 1-based hop number
    pub hop_number: u64,
    pub timestamp: String,
    /// Schedule position at the start of the hop
    pub coefficient_index: usize,
    pub signal: SignalParameters,
    pub frequency: FrequencyResult,
    pub sync: SyncCheck,
}

/// One received hop, paired with the transmission it replays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceptionRecord {
    /// 1-based hop number
    pub hop_number: u64,
    pub timestamp: String,
    /// Schedule position at the start of the hop
    pub coefficient_index: usize,
    pub original: HopRecord,
    pub measured: SignalParameters,
    pub validation: ValidationResult,
    /// Absent when the signal was rejected before computing a frequency.
    /// Exported as `{ "frequency_mhz": 0, "is_valid": false }` in that case.
    #[serde(serialize_with = "serialize_received_frequency")]
    pub frequency: Option<FrequencyResult>,
    /// |receiver - sender| in MHz, infinite for rejected hops
    pub frequency_difference_mhz: f64,
    pub is_match: bool,
    pub sync: SyncCheck,
}

impl ReceptionRecord {
    /// Recomputed frequency, 0 for rejected hops
    pub fn frequency_mhz(&self) -> f64 {
        self.frequency.as_ref().map_or(0.0, |f| f.frequency_mhz)
    }

    /// Whether a valid frequency was recomputed
    pub fn is_frequency_valid(&self) -> bool {
        self.frequency.as_ref().is_some_and(|f| f.is_valid)
    }
}

fn serialize_received_frequency<S: Serializer>(
    frequency: &Option<FrequencyResult>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Rejected {
        frequency_mhz: f64,
        is_valid: bool,
    }

    match frequency {
        Some(result) => result.serialize(serializer),
        None => Rejected {
            frequency_mhz: 0.0,
            is_valid: false,
        }
        .serialize(serializer),
    }
}

/// Run `hop_count` sender hops from the current state.
pub fn run_sender<R: Rng + ?Sized>(
    algorithm: &FhssAlgorithm,
    state: &mut HopState,
    rng: &mut R,
    hop_count: usize,
) -> Vec<HopRecord> {
    tracing::info!("Sender simulation - {} hops", hop_count);

    let mut records = Vec::with_capacity(hop_count);
    for i in 0..hop_count {
        let hop_number = i as u64 + 1;
        let coefficient_index = state.coefficient_index;

        let signal = algorithm.generate_signal_parameters(rng);
        let frequency = algorithm.frequency_for(state, &signal);
        let sync = algorithm.sync_check(state);

        tracing::info!(
            "Hop #{:02} {} | A:{:.2}V | E:{:.1} | f:{:.1}MHz | k1×k2:{}",
            hop_number,
            if frequency.is_valid { "VALID" } else { "INVALID" },
            signal.amplitude_v,
            signal.energy,
            frequency.frequency_mhz,
            frequency.k1_k2_product,
        );
        log_sync(&sync);

        records.push(HopRecord {
            hop_number,
            timestamp: Utc::now().to_rfc3339(),
            coefficient_index,
            signal,
            frequency,
            sync,
        });

        algorithm.next_hop(state);
    }

    records
}

/// Receive one hop whose parameters arrived as `received`.
///
/// Validates, recomputes the frequency if the signal is trusted, compares it
/// with the sender's, then checks sync and advances the state.
pub fn receive_hop(
    algorithm: &FhssAlgorithm,
    state: &mut HopState,
    sent: &HopRecord,
    received: &SignalParameters,
) -> ReceptionRecord {
    let coefficient_index = state.coefficient_index;
    let params = algorithm.params();

    let measured =
        algorithm.measure_signal_parameters(received.amplitude_v, received.energy, received.time_ms);
    let validation = algorithm.validate_signal(measured.amplitude_v, measured.time_ms);

    let (frequency, frequency_difference_mhz, is_match) = if validation.is_valid {
        let frequency = algorithm.frequency_for(state, &measured);
        let difference = (frequency.frequency_mhz - sent.frequency.frequency_mhz).abs();
        let is_match = difference < params.match_tolerance_mhz;

        tracing::info!(
            "Hop #{:02} {} | A:{:.2}V | t:{:.2}ms | f:{:.1}MHz | Δf:{:.1}MHz",
            sent.hop_number,
            if is_match { "ACCEPTED" } else { "REJECTED" },
            measured.amplitude_v,
            measured.time_ms,
            frequency.frequency_mhz,
            difference,
        );
        (Some(frequency), difference, is_match)
    } else {
        tracing::warn!(
            "Hop #{:02} REJECTED | A:{:.2}V | t:{:.2}ms | SIGNAL REJECTED ({})",
            sent.hop_number,
            measured.amplitude_v,
            measured.time_ms,
            validation
                .reject_reason()
                .map(|r| r.to_string())
                .unwrap_or_default(),
        );
        (None, f64::INFINITY, false)
    };

    let sync = algorithm.sync_check(state);
    log_sync(&sync);

    let record = ReceptionRecord {
        hop_number: sent.hop_number,
        timestamp: Utc::now().to_rfc3339(),
        coefficient_index,
        original: sent.clone(),
        measured,
        validation,
        frequency,
        frequency_difference_mhz,
        is_match,
        sync,
    };

    algorithm.next_hop(state);
    record
}

/// Replay a sender run on the receiver side.
///
/// Resets `state` to hop 0 first so the receiver walks the schedule in
/// lock-step with the sender. Each hop goes through `channel` before being
/// measured.
pub fn run_receiver<R: Rng + ?Sized>(
    algorithm: &FhssAlgorithm,
    state: &mut HopState,
    rng: &mut R,
    sender_records: &[HopRecord],
    channel: &Channel,
) -> Vec<ReceptionRecord> {
    tracing::info!(
        "Receiver simulation - {} hops, noise level {:.2}%",
        sender_records.len(),
        channel.config().noise_percentage()
    );

    state.reset();

    sender_records
        .iter()
        .map(|sent| {
            let received = channel.apply(&sent.signal, rng);
            receive_hop(algorithm, state, sent, &received)
        })
        .collect()
}

fn log_sync(sync: &SyncCheck) {
    if let Some(ref reference) = sync.reference {
        tracing::info!(
            reference_mhz = reference.reference_mhz,
            test_duration_ms = reference.test_duration_ms,
            "        {}",
            reference.message
        );
    }
}

/// Results of a full sender + receiver run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub sender: Vec<HopRecord>,
    pub receiver: Vec<ReceptionRecord>,
    pub statistics: Statistics,
}

/// One algorithm, one hop state and one generator, shared by both roles
#[derive(Debug, Clone)]
pub struct Simulation {
    algorithm: FhssAlgorithm,
    state: HopState,
    rng: StdRng,
}

impl Simulation {
    /// Build the algorithm for `sync_key` and seed the simulation generator
    /// with the same key.
    pub fn new(sync_key: u64, params: LinkParams) -> HopResult<Self> {
        let algorithm = FhssAlgorithm::new(sync_key, params)?;
        Ok(Self::from_algorithm(algorithm))
    }

    pub fn from_algorithm(algorithm: FhssAlgorithm) -> Self {
        let rng = StdRng::seed_from_u64(algorithm.sync_key());
        Self {
            algorithm,
            state: HopState::new(),
            rng,
        }
    }

    pub fn algorithm(&self) -> &FhssAlgorithm {
        &self.algorithm
    }

    pub fn state(&self) -> &HopState {
        &self.state
    }

    pub fn run_sender(&mut self, hop_count: usize) -> Vec<HopRecord> {
        run_sender(&self.algorithm, &mut self.state, &mut self.rng, hop_count)
    }

    pub fn run_receiver(&mut self, sender_records: &[HopRecord], channel: &Channel) -> Vec<ReceptionRecord> {
        run_receiver(
            &self.algorithm,
            &mut self.state,
            &mut self.rng,
            sender_records,
            channel,
        )
    }

    /// Sender run, receiver replay over `channel`, then statistics
    pub fn run(&mut self, hop_count: usize, channel: &Channel) -> SimulationRun {
        let sender = self.run_sender(hop_count);
        let receiver = self.run_receiver(&sender, channel);
        let statistics = Statistics::compute(&sender, &receiver, channel.config());

        SimulationRun {
            sender,
            receiver,
            statistics,
        }
    }
}

//! Secure FHSS link simulation
//!
//! Runs a sender, replays its hops on a receiver over a noisy channel,
//! prints the statistics and exports the full record as JSON.
//!
//! ```bash
//! hoplink-sim --hops 200 --noise-level 0.02 --output run.json
//! hoplink-sim --config link.json --log-format json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hoplink_core::observe::{init_logging, LogFormat, LogLevel};
use hoplink_core::HopResult;
use hoplink_sim::{Channel, Simulation, SimulationConfig, SimulationReport};

#[derive(Debug, Parser)]
#[command(name = "hoplink-sim", version, about = "Simulate a secure frequency-hopping link")]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shared synchronization key
    #[arg(short = 'k', long)]
    sync_key: Option<u64>,

    /// Number of sender hops
    #[arg(short = 'n', long)]
    hops: Option<usize>,

    /// Relative channel gain noise (0.0099 = ±0.99 %)
    #[arg(long)]
    noise_level: Option<f64>,

    /// Channel timing jitter half-width in ms
    #[arg(long)]
    time_jitter: Option<f64>,

    /// Report path (default: fhss_simulation_<timestamp>.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip writing the JSON report
    #[arg(long)]
    no_export: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Log format (compact, pretty, json)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn into_config(self) -> HopResult<SimulationConfig> {
        let mut config = match self.config {
            Some(ref path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(key) = self.sync_key {
            config.sync_key = key;
        }
        if let Some(hops) = self.hops {
            config.hop_count = hops;
        }
        if let Some(noise) = self.noise_level {
            config.channel.noise_level = noise;
        }
        if let Some(jitter) = self.time_jitter {
            config.channel.time_jitter_ms = jitter;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.no_export {
            config.export = false;
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(config: &SimulationConfig) -> HopResult<()> {
    let channel = Channel::new(config.channel)?;
    let mut sim = Simulation::new(config.sync_key, config.link.clone())?;

    let params = sim.algorithm().params();
    tracing::info!("Sync key: {}", config.sync_key);
    tracing::info!(
        "Band: {}-{} MHz | hop: {} ms ± {} ms | amplitude: {} V ± {} V",
        params.band_min_mhz,
        params.band_max_mhz,
        params.hop_duration_ms,
        params.time_tolerance_ms,
        params.nominal_amplitude_v,
        params.amplitude_tolerance_v,
    );
    tracing::info!("k1×k2 list: {:?}", sim.algorithm().schedule().products());

    let run = sim.run(config.hop_count, &channel);
    let report = SimulationReport::new(sim.algorithm(), channel.config(), run);

    println!("\n{}", report.to_text());

    if config.export {
        // Results are already computed and printed; a failed write is reported, not fatal
        match report.export(config.output.as_deref()) {
            Ok(path) => println!("Report written to {}", path.display()),
            Err(e) => tracing::error!("Failed to save results: {}", e),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hoplink-sim: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

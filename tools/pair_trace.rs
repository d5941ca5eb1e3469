// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Drive a pre/post neuron pair through one STDP connection and print the
//! weight after every pre-synaptic spike.
//!
//! Usage: `pair_trace [config.toml] [key=value ...] [--debug-<crate>]`
//!
//! `key=value` pairs are CLI config overrides (e.g. `steps=5000 mu=0`), plus
//! `pre_current=<f64>` / `post_current=<f64>` for the drive.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use spiketide::config::{load_config, validate_config};
use spiketide::observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingConfig};
use spiketide::pair::{run_pair, PairDrive};

fn main() -> Result<()> {
    let mut config_path: Option<PathBuf> = None;
    let mut overrides = HashMap::new();
    let mut drive = PairDrive::default();

    for arg in std::env::args().skip(1) {
        if arg == "--help" || arg == "-h" {
            println!("{}", debug_flags_help());
            return Ok(());
        }
        if arg.starts_with("--debug-") {
            continue;
        }
        match arg.split_once('=') {
            Some(("pre_current", value)) => {
                drive.pre_current = value.parse().context("pre_current")?;
            }
            Some(("post_current", value)) => {
                drive.post_current = value.parse().context("post_current")?;
            }
            Some((key, value)) => {
                overrides.insert(key.to_string(), value.to_string());
            }
            None if config_path.is_none() => config_path = Some(PathBuf::from(&arg)),
            None => bail!("unexpected argument: {}", arg),
        }
    }

    let config = load_config(config_path.as_deref(), Some(&overrides))
        .context("Failed to load configuration")?;
    validate_config(&config)?;

    let logging = LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.parse()?,
        ..Default::default()
    };
    let _guard = init_logging(&parse_debug_flags(), &logging)?;

    let trace = run_pair(&config, &drive)?;

    println!("t_ms\tweight");
    for (t, w) in &trace.weights {
        println!("{:.3}\t{:.6}", t, w);
    }
    println!(
        "# pre spikes: {}, post spikes: {}, final weight: {:.6}",
        trace.pre_spikes.len(),
        trace.post_spikes.len(),
        trace.final_weight
    );
    Ok(())
}

// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! # spiketide-observability
//!
//! Logging setup shared by the Spiketide binaries and tests, with per-crate
//! debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log file per run, with retention of recent runs

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Tracing targets of the Spiketide crates, usable with `--debug-<target>`
pub const KNOWN_CRATES: &[&str] = &[
    "spiketide-neural",
    "spiketide-plasticity",
    "spiketide-config",
];

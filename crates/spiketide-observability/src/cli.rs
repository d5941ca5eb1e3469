// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-spiketide-neural` or `--debug-all`.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates for which debug logging was requested
///
/// # Example
/// ```rust
/// use spiketide_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-spiketide-neural".to_string()]);
/// assert!(flags.is_enabled("spiketide-neural"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`; `--debug-all`
    /// enables every known crate. Other arguments are ignored.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }
        flags
    }

    pub fn enable(&mut self, crate_name: &str) {
        self.enabled_crates.insert(crate_name.to_string());
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level for a crate
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directives: `base_level` plus `<crate>=debug` per enabled crate.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        std::iter::once(base_level.to_string())
            .chain(
                self.enabled_crates
                    .iter()
                    .map(|crate_name| format!("{}=debug", crate_name)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse debug flags from the process arguments and `SPIKETIDE_DEBUG`
///
/// Environment variable format: comma-separated crate names, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var("SPIKETIDE_DEBUG") {
        apply_env_value(&mut flags, &env_var);
    }
    flags
}

fn apply_env_value(flags: &mut CrateDebugFlags, value: &str) {
    if value.trim() == "all" {
        flags.enable_all();
        return;
    }
    for crate_name in value.split(',').map(str::trim) {
        if !crate_name.is_empty() {
            flags.enable(crate_name);
        }
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  SPIKETIDE_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  SPIKETIDE_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec![
            "pair_trace".to_string(),
            "--debug-spiketide-neural".to_string(),
        ]);
        assert!(flags.is_enabled("spiketide-neural"));
        assert!(!flags.is_enabled("spiketide-plasticity"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_env_value_parsing() {
        let mut flags = CrateDebugFlags::default();
        apply_env_value(&mut flags, " spiketide-config , ,spiketide-plasticity");
        assert_eq!(flags.enabled_crates.len(), 2);
        assert!(flags.is_enabled("spiketide-config"));
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-spiketide-plasticity".to_string(),
            "--debug-spiketide-neural".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("warn"),
            "warn,spiketide-neural=debug,spiketide-plasticity=debug"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-spiketide-neural".to_string()]);
        assert_eq!(flags.log_level("spiketide-neural"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("spiketide-config"), tracing::Level::INFO);
    }
}

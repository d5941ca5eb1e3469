// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! One console layer in the configured format, filtered by the base level
//! plus per-crate debug flags. With the `file-logging` feature and a
//! [`FileLoggingConfig`](crate::FileLoggingConfig), every run also writes a
//! JSON log into a timestamped folder:
//!
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── spiketide.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps background log writers alive; logs are flushed on drop
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Folder of this run's log file, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the `EnvFilter` for a base level and the debug flags
pub fn build_filter(debug_flags: &CrateDebugFlags, level: &str) -> Result<EnvFilter> {
    let directives = debug_flags.to_filter_string(level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter directives: {}", directives))
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false);
    match format {
        LogFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
    }
}

/// Install the global subscriber
///
/// # Errors
/// Fails if the filter directives are invalid, the log directory cannot be
/// created, or a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut layers: Vec<BoxedLayer> = vec![console_layer(
        config.format,
        build_filter(debug_flags, &config.level)?,
    )];
    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut guard = LoggingGuard::default();

    #[cfg(feature = "file-logging")]
    {
        if let Some(file) = &config.file {
            let run_folder = file_logging::create_run_folder(&file.dir)?;
            file_logging::cleanup_old_runs(&file.dir, file.retention_runs)?;

            let appender = tracing_appender::rolling::never(&run_folder, "spiketide.log");
            let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_filter(build_filter(debug_flags, &config.level)?)
                    .boxed(),
            );
            guard._file_guards.push(file_guard);
            guard.log_dir = Some(run_folder);
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::debug!(
        format = %config.format,
        level = %config.level,
        debug = ?debug_flags.enabled_crates,
        "logging initialized"
    );
    Ok(guard)
}

#[cfg(feature = "file-logging")]
mod file_logging {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use chrono::{NaiveDateTime, Utc};

    const RUN_PREFIX: &str = "run_";
    const RUN_FORMAT: &str = "%Y%m%d_%H%M%S";

    pub(super) fn create_run_folder(base: &Path) -> Result<PathBuf> {
        let timestamp = Utc::now().format(RUN_FORMAT);
        let run_folder = base.join(format!("{}{}", RUN_PREFIX, timestamp));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
        Ok(run_folder)
    }

    /// Remove all but the `keep` most recent run folders
    pub(super) fn cleanup_old_runs(base: &Path, keep: usize) -> Result<()> {
        let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
        for entry in std::fs::read_dir(base)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let stamp = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix(RUN_PREFIX))
                .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, RUN_FORMAT).ok());
            if let Some(stamp) = stamp {
                runs.push((path, stamp));
            }
        }

        runs.sort_by_key(|(_, stamp)| *stamp);
        let excess = runs.len().saturating_sub(keep);
        for (path, _) in runs.iter().take(excess) {
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_rejected() {
        let flags = CrateDebugFlags::default();
        assert!(build_filter(&flags, "info").is_ok());
        assert!(build_filter(&flags, "spiketide-neural=loud").is_err());
    }

    #[test]
    fn test_second_init_fails_cleanly() {
        let flags = CrateDebugFlags::default();
        let config = LoggingConfig {
            format: LogFormat::Compact,
            ..Default::default()
        };
        let first = init_logging(&flags, &config);
        assert!(first.is_ok());
        assert!(init_logging(&flags, &config).is_err());
    }
}

//! Logging initialization
//!
//! Installs the process-wide tracing subscriber, writing to stdout and,
//! when a log file is given, appending the same lines to it.

use crate::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// The filter honors `RUST_LOG` and defaults to `info`. If the log file
/// cannot be opened, logging continues on stdout alone.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("could not open log file {}: {}", path.display(), e);
                None
            }
        },
        None => None,
    };

    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::io::stdout.and(Mutex::new(file)))
            .try_init(),
        None => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    }
    .map_err(|e| Error::Config(format!("failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("test.log");

        init(Some(&log_path)).unwrap();
        tracing::info!("logging test line");

        assert!(log_path.exists());
    }
}

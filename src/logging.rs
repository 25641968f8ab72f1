use crate::config::LogConfig;
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Routes `tracing` output to the configured log file. The terminal is owned
/// by the UI, so nothing is written to stdout/stderr.
pub fn init(config: &LogConfig) -> io::Result<()> {
    if let Some(parent) = config.file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let filter = EnvFilter::try_from_env("WPPFORM_LOG")
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(io::Error::other)
}

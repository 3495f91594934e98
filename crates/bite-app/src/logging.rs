//! Structured logging setup.

use crate::config::LoggingConfig;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Build the level filter from a directive such as `info` or
/// `bite_router=debug,warn`.
pub fn filter(level: &str) -> Result<EnvFilter, AppError> {
    EnvFilter::try_new(level).map_err(|e| AppError::Logging(format!("{}: {}", level, e)))
}

/// Install the global `tracing` subscriber.
///
/// Only the first call installs anything; later calls are a no-op.
pub fn init(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = filter(&config.level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // wasm32-unknown-unknown has no system clock and no stdout.
    #[cfg(target_arch = "wasm32")]
    let builder = builder
        .without_time()
        .with_ansi(false)
        .with_writer(console::ConsoleWriter::make);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Human => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    /// Forwards each formatted event to `console.log`.
    pub struct ConsoleWriter {
        buffer: Vec<u8>,
    }

    impl ConsoleWriter {
        pub fn make() -> Self {
            Self { buffer: Vec::new() }
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if !self.buffer.is_empty() {
                let line = String::from_utf8_lossy(&self.buffer);
                web_sys::console::log_1(&line.trim_end().into());
                self.buffer.clear();
            }
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }
}

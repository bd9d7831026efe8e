use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::ScoutError;

/// Default filter for a `-v` count when `RUST_LOG` is unset.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber: compact stderr output plus, when
/// `trace_file` is given, one JSON event per line appended to that file.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(verbosity: u8, trace_file: Option<&str>) -> Result<(), ScoutError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let json_layer = match trace_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ScoutError::Config(format!("could not open trace file '{}': {}", path, e))
                })?;
            Some(fmt::layer().json().with_writer(Mutex::new(file)))
        }
        None => None,
    };

    // Fails only when a global subscriber already exists.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(json_layer)
        .try_init();
    Ok(())
}

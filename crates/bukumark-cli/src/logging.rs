//! Logging setup
//!
//! Logs go to stderr unless a `log_file` is configured. `RUST_LOG` wins over
//! the `-v` flag when set.

use std::fs::OpenOptions;

use bukumark_core::Config;
use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a level for both crates
fn filter_for(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    EnvFilter::new(format!("bukumark_core={},bukumark_cli={}", level, level))
}

/// Initialize logging (ignores an already installed subscriber)
pub fn init(config: &Config, verbose: u8) {
    let env_filter = filter_for(verbose);

    if let Some(ref log_path) = config.log_file {
        let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                return;
            }
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(log_file)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

// aviso/src/logger.rs
//! Logger initialization for the aviso binary.
//!
//! Thin wrapper over `env_logger`: `RUST_LOG` is honoured, an explicit
//! level from the CLI (`--quiet`, `--debug`) overrides it.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format_timestamp_secs();
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_logger(Some(LevelFilter::Debug));
        init_logger(None);
        init_logger(Some(LevelFilter::Off));
    }
}

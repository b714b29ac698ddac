//! Logger setup
//!
//! The library only talks to the `log` facade. Native hosts install
//! `env_logger` here; `RUST_LOG` overrides the default filter.

/// Initialize the global logger.
///
/// `verbose` lowers the default filter from `info` to `debug`. Calling this
/// more than once is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(verbose: bool) {
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // try_init fails only if a logger is already installed
    let _ = Builder::from_env(env).format_timestamp_millis().try_init();
}

/// Browser builds log through the host console; nothing to install.
#[cfg(target_arch = "wasm32")]
pub fn init(_verbose: bool) {}

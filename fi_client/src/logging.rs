//! Logging setup for the terminal client.

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,flexinvest=info";

/// Initialize `env_logger`, honouring `RUST_LOG` when set.
///
/// Log lines go to stderr so they never interleave with rendered pages
/// on stdout.
///
/// # Example
///
/// ```no_run
/// use fi_client::logging;
///
/// logging::init();
/// log::info!("Client starting");
/// ```
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_target(false)
        .init();
}

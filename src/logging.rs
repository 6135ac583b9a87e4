use env_logger::Env;

/// Initialise env_logger at `level` unless `RUST_LOG` says otherwise.
/// Repeated calls are ignored.
pub fn init(level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .try_init();
}

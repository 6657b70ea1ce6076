/// Initialise `env_logger`. `RUST_LOG` wins; otherwise `debug` picks the level.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    // Already initialised when embedded.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

use log::LevelFilter;

/// Initialize logging using env_logger.
/// `RUST_LOG` wins when set, e.g. `RUST_LOG=netscan_core=debug netscan scan`;
/// otherwise `info`, or `debug` when `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

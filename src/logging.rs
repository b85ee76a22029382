use log::LevelFilter;

/// Level of this crate's logs for a number of `-v` flags
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sets up env_logger on stderr. `RUST_LOG` wins when set, otherwise only this
/// crate logs, at the level picked by `verbose`.
pub fn setup_logger(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_env("RUST_LOG");
    } else {
        builder.filter(None, LevelFilter::Off);
        builder.filter(Some("coco_subset"), level_for_verbosity(verbose));
    }
    builder.format_timestamp(None).format_target(false);
    // Already initialised (tests, embedding programs): keep the existing logger
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(7), LevelFilter::Trace);
    }

    #[test]
    fn setting_up_twice_is_harmless() {
        setup_logger(0);
        setup_logger(2);
    }
}

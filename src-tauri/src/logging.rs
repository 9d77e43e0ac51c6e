use crate::config::{get_config, LoggingConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Most verbose level enabled in config, as an `EnvFilter` directive.
fn level_directive(config: &LoggingConfig) -> &'static str {
    let levels = &config.levels;
    if config.verbose || levels.debug {
        "debug"
    } else if levels.info {
        "info"
    } else if levels.warning {
        "warn"
    } else if levels.error || levels.critical {
        "error"
    } else {
        "off"
    }
}

pub fn init_logging() {
    let config = &get_config().logging;

    // RUST_LOG wins over the config file.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(config)));

    let location = &config.format.location;
    let show_file = location.enabled && location.show_file;
    let show_line = location.enabled && location.show_line;

    // Use Layer::boxed() to unify the types of the if/else branches
    let fmt_layer = if !config.format.show_time {
        fmt::layer()
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .with_thread_ids(false)
            .without_time()
            .boxed()
    } else {
        fmt::layer()
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .with_thread_ids(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

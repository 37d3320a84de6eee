// src/utils/logging.rs
//! Logging configuration
//!
//! Sets up `env_logger` with the simulator's line format. `RUST_LOG`
//! always wins over the level chosen on the command line.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes logging with the given default level and output stream
///
/// `--verbose` lowers the default to `Debug`. Machine-readable output on
/// stdout goes with `Target::Stderr` so log lines never mix into it.
/// Calling it twice is harmless; the second initialization is ignored.
pub fn init_logging(default_level: LevelFilter, target: Target) {
    let mut builder = common_log_config();
    builder.target(target);

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(default_level);
    } else {
        builder.parse_env("RUST_LOG");
    }

    let _ = builder.try_init();
}

/// Base builder: `[ts LEVEL module:line] message`, stdout unless overridden
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_seconds();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stdout);

    builder
}

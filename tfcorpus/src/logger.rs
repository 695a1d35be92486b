// tfcorpus/src/logger.rs
//! Logging setup for the `tfcorpus` binary.
//!
//! `init_logger(Some(level))` forces a level for the whole process;
//! `init_logger(None)` defers to `RUST_LOG` and falls back to `warn`.
//! Calling it more than once is harmless, which keeps tests simple.

use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut b = Builder::new();
            b.filter_level(level);
            b
        }
        None => Builder::from_env(Env::default().default_filter_or("warn")),
    };

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let _ = builder.try_init();
}

//! `log` backend printing through `esp-println`

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

struct EspLogger;

static LOGGER: EspLogger = EspLogger;

impl Log for EspLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            esp_println::println!("[{}] {} - {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the logger, may only succeed once
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

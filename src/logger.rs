//! `log` backend that writes to the serial port.
//!
//! Library code logs through `log::{info, debug, ...}`; until [`init`] runs
//! those calls are no-ops, which is what host tests rely on.

use log::{Log, Metadata, Record};

use crate::config::LOG_LEVEL;

struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        crate::println!("[{:<5}] {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

pub fn init() -> Result<(), &'static str> {
    log::set_logger(&LOGGER).map_err(|_| "logger already installed")?;
    log::set_max_level(LOG_LEVEL);
    Ok(())
}

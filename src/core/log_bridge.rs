//! Bridge from the `log` facade into a [`BufferedLogger`]
//!
//! Facade levels map onto channels: `Error` to error, `Warn` to warning and
//! everything else to info. Filtering is left to `log::set_max_level`.

use super::{
    buffered::BufferedLogger,
    channel::Channel,
    error::{LoggerError, Result},
};

/// Channel receiving lines logged at `level`
pub fn channel_for(level: log::Level) -> Channel {
    match level {
        log::Level::Error => Channel::Error,
        log::Level::Warn => Channel::Warning,
        log::Level::Info | log::Level::Debug | log::Level::Trace => Channel::Info,
    }
}

impl log::Log for BufferedLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        self.log_fmt(channel_for(record.level()), *record.args());
    }

    fn flush(&self) {
        // Failures were already reported through the failure callback.
        let _ = BufferedLogger::flush(self);
    }
}

/// Register `logger` as the global `log` backend.
///
/// Only one backend can be installed per process.
pub fn install(logger: BufferedLogger, max_level: log::LevelFilter) -> Result<()> {
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| LoggerError::InstallError(e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
}

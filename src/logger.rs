//! Logging collaborator used while building polygons.
//!
//! Data-quality problems (duplicate exterior rings, missing texture
//! coordinates, tesselation drift) are reported through a [`CityGmlLogger`]
//! instead of failing the build. Callers pass `None` to silence them.
//!
//! Two implementations ship with the crate:
//! - [`LogFacadeLogger`] forwards every record to the `log` facade.
//! - [`RecordingLogger`] keeps the records in memory so they can be inspected.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Target used for records forwarded to the `log` facade.
pub const LOG_TARGET: &str = "citygml_polygon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_log_level(self) -> log::Level {
        match self {
            Self::Trace => log::Level::Trace,
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Receiver for messages emitted while building geometry.
///
/// Implementations must not panic; logging never aborts processing.
pub trait CityGmlLogger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    /// Lets callers skip formatting for levels nobody listens to.
    fn is_enabled(&self, level: LogLevel) -> bool {
        let _ = level;
        true
    }
}

/// Sends a message to an optional logger. `None` is a no-op.
pub fn log_message(logger: Option<&dyn CityGmlLogger>, level: LogLevel, message: &str) {
    if let Some(logger) = logger {
        if logger.is_enabled(level) {
            logger.log(level, message);
        }
    }
}

/// Formats and logs through an `Option<&dyn CityGmlLogger>`.
///
/// The message is only formatted when a logger is present and enabled for
/// the level.
#[macro_export]
macro_rules! citygml_log {
    ($logger:expr, $level:expr, $($t:tt)*) => {{
        if let Some(logger) = $logger {
            let level = $level;
            if $crate::logger::CityGmlLogger::is_enabled(logger, level) {
                $crate::logger::CityGmlLogger::log(logger, level, &format!($($t)*));
            }
        }
    }};
}

#[macro_export]
macro_rules! citygml_log_info {
    ($logger:expr, $($t:tt)*) => {
        $crate::citygml_log!($logger, $crate::logger::LogLevel::Info, $($t)*)
    };
}

#[macro_export]
macro_rules! citygml_log_warn {
    ($logger:expr, $($t:tt)*) => {
        $crate::citygml_log!($logger, $crate::logger::LogLevel::Warning, $($t)*)
    };
}

#[macro_export]
macro_rules! citygml_log_error {
    ($logger:expr, $($t:tt)*) => {
        $crate::citygml_log!($logger, $crate::logger::LogLevel::Error, $($t)*)
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Implementations
// ─────────────────────────────────────────────────────────────────────────────

/// Forwards records to whatever logger is installed for the `log` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeLogger;

impl CityGmlLogger for LogFacadeLogger {
    fn log(&self, level: LogLevel, message: &str) {
        log::log!(target: LOG_TARGET, level.as_log_level(), "{message}");
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        log::log_enabled!(target: LOG_TARGET, level.as_log_level())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Keeps every record at or above `min_level` in memory.
#[derive(Debug)]
pub struct RecordingLogger {
    min_level: LogLevel,
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Trace)
    }

    #[must_use]
    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            min_level,
            records: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages logged at exactly `level`, in emission order.
    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| record.level == level)
            .map(|record| record.message.clone())
            .collect()
    }

    #[must_use]
    pub fn count(&self, level: LogLevel) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| record.level == level)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for RecordingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl CityGmlLogger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level,
                message: message.to_owned(),
            });
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

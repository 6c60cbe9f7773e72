//! Logging sink handed to the client at construction.
//!
//! Every request reports a start and a completion record through the sink, and
//! the streaming pump reports decode failures, drops and cancellation. The sink
//! is a side channel: a panicking sink is caught and never reaches the caller.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Function receiving a message plus key/value pairs.
pub type LogFn = dyn Fn(&str, &[(&str, String)]) + Send + Sync;

/// Cheaply clonable logging sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<LogFn>,
}

impl Logger {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str, &[(&str, String)]) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Sink that discards every record
    pub fn discard() -> Self {
        Self::new(|_, _| {})
    }

    pub fn log(&self, msg: &str, fields: &[(&str, String)]) {
        let sink = &self.sink;
        if catch_unwind(AssertUnwindSafe(|| sink(msg, fields))).is_err() {
            log::warn!("pg-client: logging sink panicked while handling {msg:?}");
        }
    }
}

/// Forwards records to the `log` facade at debug level.
impl Default for Logger {
    fn default() -> Self {
        Self::new(|msg, fields| {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("{msg}{}", Fields(fields));
            }
        })
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

struct Fields<'a>(&'a [(&'a str, String)]);

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.0 {
            write!(f, ", {key}: {value}")?;
        }
        Ok(())
    }
}

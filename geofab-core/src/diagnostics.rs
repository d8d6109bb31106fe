//! Injected reporting interface shared by every pipeline component.
//!
//! Components never reach for a global logger. Callers pass a
//! [`Diagnostics`] implementation in, typically a [`LogDiagnostics`] that
//! forwards to the `log` facade whose sink was installed once at process
//! start.

use std::sync::{Mutex, PoisonError};

use log::Level;

/// Sink for warnings, errors and progress notes raised by the pipeline.
///
/// Implementations must be shareable across threads so independent
/// region pipelines can report through a single sink.
///
/// # Examples
///
/// ```
/// use geofab_core::{Diagnostics, RecordingDiagnostics};
///
/// let diagnostics = RecordingDiagnostics::default();
/// diagnostics.warn("refs column not found");
/// assert_eq!(diagnostics.warnings(), vec!["refs column not found".to_owned()]);
/// ```
pub trait Diagnostics: Send + Sync {
    /// Record `message` at `level`.
    fn emit(&self, level: Level, message: &str);

    /// Record an error-level message.
    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Record a warning.
    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    /// Record an informational message.
    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Record a debug message.
    fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }
}

/// Forwards diagnostics to the `log` facade under a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct LogDiagnostics {
    target: &'static str,
}

impl LogDiagnostics {
    /// Target used when none is supplied.
    pub const DEFAULT_TARGET: &'static str = "geofab";

    /// Construct a sink logging under `target`.
    #[must_use]
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }

    /// The `log` target records are emitted under.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TARGET)
    }
}

impl Diagnostics for LogDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        log::log!(target: self.target, level, "{message}");
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn emit(&self, _level: Level, _message: &str) {}
}

/// A single captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// Severity of the event.
    pub level: Level,
    /// Rendered message.
    pub message: String,
}

/// Captures diagnostics in memory, in emission order.
///
/// Useful for batch callers that want to attach warnings to a report, and
/// for asserting on reported failures in tests.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    /// Snapshot of every captured event.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages captured at `level`.
    #[must_use]
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .map(|event| event.message)
            .collect()
    }

    /// Messages captured at error level.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(Level::Error)
    }

    /// Messages captured at warning level.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::Warn)
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn emit(&self, level: Level, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DiagnosticEvent {
                level,
                message: message.to_owned(),
            });
    }
}

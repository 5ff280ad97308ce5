//! Diagnostics reporting for the simulation core.
//!
//! Movement operations never fail hard: invalid inputs degrade to safe
//! behavior and are reported through an injected [`DiagnosticsSink`]. The
//! sink is passed into each per-frame operation as a generic parameter so
//! tests can capture reports without touching a global logger.

use parking_lot::Mutex;
use tracing::{error, warn};

use crate::player::MovementError;

/// Severity of a reported movement diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticLevel {
    /// Recoverable: the operation degraded to a safe no-op or was partially
    /// sanitized
    Warning,
    /// Rejected: the requested state change was refused outright
    Severe,
}

/// Receiver for movement diagnostics.
pub trait DiagnosticsSink {
    /// Report a diagnostic at the given level.
    fn report(&self, level: DiagnosticLevel, error: &MovementError);
}

/// Production sink that forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticsSink for TracingSink {
    fn report(&self, level: DiagnosticLevel, error: &MovementError) {
        match level {
            DiagnosticLevel::Warning => warn!("movement: {error}"),
            DiagnosticLevel::Severe => error!("movement: {error}"),
        }
    }
}

/// Capturing sink for tests.
///
/// Records every report so assertions can inspect what the controller
/// emitted. Interior mutability keeps the `&self` signature of
/// [`DiagnosticsSink::report`].
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(DiagnosticLevel, String)>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports captured so far, in order.
    #[must_use]
    pub fn reports(&self) -> Vec<(DiagnosticLevel, String)> {
        self.reports.lock().clone()
    }

    /// Number of captured reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Whether nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    /// Whether any report was at [`DiagnosticLevel::Severe`].
    #[must_use]
    pub fn has_severe(&self) -> bool {
        self.reports
            .lock()
            .iter()
            .any(|(level, _)| *level == DiagnosticLevel::Severe)
    }

    /// Drop all captured reports.
    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl DiagnosticsSink for RecordingSink {
    fn report(&self, level: DiagnosticLevel, error: &MovementError) {
        self.reports.lock().push((level, error.to_string()));
    }
}

/// Sink that discards everything. Used by benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NullSink {
    /// Create a new null sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticsSink for NullSink {
    fn report(&self, _level: DiagnosticLevel, _error: &MovementError) {}
}

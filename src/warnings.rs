//! Warnings channel for recoverable anomalies.
//!
//! The core never terminates the process; anything worth telling the operator
//! about goes through a `WarningSink`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a recoverable anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single reported anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Severity,
    pub message: String,
}

/// Receiver of `(Severity, Message)` pairs
pub trait WarningSink {
    fn emit(&mut self, severity: Severity, message: String);

    fn warn(&mut self, message: String) {
        self.emit(Severity::Warning, message);
    }
}

/// Forwards anomalies to `tracing` at the matching level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn emit(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Info => tracing::info!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }
    }
}

/// Keeps every anomaly; optionally forwards to tracing as well
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub warnings: Vec<Warning>,
    forward: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect and also log through `tracing`
    pub fn forwarding() -> Self {
        Self {
            warnings: Vec::new(),
            forward: true,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.warnings.iter().filter(|w| w.severity == severity).count()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|w| w.message.as_str()).collect()
    }
}

impl WarningSink for CollectingSink {
    fn emit(&mut self, severity: Severity, message: String) {
        if self.forward {
            TracingSink.emit(severity, message.clone());
        }
        self.warnings.push(Warning { severity, message });
    }
}

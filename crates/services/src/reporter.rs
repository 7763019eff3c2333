use std::sync::{Arc, Mutex};

/// Classification of a recovered anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// Unknown module id or failed dataset fetch.
    DatasetUnavailable,
    /// A stored mastery record failed to parse.
    CorruptProgressData,
    /// A raw question record failed normalization and was skipped.
    InvalidQuestionRecord,
    /// A durable read/write failed; the session continued in memory.
    StorageUnavailable,
}

impl AnomalyKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::DatasetUnavailable => "dataset_unavailable",
            AnomalyKind::CorruptProgressData => "corrupt_progress_data",
            AnomalyKind::InvalidQuestionRecord => "invalid_question_record",
            AnomalyKind::StorageUnavailable => "storage_unavailable",
        }
    }
}

/// Receives anomalies the engine recovered from, without interrupting the
/// user flow. None of these are fatal.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, kind: AnomalyKind, message: &str, context: &str);
}

/// Reporter that forwards anomalies to the `tracing` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, kind: AnomalyKind, message: &str, context: &str) {
        tracing::warn!(kind = kind.as_str(), context, "{message}");
    }
}

/// A reported anomaly, as captured by [`CapturingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub message: String,
    pub context: String,
}

/// Reporter that records anomalies for inspection in tests.
#[derive(Clone, Default)]
pub struct CapturingReporter {
    reports: Arc<Mutex<Vec<Anomaly>>>,
}

impl CapturingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All anomalies reported so far, in order.
    #[must_use]
    pub fn reported(&self) -> Vec<Anomaly> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Whether any anomaly of `kind` was reported.
    #[must_use]
    pub fn has_kind(&self, kind: AnomalyKind) -> bool {
        self.reported().iter().any(|a| a.kind == kind)
    }
}

impl ErrorReporter for CapturingReporter {
    fn report(&self, kind: AnomalyKind, message: &str, context: &str) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(Anomaly {
                kind,
                message: message.to_string(),
                context: context.to_string(),
            });
        }
    }
}

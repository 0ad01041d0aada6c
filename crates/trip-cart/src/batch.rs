//! Per-request results of fan-out batches.
//!
//! Multi-unit bookings and multi-item removals issue one request per target
//! and wait for all of them. Already-succeeded requests are never rolled
//! back; the report records the outcome of each one.

use crate::CartError;

/// What happened to one request of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The server accepted the request.
    Succeeded,
    /// The server reported the target missing; local state was pruned.
    Reconciled,
    /// The request failed.
    Failed(CartError),
}

/// One target of a batch and its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    /// Human-readable target, e.g. a line item id or `A1#2` for the second unit.
    pub target: String,
    pub outcome: BatchOutcome,
}

/// Outcomes of every request in a batch, in issue order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: impl Into<String>, outcome: BatchOutcome) {
        self.entries.push(BatchEntry {
            target: target.into(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Requests that succeeded or were reconciled.
    pub fn succeeded(&self) -> usize {
        self.total() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, BatchOutcome::Failed(_)))
    }

    /// Whether any request was rejected for expired credentials.
    pub fn session_expired(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.outcome == BatchOutcome::Failed(CartError::SessionExpired))
    }

    /// `Ok(self)` when every request succeeded, otherwise [`CartError::PartialFailure`].
    pub fn into_result(self) -> Result<Self, CartError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CartError::PartialFailure(self))
        }
    }
}

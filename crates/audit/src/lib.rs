// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use rowtrack::{ChangeTracker, EntityStateChange};
use rowtrack_domain::{EntityKey, EntityState};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::trace;

#[cfg(test)]
mod tests;

/// Errors raised while exporting the audit trail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The records could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// An immutable record of one applied state transition.
///
/// Records capture:
/// - Which entity transitioned (type and key)
/// - The state before and after the transition
/// - Whether the entity was materialized from a query
/// - When the transition was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Position in the log, starting at 1.
    pub sequence: usize,
    /// The entity type name.
    pub entity_type: String,
    /// The primary key value.
    pub key: String,
    /// The state before the transition.
    pub old_state: EntityState,
    /// The state after the transition.
    pub new_state: EntityState,
    /// True if the entity was just materialized from a query.
    pub from_query: bool,
    /// When the transition was observed.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

impl TransitionRecord {
    /// Creates a record from a delivered notification.
    ///
    /// # Arguments
    ///
    /// * `sequence` - The position of this record in its log
    /// * `change` - The notification being recorded
    /// * `recorded_at` - The observation time
    #[must_use]
    pub fn from_change(
        sequence: usize,
        change: &EntityStateChange<'_>,
        recorded_at: OffsetDateTime,
    ) -> Self {
        let key: &EntityKey = change.entry().key();
        Self {
            sequence,
            entity_type: key.entity_type().to_string(),
            key: key.key().to_string(),
            old_state: change.old_state(),
            new_state: change.new_state(),
            from_query: change.from_query(),
            recorded_at,
        }
    }
}

/// An append-only log of applied transitions.
///
/// Clones share the same records. The log observes "state changed"
/// notifications only, so every record describes a transition that was
/// actually applied.
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    records: Rc<RefCell<Vec<TransitionRecord>>>,
}

impl TransitionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes this log to the "state changed" notifications of `tracker`.
    pub fn attach(&self, tracker: &mut ChangeTracker) {
        let records: Rc<RefCell<Vec<TransitionRecord>>> = Rc::clone(&self.records);
        tracker.on_state_changed(move |change| {
            let mut records = records.borrow_mut();
            let sequence: usize = records.len() + 1;
            let record: TransitionRecord =
                TransitionRecord::from_change(sequence, change, OffsetDateTime::now_utc());
            trace!(
                sequence = record.sequence,
                entity = %change.entry().key(),
                "Recorded transition"
            );
            records.push(record);
        });
    }

    /// Returns a copy of every record, in order.
    #[must_use]
    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records.borrow().clone()
    }

    /// Returns the records for one entity, in order.
    #[must_use]
    pub fn for_entity(&self, key: &EntityKey) -> Vec<TransitionRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|record| record.entity_type == key.entity_type() && record.key == key.key())
            .cloned()
            .collect()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Serializes every record as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Serialization` if a record cannot be serialized.
    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string_pretty(&*self.records.borrow())?)
    }
}

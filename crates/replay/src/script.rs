// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tracker operation scripts.
//!
//! A script is a JSON array of operations, each tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "query", "entity_type": "Sample", "key": "1", "values": { "Name": "a" } },
//!   { "op": "set_value", "entity_type": "Sample", "key": "1", "property": "Name", "value": "b" },
//!   { "op": "accept_all_changes" }
//! ]
//! ```

use rowtrack::{ChangeTracker, TrackerError, diagnostics};
use rowtrack_audit::TransitionLog;
use rowtrack_domain::{EntityKey, EntityState, PropertyValues};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    /// The script is not a valid operation list.
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),

    /// An operation was rejected by the tracker.
    #[error("Step {step} failed: {source}")]
    Step {
        /// The 1-based position of the failing operation.
        step: usize,
        /// The tracker error.
        source: TrackerError,
    },
}

/// One scripted tracker operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Track a new entity as `Added`.
    Add {
        /// The entity type name.
        entity_type: String,
        /// The primary key value.
        key: String,
        /// The property values.
        #[serde(default)]
        values: PropertyValues,
    },
    /// Track an existing entity as `Unchanged`.
    Attach {
        /// The entity type name.
        entity_type: String,
        /// The primary key value.
        key: String,
        /// The property values.
        #[serde(default)]
        values: PropertyValues,
    },
    /// Materialize an entity from a queried row.
    Query {
        /// The entity type name.
        entity_type: String,
        /// The primary key value.
        key: String,
        /// The row values.
        #[serde(default)]
        values: PropertyValues,
    },
    /// Set one property of a tracked entity.
    SetValue {
        /// The entity type name.
        entity_type: String,
        /// The primary key value.
        key: String,
        /// The property name.
        property: String,
        /// The new value.
        value: Value,
    },
    /// Mark a tracked entity for deletion.
    Remove {
        /// The entity type name.
        entity_type: String,
        /// The primary key value.
        key: String,
    },
    /// Move a tracked entity to an explicit state.
    SetState {
        /// The entity type name.
        entity_type: String,
        /// The primary key value.
        key: String,
        /// The target state.
        state: EntityState,
    },
    /// Accept all pending changes.
    AcceptAllChanges,
    /// Stop tracking every entity.
    Clear,
}

/// Parses a script from JSON text.
///
/// # Errors
///
/// Returns `ScriptError::Parse` if the text is not a valid operation list.
pub fn parse(text: &str) -> Result<Vec<Operation>, ScriptError> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and parses a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<Operation>, ScriptError> {
    let text: String = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Runs `operations` against a fresh tracker and returns its transition log.
///
/// Replay stops at the first rejected operation.
///
/// # Errors
///
/// Returns `ScriptError::Step` naming the first operation the tracker rejected.
pub fn replay(operations: &[Operation]) -> Result<TransitionLog, ScriptError> {
    let mut tracker: ChangeTracker = ChangeTracker::new();
    diagnostics::log_state_changes(&mut tracker);
    let log: TransitionLog = TransitionLog::new();
    log.attach(&mut tracker);

    for (index, operation) in operations.iter().enumerate() {
        debug!(step = index + 1, ?operation, "Applying operation");
        apply(&mut tracker, operation).map_err(|source| ScriptError::Step {
            step: index + 1,
            source,
        })?;
    }

    info!(
        operations = operations.len(),
        transitions = log.len(),
        tracked = tracker.len(),
        "Replay complete"
    );
    Ok(log)
}

fn apply(tracker: &mut ChangeTracker, operation: &Operation) -> Result<(), TrackerError> {
    match operation {
        Operation::Add {
            entity_type,
            key,
            values,
        } => {
            tracker.add(EntityKey::new(entity_type, key)?, values.clone())?;
        }
        Operation::Attach {
            entity_type,
            key,
            values,
        } => {
            tracker.attach(EntityKey::new(entity_type, key)?, values.clone())?;
        }
        Operation::Query {
            entity_type,
            key,
            values,
        } => {
            tracker.track_queried(EntityKey::new(entity_type, key)?, values.clone())?;
        }
        Operation::SetValue {
            entity_type,
            key,
            property,
            value,
        } => {
            tracker.set_value(&EntityKey::new(entity_type, key)?, property, value.clone())?;
        }
        Operation::Remove { entity_type, key } => {
            tracker.remove(&EntityKey::new(entity_type, key)?)?;
        }
        Operation::SetState {
            entity_type,
            key,
            state,
        } => {
            tracker.set_state(&EntityKey::new(entity_type, key)?, *state)?;
        }
        Operation::AcceptAllChanges => tracker.accept_all_changes()?,
        Operation::Clear => tracker.clear()?,
    }
    Ok(())
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ChangeTracker, EntityKey, EntityState, PropertyValues};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// One notification as seen by a test observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    pub hook: &'static str,
    pub entity: EntityKey,
    pub old_state: EntityState,
    pub new_state: EntityState,
    pub from_query: bool,
    /// The state of the record at delivery time.
    pub record_state: EntityState,
}

pub type ObservedLog = Rc<RefCell<Vec<Observed>>>;

pub fn sample_key(id: &str) -> EntityKey {
    EntityKey::new("Sample", id).unwrap()
}

pub fn sample_values(name: &str) -> PropertyValues {
    [
        ("Name", json!(name)),
        ("RowVersion", json!("00000001-0000-0000-0000-000000000001")),
    ]
    .into_iter()
    .collect()
}

/// Records "changing" and "changed" notifications into one shared log.
pub fn record_transitions(tracker: &mut ChangeTracker) -> ObservedLog {
    let log: ObservedLog = Rc::new(RefCell::new(Vec::new()));

    let changing_log: ObservedLog = Rc::clone(&log);
    tracker.on_state_changing(move |change| {
        changing_log.borrow_mut().push(Observed {
            hook: "changing",
            entity: change.entry().key().clone(),
            old_state: change.old_state(),
            new_state: change.new_state(),
            from_query: change.from_query(),
            record_state: change.entry().state(),
        });
    });

    let changed_log: ObservedLog = Rc::clone(&log);
    tracker.on_state_changed(move |change| {
        changed_log.borrow_mut().push(Observed {
            hook: "changed",
            entity: change.entry().key().clone(),
            old_state: change.old_state(),
            new_state: change.new_state(),
            from_query: change.from_query(),
            record_state: change.entry().state(),
        });
    });

    log
}

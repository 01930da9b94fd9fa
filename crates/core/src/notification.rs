// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification payloads delivered to change tracker observers.
//!
//! A payload borrows the tracked record it describes, so it can only exist
//! while the tracker is delivering it. The public [`EntityEntry`] handle is
//! built lazily on first access and reused afterwards.
//!
//! Payloads hold their handle in a [`OnceCell`], which makes them `!Sync`.
//! Delivery is single-threaded, so the handle is built at most once.

use crate::entry::{EntityEntry, InternalEntry};
use rowtrack_domain::EntityState;
use std::cell::OnceCell;

/// A single state transition of one tracked entity.
///
/// Raised before a transition is applied (the record still holds
/// `old_state`) and again after it is applied (the record holds
/// `new_state`).
#[derive(Debug)]
pub struct EntityStateChange<'a> {
    internal: &'a InternalEntry,
    entry: OnceCell<EntityEntry<'a>>,
    old_state: EntityState,
    new_state: EntityState,
    from_query: bool,
}

impl<'a> EntityStateChange<'a> {
    /// Creates a notification for a transition of `internal`.
    ///
    /// The transition is not validated; callers only raise transitions they
    /// have already decided to apply.
    ///
    /// # Arguments
    ///
    /// * `internal` - The tracked record that is transitioning
    /// * `old_state` - The state being left
    /// * `new_state` - The state being entered
    /// * `from_query` - Whether the entity was just materialized from a query
    #[must_use]
    pub const fn new(
        internal: &'a InternalEntry,
        old_state: EntityState,
        new_state: EntityState,
        from_query: bool,
    ) -> Self {
        Self {
            internal,
            entry: OnceCell::new(),
            old_state,
            new_state,
            from_query,
        }
    }

    /// The handle for the entity whose state is changing.
    ///
    /// Every call returns the same handle.
    pub fn entry(&self) -> &EntityEntry<'a> {
        self.entry.get_or_init(|| EntityEntry::new(self.internal))
    }

    /// The state the entity is transitioning from.
    #[must_use]
    pub const fn old_state(&self) -> EntityState {
        self.old_state
    }

    /// The state the entity is transitioning to.
    #[must_use]
    pub const fn new_state(&self) -> EntityState {
        self.new_state
    }

    /// True if the entity was just materialized from a query; false otherwise.
    #[must_use]
    pub const fn from_query(&self) -> bool {
        self.from_query
    }
}

/// Raised once an entity has started being tracked.
#[derive(Debug)]
pub struct EntityTracked<'a> {
    internal: &'a InternalEntry,
    entry: OnceCell<EntityEntry<'a>>,
    from_query: bool,
}

impl<'a> EntityTracked<'a> {
    /// Creates a notification for a newly tracked `internal`.
    #[must_use]
    pub const fn new(internal: &'a InternalEntry, from_query: bool) -> Self {
        Self {
            internal,
            entry: OnceCell::new(),
            from_query,
        }
    }

    /// The handle for the newly tracked entity.
    pub fn entry(&self) -> &EntityEntry<'a> {
        self.entry.get_or_init(|| EntityEntry::new(self.internal))
    }

    /// True if tracking started because the entity was materialized from a query.
    #[must_use]
    pub const fn from_query(&self) -> bool {
        self.from_query
    }
}

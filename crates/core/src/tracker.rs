// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::entry::{EntityEntry, InternalEntry};
use crate::error::TrackerError;
use crate::notification::{EntityStateChange, EntityTracked};
use rowtrack_domain::{EntityKey, EntityState, PropertyValues};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

type StateObserver = Box<dyn FnMut(&EntityStateChange<'_>)>;
type TrackedObserver = Box<dyn FnMut(&EntityTracked<'_>)>;

/// Registered observers, called in registration order.
struct Observers {
    state_changing: Vec<StateObserver>,
    state_changed: Vec<StateObserver>,
    tracked: Vec<TrackedObserver>,
}

impl Observers {
    fn state_changing(&mut self, change: &EntityStateChange<'_>) {
        for observer in &mut self.state_changing {
            observer(change);
        }
    }

    fn state_changed(&mut self, change: &EntityStateChange<'_>) {
        for observer in &mut self.state_changed {
            observer(change);
        }
    }

    fn tracked(&mut self, tracked: &EntityTracked<'_>) {
        for observer in &mut self.tracked {
            observer(tracked);
        }
    }
}

/// Tracks entity instances and announces their state transitions.
///
/// The tracker is an identity map: at most one record exists per
/// [`EntityKey`]. Observers run synchronously on the calling thread, before
/// and after each transition is applied. A transition whose old and new
/// state are equal is not applied and raises nothing.
///
/// The tracker does not check whether a transition is legal. Any state can
/// be reached from any other through [`ChangeTracker::set_state`].
pub struct ChangeTracker {
    entries: BTreeMap<EntityKey, InternalEntry>,
    observers: Observers,
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("entries", &self.entries)
            .field("state_changing_observers", &self.observers.state_changing.len())
            .field("state_changed_observers", &self.observers.state_changed.len())
            .field("tracked_observers", &self.observers.tracked.len())
            .finish()
    }
}

impl ChangeTracker {
    /// Creates an empty tracker with no observers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            observers: Observers {
                state_changing: Vec::new(),
                state_changed: Vec::new(),
                tracked: Vec::new(),
            },
        }
    }

    /// Registers an observer called before each transition is applied.
    pub fn on_state_changing<F>(&mut self, observer: F)
    where
        F: FnMut(&EntityStateChange<'_>) + 'static,
    {
        self.observers.state_changing.push(Box::new(observer));
    }

    /// Registers an observer called after each transition is applied.
    pub fn on_state_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&EntityStateChange<'_>) + 'static,
    {
        self.observers.state_changed.push(Box::new(observer));
    }

    /// Registers an observer called when an entity starts being tracked.
    pub fn on_tracked<F>(&mut self, observer: F)
    where
        F: FnMut(&EntityTracked<'_>) + 'static,
    {
        self.observers.tracked.push(Box::new(observer));
    }

    /// Starts tracking a new entity in the `Added` state.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::AlreadyTracked` if the key is already tracked.
    pub fn add(
        &mut self,
        key: EntityKey,
        values: PropertyValues,
    ) -> Result<EntityEntry<'_>, TrackerError> {
        self.start_tracking(key, values, EntityState::Added, false)
    }

    /// Starts tracking an existing entity in the `Unchanged` state.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::AlreadyTracked` if the key is already tracked.
    pub fn attach(
        &mut self,
        key: EntityKey,
        values: PropertyValues,
    ) -> Result<EntityEntry<'_>, TrackerError> {
        self.start_tracking(key, values, EntityState::Unchanged, false)
    }

    /// Tracks an entity materialized from a row just read from the store.
    ///
    /// If the key is already tracked, the tracked instance wins: `values`
    /// are discarded, no notification is raised and the existing entry is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotTracked` only if the identity map is
    /// inconsistent, which cannot happen through this API.
    pub fn track_queried(
        &mut self,
        key: EntityKey,
        values: PropertyValues,
    ) -> Result<EntityEntry<'_>, TrackerError> {
        if self.entries.contains_key(&key) {
            debug!(entity = %key, "Resolved queried entity to tracked instance");
            return self
                .entries
                .get(&key)
                .map(EntityEntry::new)
                .ok_or(TrackerError::NotTracked(key));
        }
        self.start_tracking(key, values, EntityState::Unchanged, true)
    }

    /// Sets the current value of a property.
    ///
    /// An `Unchanged` entity becomes `Modified` once a value differs from its
    /// original. A `Modified` entity whose last modified property is set
    /// back to its original value becomes `Unchanged` again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key is not tracked
    /// - The entity is marked as deleted
    pub fn set_value(
        &mut self,
        key: &EntityKey,
        name: &str,
        value: Value,
    ) -> Result<(), TrackerError> {
        let internal: &mut InternalEntry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| TrackerError::NotTracked(key.clone()))?;

        if internal.state() == EntityState::Deleted {
            return Err(TrackerError::EntityDeleted(key.clone()));
        }

        let differs: bool = internal.set_value(name, value);
        let target: Option<EntityState> = match internal.state() {
            EntityState::Unchanged if differs => Some(EntityState::Modified),
            EntityState::Modified if !internal.has_modified_properties() => {
                Some(EntityState::Unchanged)
            }
            _ => None,
        };

        target.map_or(Ok(()), |state| self.transition(key, state))
    }

    /// Marks an entity for deletion.
    ///
    /// An `Added` entity was never stored, so it is detached instead.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotTracked` if the key is not tracked.
    pub fn remove(&mut self, key: &EntityKey) -> Result<(), TrackerError> {
        let target: EntityState = match self.state_of(key) {
            EntityState::Detached => return Err(TrackerError::NotTracked(key.clone())),
            EntityState::Added => EntityState::Detached,
            EntityState::Unchanged | EntityState::Modified | EntityState::Deleted => {
                EntityState::Deleted
            }
        };
        self.transition(key, target)
    }

    /// Moves a tracked entity to `state`.
    ///
    /// `Detached` stops tracking the entity. `Unchanged` accepts its current
    /// values. `Modified` marks every property if none were modified.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotTracked` if the key is not tracked.
    pub fn set_state(&mut self, key: &EntityKey, state: EntityState) -> Result<(), TrackerError> {
        self.transition(key, state)
    }

    /// Accepts all pending changes as if they were saved.
    ///
    /// `Added` and `Modified` entities become `Unchanged`; `Deleted` entities
    /// are detached.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotTracked` only if the identity map is
    /// inconsistent, which cannot happen through this API.
    pub fn accept_all_changes(&mut self) -> Result<(), TrackerError> {
        let pending: Vec<(EntityKey, EntityState)> = self
            .entries
            .values()
            .filter(|internal| internal.state().has_pending_changes())
            .map(|internal| (internal.key().clone(), internal.state()))
            .collect();

        debug!(count = pending.len(), "Accepting pending changes");

        for (key, state) in pending {
            let target: EntityState = if state == EntityState::Deleted {
                EntityState::Detached
            } else {
                EntityState::Unchanged
            };
            self.transition(&key, target)?;
        }
        Ok(())
    }

    /// Stops tracking every entity.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotTracked` only if the identity map is
    /// inconsistent, which cannot happen through this API.
    pub fn clear(&mut self) -> Result<(), TrackerError> {
        let keys: Vec<EntityKey> = self.entries.keys().cloned().collect();

        debug!(count = keys.len(), "Detaching all tracked entities");

        for key in keys {
            self.transition(&key, EntityState::Detached)?;
        }
        Ok(())
    }

    /// Returns the entry for a tracked entity.
    #[must_use]
    pub fn entry(&self, key: &EntityKey) -> Option<EntityEntry<'_>> {
        self.entries.get(key).map(EntityEntry::new)
    }

    /// Returns entries for every tracked entity, in key order.
    #[must_use]
    pub fn entries(&self) -> Vec<EntityEntry<'_>> {
        self.entries.values().map(EntityEntry::new).collect()
    }

    /// Returns the state of an entity; `Detached` if it is not tracked.
    #[must_use]
    pub fn state_of(&self, key: &EntityKey) -> EntityState {
        self.entries
            .get(key)
            .map_or(EntityState::Detached, InternalEntry::state)
    }

    /// Returns true if any tracked entity has changes to save.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.entries
            .values()
            .any(|internal| internal.state().has_pending_changes())
    }

    /// Returns the number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn start_tracking(
        &mut self,
        key: EntityKey,
        values: PropertyValues,
        state: EntityState,
        from_query: bool,
    ) -> Result<EntityEntry<'_>, TrackerError> {
        if self.entries.contains_key(&key) {
            return Err(TrackerError::AlreadyTracked(key));
        }

        debug!(entity = %key, %state, from_query, "Starting to track entity");

        let mut pending: InternalEntry = InternalEntry::new(key.clone(), values);
        self.observers.state_changing(&EntityStateChange::new(
            &pending,
            EntityState::Detached,
            state,
            from_query,
        ));
        pending.set_state(state);

        let internal: &InternalEntry = self.entries.entry(key).or_insert(pending);
        self.observers.state_changed(&EntityStateChange::new(
            internal,
            EntityState::Detached,
            state,
            from_query,
        ));
        self.observers.tracked(&EntityTracked::new(internal, from_query));

        Ok(EntityEntry::new(internal))
    }

    fn transition(&mut self, key: &EntityKey, new_state: EntityState) -> Result<(), TrackerError> {
        let internal: &mut InternalEntry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| TrackerError::NotTracked(key.clone()))?;

        let old_state: EntityState = internal.state();
        if old_state == new_state {
            return Ok(());
        }

        self.observers.state_changing(&EntityStateChange::new(
            internal, old_state, new_state, false,
        ));

        if new_state == EntityState::Detached {
            // The removed record lives until the changed observers return.
            let mut detached: InternalEntry = self
                .entries
                .remove(key)
                .ok_or_else(|| TrackerError::NotTracked(key.clone()))?;
            detached.set_state(new_state);
            self.observers.state_changed(&EntityStateChange::new(
                &detached, old_state, new_state, false,
            ));
        } else {
            internal.set_state(new_state);
            self.observers.state_changed(&EntityStateChange::new(
                internal, old_state, new_state, false,
            ));
        }
        Ok(())
    }
}

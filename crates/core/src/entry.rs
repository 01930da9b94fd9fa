// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tracked entity records and the public handle over them.

use rowtrack_domain::{EntityKey, EntityState, PropertyValues};
use serde_json::Value;
use std::collections::BTreeSet;

/// The tracker's record of one entity instance.
///
/// Records are owned by the [`ChangeTracker`](crate::ChangeTracker). Outside
/// code normally sees them through an [`EntityEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalEntry {
    key: EntityKey,
    state: EntityState,
    original_values: PropertyValues,
    current_values: PropertyValues,
    modified: BTreeSet<String>,
}

impl InternalEntry {
    /// Creates a detached record whose original and current values are `values`.
    ///
    /// # Arguments
    ///
    /// * `key` - The identity of the entity
    /// * `values` - The entity's property values
    #[must_use]
    pub fn new(key: EntityKey, values: PropertyValues) -> Self {
        Self {
            key,
            state: EntityState::Detached,
            original_values: values.clone(),
            current_values: values,
            modified: BTreeSet::new(),
        }
    }

    /// Returns the identity of the entity.
    #[must_use]
    pub const fn key(&self) -> &EntityKey {
        &self.key
    }

    /// Returns the current tracking state.
    #[must_use]
    pub const fn state(&self) -> EntityState {
        self.state
    }

    /// Returns the values as last read from or accepted into the store.
    #[must_use]
    pub const fn original_values(&self) -> &PropertyValues {
        &self.original_values
    }

    /// Returns the values as they are now.
    #[must_use]
    pub const fn current_values(&self) -> &PropertyValues {
        &self.current_values
    }

    /// Returns true if the property is marked as modified.
    #[must_use]
    pub fn is_modified(&self, name: &str) -> bool {
        self.modified.contains(name)
    }

    /// Returns true if any property is marked as modified.
    #[must_use]
    pub fn has_modified_properties(&self) -> bool {
        !self.modified.is_empty()
    }

    /// Iterates over the modified property names in order.
    pub fn modified_properties(&self) -> impl Iterator<Item = &str> {
        self.modified.iter().map(String::as_str)
    }

    /// Moves the record to `state`.
    ///
    /// `Unchanged` accepts the current values as the new originals.
    /// `Modified` with no modified properties marks every property.
    pub(crate) fn set_state(&mut self, state: EntityState) {
        match state {
            EntityState::Unchanged => self.accept_current_values(),
            EntityState::Modified if self.modified.is_empty() => {
                self.modified = self.current_values.names().map(str::to_string).collect();
            }
            _ => {}
        }
        self.state = state;
    }

    /// Sets a current value and updates the modified flag for it.
    ///
    /// Returns true if the property now differs from its original value.
    pub(crate) fn set_value(&mut self, name: &str, value: Value) -> bool {
        let differs: bool = self.original_values.get(name) != Some(&value);
        self.current_values.set(name, value);

        if differs {
            self.modified.insert(name.to_string());
        } else {
            self.modified.remove(name);
        }
        differs
    }

    fn accept_current_values(&mut self) {
        self.original_values = self.current_values.clone();
        self.modified.clear();
    }
}

/// Public, read-only view over a tracked record.
///
/// A handle borrows the record and cannot outlive it.
#[derive(Debug, Clone)]
pub struct EntityEntry<'a> {
    internal: &'a InternalEntry,
}

impl<'a> EntityEntry<'a> {
    /// Wraps a record. Does not touch the record.
    #[must_use]
    pub const fn new(internal: &'a InternalEntry) -> Self {
        Self { internal }
    }

    /// Returns the identity of the entity.
    #[must_use]
    pub const fn key(&self) -> &'a EntityKey {
        self.internal.key()
    }

    /// Returns the state of the record.
    #[must_use]
    pub const fn state(&self) -> EntityState {
        self.internal.state()
    }

    /// Returns the current value of a property.
    #[must_use]
    pub fn current_value(&self, name: &str) -> Option<&'a Value> {
        self.internal.current_values().get(name)
    }

    /// Returns the original value of a property.
    #[must_use]
    pub fn original_value(&self, name: &str) -> Option<&'a Value> {
        self.internal.original_values().get(name)
    }

    /// Returns all current values.
    #[must_use]
    pub const fn current_values(&self) -> &'a PropertyValues {
        self.internal.current_values()
    }

    /// Returns all original values.
    #[must_use]
    pub const fn original_values(&self) -> &'a PropertyValues {
        self.internal.original_values()
    }

    /// Returns true if the property is marked as modified.
    #[must_use]
    pub fn is_modified(&self, name: &str) -> bool {
        self.internal.is_modified(name)
    }

    /// Returns the modified property names in order.
    #[must_use]
    pub fn modified_properties(&self) -> Vec<&'a str> {
        self.internal.modified_properties().collect()
    }

    /// Returns true if this handle wraps `internal` itself, not an equal copy.
    #[must_use]
    pub fn wraps(&self, internal: &InternalEntry) -> bool {
        std::ptr::eq(self.internal, internal)
    }
}

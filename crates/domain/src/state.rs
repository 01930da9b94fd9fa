// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tracking states for entity instances.
//!
//! The state describes how an in-memory entity relates to its row in the
//! store. Which transitions between states are allowed is decided by the
//! change tracker, not by this type.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The state of an entity as seen by the change tracker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum EntityState {
    /// The entity is not being tracked.
    #[default]
    Detached,
    /// The entity is tracked and matches the values in the store.
    Unchanged,
    /// The entity is tracked and will be deleted from the store.
    Deleted,
    /// The entity is tracked and some of its property values were changed.
    Modified,
    /// The entity is tracked but does not yet exist in the store.
    Added,
}

impl EntityState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Detached,
        Self::Unchanged,
        Self::Deleted,
        Self::Modified,
        Self::Added,
    ];

    /// Converts this state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detached => "Detached",
            Self::Unchanged => "Unchanged",
            Self::Deleted => "Deleted",
            Self::Modified => "Modified",
            Self::Added => "Added",
        }
    }

    /// Returns true if saving would write this entity to the store.
    #[must_use]
    pub const fn has_pending_changes(&self) -> bool {
        matches!(self, Self::Added | Self::Modified | Self::Deleted)
    }
}

impl FromStr for EntityState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Detached" => Ok(Self::Detached),
            "Unchanged" => Ok(Self::Unchanged),
            "Deleted" => Ok(Self::Deleted),
            "Modified" => Ok(Self::Modified),
            "Added" => Ok(Self::Added),
            _ => Err(DomainError::InvalidEntityState(s.to_string())),
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

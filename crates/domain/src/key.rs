// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::Serialize;

/// Identity of one entity instance: its type name plus its primary key.
///
/// The tracker keeps at most one entry per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityKey {
    entity_type: String,
    key: String,
}

impl EntityKey {
    /// Creates a new entity key.
    ///
    /// Both parts are trimmed.
    ///
    /// # Arguments
    ///
    /// * `entity_type` - The name of the entity type (e.g., "Sample")
    /// * `key` - The primary key value rendered as text
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEntityKey` if either part is empty.
    pub fn new(entity_type: &str, key: &str) -> Result<Self, DomainError> {
        let entity_type: &str = entity_type.trim();
        let key: &str = key.trim();

        if entity_type.is_empty() {
            return Err(DomainError::InvalidEntityKey(String::from(
                "entity type cannot be empty",
            )));
        }
        if key.is_empty() {
            return Err(DomainError::InvalidEntityKey(format!(
                "key value for {entity_type} cannot be empty"
            )));
        }

        Ok(Self {
            entity_type: entity_type.to_string(),
            key: key.to_string(),
        })
    }

    /// Returns the entity type name.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the primary key value.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.entity_type, self.key)
    }
}

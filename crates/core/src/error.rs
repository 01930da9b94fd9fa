// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rowtrack_domain::{DomainError, EntityKey};
use thiserror::Error;

/// Errors returned by change tracker operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// No entity with this key is being tracked.
    #[error("Entity {0} is not being tracked")]
    NotTracked(EntityKey),

    /// An entity with this key is already being tracked.
    #[error("Entity {0} is already being tracked")]
    AlreadyTracked(EntityKey),

    /// The entity is marked for deletion and cannot be edited.
    #[error("Entity {0} is marked as deleted")]
    EntityDeleted(EntityKey),

    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    Domain(#[from] DomainError),
}

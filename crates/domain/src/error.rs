// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while building domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The string does not name a tracking state.
    InvalidEntityState(String),
    /// An entity key is missing its type name or key value.
    InvalidEntityKey(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEntityState(state) => write!(f, "Invalid entity state: {state}"),
            Self::InvalidEntityKey(msg) => write!(f, "Invalid entity key: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}

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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Change tracking for entity instances.
//!
//! The [`ChangeTracker`] owns one [`InternalEntry`] per tracked entity and
//! moves it between [`EntityState`]s. Every transition is announced twice to
//! registered observers: once before it is applied and once after, each time
//! as an [`EntityStateChange`].

pub mod diagnostics;
mod entry;
mod error;
mod notification;
mod tracker;

#[cfg(test)]
mod tests;

// Re-export public types
pub use entry::{EntityEntry, InternalEntry};
pub use error::TrackerError;
pub use notification::{EntityStateChange, EntityTracked};
pub use tracker::ChangeTracker;

pub use rowtrack_domain::{DomainError, EntityKey, EntityState, PropertyValues};

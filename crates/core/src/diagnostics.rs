// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Structured logging of tracker notifications.

use crate::tracker::ChangeTracker;
use tracing::{debug, trace};

/// Registers observers that log every notification raised by `tracker`.
///
/// "Changing" notifications are logged at `trace`, "changed" and "tracked"
/// notifications at `debug`.
pub fn log_state_changes(tracker: &mut ChangeTracker) {
    tracker.on_state_changing(|change| {
        trace!(
            entity = %change.entry().key(),
            old_state = %change.old_state(),
            new_state = %change.new_state(),
            from_query = change.from_query(),
            "Entity state changing"
        );
    });

    tracker.on_state_changed(|change| {
        debug!(
            entity = %change.entry().key(),
            old_state = %change.old_state(),
            new_state = %change.new_state(),
            from_query = change.from_query(),
            "Entity state changed"
        );
    });

    tracker.on_tracked(|tracked| {
        debug!(
            entity = %tracked.entry().key(),
            state = %tracked.entry().state(),
            from_query = tracked.from_query(),
            "Entity tracked"
        );
    });
}

//! Dispatch cycle - the scope of the at-most-once guarantee
//!
//! One publish action can surface as many domain events in a single catch-up
//! batch. The caller creates one `DispatchCycle` per batch and passes it by
//! mutable reference into every `notify` call of that batch; the dispatcher
//! consumes it on the first dispatch attempt. Cycles are never shared across
//! batches, so no locking is involved.

/// Tracks whether a notification went out in the current batch.
#[derive(Debug, Default)]
pub struct DispatchCycle {
    notified: bool,
}

impl DispatchCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a dispatch attempt was made in this cycle.
    pub fn is_notified(&self) -> bool {
        self.notified
    }

    pub(crate) fn mark_notified(&mut self) {
        self.notified = true;
    }
}

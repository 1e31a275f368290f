//! Item id generation.
//!
//! Ids are epoch milliseconds bumped past the last issued or observed id,
//! so two items created within one clock tick still get distinct ids.

use crate::model::item::ItemId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic, time-seeded id source.
#[derive(Debug, Clone)]
pub struct IdSequence {
    last: ItemId,
    clock: fn() -> ItemId,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::with_clock(now_epoch_ms)
    }

    /// Uses a caller-provided clock returning epoch milliseconds.
    pub fn with_clock(clock: fn() -> ItemId) -> Self {
        Self { last: 0, clock }
    }

    /// Returns a fresh id strictly greater than every id seen so far.
    ///
    /// Returns `None` once `ItemId::MAX` has been issued or observed.
    pub fn next_id(&mut self) -> Option<ItemId> {
        let floor = self.last.checked_add(1)?;
        let id = (self.clock)().max(floor);
        self.last = id;
        Some(id)
    }

    /// Records an externally created id so it is never issued again.
    pub fn observe(&mut self, id: ItemId) {
        self.last = self.last.max(id);
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

fn now_epoch_ms() -> ItemId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| ItemId::try_from(elapsed.as_millis()).unwrap_or(ItemId::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::IdSequence;

    fn frozen_clock() -> i64 {
        1_700_000_000_000
    }

    #[test]
    fn same_tick_ids_are_strictly_increasing() {
        let mut ids = IdSequence::with_clock(frozen_clock);
        let first = ids.next_id().unwrap();
        let second = ids.next_id().unwrap();
        let third = ids.next_id().unwrap();

        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        assert_eq!(third, second + 1);
    }

    #[test]
    fn observed_ids_are_skipped() {
        let mut ids = IdSequence::with_clock(frozen_clock);
        ids.observe(1_800_000_000_000);
        assert_eq!(ids.next_id(), Some(1_800_000_000_001));
    }

    #[test]
    fn system_clock_ids_look_like_epoch_millis() {
        let mut ids = IdSequence::new();
        assert!(ids.next_id().unwrap() > 1_600_000_000_000);
    }

    #[test]
    fn sequence_is_exhausted_after_max_id() {
        let mut ids = IdSequence::with_clock(frozen_clock);
        ids.observe(i64::MAX - 1);
        assert_eq!(ids.next_id(), Some(i64::MAX));
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.next_id(), None);
    }
}

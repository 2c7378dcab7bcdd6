//! In-process latest-wins handoff cell.
//!
//! Generalizes the heartbeat/staleness protocol the teacher implements over
//! a memory-mapped segment (`P2pSegmentHeader`) to a single in-process
//! value: PixEagle runs as one OS process with cooperating tasks rather than
//! a constellation of processes talking over shared memory, so there is no
//! mapping to set up, only a cell that never blocks a writer behind a reader
//! and always hands a reader the most recent value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;

/// A single-cell "mailbox" holding the most recently published value of `T`.
///
/// `publish` always overwrites; readers never see a partially-written value
/// because the write is behind the lock, and never block a writer because
/// reads take the lock only long enough to clone out.
pub struct LatestWinsSlot<T: Clone> {
    value: RwLock<Option<(T, Instant)>>,
    heartbeat: AtomicU64,
}

impl<T: Clone> LatestWinsSlot<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            heartbeat: AtomicU64::new(0),
        }
    }

    /// Overwrites the cell and bumps the heartbeat counter.
    pub fn publish(&self, value: T) {
        *self.value.write() = Some((value, Instant::now()));
        self.heartbeat.fetch_add(1, Ordering::Release);
    }

    /// Returns a clone of the most recently published value and its age,
    /// or `None` if nothing has ever been published.
    pub fn peek(&self) -> Option<(T, std::time::Duration)> {
        let guard = self.value.read();
        guard
            .as_ref()
            .map(|(value, at)| (value.clone(), at.elapsed()))
    }

    /// Monotonic count of `publish` calls, usable as a cheap change signal
    /// without cloning the value.
    pub fn heartbeat(&self) -> u64 {
        self.heartbeat.load(Ordering::Acquire)
    }

    /// True if the most recent publish is older than `max_age`, or nothing
    /// has been published yet.
    pub fn is_stale(&self, max_age: std::time::Duration) -> bool {
        match self.peek() {
            Some((_, age)) => age > max_age,
            None => true,
        }
    }
}

impl<T: Clone> Default for LatestWinsSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn peek_returns_none_before_first_publish() {
        let slot: LatestWinsSlot<u32> = LatestWinsSlot::new();
        assert!(slot.peek().is_none());
        assert!(slot.is_stale(Duration::from_secs(1)));
    }

    #[test]
    fn publish_overwrites_and_bumps_heartbeat() {
        let slot = LatestWinsSlot::new();
        slot.publish(1);
        assert_eq!(slot.heartbeat(), 1);
        slot.publish(2);
        assert_eq!(slot.heartbeat(), 2);
        let (value, _) = slot.peek().unwrap();
        assert_eq!(value, 2);
    }

    #[test]
    fn fresh_publish_is_not_stale() {
        let slot = LatestWinsSlot::new();
        slot.publish(42);
        assert!(!slot.is_stale(Duration::from_secs(5)));
    }
}

//! Ping-pong raw frame store
//!
//! Two frame slots, each behind its own async mutex. The acquisition side
//! fills one slot while the render side may be reading the other; both
//! sides take the slot lock, so a slot is never read mid-write.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

use super::raw::RawFrame;

/// One of the two frame slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// The opposite slot
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    /// Array index of this slot (0 or 1)
    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Two independently lockable raw frames
pub struct FrameStore<M: RawMutex> {
    slots: [Mutex<M, RawFrame>; 2],
}

impl<M: RawMutex> FrameStore<M> {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            slots: [Mutex::new(RawFrame::new()), Mutex::new(RawFrame::new())],
        }
    }

    /// Lock a slot; the lock is released when the guard is dropped
    pub async fn lock(&self, slot: Slot) -> MutexGuard<'_, M, RawFrame> {
        self.slots[slot.index()].lock().await
    }

    /// Overwrite a slot under its lock
    pub async fn write<R>(&self, slot: Slot, f: impl FnOnce(&mut RawFrame) -> R) -> R {
        let mut frame = self.lock(slot).await;
        f(&mut frame)
    }

    /// Inspect a slot under its lock
    pub async fn read<R>(&self, slot: Slot, f: impl FnOnce(&RawFrame) -> R) -> R {
        let frame = self.lock(slot).await;
        f(&frame)
    }

    /// Check whether a slot is currently held by someone
    pub fn is_locked(&self, slot: Slot) -> bool {
        self.slots[slot.index()].try_lock().is_err()
    }
}

impl<M: RawMutex> Default for FrameStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

//! Coalescing notification mailboxes
//!
//! Each execution context owns one mailbox. Senders OR event bits into the
//! pending set; the owner takes (and clears) the whole set once per loop
//! iteration. Repeated events of one kind between two takes are seen once,
//! and the order between different kinds is not preserved.

use core::marker::PhantomData;

use portable_atomic::{AtomicU32, Ordering};

use crate::frame::Slot;

/// A set of event bits that can travel through a [`Mailbox`]
pub trait Flags: Copy {
    fn bits(self) -> u32;
    fn from_bits(bits: u32) -> Self;
}

macro_rules! flag_set {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $flag:ident = $bit:expr,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name(u32);

        impl $name {
            $($(#[$fmeta])* pub const $flag: Self = Self($bit);)*

            /// The empty set
            pub const fn empty() -> Self {
                Self(0)
            }

            pub fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// True if every bit of `other` is set
            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0 && other.0 != 0
            }

            pub fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl Flags for $name {
            fn bits(self) -> u32 {
                self.0
            }

            fn from_bits(bits: u32) -> Self {
                Self(bits)
            }
        }
    };
}

flag_set! {
    /// Events for the video context
    VideoNotify {
        /// Raw slot A holds a new frame
        FRAME_A = 0x01,
        /// Raw slot B holds a new frame
        FRAME_B = 0x02,
        /// Short press: next value of the active parameter
        PARAM_VALUE = 0x10,
        /// Long press: commit and move to the next parameter group
        PARAM_SELECT = 0x20,
    }
}

impl VideoNotify {
    /// Frame-ready bit for a slot
    pub fn frame_ready(slot: Slot) -> Self {
        match slot {
            Slot::A => Self::FRAME_A,
            Slot::B => Self::FRAME_B,
        }
    }
}

flag_set! {
    /// Events for the control context
    ControlNotify {
        STARTUP_DONE = 0x01,
        FAULT = 0x02,
        FAULT_CLEAR = 0x04,
    }
}

/// Non-queued event mailbox
pub struct Mailbox<F> {
    pending: AtomicU32,
    _flags: PhantomData<F>,
}

impl<F: Flags> Mailbox<F> {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
            _flags: PhantomData,
        }
    }

    /// Merge events into the pending set
    pub fn post(&self, flags: F) {
        self.pending.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    /// Take and clear all pending events
    pub fn take(&self) -> F {
        F::from_bits(self.pending.swap(0, Ordering::AcqRel))
    }
}

impl<F: Flags> Default for Mailbox<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_event_coalesces() {
        let mb: Mailbox<VideoNotify> = Mailbox::new();
        mb.post(VideoNotify::PARAM_VALUE);
        mb.post(VideoNotify::PARAM_VALUE);

        let taken = mb.take();
        assert_eq!(taken, VideoNotify::PARAM_VALUE);
        assert!(mb.take().is_empty());
    }

    #[test]
    fn test_different_events_merge() {
        let mb: Mailbox<ControlNotify> = Mailbox::new();
        mb.post(ControlNotify::FAULT);
        mb.post(ControlNotify::FAULT_CLEAR);

        let taken = mb.take();
        assert!(taken.contains(ControlNotify::FAULT));
        assert!(taken.contains(ControlNotify::FAULT_CLEAR));
        assert!(!taken.contains(ControlNotify::STARTUP_DONE));
    }

    #[test]
    fn test_empty_never_contained() {
        assert!(!VideoNotify::FRAME_A.contains(VideoNotify::empty()));
        assert!((VideoNotify::FRAME_A | VideoNotify::FRAME_B).contains(VideoNotify::FRAME_B));
    }
}

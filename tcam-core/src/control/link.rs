//! Fault reporting path into the control context
//!
//! Any context may report or clear a fault. The code goes into a shared
//! cell and a bit into the control mailbox; the control context reads both
//! once per tick.

use portable_atomic::{AtomicU8, Ordering};

use crate::notify::{ControlNotify, Mailbox};

use super::fault::FaultCode;

/// Shared fault cell plus the control mailbox
pub struct ControlLink {
    fault: AtomicU8,
    mailbox: Mailbox<ControlNotify>,
}

impl ControlLink {
    pub const fn new() -> Self {
        Self {
            fault: AtomicU8::new(0),
            mailbox: Mailbox::new(),
        }
    }

    /// Signal that all contexts finished starting
    pub fn startup_done(&self) {
        self.mailbox.post(ControlNotify::STARTUP_DONE);
    }

    /// Report a fault; the newest report replaces the previous code
    pub fn report_fault(&self, code: FaultCode) {
        self.fault.store(code.as_u8(), Ordering::Release);
        self.mailbox.post(ControlNotify::FAULT);
    }

    /// Clear `code` if it is still the active fault
    ///
    /// Returns false if another fault replaced it in the meantime.
    pub fn clear_fault(&self, code: FaultCode) -> bool {
        let cleared = self
            .fault
            .compare_exchange(code.as_u8(), 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if cleared {
            self.mailbox.post(ControlNotify::FAULT_CLEAR);
        }
        cleared
    }

    /// Active fault code, if any
    pub fn current_fault(&self) -> Option<FaultCode> {
        FaultCode::from_u8(self.fault.load(Ordering::Acquire))
    }

    /// Take pending notifications together with the fault cell
    pub fn take(&self) -> (ControlNotify, Option<FaultCode>) {
        let notifications = self.mailbox.take();
        (notifications, self.current_fault())
    }
}

impl Default for ControlLink {
    fn default() -> Self {
        Self::new()
    }
}

//! Inter-task communication
//!
//! Statics shared by the acquisition, video and control contexts. Each
//! context owns one mailbox; the frame store is the only shared data that
//! needs exclusion.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use static_cell::ConstStaticCell;

use tcam_core::control::ControlLink;
use tcam_core::frame::FrameStore;
use tcam_core::handoff::DisplayHandoff;
use tcam_core::notify::{Mailbox, VideoNotify};

/// Ping-pong raw frames written by acquisition, read by video
pub static FRAME_STORE: FrameStore<CriticalSectionRawMutex> = FrameStore::new();

/// Frame-ready and button events for the video context
pub static VIDEO_NOTIFY: Mailbox<VideoNotify> = Mailbox::new();

/// Fault cell and mailbox of the control context
pub static CONTROL: ControlLink = ControlLink::new();

/// Emissivity change (percent) for the sensor
pub static EMISSIVITY: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Radiometric capability of the sensor, published after each bring-up
pub static RADIOMETRIC: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Rendered images, placed in static memory instead of a task stack
static HANDOFF: ConstStaticCell<DisplayHandoff> = ConstStaticCell::new(DisplayHandoff::new());

/// Claim the display handoff buffers
///
/// Returns `None` if they were already claimed.
pub fn take_handoff() -> Option<&'static mut DisplayHandoff> {
    HANDOFF.try_take()
}

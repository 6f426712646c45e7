//! Embassy async tasks
//!
//! Each task runs independently and communicates through the statics in
//! [`crate::channels`]. The tasks are generic over the board's drivers;
//! the board crate wraps each one in an `#[embassy_executor::task]` with
//! its concrete types.

pub mod acquisition;
pub mod control;
pub mod video;

pub use acquisition::acquisition_task;
pub use control::control_task;
pub use video::video_task;

//! tcam thermal camera application
//!
//! Three contexts run forever on fixed periods:
//!
//! ```text
//!   acquisition ──frame ready──▶ video ◀──button── control
//!        │                        │                   ▲
//!        └──────── faults ────────┴───────────────────┘
//! ```
//!
//! - [`tasks::acquisition_task`]: sensor bring-up, streaming, recovery
//! - [`tasks::video_task`]: rendering, presentation, parameter session
//! - [`tasks::control_task`]: status LED, fault blinking, button
//!
//! The board crate constructs the drivers, spawns the three tasks and calls
//! [`startup_complete`] once they are running.

#![no_std]
#![deny(unsafe_code)]

pub mod channels;
pub mod tasks;

pub use channels::take_handoff;

/// Tell the control context that every task has started
pub fn startup_complete() {
    defmt::info!("Startup complete");
    channels::CONTROL.startup_done();
}

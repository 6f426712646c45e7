//! Control and fault management
//!
//! Owns the user-visible status LED, the startup/run/fault lifecycle and
//! the button. Other contexts report faults through a [`ControlLink`].

pub mod button;
pub mod fault;
pub mod led;
pub mod link;
pub mod machine;

pub use button::{Button, Press};
pub use fault::{ErrorClass, FaultCode};
pub use led::{LedColor, StatusLed};
pub use link::ControlLink;
pub use machine::{ControlEvent, ControlManager, ControlOutput, ControlState, LedState, Resume};

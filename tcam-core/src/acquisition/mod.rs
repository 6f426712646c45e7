//! Sensor acquisition
//!
//! State machine and controller that keep frames flowing from the sensor
//! into the [`FrameStore`](crate::frame::FrameStore).

pub mod controller;
pub mod state;

pub use controller::{open_fault, AcquisitionController, FaultUpdate, StepReport};
pub use state::{AcquisitionEvent, AcquisitionState};

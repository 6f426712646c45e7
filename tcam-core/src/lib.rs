//! Board-agnostic core logic for the tcam thermal camera
//!
//! This crate contains all camera logic that does not depend on a specific
//! board:
//!
//! - Raw frame model and the ping-pong frame store
//! - Sensor acquisition state machine and desync recovery
//! - Render pipeline (scaling, 2x doubling, overlays)
//! - Display handoff between rendered images and the video frame buffer
//! - Parameter session and persisted user settings
//! - Control/fault lifecycle, status LED and button handling
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod acquisition;
pub mod config;
pub mod control;
pub mod frame;
pub mod handoff;
pub mod notify;
pub mod params;
pub mod render;
pub mod settings;
pub mod traits;

//! tcam Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing traits the camera pipeline is
//! written against. Board support code implements them for the concrete
//! button, LEDs, settings flash and composite video driver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tcam-app (acquisition/video/control)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tcam-core (pipeline logic)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tcam-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board support (pins, NVS, video DAC)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`storage::SettingsStore`] - Persistent user settings
//! - [`video::VideoOutput`] - Analog video frame buffer driver

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod storage;
pub mod video;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLow, InputPin, OutputPin};
pub use storage::{SettingKey, SettingsStore, StorageError};
pub use video::{PixelFormat, VideoError, VideoMode, VideoOutput, VideoStandard};

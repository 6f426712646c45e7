//! Configuration types
//!
//! Board-agnostic timing and behaviour settings. User-facing settings
//! (palette, emissivity, units) are persisted separately, see
//! [`crate::settings`].

pub mod types;

pub use types::*;

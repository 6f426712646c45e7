//! Raw frames and the shared ping-pong frame store

pub mod raw;
pub mod store;

pub use raw::{
    telemetry, PixelCoord, RawFrame, SpotRegion, SENSOR_HEIGHT, SENSOR_PIXELS, SENSOR_WIDTH,
    TELEMETRY_WORDS,
};
pub use store::{FrameStore, Slot};

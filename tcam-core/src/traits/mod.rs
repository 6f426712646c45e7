//! Device traits implemented outside the core
//!
//! Only the sensor interface lives here because it exchanges [`RawFrame`]s;
//! pins, settings storage and the video driver are in `tcam-hal`.
//!
//! [`RawFrame`]: crate::frame::RawFrame

pub mod sensor;

pub use sensor::{
    FrameSource, GainMode, InterfaceError, PartNumber, SegmentStatus, SensorError, SensorInfo,
    SensorModel, SensorSettings, PART_NUMBER_LEN,
};

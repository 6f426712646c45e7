//! Thermal sensor frame source
//!
//! The low-level packet protocol (control bus commands, segment framing on
//! the stream bus) lives in the driver. The acquisition controller only sees
//! bring-up, a blocking wait for the segment sync edge, one transfer per
//! edge and extraction of a completed frame.

use core::future::Future;

use heapless::String;

use crate::frame::RawFrame;

/// Longest part number string the sensor reports
pub const PART_NUMBER_LEN: usize = 32;

/// Part number read back during bring-up
pub type PartNumber = String<PART_NUMBER_LEN>;

/// Errors from sensor bring-up or control commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not answer on the control bus
    NoResponse,
    /// A configuration readback did not match what was written
    ConfigMismatch,
    /// Control bus transaction failed
    Bus,
}

/// Errors opening the host-side sensor interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError {
    /// Control (command) interface could not be opened
    Control,
    /// Stream (video packet) interface could not be opened
    Stream,
}

/// Outcome of one segment transfer
///
/// Only [`SegmentStatus::FrameComplete`] counts as progress; a pending
/// segment is a miss as far as sync tracking goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentStatus {
    /// The last segment of a frame arrived; the frame can be extracted
    FrameComplete,
    /// A segment arrived but the frame is not finished yet
    Pending,
    /// Transfer failed or was out of sync
    Missed,
}

impl SegmentStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, SegmentStatus::FrameComplete)
    }
}

/// Sensor gain mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GainMode {
    High,
    Low,
    #[default]
    Auto,
}

/// Settings applied during sensor bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSettings {
    /// Use sensor-side AGC instead of radiometric TLinear output
    pub agc_enabled: bool,
    /// Scene emissivity in percent
    pub emissivity: u8,
    pub gain: GainMode,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            agc_enabled: true,
            emissivity: 97,
            gain: GainMode::Auto,
        }
    }
}

/// Known sensor variants, identified by part number prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorModel {
    /// 500-0771, radiometric
    Lepton35,
    /// 500-0758, radiometric
    Lepton31,
    /// 500-0726, not radiometric
    Lepton30,
    /// Anything else; treated as radiometric
    Unknown,
}

impl SensorModel {
    /// Identify the variant from the part number string
    pub fn from_part_number(part: &str) -> Self {
        let prefix = part.get(..8).unwrap_or(part);
        match prefix {
            "500-0771" => SensorModel::Lepton35,
            "500-0758" => SensorModel::Lepton31,
            "500-0726" => SensorModel::Lepton30,
            _ => SensorModel::Unknown,
        }
    }

    pub fn is_radiometric(self) -> bool {
        !matches!(self, SensorModel::Lepton30)
    }
}

/// What bring-up learned about the attached sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorInfo {
    pub model: SensorModel,
    pub radiometric: bool,
}

impl SensorInfo {
    pub fn new(model: SensorModel) -> Self {
        Self {
            model,
            radiometric: model.is_radiometric(),
        }
    }

    pub fn from_part_number(part: &str) -> Self {
        Self::new(SensorModel::from_part_number(part))
    }
}

/// Source of raw thermal frames
pub trait FrameSource {
    /// Open the control and stream interfaces
    fn open(&mut self) -> Result<(), InterfaceError>;

    /// Ping and configure the sensor, returning its part number
    fn init(&mut self, settings: &SensorSettings) -> impl Future<Output = Result<PartNumber, SensorError>>;

    /// Current level of the segment sync line
    fn segment_ready(&self) -> bool;

    /// Wait for the next segment sync edge, returning its time in microseconds
    fn wait_segment_sync(&mut self) -> impl Future<Output = u64>;

    /// Pull the segment announced by the sync edge at `sync_at_us`
    fn transfer_segment(&mut self, sync_at_us: u64) -> impl Future<Output = SegmentStatus>;

    /// Copy the most recently completed frame into `dest`
    ///
    /// Implementations fill pixels and telemetry through [`RawFrame::load`]
    /// so the extrema are current.
    fn extract_frame(&mut self, dest: &mut RawFrame);

    /// Set the scene emissivity in percent
    fn set_emissivity(&mut self, percent: u8) -> impl Future<Output = Result<(), SensorError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_from_part_number() {
        assert_eq!(SensorModel::from_part_number("500-0771-01"), SensorModel::Lepton35);
        assert_eq!(SensorModel::from_part_number("500-0758-01"), SensorModel::Lepton31);
        assert_eq!(SensorModel::from_part_number("500-0726-01"), SensorModel::Lepton30);
        assert_eq!(SensorModel::from_part_number("500-0999"), SensorModel::Unknown);
        assert_eq!(SensorModel::from_part_number("500"), SensorModel::Unknown);
    }

    #[test]
    fn test_unknown_treated_as_radiometric() {
        assert!(SensorInfo::new(SensorModel::Unknown).radiometric);
        assert!(SensorInfo::new(SensorModel::Lepton35).radiometric);
        assert!(!SensorInfo::new(SensorModel::Lepton30).radiometric);
    }

    #[test]
    fn test_info_from_part_number() {
        let info = SensorInfo::from_part_number("500-0726-01");
        assert_eq!(info.model, SensorModel::Lepton30);
        assert!(!info.radiometric);
    }

    #[test]
    fn test_default_settings_use_sensor_agc() {
        let settings = SensorSettings::default();
        assert!(settings.agc_enabled);
        assert_eq!(settings.gain, GainMode::Auto);
        assert_eq!(settings.emissivity, 97);
    }
}

//! Render options (GUI state)

use crate::frame::RawFrame;

/// Palette/marker setting: markers and spotmeter on
pub const PALETTE_MARKER_MARKERS: i32 = 0x01;

/// Palette/marker setting: black-hot palette
pub const PALETTE_MARKER_BLACK_HOT: i32 = 0x02;

/// Switches that control how a frame is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderOptions {
    /// Frame carries sensor-side AGC output (from telemetry)
    pub agc_active: bool,
    /// Invert the image so hot is dark
    pub black_hot: bool,
    /// Use the interpolating doubler instead of pixel replication
    pub interpolate: bool,
    /// Sensor reports calibrated temperatures
    pub radiometric: bool,
    /// Draw min/max markers
    pub markers: bool,
    /// Draw the spotmeter (radiometric sensors only)
    pub spotmeter: bool,
    /// Show temperatures in Celsius instead of Fahrenheit
    pub celsius: bool,
    /// Radiometric values are in 0.01 K (from telemetry)
    pub high_res: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            agc_active: false,
            black_hot: false,
            interpolate: true,
            radiometric: true,
            markers: false,
            spotmeter: false,
            celsius: false,
            high_res: true,
        }
    }
}

impl RenderOptions {
    /// XOR mask applied to every output pixel
    pub fn palette_mask(&self) -> u8 {
        if self.black_hot {
            0xFF
        } else {
            0x00
        }
    }

    /// Apply the palette/marker setting (bit0 markers, bit1 black-hot)
    pub fn apply_palette_marker(&mut self, value: i32) {
        let markers = value & PALETTE_MARKER_MARKERS != 0;
        self.black_hot = value & PALETTE_MARKER_BLACK_HOT != 0;
        self.markers = markers;
        self.spotmeter = markers;
    }

    /// Apply the units setting (0 imperial, otherwise metric)
    pub fn apply_units(&mut self, value: i32) {
        self.celsius = value != 0;
    }

    /// Refresh the per-frame flags from a frame's telemetry
    pub fn update_from_frame(&mut self, frame: &RawFrame) {
        self.agc_active = frame.agc_active();
        self.high_res = frame.high_res_radiometry();
    }

    /// Spotmeter is drawn only for radiometric sensors
    pub fn show_spotmeter(&self) -> bool {
        self.spotmeter && self.radiometric
    }
}

//! Raw sensor frame with telemetry and derived extrema

/// Sensor frame width in pixels
pub const SENSOR_WIDTH: usize = 160;

/// Sensor frame height in pixels
pub const SENSOR_HEIGHT: usize = 120;

/// Number of pixels in one sensor frame
pub const SENSOR_PIXELS: usize = SENSOR_WIDTH * SENSOR_HEIGHT;

/// Telemetry words per frame (3 packets of 80 words)
pub const TELEMETRY_WORDS: usize = 240;

/// Telemetry word indices used by the pipeline
pub mod telemetry {
    /// Status word, low half
    pub const STATUS_LOW: usize = 3;
    /// Status word, high half
    pub const STATUS_HIGH: usize = 4;
    /// Scene emissivity (scaled to 8192)
    pub const EMISSIVITY: usize = 99;
    /// Non-zero when TLinear values are in 0.01 K units
    pub const TLINEAR_RESOLUTION: usize = 209;
    /// Mean value inside the spotmeter region
    pub const SPOT_MEAN: usize = 210;
    /// Spotmeter region first row
    pub const SPOT_Y1: usize = 214;
    /// Spotmeter region first column
    pub const SPOT_X1: usize = 215;
    /// Spotmeter region last row
    pub const SPOT_Y2: usize = 216;
    /// Spotmeter region last column
    pub const SPOT_X2: usize = 217;

    /// AGC state bit in the 32-bit status word
    pub const STATUS_AGC_STATE: u32 = 0x0000_1000;
}

/// Pixel coordinate in sensor space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelCoord {
    pub x: u16,
    pub y: u16,
}

/// Spotmeter region reported by the sensor, in sensor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpotRegion {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

/// One sensor frame
///
/// Pixels are stored row-major. Extrema are the first occurrence in raster
/// order and are kept in sync by [`RawFrame::load`] and
/// [`RawFrame::refresh_extrema`].
#[derive(Clone)]
pub struct RawFrame {
    pixels: [u16; SENSOR_PIXELS],
    telemetry: [u16; TELEMETRY_WORDS],
    telemetry_valid: bool,
    min_value: u16,
    min_coord: PixelCoord,
    max_value: u16,
    max_coord: PixelCoord,
}

impl RawFrame {
    /// Create an all-zero frame without telemetry
    pub const fn new() -> Self {
        Self {
            pixels: [0; SENSOR_PIXELS],
            telemetry: [0; TELEMETRY_WORDS],
            telemetry_valid: false,
            min_value: 0,
            min_coord: PixelCoord { x: 0, y: 0 },
            max_value: 0,
            max_coord: PixelCoord { x: 0, y: 0 },
        }
    }

    /// Copy a complete frame and recompute its extrema
    ///
    /// Slices shorter than the frame leave the remaining words untouched.
    /// Passing `None` for telemetry marks it invalid.
    pub fn load(&mut self, pixels: &[u16], telemetry: Option<&[u16]>) {
        let n = pixels.len().min(SENSOR_PIXELS);
        self.pixels[..n].copy_from_slice(&pixels[..n]);
        match telemetry {
            Some(words) => {
                let n = words.len().min(TELEMETRY_WORDS);
                self.telemetry[..n].copy_from_slice(&words[..n]);
                self.telemetry_valid = true;
            }
            None => self.telemetry_valid = false,
        }
        self.refresh_extrema();
    }

    /// Recompute min/max after the pixels were modified in place
    pub fn refresh_extrema(&mut self) {
        let mut min = u16::MAX;
        let mut min_idx = 0;
        let mut max = u16::MIN;
        let mut max_idx = 0;

        for (i, &v) in self.pixels.iter().enumerate() {
            if v < min {
                min = v;
                min_idx = i;
            }
            if v > max {
                max = v;
                max_idx = i;
            }
        }

        self.min_value = min;
        self.min_coord = index_to_coord(min_idx);
        self.max_value = max;
        self.max_coord = index_to_coord(max_idx);
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }

    pub fn telemetry(&self) -> &[u16] {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut [u16] {
        &mut self.telemetry
    }

    pub fn telemetry_valid(&self) -> bool {
        self.telemetry_valid
    }

    pub fn set_telemetry_valid(&mut self, valid: bool) {
        self.telemetry_valid = valid;
    }

    /// Sample at sensor coordinate, `None` outside the frame
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x < SENSOR_WIDTH && y < SENSOR_HEIGHT {
            Some(self.pixels[y * SENSOR_WIDTH + x])
        } else {
            None
        }
    }

    pub fn min_value(&self) -> u16 {
        self.min_value
    }

    pub fn min_coord(&self) -> PixelCoord {
        self.min_coord
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn max_coord(&self) -> PixelCoord {
        self.max_coord
    }

    /// 32-bit status word assembled from its two telemetry halves
    pub fn status(&self) -> u32 {
        ((self.telemetry[telemetry::STATUS_HIGH] as u32) << 16)
            | self.telemetry[telemetry::STATUS_LOW] as u32
    }

    /// Sensor reports AGC output (pre-scaled 8-bit values)
    pub fn agc_active(&self) -> bool {
        self.status() & telemetry::STATUS_AGC_STATE == telemetry::STATUS_AGC_STATE
    }

    /// TLinear values are in 0.01 K rather than 0.1 K
    pub fn high_res_radiometry(&self) -> bool {
        self.telemetry[telemetry::TLINEAR_RESOLUTION] != 0
    }

    pub fn spot_region(&self) -> SpotRegion {
        SpotRegion {
            x1: self.telemetry[telemetry::SPOT_X1],
            y1: self.telemetry[telemetry::SPOT_Y1],
            x2: self.telemetry[telemetry::SPOT_X2],
            y2: self.telemetry[telemetry::SPOT_Y2],
        }
    }

    pub fn spot_mean(&self) -> u16 {
        self.telemetry[telemetry::SPOT_MEAN]
    }

    /// Scene emissivity reported by the sensor, scaled to 8192
    pub fn emissivity(&self) -> u16 {
        self.telemetry[telemetry::EMISSIVITY]
    }
}

impl Default for RawFrame {
    fn default() -> Self {
        Self::new()
    }
}

fn index_to_coord(index: usize) -> PixelCoord {
    PixelCoord {
        x: (index % SENSOR_WIDTH) as u16,
        y: (index / SENSOR_WIDTH) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extrema_first_occurrence() {
        let mut frame = RawFrame::new();
        frame.pixels_mut().fill(500);
        frame.pixels_mut()[SENSOR_WIDTH * 3 + 7] = 100;
        frame.pixels_mut()[SENSOR_WIDTH * 9 + 2] = 100;
        frame.pixels_mut()[SENSOR_WIDTH * 5 + 150] = 900;
        frame.refresh_extrema();

        assert_eq!(frame.min_value(), 100);
        assert_eq!(frame.min_coord(), PixelCoord { x: 7, y: 3 });
        assert_eq!(frame.max_value(), 900);
        assert_eq!(frame.max_coord(), PixelCoord { x: 150, y: 5 });
    }

    #[test]
    fn test_uniform_frame_extrema_at_origin() {
        let mut frame = RawFrame::new();
        frame.load(&[42; SENSOR_PIXELS], None);
        assert_eq!(frame.min_value(), 42);
        assert_eq!(frame.max_value(), 42);
        assert_eq!(frame.min_coord(), PixelCoord::default());
        assert_eq!(frame.max_coord(), PixelCoord::default());
        assert!(!frame.telemetry_valid());
    }

    #[test]
    fn test_status_and_agc() {
        let mut telem = [0u16; TELEMETRY_WORDS];
        telem[telemetry::STATUS_LOW] = 0x1000;
        telem[telemetry::STATUS_HIGH] = 0x0002;
        let mut frame = RawFrame::new();
        frame.load(&[0; SENSOR_PIXELS], Some(&telem));

        assert_eq!(frame.status(), 0x0002_1000);
        assert!(frame.agc_active());
        assert!(frame.telemetry_valid());

        frame.telemetry_mut()[telemetry::STATUS_LOW] = 0;
        assert!(!frame.agc_active());
    }

    #[test]
    fn test_spot_region_words() {
        let mut frame = RawFrame::new();
        let t = frame.telemetry_mut();
        t[telemetry::SPOT_X1] = 79;
        t[telemetry::SPOT_Y1] = 59;
        t[telemetry::SPOT_X2] = 80;
        t[telemetry::SPOT_Y2] = 60;
        t[telemetry::SPOT_MEAN] = 29515;
        t[telemetry::TLINEAR_RESOLUTION] = 1;

        assert_eq!(
            frame.spot_region(),
            SpotRegion { x1: 79, y1: 59, x2: 80, y2: 60 }
        );
        assert_eq!(frame.spot_mean(), 29515);
        assert!(frame.high_res_radiometry());
    }

    #[test]
    fn test_pixel_bounds() {
        let frame = RawFrame::new();
        assert_eq!(frame.pixel(159, 119), Some(0));
        assert_eq!(frame.pixel(160, 0), None);
        assert_eq!(frame.pixel(0, 120), None);
    }
}

//! Analog video output abstraction
//!
//! The video driver owns a single frame buffer that its signal generator
//! scans out continuously. Callers copy a finished image into it right
//! after the vertical sync so the copy never races the visible scan.

use crate::gpio::InputPin;

/// Analog broadcast standard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoStandard {
    /// 525 lines, 60 fields per second
    Ntsc,
    /// 625 lines, 50 fields per second
    Pal,
}

impl VideoStandard {
    /// Decode the board's format strap (pulled up = NTSC, grounded = PAL)
    pub fn from_sense<P: InputPin>(pin: &P) -> Self {
        if pin.is_high() {
            VideoStandard::Ntsc
        } else {
            VideoStandard::Pal
        }
    }
}

/// Frame buffer pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// One byte of luma per pixel
    Gray8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Requested output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoMode {
    pub width: u16,
    pub height: u16,
    pub format: PixelFormat,
    pub standard: VideoStandard,
}

impl VideoMode {
    /// Size of the frame buffer in bytes
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// Errors from the video driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoError {
    /// Frame buffer could not be allocated
    OutOfMemory,
    /// Requested mode is not supported by the signal generator
    UnsupportedMode,
    /// Driver peripheral setup failed
    Peripheral,
}

/// Video output driver
pub trait VideoOutput {
    /// Start the signal generator in the requested mode
    fn init(&mut self, mode: VideoMode) -> Result<(), VideoError>;

    /// The frame buffer being scanned out
    fn frame_buffer(&mut self) -> &mut [u8];

    /// Wait for the start of the next vertical blanking interval
    fn wait_vsync(&mut self) -> impl core::future::Future<Output = ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Strap(bool);

    impl InputPin for Strap {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_standard_from_sense() {
        assert_eq!(VideoStandard::from_sense(&Strap(true)), VideoStandard::Ntsc);
        assert_eq!(VideoStandard::from_sense(&Strap(false)), VideoStandard::Pal);
    }

    #[test]
    fn test_buffer_len() {
        let mode = VideoMode {
            width: 320,
            height: 240,
            format: PixelFormat::Gray8,
            standard: VideoStandard::Pal,
        };
        assert_eq!(mode.buffer_len(), 76_800);
    }
}

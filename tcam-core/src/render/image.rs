//! Rendered 8-bit grayscale image

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::prelude::*;

use crate::frame::{SENSOR_HEIGHT, SENSOR_WIDTH};

/// Linear upscaling factor from sensor to image
pub const SCALE_FACTOR: usize = 2;

/// Rendered image width in pixels
pub const IMAGE_WIDTH: usize = SENSOR_WIDTH * SCALE_FACTOR;

/// Rendered image height in pixels
pub const IMAGE_HEIGHT: usize = SENSOR_HEIGHT * SCALE_FACTOR;

/// Number of pixels in a rendered image
pub const IMAGE_PIXELS: usize = IMAGE_WIDTH * IMAGE_HEIGHT;

/// 320x240 luma raster
///
/// Implements [`DrawTarget`] so overlays can use the embedded-graphics
/// primitives. Drawing outside the raster is clipped.
#[derive(Clone)]
pub struct RenderedImage {
    pixels: [u8; IMAGE_PIXELS],
}

impl RenderedImage {
    pub const fn new() -> Self {
        Self {
            pixels: [0; IMAGE_PIXELS],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Luma at (x, y), `None` outside the image
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        index(x, y).map(|i| self.pixels[i])
    }

    /// Set luma at (x, y); ignored outside the image
    pub fn set(&mut self, x: i32, y: i32, luma: u8) {
        if let Some(i) = index(x, y) {
            self.pixels[i] = luma;
        }
    }
}

impl Default for RenderedImage {
    fn default() -> Self {
        Self::new()
    }
}

fn index(x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x as usize >= IMAGE_WIDTH || y as usize >= IMAGE_HEIGHT {
        return None;
    }
    Some(y as usize * IMAGE_WIDTH + x as usize)
}

impl OriginDimensions for RenderedImage {
    fn size(&self) -> Size {
        Size::new(IMAGE_WIDTH as u32, IMAGE_HEIGHT as u32)
    }
}

impl DrawTarget for RenderedImage {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.luma());
        }
        Ok(())
    }
}

//! Annotations drawn on top of the base raster
//!
//! Everything here draws through [`DrawTarget`] so the shapes are plain
//! embedded-graphics primitives. Coordinates are image pixels; sensor
//! coordinates are scaled by [`SCALE_FACTOR`] before drawing.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_8X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use super::image::{IMAGE_HEIGHT, IMAGE_WIDTH, SCALE_FACTOR};
use super::temperature::display_temperature;
use super::RenderOptions;
use crate::frame::{PixelCoord, RawFrame, SpotRegion};

/// Edge length of the min/max marker triangles
pub const MARKER_SIZE: i32 = 10;

/// Smallest spotmeter box edge
pub const SPOT_MIN_SIZE: i32 = 10;

/// Overlay text luma
pub const TEXT_COLOR: Gray8 = Gray8::new(250);

/// Overlay text background luma
pub const TEXT_BG_COLOR: Gray8 = Gray8::new(120);

const HUD_FONT: &MonoFont<'static> = &FONT_6X10;
const SPOT_FONT: &MonoFont<'static> = &FONT_8X13;

/// Longest spotmeter label, sign included
///
/// The widest readings are "-460" and "11337" (°F at both ends of the
/// 16-bit range).
pub const SPOT_LABEL_LEN: usize = 8;

fn stroke(color: Gray8) -> PrimitiveStyle<Gray8> {
    PrimitiveStyle::with_stroke(color, 1)
}

fn scaled(coord: PixelCoord) -> Point {
    Point::new(
        coord.x as i32 * SCALE_FACTOR as i32,
        coord.y as i32 * SCALE_FACTOR as i32,
    )
}

/// Triangle with a flat edge at `base_y` and its tip at `tip_y`
fn draw_triangle<D>(
    target: &mut D,
    x1: i32,
    xm: i32,
    x2: i32,
    base_y: i32,
    tip_y: i32,
    color: Gray8,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let style = stroke(color);
    Line::new(Point::new(x1, base_y), Point::new(x2, base_y))
        .into_styled(style)
        .draw(target)?;
    Line::new(Point::new(x1, base_y), Point::new(xm, tip_y))
        .into_styled(style)
        .draw(target)?;
    Line::new(Point::new(xm, tip_y), Point::new(x2, base_y))
        .into_styled(style)
        .draw(target)
}

/// Downward triangle over the coldest pixel
pub fn draw_min_marker<D>(target: &mut D, coord: PixelCoord) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let c = scaled(coord);
    let x1 = c.x - MARKER_SIZE / 2;
    let x2 = x1 + MARKER_SIZE;
    let y1 = c.y - MARKER_SIZE / 2;
    let y2 = y1 + MARKER_SIZE;

    draw_triangle(target, x1, c.x, x2, y1, y2, Gray8::WHITE)?;
    draw_triangle(target, x1 - 1, c.x, x2 + 1, y1 - 1, y2 + 1, Gray8::BLACK)
}

/// Upward triangle over the hottest pixel
pub fn draw_max_marker<D>(target: &mut D, coord: PixelCoord) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let c = scaled(coord);
    let x1 = c.x - MARKER_SIZE / 2;
    let x2 = x1 + MARKER_SIZE;
    let y1 = c.y - MARKER_SIZE / 2;
    let y2 = y1 + MARKER_SIZE;

    draw_triangle(target, x1, c.x, x2, y2, y1, Gray8::WHITE)?;
    draw_triangle(target, x1 - 1, c.x, x2 + 1, y2 + 1, y1 - 1, Gray8::BLACK)
}

/// Text on a filled background one pixel larger than the glyphs
fn draw_label<D>(
    target: &mut D,
    text: &str,
    top_left: Point,
    font: &MonoFont<'static>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let label = Text::with_baseline(
        text,
        top_left,
        MonoTextStyle::new(font, TEXT_COLOR),
        Baseline::Top,
    );
    let size = label.bounding_box().size;
    Rectangle::new(top_left - Point::new(1, 1), size + Size::new(2, 2))
        .into_styled(PrimitiveStyle::with_fill(TEXT_BG_COLOR))
        .draw(target)?;
    label.draw(target)?;
    Ok(())
}

fn text_size(text: &str, font: &MonoFont<'static>) -> Size {
    Text::with_baseline(
        text,
        Point::zero(),
        MonoTextStyle::new(font, TEXT_COLOR),
        Baseline::Top,
    )
    .bounding_box()
    .size
}

/// Spotmeter box around `region` (sensor coordinates) with its label
///
/// The label goes above the box when the box centre sits in the upper half
/// of the image, otherwise below it. The side follows the centre row, not
/// the column.
pub fn draw_spotmeter<D>(target: &mut D, region: SpotRegion, label: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let top_left = scaled(PixelCoord {
        x: region.x1,
        y: region.y1,
    });
    let bottom_right = scaled(PixelCoord {
        x: region.x2,
        y: region.y2,
    });
    let dw = (bottom_right.x - top_left.x).max(0);
    let dh = (bottom_right.y - top_left.y).max(0);
    let center = Point::new(top_left.x + dw / 2, top_left.y + dh / 2);

    let w = dw.max(SPOT_MIN_SIZE);
    let h = dh.max(SPOT_MIN_SIZE);
    let x1 = center.x - w / 2;
    let y1 = center.y - h / 2;

    // Inclusive outline from (x1, y1) to (x1 + w, y1 + h)
    Rectangle::new(Point::new(x1, y1), Size::new(w as u32 + 1, h as u32 + 1))
        .into_styled(stroke(Gray8::WHITE))
        .draw(target)?;
    Rectangle::new(Point::new(x1 - 1, y1 - 1), Size::new(w as u32 + 3, h as u32 + 3))
        .into_styled(stroke(Gray8::BLACK))
        .draw(target)?;

    let outer_top = y1 - 1;
    let outer_bottom = y1 + h + 1;
    let size = text_size(label, SPOT_FONT);
    let text_x = center.x - size.width as i32 / 2;
    let text_y = if center.y <= IMAGE_HEIGHT as i32 / 2 {
        outer_top - size.height as i32 - 2
    } else {
        outer_bottom + 2
    };
    draw_label(target, label, Point::new(text_x, text_y), SPOT_FONT)
}

/// Spotmeter label: mean spot temperature in whole display units
pub fn spot_label(frame: &RawFrame, options: &RenderOptions) -> Option<String<SPOT_LABEL_LEN>> {
    let degrees = display_temperature(frame.spot_mean(), options.high_res, options.celsius);
    let mut label = String::new();
    write!(label, "{}", degrees).ok().map(|_| label)
}

/// Parameter string centered horizontally at a third of the image height
pub fn draw_hud<D>(target: &mut D, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    if text.is_empty() {
        return Ok(());
    }
    let size = text_size(text, HUD_FONT);
    let x = (IMAGE_WIDTH as i32 - size.width as i32) / 2;
    let y = IMAGE_HEIGHT as i32 / 3;
    draw_label(target, text, Point::new(x, y), HUD_FONT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::telemetry;
    use crate::render::RenderedImage;

    fn gray_image() -> RenderedImage {
        let mut img = RenderedImage::new();
        img.as_bytes_mut().fill(128);
        img
    }

    #[test]
    fn test_min_marker_edges() {
        let mut img = gray_image();
        draw_min_marker(&mut img, PixelCoord { x: 10, y: 10 }).unwrap();

        // Flat edge on top: white row at y=15, black row just above
        assert_eq!(img.get(20, 15), Some(255));
        assert_eq!(img.get(20, 14), Some(0));
        // Tip points down
        assert_eq!(img.get(20, 26), Some(0));
        // Far away untouched
        assert_eq!(img.get(100, 100), Some(128));
    }

    #[test]
    fn test_max_marker_edges() {
        let mut img = gray_image();
        draw_max_marker(&mut img, PixelCoord { x: 10, y: 10 }).unwrap();

        // Flat edge at the bottom
        assert_eq!(img.get(20, 25), Some(255));
        assert_eq!(img.get(20, 26), Some(0));
        assert_eq!(img.get(20, 14), Some(0));
    }

    #[test]
    fn test_marker_clipped_at_corner() {
        let mut img = gray_image();
        draw_min_marker(&mut img, PixelCoord { x: 0, y: 0 }).unwrap();
        draw_max_marker(&mut img, PixelCoord { x: 159, y: 119 }).unwrap();
        assert_eq!(img.get(160, 120), Some(128));
    }

    #[test]
    fn test_spotmeter_box_and_label_above() {
        let mut img = gray_image();
        let region = SpotRegion {
            x1: 70,
            y1: 50,
            x2: 72,
            y2: 52,
        };
        draw_spotmeter(&mut img, region, "22").unwrap();

        // Box spans 137..=147 x 97..=107, black frame one pixel outside
        assert_eq!(img.get(137, 102), Some(255));
        assert_eq!(img.get(147, 102), Some(255));
        assert_eq!(img.get(142, 97), Some(255));
        assert_eq!(img.get(142, 107), Some(255));
        assert_eq!(img.get(136, 102), Some(0));
        assert_eq!(img.get(148, 102), Some(0));
        assert_eq!(img.get(142, 96), Some(0));
        assert_eq!(img.get(142, 102), Some(128));

        // Label sits above with a one row gap
        assert_eq!(img.get(142, 95), Some(128));
        assert_eq!(img.get(133, 95), Some(128));
        assert_eq!(img.get(133, 94), Some(120));
        let above = (70..95).any(|y| (120..165).any(|x| img.get(x, y) == Some(250)));
        assert!(above);
        let below = (109..140).any(|y| (120..165).any(|x| img.get(x, y) == Some(250)));
        assert!(!below);
    }

    #[test]
    fn test_spotmeter_label_below_in_lower_half() {
        let mut img = gray_image();
        let region = SpotRegion {
            x1: 70,
            y1: 90,
            x2: 72,
            y2: 92,
        };
        draw_spotmeter(&mut img, region, "-5").unwrap();

        // Box spans y 177..=187, black at 188, label background from 189
        assert_eq!(img.get(142, 188), Some(0));
        assert_eq!(img.get(133, 189), Some(120));
        let below = (190..215).any(|y| (120..165).any(|x| img.get(x, y) == Some(250)));
        assert!(below);
        let above = (150..176).any(|y| (120..165).any(|x| img.get(x, y) == Some(250)));
        assert!(!above);
    }

    #[test]
    fn test_spotmeter_large_region() {
        let mut img = gray_image();
        let region = SpotRegion {
            x1: 40,
            y1: 30,
            x2: 60,
            y2: 50,
        };
        draw_spotmeter(&mut img, region, "1").unwrap();
        assert_eq!(img.get(80, 80), Some(255));
        assert_eq!(img.get(120, 80), Some(255));
        assert_eq!(img.get(79, 80), Some(0));
    }

    #[test]
    fn test_spot_label_units() {
        let mut frame = RawFrame::new();
        frame.telemetry_mut()[telemetry::SPOT_MEAN] = 29515;

        let mut opts = RenderOptions::default();
        opts.celsius = true;
        assert_eq!(spot_label(&frame, &opts).as_deref(), Some("22"));
        opts.celsius = false;
        assert_eq!(spot_label(&frame, &opts).as_deref(), Some("72"));

        frame.telemetry_mut()[telemetry::SPOT_MEAN] = 2952;
        opts.high_res = false;
        opts.celsius = true;
        assert_eq!(spot_label(&frame, &opts).as_deref(), Some("22"));
    }

    #[test]
    fn test_spot_label_extremes_fit() {
        let mut frame = RawFrame::new();
        let mut opts = RenderOptions::default();
        opts.celsius = false;

        frame.telemetry_mut()[telemetry::SPOT_MEAN] = 0;
        opts.high_res = true;
        assert_eq!(spot_label(&frame, &opts).as_deref(), Some("-460"));

        frame.telemetry_mut()[telemetry::SPOT_MEAN] = u16::MAX;
        opts.high_res = false;
        assert_eq!(spot_label(&frame, &opts).as_deref(), Some("11337"));
    }

    #[test]
    fn test_hud_centered_at_third() {
        let mut img = gray_image();
        draw_hud(&mut img, "Units: Metric").unwrap();

        assert_eq!(img.get(160, 78), Some(128));
        let row_has_text = (80..90).any(|y| (100..220).any(|x| img.get(x, y) == Some(250)));
        assert!(row_has_text);
        // Background starts one pixel above the text
        let bg = (100..220).any(|x| img.get(x, 79) == Some(120));
        assert!(bg);
        // Left and right margins match within a pixel
        let left = (0..320).find(|&x| img.get(x, 79) == Some(120)).unwrap();
        let right = (0..320).rev().find(|&x| img.get(x, 79) == Some(120)).unwrap();
        assert!((left - (319 - right)).abs() <= 1);
    }

    #[test]
    fn test_hud_empty_is_noop() {
        let mut img = gray_image();
        draw_hud(&mut img, "").unwrap();
        assert!(img.as_bytes().iter().all(|&p| p == 128));
    }
}

//! Startup test card

use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
};

/// Number of vertical gray bars
pub const RAMP_BARS: u32 = 8;

/// Border width in pixels
pub const BORDER: u32 = 2;

/// Luma of bar `i`, evenly spaced from black to white
pub fn bar_luma(i: u32) -> u8 {
    (i.min(RAMP_BARS - 1) * 255 / (RAMP_BARS - 1)) as u8
}

/// Draw a left-to-right gray ramp inside a white border
pub fn draw_test_pattern<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8> + OriginDimensions,
{
    let size = target.size();
    let bar_width = size.width / RAMP_BARS;

    for i in 0..RAMP_BARS {
        // Last bar absorbs the remainder
        let width = if i == RAMP_BARS - 1 {
            size.width - bar_width * i
        } else {
            bar_width
        };
        Rectangle::new(
            Point::new((bar_width * i) as i32, 0),
            Size::new(width, size.height),
        )
        .into_styled(PrimitiveStyle::with_fill(Gray8::new(bar_luma(i))))
        .draw(target)?;
    }

    let border = PrimitiveStyleBuilder::new()
        .stroke_color(Gray8::WHITE)
        .stroke_width(BORDER)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    Rectangle::new(Point::zero(), size)
        .into_styled(border)
        .draw(target)
}

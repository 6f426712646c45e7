//! Raw frame to display image
//!
//! A frame is rendered in two passes: a base raster picked by
//! {interpolation, AGC} and then the enabled overlays.
//!
//! | interpolate | AGC | base raster                                     |
//! |-------------|-----|-------------------------------------------------|
//! | no          | no  | dynamic-range scale, 2x2 replicate              |
//! | no          | yes | low byte, 2x2 replicate                         |
//! | yes         | no  | linearize in place, interpolated doubler        |
//! | yes         | yes | interpolated doubler on low bytes               |

use core::convert::Infallible;

use crate::frame::{RawFrame, SENSOR_HEIGHT, SENSOR_WIDTH};

pub mod image;
pub mod interp;
pub mod options;
pub mod overlay;
pub mod pattern;
pub mod scale;
pub mod temperature;

pub use image::{RenderedImage, IMAGE_HEIGHT, IMAGE_PIXELS, IMAGE_WIDTH, SCALE_FACTOR};
pub use interp::double_interpolated;
pub use options::{RenderOptions, PALETTE_MARKER_BLACK_HOT, PALETTE_MARKER_MARKERS};
pub use overlay::{draw_hud, draw_max_marker, draw_min_marker, draw_spotmeter, spot_label};
pub use pattern::draw_test_pattern;
pub use scale::{agc_luma, double_nearest, linearize, DynamicRange};
pub use temperature::display_temperature;

fn drawn(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Fill `image` with the doubled frame, without overlays
///
/// Radiometric frames rendered with interpolation are linearized in place,
/// so `frame` no longer holds raw values afterwards.
pub fn render_base(frame: &mut RawFrame, options: &RenderOptions, image: &mut RenderedImage) {
    let mask = options.palette_mask();
    let range = DynamicRange::new(frame.min_value(), frame.max_value());
    let dst = image.as_bytes_mut();

    match (options.interpolate, options.agc_active) {
        (false, false) => double_nearest(
            frame.pixels(),
            SENSOR_WIDTH,
            SENSOR_HEIGHT,
            dst,
            mask,
            |v| range.scale(v),
        ),
        (false, true) => {
            double_nearest(frame.pixels(), SENSOR_WIDTH, SENSOR_HEIGHT, dst, mask, agc_luma)
        }
        (true, false) => {
            linearize(frame.pixels_mut(), range);
            double_interpolated(frame.pixels(), SENSOR_WIDTH, SENSOR_HEIGHT, dst, mask);
        }
        (true, true) => {
            double_interpolated(frame.pixels(), SENSOR_WIDTH, SENSOR_HEIGHT, dst, mask)
        }
    }
}

/// Render a frame and its overlays into `image`
///
/// `hud` is the active parameter string, if any.
pub fn render(
    frame: &mut RawFrame,
    options: &RenderOptions,
    hud: Option<&str>,
    image: &mut RenderedImage,
) {
    render_base(frame, options, image);

    if options.markers {
        drawn(draw_min_marker(image, frame.min_coord()));
        drawn(draw_max_marker(image, frame.max_coord()));
    }

    if options.show_spotmeter() {
        let label = spot_label(frame, options);
        let text = label.as_deref().unwrap_or("");
        drawn(draw_spotmeter(image, frame.spot_region(), text));
    }

    if let Some(text) = hud {
        drawn(draw_hud(image, text));
    }
}

/// Paint the startup test card
pub fn render_test_pattern(image: &mut RenderedImage) {
    drawn(draw_test_pattern(image));
}

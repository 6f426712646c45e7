//! Weighted 2x upscaler
//!
//! Every source pixel owns a 2x2 output block offset by one output pixel,
//! so the output splits into three kinds of samples:
//!
//! - the four image corners copy their source pixel,
//! - samples on the outer rows and columns blend two neighbours 3:1,
//! - interior samples blend the surrounding 2x2 source quad 5:1:1:1,
//!   weighted towards the nearest source pixel.
//!
//! Only the low byte of each source sample is used, so radiometric frames
//! must be linearized first.

/// Edge weights: `(3 * owner + neighbour) / 4`
const EDGE_OWNER_WEIGHT: u16 = 3;
const EDGE_DIVISOR: u16 = EDGE_OWNER_WEIGHT + 1;

/// Interior weights: `(5 * owner + n1 + n2 + n3) / 8`
const INNER_OWNER_WEIGHT: u16 = 5;
const INNER_DIVISOR: u16 = INNER_OWNER_WEIGHT + 3;

#[inline]
fn low_byte(v: u16) -> u16 {
    v & 0xFF
}

#[inline]
fn edge(owner: u16, neighbour: u16) -> u8 {
    ((EDGE_OWNER_WEIGHT * owner + neighbour) / EDGE_DIVISOR) as u8
}

#[inline]
fn inner(owner: u16, a: u16, b: u16, c: u16) -> u8 {
    ((INNER_OWNER_WEIGHT * owner + a + b + c) / INNER_DIVISOR) as u8
}

/// Upscale `src` (`width` x `height`) into `dst` (`2*width` x `2*height`)
pub fn double_interpolated(src: &[u16], width: usize, height: usize, dst: &mut [u8], palette_mask: u8) {
    debug_assert!(width > 0 && height > 0);
    debug_assert!(src.len() >= width * height);
    debug_assert!(dst.len() >= 4 * width * height);

    let out_width = 2 * width;
    let last_x = out_width - 1;
    let last_y = 2 * height - 1;
    let s = |x: usize, y: usize| low_byte(src[y * width + x]);
    let mut put = |x: usize, y: usize, v: u8| dst[y * out_width + x] = v ^ palette_mask;

    // Corners
    put(0, 0, s(0, 0) as u8);
    put(last_x, 0, s(width - 1, 0) as u8);
    put(0, last_y, s(0, height - 1) as u8);
    put(last_x, last_y, s(width - 1, height - 1) as u8);

    // Top and bottom rows
    for (out_y, src_y) in [(0, 0), (last_y, height - 1)] {
        for x in 0..width - 1 {
            let a = s(x, src_y);
            let b = s(x + 1, src_y);
            put(2 * x + 1, out_y, edge(a, b));
            put(2 * x + 2, out_y, edge(b, a));
        }
    }

    // Left and right columns
    for (out_x, src_x) in [(0, 0), (last_x, width - 1)] {
        for y in 0..height - 1 {
            let a = s(src_x, y);
            let b = s(src_x, y + 1);
            put(out_x, 2 * y + 1, edge(a, b));
            put(out_x, 2 * y + 2, edge(b, a));
        }
    }

    // Interior: one source quad fills one 2x2 output block
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let a = s(x, y);
            let b = s(x + 1, y);
            let c = s(x, y + 1);
            let d = s(x + 1, y + 1);
            put(2 * x + 1, 2 * y + 1, inner(a, b, c, d));
            put(2 * x + 2, 2 * y + 1, inner(b, a, c, d));
            put(2 * x + 1, 2 * y + 2, inner(c, a, b, d));
            put(2 * x + 2, 2 * y + 2, inner(d, a, b, c));
        }
    }
}

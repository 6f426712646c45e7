//! Dynamic-range scaling and nearest-neighbour doubling

/// Linear mapping of a frame's [min, max] range onto 0..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicRange {
    min: u16,
    diff: u32,
}

impl DynamicRange {
    /// Range between two extrema; a flat frame gets a span of 1
    pub fn new(min: u16, max: u16) -> Self {
        Self {
            min,
            diff: (max.saturating_sub(min) as u32).max(1),
        }
    }

    /// Scale one sample; below `min` clips to 0, above `max` to 255
    pub fn scale(&self, value: u16) -> u8 {
        if value < self.min {
            return 0;
        }
        let scaled = (value - self.min) as u32 * 255 / self.diff;
        scaled.min(255) as u8
    }
}

/// Rescale samples in place to 0..=255
pub fn linearize(samples: &mut [u16], range: DynamicRange) {
    for v in samples.iter_mut() {
        *v = range.scale(*v) as u16;
    }
}

/// Replicate each source sample into a 2x2 block
///
/// `map` turns a source sample into its luma before the palette mask is
/// applied. `dst` must hold `4 * width * height` bytes.
pub fn double_nearest(
    src: &[u16],
    width: usize,
    height: usize,
    dst: &mut [u8],
    palette_mask: u8,
    map: impl Fn(u16) -> u8,
) {
    debug_assert!(src.len() >= width * height);
    debug_assert!(dst.len() >= 4 * width * height);

    let out_width = 2 * width;
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let top = 2 * y * out_width;
        let bottom = top + out_width;
        for (x, &sample) in row.iter().enumerate() {
            let luma = map(sample) ^ palette_mask;
            dst[top + 2 * x] = luma;
            dst[top + 2 * x + 1] = luma;
            dst[bottom + 2 * x] = luma;
            dst[bottom + 2 * x + 1] = luma;
        }
    }
}

/// Low byte of an AGC sample
pub fn agc_luma(sample: u16) -> u8 {
    (sample & 0xFF) as u8
}

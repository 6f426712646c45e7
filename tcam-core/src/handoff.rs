//! Render-to-display handoff
//!
//! Two rendered images alternate with the raw slots. When slot K is ready,
//! the image rendered from slot 1-K on the previous cycle is copied into
//! the video frame buffer during vertical blanking, and slot K is rendered
//! into image K for the next cycle. Presentation therefore lags acquisition
//! by one frame.

use embassy_sync::blocking_mutex::raw::RawMutex;
use tcam_hal::VideoOutput;

use crate::frame::{FrameStore, Slot};
use crate::render::{render, render_test_pattern, RenderOptions, RenderedImage};

/// Owner of the two rendered images
pub struct DisplayHandoff {
    images: [RenderedImage; 2],
}

impl DisplayHandoff {
    pub const fn new() -> Self {
        Self {
            images: [RenderedImage::new(), RenderedImage::new()],
        }
    }

    /// Rendered image paired with `slot`
    pub fn image(&self, slot: Slot) -> &RenderedImage {
        &self.images[slot.index()]
    }

    /// Paint the test card into both images and put it on screen
    pub async fn show_startup_pattern<V: VideoOutput>(&mut self, video: &mut V) {
        for image in self.images.iter_mut() {
            render_test_pattern(image);
        }
        video.wait_vsync().await;
        present(&self.images[Slot::A.index()], video);
    }

    /// Present the previous image, then render raw slot `slot`
    ///
    /// `options` picks up the per-frame flags from the frame's telemetry.
    pub async fn frame_ready<M: RawMutex, V: VideoOutput>(
        &mut self,
        slot: Slot,
        store: &FrameStore<M>,
        video: &mut V,
        options: &mut RenderOptions,
        hud: Option<&str>,
    ) {
        video.wait_vsync().await;
        present(&self.images[slot.other().index()], video);

        let mut frame = store.lock(slot).await;
        options.update_from_frame(&frame);
        render(&mut frame, options, hud, &mut self.images[slot.index()]);
    }
}

impl Default for DisplayHandoff {
    fn default() -> Self {
        Self::new()
    }
}

fn present<V: VideoOutput>(image: &RenderedImage, video: &mut V) {
    let src = image.as_bytes();
    let dst = video.frame_buffer();
    let len = src.len().min(dst.len());
    dst[..len].copy_from_slice(&src[..len]);
}

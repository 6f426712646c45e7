//! Video task
//!
//! Owns the video output, the rendered images and the parameter session.
//! Every tick it handles button events, persists committed settings and
//! presents any frame the acquisition task announced.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use tcam_core::config::{SessionConfig, VideoConfig};
use tcam_core::control::FaultCode;
use tcam_core::frame::Slot;
use tcam_core::handoff::DisplayHandoff;
use tcam_core::notify::VideoNotify;
use tcam_core::params::{ParameterSession, SessionInput};
use tcam_core::render::{RenderOptions, IMAGE_HEIGHT, IMAGE_WIDTH};
use tcam_core::settings::{load_or_init, persist};
use tcam_hal::{PixelFormat, SettingsStore, VideoMode, VideoOutput, VideoStandard};

use crate::channels::{CONTROL, EMISSIVITY, FRAME_STORE, RADIOMETRIC, VIDEO_NOTIFY};

/// Video task
pub async fn video_task<V, S>(
    mut video: V,
    mut store: S,
    handoff: &mut DisplayHandoff,
    standard: VideoStandard,
    config: VideoConfig,
    session_config: SessionConfig,
) where
    V: VideoOutput,
    S: SettingsStore,
{
    info!("Video task started ({})", standard);

    let mode = VideoMode {
        width: IMAGE_WIDTH as u16,
        height: IMAGE_HEIGHT as u16,
        format: PixelFormat::Gray8,
        standard,
    };
    if let Err(e) = video.init(mode) {
        error!("Video output init failed: {}", e);
        CONTROL.report_fault(FaultCode::PeripheralInit);
        return;
    }
    let buffer_len = video.frame_buffer().len();
    if buffer_len < mode.buffer_len() {
        error!("Frame buffer too small: {} < {}", buffer_len, mode.buffer_len());
        CONTROL.report_fault(FaultCode::PeripheralInit);
        return;
    }

    let mut settings = load_or_init(&mut store).await;
    let mut options = RenderOptions {
        interpolate: config.interpolate,
        ..RenderOptions::default()
    };
    let mut session = ParameterSession::new(&session_config, &settings, &mut options);
    EMISSIVITY.signal(settings.emissivity_percent());

    handoff.show_startup_pattern(&mut video).await;

    let mut ticker = Ticker::every(Duration::from_millis(config.eval_ms as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;

        let notify = VIDEO_NOTIFY.take();
        if let Some(radiometric) = RADIOMETRIC.try_take() {
            options.radiometric = radiometric;
        }

        let now_ms = start.elapsed().as_millis();
        let outcome = session.update(
            SessionInput::from_notify(notify),
            now_ms,
            &mut settings,
            &mut options,
        );
        if let Some(commit) = outcome.commit {
            match persist(&mut store, commit).await {
                Ok(()) => info!("Saved {} = {}", commit.key.name(), commit.value),
                Err(e) => warn!("Failed to save {}: {}", commit.key.name(), e),
            }
        }
        if let Some(percent) = outcome.emissivity {
            EMISSIVITY.signal(percent);
        }

        let hud = session.hud_text();
        for slot in [Slot::A, Slot::B] {
            if notify.contains(VideoNotify::frame_ready(slot)) {
                handoff
                    .frame_ready(slot, &FRAME_STORE, &mut video, &mut options, hud.as_deref())
                    .await;
            }
        }
    }
}

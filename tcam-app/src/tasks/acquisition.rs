//! Acquisition task
//!
//! Streams frames from the sensor into the frame store and recovers from
//! lost synchronization. Exits only if the sensor interfaces cannot be
//! opened.

use defmt::*;
use embassy_time::Delay;

use tcam_core::acquisition::{AcquisitionController, FaultUpdate};
use tcam_core::config::AcquisitionConfig;
use tcam_core::notify::VideoNotify;
use tcam_core::traits::{FrameSource, SensorSettings};
use tcam_hal::OutputPin;

use crate::channels::{CONTROL, EMISSIVITY, FRAME_STORE, RADIOMETRIC, VIDEO_NOTIFY};

/// Acquisition task
///
/// `reset` is the sensor's active-low reset output.
pub async fn acquisition_task<S, R>(
    source: S,
    reset: R,
    settings: SensorSettings,
    config: AcquisitionConfig,
) where
    S: FrameSource,
    R: OutputPin,
{
    info!("Acquisition task started");

    let mut ctrl = AcquisitionController::new(source, reset, Delay, config, settings);
    if let Err(code) = ctrl.open() {
        error!("Sensor interface open failed: {}", code);
        CONTROL.report_fault(code);
        return;
    }

    let mut announced: Option<bool> = None;

    loop {
        if let Some(percent) = EMISSIVITY.try_take() {
            match ctrl.set_emissivity(percent).await {
                Ok(()) => debug!("Emissivity set to {}%", percent),
                Err(e) => warn!("Emissivity update failed: {}", e),
            }
        }

        let report = ctrl.step(&FRAME_STORE).await;

        if let Some(slot) = report.frame {
            VIDEO_NOTIFY.post(VideoNotify::frame_ready(slot));
        }

        match report.fault {
            Some(FaultUpdate::Raise(code)) => {
                warn!("Acquisition fault {} in state {}", code, ctrl.state());
                CONTROL.report_fault(code);
            }
            Some(FaultUpdate::Clear(code)) => {
                if CONTROL.clear_fault(code) {
                    info!("Acquisition recovered from fault {}", code);
                }
            }
            None => {}
        }

        if ctrl.state().is_running() && announced != Some(ctrl.radiometric()) {
            announced = Some(ctrl.radiometric());
            RADIOMETRIC.signal(ctrl.radiometric());
        }
    }
}

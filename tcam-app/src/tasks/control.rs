//! Control task
//!
//! Runs the control/fault manager on a fixed tick, drives the status LED
//! and forwards button presses to the video context.

use defmt::*;
use embassy_time::{Duration, Ticker};

use tcam_core::config::ControlConfig;
use tcam_core::control::{ControlManager, Press, StatusLed};
use tcam_core::notify::VideoNotify;
use tcam_hal::{InputPin, OutputPin};

use crate::channels::{CONTROL, VIDEO_NOTIFY};

/// Control task
///
/// `button` reads high while pressed; wrap an active-low line in
/// [`tcam_hal::ActiveLow`].
pub async fn control_task<B, R, G>(button: B, red: R, green: G, config: ControlConfig)
where
    B: InputPin,
    R: OutputPin,
    G: OutputPin,
{
    info!("Control task started");

    let mut led = StatusLed::new(red, green);
    let mut manager = ControlManager::new(&config);
    let mut ticker = Ticker::every(Duration::from_millis(config.eval_ms as u64));
    let mut last_state = manager.state();

    loop {
        ticker.next().await;

        let (notify, fault) = CONTROL.take();
        let output = manager.tick(notify, fault, button.is_high());
        led.set(output.led);

        if manager.state() != last_state {
            info!("Control state {} -> {}", last_state, manager.state());
            last_state = manager.state();
        }

        match output.press {
            Some(Press::Short) => VIDEO_NOTIFY.post(VideoNotify::PARAM_VALUE),
            Some(Press::Long) => VIDEO_NOTIFY.post(VideoNotify::PARAM_SELECT),
            None => {}
        }
    }
}

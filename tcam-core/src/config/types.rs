//! Configuration type definitions
//!
//! Every timing constant of the pipeline lives here so boards with a
//! different sensor cadence or button feel can override it. Defaults match
//! a 160x120 sensor delivering four segments per frame at ~9 Hz.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::SensorSettings;

/// Acquisition state machine timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcquisitionConfig {
    /// Delay after a completed frame (ms)
    pub frame_pace_ms: u32,
    /// Consecutive missed segments that trigger a resync pause
    ///
    /// Roughly one nominal frame interval of sync edges.
    pub misses_per_resync: u16,
    /// Resync pause with the stream deselected (ms)
    pub resync_pause_ms: u32,
    /// Resync pauses before a sync fault is reported
    pub sync_fail_limit: u16,
    /// Reset assertion time (ms)
    pub reset_pulse_ms: u32,
    /// Wait after releasing reset for the sensor to boot (ms)
    pub reset_settle_ms: u32,
    /// Period of one error-state tick (ms)
    pub error_tick_ms: u32,
    /// Error-state ticks before the next reset attempt
    pub error_retry_ticks: u16,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            frame_pace_ms: 30,
            misses_per_resync: 36,
            resync_pause_ms: 185,
            sync_fail_limit: 10,
            reset_pulse_ms: 10,
            reset_settle_ms: 1000,
            error_tick_ms: 1000,
            error_retry_ticks: 60,
        }
    }
}

/// Control task timing (button and LED)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Control loop period (ms)
    pub eval_ms: u32,
    /// Hold time for a long press (ms)
    pub long_press_ms: u32,
    /// Red on-time of one fault blink (ms)
    pub blink_on_ms: u32,
    /// Off-time between fault blinks (ms)
    pub blink_off_ms: u32,
    /// Pause between blink bursts (ms)
    pub blink_idle_ms: u32,
}

impl ControlConfig {
    /// Convert a duration to control ticks, never less than one
    pub fn ticks(&self, ms: u32) -> u16 {
        let ticks = ms / self.eval_ms.max(1);
        ticks.clamp(1, u16::MAX as u32) as u16
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            eval_ms: 50,
            long_press_ms: 3000,
            blink_on_ms: 200,
            blink_off_ms: 300,
            blink_idle_ms: 2000,
        }
    }
}

/// Parameter session timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// Inactivity timeout in a non-default group (ms)
    ///
    /// Must be longer than the long-press time.
    pub entry_timeout_ms: u64,
}

impl SessionConfig {
    /// Timeout derived from the long-press time plus a fixed grace period
    pub fn for_long_press(long_press_ms: u32) -> Self {
        Self {
            entry_timeout_ms: long_press_ms as u64 + 7000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_long_press(ControlConfig::default().long_press_ms)
    }
}

/// Video task timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VideoConfig {
    /// Video loop period (ms)
    pub eval_ms: u32,
    /// Render with the interpolating doubler
    pub interpolate: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            eval_ms: 20,
            interpolate: true,
        }
    }
}

/// Complete camera configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraConfig {
    pub acquisition: AcquisitionConfig,
    pub sensor: SensorSettings,
    pub control: ControlConfig,
    pub session: SessionConfig,
    pub video: VideoConfig,
}

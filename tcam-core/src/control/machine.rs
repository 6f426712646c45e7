//! Control state machine and fault indication
//!
//! Runs once per control tick: notifications first, then the LED, then the
//! button. The active fault code is shown as a burst of red blinks, one
//! per unit of the code, followed by a dark pause.

use crate::config::ControlConfig;
use crate::notify::ControlNotify;

use super::button::{Button, Press};
use super::fault::FaultCode;
use super::led::LedColor;

/// State to return to when a fault clears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resume {
    Startup,
    Run,
}

/// Camera lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlState {
    /// Contexts are still coming up
    Startup,
    /// Normal operation; button presses are forwarded
    Run,
    /// A fault is active
    Fault(Resume),
}

/// Events driving [`ControlState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlEvent {
    StartupDone,
    FaultReported,
    FaultCleared,
}

impl ControlState {
    /// Process an event and return the next state
    pub fn transition(self, event: ControlEvent) -> Self {
        use ControlEvent::*;
        use ControlState::*;

        match (self, event) {
            (Startup, StartupDone) => Run,

            (Startup, FaultReported) => Fault(Resume::Startup),
            (Run, FaultReported) => Fault(Resume::Run),
            // Keep the state from before the first fault
            (Fault(resume), FaultReported) => Fault(resume),

            (Fault(Resume::Startup), FaultCleared) => Startup,
            (Fault(Resume::Run), FaultCleared) => Run,

            _ => self,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, ControlState::Fault(_))
    }

    /// Steady LED color outside of fault indication
    pub fn solid_color(&self) -> LedColor {
        match self {
            ControlState::Startup => LedColor::Amber,
            ControlState::Run => LedColor::Green,
            ControlState::Fault(_) => LedColor::Red,
        }
    }
}

/// LED sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Solid,
    BlinkOn,
    BlinkOff,
    Idle,
}

/// Result of one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlOutput {
    pub led: LedColor,
    /// Press to forward to the video context (only in `Run`)
    pub press: Option<Press>,
}

/// Control and fault manager
pub struct ControlManager {
    state: ControlState,
    fault: Option<FaultCode>,
    led_state: LedState,
    led_timer: u16,
    blinks_left: u16,
    blink_on_ticks: u16,
    blink_off_ticks: u16,
    idle_ticks: u16,
    button: Button,
}

impl ControlManager {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            state: ControlState::Startup,
            fault: None,
            led_state: LedState::Solid,
            led_timer: 0,
            blinks_left: 0,
            blink_on_ticks: config.ticks(config.blink_on_ms),
            blink_off_ticks: config.ticks(config.blink_off_ms),
            idle_ticks: config.ticks(config.blink_idle_ms),
            button: Button::new(config.ticks(config.long_press_ms)),
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn led_state(&self) -> LedState {
        self.led_state
    }

    pub fn fault(&self) -> Option<FaultCode> {
        self.fault
    }

    /// Run one control tick
    ///
    /// `current_fault` is the value of the shared fault cell when the
    /// notifications were taken; it decides between a fault and a
    /// fault-clear that arrived in the same window.
    pub fn tick(
        &mut self,
        notifications: ControlNotify,
        current_fault: Option<FaultCode>,
        button_pressed: bool,
    ) -> ControlOutput {
        self.handle_notifications(notifications, current_fault);
        let led = self.eval_led();
        let press = self.button.sample(button_pressed);

        ControlOutput {
            led,
            press: if self.state == ControlState::Run {
                press
            } else {
                None
            },
        }
    }

    fn handle_notifications(&mut self, notifications: ControlNotify, current: Option<FaultCode>) {
        if notifications.contains(ControlNotify::STARTUP_DONE) {
            self.set_state(self.state.transition(ControlEvent::StartupDone));
        }

        if notifications.contains(ControlNotify::FAULT) {
            if let Some(code) = current {
                self.fault = Some(code);
                self.state = self.state.transition(ControlEvent::FaultReported);
                self.start_burst(code);
            }
        }

        if notifications.contains(ControlNotify::FAULT_CLEAR) && current.is_none() {
            self.fault = None;
            self.set_state(self.state.transition(ControlEvent::FaultCleared));
        }
    }

    fn set_state(&mut self, next: ControlState) {
        self.state = next;
        if !next.is_fault() {
            self.led_state = LedState::Solid;
        }
    }

    fn start_burst(&mut self, code: FaultCode) {
        self.blinks_left = code.blink_count();
        self.led_state = LedState::BlinkOn;
        self.led_timer = self.blink_on_ticks;
    }

    fn eval_led(&mut self) -> LedColor {
        match self.led_state {
            LedState::Solid => {}
            LedState::BlinkOn => {
                self.led_timer = self.led_timer.saturating_sub(1);
                if self.led_timer == 0 {
                    self.led_state = LedState::BlinkOff;
                    self.led_timer = self.blink_off_ticks;
                }
            }
            LedState::BlinkOff => {
                self.led_timer = self.led_timer.saturating_sub(1);
                if self.led_timer == 0 {
                    self.blinks_left = self.blinks_left.saturating_sub(1);
                    if self.blinks_left == 0 {
                        self.led_state = LedState::Idle;
                        self.led_timer = self.idle_ticks;
                    } else {
                        self.led_state = LedState::BlinkOn;
                        self.led_timer = self.blink_on_ticks;
                    }
                }
            }
            LedState::Idle => {
                self.led_timer = self.led_timer.saturating_sub(1);
                if self.led_timer == 0 {
                    match self.fault {
                        Some(code) => self.start_burst(code),
                        None => self.led_state = LedState::Solid,
                    }
                }
            }
        }

        match self.led_state {
            LedState::Solid => self.state.solid_color(),
            LedState::BlinkOn => LedColor::Red,
            LedState::BlinkOff | LedState::Idle => LedColor::Off,
        }
    }
}

//! Button debouncing and press classification
//!
//! Sampled once per control tick. Two equal consecutive samples are needed
//! to register a press or a release.

/// Classified button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    /// Released before the long-press time
    Short,
    /// Held for the long-press time; fires once while still held
    Long,
}

/// Debounced button with a long-press countdown
#[derive(Debug, Clone)]
pub struct Button {
    long_press_ticks: u16,
    prev_sample: bool,
    down: bool,
    countdown: u16,
}

impl Button {
    pub fn new(long_press_ticks: u16) -> Self {
        Self {
            long_press_ticks: long_press_ticks.max(1),
            prev_sample: false,
            down: false,
            countdown: 0,
        }
    }

    /// Feed one sample (`true` = pressed) and return any completed press
    pub fn sample(&mut self, pressed: bool) -> Option<Press> {
        let mut released = false;

        if pressed && self.prev_sample && !self.down {
            self.down = true;
            self.countdown = self.long_press_ticks;
        } else if !pressed && !self.prev_sample && self.down {
            self.down = false;
            released = true;
        }
        self.prev_sample = pressed;

        if self.down && self.countdown != 0 {
            self.countdown -= 1;
            if self.countdown == 0 {
                return Some(Press::Long);
            }
        }

        if released && self.countdown != 0 {
            return Some(Press::Short);
        }

        None
    }

    /// Debounced level
    pub fn is_down(&self) -> bool {
        self.down
    }
}

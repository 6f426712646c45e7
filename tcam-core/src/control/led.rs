//! Two-LED status indicator

use tcam_hal::OutputPin;

/// Indicator color formed from the red and green LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    Off,
    Red,
    /// Red and green together
    Amber,
    Green,
}

impl LedColor {
    /// (red, green) levels
    pub fn levels(self) -> (bool, bool) {
        match self {
            LedColor::Off => (false, false),
            LedColor::Red => (true, false),
            LedColor::Amber => (true, true),
            LedColor::Green => (false, true),
        }
    }
}

/// Red/green LED pair
pub struct StatusLed<R, G> {
    red: R,
    green: G,
    color: LedColor,
}

impl<R: OutputPin, G: OutputPin> StatusLed<R, G> {
    /// Take the pins and switch both LEDs off
    pub fn new(mut red: R, mut green: G) -> Self {
        red.set_low();
        green.set_low();
        Self {
            red,
            green,
            color: LedColor::Off,
        }
    }

    /// Show a color; pins are only touched when it changes
    pub fn set(&mut self, color: LedColor) {
        if color == self.color {
            return;
        }
        let (red, green) = color.levels();
        self.red.set_level(red);
        self.green.set_level(green);
        self.color = color;
    }

    pub fn color(&self) -> LedColor {
        self.color
    }
}

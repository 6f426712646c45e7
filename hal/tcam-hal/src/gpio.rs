//! GPIO pin abstractions
//!
//! The camera only needs plain level access: the user button, the red and
//! green status LEDs, the sensor reset line and the video standard sense
//! strap.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Inverting adapter for active-low inputs
///
/// The user button pulls its line to ground when pressed. Wrapping it in
/// `ActiveLow` lets callers ask `is_high()` to mean "asserted".
#[derive(Debug)]
pub struct ActiveLow<P>(pub P);

impl<P> ActiveLow<P> {
    /// Wrap a raw pin
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Return the wrapped pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: InputPin> InputPin for ActiveLow<P> {
    fn is_high(&self) -> bool {
        self.0.is_low()
    }
}

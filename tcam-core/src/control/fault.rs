//! Fault codes and error classes
//!
//! The numeric value of a fault code is what the user sees: the status LED
//! blinks red that many times per burst.

/// Broad error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorClass {
    /// Interface bring-up failed at boot; the affected context stops
    FatalBringup,
    /// Missed sensor segments, recovered by resync pauses
    TransientDesync,
    /// Resync pauses exhausted; one reset, then long backoff
    PersistentDesync,
    /// Buffer allocation failed at boot
    AllocationFailure,
    /// Unsupported setting or parameter index; logged and ignored
    InvalidIndex,
}

/// Faults reported to the control context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FaultCode {
    /// Platform (SoC/runtime) initialization failed
    PlatformInit = 1,
    /// Peripheral (video driver, pins) initialization failed
    PeripheralInit = 2,
    /// Frame buffer allocation failed
    MemoryInit = 3,
    /// Sensor control interface failure
    SensorControl = 4,
    /// Sensor stream interface failure
    SensorStream = 5,
    /// Sensor stream lost synchronization
    SensorSync = 6,
}

impl FaultCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a stored code; 0 means "no fault"
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(FaultCode::PlatformInit),
            2 => Some(FaultCode::PeripheralInit),
            3 => Some(FaultCode::MemoryInit),
            4 => Some(FaultCode::SensorControl),
            5 => Some(FaultCode::SensorStream),
            6 => Some(FaultCode::SensorSync),
            _ => None,
        }
    }

    /// Red blinks per burst
    pub fn blink_count(self) -> u16 {
        self.as_u8() as u16
    }

    pub fn class(self) -> ErrorClass {
        match self {
            FaultCode::PlatformInit | FaultCode::PeripheralInit => ErrorClass::FatalBringup,
            FaultCode::MemoryInit => ErrorClass::AllocationFailure,
            FaultCode::SensorControl | FaultCode::SensorStream => ErrorClass::FatalBringup,
            FaultCode::SensorSync => ErrorClass::PersistentDesync,
        }
    }
}

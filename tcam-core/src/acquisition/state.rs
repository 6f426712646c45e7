//! Acquisition state machine definition

/// Acquisition states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    /// First sensor bring-up after power-on
    Init,
    /// Streaming segments
    Run,
    /// Hardware reset and bring-up retry
    ReInit,
    /// Backing off before another reset
    Error,
}

/// Events that move the acquisition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionEvent {
    /// Sensor answered and accepted its configuration
    BringupOk,
    /// Sensor did not come up
    BringupFailed,
    /// Too many resync windows without a frame
    SyncLost {
        /// A reset was already tried since the last good frame
        reset_attempted: bool,
    },
    /// Error backoff ran out
    RetryElapsed,
}

impl AcquisitionState {
    /// Process an event and return the next state
    pub fn transition(self, event: AcquisitionEvent) -> Self {
        use AcquisitionEvent::*;
        use AcquisitionState::*;

        match (self, event) {
            (Init | ReInit, BringupOk) => Run,
            (Init | ReInit, BringupFailed) => Error,

            (Run, SyncLost { reset_attempted: false }) => ReInit,
            (Run, SyncLost { reset_attempted: true }) => Error,

            (Error, RetryElapsed) => ReInit,

            // Anything else is ignored
            (state, _) => state,
        }
    }

    /// Streaming frames
    pub fn is_running(&self) -> bool {
        matches!(self, AcquisitionState::Run)
    }
}

//! Acquisition controller
//!
//! Drives sensor bring-up, segment streaming and desync recovery. One call
//! to [`AcquisitionController::step`] performs one state-machine step and
//! reports what the surrounding task should tell the other contexts.
//!
//! Recovery escalates in three stages:
//!
//! 1. every `misses_per_resync` consecutive missed segments the sensor is
//!    left alone for `resync_pause_ms` so it drops its stale segments,
//! 2. after `sync_fail_limit` such windows the sensor is hardware reset once,
//! 3. if that does not bring frames back, the controller backs off for
//!    `error_retry_ticks` ticks before the next reset.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use tcam_hal::OutputPin;

use super::state::{AcquisitionEvent, AcquisitionState};
use crate::config::AcquisitionConfig;
use crate::control::FaultCode;
use crate::frame::{FrameStore, Slot};
use crate::traits::{FrameSource, InterfaceError, SensorError, SensorInfo, SensorSettings};

/// Fault cell change requested by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultUpdate {
    Raise(FaultCode),
    /// Withdraw a fault this controller raised earlier
    Clear(FaultCode),
}

/// Outcome of one [`AcquisitionController::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// A complete frame was stored in this slot
    pub frame: Option<Slot>,
    pub fault: Option<FaultUpdate>,
}

impl StepReport {
    fn frame(slot: Slot) -> Self {
        Self {
            frame: Some(slot),
            fault: None,
        }
    }

    fn fault(update: FaultUpdate) -> Self {
        Self {
            frame: None,
            fault: Some(update),
        }
    }
}

/// Map an interface open failure to its fault code
pub fn open_fault(err: InterfaceError) -> FaultCode {
    match err {
        InterfaceError::Control => FaultCode::SensorControl,
        InterfaceError::Stream => FaultCode::SensorStream,
    }
}

/// Sensor acquisition state machine
///
/// `reset` drives the sensor's active-low reset line.
pub struct AcquisitionController<S, R, D> {
    source: S,
    reset: R,
    delay: D,
    config: AcquisitionConfig,
    settings: SensorSettings,
    state: AcquisitionState,
    /// Slot the next complete frame goes into
    slot: Slot,
    misses: u16,
    failures: u16,
    reset_attempted: bool,
    retry_countdown: u16,
    radiometric: bool,
    /// Last fault this controller raised and has not cleared yet
    raised: Option<FaultCode>,
}

impl<S, R, D> AcquisitionController<S, R, D>
where
    S: FrameSource,
    R: OutputPin,
    D: DelayNs,
{
    pub fn new(
        source: S,
        reset: R,
        delay: D,
        config: AcquisitionConfig,
        settings: SensorSettings,
    ) -> Self {
        Self {
            source,
            reset,
            delay,
            config,
            settings,
            state: AcquisitionState::Init,
            slot: Slot::A,
            misses: 0,
            failures: 0,
            reset_attempted: false,
            retry_countdown: 0,
            radiometric: true,
            raised: None,
        }
    }

    /// Open the sensor's host interfaces
    ///
    /// A failure here is fatal: the caller reports the returned code and
    /// stops acquiring.
    pub fn open(&mut self) -> Result<(), FaultCode> {
        self.source.open().map_err(open_fault)
    }

    /// Run one state-machine step
    pub async fn step<M: RawMutex>(&mut self, store: &FrameStore<M>) -> StepReport {
        match self.state {
            AcquisitionState::Init => self.bring_up().await,
            AcquisitionState::Run => self.stream(store).await,
            AcquisitionState::ReInit => {
                self.reset.set_low();
                self.delay.delay_ms(self.config.reset_pulse_ms).await;
                self.reset.set_high();
                self.delay.delay_ms(self.config.reset_settle_ms).await;
                self.bring_up().await
            }
            AcquisitionState::Error => {
                self.delay.delay_ms(self.config.error_tick_ms).await;
                self.retry_countdown = self.retry_countdown.saturating_sub(1);
                if self.retry_countdown == 0 {
                    self.apply(AcquisitionEvent::RetryElapsed);
                }
                StepReport::default()
            }
        }
    }

    /// Change the scene emissivity
    ///
    /// The value is kept for later bring-ups and, while streaming from a
    /// radiometric sensor, sent to the sensor right away.
    pub async fn set_emissivity(&mut self, percent: u8) -> Result<(), SensorError> {
        self.settings.emissivity = percent;
        if self.state.is_running() && self.radiometric {
            self.source.set_emissivity(percent).await
        } else {
            Ok(())
        }
    }

    async fn bring_up(&mut self) -> StepReport {
        let was_reset = self.state == AcquisitionState::ReInit;
        match self.source.init(&self.settings).await {
            Ok(part) => {
                let info = SensorInfo::from_part_number(&part);
                #[cfg(feature = "defmt")]
                defmt::info!("sensor up: {} ({})", info.model, part.as_str());
                self.radiometric = info.radiometric;
                self.reset_attempted = was_reset;
                self.misses = 0;
                self.failures = 0;
                self.apply(AcquisitionEvent::BringupOk);
                StepReport::default()
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("sensor bring-up failed: {}", _err);
                self.apply(AcquisitionEvent::BringupFailed);
                self.raise(FaultCode::SensorControl)
            }
        }
    }

    async fn stream<M: RawMutex>(&mut self, store: &FrameStore<M>) -> StepReport {
        let sync_at = self.source.wait_segment_sync().await;
        let status = self.source.transfer_segment(sync_at).await;
        if !status.is_complete() {
            return self.missed().await;
        }

        self.misses = 0;
        self.failures = 0;
        self.reset_attempted = false;

        let slot = self.slot;
        let source = &mut self.source;
        store.write(slot, |frame| source.extract_frame(frame)).await;
        self.slot = slot.other();

        let mut report = StepReport::frame(slot);
        if let Some(code) = self.raised.take() {
            report.fault = Some(FaultUpdate::Clear(code));
        }
        self.delay.delay_ms(self.config.frame_pace_ms).await;
        report
    }

    /// Count a sync edge that did not finish a frame
    async fn missed(&mut self) -> StepReport {
        self.misses = self.misses.saturating_add(1);
        if self.misses < self.config.misses_per_resync {
            return StepReport::default();
        }

        self.misses = 0;
        self.delay.delay_ms(self.config.resync_pause_ms).await;
        self.failures = self.failures.saturating_add(1);
        if self.failures < self.config.sync_fail_limit {
            return StepReport::default();
        }

        self.failures = 0;
        #[cfg(feature = "defmt")]
        defmt::warn!("sync lost, reset attempted: {}", self.reset_attempted);
        self.apply(AcquisitionEvent::SyncLost {
            reset_attempted: self.reset_attempted,
        });
        self.raise(FaultCode::SensorSync)
    }

    fn apply(&mut self, event: AcquisitionEvent) {
        let next = self.state.transition(event);
        if next == AcquisitionState::Error && self.state != AcquisitionState::Error {
            self.retry_countdown = self.config.error_retry_ticks;
        }
        self.state = next;
    }

    fn raise(&mut self, code: FaultCode) -> StepReport {
        self.raised = Some(code);
        StepReport::fault(FaultUpdate::Raise(code))
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Sensor reports calibrated temperatures
    pub fn radiometric(&self) -> bool {
        self.radiometric
    }

    /// Slot the next complete frame goes into
    pub fn next_slot(&self) -> Slot {
        self.slot
    }

    pub fn misses(&self) -> u16 {
        self.misses
    }

    pub fn failures(&self) -> u16 {
        self.failures
    }

    pub fn reset_attempted(&self) -> bool {
        self.reset_attempted
    }

    pub fn retry_countdown(&self) -> u16 {
        self.retry_countdown
    }

    pub fn settings(&self) -> &SensorSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::frame::{RawFrame, SENSOR_PIXELS};
    use crate::traits::{PartNumber, SegmentStatus};
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockSource {
        open_result: Option<InterfaceError>,
        init_results: VecDeque<Result<&'static str, SensorError>>,
        segments: VecDeque<SegmentStatus>,
        next_value: u16,
        clock_us: u64,
        inits: usize,
        emissivity_sent: Vec<u8>,
    }

    impl FrameSource for MockSource {
        fn open(&mut self) -> Result<(), InterfaceError> {
            match self.open_result {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn init(&mut self, _settings: &SensorSettings) -> Result<PartNumber, SensorError> {
            self.inits += 1;
            let part = self.init_results.pop_front().unwrap_or(Ok("500-0771-01"))?;
            Ok(PartNumber::try_from(part).unwrap())
        }

        fn segment_ready(&self) -> bool {
            !self.segments.is_empty()
        }

        async fn wait_segment_sync(&mut self) -> u64 {
            self.clock_us += 9_450;
            self.clock_us
        }

        async fn transfer_segment(&mut self, _sync_at_us: u64) -> SegmentStatus {
            self.segments.pop_front().unwrap_or(SegmentStatus::Missed)
        }

        fn extract_frame(&mut self, dest: &mut RawFrame) {
            self.next_value += 1;
            dest.load(&vec![self.next_value; SENSOR_PIXELS], None);
        }

        async fn set_emissivity(&mut self, percent: u8) -> Result<(), SensorError> {
            self.emissivity_sent.push(percent);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Log(Rc<RefCell<Vec<Event>>>);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        ResetLow,
        ResetHigh,
        Delay(u32),
    }

    impl Log {
        fn take(&self) -> Vec<Event> {
            self.0.borrow_mut().drain(..).collect()
        }

        fn delays(&self) -> Vec<u32> {
            self.take()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Delay(ms) => Some(ms),
                    _ => None,
                })
                .collect()
        }
    }

    struct ResetPin(Log);

    impl OutputPin for ResetPin {
        fn set_high(&mut self) {
            self.0 .0.borrow_mut().push(Event::ResetHigh);
        }

        fn set_low(&mut self) {
            self.0 .0.borrow_mut().push(Event::ResetLow);
        }
    }

    struct MockDelay(Log);

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.0 .0.borrow_mut().push(Event::Delay(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.0 .0.borrow_mut().push(Event::Delay(ms));
        }
    }

    type Controller = AcquisitionController<MockSource, ResetPin, MockDelay>;

    fn controller(source: MockSource) -> (Controller, Log) {
        let log = Log::default();
        let ctrl = AcquisitionController::new(
            source,
            ResetPin(log.clone()),
            MockDelay(log.clone()),
            AcquisitionConfig::default(),
            SensorSettings::default(),
        );
        (ctrl, log)
    }

    fn running(source: MockSource) -> (Controller, Log, FrameStore<NoopRawMutex>) {
        let (mut ctrl, log) = controller(source);
        let store = FrameStore::new();
        block_on(ctrl.step(&store));
        assert_eq!(ctrl.state(), AcquisitionState::Run);
        log.take();
        (ctrl, log, store)
    }

    /// Step through `n` missed segments, collecting every report
    fn miss(ctrl: &mut Controller, store: &FrameStore<NoopRawMutex>, n: usize) -> Vec<StepReport> {
        (0..n).map(|_| block_on(ctrl.step(store))).collect()
    }

    fn faults(reports: &[StepReport]) -> Vec<FaultUpdate> {
        reports.iter().filter_map(|r| r.fault).collect()
    }

    #[test]
    fn test_open_failure_codes() {
        let (mut ctrl, _) = controller(MockSource {
            open_result: Some(InterfaceError::Stream),
            ..MockSource::default()
        });
        assert_eq!(ctrl.open(), Err(FaultCode::SensorStream));
        assert_eq!(open_fault(InterfaceError::Control), FaultCode::SensorControl);

        let (mut ok, _) = controller(MockSource::default());
        assert_eq!(ok.open(), Ok(()));
    }

    #[test]
    fn test_init_captures_radiometric() {
        let mut source = MockSource::default();
        source
            .init_results
            .push_back(Ok("500-0726-01"));
        let (ctrl, _, _) = running(source);
        assert!(!ctrl.radiometric());
        assert!(!ctrl.reset_attempted());
    }

    #[test]
    fn test_init_failure_enters_error() {
        let mut source = MockSource::default();
        source.init_results.push_back(Err(SensorError::NoResponse));
        let (mut ctrl, _) = controller(source);
        let store: FrameStore<NoopRawMutex> = FrameStore::new();

        let report = block_on(ctrl.step(&store));
        assert_eq!(ctrl.state(), AcquisitionState::Error);
        assert_eq!(ctrl.retry_countdown(), 60);
        assert_eq!(report.fault, Some(FaultUpdate::Raise(FaultCode::SensorControl)));
    }

    #[test]
    fn test_frames_alternate_slots() {
        let mut source = MockSource::default();
        source.segments.extend([
            SegmentStatus::Pending,
            SegmentStatus::Pending,
            SegmentStatus::Pending,
            SegmentStatus::FrameComplete,
            SegmentStatus::FrameComplete,
            SegmentStatus::FrameComplete,
        ]);
        let (mut ctrl, log, store) = running(source);

        let reports = miss(&mut ctrl, &store, 6);
        let frames: Vec<Slot> = reports.iter().filter_map(|r| r.frame).collect();
        assert_eq!(frames, [Slot::A, Slot::B, Slot::A]);
        assert_eq!(ctrl.next_slot(), Slot::B);

        // Slot A holds the third frame, B the second
        assert_eq!(block_on(store.read(Slot::A, |f| f.max_value())), 3);
        assert_eq!(block_on(store.read(Slot::B, |f| f.max_value())), 2);

        // Paced after each frame only
        assert_eq!(log.delays(), [30, 30, 30]);
        assert!(!store.is_locked(Slot::A));
    }

    #[test]
    fn test_pending_segments_count_as_misses() {
        let mut source = MockSource::default();
        source.segments.extend([SegmentStatus::Pending; 36]);
        let (mut ctrl, log, store) = running(source);

        miss(&mut ctrl, &store, 35);
        assert_eq!(ctrl.misses(), 35);
        assert!(log.delays().is_empty());

        miss(&mut ctrl, &store, 1);
        assert_eq!(log.delays(), [185]);
        assert_eq!(ctrl.failures(), 1);
    }

    #[test]
    fn test_endless_pending_escalates_to_reset() {
        let mut source = MockSource::default();
        source.segments.extend([SegmentStatus::Pending; 360]);
        let (mut ctrl, _, store) = running(source);

        let reports = miss(&mut ctrl, &store, 360);
        assert_eq!(
            faults(&reports),
            [FaultUpdate::Raise(FaultCode::SensorSync)]
        );
        assert_eq!(ctrl.state(), AcquisitionState::ReInit);
    }

    #[test]
    fn test_resync_pause_every_36_misses() {
        let (mut ctrl, log, store) = running(MockSource::default());

        let reports = miss(&mut ctrl, &store, 35);
        assert!(faults(&reports).is_empty());
        assert!(log.delays().is_empty());
        assert_eq!(ctrl.misses(), 35);

        miss(&mut ctrl, &store, 1);
        assert_eq!(log.delays(), [185]);
        assert_eq!(ctrl.misses(), 0);
        assert_eq!(ctrl.failures(), 1);
        assert_eq!(ctrl.state(), AcquisitionState::Run);
    }

    #[test]
    fn test_good_frame_resets_counters() {
        let (mut ctrl, _, store) = running(MockSource::default());
        miss(&mut ctrl, &store, 40);
        assert_eq!(ctrl.failures(), 1);
        assert_eq!(ctrl.misses(), 4);

        ctrl.source.segments.push_back(SegmentStatus::FrameComplete);
        let report = block_on(ctrl.step(&store));
        assert_eq!(report.frame, Some(Slot::A));
        assert_eq!(ctrl.failures(), 0);
        assert_eq!(ctrl.misses(), 0);
    }

    #[test]
    fn test_sync_loss_resets_once_then_backs_off() {
        let (mut ctrl, log, store) = running(MockSource::default());

        // Ten resync windows without a frame
        let reports = miss(&mut ctrl, &store, 360);
        assert_eq!(
            faults(&reports),
            [FaultUpdate::Raise(FaultCode::SensorSync)]
        );
        assert_eq!(ctrl.state(), AcquisitionState::ReInit);
        assert_eq!(ctrl.failures(), 0);
        log.take();

        // Hardware reset: pulse, settle, bring-up
        let report = block_on(ctrl.step(&store));
        assert_eq!(report, StepReport::default());
        assert_eq!(
            log.take(),
            [
                Event::ResetLow,
                Event::Delay(10),
                Event::ResetHigh,
                Event::Delay(1000)
            ]
        );
        assert_eq!(ctrl.state(), AcquisitionState::Run);
        assert!(ctrl.reset_attempted());
        assert_eq!(ctrl.source().inits, 2);

        // Still no frames: back off instead of resetting again
        let reports = miss(&mut ctrl, &store, 360);
        assert_eq!(
            faults(&reports),
            [FaultUpdate::Raise(FaultCode::SensorSync)]
        );
        assert_eq!(ctrl.state(), AcquisitionState::Error);
        assert_eq!(ctrl.retry_countdown(), 60);
    }

    #[test]
    fn test_error_countdown_returns_to_reinit() {
        let mut source = MockSource::default();
        source.init_results.push_back(Err(SensorError::Bus));
        let (mut ctrl, log) = controller(source);
        let store: FrameStore<NoopRawMutex> = FrameStore::new();
        block_on(ctrl.step(&store));
        log.take();

        for remaining in (1..60).rev() {
            block_on(ctrl.step(&store));
            assert_eq!(ctrl.retry_countdown(), remaining);
            assert_eq!(ctrl.state(), AcquisitionState::Error);
        }
        block_on(ctrl.step(&store));
        assert_eq!(ctrl.state(), AcquisitionState::ReInit);

        let delays = log.delays();
        assert_eq!(delays.len(), 60);
        assert!(delays.iter().all(|&ms| ms == 1000));

        // Retry succeeds
        block_on(ctrl.step(&store));
        assert_eq!(ctrl.state(), AcquisitionState::Run);
    }

    #[test]
    fn test_reinit_failure_backs_off() {
        let (mut ctrl, _, store) = running(MockSource::default());
        miss(&mut ctrl, &store, 360);
        ctrl.source.init_results.push_back(Err(SensorError::NoResponse));

        let report = block_on(ctrl.step(&store));
        assert_eq!(ctrl.state(), AcquisitionState::Error);
        assert_eq!(report.fault, Some(FaultUpdate::Raise(FaultCode::SensorControl)));
        assert_eq!(ctrl.retry_countdown(), 60);
    }

    #[test]
    fn test_good_frame_clears_raised_fault() {
        let (mut ctrl, _, store) = running(MockSource::default());
        miss(&mut ctrl, &store, 360);
        block_on(ctrl.step(&store));
        assert_eq!(ctrl.state(), AcquisitionState::Run);

        ctrl.source.segments.push_back(SegmentStatus::FrameComplete);
        ctrl.source.segments.push_back(SegmentStatus::FrameComplete);
        let first = block_on(ctrl.step(&store));
        assert_eq!(first.fault, Some(FaultUpdate::Clear(FaultCode::SensorSync)));
        assert!(!ctrl.reset_attempted());

        let second = block_on(ctrl.step(&store));
        assert_eq!(second.fault, None);
    }

    #[test]
    fn test_set_emissivity_forwarding() {
        let (mut ctrl, _) = controller(MockSource::default());
        let store: FrameStore<NoopRawMutex> = FrameStore::new();

        // Not running yet: stored only
        assert_eq!(block_on(ctrl.set_emissivity(90)), Ok(()));
        assert_eq!(ctrl.settings().emissivity, 90);
        assert!(ctrl.source().emissivity_sent.is_empty());

        block_on(ctrl.step(&store));
        assert_eq!(block_on(ctrl.set_emissivity(95)), Ok(()));
        assert_eq!(ctrl.source().emissivity_sent, [95]);
    }

    #[test]
    fn test_set_emissivity_skipped_without_radiometry() {
        let mut source = MockSource::default();
        source
            .init_results
            .push_back(Ok("500-0726-01"));
        let (mut ctrl, _, _) = running(source);

        assert_eq!(block_on(ctrl.set_emissivity(80)), Ok(()));
        assert_eq!(ctrl.settings().emissivity, 80);
        assert!(ctrl.source().emissivity_sent.is_empty());
    }
}

//! Touch plugin: controller + calibration + touch objects
//!
//! [`TouchPlugin`] owns the controller once initialized, the configuration,
//! and the settings record loaded for its task. One [`TouchPlugin::poll`]
//! per scheduler tick turns a raw controller sample into a [`TouchReport`]:
//!
//! 1. Ask the controller whether the panel is touched.
//! 2. Read the raw sample and drop bogus or too-light readings.
//! 3. Map it through the calibration (or pass it through when inactive).
//! 4. Match the result against the active prefix of the touch objects.
//!
//! Before `init` succeeds every controller call is skipped: `touched` reads
//! `false`, `read_raw` yields `None`, and `poll` reports
//! [`TouchError::NotInitialized`].

use core::fmt::{Debug, Write};

use heapless::Vec;
use log::{debug, info, trace, warn};
use thiserror_no_std::Error;

use crate::calibration::CalibrationState;
use crate::config::TouchConfig;
use crate::controller::{RawTouch, TouchController};
use crate::geometry::Point;
use crate::objects::{ObjectName, TouchObjects};
use crate::settings::{SettingsError, SettingsStore, TaskIndex, TouchSettings};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TouchError {
    #[error("Touch controller not initialized")]
    NotInitialized,
    #[error("Settings error: {0}")]
    Settings(heapless::String<64>),
}

impl<E: Debug> From<SettingsError<E>> for TouchError {
    fn from(err: SettingsError<E>) -> Self {
        let mut msg = heapless::String::new();
        // Overlong messages are truncated
        write!(msg, "{}", err).ok();
        TouchError::Settings(msg)
    }
}

/// Values surfaced to the event layer for one touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchEvent {
    /// Calibrated coordinates
    Coordinates(Point),
    /// Raw pressure
    Pressure(u8),
    /// Name of the touched object
    Object(ObjectName),
}

/// Outcome of a poll that saw an accepted touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchReport {
    /// Reading as delivered by the controller
    pub raw: Point,
    /// Calibrated reading (equal to `raw` without active calibration)
    pub point: Point,
    /// Pressure
    pub z: u8,
    /// Best matching touch object, if any
    pub object: Option<ObjectName>,
}

impl TouchReport {
    /// Events to publish for this touch, honoring the `send_xy` / `send_z`
    /// flags. The object event is always sent when something matched.
    pub fn events(&self, config: &TouchConfig) -> Vec<TouchEvent, 3> {
        let mut events = Vec::new();
        if config.send_xy {
            events.push(TouchEvent::Coordinates(self.point)).ok();
        }
        if config.send_z {
            events.push(TouchEvent::Pressure(self.z)).ok();
        }
        if let Some(name) = &self.object {
            events.push(TouchEvent::Object(name.clone())).ok();
        }
        events
    }
}

pub struct TouchPlugin<C> {
    controller: Option<C>,
    config: TouchConfig,
    settings: TouchSettings,
}

impl<C> Default for TouchPlugin<C>
where
    C: TouchController,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TouchPlugin<C>
where
    C: TouchController,
{
    /// Create an uninitialized plugin
    pub fn new() -> Self {
        Self {
            controller: None,
            config: TouchConfig::default(),
            settings: TouchSettings::default(),
        }
    }

    /// Take ownership of the controller, apply `config`, and load the
    /// settings record of `task`.
    ///
    /// The controller stays initialized even when loading fails; the plugin
    /// then runs with empty settings and the load error is returned.
    pub fn init<S: SettingsStore>(
        &mut self,
        task: TaskIndex,
        mut controller: C,
        config: TouchConfig,
        store: &mut S,
    ) -> Result<(), TouchError> {
        self.reset();

        self.config = config;
        controller.set_rotation(config.rotation);
        controller.begin();
        self.controller = Some(controller);

        info!(
            "Touch plugin init: task {}, cs {}, rotation {}, resolution {}x{}",
            task, config.cs_pin, config.rotation, config.resolution.width, config.resolution.height
        );

        self.load_settings(task, store)
    }

    /// Release the controller
    pub fn reset(&mut self) {
        if self.controller.take().is_some() {
            debug!("Touch controller released");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.controller.is_some()
    }

    /// (Re)load calibration corners and touch objects for `task`.
    ///
    /// Any load failure leaves the plugin with empty settings.
    pub fn load_settings<S: SettingsStore>(
        &mut self,
        task: TaskIndex,
        store: &mut S,
    ) -> Result<(), TouchError> {
        match TouchSettings::load(store, task) {
            Ok(mut settings) => {
                settings.calibration.enabled = self.config.use_calibration;
                self.settings = settings;
                self.check_calibration();
                Ok(())
            }
            Err(e) => {
                warn!("Touch settings not loaded: {}", e);
                self.settings = TouchSettings::default();
                self.settings.calibration.enabled = self.config.use_calibration;
                Err(e.into())
            }
        }
    }

    /// Persist the current calibration corners and touch objects
    pub fn save<S: SettingsStore>(&self, task: TaskIndex, store: &mut S) -> Result<(), TouchError> {
        self.settings.save(store, task)?;
        info!("Touch settings saved for task {}", task);
        Ok(())
    }

    /// Replace the calibration corners, e.g. after a calibration run.
    ///
    /// The enabled flag keeps following the configuration. Degenerate
    /// corners are stored anyway and only logged.
    pub fn set_calibration(&mut self, top_left: Point, bottom_right: Point) {
        self.settings.calibration =
            CalibrationState::new(top_left, bottom_right, self.config.use_calibration);
        self.check_calibration();
    }

    /// Replace the whole touch object list
    pub fn set_objects(&mut self, objects: TouchObjects) {
        self.settings.objects = objects;
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn calibration(&self) -> &CalibrationState {
        &self.settings.calibration
    }

    pub fn objects(&self) -> &TouchObjects {
        &self.settings.objects
    }

    pub fn settings(&self) -> &TouchSettings {
        &self.settings
    }

    /// Panel is touched. Always `false` before `init`.
    pub fn touched(&mut self) -> bool {
        self.controller.as_mut().is_some_and(|c| c.touched())
    }

    /// Raw controller sample, `None` before `init`
    pub fn read_raw(&mut self) -> Option<RawTouch> {
        self.controller.as_mut().map(|c| c.read_raw())
    }

    /// Forward a rotation change; ignored before `init`
    pub fn set_rotation(&mut self, rotation: u8) {
        if let Some(controller) = self.controller.as_mut() {
            controller.set_rotation(rotation);
        }
    }

    pub fn is_calibration_active(&self) -> bool {
        self.settings.calibration.is_active()
    }

    /// Raw to screen coordinates when calibration is active
    pub fn scale_raw_to_calibrated(&self, raw: Point) -> Point {
        self.settings
            .calibration
            .transform(raw, self.config.resolution)
    }

    /// Smallest valid object among the first `active_count` containing `point`
    pub fn touched_object(&self, point: Point, active_count: usize) -> Option<&ObjectName> {
        self.settings.objects.match_point(point, active_count)
    }

    /// Run one touch poll.
    ///
    /// `Ok(None)` when nothing is touching or the sample was rejected.
    pub fn poll(&mut self) -> Result<Option<TouchReport>, TouchError> {
        let controller = self.controller.as_mut().ok_or(TouchError::NotInitialized)?;
        if !controller.touched() {
            return Ok(None);
        }

        let sample = controller.read_raw();
        if sample.is_bogus() || sample.z <= self.config.pressure_threshold {
            trace!(
                "Touch sample rejected: x {} y {} z {} (threshold {})",
                sample.x, sample.y, sample.z, self.config.pressure_threshold
            );
            return Ok(None);
        }

        let raw = sample.point();
        let point = self.scale_raw_to_calibrated(raw);
        let object = self
            .touched_object(point, self.config.active_object_count())
            .cloned();

        debug!(
            "Touch raw ({},{}) -> ({},{}) z {} object {}",
            raw.x,
            raw.y,
            point.x,
            point.y,
            sample.z,
            object.as_ref().map(ObjectName::as_str).unwrap_or("-")
        );

        Ok(Some(TouchReport {
            raw,
            point,
            z: sample.z,
            object,
        }))
    }

    fn check_calibration(&self) {
        let calibration = &self.settings.calibration;
        if !calibration.is_active() {
            return;
        }
        if let Err(e) = calibration.validate(self.config.resolution) {
            warn!("Touch calibration is degenerate: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockController, RecordStore, screen_settings};

    fn calibrated_config() -> TouchConfig {
        TouchConfig {
            use_calibration: true,
            send_z: true,
            rotation: 2,
            ..TouchConfig::default()
        }
    }

    fn init_plugin(
        controller: MockController,
        config: TouchConfig,
    ) -> TouchPlugin<MockController> {
        let mut store = RecordStore::with(&screen_settings());
        let mut plugin = TouchPlugin::new();
        plugin
            .init(1, controller, config, &mut store)
            .expect("init succeeds");
        plugin
    }

    #[test]
    fn test_uninitialized_plugin_skips_controller() {
        let mut plugin: TouchPlugin<MockController> = TouchPlugin::new();

        assert!(!plugin.is_initialized());
        assert!(!plugin.touched());
        assert_eq!(plugin.read_raw(), None);
        plugin.set_rotation(1);
        assert_eq!(plugin.poll(), Err(TouchError::NotInitialized));
    }

    #[test]
    fn test_init_applies_config_and_loads_settings() {
        let plugin = init_plugin(MockController::default(), calibrated_config());

        assert!(plugin.is_initialized());
        let controller = plugin.controller.as_ref().expect("controller kept");
        assert!(controller.begun);
        assert_eq!(controller.rotation, Some(2));

        assert!(plugin.is_calibration_active());
        assert_eq!(plugin.objects().len(), 3);
    }

    #[test]
    fn test_calibration_follows_config_flag() {
        let plugin = init_plugin(MockController::default(), TouchConfig::default());

        assert!(!plugin.is_calibration_active());
        let raw = Point::new(2000, 2000);
        assert_eq!(plugin.scale_raw_to_calibrated(raw), raw);
    }

    #[test]
    fn test_poll_reports_calibrated_point_and_object() {
        let controller = MockController::touching(RawTouch::new(2000, 2000, 80));
        let mut plugin = init_plugin(controller, calibrated_config());

        let report = plugin.poll().expect("initialized").expect("touch accepted");
        assert_eq!(report.raw, Point::new(2000, 2000));
        assert_eq!(report.point, Point::new(120, 160));
        assert_eq!(report.z, 80);
        assert_eq!(report.object, Some(ObjectName::new("ok")));

        let events = report.events(plugin.config());
        assert_eq!(
            events.as_slice(),
            &[
                TouchEvent::Coordinates(Point::new(120, 160)),
                TouchEvent::Pressure(80),
                TouchEvent::Object(ObjectName::new("ok")),
            ]
        );
    }

    #[test]
    fn test_poll_respects_object_count() {
        // Only "screen" is active, so the smaller "ok" is never considered
        let config = TouchConfig {
            object_count: 1,
            ..calibrated_config()
        };
        let controller = MockController::touching(RawTouch::new(2000, 2000, 80));
        let mut plugin = init_plugin(controller, config);

        let report = plugin.poll().expect("initialized").expect("touch accepted");
        assert_eq!(report.object, Some(ObjectName::new("screen")));
    }

    #[test]
    fn test_poll_rejects_light_and_bogus_samples() {
        let config = calibrated_config();

        for sample in [
            RawTouch::new(2000, 2000, config.pressure_threshold),
            RawTouch::new(4095, 2000, 80),
            RawTouch::new(2000, 4095, 80),
            RawTouch::new(2000, 2000, 255),
        ] {
            let mut plugin = init_plugin(MockController::touching(sample), config);
            assert_eq!(plugin.poll(), Ok(None));
        }
    }

    #[test]
    fn test_poll_without_touch_does_not_read() {
        let mut plugin = init_plugin(MockController::default(), calibrated_config());

        assert_eq!(plugin.poll(), Ok(None));
        let controller = plugin.controller.as_ref().expect("controller kept");
        assert_eq!(controller.reads, 0);
    }

    #[test]
    fn test_events_follow_send_flags() {
        let report = TouchReport {
            raw: Point::new(1, 2),
            point: Point::new(3, 4),
            z: 9,
            object: None,
        };

        let config = TouchConfig {
            send_xy: false,
            send_z: false,
            ..TouchConfig::default()
        };
        assert!(report.events(&config).is_empty());

        let config = TouchConfig::default();
        assert_eq!(
            report.events(&config).as_slice(),
            &[TouchEvent::Coordinates(Point::new(3, 4))]
        );
    }

    #[test]
    fn test_failed_load_keeps_controller_with_empty_settings() {
        let mut store = RecordStore::with(&screen_settings());
        store.fail = true;

        let mut plugin = TouchPlugin::new();
        let result = plugin.init(5, MockController::default(), calibrated_config(), &mut store);

        assert!(matches!(result, Err(TouchError::Settings(_))));
        assert!(plugin.is_initialized());
        assert!(plugin.objects().is_empty());
        assert!(!plugin.is_calibration_active());
    }

    #[test]
    fn test_missing_record_means_uncalibrated_passthrough() {
        let mut store = RecordStore::empty();
        let mut plugin = TouchPlugin::new();
        plugin
            .init(0, MockController::default(), calibrated_config(), &mut store)
            .expect("init succeeds");

        assert!(!plugin.is_calibration_active());
        assert!(plugin.objects().is_empty());
        assert_eq!(plugin.touched_object(Point::new(10, 10), 40), None);
    }

    #[test]
    fn test_set_calibration_and_save_round_trip_through_store() {
        let mut store = RecordStore::empty();
        let mut plugin = TouchPlugin::new();
        plugin
            .init(0, MockController::default(), calibrated_config(), &mut store)
            .expect("init succeeds");

        plugin.set_calibration(Point::new(150, 200), Point::new(3800, 3700));
        plugin.set_objects(screen_settings().objects);
        assert!(plugin.is_calibration_active());
        plugin.save(0, &mut store).expect("save succeeds");

        let mut reloaded = TouchPlugin::new();
        reloaded
            .init(0, MockController::default(), calibrated_config(), &mut store)
            .expect("init succeeds");
        assert_eq!(reloaded.settings(), plugin.settings());
    }

    #[test]
    fn test_reset_releases_controller() {
        let mut plugin = init_plugin(MockController::default(), calibrated_config());
        plugin.reset();

        assert!(!plugin.is_initialized());
        assert_eq!(plugin.poll(), Err(TouchError::NotInitialized));
        // Settings survive a reset
        assert_eq!(plugin.objects().len(), 3);
    }

    #[test]
    fn test_settings_error_message_is_kept() {
        let err: TouchError = SettingsError::Load {
            task: 3,
            error: "io",
        }
        .into();
        match err {
            TouchError::Settings(msg) => assert!(msg.starts_with("Failed to load settings for task 3")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

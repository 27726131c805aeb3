//! Shared fakes for unit tests

use crate::calibration::CalibrationState;
use crate::controller::{RawTouch, TouchController};
use crate::geometry::Point;
use crate::objects::{TouchObject, TouchObjects};
use crate::settings::{RECORD_SIZE, SettingsStore, TaskIndex, TouchSettings};

/// Controller returning one fixed sample
#[derive(Debug, Default)]
pub(crate) struct MockController {
    pub touching: bool,
    pub sample: RawTouch,
    pub rotation: Option<u8>,
    pub begun: bool,
    pub reads: usize,
}

impl MockController {
    pub fn touching(sample: RawTouch) -> Self {
        Self {
            touching: true,
            sample,
            ..Default::default()
        }
    }
}

impl TouchController for MockController {
    fn begin(&mut self) {
        self.begun = true;
    }

    fn touched(&mut self) -> bool {
        self.touching
    }

    fn read_raw(&mut self) -> RawTouch {
        self.reads += 1;
        self.sample
    }

    fn set_rotation(&mut self, rotation: u8) {
        self.rotation = Some(rotation);
    }
}

/// Store keeping one record for whichever task asks
pub(crate) struct RecordStore {
    pub record: Option<[u8; RECORD_SIZE]>,
    pub fail: bool,
}

impl RecordStore {
    pub fn with(settings: &TouchSettings) -> Self {
        Self {
            record: Some(settings.to_bytes()),
            fail: false,
        }
    }

    pub fn empty() -> Self {
        Self {
            record: None,
            fail: false,
        }
    }
}

impl SettingsStore for RecordStore {
    type Error = &'static str;

    fn load(&mut self, _task: TaskIndex, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail {
            return Err("io");
        }
        match &self.record {
            Some(record) => {
                buf[..RECORD_SIZE].copy_from_slice(record);
                Ok(RECORD_SIZE)
            }
            None => Ok(0),
        }
    }

    fn save(&mut self, _task: TaskIndex, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err("io");
        }
        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(data);
        self.record = Some(record);
        Ok(())
    }
}

/// Full-screen panel with an "ok" button in the middle and a "cancel"
/// corner, calibrated for (100,100)-(3900,3900)
pub(crate) fn screen_settings() -> TouchSettings {
    let mut objects = TouchObjects::new();
    objects
        .push(TouchObject::new("screen", Point::new(0, 0), Point::new(239, 319)))
        .ok();
    objects
        .push(TouchObject::new("ok", Point::new(100, 140), Point::new(140, 180)))
        .ok();
    objects
        .push(TouchObject::new("cancel", Point::new(0, 0), Point::new(30, 30)))
        .ok();

    TouchSettings {
        calibration: CalibrationState::new(Point::new(100, 100), Point::new(3900, 3900), false),
        objects,
    }
}

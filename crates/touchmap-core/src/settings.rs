//! Persisted calibration and touch object record
//!
//! The calibration corners and the whole touch object list are stored as one
//! contiguous record per task, in the layout the device firmware has always
//! used, so existing records load unchanged.
//!
//! Binary format (little-endian):
//! - calibration top_left x, y: 4 bytes (2 × u16)
//! - calibration bottom_right x, y: 4 bytes (2 × u16)
//! - objects: 40 × 24 bytes
//!   - name: 15 bytes (zero padded, last byte always 0)
//!   - padding: 1 byte
//!   - top_left x, y: 4 bytes (2 × u16)
//!   - bottom_right x, y: 4 bytes (2 × u16)
//!
//! Total: 968 bytes

use core::fmt::Debug;

use log::{debug, warn};
use thiserror_no_std::Error;

use crate::calibration::CalibrationState;
use crate::geometry::Point;
use crate::objects::{MAX_OBJECT_COUNT, OBJECT_NAME_LEN, ObjectName, TouchObject, TouchObjects};

/// Identifies the task (plugin instance) a record belongs to
pub type TaskIndex = u8;

/// Size of the calibration part of the record
pub const CALIBRATION_RECORD_SIZE: usize = 8;

/// Size of one stored touch object
pub const OBJECT_RECORD_SIZE: usize = 24;

/// Size of the full record
pub const RECORD_SIZE: usize = CALIBRATION_RECORD_SIZE + OBJECT_RECORD_SIZE * MAX_OBJECT_COUNT;

/// Byte-blob storage keyed by task.
///
/// `load` fills as much of `buf` as the stored record covers and returns the
/// number of bytes written. A task with nothing stored returns `Ok(0)`.
pub trait SettingsStore {
    type Error: Debug;

    fn load(&mut self, task: TaskIndex, buf: &mut [u8]) -> Result<usize, Self::Error>;

    fn save(&mut self, task: TaskIndex, data: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Debug, Error)]
pub enum SettingsError<E: Debug> {
    #[error("Failed to load settings for task {task}: {error:?}")]
    Load { task: TaskIndex, error: E },
    #[error("Failed to save settings for task {task}: {error:?}")]
    Save { task: TaskIndex, error: E },
}

/// Calibration corners and touch objects of one task.
///
/// The stored record has no room for the "calibration enabled" flag; it comes
/// from the plugin configuration, so decoded settings always have
/// `calibration.enabled == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchSettings {
    pub calibration: CalibrationState,
    pub objects: TouchObjects,
}

impl TouchSettings {
    /// Encode to the stored layout.
    ///
    /// Object slots past the end of the list are written as zeroes.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];

        write_point(&mut bytes[0..4], self.calibration.top_left);
        write_point(&mut bytes[4..8], self.calibration.bottom_right);

        for (slot, object) in self.objects.iter().enumerate() {
            let offset = CALIBRATION_RECORD_SIZE + slot * OBJECT_RECORD_SIZE;
            let record = &mut bytes[offset..offset + OBJECT_RECORD_SIZE];

            record[..OBJECT_NAME_LEN].copy_from_slice(&object.name().to_field());
            // record[15] is padding and stays zero
            write_point(&mut record[16..20], object.top_left());
            write_point(&mut record[20..24], object.bottom_right());
        }

        bytes
    }

    /// Decode a stored record.
    ///
    /// A short blob is padded with zeroes, which reads as "not configured".
    /// Trailing all-zero object slots are dropped; earlier empty slots are
    /// kept so every object stays at its stored index.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bytes = [0u8; RECORD_SIZE];
        let len = data.len().min(RECORD_SIZE);
        bytes[..len].copy_from_slice(&data[..len]);

        let calibration = CalibrationState {
            top_left: read_point(&bytes[0..4]),
            bottom_right: read_point(&bytes[4..8]),
            enabled: false,
        };

        let used_slots = (0..MAX_OBJECT_COUNT)
            .rev()
            .find(|&slot| {
                let offset = CALIBRATION_RECORD_SIZE + slot * OBJECT_RECORD_SIZE;
                bytes[offset..offset + OBJECT_RECORD_SIZE]
                    .iter()
                    .any(|&b| b != 0)
            })
            .map_or(0, |slot| slot + 1);

        let mut objects = TouchObjects::new();
        for slot in 0..used_slots {
            let offset = CALIBRATION_RECORD_SIZE + slot * OBJECT_RECORD_SIZE;
            let record = &bytes[offset..offset + OBJECT_RECORD_SIZE];

            let mut field = [0u8; OBJECT_NAME_LEN];
            field.copy_from_slice(&record[..OBJECT_NAME_LEN]);

            let object = TouchObject::new(
                ObjectName::from_field(&field),
                read_point(&record[16..20]),
                read_point(&record[20..24]),
            );
            // used_slots <= MAX_OBJECT_COUNT, so this always fits
            objects.push(object).ok();
        }

        Self {
            calibration,
            objects,
        }
    }

    /// Load the record of `task`, or empty settings when nothing is stored.
    pub fn load<S: SettingsStore>(
        store: &mut S,
        task: TaskIndex,
    ) -> Result<Self, SettingsError<S::Error>> {
        let mut buf = [0u8; RECORD_SIZE];
        let read = store
            .load(task, &mut buf)
            .map_err(|error| SettingsError::Load { task, error })?;

        if read < RECORD_SIZE {
            if read > 0 {
                warn!(
                    "Settings record of task {} is short ({} of {} bytes)",
                    task, read, RECORD_SIZE
                );
            } else {
                debug!("No settings stored for task {}", task);
            }
        }

        let settings = Self::from_bytes(&buf[..read.min(RECORD_SIZE)]);
        debug!(
            "Loaded settings for task {}: {} touch objects",
            task,
            settings.objects.len()
        );
        Ok(settings)
    }

    pub fn save<S: SettingsStore>(
        &self,
        store: &mut S,
        task: TaskIndex,
    ) -> Result<(), SettingsError<S::Error>> {
        store
            .save(task, &self.to_bytes())
            .map_err(|error| SettingsError::Save { task, error })
    }
}

fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn read_point(bytes: &[u8]) -> Point {
    Point::new(read_u16(&bytes[0..2]), read_u16(&bytes[2..4]))
}

fn write_point(bytes: &mut [u8], point: Point) {
    bytes[0..2].copy_from_slice(&point.x.to_le_bytes());
    bytes[2..4].copy_from_slice(&point.y.to_le_bytes());
}

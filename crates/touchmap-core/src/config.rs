//! Plugin configuration surface
//!
//! Set once when the plugin is initialized. Persisted separately from the
//! calibration/object record using `postcard`.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::geometry::Resolution;
use crate::objects::MAX_OBJECT_COUNT;

/// Upper bound for an encoded [`TouchConfig`]
pub const CONFIG_ENCODED_MAX: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to encode touch configuration: {0}")]
    Encode(postcard::Error),
    #[error("Failed to decode touch configuration: {0}")]
    Decode(postcard::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchConfig {
    /// Chip-select GPIO of the controller
    pub cs_pin: u8,
    /// Panel rotation (0-3), passed to the controller
    pub rotation: u8,
    /// Samples with pressure at or below this are ignored
    pub pressure_threshold: u8,
    /// Report calibrated x/y on every touch
    pub send_xy: bool,
    /// Report pressure on every touch
    pub send_z: bool,
    /// Apply the stored calibration
    pub use_calibration: bool,
    /// Calibration target
    pub resolution: Resolution,
    /// Number of leading touch objects taking part in matching
    pub object_count: u8,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            cs_pin: 0,
            rotation: 0,
            pressure_threshold: 15,
            send_xy: true,
            send_z: false,
            use_calibration: false,
            resolution: Resolution::default(),
            object_count: 8,
        }
    }
}

impl TouchConfig {
    /// `object_count` clamped to the object capacity
    pub fn active_object_count(&self) -> usize {
        usize::from(self.object_count).min(MAX_OBJECT_COUNT)
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(ConfigError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(ConfigError::Decode)
    }
}

//! Hardware-independent core library for touchmap
//!
//! This crate turns raw touch controller readings into calibrated screen
//! coordinates and resolves which named touch object was hit. It also owns
//! the persisted settings record, the plugin configuration, and the plugin
//! lifecycle that ties a controller and a settings store together.
//!
//! It is `#![no_std]` and allocation-free so it compiles on both embedded
//! targets and desktop hosts (for the simulator and tests).

#![no_std]

pub mod calibration;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod objects;
pub mod plugin;
pub mod settings;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use calibration::{CalibrationError, CalibrationState};
pub use config::{ConfigError, TouchConfig};
pub use controller::{RawTouch, TouchController};
pub use geometry::{Point, Resolution};
pub use objects::{ObjectName, TouchObject, TouchObjects};
pub use plugin::{TouchError, TouchEvent, TouchPlugin, TouchReport};
pub use settings::{SettingsError, SettingsStore, TaskIndex, TouchSettings};
pub use shared::SharedTouchPlugin;

//! Coordinate types shared by calibration and touch object matching

use serde::{Deserialize, Serialize};

/// A 2D point, either in raw controller units or in target-resolution pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Both coordinates are non-zero
    pub const fn is_set(&self) -> bool {
        self.x > 0 && self.y > 0
    }
}

impl From<(u16, u16)> for Point {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

/// Logical display span used as the calibration target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Resolution {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    /// 240x320, the panel the XPT2046 is usually paired with
    fn default() -> Self {
        Self::new(240, 320)
    }
}

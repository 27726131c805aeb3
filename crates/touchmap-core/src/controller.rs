//! Touch controller capability
//!
//! The resistive controller driver (SPI transfers, pen IRQ, rotation
//! registers) lives outside this crate. The plugin only needs the few calls
//! below, so any driver can be adapted with a thin wrapper.

use crate::geometry::Point;

/// Raw x reading at or above this value is a bogus read
pub const TOUCH_X_INVALID: u16 = 4095;

/// Raw y reading at or above this value is a bogus read
pub const TOUCH_Y_INVALID: u16 = 4095;

/// Raw pressure equal to this value is a bogus read
pub const TOUCH_Z_INVALID: u8 = 255;

/// One raw controller sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTouch {
    pub x: u16,
    pub y: u16,
    /// Pressure
    pub z: u8,
}

impl RawTouch {
    pub const fn new(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }

    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Reading carries one of the controller's "no data" sentinels
    pub const fn is_bogus(&self) -> bool {
        self.x >= TOUCH_X_INVALID || self.y >= TOUCH_Y_INVALID || self.z == TOUCH_Z_INVALID
    }
}

/// Minimal interface of a single-touch controller driver
pub trait TouchController {
    /// Bring the controller up. Called once from `TouchPlugin::init`.
    fn begin(&mut self) {}

    /// Something is touching the panel
    fn touched(&mut self) -> bool;

    /// Read the current raw sample
    fn read_raw(&mut self) -> RawTouch;

    /// Select panel rotation (0-3)
    fn set_rotation(&mut self, rotation: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bogus_reads() {
        assert!(!RawTouch::new(2000, 2000, 40).is_bogus());
        assert!(RawTouch::new(4095, 2000, 40).is_bogus());
        assert!(RawTouch::new(2000, 4095, 40).is_bogus());
        assert!(RawTouch::new(2000, 2000, 255).is_bogus());
        assert!(!RawTouch::new(4094, 4094, 254).is_bogus());
    }
}

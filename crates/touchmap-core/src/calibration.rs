//! Raw-to-screen coordinate calibration
//!
//! A calibration is two reference corners captured in raw controller units:
//! the raw reading at the top-left of the screen and the raw reading at the
//! bottom-right. Each axis is mapped linearly so that the top-left corner
//! lands on 0 and the bottom-right corner lands on the target resolution.
//!
//! # Behavior at the edges
//!
//! - Readings at or below the top-left corner clamp to 0.
//! - Readings beyond the bottom-right corner are *not* clamped and scale past
//!   the target resolution.
//! - Results are the exact quotient truncated toward zero, never rounded.
//! - Degenerate corners (empty or inverted span) are not rejected by
//!   [`CalibrationState::transform`]. The affected axis saturates to
//!   `u16::MAX` (empty span) or 0 (inverted span, zero resolution) rather
//!   than panicking. Callers that care should run
//!   [`CalibrationState::validate`] before enabling a calibration.

use thiserror_no_std::Error;

use crate::geometry::{Point, Resolution};

/// Problems [`CalibrationState::validate`] can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalibrationError {
    /// Target resolution has a zero dimension
    #[error("Target resolution {width}x{height} has a zero dimension")]
    ZeroResolution { width: u16, height: u16 },

    /// Bottom-right corner is not strictly past the top-left corner
    #[error("Calibration span on the {axis} axis is empty or inverted ({low}..{high})")]
    EmptySpan { axis: char, low: u16, high: u16 },
}

/// Two reference corners plus the operator's intent to use them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibrationState {
    /// Raw reading at the top-left corner of the screen
    pub top_left: Point,
    /// Raw reading at the bottom-right corner of the screen
    pub bottom_right: Point,
    /// Operator wants calibration applied
    pub enabled: bool,
}

impl CalibrationState {
    pub const fn new(top_left: Point, bottom_right: Point, enabled: bool) -> Self {
        Self {
            top_left,
            bottom_right,
            enabled,
        }
    }

    /// Enabled and all corner coordinates non-zero.
    ///
    /// All-zero corners mean "not calibrated yet", in which case raw
    /// coordinates pass through untouched.
    pub const fn is_active(&self) -> bool {
        self.enabled && self.top_left.is_set() && self.bottom_right.is_set()
    }

    /// Map a raw reading to target-resolution coordinates.
    ///
    /// Returns `raw` unchanged when the calibration is not active.
    pub fn transform(&self, raw: Point, resolution: Resolution) -> Point {
        if !self.is_active() {
            return raw;
        }

        Point {
            x: scale_axis(raw.x, self.top_left.x, self.bottom_right.x, resolution.width),
            y: scale_axis(raw.y, self.top_left.y, self.bottom_right.y, resolution.height),
        }
    }

    /// Check that both axes have a positive span and the target is non-empty.
    pub fn validate(&self, resolution: Resolution) -> Result<(), CalibrationError> {
        if resolution.width == 0 || resolution.height == 0 {
            return Err(CalibrationError::ZeroResolution {
                width: resolution.width,
                height: resolution.height,
            });
        }

        if self.bottom_right.x <= self.top_left.x {
            return Err(CalibrationError::EmptySpan {
                axis: 'x',
                low: self.top_left.x,
                high: self.bottom_right.x,
            });
        }

        if self.bottom_right.y <= self.top_left.y {
            return Err(CalibrationError::EmptySpan {
                axis: 'y',
                low: self.top_left.y,
                high: self.bottom_right.y,
            });
        }

        Ok(())
    }
}

/// Scale one axis. `low`/`high` are the calibrated raw bounds, `span` the
/// target resolution along this axis.
///
/// `delta / ((high - low) / span)` is evaluated as `delta * span / (high - low)`
/// so the truncated result is exact.
fn scale_axis(raw: u16, low: u16, high: u16, span: u16) -> u16 {
    let delta = i32::from(raw) - i32::from(low);
    if delta <= 0 || span == 0 {
        return 0;
    }

    let width = i32::from(high) - i32::from(low);
    if width < 0 {
        // Inverted corners: negative factor
        return 0;
    }
    if width == 0 {
        // Empty span: zero factor
        return u16::MAX;
    }

    // Both factors fit in u16, so the product fits in u32
    let scaled = delta.unsigned_abs() * u32::from(span) / width.unsigned_abs();
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

//! Named touch objects: rectangular screen regions used as hit-test targets
//!
//! Objects are defined in target-resolution coordinates and kept in
//! definition order inside [`TouchObjects`]. Definition order matters: it is
//! the tie-break order when overlapping objects have equal area.

mod matcher;

pub use matcher::TouchObjects;

use core::fmt;

use crate::geometry::Point;

/// Maximum number of touch objects per task
pub const MAX_OBJECT_COUNT: usize = 40;

/// Stored size of a name field in bytes, terminator included
pub const OBJECT_NAME_LEN: usize = 15;

/// Usable characters in a name
pub const OBJECT_NAME_CAPACITY: usize = OBJECT_NAME_LEN - 1;

/// Names starting with this character are never matched
pub const HIDE_MARKER: char = '_';

/// Fixed-capacity object name.
///
/// Holds at most [`OBJECT_NAME_CAPACITY`] bytes of UTF-8. When written back
/// to its stored field the remaining bytes, and always the last one, are
/// zero, so the field stays terminated even if the source bytes were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectName(heapless::String<OBJECT_NAME_CAPACITY>);

impl ObjectName {
    /// Build a name from text, truncating on a character boundary once the
    /// capacity is reached. A NUL ends the name early.
    pub fn new(name: &str) -> Self {
        let mut text = heapless::String::new();
        for c in name.chars() {
            if c == '\0' || text.push(c).is_err() {
                break;
            }
        }
        Self(text)
    }

    /// Decode a stored name field.
    ///
    /// The last byte is ignored (treated as the terminator). Decoding stops at
    /// the first NUL or at the first byte that is not valid UTF-8, so
    /// uninitialized storage degrades to a shorter, usually empty, name.
    pub fn from_field(field: &[u8; OBJECT_NAME_LEN]) -> Self {
        let bytes = &field[..OBJECT_NAME_CAPACITY];
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let bytes = &bytes[..end];

        let text = match core::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        };

        Self::new(text)
    }

    /// Encode into a zero-padded, zero-terminated field
    pub fn to_field(&self) -> [u8; OBJECT_NAME_LEN] {
        let mut field = [0u8; OBJECT_NAME_LEN];
        let bytes = self.0.as_bytes();
        field[..bytes.len()].copy_from_slice(bytes);
        field
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Starts with [`HIDE_MARKER`]
    pub fn is_hidden(&self) -> bool {
        self.0.starts_with(HIDE_MARKER)
    }
}

impl AsRef<str> for ObjectName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ObjectName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A named, axis-aligned rectangle in target-resolution coordinates.
///
/// The surface area is computed once when the object is built; bounds are
/// immutable afterwards, so the cached value can never go stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchObject {
    name: ObjectName,
    top_left: Point,
    bottom_right: Point,
    area: u32,
}

impl TouchObject {
    pub fn new(name: impl Into<ObjectName>, top_left: Point, bottom_right: Point) -> Self {
        Self {
            name: name.into(),
            top_left,
            bottom_right,
            area: surface_area(top_left, bottom_right),
        }
    }

    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    /// Width times height. Inverted boxes have zero area.
    pub fn area(&self) -> u32 {
        self.area
    }

    /// Takes part in matching: named, not hidden, bottom-right corner set.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.name.is_hidden() && self.bottom_right.is_set()
    }

    /// Inclusive on both corners
    pub fn contains(&self, point: Point) -> bool {
        self.top_left.x <= point.x
            && self.top_left.y <= point.y
            && self.bottom_right.x >= point.x
            && self.bottom_right.y >= point.y
    }
}

fn surface_area(top_left: Point, bottom_right: Point) -> u32 {
    let width = u32::from(bottom_right.x.saturating_sub(top_left.x));
    let height = u32::from(bottom_right.y.saturating_sub(top_left.y));
    width * height
}

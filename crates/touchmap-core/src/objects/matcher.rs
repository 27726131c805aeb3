//! Ordered touch object collection and smallest-area hit testing

use heapless::Vec;
use log::trace;

use super::{MAX_OBJECT_COUNT, ObjectName, TouchObject};
use crate::geometry::Point;

/// Fixed-capacity, definition-ordered list of touch objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchObjects {
    objects: Vec<TouchObject, MAX_OBJECT_COUNT>,
}

impl TouchObjects {
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Append an object. Hands it back when the list is full.
    pub fn push(&mut self, object: TouchObject) -> Result<(), TouchObject> {
        self.objects.push(object)
    }

    pub fn get(&self, index: usize) -> Option<&TouchObject> {
        self.objects.get(index)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchObject> {
        self.objects.iter()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Find the object hit by `point` among the first `active_count` objects.
    ///
    /// Invalid objects are skipped. When several objects contain the point the
    /// smallest one wins, so a button drawn on top of a panel is picked over
    /// the panel. On equal area the earlier definition wins.
    ///
    /// A zero-area match does not lock in: while the best area recorded so far
    /// is 0, any later containing object replaces it.
    pub fn match_point(&self, point: Point, active_count: usize) -> Option<&ObjectName> {
        let mut best: Option<&TouchObject> = None;
        let mut best_area = 0u32;

        for (index, object) in self.objects.iter().take(active_count).enumerate() {
            if !object.is_valid() {
                continue;
            }

            let area = object.area();
            if object.contains(point) && (best_area == 0 || area < best_area) {
                best = Some(object);
                best_area = area;
            }

            trace!(
                "check touched: obj #{} {} ({},{})-({},{}) surface: {} x,y: {},{} sel: {}",
                index,
                object.name(),
                object.top_left().x,
                object.top_left().y,
                object.bottom_right().x,
                object.bottom_right().y,
                area,
                point.x,
                point.y,
                best.map(|o| o.name().as_str()).unwrap_or("")
            );
        }

        best.map(TouchObject::name)
    }
}

impl<'a> IntoIterator for &'a TouchObjects {
    type Item = &'a TouchObject;
    type IntoIter = core::slice::Iter<'a, TouchObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

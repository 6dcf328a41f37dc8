//! Repeated-structure containers
//!
//! Entities with a variable number of same-shaped sub-records use one of
//! two container shapes: a bounded sequence with a compile-time capacity
//! ceiling (proprietary data lines, dash patterns) or an unbounded list
//! grown one node per repeating group-code triplet (vertex points,
//! binary chunks).

use crate::error::{DxfError, Result};
use crate::types::Vector3;

/// An explicit-length growable sequence with a hard capacity ceiling.
///
/// Replaces the historical fixed array with a first-empty-entry sentinel:
/// the logical length is tracked explicitly and pushing past the ceiling
/// is an error instead of undefined behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedSeq<T, const CAP: usize> {
    items: Vec<T>,
    what: &'static str,
}

impl<T, const CAP: usize> BoundedSeq<T, CAP> {
    /// Create an empty sequence; `what` names the field in errors.
    pub fn new(what: &'static str) -> Self {
        Self {
            items: Vec::new(),
            what,
        }
    }

    /// Append an item, failing once the ceiling is reached.
    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() >= CAP {
            return Err(DxfError::CapacityExceeded {
                what: self.what,
                cap: CAP,
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// The compile-time capacity ceiling.
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the populated prefix in push order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// View the populated prefix.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Drop all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T, const CAP: usize> IntoIterator for &'a BoundedSeq<T, CAP> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// An unbounded list of points grown while decoding a repeating
/// x/y/z group-code triplet.
///
/// A new point is started every time the x code recurs; the y and z
/// codes complete the most recent point.  Each repeating field keeps its
/// own position, so sibling repeating fields never share a counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointList {
    points: Vec<Vector3>,
}

impl PointList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new point from its x value.
    pub fn start_with_x(&mut self, x: f64) {
        self.points.push(Vector3::new(x, 0.0, 0.0));
    }

    /// Set the y value of the point under construction.
    /// Returns `false` when no point has been started yet.
    pub fn set_last_y(&mut self, y: f64) -> bool {
        match self.points.last_mut() {
            Some(p) => {
                p.y = y;
                true
            }
            None => false,
        }
    }

    /// Set the z value of the point under construction.
    /// Returns `false` when no point has been started yet.
    pub fn set_last_z(&mut self, z: f64) -> bool {
        match self.points.last_mut() {
            Some(p) => {
                p.z = z;
                true
            }
            None => false,
        }
    }

    /// Append a complete point (builder-side API).
    pub fn push(&mut self, point: Vector3) {
        self.points.push(point);
    }

    /// Number of points started so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate in decode order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vector3> {
        self.points.iter()
    }

    /// View the points.
    pub fn as_slice(&self) -> &[Vector3] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a PointList {
    type Item = &'a Vector3;
    type IntoIter = std::slice::Iter<'a, Vector3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

//! Points and point-set helpers.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// A planar point, optionally stamped with the time it was observed.
///
/// Equality, hashing and ordering are by value over all fields. The timestamp
/// never participates in distance computations.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// First coordinate (longitude for geolocated points).
    pub x: f64,
    /// Second coordinate (latitude for geolocated points).
    pub y: f64,
    /// Optional observation time.
    pub timestamp: Option<f64>,
}

impl Point {
    /// Create an untimed point.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            timestamp: None,
        }
    }

    /// Attach an observation time.
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn key(&self) -> (u64, u64, Option<u64>) {
        (bits(self.x), bits(self.y), self.timestamp.map(bits))
    }
}

// `-0.0` and `0.0` compare equal as floats, so they must hash alike.
#[inline]
fn bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        let ts = |p: &Point| p.timestamp.map(|t| if t == 0.0 { 0.0 } else { t });
        norm(self.x)
            .total_cmp(&norm(other.x))
            .then_with(|| norm(self.y).total_cmp(&norm(other.y)))
            .then_with(|| match (ts(self), ts(other)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.total_cmp(&b),
            })
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn norm(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Point {
    /// `(timestamp, x, y)`, the layout of a raw event record.
    fn from((t, x, y): (f64, f64, f64)) -> Self {
        Self::new(x, y).with_timestamp(t)
    }
}

/// Drop repeated points, keeping the first occurrence of each.
pub(crate) fn dedup_in_order<I>(points: I) -> Vec<Point>
where
    I: IntoIterator<Item = Point>,
{
    let mut seen = HashSet::new();
    points.into_iter().filter(|p| seen.insert(*p)).collect()
}

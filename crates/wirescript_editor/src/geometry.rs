// SPDX-License-Identifier: MIT OR Apache-2.0
//! Screen-space primitives and the segment/rectangle intersection tests
//! behind crossing selection.

use serde::{Deserialize, Serialize};

/// Tolerance for treating a cross product as zero.
///
/// Screen coordinates arrive as floats that have been through a pan/zoom
/// transform; exact comparison would misclassify nearly-collinear points.
pub const EPSILON: f32 = 1e-4;

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal coordinate in pixels
    pub x: f32,
    /// Vertical coordinate in pixels
    pub y: f32,
}

impl ScreenPoint {
    /// Construct a point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point
    pub fn distance(self, other: ScreenPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in screen space, stored normalized
/// (`min <= max` on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Top-left corner
    pub min: ScreenPoint,
    /// Bottom-right corner
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Build a normalized rectangle from two arbitrary opposite corners
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            min: ScreenPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: ScreenPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Rectangle width
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether a point lies inside (inclusive of edges)
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether `other` lies fully inside this rectangle
    pub fn contains_rect(&self, other: &ScreenRect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Whether the rectangles overlap at all
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// The four corners, clockwise from top-left
    fn corners(&self) -> [ScreenPoint; 4] {
        [
            self.min,
            ScreenPoint::new(self.max.x, self.min.y),
            self.max,
            ScreenPoint::new(self.min.x, self.max.y),
        ]
    }
}

/// Turn direction of the triplet (p, q, r)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: ScreenPoint, q: ScreenPoint, r: ScreenPoint) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val.abs() < EPSILON {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q`, known collinear with segment (p, r), lies within its
/// bounding box. Bounds are widened by [`EPSILON`] so shared endpoints
/// still count.
fn on_segment(p: ScreenPoint, q: ScreenPoint, r: ScreenPoint) -> bool {
    q.x <= p.x.max(r.x) + EPSILON
        && q.x >= p.x.min(r.x) - EPSILON
        && q.y <= p.y.max(r.y) + EPSILON
        && q.y >= p.y.min(r.y) - EPSILON
}

/// Whether segments (p1, p2) and (p3, p4) intersect, including touching
/// endpoints and collinear overlap
pub fn segments_intersect(
    p1: ScreenPoint,
    p2: ScreenPoint,
    p3: ScreenPoint,
    p4: ScreenPoint,
) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases: an endpoint of one segment lies on the other
    (o1 == Orientation::Collinear && on_segment(p1, p3, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, p4, p2))
        || (o3 == Orientation::Collinear && on_segment(p3, p1, p4))
        || (o4 == Orientation::Collinear && on_segment(p3, p2, p4))
}

/// Whether the segment (a, b) touches the rectangle in any way: an
/// endpoint inside it, or a crossing of any of its four edges
pub fn segment_intersects_rect(a: ScreenPoint, b: ScreenPoint, rect: &ScreenRect) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let corners = rect.corners();
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}

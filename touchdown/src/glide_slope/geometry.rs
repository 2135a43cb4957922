//! Window-space geometry primitives.
//!
//! Window coordinates follow the overlay convention: x grows to the right
//! and y grows upward, so `top > bottom` for any non-empty rectangle.

use std::fmt;

/// A point in window units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether either coordinate moved by more than `threshold`.
    pub fn differs_from(&self, other: &Point, threshold: f32) -> bool {
        (other.x - self.x).abs() > threshold || (other.y - self.y).abs() > threshold
    }

    /// Reflect horizontally around the vertical line at `axis_x`.
    pub fn mirrored_x(self, axis_x: f32) -> Self {
        Self {
            x: axis_x - (self.x - axis_x),
            y: self.y,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Axis-aligned rectangle in window units (y up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle anchored at the origin with the given size.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, height, width, 0.0)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Shrink by `dx` on the left and right, `dy` on the top and bottom.
    pub fn deflate(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top - dy,
            right: self.right - dx,
            bottom: self.bottom + dy,
        }
    }

    /// Whether `point` lies inside or on the edge.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    /// Bottom left corner.
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    /// Top right corner.
    pub fn top_right(&self) -> Point {
        Point::new(self.right, self.top)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}, {:.1}, {:.1}, {:.1}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

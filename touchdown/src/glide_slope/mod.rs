//! Glide slope overlay and flight path projection.
//!
//! Maps the recorded flight onto a side view of a nominal 3° glide slope.
//! World coordinates are distance from the landing point (meters,
//! horizontal) and height above ground (meters, vertical).
//!
//! # Layout
//!
//! ```text
//!  frame ┌─────────────────────────────────────────────┐
//!        │ Vg/Vy/AGL/MSL                        ╱ ▲     │
//!        │                               ╱╱╱╱╱╱   │ slope│
//!        │                      ╱╱╱╱╱╱╱           │height│
//!        │            ╱╱╱╱╱╱╱╱                    ▼     │
//!        │  rollout ◄─●──── approach ──────────────────►│
//!        └────────────┼────────────────────────────────┘
//!          runway     landing point     approach distance
//! ```
//!
//! The landing point sits at the bottom left of the slope rectangle; the
//! horizontal share left of it is `runway / (runway + approach)` of the
//! view. World x spans `[0, approach]` over the slope width and world y
//! spans `[0, approach * tan 3°]` over the slope height.

mod geometry;
mod path;

pub use geometry::{Line, Point, Rect};
pub use path::{ApproachTrend, GlidePath, PathMode, PathPoints};

use crate::geo::{meters_to_feet, ms_to_fpm, ms_to_knots, round_off, FT_TO_METERS, NM_TO_METERS};
use crate::telemetry::TelemetrySample;

/// Tangent of the nominal 3° glide slope.
pub const TAN_3_DEG: f32 = 0.05240778;

/// Margin between frame and view, as a fraction of the frame size.
pub const VIEW_MARGIN: f32 = 0.005;

/// Gap between the view top and the slope wedge, as a fraction of view height.
pub const SLOPE_TOP_OFFSET: f32 = 0.05;

/// Slope wedge height on the right edge, as a fraction of view height.
pub const SLOPE_HEIGHT_RATIO: f32 = 0.25;

/// Minimum movement in window units before a new path vertex is emitted.
pub const POINT_DIFFERENCE_THRESHOLD: f32 = 0.5;

/// Grid spacing below this many window units draws no grid.
pub const MIN_GRID_SPACING: f32 = 1.0;

/// Reference distances for the overlay (all meters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideSlopeConfig {
    /// Distance drawn left of the landing point.
    pub runway_distance_m: f64,
    /// Distance drawn right of the landing point.
    pub approach_distance_m: f64,
    /// Spacing between vertical grid lines.
    pub vertical_grid_m: f64,
    /// Spacing between horizontal grid lines.
    pub horizontal_grid_m: f64,
}

impl Default for GlideSlopeConfig {
    fn default() -> Self {
        Self {
            runway_distance_m: 0.5 * NM_TO_METERS,
            approach_distance_m: 3.0 * NM_TO_METERS,
            vertical_grid_m: 0.5 * NM_TO_METERS,
            horizontal_grid_m: 100.0 * FT_TO_METERS,
        }
    }
}

impl GlideSlopeConfig {
    /// Total distance covered by the view.
    pub fn view_distance_m(&self) -> f64 {
        self.runway_distance_m + self.approach_distance_m
    }
}

/// Linear rescale of `v` from `[v0_min, v0_max]` to `[v1_min, v1_max]`.
///
/// A collapsed source range maps everything to `v1_max`.
fn scale(v: f32, v0_min: f32, v0_max: f32, v1_min: f32, v1_max: f32) -> f32 {
    if v0_max == v0_min {
        return v1_max;
    }
    v1_min + ((v - v0_min) * (v1_max - v1_min)) / (v0_max - v0_min)
}

/// Nominal glide slope height at `distance` meters out.
pub fn distance_to_height(distance: f32) -> f32 {
    distance * TAN_3_DEG
}

/// Outline of the glide slope wedges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeWedges {
    /// Wide wedge spanning the full slope height.
    pub outer: [Point; 3],
    /// Narrow wedge spanning a third of the slope height.
    pub inner: [Point; 3],
    /// Nominal 3° line.
    pub center: Line,
}

/// Glide slope overlay laid out in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideSlope {
    /// Caller's rectangle.
    frame: Rect,
    /// Frame sans view margins.
    view: Rect,
    /// Bottom left at the landing point, top right at the slope center on
    /// the right edge.
    slope: Rect,
    /// Slope wedge height on the right edge (window units).
    slope_height: f32,
    /// Slope center on the right edge in world coordinates.
    slope_right: Point,
    config: GlideSlopeConfig,
}

impl GlideSlope {
    /// Lay out the overlay in `frame`.
    pub fn new(frame: Rect, config: &GlideSlopeConfig) -> Self {
        let view = frame.deflate(frame.width() * VIEW_MARGIN, frame.height() * VIEW_MARGIN);
        let slope_height = view.height() * SLOPE_HEIGHT_RATIO;

        let runway = config.runway_distance_m as f32;
        let approach = config.approach_distance_m as f32;
        let runway_share = if runway + approach > 0.0 {
            runway / (runway + approach)
        } else {
            0.0
        };

        let slope = Rect {
            left: view.left + runway_share * view.width(),
            top: view.top - view.height() * SLOPE_TOP_OFFSET - slope_height / 2.0,
            right: view.right,
            bottom: view.bottom,
        };

        Self {
            frame,
            view,
            slope,
            slope_height,
            slope_right: Point::new(approach, distance_to_height(approach)),
            config: *config,
        }
    }

    /// Whole overlay frame.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Frame minus the view margin.
    pub fn view(&self) -> Rect {
        self.view
    }

    /// Slope rectangle; its bottom left is the touchdown point.
    pub fn slope(&self) -> Rect {
        self.slope
    }

    /// Height of the outer wedge at the right edge.
    pub fn slope_height(&self) -> f32 {
        self.slope_height
    }

    /// Reference distances the layout was built from.
    pub fn config(&self) -> &GlideSlopeConfig {
        &self.config
    }

    /// World distance (meters) to window x.
    pub fn world_to_window_x(&self, x: f32) -> f32 {
        scale(x, 0.0, self.slope_right.x, self.slope.left, self.slope.right)
    }

    /// World height (meters) to window y.
    pub fn world_to_window_y(&self, y: f32) -> f32 {
        scale(y, 0.0, self.slope_right.y, self.slope.bottom, self.slope.top)
    }

    /// Project a sample `distance` meters from the landing point at `agl`.
    pub fn world_to_window(&self, distance: f64, agl: f32) -> Point {
        Point::new(
            self.world_to_window_x(distance as f32),
            self.world_to_window_y(agl),
        )
    }

    /// Outer and inner tolerance wedges plus the 3° center line.
    pub fn slope_wedges(&self) -> SlopeWedges {
        let origin = self.slope.bottom_left();
        let wedge = |half_height: f32| {
            [
                origin,
                Point::new(self.slope.right, self.slope.top + half_height),
                Point::new(self.slope.right, self.slope.top - half_height),
            ]
        };

        SlopeWedges {
            outer: wedge(self.slope_height / 2.0),
            inner: wedge(self.slope_height / 6.0),
            center: Line::new(origin, self.slope.top_right()),
        }
    }

    /// Grid lines across the view.
    ///
    /// Vertical lines run both ways from the landing point; horizontal
    /// lines run up from the ground.
    pub fn grid_lines(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        let view = self.view;

        let v_grid = self.world_to_window_x(self.config.vertical_grid_m as f32)
            - self.world_to_window_x(0.0);
        if v_grid >= MIN_GRID_SPACING {
            let vertical = |x: f32| Line::new(Point::new(x, view.bottom), Point::new(x, view.top));

            let mut x = self.slope.left;
            while x <= view.right {
                lines.push(vertical(x));
                x += v_grid;
            }
            let mut x = self.slope.left - v_grid;
            while x >= view.left {
                lines.push(vertical(x));
                x -= v_grid;
            }
        }

        let h_grid = self.world_to_window_y(self.config.horizontal_grid_m as f32)
            - self.world_to_window_y(0.0);
        if h_grid >= MIN_GRID_SPACING {
            let mut y = self.slope.bottom;
            while y <= view.top {
                lines.push(Line::new(Point::new(view.left, y), Point::new(view.right, y)));
                y += h_grid;
            }
        }

        lines
    }

    /// Readout text for the latest sample.
    pub fn info_lines(&self, sample: &TelemetrySample) -> [String; 4] {
        [
            format!("Vg: {} kts", round_off(ms_to_knots(sample.ground_speed))),
            format!("Vy: {} fpm", round_off(ms_to_fpm(sample.vertical_speed))),
            format!("AGL: {} ft", round_off(meters_to_feet(sample.agl))),
            format!("MSL: {} ft", round_off(sample.msl)),
        ]
    }
}

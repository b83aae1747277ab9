//! Plane geometry used to place glyphs and rope lines.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

pub const BASE_GLYPH_SIZE: f64 = 0.25;
pub const MIN_GLYPH_SIZE: f64 = 0.15;
pub const MAX_GLYPH_SIZE: f64 = 0.50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

/// Which side of a sloped surface counts as "above".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalSide {
    /// Surface rising from left to right.
    LeftUp,
    /// Surface falling from left to right.
    RightDown,
}

/// Side of a pulley a rope leaves from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulleySide {
    #[default]
    Left,
    Right,
}

/// Corners of a `width` x `height` rectangle centered on `center` and
/// rotated counter-clockwise by `angle` radians.
///
/// Corners are returned in the order bottom-left, bottom-right, top-right,
/// top-left of the unrotated rectangle.
pub fn rotated_rect(center: Point, width: f64, height: f64, angle: f64) -> [Point; 4] {
    let (hw, hh) = (0.5 * width, 0.5 * height);
    let (sin_a, cos_a) = angle.sin_cos();
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(dx, dy)| {
        Point::new(
            center.x + dx * cos_a - dy * sin_a,
            center.y + dx * sin_a + dy * cos_a,
        )
    })
}

/// Move `p` a distance `h` along the upward normal of a surface inclined at
/// `theta`.
pub fn offset_normal(p: Point, h: f64, theta: f64, side: NormalSide) -> Point {
    let (sin_t, cos_t) = theta.sin_cos();
    let normal = match side {
        NormalSide::LeftUp => Point::new(-sin_t, cos_t),
        NormalSide::RightDown => Point::new(sin_t, cos_t),
    };
    p + normal * h
}

/// Point where a rope parallel to a surface inclined at `theta` leaves a
/// pulley of radius `r` centered on `center`.
pub fn pulley_tangent(center: Point, r: f64, theta: f64, side: PulleySide) -> Point {
    let (sin_t, cos_t) = theta.sin_cos();
    let dx = r * sin_t;
    match side {
        PulleySide::Left => Point::new(center.x - dx, center.y + r * cos_t),
        PulleySide::Right => Point::new(center.x + dx, center.y + r * cos_t),
    }
}

/// Side length of an object's square glyph. Grows with mass but flattened
/// by a 0.3 exponent and clamped to a readable range.
pub fn glyph_size(mass: f64) -> f64 {
    (BASE_GLYPH_SIZE * mass.max(0.0).powf(0.3)).clamp(MIN_GLYPH_SIZE, MAX_GLYPH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
    }

    #[test]
    fn unrotated_rect_is_axis_aligned() {
        let corners = rotated_rect(Point::new(1.0, 2.0), 2.0, 1.0, 0.0);
        assert_eq!(
            corners,
            [
                Point::new(0.0, 1.5),
                Point::new(2.0, 1.5),
                Point::new(2.0, 2.5),
                Point::new(0.0, 2.5),
            ]
        );
    }

    #[test]
    fn quarter_turn_swaps_axes() {
        let corners = rotated_rect(Point::ORIGIN, 2.0, 1.0, FRAC_PI_2);
        // bottom-left (-1, -0.5) rotates to (0.5, -1)
        assert!(close(corners[0], Point::new(0.5, -1.0)));
        assert!(close(corners[2], Point::new(-0.5, 1.0)));
    }

    #[test]
    fn normals_flip_horizontally() {
        let theta = 30f64.to_radians();
        let up = offset_normal(Point::ORIGIN, 2.0, theta, NormalSide::LeftUp);
        let down = offset_normal(Point::ORIGIN, 2.0, theta, NormalSide::RightDown);
        assert!(close(up, Point::new(-1.0, 2.0 * theta.cos())));
        assert!(close(down, Point::new(1.0, 2.0 * theta.cos())));
    }

    #[test]
    fn flat_surface_normal_points_up() {
        let p = offset_normal(Point::new(3.0, 4.0), 0.5, 0.0, NormalSide::RightDown);
        assert_eq!(p, Point::new(3.0, 4.5));
    }

    #[test]
    fn pulley_tangent_sides() {
        let c = Point::new(2.0, 1.0);
        assert!(close(
            pulley_tangent(c, 0.15, 0.0, PulleySide::Left),
            Point::new(2.0, 1.15)
        ));
        let theta = 30f64.to_radians();
        let left = pulley_tangent(c, 0.2, theta, PulleySide::Left);
        let right = pulley_tangent(c, 0.2, theta, PulleySide::Right);
        assert!((left.x - 1.9).abs() < 1e-12);
        assert!((right.x - 2.1).abs() < 1e-12);
        assert_eq!(left.y, right.y);
    }

    #[test]
    fn glyph_size_is_clamped() {
        assert_eq!(glyph_size(1.0), BASE_GLYPH_SIZE);
        assert_eq!(glyph_size(0.0), MIN_GLYPH_SIZE);
        assert_eq!(glyph_size(1000.0), MAX_GLYPH_SIZE);
        assert!(glyph_size(3.0) > glyph_size(2.0));
    }
}

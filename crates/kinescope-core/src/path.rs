//! Mapping from path-distance to plane coordinates.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Shape of the 1D path an object travels along.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathKind {
    /// Straight incline at `angle` radians below the horizontal; positive
    /// distance moves down-slope to the right.
    Slope { angle: f64 },
    /// Horizontal, positive distance moves right.
    Floor,
    /// Vertical drop, positive distance moves down.
    Vertical,
    /// Unsupported path; the object stays where it was placed.
    Free,
}

impl PathKind {
    pub fn slope_degrees(degrees: f64) -> Self {
        PathKind::Slope {
            angle: degrees.to_radians(),
        }
    }

    /// Inclination of the surface under the object, zero for anything that
    /// is not a slope.
    pub fn angle(&self) -> f64 {
        match self {
            PathKind::Slope { angle } => *angle,
            PathKind::Floor | PathKind::Vertical | PathKind::Free => 0.0,
        }
    }

    /// Coordinates after travelling `s` along the path from `origin`.
    pub fn map(&self, origin: Point, s: f64) -> Point {
        match self {
            PathKind::Slope { angle } => {
                let (sin_t, cos_t) = angle.sin_cos();
                Point::new(origin.x + s * cos_t, origin.y - s * sin_t)
            }
            PathKind::Floor => Point::new(origin.x + s, origin.y),
            PathKind::Vertical => Point::new(origin.x, origin.y - s),
            PathKind::Free => origin,
        }
    }
}

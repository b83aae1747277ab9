//! State sampler: evaluates a resolved object at a simulation time and
//! places it on the plane.

use crate::{
    geometry::{NormalSide, Point, glyph_size, offset_normal, rotated_rect},
    resolve::Trajectory,
    scene::PhysicsObject,
};
use serde::Serialize;

/// Where an object is and how fast it moves at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct State<'a> {
    pub position: Point,
    pub distance: f64,
    pub speed: f64,
    pub label: &'a str,
}

/// Square marker drawn for an object, resting on its path surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Glyph {
    pub center: Point,
    pub size: f64,
    pub corners: [Point; 4],
}

impl Glyph {
    pub fn bottom(&self) -> Point {
        self.corners[0].midpoint(self.corners[1])
    }

    pub fn right(&self) -> Point {
        self.corners[1].midpoint(self.corners[2])
    }

    pub fn top(&self) -> Point {
        self.corners[2].midpoint(self.corners[3])
    }

    pub fn left(&self) -> Point {
        self.corners[3].midpoint(self.corners[0])
    }
}

/// Sample `object` following `trajectory` at time `t`.
///
/// An object without segments stays at its initial position with zero
/// speed and an empty label.
pub fn sample_state<'a>(object: &PhysicsObject, trajectory: &'a Trajectory, t: f64) -> State<'a> {
    match trajectory.state_at(t) {
        Some(path_state) => State {
            position: object.path.map(object.initial, path_state.distance),
            distance: path_state.distance,
            speed: path_state.speed,
            label: path_state.label,
        },
        None => State {
            position: object.initial,
            distance: 0.0,
            speed: 0.0,
            label: "",
        },
    }
}

/// Glyph of `object` when its path point is `at`.
pub fn glyph(object: &PhysicsObject, at: Point) -> Glyph {
    let size = glyph_size(object.mass);
    let angle = object.path.angle();
    // paths descend to the right, so the surface normal is the right-down one
    let center = offset_normal(at, 0.5 * size, angle, NormalSide::RightDown);
    Glyph {
        center,
        size,
        // descending surfaces run clockwise from the x axis
        corners: rotated_rect(center, size, size, -angle),
    }
}

//! Scene model: objects, their segments and the purely visual connectors
//! and decorations around them.

use crate::{
    error::{ResolveError, SceneError},
    geometry::{Point, PulleySide, glyph_size},
    path::PathKind,
    resolve::Trajectory,
    sample::{Glyph, State, glyph, sample_state},
    segment::Segment,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DT: f64 = 0.02;
pub const DEFAULT_PULLEY_RADIUS: f64 = 0.15;
pub const DEFAULT_SURFACE_WIDTH: f64 = 6.0;

/// A moving body. Mass only sizes the glyph; it takes no part in the
/// kinematics.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsObject {
    pub name: String,
    pub mass: f64,
    pub color: Option<String>,
    pub initial: Point,
    pub path: PathKind,
    segments: Vec<Segment>,
}

impl PhysicsObject {
    pub fn new(name: impl Into<String>, mass: f64, initial: Point, path: PathKind) -> Self {
        Self {
            name: name.into(),
            mass,
            color: None,
            initial,
            path,
            segments: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn glyph_size(&self) -> f64 {
        glyph_size(self.mass)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    #[default]
    Slope,
    Floor,
}

/// A drawn slope or floor line. Decorative only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub start: Point,
    pub end: Point,
    pub color: Option<String>,
    pub width: f64,
    pub label: Option<String>,
}

impl Surface {
    pub fn slope(start: Point, end: Point) -> Self {
        Self {
            kind: SurfaceKind::Slope,
            start,
            end,
            color: None,
            width: DEFAULT_SURFACE_WIDTH,
            label: None,
        }
    }

    pub fn floor(y: f64, x_min: f64, x_max: f64) -> Self {
        Self {
            kind: SurfaceKind::Floor,
            start: Point::new(x_min, y),
            end: Point::new(x_max, y),
            color: None,
            width: DEFAULT_SURFACE_WIDTH,
            label: None,
        }
    }
}

/// A named point drawn on the diagram.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub name: String,
    pub position: Point,
    /// Label offset in display points.
    pub label_offset: (f64, f64),
    pub show_label: bool,
}

impl Marker {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
            label_offset: (-15.0, -15.0),
            show_label: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Pulley {
    pub center: Point,
    pub radius: f64,
}

/// Point of an object's glyph a rope is tied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attachment {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl Attachment {
    pub fn on(&self, glyph: &Glyph) -> Point {
        match self {
            Attachment::Center => glyph.center,
            Attachment::Top => glyph.top(),
            Attachment::Bottom => glyph.bottom(),
            Attachment::Left => glyph.left(),
            Attachment::Right => glyph.right(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RopeEnd {
    Object {
        name: String,
        attachment: Attachment,
    },
    Pulley {
        index: usize,
        side: PulleySide,
    },
}

impl RopeEnd {
    pub fn object(name: impl Into<String>, attachment: Attachment) -> Self {
        RopeEnd::Object {
            name: name.into(),
            attachment,
        }
    }

    pub fn pulley(index: usize, side: PulleySide) -> Self {
        RopeEnd::Pulley { index, side }
    }
}

/// Visual connector between two endpoints. Ropes never constrain motion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rope {
    pub from: RopeEnd,
    pub to: RopeEnd,
    /// Time at which the rope is cut and stops being drawn.
    pub cut_time: Option<f64>,
}

impl Rope {
    pub fn is_intact(&self, t: f64) -> bool {
        self.cut_time.is_none_or(|cut| t < cut)
    }
}

/// Hold the animation at `time` for `duration` seconds of display time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PauseEvent {
    pub time: f64,
    pub duration: f64,
    pub label: String,
}

/// Owner of everything drawn in one animation.
#[derive(Clone, Debug)]
pub struct Scene {
    pub title: String,
    dt: f64,
    objects: Vec<PhysicsObject>,
    by_name: FxHashMap<String, usize>,
    surfaces: Vec<Surface>,
    markers: Vec<Marker>,
    pulleys: Vec<Pulley>,
    ropes: Vec<Rope>,
    pauses: Vec<PauseEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("")
    }
}

impl Scene {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            dt: DEFAULT_DT,
            objects: Vec::new(),
            by_name: FxHashMap::default(),
            surfaces: Vec::new(),
            markers: Vec::new(),
            pulleys: Vec::new(),
            ropes: Vec::new(),
            pauses: Vec::new(),
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn set_dt(&mut self, dt: f64) -> Result<&mut Self, SceneError> {
        positive("dt", dt)?;
        self.dt = dt;
        Ok(self)
    }

    pub fn add_object(&mut self, object: PhysicsObject) -> Result<&mut Self, SceneError> {
        if self.by_name.contains_key(&object.name) {
            return Err(SceneError::DuplicateObject(object.name));
        }
        self.by_name.insert(object.name.clone(), self.objects.len());
        self.objects.push(object);
        Ok(self)
    }

    pub fn add_segment(&mut self, object: &str, segment: Segment) -> Result<&mut Self, SceneError> {
        let index = self.index_of(object)?;
        self.objects[index].push_segment(segment);
        Ok(self)
    }

    pub fn add_surface(&mut self, surface: Surface) -> &mut Self {
        self.surfaces.push(surface);
        self
    }

    pub fn add_marker(&mut self, marker: Marker) -> &mut Self {
        self.markers.push(marker);
        self
    }

    pub fn add_pulley(&mut self, center: Point, radius: f64) -> Result<&mut Self, SceneError> {
        positive("pulley radius", radius)?;
        self.pulleys.push(Pulley { center, radius });
        Ok(self)
    }

    pub fn add_rope(&mut self, rope: Rope) -> Result<&mut Self, SceneError> {
        if let Some(cut) = rope.cut_time {
            finite("rope cut_time", cut)?;
        }
        self.check_rope_end(&rope.from)?;
        self.check_rope_end(&rope.to)?;
        self.ropes.push(rope);
        Ok(self)
    }

    pub fn add_pause(
        &mut self,
        time: f64,
        duration: f64,
        label: impl Into<String>,
    ) -> Result<&mut Self, SceneError> {
        finite("pause time", time)?;
        positive("pause duration", duration)?;
        self.pauses.push(PauseEvent {
            time,
            duration,
            label: label.into(),
        });
        Ok(self)
    }

    pub fn object(&self, name: &str) -> Option<&PhysicsObject> {
        self.by_name.get(name).map(|&i| &self.objects[i])
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[PhysicsObject] {
        &self.objects
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn pulleys(&self) -> &[Pulley] {
        &self.pulleys
    }

    pub fn ropes(&self) -> &[Rope] {
        &self.ropes
    }

    pub fn pauses(&self) -> &[PauseEvent] {
        &self.pauses
    }

    /// Resolve every object's segments.
    pub fn resolve(&self) -> Result<ResolvedScene<'_>, ResolveError> {
        let trajectories = self
            .objects
            .iter()
            .map(|o| Trajectory::resolve(&o.name, o.segments()))
            .collect::<Result<Vec<_>, _>>()?;
        let duration = trajectories
            .iter()
            .map(Trajectory::duration)
            .fold(0.0, f64::max);
        tracing::debug!(
            objects = self.objects.len(),
            duration,
            "resolved scene kinematics"
        );
        Ok(ResolvedScene {
            scene: self,
            trajectories,
            duration,
        })
    }

    fn index_of(&self, name: &str) -> Result<usize, SceneError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownObject(name.to_string()))
    }

    fn check_rope_end(&self, end: &RopeEnd) -> Result<(), SceneError> {
        match end {
            RopeEnd::Object { name, .. } => self.index_of(name).map(|_| ()),
            RopeEnd::Pulley { index, .. } if *index < self.pulleys.len() => Ok(()),
            RopeEnd::Pulley { index, .. } => Err(SceneError::UnknownPulley {
                index: *index,
                count: self.pulleys.len(),
            }),
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), SceneError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::NotPositive { field, value })
    }
}

/// A scene whose segments have been resolved. Borrowing the scene keeps it
/// frozen while the trajectories are in use.
#[derive(Debug)]
pub struct ResolvedScene<'s> {
    scene: &'s Scene,
    trajectories: Vec<Trajectory>,
    duration: f64,
}

/// An object paired with its resolved trajectory.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedObject<'a> {
    pub object: &'a PhysicsObject,
    pub trajectory: &'a Trajectory,
}

impl<'a> ResolvedObject<'a> {
    pub fn sample(&self, t: f64) -> State<'a> {
        sample_state(self.object, self.trajectory, t)
    }

    pub fn glyph_at(&self, state: &State<'_>) -> Glyph {
        glyph(self.object, state.position)
    }
}

impl<'s> ResolvedScene<'s> {
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    /// Latest end time over all objects.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn objects(&self) -> impl Iterator<Item = ResolvedObject<'_>> + '_ {
        self.scene
            .objects
            .iter()
            .zip(&self.trajectories)
            .map(|(object, trajectory)| ResolvedObject { object, trajectory })
    }

    pub fn object(&self, name: &str) -> Option<ResolvedObject<'_>> {
        let index = *self.scene.by_name.get(name)?;
        Some(ResolvedObject {
            object: &self.scene.objects[index],
            trajectory: &self.trajectories[index],
        })
    }

    /// Sample the object called `name` at time `t`.
    pub fn sample(&self, name: &str, t: f64) -> Option<State<'_>> {
        self.object(name).map(|o| o.sample(t))
    }
}

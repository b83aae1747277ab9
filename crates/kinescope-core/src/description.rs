//! Serializable scene description.
//!
//! This is the on-disk form of a [`Scene`]: flat, optional-field records
//! that map one-to-one onto the scene-building calls. [`SceneDescription::build`]
//! runs those calls in order, so every construction error surfaces there.

use crate::{
    error::SceneError,
    geometry::{Point, PulleySide},
    path::PathKind,
    scene::{
        Attachment, DEFAULT_DT, DEFAULT_PULLEY_RADIUS, DEFAULT_SURFACE_WIDTH, Marker,
        PhysicsObject, Rope, RopeEnd, Scene, Surface, SurfaceKind,
    },
    segment::{MotionKind, Segment, Termination},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub title: String,

    /// Simulation time between frames, in seconds
    #[serde(default = "default_dt")]
    pub dt: f64,

    #[serde(default)]
    pub surfaces: Vec<SurfaceDef>,

    #[serde(default)]
    pub points: Vec<PointDef>,

    #[serde(default)]
    pub objects: Vec<ObjectDef>,

    #[serde(default)]
    pub segments: Vec<SegmentDef>,

    #[serde(default)]
    pub pulleys: Vec<PulleyDef>,

    #[serde(default)]
    pub ropes: Vec<RopeDef>,

    #[serde(default)]
    pub pauses: Vec<PauseDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceDef {
    #[serde(default)]
    pub kind: SurfaceKind,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub color: Option<String>,
    #[serde(default = "default_surface_width")]
    pub width: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointDef {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_label_offset")]
    pub label_offset: (f64, f64),
    #[serde(default = "default_true")]
    pub show_label: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathDef {
    Slope,
    Floor,
    Vertical,
    Free,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDef {
    pub name: String,
    pub mass: f64,
    pub color: Option<String>,
    #[serde(default)]
    pub initial: (f64, f64),
    pub path: PathDef,
    /// Slope inclination in degrees; only read for slopes
    #[serde(default)]
    pub angle_deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentDef {
    pub object: String,
    pub kind: MotionKind,
    pub a: Option<f64>,
    pub v0: Option<f64>,
    pub v_end: Option<f64>,
    pub length: Option<f64>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub until_stopped: bool,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PulleyDef {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_pulley_radius")]
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RopeEndDef {
    Object {
        object: String,
        #[serde(default)]
        attachment: Attachment,
    },
    Pulley {
        pulley: usize,
        #[serde(default)]
        side: PulleySide,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RopeDef {
    pub from: RopeEndDef,
    pub to: RopeEndDef,
    pub cut_time: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PauseDef {
    pub time: f64,
    #[serde(default = "default_pause")]
    pub duration: f64,
    #[serde(default)]
    pub label: String,
}

fn default_dt() -> f64 {
    DEFAULT_DT
}

fn default_surface_width() -> f64 {
    DEFAULT_SURFACE_WIDTH
}

fn default_label_offset() -> (f64, f64) {
    (-15.0, -15.0)
}

fn default_true() -> bool {
    true
}

fn default_pulley_radius() -> f64 {
    DEFAULT_PULLEY_RADIUS
}

fn default_pause() -> f64 {
    0.5
}

impl SegmentDef {
    pub fn to_segment(&self) -> Result<Segment, crate::error::SegmentError> {
        let end =
            Termination::from_parts(self.v_end, self.length, self.duration, self.until_stopped)?;
        let segment = Segment::new(self.kind, self.a, end)?.with_label(self.label.clone());
        match self.v0 {
            Some(v0) => segment.with_v0(v0),
            None => Ok(segment),
        }
    }
}

impl ObjectDef {
    pub fn to_object(&self) -> PhysicsObject {
        let path = match self.path {
            PathDef::Slope => PathKind::slope_degrees(self.angle_deg),
            PathDef::Floor => PathKind::Floor,
            PathDef::Vertical => PathKind::Vertical,
            PathDef::Free => PathKind::Free,
        };
        let mut object = PhysicsObject::new(&self.name, self.mass, self.initial.into(), path);
        object.color = self.color.clone();
        object
    }
}

impl From<&RopeEndDef> for RopeEnd {
    fn from(def: &RopeEndDef) -> Self {
        match def {
            RopeEndDef::Object { object, attachment } => RopeEnd::object(object, *attachment),
            RopeEndDef::Pulley { pulley, side } => RopeEnd::pulley(*pulley, *side),
        }
    }
}

impl SceneDescription {
    /// Build and validate the scene. Objects, pulleys and decorations are
    /// added before the segments and ropes that refer to them.
    pub fn build(&self) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(&self.title);
        scene.set_dt(self.dt)?;

        for def in &self.surfaces {
            scene.add_surface(Surface {
                kind: def.kind,
                start: def.start.into(),
                end: def.end.into(),
                color: def.color.clone(),
                width: def.width,
                label: def.label.clone(),
            });
        }

        for def in &self.points {
            let mut marker = Marker::new(&def.name, Point::new(def.x, def.y));
            marker.label_offset = def.label_offset;
            marker.show_label = def.show_label;
            scene.add_marker(marker);
        }

        for def in &self.objects {
            scene.add_object(def.to_object())?;
        }

        for def in &self.pulleys {
            scene.add_pulley(Point::new(def.x, def.y), def.radius)?;
        }

        for (index, def) in self.segments.iter().enumerate() {
            if scene.object(&def.object).is_none() {
                return Err(SceneError::UnknownObject(def.object.clone()));
            }
            let segment = def
                .to_segment()
                .map_err(|source| SceneError::InvalidSegment {
                    object: def.object.clone(),
                    index,
                    source,
                })?;
            scene.add_segment(&def.object, segment)?;
        }

        for def in &self.ropes {
            scene.add_rope(Rope {
                from: (&def.from).into(),
                to: (&def.to).into(),
                cut_time: def.cut_time,
            })?;
        }

        for def in &self.pauses {
            scene.add_pause(def.time, def.duration, def.label.clone())?;
        }

        tracing::debug!(
            title = %self.title,
            objects = self.objects.len(),
            segments = self.segments.len(),
            "built scene from description"
        );

        Ok(scene)
    }
}

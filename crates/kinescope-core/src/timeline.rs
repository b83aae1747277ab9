//! Frame timeline over a resolved scene.
//!
//! Frames are sampled at `t = index * dt` up to and including the scene
//! duration. Each frame is a plain value: the renderer owns any history it
//! accumulates while drawing them.

use crate::{
    error::SceneError,
    geometry::{Point, pulley_tangent},
    sample::{Glyph, State},
    scene::{ResolvedScene, RopeEnd},
};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Slack used when deciding whether the duration is an exact multiple of
/// `dt`, so rounding does not add a duplicate final frame.
const STEP_EPSILON: f64 = 1e-9;

/// Upper bound on the number of frames a timeline will produce.
pub const MAX_FRAMES: usize = 1 << 24;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectFrame<'a> {
    pub name: &'a str,
    pub state: State<'a>,
    pub glyph: Glyph,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RopeLine {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame<'a> {
    pub index: usize,
    pub t: f64,
    /// Extra display repetitions of this frame requested by pauses.
    pub hold: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pauses: Vec<&'a str>,
    pub objects: Vec<ObjectFrame<'a>>,
    pub ropes: Vec<RopeLine>,
}

pub struct Timeline<'a> {
    resolved: &'a ResolvedScene<'a>,
    dt: f64,
    steps: usize,
}

impl<'a> Timeline<'a> {
    /// Timeline using the scene's own time step.
    pub fn new(resolved: &'a ResolvedScene<'a>) -> Result<Self, SceneError> {
        // Scene::set_dt already rejected non-positive steps
        Self::build(resolved, resolved.scene().dt())
    }

    /// Timeline with an explicit time step.
    pub fn with_dt(resolved: &'a ResolvedScene<'a>, dt: f64) -> Result<Self, SceneError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SceneError::NotPositive { field: "dt", value: dt });
        }
        Self::build(resolved, dt)
    }

    fn build(resolved: &'a ResolvedScene<'a>, dt: f64) -> Result<Self, SceneError> {
        let duration = resolved.duration();
        let steps = (duration / dt - STEP_EPSILON).ceil().max(0.0);
        if !steps.is_finite() || steps >= MAX_FRAMES as f64 {
            return Err(SceneError::TooManyFrames {
                duration,
                dt,
                limit: MAX_FRAMES,
            });
        }
        let steps = steps as usize;
        for pause in resolved.scene().pauses() {
            if pause.time > duration {
                tracing::warn!(
                    time = pause.time,
                    duration,
                    label = %pause.label,
                    "pause after the end of the scene is ignored"
                );
            }
        }
        tracing::debug!(dt, frames = steps + 1, "built timeline");
        Ok(Self {
            resolved,
            dt,
            steps,
        })
    }

    pub fn resolved(&self) -> &'a ResolvedScene<'a> {
        self.resolved
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn duration(&self) -> f64 {
        self.resolved.duration()
    }

    pub fn frame_count(&self) -> usize {
        self.steps + 1
    }

    /// Simulation time of frame `index`, clamped to the scene duration.
    pub fn time_at(&self, index: usize) -> f64 {
        (index as f64 * self.dt).min(self.resolved.duration())
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame<'a>> + '_ {
        (0..self.frame_count()).map(move |index| self.frame(index))
    }

    pub fn frame(&self, index: usize) -> Frame<'a> {
        let resolved: &'a ResolvedScene<'a> = self.resolved;
        let scene = resolved.scene();
        let t = self.time_at(index);
        let prev = if index == 0 {
            f64::NEG_INFINITY
        } else {
            self.time_at(index - 1)
        };

        let mut hold = 0;
        let mut pauses = Vec::new();
        for pause in scene.pauses() {
            if prev < pause.time && pause.time <= t {
                hold += (pause.duration / self.dt).round() as usize;
                pauses.push(pause.label.as_str());
            }
        }

        let objects: Vec<ObjectFrame<'a>> = resolved
            .objects()
            .map(|o| {
                let state = o.sample(t);
                ObjectFrame {
                    name: o.object.name.as_str(),
                    glyph: o.glyph_at(&state),
                    state,
                }
            })
            .collect();

        let placed: FxHashMap<&str, (&Glyph, f64)> = resolved
            .objects()
            .zip(&objects)
            .map(|(o, f)| (o.object.name.as_str(), (&f.glyph, o.object.path.angle())))
            .collect();

        let ropes = scene
            .ropes()
            .iter()
            .filter(|rope| rope.is_intact(t))
            .filter_map(|rope| {
                Some(RopeLine {
                    from: self.rope_end(&rope.from, &rope.to, &placed)?,
                    to: self.rope_end(&rope.to, &rope.from, &placed)?,
                })
            })
            .collect();

        Frame {
            index,
            t,
            hold,
            pauses,
            objects,
            ropes,
        }
    }

    fn rope_end(
        &self,
        end: &RopeEnd,
        other: &RopeEnd,
        placed: &FxHashMap<&str, (&Glyph, f64)>,
    ) -> Option<Point> {
        match end {
            RopeEnd::Object { name, attachment } => {
                let (glyph, _) = placed.get(name.as_str())?;
                Some(attachment.on(glyph))
            }
            RopeEnd::Pulley { index, side } => {
                let pulley = self.resolved.scene().pulleys().get(*index)?;
                let theta = match other {
                    RopeEnd::Object { name, .. } => placed.get(name.as_str())?.1,
                    RopeEnd::Pulley { .. } => 0.0,
                };
                Some(pulley_tangent(pulley.center, pulley.radius, theta, *side))
            }
        }
    }

    /// Speed of every object at every frame time: the data behind the
    /// speed-time graph.
    pub fn speed_table(&self) -> SpeedTable {
        let times: Vec<f64> = (0..self.frame_count()).map(|i| self.time_at(i)).collect();
        let series = self
            .resolved
            .objects()
            .map(|o| SpeedSeries {
                name: o.object.name.clone(),
                speeds: times.iter().map(|&t| o.sample(t).speed).collect(),
            })
            .collect();
        SpeedTable { times, series }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeedSeries {
    pub name: String,
    pub speeds: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeedTable {
    pub times: Vec<f64>,
    pub series: Vec<SpeedSeries>,
}

impl SpeedTable {
    pub fn max_speed(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.speeds.iter().copied())
            .fold(0.0, f64::max)
    }

    /// One row per sample time, one column per object.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("t");
        for s in &self.series {
            out.push(',');
            out.push_str(&csv_field(&s.name));
        }
        out.push('\n');
        for (row, t) in self.times.iter().enumerate() {
            out.push_str(&t.to_string());
            for s in &self.series {
                out.push(',');
                out.push_str(&s.speeds[row].to_string());
            }
            out.push('\n');
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::PulleySide,
        path::PathKind,
        scene::{Attachment, PhysicsObject, Rope, Scene},
        segment::{Segment, Termination},
    };

    fn floor_scene() -> Scene {
        let mut scene = Scene::new("floor");
        scene.set_dt(0.25).unwrap();
        scene
            .add_object(PhysicsObject::new("M", 1.0, Point::ORIGIN, PathKind::Floor))
            .unwrap()
            .add_object(PhysicsObject::new(
                "N",
                1.0,
                Point::new(0.0, 1.0),
                PathKind::Floor,
            ))
            .unwrap()
            .add_segment(
                "M",
                Segment::accelerate(2.0, Termination::Length(1.0)).unwrap(),
            )
            .unwrap()
            .add_segment(
                "N",
                Segment::constant_velocity(Termination::Duration(0.5))
                    .unwrap()
                    .with_v0(1.0)
                    .unwrap(),
            )
            .unwrap();
        scene
    }

    #[test]
    fn frames_cover_duration_once() {
        let scene = floor_scene();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();
        assert_eq!(timeline.frame_count(), 5);
        let times: Vec<f64> = timeline.frames().map(|f| f.t).collect();
        assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn last_frame_is_clamped_to_duration() {
        let scene = floor_scene();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::with_dt(&resolved, 0.3).unwrap();
        assert_eq!(timeline.frame_count(), 5);
        assert_eq!(timeline.time_at(4), 1.0);
        assert_eq!(timeline.time_at(99), 1.0);
    }

    #[test]
    fn empty_scene_has_single_frame() {
        let scene = Scene::new("empty");
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();
        assert_eq!(timeline.frame_count(), 1);
        assert!(timeline.frame(0).objects.is_empty());
    }

    #[test]
    fn invalid_dt() {
        let scene = floor_scene();
        let resolved = scene.resolve().unwrap();
        assert!(Timeline::with_dt(&resolved, 0.0).is_err());
        assert!(Timeline::with_dt(&resolved, -0.1).is_err());
    }

    #[test]
    fn overlong_scene_is_rejected() {
        let mut scene = Scene::new("long");
        scene
            .add_object(PhysicsObject::new("M", 1.0, Point::ORIGIN, PathKind::Floor))
            .unwrap()
            .add_segment(
                "M",
                Segment::constant_velocity(Termination::Duration(1e300))
                    .unwrap()
                    .with_v0(1.0)
                    .unwrap(),
            )
            .unwrap();
        let resolved = scene.resolve().unwrap();
        assert!(matches!(
            Timeline::new(&resolved),
            Err(SceneError::TooManyFrames { limit: MAX_FRAMES, .. })
        ));

        let mut scene = Scene::new("endless");
        scene
            .add_object(PhysicsObject::new("M", 1.0, Point::ORIGIN, PathKind::Floor))
            .unwrap()
            .add_segment(
                "M",
                Segment::constant_velocity(Termination::Duration(f64::MAX))
                    .unwrap()
                    .with_v0(1.0)
                    .unwrap(),
            )
            .unwrap()
            .add_segment(
                "M",
                Segment::constant_velocity(Termination::Duration(f64::MAX)).unwrap(),
            )
            .unwrap();
        let resolved = scene.resolve().unwrap();
        assert_eq!(resolved.duration(), f64::INFINITY);
        assert!(Timeline::with_dt(&resolved, 0.5).is_err());
    }

    #[test]
    fn pauses_hold_first_frame_at_or_after_time() {
        let mut scene = floor_scene();
        scene.add_pause(0.3, 0.5, "look").unwrap();
        scene.add_pause(0.0, 0.25, "start").unwrap();
        scene.add_pause(9.0, 1.0, "never").unwrap();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();
        let frames: Vec<Frame> = timeline.frames().collect();
        assert_eq!(frames[0].hold, 1);
        assert_eq!(frames[0].pauses, vec!["start"]);
        assert_eq!(frames[1].hold, 0);
        assert_eq!(frames[2].hold, 2);
        assert_eq!(frames[2].pauses, vec!["look"]);
        assert_eq!(frames.iter().map(|f| f.hold).sum::<usize>(), 3);
    }

    #[test]
    fn cut_rope_disappears() {
        let mut scene = floor_scene();
        scene
            .add_pulley(Point::new(3.0, 0.5), 0.15)
            .unwrap()
            .add_rope(Rope {
                from: RopeEnd::object("M", Attachment::Center),
                to: RopeEnd::pulley(0, PulleySide::Left),
                cut_time: Some(0.5),
            })
            .unwrap();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();

        let first = timeline.frame(0);
        assert_eq!(first.ropes.len(), 1);
        assert_eq!(first.ropes[0].from, first.objects[0].glyph.center);
        assert_eq!(first.ropes[0].to, Point::new(3.0, 0.65));

        assert_eq!(timeline.frame(2).ropes.len(), 0);
    }

    #[test]
    fn frame_positions_follow_sampler() {
        let scene = floor_scene();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();
        let frame = timeline.frame(2);
        let m = &frame.objects[0];
        assert_eq!(m.name, "M");
        assert_eq!(m.state, resolved.sample("M", 0.5).unwrap());
        assert_eq!(m.state.position, Point::new(0.25, 0.0));
    }

    #[test]
    fn speed_table_csv() {
        let scene = floor_scene();
        let resolved = scene.resolve().unwrap();
        let table = Timeline::new(&resolved).unwrap().speed_table();
        assert_eq!(table.max_speed(), 2.0);
        let csv = table.to_csv();
        insta::with_settings!({prepend_module_to_snapshot => false}, {
            insta::assert_snapshot!("floor_speed_table", csv.trim_end());
        });
    }

    #[test]
    fn csv_quotes_awkward_names() {
        assert_eq!(csv_field("A"), "A");
        assert_eq!(csv_field("m,2"), "\"m,2\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

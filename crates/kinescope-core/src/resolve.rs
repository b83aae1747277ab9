//! Segment kinematics resolver.
//!
//! Walks an object's declared segments once, in order, propagating time,
//! distance and speed from each segment into the next. The result is a
//! [`Trajectory`] of contiguous [`ResolvedSegment`]s that the sampler can
//! evaluate in closed form.

use crate::{
    error::ResolveError,
    segment::{MotionKind, Segment, Termination},
};
use serde::Serialize;

/// Fallback applied to a segment whose inputs do not determine a proper
/// motion. The segment still resolves, but the input is suspicious.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// Length target reached without any change of speed; no time elapses.
    NoSpeedChange,
    /// Constant-velocity length target at zero speed; no time elapses.
    StationaryCruise,
    /// The object stops before covering the requested length.
    StoppedShort,
    /// Speed target equal to the entry speed with no acceleration.
    ZeroAcceleration,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedSegment {
    pub kind: MotionKind,
    pub accel: f64,
    pub v0: f64,
    pub v_end: f64,
    pub t_start: f64,
    pub t_end: f64,
    pub s_start: f64,
    pub s_end: f64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degeneracy: Option<Degeneracy>,
}

impl ResolvedSegment {
    pub fn duration(&self) -> f64 {
        self.t_end - self.t_start
    }

    pub fn contains(&self, t: f64) -> bool {
        self.t_start <= t && t <= self.t_end
    }

    /// Distance covered `dt` seconds into the segment.
    pub fn distance_at(&self, dt: f64) -> f64 {
        (self.v0 + 0.5 * self.accel * dt) * dt
    }

    /// Signed velocity `dt` seconds into the segment.
    pub fn velocity_at(&self, dt: f64) -> f64 {
        self.v0 + self.accel * dt
    }
}

/// Immutable, resolved motion of one object.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Trajectory {
    segments: Vec<ResolvedSegment>,
}

/// One-dimensional state of a trajectory at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathState<'a> {
    pub distance: f64,
    pub speed: f64,
    pub label: &'a str,
}

impl Trajectory {
    /// Resolve `segments` for the object called `object`.
    pub fn resolve(object: &str, segments: &[Segment]) -> Result<Self, ResolveError> {
        let mut resolved: Vec<ResolvedSegment> = Vec::with_capacity(segments.len());

        for (index, seg) in segments.iter().enumerate() {
            let (t_start, s_start, inherited_v) = match resolved.last() {
                Some(prev) => (prev.t_end, prev.s_end, prev.v_end),
                None => (0.0, 0.0, 0.0),
            };
            let v0 = seg.v0().unwrap_or(inherited_v);
            let a = seg.accel();

            let mut out = ResolvedSegment {
                kind: seg.kind(),
                accel: a,
                v0,
                v_end: v0,
                t_start,
                t_end: t_start,
                s_start,
                s_end: s_start,
                label: seg.label().to_string(),
                degeneracy: None,
            };

            match seg.termination() {
                Termination::Length(length) if seg.kind() == MotionKind::ConstantVelocity => {
                    out.s_end = s_start + length;
                    if v0 != 0.0 {
                        out.t_end = t_start + length / v0;
                    } else {
                        out.degeneracy = Some(Degeneracy::StationaryCruise);
                    }
                }
                Termination::Length(length) => {
                    let v_sq = v0 * v0 + 2.0 * a * length;
                    out.v_end = v_sq.max(0.0).sqrt();
                    out.s_end = s_start + length;
                    if v_sq < 0.0 {
                        out.s_end = s_start + v0 * v0 / (2.0 * a.abs());
                        out.degeneracy = Some(Degeneracy::StoppedShort);
                    }
                    if out.v_end != v0 {
                        out.t_end = t_start + (out.v_end - v0) / a;
                    } else {
                        out.degeneracy = Some(Degeneracy::NoSpeedChange);
                    }
                }
                Termination::EndSpeed(v_end) => {
                    out.v_end = v_end;
                    if a != 0.0 {
                        let dt = (v_end - v0) / a;
                        out.t_end = t_start + dt;
                        out.s_end = s_start + out.distance_at(dt);
                    } else if v_end == v0 {
                        out.degeneracy = Some(Degeneracy::ZeroAcceleration);
                    } else {
                        return Err(ResolveError::ZeroAcceleration {
                            object: object.to_string(),
                            index,
                            v0,
                            v_end,
                        });
                    }
                }
                Termination::Duration(duration) => {
                    out.t_end = t_start + duration;
                    out.v_end = out.velocity_at(duration);
                    out.s_end = s_start + out.distance_at(duration);
                }
                Termination::UntilStopped => {
                    out.v_end = 0.0;
                    if a != 0.0 {
                        out.t_end = t_start + v0 / a.abs();
                        out.s_end = s_start + v0 * v0 / (2.0 * a.abs());
                    } else if v0 != 0.0 {
                        return Err(ResolveError::NeverStops {
                            object: object.to_string(),
                            index,
                            v0,
                        });
                    }
                }
            }

            if out.t_end < out.t_start {
                return Err(ResolveError::NegativeDuration {
                    object: object.to_string(),
                    index,
                    t_start: out.t_start,
                    t_end: out.t_end,
                });
            }

            if let Some(degeneracy) = out.degeneracy {
                tracing::warn!(
                    object,
                    index,
                    ?degeneracy,
                    "segment resolved with a degenerate fallback"
                );
            }
            tracing::debug!(
                object,
                index,
                t_start = out.t_start,
                t_end = out.t_end,
                s_end = out.s_end,
                v_end = out.v_end,
                "resolved segment"
            );

            resolved.push(out);
        }

        Ok(Self { segments: resolved })
    }

    pub fn segments(&self) -> &[ResolvedSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End time of the last segment, zero when there are none.
    pub fn duration(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.t_end)
    }

    /// Segment governing time `t`, or `None` once `t` reaches the end.
    ///
    /// Earlier segments win at shared boundaries; times before zero clamp
    /// to zero.
    pub fn active_segment(&self, t: f64) -> Option<&ResolvedSegment> {
        let last = self.segments.last()?;
        let t = t.max(0.0);
        if t >= last.t_end {
            return None;
        }
        self.segments.iter().find(|s| s.contains(t))
    }

    /// Path-distance, speed and label at time `t`, or `None` for an empty
    /// trajectory.
    ///
    /// From the end of the last segment on, the state is the resolved
    /// terminal one: its `s_end`, `|v_end|` and label. Trailing segments
    /// that take no time still set the final distance and speed.
    pub fn state_at(&self, t: f64) -> Option<PathState<'_>> {
        let last = self.segments.last()?;
        let Some(seg) = self.active_segment(t) else {
            return Some(PathState {
                distance: last.s_end,
                speed: last.v_end.abs(),
                label: &last.label,
            });
        };
        let dt = t.max(0.0) - seg.t_start;
        Some(PathState {
            distance: seg.s_start + seg.distance_at(dt),
            speed: seg.velocity_at(dt).abs(),
            label: &seg.label,
        })
    }
}

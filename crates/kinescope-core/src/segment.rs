//! Declarative motion segments.
//!
//! A [`Segment`] is one phase of an object's motion: a kinematic law
//! (constant acceleration or constant velocity) plus exactly one
//! [`Termination`]. Segments only describe intent; the times and distances
//! they cover are filled in by [`crate::resolve`].

use crate::error::SegmentError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    #[serde(alias = "acc")]
    Accelerate,
    #[serde(alias = "dec")]
    Decelerate,
    #[serde(alias = "const_v")]
    ConstantVelocity,
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MotionKind::Accelerate => "accelerate",
            MotionKind::Decelerate => "decelerate",
            MotionKind::ConstantVelocity => "constant-velocity",
        };
        f.write_str(name)
    }
}

/// How a segment ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Termination {
    /// Run until the speed reaches the given value.
    EndSpeed(f64),
    /// Run until the given path-length has been covered.
    Length(f64),
    /// Run for the given number of seconds.
    Duration(f64),
    /// Run until the object comes to rest.
    UntilStopped,
}

impl Termination {
    /// Build a termination from the flat optional-field form used by scene
    /// files. Exactly one of the inputs must be set.
    pub fn from_parts(
        v_end: Option<f64>,
        length: Option<f64>,
        duration: Option<f64>,
        until_stopped: bool,
    ) -> Result<Self, SegmentError> {
        let mut found = Vec::with_capacity(1);
        if let Some(v) = v_end {
            found.push(Termination::EndSpeed(v));
        }
        if let Some(l) = length {
            found.push(Termination::Length(l));
        }
        if let Some(d) = duration {
            found.push(Termination::Duration(d));
        }
        if until_stopped {
            found.push(Termination::UntilStopped);
        }

        match found.as_slice() {
            [] => Err(SegmentError::MissingTermination),
            [only] => Ok(*only),
            many => Err(SegmentError::ConflictingTermination { count: many.len() }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Termination::EndSpeed(_) => "v_end",
            Termination::Length(_) => "length",
            Termination::Duration(_) => "duration",
            Termination::UntilStopped => "until_stopped",
        }
    }

    fn validate(&self) -> Result<(), SegmentError> {
        match *self {
            Termination::EndSpeed(v) => finite("v_end", v),
            Termination::Length(l) => non_negative("length", l),
            Termination::Duration(d) => non_negative("duration", d),
            Termination::UntilStopped => Ok(()),
        }
    }
}

/// One declared phase of an object's motion.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    kind: MotionKind,
    accel: f64,
    v0: Option<f64>,
    end: Termination,
    label: String,
}

impl Segment {
    /// Speed up at `|a|` until `end`.
    pub fn accelerate(a: f64, end: Termination) -> Result<Self, SegmentError> {
        Self::new(MotionKind::Accelerate, Some(a), end)
    }

    /// Slow down at `|a|` until `end`.
    pub fn decelerate(a: f64, end: Termination) -> Result<Self, SegmentError> {
        Self::new(MotionKind::Decelerate, Some(a), end)
    }

    /// Hold the entry speed until `end`.
    pub fn constant_velocity(end: Termination) -> Result<Self, SegmentError> {
        Self::new(MotionKind::ConstantVelocity, None, end)
    }

    /// Build a segment of any kind. The acceleration is required for
    /// accelerate/decelerate segments and ignored for constant velocity.
    pub fn new(kind: MotionKind, a: Option<f64>, end: Termination) -> Result<Self, SegmentError> {
        end.validate()?;

        let accel = match kind {
            MotionKind::Accelerate | MotionKind::Decelerate => {
                let a = a.ok_or(SegmentError::MissingAcceleration { kind })?;
                finite("a", a)?;
                if kind == MotionKind::Accelerate {
                    a.abs()
                } else {
                    -a.abs()
                }
            }
            MotionKind::ConstantVelocity => 0.0,
        };

        let supported = match (kind, end) {
            (MotionKind::ConstantVelocity, Termination::Length(_) | Termination::Duration(_)) => {
                true
            }
            (MotionKind::ConstantVelocity, _) => false,
            (MotionKind::Accelerate, Termination::UntilStopped) => false,
            _ => true,
        };
        if !supported {
            return Err(SegmentError::UnsupportedTermination {
                kind,
                termination: end.name(),
            });
        }

        Ok(Self {
            kind,
            accel,
            v0: None,
            end,
            label: String::new(),
        })
    }

    /// Override the entry speed instead of inheriting it.
    pub fn with_v0(mut self, v0: f64) -> Result<Self, SegmentError> {
        finite("v0", v0)?;
        self.v0 = Some(v0);
        Ok(self)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn kind(&self) -> MotionKind {
        self.kind
    }

    /// Signed acceleration: positive when accelerating, negative when
    /// decelerating, zero for constant velocity.
    pub fn accel(&self) -> f64 {
        self.accel
    }

    pub fn v0(&self) -> Option<f64> {
        self.v0
    }

    pub fn termination(&self) -> Termination {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), SegmentError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SegmentError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SegmentError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(SegmentError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_short_names() {
        let kind = |s: &str| serde_json::from_str::<MotionKind>(&format!("\"{s}\""));
        assert_eq!(kind("acc").unwrap(), MotionKind::Accelerate);
        assert_eq!(kind("decelerate").unwrap(), MotionKind::Decelerate);
        assert_eq!(kind("const_v").unwrap(), MotionKind::ConstantVelocity);
        assert!(kind("shm").is_err());
    }

    #[test]
    fn acceleration_sign_is_normalized() {
        let acc = Segment::accelerate(-3.0, Termination::Duration(1.0)).unwrap();
        assert_eq!(acc.accel(), 3.0);
        let dec = Segment::decelerate(3.0, Termination::UntilStopped).unwrap();
        assert_eq!(dec.accel(), -3.0);
        let cruise = Segment::constant_velocity(Termination::Duration(1.0)).unwrap();
        assert_eq!(cruise.accel(), 0.0);
    }

    #[test]
    fn termination_requires_exactly_one() {
        assert_eq!(
            Termination::from_parts(None, None, None, false),
            Err(SegmentError::MissingTermination)
        );
        assert_eq!(
            Termination::from_parts(Some(1.0), Some(2.0), None, true),
            Err(SegmentError::ConflictingTermination { count: 3 })
        );
        assert_eq!(
            Termination::from_parts(None, Some(2.5), None, false),
            Ok(Termination::Length(2.5))
        );
    }

    #[test]
    fn missing_acceleration_is_rejected() {
        let err = Segment::new(MotionKind::Decelerate, None, Termination::UntilStopped);
        assert_eq!(
            err,
            Err(SegmentError::MissingAcceleration {
                kind: MotionKind::Decelerate
            })
        );
    }

    #[test]
    fn constant_velocity_only_ends_on_length_or_duration() {
        assert!(Segment::constant_velocity(Termination::Length(1.0)).is_ok());
        assert_eq!(
            Segment::constant_velocity(Termination::EndSpeed(2.0)),
            Err(SegmentError::UnsupportedTermination {
                kind: MotionKind::ConstantVelocity,
                termination: "v_end",
            })
        );
        assert!(Segment::constant_velocity(Termination::UntilStopped).is_err());
    }

    #[test]
    fn only_deceleration_can_stop() {
        assert!(Segment::accelerate(2.0, Termination::UntilStopped).is_err());
        assert!(Segment::decelerate(2.0, Termination::UntilStopped).is_ok());
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(
            Segment::accelerate(f64::NAN, Termination::Length(1.0))
                .unwrap_err()
                .to_string(),
            "a must be finite, got NaN"
        );
        assert_eq!(
            Segment::constant_velocity(Termination::Duration(-1.0)),
            Err(SegmentError::Negative {
                field: "duration",
                value: -1.0
            })
        );
        assert!(
            Segment::constant_velocity(Termination::Duration(1.0))
                .unwrap()
                .with_v0(f64::INFINITY)
                .is_err()
        );
    }
}

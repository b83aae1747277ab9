use crate::segment::MotionKind;
use thiserror::Error;

/// Errors raised while building a scene.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error("object '{0}' already exists")]
    DuplicateObject(String),

    #[error("object '{0}' not found")]
    UnknownObject(String),

    #[error("pulley {index} not found (scene has {count})")]
    UnknownPulley { index: usize, count: usize },

    #[error("segment {index} for '{object}': {source}")]
    InvalidSegment {
        object: String,
        index: usize,
        #[source]
        source: SegmentError,
    },

    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("scene lasting {duration}s needs more than {limit} frames at dt={dt}")]
    TooManyFrames { duration: f64, dt: f64, limit: usize },
}

/// Errors raised when a single segment is declared.
#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    #[error("segment has no termination (v_end, length, duration or until_stopped)")]
    MissingTermination,

    #[error("segment has {count} terminations; exactly one is allowed")]
    ConflictingTermination { count: usize },

    #[error("{kind} segment requires an acceleration")]
    MissingAcceleration { kind: MotionKind },

    #[error("{kind} segment cannot end with {termination}")]
    UnsupportedTermination {
        kind: MotionKind,
        termination: &'static str,
    },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Errors raised while resolving segment boundaries.
#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error(
        "segment {index} of '{object}' targets v_end={v_end} from v0={v0} with zero acceleration"
    )]
    ZeroAcceleration {
        object: String,
        index: usize,
        v0: f64,
        v_end: f64,
    },

    #[error("segment {index} of '{object}' never reaches zero velocity from v0={v0}")]
    NeverStops { object: String, index: usize, v0: f64 },

    #[error("segment {index} of '{object}' ends before it starts ({t_start} > {t_end})")]
    NegativeDuration {
        object: String,
        index: usize,
        t_start: f64,
        t_end: f64,
    },
}

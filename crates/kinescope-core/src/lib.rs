//! Kinematics core for animated physics diagrams.
//!
//! Objects move along one-dimensional paths in a sequence of declarative
//! motion segments. The resolver turns those segments into contiguous
//! time/distance boundaries once; the sampler then evaluates any object at
//! any simulation time and maps the path-distance onto the plane.
//!
//! Nothing here renders or touches the filesystem; the output is plain
//! values for an external renderer.

pub mod description;
pub mod error;
pub mod geometry;
pub mod path;
pub mod resolve;
pub mod sample;
pub mod scene;
pub mod segment;
pub mod timeline;

pub use error::{ResolveError, SceneError, SegmentError};
pub use geometry::Point;
pub use path::PathKind;
pub use resolve::{Degeneracy, ResolvedSegment, Trajectory};
pub use sample::{Glyph, State};
pub use scene::{PhysicsObject, ResolvedObject, ResolvedScene, Scene};
pub use segment::{MotionKind, Segment, Termination};
pub use timeline::{Frame, SpeedTable, Timeline};

use anyhow::Result;
use clap::Args;
use kinescope_core::{Scene, Timeline};
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Scene files to validate (TOML or JSON).
    #[arg(required = true)]
    pub scenes: Vec<PathBuf>,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        let mut failed = 0usize;
        for path in &self.scenes {
            match super::load_scene(path).and_then(|scene| summarize(&scene)) {
                Ok(summary) => println!("OK {}: {summary}", path.display()),
                Err(err) => {
                    println!("ERR {}: {err:#}", path.display());
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{failed} of {} scene(s) failed", self.scenes.len());
        }
        Ok(())
    }
}

/// One-line description of a resolved scene, noting degenerate segments.
fn summarize(scene: &Scene) -> Result<String> {
    let resolved = scene.resolve()?;
    let timeline = Timeline::new(&resolved)?;

    let mut degenerate = Vec::new();
    for object in resolved.objects() {
        for (index, seg) in object.trajectory.segments().iter().enumerate() {
            if let Some(kind) = seg.degeneracy {
                degenerate.push(format!("{}[{index}] {kind:?}", object.object.name));
            }
        }
    }

    let mut summary = format!(
        "{} object(s), {:.3}s, {} frame(s)",
        scene.objects().len(),
        resolved.duration(),
        timeline.frame_count()
    );
    if !degenerate.is_empty() {
        summary.push_str(&format!("; degenerate: {}", degenerate.join(", ")));
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinescope_core::{PathKind, PhysicsObject, Point, Segment, Termination};

    #[test]
    fn summary_lists_degenerate_segments() {
        let mut scene = Scene::new("check");
        scene
            .add_object(PhysicsObject::new("M", 1.0, Point::ORIGIN, PathKind::Floor))
            .unwrap()
            .add_segment(
                "M",
                Segment::accelerate(2.0, Termination::Duration(1.0)).unwrap(),
            )
            .unwrap()
            .add_segment(
                "M",
                Segment::constant_velocity(Termination::Length(1.0))
                    .unwrap()
                    .with_v0(0.0)
                    .unwrap(),
            )
            .unwrap();
        let summary = summarize(&scene).unwrap();
        assert_eq!(
            summary,
            "1 object(s), 1.000s, 51 frame(s); degenerate: M[1] StationaryCruise"
        );
    }

    #[test]
    fn overlong_scene_is_an_error() {
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
        let err = summarize(&scene).unwrap_err();
        assert!(err.to_string().contains("frames"));
    }
}

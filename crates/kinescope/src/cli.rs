use anyhow::{Context, Result};
use kinescope_core::{Scene, description::SceneDescription};
use std::path::Path;

pub mod check;
pub mod render;
pub mod sample;

/// Load a scene description (TOML or JSON) and build the scene.
pub fn load_scene(path: &Path) -> Result<Scene> {
    let description: SceneDescription = crate::config::load(path, "scene")?;
    description
        .build()
        .with_context(|| format!("invalid scene {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn demo(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
    }

    #[test]
    fn incline_demo_resolves() {
        let scene = load_scene(&demo("incline.toml")).unwrap();
        let resolved = scene.resolve().unwrap();
        assert!((resolved.duration() - 2.5).abs() < 1e-9);

        let m = resolved.object("M").unwrap();
        assert_eq!(m.trajectory.segments().len(), 3);
        let top = m.sample(1.25);
        assert_eq!(top.label, "cruise");
        assert!((top.speed - 2.5).abs() < 1e-9);
        assert_eq!(m.sample(10.0).speed, 0.0);
    }

    #[test]
    fn pulley_demo_resolves() {
        let scene = load_scene(&demo("pulley.json")).unwrap();
        assert_eq!(scene.ropes().len(), 2);
        let resolved = scene.resolve().unwrap();
        assert!((resolved.duration() - 3.0).abs() < 1e-9);

        let hanging = resolved.sample("m", 1.3).unwrap();
        assert_eq!(hanging.label, "free fall");
        assert_eq!(hanging.position.x, 3.15);
    }

    #[test]
    fn missing_scene_reports_path() {
        let err = load_scene(Path::new("no/such/scene.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/scene.toml"));
    }
}

//! Render plan export.
//!
//! The render plan is everything the external renderer needs to draw the
//! animation: static decorations with resolved colors, one entry per frame
//! and the speed-time series for the graph.

use crate::config::{AnimationParams, Config, FontConfig};
use anyhow::{Context, Result};
use kinescope_core::{
    Frame, Point, SpeedTable, Timeline,
    scene::{Marker, Pulley, SurfaceKind},
};
use serde::Serialize;
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

/// Headroom added above the data range on the speed-time graph axes.
const GRAPH_MARGIN: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Full render plan as pretty JSON
    Plan,
    /// Speed-time table as CSV
    SpeedCsv,
}

impl ExportFormat {
    /// Pick the export format from the output file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(ExportFormat::Plan),
            Some("csv") => Ok(ExportFormat::SpeedCsv),
            Some(ext @ ("gif" | "mp4")) => anyhow::bail!(
                "{ext} encoding is done by the external renderer; write a .json render plan for it instead"
            ),
            Some(ext) => {
                anyhow::bail!("unsupported output extension '.{ext}' (expected .json or .csv)")
            }
            None => anyhow::bail!(
                "output {} has no extension (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub figsize: (f64, f64),
    pub include_graph: bool,
    pub graph_t_max: f64,
    pub graph_speed_max: f64,
}

#[derive(Debug, Serialize)]
pub struct StyledSurface<'a> {
    pub kind: SurfaceKind,
    pub start: Point,
    pub end: Point,
    pub color: &'a str,
    pub width: f64,
    pub label: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct StyledObject<'a> {
    pub name: &'a str,
    pub mass: f64,
    pub color: &'a str,
    pub size: f64,
    /// Legend entry for the speed-time graph
    pub legend: String,
}

#[derive(Debug, Serialize)]
pub struct RenderPlan<'a> {
    pub title: &'a str,
    pub duration: f64,
    pub dt: f64,
    pub animation: AnimationParams,
    pub layout: Layout,
    pub font: &'a FontConfig,
    pub rope_color: &'a str,
    pub pulley_fill: &'a str,
    pub pulley_edge: &'a str,
    pub surfaces: Vec<StyledSurface<'a>>,
    pub markers: &'a [Marker],
    pub pulleys: &'a [Pulley],
    pub objects: Vec<StyledObject<'a>>,
    pub frames: Vec<Frame<'a>>,
    pub speed: SpeedTable,
}

impl<'a> RenderPlan<'a> {
    pub fn new(timeline: &Timeline<'a>, config: &'a Config) -> Self {
        let resolved = timeline.resolved();
        let scene = resolved.scene();
        let palette = &config.style.palette;

        let mut slopes_seen = 0;
        let surfaces = scene
            .surfaces()
            .iter()
            .map(|surface| {
                let fallback = palette.surface_color(surface.kind, slopes_seen);
                if surface.kind == SurfaceKind::Slope {
                    slopes_seen += 1;
                }
                StyledSurface {
                    kind: surface.kind,
                    start: surface.start,
                    end: surface.end,
                    color: surface.color.as_deref().unwrap_or(fallback),
                    width: surface.width,
                    label: surface.label.as_deref(),
                }
            })
            .collect();

        let objects = scene
            .objects()
            .iter()
            .enumerate()
            .map(|(index, object)| StyledObject {
                name: &object.name,
                mass: object.mass,
                color: object
                    .color
                    .as_deref()
                    .unwrap_or_else(|| palette.object_color(index)),
                size: object.glyph_size(),
                legend: format!("{} ({}m)", object.name, object.mass),
            })
            .collect();

        let speed = timeline.speed_table();
        let layout = Layout {
            figsize: config.output.figsize,
            include_graph: config.output.include_graph,
            graph_t_max: timeline.duration() * GRAPH_MARGIN,
            graph_speed_max: speed.max_speed() * GRAPH_MARGIN,
        };

        Self {
            title: &scene.title,
            duration: timeline.duration(),
            dt: timeline.dt(),
            animation: config.output.animation_params(),
            layout,
            font: &config.style.font,
            rope_color: &palette.rope,
            pulley_fill: &palette.pulley_fill,
            pulley_edge: &palette.pulley_edge,
            surfaces,
            markers: scene.markers(),
            pulleys: scene.pulleys(),
            objects,
            frames: timeline.frames().collect(),
            speed,
        }
    }
}

/// Write the timeline to `path` in the format its extension selects.
pub fn export(path: &Path, timeline: &Timeline<'_>, config: &Config) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    let file = fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Plan => {
            let plan = RenderPlan::new(timeline, config);
            serde_json::to_writer_pretty(&mut writer, &plan)
                .with_context(|| format!("failed to write render plan {}", path.display()))?;
            writeln!(writer)?;
        }
        ExportFormat::SpeedCsv => {
            writer
                .write_all(timeline.speed_table().to_csv().as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinescope_core::{PathKind, PhysicsObject, Scene, Segment, Termination, scene::Surface};

    fn scene() -> Scene {
        let mut scene = Scene::new("Incline");
        scene
            .add_surface(Surface::slope(Point::new(0.0, 2.0), Point::new(3.0, 0.5)))
            .add_surface(Surface::floor(0.0, -0.5, 4.0))
            .add_surface(Surface::slope(Point::new(3.0, 0.5), Point::new(4.0, 1.0)));
        scene
            .add_object(PhysicsObject::new(
                "M",
                2.0,
                Point::new(0.3, 1.85),
                PathKind::slope_degrees(30.0),
            ))
            .unwrap()
            .add_object(
                PhysicsObject::new("B", 1.0, Point::ORIGIN, PathKind::Floor).with_color("#000000"),
            )
            .unwrap()
            .add_segment(
                "M",
                Segment::accelerate(5.0, Termination::Length(2.5)).unwrap(),
            )
            .unwrap()
            .set_dt(0.1)
            .unwrap();
        scene
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/plan.json")).unwrap(),
            ExportFormat::Plan
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("speed.csv")).unwrap(),
            ExportFormat::SpeedCsv
        );
        let gif = ExportFormat::from_path(Path::new("anim.gif")).unwrap_err();
        assert!(gif.to_string().contains("external renderer"));
        assert!(ExportFormat::from_path(Path::new("anim.webm")).is_err());
        assert!(ExportFormat::from_path(Path::new("anim")).is_err());
    }

    #[test]
    fn plan_resolves_styles() {
        let scene = scene();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();
        let config = Config::default();
        let plan = RenderPlan::new(&timeline, &config);

        assert_eq!(plan.title, "Incline");
        assert_eq!(plan.duration, 1.0);
        assert_eq!(plan.frames.len(), 11);
        assert_eq!(plan.surfaces[0].color, "#3498db");
        assert_eq!(plan.surfaces[1].color, "#7f8c8d");
        assert_eq!(plan.surfaces[2].color, "#27ae60");
        assert_eq!(plan.objects[0].color, "#e74c3c");
        assert_eq!(plan.objects[0].legend, "M (2m)");
        assert_eq!(plan.objects[1].color, "#000000");
        assert_eq!(plan.layout.graph_speed_max, 5.0 * 1.1);
    }

    #[test]
    fn writes_plan_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let scene = scene();
        let resolved = scene.resolve().unwrap();
        let timeline = Timeline::new(&resolved).unwrap();
        let config = Config::default();

        let plan_path = dir.path().join("nested/plan.json");
        assert_eq!(
            export(&plan_path, &timeline, &config).unwrap(),
            ExportFormat::Plan
        );
        let plan: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
        assert_eq!(plan["frames"].as_array().unwrap().len(), 11);
        assert_eq!(plan["frames"][10]["objects"][0]["state"]["speed"], 5.0);
        assert_eq!(plan["animation"]["fps"], 50);

        let csv_path = dir.path().join("speed.csv");
        export(&csv_path, &timeline, &config).unwrap();
        let csv = fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("t,M,B\n0,0,0\n"));
        assert_eq!(csv.lines().count(), 12);
    }
}

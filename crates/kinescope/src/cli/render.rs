use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use kinescope_core::Timeline;
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Scene file (TOML or JSON).
    pub scene: PathBuf,

    /// Render configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output path; `.json` writes the render plan, `.csv` the speed table.
    ///
    /// Defaults to the scene file name with a `json` extension.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Simulation time step, overrides the config and the scene.
    #[arg(long)]
    pub dt: Option<f64>,
}

impl RenderArgs {
    pub fn run(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.validate()?;

        let scene = super::load_scene(&self.scene)?;
        let resolved = scene
            .resolve()
            .with_context(|| format!("failed to resolve {}", self.scene.display()))?;

        let dt = self.dt.or(config.output.dt).unwrap_or(scene.dt());
        let timeline = Timeline::with_dt(&resolved, dt)?;

        tracing::info!(
            "Rendering '{}': {} object(s), {:.3}s in {} frame(s)",
            scene.title,
            scene.objects().len(),
            timeline.duration(),
            timeline.frame_count()
        );

        let output = self.output.as_ref().cloned().unwrap_or_else(|| {
            let mut default_output = self.scene.clone();
            default_output.set_extension("json");
            default_output
        });

        let format = crate::export::export(&output, &timeline, &config)?;
        tracing::info!("Wrote {format:?} to {}", output.display());

        Ok(())
    }
}

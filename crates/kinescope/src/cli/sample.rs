use anyhow::{Context, Result};
use clap::Args;
use kinescope_core::State;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct SampleArgs {
    /// Scene file (TOML or JSON).
    pub scene: PathBuf,

    /// Simulation time in seconds.
    #[arg(long, short)]
    pub time: f64,

    /// Only sample this object.
    #[arg(long)]
    pub object: Option<String>,
}

#[derive(Serialize)]
struct Sampled<'a> {
    name: &'a str,
    #[serde(flatten)]
    state: State<'a>,
}

impl SampleArgs {
    pub fn run(&self) -> Result<()> {
        let scene = super::load_scene(&self.scene)?;
        let resolved = scene
            .resolve()
            .with_context(|| format!("failed to resolve {}", self.scene.display()))?;

        let sampled: Vec<Sampled<'_>> = match &self.object {
            Some(name) => {
                let object = resolved
                    .object(name)
                    .with_context(|| format!("object '{name}' not found"))?;
                vec![Sampled {
                    name: &object.object.name,
                    state: object.sample(self.time),
                }]
            }
            None => resolved
                .objects()
                .map(|object| Sampled {
                    name: &object.object.name,
                    state: object.sample(self.time),
                })
                .collect(),
        };

        tracing::debug!(time = self.time, objects = sampled.len(), "sampled scene");
        println!("{}", serde_json::to_string_pretty(&sampled)?);
        Ok(())
    }
}

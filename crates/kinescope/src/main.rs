use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod export;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Check(args) => args.run(),
        Command::Sample(args) => args.run(),
        Command::Render(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(
    name = "kinescope",
    about = "Kinematics diagrams and speed-time graphs for physics lessons"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate scene files and report their resolved motion.
    Check(cli::check::CheckArgs),
    /// Print the state of objects at one simulation time.
    Sample(cli::sample::SampleArgs),
    /// Write a render plan (.json) or speed table (.csv) for a scene.
    Render(cli::render::RenderArgs),
}

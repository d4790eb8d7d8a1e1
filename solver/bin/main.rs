use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use solver::{solve, SolveConfig};

/// Solve a maze drawn in an image and draw the shortest path into a GIF or PNG.
#[derive(Parser, Debug)]
#[command(name = "mazesolve", version)]
struct Cli {
    /// Input image (PNG, JPEG, ...)
    input: PathBuf,

    /// Output file: .gif for an animation, .png for a still image
    output: PathBuf,

    /// Length of the gif animation in seconds
    #[arg(allow_hyphen_values = true)]
    duration: String,

    /// Color of open space, as R,G,B from 0 - 255
    #[arg(allow_hyphen_values = true)]
    space: String,

    /// Color of the walls
    #[arg(allow_hyphen_values = true)]
    block: String,

    /// Color marking the source point
    #[arg(allow_hyphen_values = true)]
    source: String,

    /// Color marking the destination point
    #[arg(allow_hyphen_values = true)]
    destination: String,

    /// Color used to draw the path
    #[arg(allow_hyphen_values = true)]
    path: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SolveConfig::new(
        cli.input,
        cli.output,
        &cli.duration,
        &[
            cli.space,
            cli.block,
            cli.source,
            cli.destination,
            cli.path,
        ],
    )?;

    solve(&config).with_context(|| {
        format!(
            "solving '{}' into '{}'",
            config.input.display(),
            config.output.display()
        )
    })
}

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    log::info!("Starting SGRT");

    let scene = sgrt_core::load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let config = args.render_config(&scene.hints);
    log::info!(
        "Render settings: {}x{}, fovy {} deg, bucket {} px",
        config.width,
        config.height,
        config.fovy_degrees,
        config.bucket_size
    );

    let image = sgrt_renderer::render(&scene, &config).context("Render failed")?;

    sgrt_renderer::save_png(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}

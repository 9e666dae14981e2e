use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use sgrt_core::RenderHints;
use sgrt_renderer::RenderConfig;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sgrt")]
#[command(about = "Ray trace a scene graph description to a PNG image")]
pub struct Args {
    /// Scene description file (JSON)
    pub scene: PathBuf,

    /// Output image path
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Image width in pixels (overrides the scene file)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (overrides the scene file)
    #[arg(long)]
    pub height: Option<u32>,

    /// Vertical field of view in degrees (overrides the scene file)
    #[arg(long)]
    pub fovy: Option<f32>,

    /// Bucket edge length in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Render threads, 0 for one per core
    #[arg(long)]
    pub threads: Option<usize>,

    /// Logging level; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Render settings: flags first, then the scene file, then defaults.
    pub fn render_config(&self, hints: &RenderHints) -> RenderConfig {
        let mut config = RenderConfig::default().with_hints(hints);

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fovy) = self.fovy {
            config.fovy_degrees = fovy;
        }
        if let Some(size) = self.bucket_size {
            config.bucket_size = size;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_args() {
        let args = Args::try_parse_from(["sgrt", "scene.json"]).unwrap();
        assert_eq!(args.scene, PathBuf::from("scene.json"));
        assert_eq!(args.output, PathBuf::from("output.png"));
        assert_eq!(args.log_level, LogLevel::Info);
        assert_eq!(args.render_config(&RenderHints::default()), RenderConfig::default());
    }

    #[test]
    fn test_scene_required() {
        assert!(Args::try_parse_from(["sgrt"]).is_err());
    }

    #[test]
    fn test_flags_override_scene_hints() {
        let args = Args::try_parse_from([
            "sgrt",
            "scene.json",
            "-o",
            "out/frame.png",
            "--width",
            "320",
            "--threads",
            "4",
            "--bucket-size",
            "16",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let hints = RenderHints {
            width: Some(100),
            height: Some(200),
            fovy: Some(45.0),
        };
        let config = args.render_config(&hints);

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 200);
        assert_eq!(config.fovy_degrees, 45.0);
        assert_eq!(config.bucket_size, 16);
        assert_eq!(config.threads, 4);
        assert_eq!(args.output, PathBuf::from("out/frame.png"));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_bad_log_level() {
        assert!(Args::try_parse_from(["sgrt", "s.json", "--log-level", "loud"]).is_err());
    }
}

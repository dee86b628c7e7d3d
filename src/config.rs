use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::{camera::RenderSettings, color::Color, shading::Falloff};

/// Log levels selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// Accepts finite numbers greater than zero.
fn positive_f32(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive finite number, got {value}"))
    }
}

#[derive(Debug, Parser)]
#[command(name = "flatland")]
#[command(about = "First-person raycast view of a flat world of polygons")]
pub struct Args {
    /// Initial window width; also the number of rays per frame
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 655)]
    pub height: u32,

    /// Number of random polygons in the world
    #[arg(long, default_value_t = 40)]
    pub objects: usize,

    /// Seed for the world generator (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Farthest distance that is drawn
    #[arg(long, default_value_t = 50.0, value_parser = positive_f32)]
    pub view_distance: f32,

    /// Distance from the camera to its viewport
    #[arg(long, default_value_t = 1.0, value_parser = positive_f32)]
    pub viewport_distance: f32,

    /// Width of the viewport; with distance 1, size 2 gives a 90 degree view
    #[arg(long, default_value_t = 2.0, value_parser = positive_f32)]
    pub viewport_size: f32,

    /// Distance darkening curve: "sinh" or "linear"
    #[arg(long, default_value = "sinh")]
    pub falloff: Falloff,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Everything the application needs to set up a session.
#[derive(Debug, Clone)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub objects: usize,
    pub seed: Option<u64>,
    /// Half the side of the square the camera may move in.
    pub world_size: f32,
    /// Half the side of the square random polygons are centered in.
    pub spawn_extent: i32,
    pub viewport_distance: f32,
    pub viewport_size: f32,
    pub render: RenderSettings,
    /// Pixels per world unit in the overview.
    pub overview_scale: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per second.
    pub turn_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 655,
            objects: 40,
            seed: None,
            world_size: 75.0,
            spawn_extent: 75,
            viewport_distance: 1.0,
            viewport_size: 2.0,
            render: RenderSettings {
                max_view_distance: 50.0,
                background: Color::BLACK,
                falloff: Falloff::Sinh,
            },
            overview_scale: 3.0,
            move_speed: 9.0,
            turn_speed: 3.0,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let defaults = Config::default();
        Self {
            width: args.width,
            height: args.height,
            objects: args.objects,
            seed: args.seed,
            viewport_distance: args.viewport_distance,
            viewport_size: args.viewport_size,
            render: RenderSettings {
                max_view_distance: args.view_distance,
                falloff: args.falloff,
                ..defaults.render
            },
            ..defaults
        }
    }
}

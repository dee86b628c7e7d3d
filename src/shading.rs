use std::str::FromStr;

use crate::color::Color;

/// How brightness drops with distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Falloff {
    /// `-sinh(d / D)`: gentle near the camera, steep towards the cutoff.
    #[default]
    Sinh,
    /// `-d / D`
    Linear,
}

impl Falloff {
    /// Brightness delta for a hit at `distance` (non-positive).
    pub fn delta(self, distance: f32, max_view_distance: f32) -> f32 {
        let ratio = distance / max_view_distance;
        match self {
            Falloff::Sinh => -ratio.sinh(),
            Falloff::Linear => -ratio,
        }
    }
}

impl FromStr for Falloff {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sinh" => Ok(Falloff::Sinh),
            "linear" => Ok(Falloff::Linear),
            other => anyhow::bail!("unknown falloff '{other}', expected 'sinh' or 'linear'"),
        }
    }
}

/// Darken `base` according to how far away the hit is.
#[inline]
pub fn shade(base: Color, distance: f32, max_view_distance: f32, falloff: Falloff) -> Color {
    base.brightness(falloff.delta(distance, max_view_distance))
}

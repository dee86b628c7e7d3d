use anyhow::ensure;
use glam::Vec2;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{
    color::Color,
    ray::Ray,
    shading::{Falloff, shade},
    world::World,
};

/// Columns handed to a rayon task at once.
const COLUMNS_PER_TASK: usize = 32;

/// Per-frame shading parameters.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Hits at or beyond this distance are not drawn.
    pub max_view_distance: f32,
    pub background: Color,
    pub falloff: Falloff,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_view_distance: 50.0,
            background: Color::BLACK,
            falloff: Falloff::Sinh,
        }
    }
}

pub struct Camera {
    pub pos: Vec2,     // (x, y) position in world space
    direction: Vec2,   // unit facing direction
    pixel_count: usize,
    viewport_distance: f32,
    viewport_size: f32,
}

impl Camera {
    /// `viewport_size / (2 * viewport_distance)` is the tangent of half the
    /// horizontal field of view; 2 and 1 give 90 degrees.
    pub fn new(
        pos: Vec2,
        direction: Vec2,
        pixel_count: usize,
        viewport_distance: f32,
        viewport_size: f32,
    ) -> anyhow::Result<Self> {
        ensure!(pixel_count > 0, "camera needs at least one pixel column");
        ensure!(
            viewport_distance > 0.0 && viewport_distance.is_finite(),
            "viewport distance must be positive, got {viewport_distance}"
        );
        ensure!(
            viewport_size > 0.0 && viewport_size.is_finite(),
            "viewport size must be positive, got {viewport_size}"
        );
        let Some(direction) = direction.try_normalize() else {
            anyhow::bail!("camera direction must be non-zero and finite, got {direction}");
        };

        Ok(Self {
            pos,
            direction,
            pixel_count,
            viewport_distance,
            viewport_size,
        })
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Follow the screen width. Zero (minimized window) is ignored.
    pub fn set_pixel_count(&mut self, pixel_count: usize) {
        if pixel_count > 0 {
            self.pixel_count = pixel_count;
        }
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f32 {
        2.0 * (self.viewport_size / (2.0 * self.viewport_distance)).atan()
    }

    /// Unit vector along the viewport, pointing towards increasing columns.
    #[inline]
    pub fn basis(&self) -> Vec2 {
        Vec2::new(self.direction.y, -self.direction.x).normalize()
    }

    /*  The viewport is a segment perpendicular to the camera direction:
     *
     *  Viewport
     *  |-----------|
     *        ^-> basis
     *        |
     *        | viewportCenter
     *        |
     *        O camera
     */
    /// Point on the viewport that `pixel` looks through.
    pub fn viewport_point(&self, pixel: usize) -> Vec2 {
        let centered = pixel as f32 - (self.pixel_count / 2) as f32;
        let normalized_offset = centered / self.pixel_count as f32;
        let offset = self.basis() * (normalized_offset * self.viewport_size);

        let viewport_center = self.pos + self.direction * self.viewport_distance;
        viewport_center + offset
    }

    /// Ray from the camera through column `pixel`.
    #[inline]
    pub fn ray_for_column(&self, pixel: usize) -> Ray {
        Ray::new(self.pos, self.viewport_point(pixel) - self.pos)
    }

    fn column_color(&self, world: &World, settings: &RenderSettings, pixel: usize) -> Color {
        let ray = self.ray_for_column(pixel);
        match world.nearest_hit(&ray, settings.max_view_distance) {
            Some(hit) => shade(
                hit.object.color(),
                hit.distance,
                settings.max_view_distance,
                settings.falloff,
            ),
            None => settings.background,
        }
    }

    /// One color per screen column, left to right.
    ///
    /// Columns are independent; they are resolved in parallel over disjoint
    /// chunks of the output. `world` must not change during the call.
    pub fn cast_rays(&self, world: &World, settings: &RenderSettings) -> Vec<Color> {
        let mut colors = vec![settings.background; self.pixel_count];
        self.cast_rays_into(world, settings, &mut colors);
        colors
    }

    /// Like [`Camera::cast_rays`], writing into `out`.
    ///
    /// `out` must hold exactly [`Camera::pixel_count`] entries.
    pub fn cast_rays_into(&self, world: &World, settings: &RenderSettings, out: &mut [Color]) {
        debug_assert_eq!(out.len(), self.pixel_count, "one output color per column");
        out.par_chunks_mut(COLUMNS_PER_TASK)
            .enumerate()
            .for_each(|(chunk, colors)| {
                let first = chunk * COLUMNS_PER_TASK;
                for (i, color) in colors.iter_mut().enumerate() {
                    *color = self.column_color(world, settings, first + i);
                }
            });
    }

    /// Move along the facing direction (negative moves back).
    pub fn move_forward(&mut self, amount: f32) {
        self.pos += self.direction * amount;
    }

    /// Move sideways; positive goes towards the right edge of the screen.
    pub fn strafe(&mut self, amount: f32) {
        self.pos += self.basis() * amount;
    }

    /// Rotate the facing direction counter-clockwise by `angle` radians.
    ///
    /// Positive angles turn the view towards the left edge of the screen.
    pub fn rotate(&mut self, angle: f32) {
        // renormalize to avoid float drift over many frames
        self.direction = Vec2::from_angle(angle).rotate(self.direction).normalize();
    }

    /// Keep the camera inside the square `[-half_extent, half_extent]`.
    pub fn clamp_to(&mut self, half_extent: f32) {
        self.pos = self.pos.clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent));
    }
}

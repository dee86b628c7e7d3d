use glam::Vec2;
use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};

use crate::{camera::Camera, color::Color, ray::Ray, world::World};

const DIVIDER_THICKNESS: usize = 3;
const CAMERA_MARKER_RADIUS: i32 = 3;

/// Where each part of the window goes. The overview sits on top,
/// the first-person strip below the divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub overview_height: usize,
    pub first_person_y: usize,
}

impl Layout {
    pub fn new(width: usize, height: usize) -> Self {
        // 250 of the 655 rows of the default window
        let first_person_height = height * 250 / 655;
        let first_person_y = height - first_person_height;
        let overview_height = first_person_y.saturating_sub(DIVIDER_THICKNESS);
        Self {
            width,
            height,
            overview_height,
            first_person_y,
        }
    }
}

/// What the overview needs besides the world and camera.
#[derive(Debug, Clone, Copy)]
pub struct Overview {
    pub scale: f32,
    pub view_distance: f32,
}

pub fn render_frame(
    buf: &mut [u32],
    layout: Layout,
    world: &World,
    camera: &Camera,
    columns: &[Color],
    background: Color,
    overview: Overview,
) {
    let bg = background.to_u32();
    buf.fill(bg);

    draw_overview(buf, layout, world, camera, overview);

    // Divider
    let divider = Color::RAY_WHITE.to_u32();
    let start = layout.overview_height * layout.width;
    let end = layout.first_person_y * layout.width;
    buf[start..end].fill(divider);

    draw_columns(buf, layout, columns, bg);
}

/// Paint each column of the lower strip with its ray color.
fn draw_columns(buf: &mut [u32], layout: Layout, columns: &[Color], bg: u32) {
    let strip = &mut buf[layout.first_person_y * layout.width..];
    strip.par_chunks_mut(layout.width).for_each(|row| {
        for (x, px) in row.iter_mut().enumerate() {
            *px = columns.get(x).map_or(bg, |c| c.to_u32());
        }
    });
}

fn draw_overview(
    buf: &mut [u32],
    layout: Layout,
    world: &World,
    camera: &Camera,
    overview: Overview,
) {
    let area = &mut buf[..layout.overview_height * layout.width];
    let mut canvas = Canvas {
        buf: area,
        width: layout.width,
        height: layout.overview_height,
    };
    let center = Vec2::new(layout.width as f32 / 2.0, layout.overview_height as f32 / 2.0);
    // World +Y points up the screen, so the camera basis points screen-right
    let to_screen = |p: Vec2| center + Vec2::new(p.x, -p.y) * overview.scale;

    for object in world.iter() {
        let color = object.color().to_u32();
        for (a, b) in object.outline() {
            canvas.line(to_screen(a), to_screen(b), color);
        }
    }

    // Field of view edges, out to the cutoff distance
    let fov_color = Color::from_rgb(80, 80, 80).to_u32();
    let last = camera.pixel_count() - 1;
    for ray in [camera.ray_for_column(0), camera.ray_for_column(last)] {
        canvas.line(
            to_screen(ray.origin),
            to_screen(ray.end(overview.view_distance)),
            fov_color,
        );
    }

    let white = Color::RAY_WHITE.to_u32();
    let pos = to_screen(camera.pos);
    canvas.disc(pos, CAMERA_MARKER_RADIUS, white);
    let heading = Ray::new(camera.pos, camera.direction());
    canvas.line(pos, to_screen(heading.end(2.0)), white);
}

struct Canvas<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl Canvas<'_> {
    #[inline]
    fn put(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    /// Liang-Barsky clip of `from`-`to` against the canvas rectangle.
    fn clip(&self, from: Vec2, to: Vec2) -> Option<(Vec2, Vec2)> {
        if self.width == 0 || self.height == 0 || !from.is_finite() || !to.is_finite() {
            return None;
        }
        let max = Vec2::new(self.width as f32 - 1.0, self.height as f32 - 1.0);
        let d = to - from;
        let (mut t0, mut t1) = (0.0f32, 1.0f32);

        for (p, q) in [
            (-d.x, from.x),
            (d.x, max.x - from.x),
            (-d.y, from.y),
            (d.y, max.y - from.y),
        ] {
            if p == 0.0 {
                // parallel to this edge and outside of it
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((from + d * t0, from + d * t1))
    }

    /// Bresenham line, clipped to the canvas first.
    fn line(&mut self, from: Vec2, to: Vec2, color: u32) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn disc(&mut self, center: Vec2, radius: i32, color: u32) {
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

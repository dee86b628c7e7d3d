use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::{color::Color, ray::Ray};

/// Anything a ray can strike.
///
/// Must be `Send + Sync`: columns of a frame are resolved in parallel against
/// a shared world.
pub trait WorldObject: Send + Sync {
    /// Distance to the nearest point where `ray` hits this object, if any.
    fn hit_by(&self, ray: &Ray) -> Option<f32>;

    fn color(&self) -> Color;

    fn center(&self) -> Vec2;

    /// Line segments approximating the object's outline, for the overview map.
    fn outline(&self) -> Vec<(Vec2, Vec2)>;
}

/// Closed polygon. Edge `i` joins `points[i]` to `points[(i + 1) % len]`.
///
/// Two points make a single double-sided line; fewer make nothing hittable.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
    color: Color,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>, color: Color) -> Self {
        Self { points, color }
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`,
    /// the first one rotated `angle` radians from +X.
    pub fn regular(center: Vec2, sides: usize, angle: f32, radius: f32, color: Color) -> Self {
        let points = (0..sides)
            .map(|i| {
                let point_angle = (i as f32 * TAU) / sides as f32 + angle;
                center + Vec2::from_angle(point_angle).rotate(Vec2::X) * radius
            })
            .collect();
        Self { points, color }
    }

    /// Consecutive point pairs, wrapping from the last point to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl WorldObject for Polygon {
    fn hit_by(&self, ray: &Ray) -> Option<f32> {
        self.edges()
            .filter_map(|(a, b)| ray.collides_with_segment(a, b))
            .min_by(f32::total_cmp)
    }

    fn color(&self) -> Color {
        self.color
    }

    fn center(&self) -> Vec2 {
        if self.points.is_empty() {
            return Vec2::ZERO;
        }
        self.points.iter().sum::<Vec2>() / self.points.len() as f32
    }

    fn outline(&self) -> Vec<(Vec2, Vec2)> {
        self.edges().collect()
    }
}

/// Nearest object struck by a ray.
pub struct Hit<'w> {
    pub object: &'w dyn WorldObject,
    pub distance: f32,
}

#[derive(Default)]
pub struct World {
    objects: Vec<Box<dyn WorldObject>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` random regular polygons centered in `[-extent, extent)` on both axes.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, count: usize, extent: i32) -> Self {
        let mut world = Self::new();
        for _ in 0..count {
            let center = Vec2::new(
                rng.gen_range(-extent..extent) as f32,
                rng.gen_range(-extent..extent) as f32,
            );
            // at least two points, so every object is at least a line
            let sides = rng.gen_range(2..=7);
            let angle = rng.gen_range(0.0..TAU);
            let radius = rng.gen_range(3..=10) as f32;
            let color = Color::PALETTE[rng.gen_range(0..Color::PALETTE.len())];
            world.push(Polygon::regular(center, sides, angle, radius, color));
        }
        world
    }

    pub fn push(&mut self, object: impl WorldObject + 'static) {
        self.objects.push(Box::new(object));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn WorldObject> {
        self.objects.iter().map(|o| o.as_ref())
    }

    /// Closest object hit strictly nearer than `max_distance`.
    ///
    /// Among exactly equal distances the first object in the world wins.
    pub fn nearest_hit(&self, ray: &Ray, max_distance: f32) -> Option<Hit<'_>> {
        let mut nearest = None;
        let mut nearest_dist = max_distance;

        for object in self.iter() {
            if let Some(dist) = object.hit_by(ray) {
                if dist < nearest_dist {
                    nearest_dist = dist;
                    nearest = Some(Hit {
                        object,
                        distance: dist,
                    });
                }
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn square(min: Vec2, size: f32, color: Color) -> Polygon {
        Polygon::new(
            vec![
                min,
                min + Vec2::new(size, 0.0),
                min + Vec2::new(size, size),
                min + Vec2::new(0.0, size),
            ],
            color,
        )
    }

    /// Circle variant, only here to show new objects plug into `World` as is.
    struct Disc {
        center: Vec2,
        radius: f32,
    }

    impl WorldObject for Disc {
        fn hit_by(&self, ray: &Ray) -> Option<f32> {
            let oc = ray.origin - self.center;
            let b = oc.dot(ray.direction);
            let c = oc.length_squared() - self.radius * self.radius;
            let disc = b * b - c;
            if disc < 0.0 {
                return None;
            }
            let t = -b - disc.sqrt();
            (t >= 0.0).then_some(t)
        }

        fn color(&self) -> Color {
            Color::GREEN
        }

        fn center(&self) -> Vec2 {
            self.center
        }

        fn outline(&self) -> Vec<(Vec2, Vec2)> {
            Vec::new()
        }
    }

    #[test]
    fn ray_through_square_reports_entry() {
        let sq = square(Vec2::new(2.0, -1.0), 2.0, Color::RED);
        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        assert!(approx(sq.hit_by(&ray).unwrap(), 2.0));
    }

    #[test]
    fn ray_from_inside_reports_exit() {
        let sq = square(Vec2::new(-1.0, -1.0), 2.0, Color::RED);
        let ray = Ray::new(Vec2::ZERO, Vec2::Y);
        assert!(approx(sq.hit_by(&ray).unwrap(), 1.0));
    }

    #[test]
    fn missing_ray_reports_none() {
        let sq = square(Vec2::new(2.0, -1.0), 2.0, Color::RED);
        let ray = Ray::new(Vec2::ZERO, -Vec2::X);
        assert!(sq.hit_by(&ray).is_none());
    }

    #[test]
    fn concave_polygon_reports_nearest_of_many() {
        // a "U" opening towards -X; the ray along +X crosses the inner and outer wall
        let u = Polygon::new(
            vec![
                Vec2::new(1.0, -2.0),
                Vec2::new(6.0, -2.0),
                Vec2::new(6.0, 2.0),
                Vec2::new(1.0, 2.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(5.0, 1.0),
                Vec2::new(5.0, -1.0),
                Vec2::new(1.0, -1.0),
            ],
            Color::BLUE,
        );
        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        assert!(approx(u.hit_by(&ray).unwrap(), 5.0));
    }

    #[test]
    fn two_points_form_a_double_sided_line() {
        let line = Polygon::new(vec![Vec2::new(3.0, -1.0), Vec2::new(3.0, 1.0)], Color::BLUE);
        assert_eq!(line.edges().count(), 2);
        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        assert!(approx(line.hit_by(&ray).unwrap(), 3.0));
        let back = Ray::new(Vec2::new(6.0, 0.0), -Vec2::X);
        assert!(approx(line.hit_by(&back).unwrap(), 3.0));
    }

    #[test]
    fn fewer_than_two_points_never_hit() {
        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        let empty = Polygon::new(Vec::new(), Color::RED);
        let single = Polygon::new(vec![Vec2::new(1.0, 0.0)], Color::RED);
        assert_eq!(empty.edges().count(), 0);
        assert_eq!(single.edges().count(), 0);
        assert!(empty.hit_by(&ray).is_none());
        assert!(single.hit_by(&ray).is_none());
        assert_eq!(empty.center(), Vec2::ZERO);
    }

    #[test]
    fn regular_polygon_vertices_lie_on_circle() {
        let center = Vec2::new(4.0, -3.0);
        let hex = Polygon::regular(center, 6, 0.3, 5.0, Color::YELLOW);
        assert_eq!(hex.points.len(), 6);
        for p in &hex.points {
            assert!(approx(p.distance(center), 5.0));
        }
        let first = hex.points[0] - center;
        assert!(approx(first.y.atan2(first.x), 0.3));
        let c = hex.center();
        assert!(approx(c.x, center.x) && approx(c.y, center.y));
    }

    #[test]
    fn regular_square_without_rotation() {
        let sq = Polygon::regular(Vec2::ZERO, 4, 0.0, 1.0, Color::RED);
        let expected = [Vec2::X, Vec2::Y, -Vec2::X, -Vec2::Y];
        for (p, e) in sq.points.iter().zip(expected) {
            assert!(approx(p.x, e.x) && approx(p.y, e.y), "{p} != {e}");
        }
    }

    #[test]
    fn nearest_hit_picks_closest_object() {
        let mut world = World::new();
        world.push(square(Vec2::new(10.0, -1.0), 2.0, Color::BLUE));
        world.push(square(Vec2::new(4.0, -1.0), 2.0, Color::RED));
        world.push(square(Vec2::new(20.0, -1.0), 2.0, Color::GREEN));

        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        let hit = world.nearest_hit(&ray, 50.0).unwrap();
        assert_eq!(hit.object.color(), Color::RED);
        assert!(approx(hit.distance, 4.0));
    }

    #[test]
    fn nearest_hit_respects_view_distance() {
        let mut world = World::new();
        world.push(square(Vec2::new(60.0, -1.0), 2.0, Color::BLUE));
        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        assert!(world.nearest_hit(&ray, 50.0).is_none());
        assert!(world.nearest_hit(&ray, 61.0).is_some());
        // the bound itself is exclusive
        assert!(world.nearest_hit(&ray, 60.0).is_none());
    }

    #[test]
    fn empty_world_has_no_hit() {
        let world = World::new();
        assert!(world.is_empty());
        let ray = Ray::new(Vec2::ZERO, Vec2::Y);
        assert!(world.nearest_hit(&ray, 50.0).is_none());
    }

    #[test]
    fn other_variants_mix_with_polygons() {
        let mut world = World::new();
        world.push(square(Vec2::new(8.0, -1.0), 2.0, Color::BLUE));
        world.push(Disc {
            center: Vec2::new(5.0, 0.0),
            radius: 1.0,
        });
        let ray = Ray::new(Vec2::ZERO, Vec2::X);
        let hit = world.nearest_hit(&ray, 50.0).unwrap();
        assert_eq!(hit.object.color(), Color::GREEN);
        assert!(approx(hit.distance, 4.0));
        assert_eq!(hit.object.center(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn random_world_is_reproducible_and_bounded() {
        let a = World::random(&mut StdRng::seed_from_u64(7), 40, 75);
        let b = World::random(&mut StdRng::seed_from_u64(7), 40, 75);
        assert_eq!(a.len(), 40);

        for (oa, ob) in a.iter().zip(b.iter()) {
            assert_eq!(oa.center(), ob.center());
            assert_eq!(oa.color(), ob.color());
            assert!(Color::PALETTE.contains(&oa.color()));

            let edges = oa.outline().len();
            assert!((2..=7).contains(&edges));

            let c = oa.center();
            assert!(c.x.abs() <= 75.5 && c.y.abs() <= 75.5);
        }
    }
}

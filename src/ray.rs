use glam::Vec2;

/// Determinants at or below this are treated as parallel lines.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Half-line starting at `origin`. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray {
    /// Caller guarantees `direction` is non-zero.
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn try_new(origin: Vec2, direction: Vec2) -> Option<Self> {
        direction
            .try_normalize()
            .map(|direction| Self { origin, direction })
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Point at `length` along the ray (used to draw sampled rays).
    #[inline]
    pub fn end(&self, length: f32) -> Vec2 {
        self.at(length)
    }

    /// Distance from `origin` to where the ray crosses segment `p1`-`p2`.
    ///
    /// Solves `origin + t * direction = p1 + u * (p2 - p1)` with Cramer's rule.
    /// A hit needs `t >= 0` and `0 <= u <= 1`. Parallel and collinear
    /// segments, including degenerate ones (`p1 == p2`), never hit.
    pub fn collides_with_segment(&self, p1: Vec2, p2: Vec2) -> Option<f32> {
        let seg = p2 - p1;
        let det = -self.direction.x * seg.y + seg.x * self.direction.y;
        if det.abs() <= PARALLEL_EPSILON {
            return None;
        }

        let diff = self.origin - p1;
        // u: position along the segment, t: along the ray
        let u = (-self.direction.x * diff.y + self.direction.y * diff.x) / det;
        let t = (diff.x * seg.y - seg.x * diff.y) / det;

        // direction is unit length, so t is already the euclidean distance
        if t >= 0.0 && (0.0..=1.0).contains(&u) {
            Some(t)
        } else {
            None
        }
    }
}

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// Moves `alpha` of the way toward `target`; `alpha` is not clamped.
    pub fn lerp(self, target: Vec3, alpha: f32) -> Vec3 {
        self + (target - self) * alpha
    }

    /// Clamps each axis independently into `[min, max]`.
    pub fn clamp(self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3 {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
            z: self.z.clamp(min.z, max.z),
        }
    }

    pub fn max_component(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Axis-aligned box. Containment is closed: points on a face are inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points<I>(points: I) -> Option<Aabb>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter().filter(|point| point.is_finite());
        let first = points.next()?;
        let mut bounds = Aabb::new(first, first);
        for point in points {
            bounds.min = Vec3::new(
                bounds.min.x.min(point.x),
                bounds.min.y.min(point.y),
                bounds.min.z.min(point.z),
            );
            bounds.max = Vec3::new(
                bounds.max.x.max(point.x),
                bounds.max.y.max(point.y),
                bounds.max.z.max(point.z),
            );
        }
        Some(bounds)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Sphere with a closed boundary: `distance <= radius` counts as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.distance(self.center) <= self.radius
    }
}

pub fn lerp_scalar(from: f32, to: f32, alpha: f32) -> f32 {
    from + (to - from) * alpha
}

//! Plain copyable 2D math values. The simulation deliberately has no physics
//! beyond axis-aligned boxes, so this is the whole vocabulary.

use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn distance_sq(&self, other: Vec2) -> f32 {
        (*self - other).length_sq()
    }

    pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned box described by its center and full extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < (self.size.x + other.size.x) * 0.5
            && (self.center.y - other.center.y).abs() < (self.size.y + other.size.y) * 0.5
    }

    /// Overlap depth along each axis. Both components are positive only when
    /// the boxes actually intersect.
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            (self.size.x + other.size.x) * 0.5 - (self.center.x - other.center.x).abs(),
            (self.size.y + other.size.y) * 0.5 - (self.center.y - other.center.y).abs(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_detection() {
        let a = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(16.0, 16.0));
        let b = Aabb::new(Vec2::new(108.0, 100.0), Vec2::new(16.0, 16.0));
        assert!(a.overlaps(&b));

        let c = Aabb::new(Vec2::new(130.0, 100.0), Vec2::new(16.0, 16.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn penetration_depth() {
        let a = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(16.0, 16.0));
        let b = Aabb::new(Vec2::new(108.0, 100.0), Vec2::new(16.0, 16.0));
        let pen = a.penetration(&b);
        assert_eq!(pen.x, 8.0);
        assert_eq!(pen.y, 16.0);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Vec2::lerp(Vec2::ZERO, Vec2::new(10.0, -4.0), 0.5);
        assert_eq!(mid, Vec2::new(5.0, -2.0));
    }
}

use std::{
    array,
    f32::consts::TAU,
    ops::{Add, Div, Mul, Sub},
};

use bytemuck::NoUninit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Vec<T, const N: usize>([T; N]);

impl<const N: usize> Vec<f32, N> {
    pub fn dist(self, other: Self) -> f32 {
        let mut sum = 0.0;
        for (&a, &b) in self.0.iter().zip(&other.0) {
            let diff = b - a;
            sum += diff * diff;
        }
        sum.sqrt()
    }

    pub fn length(self) -> f32 {
        self.dist(Vec([0.0; N]))
    }
}

impl<T: Copy> Vec<T, 2> {
    pub fn x(self) -> T {
        self.0[0]
    }

    pub fn y(self) -> T {
        self.0[1]
    }
}

// Safety: `[T; N]` has no padding iff `T` has no padding.
unsafe impl<T: NoUninit, const N: usize> NoUninit for Vec<T, N> {}

pub type Vec2<T> = Vec<T, 2>;
pub type Vec2f = Vec2<f32>;

/// A position on the canvas, in logical pixels with the top left corner at 0,0.
pub type Point = Vec2f;

impl<T, const N: usize> From<[T; N]> for Vec<T, N> {
    fn from(value: [T; N]) -> Self {
        Self(value)
    }
}

impl<T, const N: usize> From<Vec<T, N>> for [T; N] {
    fn from(value: Vec<T, N>) -> Self {
        value.0
    }
}

impl<T, const N: usize> Add<Vec<T, N>> for Vec<T, N>
where
    T: Add<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn add(self, rhs: Vec<T, N>) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<T, const N: usize> Sub<Vec<T, N>> for Vec<T, N>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn sub(self, rhs: Vec<T, N>) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<T, const N: usize> Mul<T> for Vec<T, N>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn mul(self, rhs: T) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] * rhs))
    }
}

impl<T, const N: usize> Div<T> for Vec<T, N>
where
    T: Div<Output = T> + Copy,
{
    type Output = Vec<T, N>;

    fn div(self, rhs: T) -> Self::Output {
        Vec(array::from_fn(|i| self.0[i] / rhs))
    }
}

pub fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vec([x, y])
}

/// Places entry `index` of `count` on a circle of `radius` around `center`.
///
/// Entry 0 sits at angle 0 (to the right of the center); entries continue clockwise on screen,
/// since the y axis points down.
pub fn circular_position(index: usize, count: usize, center: Point, radius: f32) -> Point {
    let angle = index as f32 / count as f32 * TAU;
    center + vec2(angle.cos(), angle.sin()) * radius
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_min_size(min: Point, size: Vec2f) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn from_center_size(center: Point, size: Vec2f) -> Self {
        Self::from_min_size(center - size * 0.5, size)
    }

    pub fn size(&self) -> Vec2f {
        self.max - self.min
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn translate(self, by: Vec2f) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.min.x()..=self.max.x()).contains(&p.x())
            && (self.min.y()..=self.max.y()).contains(&p.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_positions_follow_angle() {
        let center = vec2(100.0, 100.0);
        let p = circular_position(0, 7, center, 60.0);
        assert!(p.dist(vec2(160.0, 100.0)) < 1e-4);

        let angle = 3.0 * TAU / 7.0;
        let p = circular_position(3, 7, center, 60.0);
        let expected = vec2(100.0 + 60.0 * angle.cos(), 100.0 + 60.0 * angle.sin());
        assert!(p.dist(expected) < 1e-4, "{p:?} != {expected:?}");
    }

    #[test]
    fn rect_contains_its_edges() {
        let r = Rect::from_center_size(vec2(50.0, 50.0), vec2(20.0, 10.0));
        assert_eq!(r.min, vec2(40.0, 45.0));
        assert!(r.contains(vec2(40.0, 45.0)));
        assert!(r.contains(vec2(60.0, 55.0)));
        assert!(!r.contains(vec2(60.1, 50.0)));
        assert_eq!(r.translate(vec2(5.0, 0.0)).center(), vec2(55.0, 50.0));
    }
}

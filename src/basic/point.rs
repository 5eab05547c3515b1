use crate::basic::precision::{grid_units, make_precise};
use lyon_geom::euclid::default::{Point2D, Vector2D};
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Div, Mul};

/// A point (or vector) in the plane
///
/// Equality and hashing go through the precision grid, so two points that
/// differ only by floating point noise compare equal
#[derive(Copy, Clone, Default, Add, AddAssign, Sub, SubAssign, Neg)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0., y: 0. };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn precise(self) -> Self {
        Self {
            x: make_precise(self.x),
            y: make_precise(self.y),
        }
    }

    pub fn grid_key(self) -> (i64, i64) {
        (grid_units(self.x), grid_units(self.y))
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn square_length(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.square_length().sqrt()
    }

    /// (x, y) -> (y, -x)
    #[must_use]
    pub fn rotate_quarter_clockwise(self) -> Self {
        Self { x: self.y, y: -self.x }
    }

    /// Component-wise product
    #[must_use]
    pub fn scale(self, other: Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.grid_key() == other.grid_key()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grid_key().hash(state)
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<Point2D<f64>> for Point {
    fn from(Point2D { x, y, _unit }: Point2D<f64>) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Point2D<f64> {
    fn from(Point { x, y }: Point) -> Self {
        Point2D { x, y, _unit: PhantomData }
    }
}

impl From<Point> for Vector2D<f64> {
    fn from(Point { x, y }: Point) -> Self {
        Vector2D { x, y, _unit: PhantomData }
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Mul<Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        rhs * self
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self { x: self.x / rhs, y: self.y / rhs }
    }
}

#[test]
fn test_quantized_equality() {
    use std::collections::HashSet;

    let a = Point::new(0.1 + 0.2, -0.);
    let b = Point::new(0.3, 0.);
    assert_eq!(a, b);

    let set: HashSet<Point> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);

    assert_ne!(Point::new(0.3, 0.), Point::new(0.3000002, 0.));
}

#[test]
fn test_rotate_quarter_clockwise() {
    let up = Point::new(0., 1.);
    assert_eq!(up.rotate_quarter_clockwise(), Point::new(1., 0.));
    assert_eq!(
        up.rotate_quarter_clockwise().rotate_quarter_clockwise(),
        -up
    );
    assert_eq!(up.cross(up.rotate_quarter_clockwise()), -1.);
}

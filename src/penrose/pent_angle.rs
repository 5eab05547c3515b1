use crate::basic::{make_precise, Point};
use lazy_static::lazy_static;
use std::f64::consts::TAU;

pub const FAMILY_COUNT: usize = 5;

lazy_static! {
    pub static ref PENT_ANGLES: [PentAngle; FAMILY_COUNT] = [0, 1, 2, 3, 4].map(PentAngle::new);
}

/// The direction of one of the five strip families, in steps of 72 degrees
#[derive(Copy, Clone, Debug)]
pub struct PentAngle {
    pub index: usize,
    pub degrees: u32,
    pub radians: f64,
    // quantized
    pub sin: f64,
    pub cos: f64,
}

impl PentAngle {
    fn new(index: usize) -> Self {
        let degrees = 72 * index as u32;
        let radians = TAU * degrees as f64 / 360.;
        Self {
            index,
            degrees,
            radians,
            sin: make_precise(radians.sin()),
            cos: make_precise(radians.cos()),
        }
    }

    pub fn get(index: usize) -> &'static Self {
        &PENT_ANGLES[index]
    }

    /// Unit vector with x = sin and y = cos, 0 points up and angles grow
    /// clockwise
    pub fn unit(&self) -> Point {
        Point::new(self.sin, self.cos)
    }

    /// sin(other - self), positive when other lies clockwise of self
    pub fn sin_to(&self, other: &Self) -> f64 {
        (other.radians - self.radians).sin()
    }
}

pub fn unit(index: usize) -> Point {
    PentAngle::get(index).unit()
}

/// sin(angle_j - angle_i)
pub fn angular_sin(i: usize, j: usize) -> f64 {
    PentAngle::get(i).sin_to(PentAngle::get(j))
}

#[test]
fn test_angular_sin_antisymmetric() {
    for i in 0..FAMILY_COUNT {
        assert_eq!(angular_sin(i, i), 0.);
        for j in 0..FAMILY_COUNT {
            let sum = angular_sin(i, j) + angular_sin(j, i);
            assert!(sum.abs() < 1e-12, "{i}, {j}: {sum}");
        }
    }
}

#[test]
fn test_angular_sin_nonzero_between_families() {
    for i in 0..FAMILY_COUNT {
        for j in (0..FAMILY_COUNT).filter(|&j| j != i) {
            assert!(angular_sin(i, j).abs() > 0.5);
        }
    }
}

#[test]
fn test_units() {
    assert_eq!(unit(0), Point::new(0., 1.));
    for i in 0..FAMILY_COUNT {
        assert!((unit(i).length() - 1.).abs() < 1e-6);
        assert_eq!(PentAngle::get(i).degrees, 72 * i as u32);
    }

    // the five directions cancel out
    let sum = (0..FAMILY_COUNT).fold(Point::ORIGIN, |acc, i| acc + unit(i));
    assert!(sum.length() < 1e-6);
}

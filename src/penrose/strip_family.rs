use crate::basic::Point;
use crate::penrose::pent_angle::PentAngle;
use crate::penrose::Strip;

/// One of the five pencils of parallel strips, the lines of the family sit at
/// `offset + n` along `offset_direction()` for every integer `n`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StripFamily {
    pub angle: usize,
    pub offset: f64,
}

impl StripFamily {
    pub fn new(angle: usize, offset: f64) -> Self {
        Self { angle, offset }
    }

    pub fn strip(&self, multiple: i32) -> Strip {
        Strip::new(self.angle, multiple)
    }

    pub fn pent_angle(&self) -> &'static PentAngle {
        PentAngle::get(self.angle)
    }

    pub fn direction(&self) -> Point {
        self.pent_angle().unit()
    }

    pub fn offset_direction(&self) -> Point {
        self.direction().rotate_quarter_clockwise()
    }

    /// Position along `offset_direction()` measured in strip spacings, strips
    /// of this family sit exactly at the integers
    pub fn position_of(&self, point: Point) -> f64 {
        let offset_direction = self.offset_direction();
        point.dot(offset_direction) / offset_direction.square_length() - self.offset
    }
}

#[test]
fn test_offset_direction_is_perpendicular() {
    for angle in 0..5 {
        let family = StripFamily::new(angle, 0.3);
        let dot = family.direction().dot(family.offset_direction());
        assert!(dot.abs() < 1e-12);
    }
}

#[test]
fn test_strips_sit_at_integer_positions() {
    let family = StripFamily::new(2, 0.37);
    for multiple in [-3, 0, 1, 12] {
        let point = family.offset_direction() * (family.offset + multiple as f64);
        let along = point + family.direction() * 4.2;
        assert!((family.position_of(along) - multiple as f64).abs() < 1e-9);
    }
}

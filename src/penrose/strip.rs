use crate::basic::Point;
use crate::penrose::pent_angle::{angular_sin, FAMILY_COUNT};
use crate::penrose::{GeometryError, PenroseTiling, Rhombus, StripFamily};
use lyon_geom::Line;
use std::fmt::{Display, Formatter};

/// A single line of the pentagrid, identified by its family and its multiple
/// within that family
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Strip {
    pub family: usize,
    pub multiple: i32,
}

/// Where a walk along a strip starts
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Anchor {
    /// At the crossing with another strip, which is the first one produced
    Strip(Strip),
    /// At a signed distance from `Strip::point`
    Distance(f64),
}

pub(crate) fn other_families(family: usize) -> impl Iterator<Item = usize> {
    (0..FAMILY_COUNT).filter(move |&other| other != family)
}

impl Strip {
    pub fn new(family: usize, multiple: i32) -> Self {
        Self { family, multiple }
    }

    pub fn family(self, tiling: &PenroseTiling) -> &StripFamily {
        tiling.strip_family(self.family)
    }

    /// An arbitrary but fixed point on the strip, distances along the strip
    /// are measured from here
    pub fn point(self, tiling: &PenroseTiling) -> Point {
        let family = self.family(tiling);
        family.offset_direction() * (family.offset + self.multiple as f64)
    }

    pub fn line(self, tiling: &PenroseTiling) -> Line<f64> {
        Line {
            point: self.point(tiling).into(),
            vector: self.family(tiling).direction().into(),
        }
    }

    fn check_crosses(self, other: Self) -> Result<(), GeometryError> {
        if self.family == other.family {
            Err(GeometryError::ParallelStrips {
                family: self.family,
            })
        } else {
            Ok(())
        }
    }

    pub fn intersection_point(
        self,
        tiling: &PenroseTiling,
        other: Self,
    ) -> Result<Point, GeometryError> {
        self.check_crosses(other)?;
        self.line(tiling)
            .intersection(&other.line(tiling))
            .map(Point::from)
            .ok_or(GeometryError::ParallelStrips {
                family: self.family,
            })
    }

    /// Signed distance from `point()` to the crossing with `other`, measured
    /// along this strip's direction
    pub fn distance_to(self, tiling: &PenroseTiling, other: Self) -> Result<f64, GeometryError> {
        self.check_crosses(other)?;
        Ok(self.crossing_distance(tiling, other.family, other.multiple))
    }

    // caller guarantees family != self.family
    fn crossing_distance(self, tiling: &PenroseTiling, family: usize, multiple: i32) -> f64 {
        let other = tiling.strip_family(family);
        let offset_direction = other.offset_direction();
        let direction = self.family(tiling).direction();

        let line_position = (other.offset + multiple as f64) * offset_direction.square_length();
        (line_position - self.point(tiling).dot(offset_direction)) / direction.dot(offset_direction)
    }

    // distance between consecutive strips of `family` along this strip,
    // negative when higher multiples are crossed first
    fn crossing_spacing(self, tiling: &PenroseTiling, family: usize) -> f64 {
        let offset_direction = tiling.strip_family(family).offset_direction();
        let direction = self.family(tiling).direction();
        offset_direction.square_length() / direction.dot(offset_direction)
    }

    /// Multiple of the first strip of `family` crossed at or after `target`
    /// (at or before when walking backward)
    fn first_crossing(
        self,
        tiling: &PenroseTiling,
        family: usize,
        target: f64,
        forward: bool,
    ) -> i32 {
        let initial = self.crossing_distance(tiling, family, 0);
        let intervals = (target - initial) / self.crossing_spacing(tiling, family);

        // higher multiples lie further along the strip iff the sine is positive
        let ascending = angular_sin(family, self.family) > 0.;
        if forward == ascending {
            intervals.ceil() as i32
        } else {
            intervals.floor() as i32
        }
    }

    /// The first rhombus at or after `distance`
    pub fn rhombus_at(self, tiling: &PenroseTiling, distance: f64) -> Rhombus {
        self.walk_from(tiling, distance, true).advance()
    }

    pub fn rhombi(
        self,
        tiling: &PenroseTiling,
        anchor: Anchor,
        forward: bool,
    ) -> Result<RhombusWalk<'_>, GeometryError> {
        match anchor {
            Anchor::Strip(start) => {
                let distance = self.distance_to(tiling, start)?;
                Ok(RhombusWalk::new(tiling, self, Some(start), distance, forward))
            }
            Anchor::Distance(distance) => Ok(self.walk_from(tiling, distance, forward)),
        }
    }

    pub fn walk_from(
        self,
        tiling: &PenroseTiling,
        distance: f64,
        forward: bool,
    ) -> RhombusWalk<'_> {
        RhombusWalk::new(tiling, self, None, distance, forward)
    }
}

impl Display for Strip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Strip({}:{})", self.family, self.multiple)
    }
}

/// The rhombi along one strip in order of distance, produced lazily and
/// without end
///
/// For every other family the walk keeps the next strip of that family it
/// will cross. A walk can't be rewound, walking the same stretch again needs
/// a new walk.
#[derive(Clone, Debug)]
pub struct RhombusWalk<'a> {
    tiling: &'a PenroseTiling,
    strip: Strip,
    forward: bool,
    // indexed by family, the walked strip's own slot is unused
    distances: [f64; FAMILY_COUNT],
    multiples: [i32; FAMILY_COUNT],
}

impl<'a> RhombusWalk<'a> {
    fn new(
        tiling: &'a PenroseTiling,
        strip: Strip,
        start: Option<Strip>,
        target: f64,
        forward: bool,
    ) -> Self {
        let mut distances = [0.; FAMILY_COUNT];
        let mut multiples = [0; FAMILY_COUNT];
        multiples[strip.family] = strip.multiple;

        for family in other_families(strip.family) {
            let (multiple, distance) = match start {
                Some(start) if start.family == family => (start.multiple, target),
                _ => {
                    let multiple = strip.first_crossing(tiling, family, target, forward);
                    (multiple, strip.crossing_distance(tiling, family, multiple))
                }
            };
            multiples[family] = multiple;
            distances[family] = distance;
        }

        Self {
            tiling,
            strip,
            forward,
            distances,
            multiples,
        }
    }

    fn is_ahead(&self, a: f64, b: f64) -> bool {
        if self.forward {
            a < b
        } else {
            a > b
        }
    }

    // for a sine between two families, whether it points against the walk
    fn against_walk(&self, sin: f64) -> bool {
        if self.forward {
            sin < 0.
        } else {
            sin > 0.
        }
    }

    fn closest_family(&self) -> usize {
        let mut closest = (self.strip.family + 1) % FAMILY_COUNT;
        for family in other_families(self.strip.family) {
            if self.is_ahead(self.distances[family], self.distances[closest]) {
                closest = family;
            }
        }
        closest
    }

    /// Distance of the crossing the next rhombus sits on
    pub fn upcoming_distance(&self) -> f64 {
        self.distances[self.closest_family()]
    }

    pub(crate) fn advance(&mut self) -> Rhombus {
        let own = self.strip.family;
        let closest = self.closest_family();

        let mut lattice = [0; FAMILY_COUNT];
        for family in 0..FAMILY_COUNT {
            lattice[family] = if family == own {
                self.strip.multiple
            } else if family == closest {
                self.multiples[family]
            } else if self.against_walk(angular_sin(own, family)) {
                // the strip ahead of us has the higher multiple, we're below it
                self.multiples[family] - 1
            } else {
                self.multiples[family]
            };
        }

        let crossed = Strip::new(closest, self.multiples[closest]);

        if self.against_walk(angular_sin(closest, own)) {
            self.multiples[closest] -= 1;
        } else {
            self.multiples[closest] += 1;
        }
        self.distances[closest] =
            self.strip
                .crossing_distance(self.tiling, closest, self.multiples[closest]);

        Rhombus::from_walk(self.strip, crossed, lattice)
    }
}

impl Iterator for RhombusWalk<'_> {
    type Item = Rhombus;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }
}

#[cfg(test)]
fn distance_of(tiling: &PenroseTiling, rhombus: &Rhombus) -> f64 {
    rhombus
        .strip1()
        .distance_to(tiling, rhombus.strip2())
        .expect("rhombus strips cross")
}

#[test]
fn test_forward_walk_from_second_strip() {
    let tiling = PenroseTiling::from_seed(0);
    let strip = tiling.strip_family(0).strip(4);
    let rhombus = strip.rhombus_at(&tiling, 4.);

    let first = strip
        .rhombi(&tiling, Anchor::Strip(rhombus.strip2()), true)
        .expect("strips of different families")
        .next()
        .expect("walks never end");
    assert_eq!(first, rhombus);
    assert_eq!(first.lattice(), rhombus.lattice());
}

#[test]
fn test_backward_walk_from_second_strip() {
    let tiling = PenroseTiling::from_seed(7);
    let strip = tiling.strip_family(3).strip(-2);
    let rhombus = strip.rhombus_at(&tiling, 1.5);

    let mut backward = strip
        .rhombi(&tiling, Anchor::Strip(rhombus.strip2()), false)
        .expect("strips of different families");
    let first = backward.next().expect("walks never end");
    assert_eq!(first, rhombus);
    assert_eq!(first.lattice(), rhombus.lattice());
}

#[test]
fn test_walk_distances_are_monotonic() {
    let tiling = PenroseTiling::from_seed(3);
    let strip = tiling.strip_family(1).strip(2);

    for forward in [true, false] {
        let distances: Vec<f64> = strip
            .walk_from(&tiling, 0., forward)
            .take(40)
            .map(|rhombus| distance_of(&tiling, &rhombus))
            .collect();

        for pair in distances.windows(2) {
            if forward {
                assert!(pair[0] < pair[1], "{pair:?}");
            } else {
                assert!(pair[0] > pair[1], "{pair:?}");
            }
        }

        if forward {
            assert!(distances[0] >= 0.);
        } else {
            assert!(distances[0] <= 0.);
        }
    }
}

#[test]
fn test_forward_and_backward_walks_meet() {
    let tiling = PenroseTiling::from_seed(11);
    let strip = tiling.strip_family(4).strip(0);

    // walking backward from far ahead passes the same rhombi in reverse
    let forward: Vec<Rhombus> = strip.walk_from(&tiling, -3., true).take(12).collect();
    // nudged past the last crossing so rounding can't drop it
    let end = distance_of(&tiling, &forward[11]) + 1e-6;
    let mut backward: Vec<Rhombus> = strip.walk_from(&tiling, end, false).take(12).collect();
    backward.reverse();

    assert_eq!(forward, backward);
    for (a, b) in forward.iter().zip(&backward) {
        assert_eq!(a.lattice(), b.lattice());
    }
}

#[test]
fn test_upcoming_distance() {
    let tiling = PenroseTiling::from_seed(5);
    let mut walk = tiling.strip_family(2).strip(1).walk_from(&tiling, 0., true);
    for _ in 0..10 {
        let upcoming = walk.upcoming_distance();
        let rhombus = walk.next().expect("walks never end");
        assert!((distance_of(&tiling, &rhombus) - upcoming).abs() < 1e-9);
    }
}

#[test]
fn test_intersection_point() {
    let tiling = PenroseTiling::from_seed(1);
    let a = Strip::new(0, 3);
    let b = Strip::new(2, -1);

    let crossing = a.intersection_point(&tiling, b).expect("not parallel");
    let distance = a.distance_to(&tiling, b).expect("not parallel");
    let along = a.point(&tiling) + a.family(&tiling).direction() * distance;
    assert!((along - crossing).length() < 1e-9);

    // the crossing lies on both lines
    assert!((tiling.strip_family(0).position_of(crossing) - 3.).abs() < 1e-9);
    assert!((tiling.strip_family(2).position_of(crossing) + 1.).abs() < 1e-9);
}

#[test]
fn test_parallel_strips() {
    let tiling = PenroseTiling::from_seed(1);
    let a = Strip::new(3, 0);
    let b = Strip::new(3, 5);

    assert_eq!(
        a.intersection_point(&tiling, b),
        Err(GeometryError::ParallelStrips { family: 3 })
    );
    assert!(a.distance_to(&tiling, b).is_err());
    assert!(a.rhombi(&tiling, Anchor::Strip(b), true).is_err());
}

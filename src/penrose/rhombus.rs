use crate::basic::{polygon, Point, AREA_TOLERANCE};
use crate::penrose::pent_angle::{PentAngle, FAMILY_COUNT};
use crate::penrose::{BoundingBox, GeometryError, Strip};
use itertools::Itertools;
use num_integer::Integer;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RhombusType {
    /// 36 and 144 degree corners
    Thin,
    /// 72 and 108 degree corners
    Thick,
}

impl RhombusType {
    /// The type of the rhombus formed by strips of the two families
    pub fn between(family1: usize, family2: usize) -> Result<Self, GeometryError> {
        let difference = (family1 as i32 - family2 as i32).mod_floor(&(FAMILY_COUNT as i32));
        match difference {
            1 | 4 => Ok(Self::Thick),
            2 | 3 => Ok(Self::Thin),
            _ => Err(GeometryError::ParallelStrips { family: family1 }),
        }
    }

    /// The smaller interior angle in radians
    pub fn acute_angle(self) -> f64 {
        match self {
            Self::Thin => 36_f64.to_radians(),
            Self::Thick => 72_f64.to_radians(),
        }
    }

    /// Area of a rhombus of this type with sides of length 1
    pub fn unit_area(self) -> f64 {
        self.acute_angle().sin()
    }
}

// applied to the lattice components of (strip1, strip2), in boundary order
const VERTEX_OFFSETS: [(i32, i32); 4] = [(0, 0), (0, -1), (-1, -1), (-1, 0)];

/// The tile dual to the crossing of two strips
///
/// Two rhombi are the same rhombus when they're built from the same pair of
/// strips, the lattice coordinates follow from the strips and aren't compared
#[derive(Copy, Clone, Debug)]
pub struct Rhombus {
    strip1: Strip,
    strip2: Strip,
    lattice: [i32; FAMILY_COUNT],
}

impl Rhombus {
    pub fn new(
        strip1: Strip,
        strip2: Strip,
        lattice: [i32; FAMILY_COUNT],
    ) -> Result<Self, GeometryError> {
        if let Some(strip) = [strip1, strip2]
            .into_iter()
            .find(|strip| strip.family >= FAMILY_COUNT)
        {
            return Err(GeometryError::UnknownFamily {
                family: strip.family,
            });
        }
        if strip1.family == strip2.family {
            return Err(GeometryError::ParallelStrips {
                family: strip1.family,
            });
        }
        Ok(Self::from_walk(strip1, strip2, lattice))
    }

    // the walk only ever pairs strips of different families
    pub(crate) fn from_walk(strip1: Strip, strip2: Strip, lattice: [i32; FAMILY_COUNT]) -> Self {
        Self {
            strip1,
            strip2,
            lattice,
        }
    }

    pub fn strip1(&self) -> Strip {
        self.strip1
    }

    pub fn strip2(&self) -> Strip {
        self.strip2
    }

    pub fn lattice(&self) -> [i32; FAMILY_COUNT] {
        self.lattice
    }

    pub fn lower_strip(&self) -> Strip {
        if self.strip1.family < self.strip2.family {
            self.strip1
        } else {
            self.strip2
        }
    }

    pub fn upper_strip(&self) -> Strip {
        if self.strip1.family < self.strip2.family {
            self.strip2
        } else {
            self.strip1
        }
    }

    pub fn rhombus_type(&self) -> RhombusType {
        match (self.strip1.family as i32 - self.strip2.family as i32).abs() {
            1 | 4 => RhombusType::Thick,
            _ => RhombusType::Thin,
        }
    }

    /// Projects a lattice coordinate into the plane of the tiling
    pub fn lattice_point(coords: &[i32; FAMILY_COUNT]) -> Point {
        let (x, y) = coords
            .iter()
            .enumerate()
            .fold((0., 0.), |(x, y), (family, &n)| {
                let angle = PentAngle::get(family);
                (x + n as f64 * angle.cos, y - n as f64 * angle.sin)
            });
        Point::new(x, y).precise()
    }

    /// The four corners in order around the boundary
    pub fn vertices(&self) -> [Point; 4] {
        VERTEX_OFFSETS.map(|(offset1, offset2)| {
            let mut coords = self.lattice;
            coords[self.strip1.family] += offset1;
            coords[self.strip2.family] += offset2;
            Self::lattice_point(&coords)
        })
    }

    /// The boundary edges, each going from the previous vertex to the next
    pub fn edges(&self) -> [(Point, Point); 4] {
        let vertices = self.vertices();
        [0, 1, 2, 3].map(|i| (vertices[(i + 3) % 4], vertices[i]))
    }

    pub fn center(&self) -> Point {
        let sum = self
            .vertices()
            .into_iter()
            .fold(Point::ORIGIN, |sum, vertex| sum + vertex);
        (sum / 4.).precise()
    }

    pub fn area(&self) -> f64 {
        polygon::area(&self.vertices())
    }

    pub fn overlap_area(&self, bounding_box: &BoundingBox) -> f64 {
        polygon::overlap_area(&self.vertices(), &bounding_box.rect())
    }

    /// The box of the grid that holds the largest part of this rhombus
    ///
    /// Only the boxes containing a vertex are considered. Boxes whose overlaps
    /// differ by less than `AREA_TOLERANCE` tie, ties go to the box with the
    /// lower x and then the lower y.
    pub fn containing_bounding_box(
        &self,
        grid_origin: Point,
        grid_size: Point,
    ) -> Result<BoundingBox, GeometryError> {
        let vertices = self.vertices();
        let cells = |coordinate: fn(Point) -> f64| {
            vertices
                .iter()
                .map(|&vertex| {
                    ((coordinate(vertex) - coordinate(grid_origin)) / coordinate(grid_size)).floor()
                        as i32
                })
                .unique()
                .collect::<Vec<_>>()
        };
        let xs = cells(|p| p.x);
        let ys = cells(|p| p.y);

        let mut best: Option<(BoundingBox, f64)> = None;
        for (x, y) in xs.into_iter().cartesian_product(ys) {
            let candidate = BoundingBox::new(grid_origin, grid_size, x, y);
            let area = self.overlap_area(&candidate);
            if area <= 0. {
                continue;
            }

            let better = match &best {
                None => true,
                Some((best_box, best_area)) => {
                    area > best_area + AREA_TOLERANCE
                        || ((area - best_area).abs() <= AREA_TOLERANCE
                            && candidate.cmp_position(best_box) == Ordering::Less)
                }
            };
            if better {
                best = Some((candidate, area));
            }
        }

        best.map(|(bounding_box, _)| bounding_box)
            .ok_or(GeometryError::NoContainingBox { rhombus: *self })
    }
}

impl PartialEq for Rhombus {
    fn eq(&self, other: &Self) -> bool {
        self.lower_strip() == other.lower_strip() && self.upper_strip() == other.upper_strip()
    }
}

impl Eq for Rhombus {}

impl Hash for Rhombus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower_strip().hash(state);
        self.upper_strip().hash(state);
    }
}

impl Display for Rhombus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rhombus({}, {})", self.strip1, self.strip2)
    }
}

#[cfg(test)]
use crate::penrose::PenroseTiling;

#[cfg(test)]
fn sample_rhombi() -> Vec<Rhombus> {
    let tiling = PenroseTiling::from_seed(9);
    (0..FAMILY_COUNT)
        .flat_map(|family| {
            tiling
                .strip_family(family)
                .strip(1)
                .walk_from(&tiling, -4., true)
                .take(25)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_rhombus_type_by_family_pair() {
    use RhombusType::*;

    for (a, b, expected) in [
        (0, 1, Thick),
        (1, 0, Thick),
        (0, 4, Thick),
        (3, 4, Thick),
        (0, 2, Thin),
        (3, 0, Thin),
        (1, 4, Thin),
        (2, 4, Thin),
    ] {
        assert_eq!(RhombusType::between(a, b), Ok(expected), "{a}, {b}");

        // multiples and lattice coordinates don't matter
        for (m1, m2, lattice) in [(0, 0, [0; 5]), (-7, 3, [2, -1, 5, 0, 9])] {
            let rhombus = Rhombus::new(Strip::new(a, m1), Strip::new(b, m2), lattice)
                .expect("different families");
            assert_eq!(rhombus.rhombus_type(), expected);
        }
    }

    assert!(RhombusType::between(2, 2).is_err());
}

#[test]
fn test_same_family_is_degenerate() {
    assert_eq!(
        Rhombus::new(Strip::new(2, 1), Strip::new(2, 3), [0; 5]).err(),
        Some(GeometryError::ParallelStrips { family: 2 })
    );
}

#[test]
fn test_unknown_family_is_rejected() {
    assert_eq!(
        Rhombus::new(Strip::new(0, 0), Strip::new(7, 0), [0; 5]).err(),
        Some(GeometryError::UnknownFamily { family: 7 })
    );
    assert_eq!(
        Rhombus::new(Strip::new(5, 0), Strip::new(5, 1), [0; 5]).err(),
        Some(GeometryError::UnknownFamily { family: 5 })
    );
    assert!(Rhombus::new(Strip::new(4, 0), Strip::new(0, 0), [0; 5]).is_ok());
}

#[test]
fn test_equality_ignores_strip_order_and_lattice() {
    let s1 = Strip::new(1, 4);
    let s2 = Strip::new(3, -2);
    let a = Rhombus::new(s1, s2, [1, 4, 0, -2, 0]).expect("different families");
    let b = Rhombus::new(s2, s1, [1, 4, 0, -2, 0]).expect("different families");
    let c = Rhombus::new(s1, s2, [9, 9, 9, 9, 9]).expect("different families");
    let d = Rhombus::new(s1, Strip::new(3, -1), [1, 4, 0, -2, 0]).expect("different families");

    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_ne!(a, d);
    assert_eq!(a.lower_strip(), s1);
    assert_eq!(b.upper_strip(), s2);

    let set: std::collections::HashSet<Rhombus> = [a, b, c, d].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_vertices_form_rhombi() {
    let rhombi = sample_rhombi();
    assert!(rhombi.iter().any(|r| r.rhombus_type() == RhombusType::Thin));
    assert!(rhombi.iter().any(|r| r.rhombus_type() == RhombusType::Thick));

    for rhombus in rhombi {
        let vertices = rhombus.vertices();
        assert!(polygon::is_strictly_convex(&vertices), "{rhombus}");

        for (start, end) in rhombus.edges() {
            assert!(((end - start).length() - 1.).abs() < 1e-6, "{rhombus}");
        }

        let expected = rhombus.rhombus_type().unit_area();
        assert!((rhombus.area() - expected).abs() < 1e-6, "{rhombus}");
    }
}

#[test]
fn test_thin_to_thick_area_ratio() {
    let thick = Rhombus::new(Strip::new(0, 0), Strip::new(1, 0), [0; 5])
        .expect("different families");
    let thin = Rhombus::new(Strip::new(0, 0), Strip::new(2, 0), [0; 5])
        .expect("different families");

    let ratio = thin.area() / thick.area();
    let expected = 36_f64.to_radians().sin() / 72_f64.to_radians().sin();
    assert!((ratio - expected).abs() < 1e-6, "{ratio} vs {expected}");
}

#[test]
fn test_adjacent_rhombi_share_an_edge() {
    use std::collections::HashSet;

    let tiling = PenroseTiling::from_seed(2);
    let rhombi: Vec<Rhombus> = tiling
        .strip_family(0)
        .strip(0)
        .walk_from(&tiling, 0., true)
        .take(10)
        .collect();

    for pair in rhombi.windows(2) {
        // the shared edge is computed once from each rhombus
        let first: HashSet<Point> = pair[0].vertices().into_iter().collect();
        let shared = pair[1]
            .vertices()
            .into_iter()
            .filter(|vertex| first.contains(vertex))
            .count();
        assert_eq!(shared, 2, "{} / {}", pair[0], pair[1]);
    }
}

#[test]
fn test_containing_bounding_box_tie_break() {
    let rhombus = Rhombus::new(Strip::new(0, 0), Strip::new(1, 0), [0; 5])
        .expect("different families");
    let center = rhombus.center();

    // the vertical grid line through the center halves the rhombus
    let grid_origin = Point::new(center.x, center.y - 50.);
    let grid_size = Point::new(10., 100.);

    let left = BoundingBox::new(grid_origin, grid_size, -1, 0);
    let right = BoundingBox::new(grid_origin, grid_size, 0, 0);
    let difference = rhombus.overlap_area(&left) - rhombus.overlap_area(&right);
    assert!(difference.abs() <= AREA_TOLERANCE);

    let chosen = rhombus
        .containing_bounding_box(grid_origin, grid_size)
        .expect("the rhombus overlaps the grid");
    assert_eq!(chosen, left);
}

#[test]
fn test_containing_bounding_box_prefers_larger_overlap() {
    let rhombus = Rhombus::new(Strip::new(0, 0), Strip::new(2, 0), [0; 5])
        .expect("different families");
    let center = rhombus.center();

    // the grid line sits a little right of the center, most of the rhombus is left of it
    let grid_origin = Point::new(center.x + 0.1, center.y - 50.);
    let grid_size = Point::new(10., 100.);

    let chosen = rhombus
        .containing_bounding_box(grid_origin, grid_size)
        .expect("the rhombus overlaps the grid");
    assert_eq!(chosen, BoundingBox::new(grid_origin, grid_size, -1, 0));

    let grid_origin = Point::new(center.x - 0.1, center.y - 50.);
    let chosen = rhombus
        .containing_bounding_box(grid_origin, grid_size)
        .expect("the rhombus overlaps the grid");
    assert_eq!(chosen, BoundingBox::new(grid_origin, grid_size, 0, 0));
}

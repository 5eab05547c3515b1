use crate::basic::{Point, PRECISION_STEP};
use crate::error::Result;
use crate::penrose::pent_angle::FAMILY_COUNT;
use crate::penrose::{BoundingBox, GeometryError, Rhombus, Strip, StripFamily};
use itertools::Itertools;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use static_assertions::assert_impl_all;
use std::collections::HashSet;

/// Scale of the map from the pentagrid onto the tiling
const DUAL_SCALE: f64 = FAMILY_COUNT as f64 / 2.;

/// How far (in the tiling) a rhombus can lie from the image of its crossing,
/// each of the five lattice coordinates is off by less than one
const DUAL_MARGIN: f64 = 6.;

/// Overlaps smaller than this are rounding noise from rhombi that only touch
/// the box
const MIN_OVERLAP_AREA: f64 = PRECISION_STEP * PRECISION_STEP;

/// Receives the rhombi of a tiling one at a time
pub trait RhombusVisitor {
    fn visit_rhombus(&mut self, rhombus: &Rhombus) -> Result;
}

impl<F: FnMut(&Rhombus) -> Result> RhombusVisitor for F {
    fn visit_rhombus(&mut self, rhombus: &Rhombus) -> Result {
        self(rhombus)
    }
}

/// A Penrose tiling given by the offsets of its five strip families
#[derive(Clone, Debug)]
pub struct PenroseTiling {
    families: [StripFamily; FAMILY_COUNT],
}

// boxes can be enumerated from several threads at once
assert_impl_all!(PenroseTiling: Send, Sync);

fn span(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(value), high.max(value))
        })
}

impl PenroseTiling {
    /// Draws one offset per family, uniform in [0, 1), in family order
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut offsets = [0.; FAMILY_COUNT];
        for offset in &mut offsets {
            *offset = rng.gen::<f64>();
        }
        Self::from_offsets(offsets)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    pub fn with_offsets(offsets: [f64; FAMILY_COUNT]) -> Result<Self, GeometryError> {
        if let Some((family, &offset)) = offsets
            .iter()
            .enumerate()
            .find(|(_, offset)| !offset.is_finite())
        {
            return Err(GeometryError::InvalidOffset { family, offset });
        }
        Ok(Self::from_offsets(offsets))
    }

    // offsets are accepted as they are, a sum close to an integer is only
    // reported
    fn from_offsets(offsets: [f64; FAMILY_COUNT]) -> Self {
        let sum: f64 = offsets.iter().sum();
        if (sum - sum.round()).abs() < PRECISION_STEP {
            warn!("strip family offsets sum to {sum}, the pentagrid may not be generic");
        }
        debug!("strip family offsets: {offsets:?}");

        Self {
            families: std::array::from_fn(|angle| StripFamily::new(angle, offsets[angle])),
        }
    }

    pub fn strip_family(&self, angle: usize) -> &StripFamily {
        &self.families[angle]
    }

    pub fn offsets(&self) -> [f64; FAMILY_COUNT] {
        self.families.map(|family| family.offset)
    }

    fn dual_shift(&self) -> Point {
        self.families
            .iter()
            .fold(Point::ORIGIN, |shift, family| {
                shift + family.offset_direction() * family.offset
            })
    }

    /// Roughly where the rhombus of a crossing at `point` ends up
    pub fn to_tiling_space(&self, point: Point) -> Point {
        point * DUAL_SCALE - self.dual_shift()
    }

    pub fn to_pentagrid_space(&self, point: Point) -> Point {
        (point + self.dual_shift()) / DUAL_SCALE
    }

    // corners of the part of the pentagrid whose crossings can produce a
    // rhombus overlapping the box
    fn pentagrid_region(&self, bounding_box: &BoundingBox) -> [Point; 4] {
        let (low, high) = bounding_box.expanded(DUAL_MARGIN);
        [
            low,
            Point::new(low.x, high.y),
            high,
            Point::new(high.x, low.y),
        ]
        .map(|corner| self.to_pentagrid_space(corner))
    }

    /// Strips of `family` passing through `region`, each with the range of
    /// distances along it that lies inside
    fn strips_crossing<'a>(
        &'a self,
        family: &'a StripFamily,
        region: &'a [Point; 4],
    ) -> impl Iterator<Item = (Strip, f64, f64)> + 'a {
        let (low, high) = span(region.iter().map(|&corner| family.position_of(corner)));

        (low.ceil() as i32..=high.floor() as i32).map(move |multiple| {
            let strip = family.strip(multiple);
            let start = strip.point(self);
            let direction = family.direction();
            let (near, far) = span(
                region
                    .iter()
                    .map(|&corner| (corner - start).dot(direction) / direction.square_length()),
            );
            (strip, near, far)
        })
    }

    // every rhombus overlapping the box once, in the order the walks find them
    fn overlapping_rhombi(&self, bounding_box: &BoundingBox) -> Vec<Rhombus> {
        let region = self.pentagrid_region(bounding_box);

        let mut seen = HashSet::new();
        let mut rhombi = vec![];
        let mut strip_count = 0;

        for family in &self.families {
            for (strip, near, far) in self.strips_crossing(family, &region) {
                strip_count += 1;
                trace!("walking {strip} from {near} to {far}");

                let mut walk = strip.walk_from(self, near, true);
                while walk.upcoming_distance() <= far {
                    let rhombus = walk.advance();
                    if rhombus.overlap_area(bounding_box) > MIN_OVERLAP_AREA
                        && seen.insert(rhombus)
                    {
                        rhombi.push(rhombus);
                    }
                }
            }
        }

        debug!(
            "box ({}, {}): walked {strip_count} strips, found {} rhombi",
            bounding_box.x_multiple,
            bounding_box.y_multiple,
            rhombi.len(),
        );
        rhombi
    }

    /// Every rhombus that overlaps the box, sorted by its strips
    pub fn rhombi_in(&self, bounding_box: &BoundingBox) -> Vec<Rhombus> {
        self.overlapping_rhombi(bounding_box)
            .into_iter()
            .sorted_by_key(|rhombus| (rhombus.lower_strip(), rhombus.upper_strip()))
            .collect()
    }

    /// The rhombi whose containing box (in the grid of `bounding_box`) is
    /// `bounding_box`, over a whole grid every rhombus is owned by exactly
    /// one box
    pub fn owned_rhombi_in(
        &self,
        bounding_box: &BoundingBox,
    ) -> Result<Vec<Rhombus>, GeometryError> {
        let mut owned = vec![];
        for rhombus in self.rhombi_in(bounding_box) {
            let container =
                rhombus.containing_bounding_box(bounding_box.grid_origin, bounding_box.grid_size)?;
            if container == *bounding_box {
                owned.push(rhombus);
            }
        }
        Ok(owned)
    }

    /// Calls the visitor once for every rhombus overlapping the box, a rhombus
    /// straddling several boxes is visited again for each of them
    pub fn visit_rhombii<V: RhombusVisitor + ?Sized>(
        &self,
        bounding_box: &BoundingBox,
        visitor: &mut V,
    ) -> Result {
        for rhombus in self.rhombi_in(bounding_box) {
            visitor.visit_rhombus(&rhombus)?;
        }
        Ok(())
    }

    /// Like `visit_rhombii` but only for the rhombi owned by the box
    pub fn visit_owned_rhombii<V: RhombusVisitor + ?Sized>(
        &self,
        bounding_box: &BoundingBox,
        visitor: &mut V,
    ) -> Result {
        for rhombus in self.owned_rhombi_in(bounding_box)? {
            visitor.visit_rhombus(&rhombus)?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn unit_grid_box(size: f64, x: i32, y: i32) -> BoundingBox {
    BoundingBox::new(Point::new(-size, -size / 2.), Point::new(size, size), x, y)
}

#[test]
fn test_same_seed_same_tiling() {
    let bounding_box = unit_grid_box(6., 0, 0);

    let a: HashSet<Rhombus> = PenroseTiling::from_seed(42)
        .rhombi_in(&bounding_box)
        .into_iter()
        .collect();
    let b: HashSet<Rhombus> = PenroseTiling::from_seed(42)
        .rhombi_in(&bounding_box)
        .into_iter()
        .collect();
    assert!(!a.is_empty());
    assert_eq!(a, b);

    let c: HashSet<Rhombus> = PenroseTiling::from_seed(43)
        .rhombi_in(&bounding_box)
        .into_iter()
        .collect();
    assert_ne!(a, c);
}

#[test]
fn test_from_seed_draws_offsets_in_order() {
    let mut rng = StdRng::seed_from_u64(17);
    let expected: Vec<f64> = (0..FAMILY_COUNT).map(|_| rng.gen::<f64>()).collect();
    assert_eq!(PenroseTiling::from_seed(17).offsets().to_vec(), expected);
}

#[test]
fn test_rhombi_cover_the_box_exactly() {
    // the tiling has no gaps and no overlaps, so the clipped areas add up to
    // the area of the box
    for seed in [0, 1, 2] {
        let tiling = PenroseTiling::from_seed(seed);
        for (x, y) in [(0, 0), (1, -1), (-3, 2)] {
            let bounding_box = unit_grid_box(5., x, y);
            let rhombi = tiling.rhombi_in(&bounding_box);
            let covered: f64 = rhombi
                .iter()
                .map(|rhombus| rhombus.overlap_area(&bounding_box))
                .sum();
            assert!(
                (covered - bounding_box.area()).abs() < 1e-6,
                "seed {seed}, box ({x}, {y}): {covered}"
            );
        }
    }
}

#[test]
fn test_visit_rhombii_emits_each_overlapping_rhombus_once() {
    let tiling = PenroseTiling::from_seed(8);
    let bounding_box = unit_grid_box(4., 2, 3);

    let mut visited = vec![];
    tiling
        .visit_rhombii(&bounding_box, &mut |rhombus: &Rhombus| -> Result {
            visited.push(*rhombus);
            Ok(())
        })
        .expect("collecting can't fail");

    let unique: HashSet<Rhombus> = visited.iter().copied().collect();
    assert_eq!(unique.len(), visited.len());
    assert!(visited
        .iter()
        .all(|rhombus| rhombus.overlap_area(&bounding_box) > 0.));
}

#[test]
fn test_owned_rhombi_partition_the_grid() {
    let tiling = PenroseTiling::from_seed(4);
    let boxes: Vec<BoundingBox> = (0..2)
        .cartesian_product(0..2)
        .map(|(x, y)| unit_grid_box(4., x, y))
        .collect();

    let mut owners = std::collections::HashMap::new();
    for bounding_box in &boxes {
        let owned = tiling
            .owned_rhombi_in(bounding_box)
            .expect("every rhombus has a container");
        for rhombus in owned {
            assert!(
                owners.insert(rhombus, *bounding_box).is_none(),
                "{rhombus} owned twice"
            );
        }
    }

    // rhombi inside the grid are owned by the box that holds most of them
    for bounding_box in &boxes {
        for rhombus in tiling.rhombi_in(bounding_box) {
            let container = rhombus
                .containing_bounding_box(bounding_box.grid_origin, bounding_box.grid_size)
                .expect("rhombus overlaps the grid");
            if boxes.contains(&container) {
                assert_eq!(owners.get(&rhombus), Some(&container));
            }
        }
    }
}

#[test]
fn test_visit_owned_rhombii_matches_owned_rhombi_in() {
    let tiling = PenroseTiling::from_seed(6);

    for (x, y) in (-1..2).cartesian_product(-1..2) {
        let bounding_box = unit_grid_box(3., x, y);
        let mut visited = vec![];
        tiling
            .visit_owned_rhombii(&bounding_box, &mut |rhombus: &Rhombus| -> Result {
                visited.push(*rhombus);
                Ok(())
            })
            .expect("collecting can't fail");

        let owned = tiling
            .owned_rhombi_in(&bounding_box)
            .expect("every rhombus has a container");
        assert_eq!(visited, owned);
        assert!(visited.len() <= tiling.rhombi_in(&bounding_box).len());
    }
}

#[test]
fn test_with_offsets() {
    let tiling = PenroseTiling::with_offsets([0.1, 0.2, 0.3, 0.4, 0.45]).expect("finite offsets");
    assert_eq!(tiling.strip_family(3).offset, 0.4);
    assert_eq!(tiling.strip_family(3).angle, 3);

    assert!(matches!(
        PenroseTiling::with_offsets([0.1, f64::NAN, 0.3, 0.4, 0.5]),
        Err(GeometryError::InvalidOffset { family: 1, .. })
    ));
    assert!(matches!(
        PenroseTiling::with_offsets([0.1, 0.2, f64::INFINITY, 0.4, 0.5]),
        Err(GeometryError::InvalidOffset { family: 2, .. })
    ));
}

#[test]
fn test_dual_map_round_trip() {
    let tiling = PenroseTiling::from_seed(6);
    let point = Point::new(3.5, -1.25);
    let back = tiling.to_pentagrid_space(tiling.to_tiling_space(point));
    assert!((back - point).length() < 1e-12);
}

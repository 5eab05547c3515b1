use crate::basic::Point;
use lyon_geom::euclid::default::Box2D;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// The box at (`x_multiple`, `y_multiple`) in a grid of equally sized boxes
/// starting at `grid_origin`
#[derive(Copy, Clone, Debug)]
pub struct BoundingBox {
    pub grid_origin: Point,
    pub grid_size: Point,
    pub x_multiple: i32,
    pub y_multiple: i32,

    pub origin: Point,
    pub extent: Point,
}

impl BoundingBox {
    pub fn new(grid_origin: Point, grid_size: Point, x_multiple: i32, y_multiple: i32) -> Self {
        let origin =
            grid_origin + grid_size.scale(Point::new(x_multiple as f64, y_multiple as f64));
        Self {
            grid_origin,
            grid_size,
            x_multiple,
            y_multiple,
            origin,
            extent: origin + grid_size,
        }
    }

    /// The rectangle as a polygon
    pub fn corners(&self) -> [Point; 4] {
        let Self { origin, extent, .. } = *self;
        [
            origin,
            Point::new(origin.x, extent.y),
            extent,
            Point::new(extent.x, origin.y),
        ]
    }

    pub fn rect(&self) -> Box2D<f64> {
        Box2D::new(self.origin.into(), self.extent.into())
    }

    pub fn area(&self) -> f64 {
        (self.extent.x - self.origin.x) * (self.extent.y - self.origin.y)
    }

    /// Same box with a margin added on every side
    pub fn expanded(&self, margin: f64) -> (Point, Point) {
        let margin = Point::new(margin, margin);
        (self.origin - margin, self.extent + margin)
    }

    /// Orders by the x and then the y of the origin, used to break ties
    /// between boxes deterministically
    pub fn cmp_position(&self, other: &Self) -> Ordering {
        self.origin
            .x
            .total_cmp(&other.origin.x)
            .then_with(|| self.origin.y.total_cmp(&other.origin.y))
    }
}

impl PartialEq for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        self.grid_origin == other.grid_origin
            && self.grid_size == other.grid_size
            && self.x_multiple == other.x_multiple
            && self.y_multiple == other.y_multiple
    }
}

impl Eq for BoundingBox {}

impl Hash for BoundingBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grid_origin.hash(state);
        self.grid_size.hash(state);
        self.x_multiple.hash(state);
        self.y_multiple.hash(state);
    }
}

#[test]
fn test_origin_and_extent() {
    let grid_origin = Point::new(-5., 2.);
    let grid_size = Point::new(10., 4.);
    let bounding_box = BoundingBox::new(grid_origin, grid_size, 2, -1);

    assert_eq!(bounding_box.origin, Point::new(15., -2.));
    assert_eq!(bounding_box.extent, Point::new(25., 2.));
    assert_eq!(bounding_box.area(), 40.);
    assert_eq!(
        bounding_box.corners(),
        [
            Point::new(15., -2.),
            Point::new(15., 2.),
            Point::new(25., 2.),
            Point::new(25., -2.),
        ]
    );
}

#[test]
fn test_equality_and_order() {
    use std::collections::HashSet;

    let grid_size = Point::new(1., 1.);
    let a = BoundingBox::new(Point::ORIGIN, grid_size, 0, 1);
    let b = BoundingBox::new(Point::new(0.1 + 0.2 - 0.3, 0.), grid_size, 0, 1);
    let c = BoundingBox::new(Point::ORIGIN, grid_size, 1, 0);
    let d = BoundingBox::new(Point::ORIGIN, grid_size, 0, 0);

    assert_eq!(a, b);
    assert_ne!(a, c);

    let set: HashSet<BoundingBox> = [a, b, c, d].into_iter().collect();
    assert_eq!(set.len(), 3);

    assert_eq!(d.cmp_position(&a), Ordering::Less);
    assert_eq!(a.cmp_position(&c), Ordering::Less);
    assert_eq!(c.cmp_position(&d), Ordering::Greater);
    assert_eq!(a.cmp_position(&a), Ordering::Equal);
}

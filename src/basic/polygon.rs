//! Area and clipping for the only shapes the tiling produces, convex polygons
//! (rhombi) against axis-aligned boxes

use crate::basic::Point;
use lyon_geom::euclid::default::Box2D;

/// Positive for counterclockwise (y up) vertex order
pub fn signed_area(polygon: &[Point]) -> f64 {
    let Some(&last) = polygon.last() else {
        return 0.;
    };
    let mut previous = last;
    let mut twice_area = 0.;
    for &vertex in polygon {
        twice_area += previous.cross(vertex);
        previous = vertex;
    }
    twice_area / 2.
}

pub fn area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// True if every turn along the boundary goes the same way and no edge is
/// degenerate
pub fn is_strictly_convex(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let turns = (0..n).map(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = polygon[(i + 2) % n];
        (b - a).cross(c - b)
    });

    let mut sign = 0.;
    for turn in turns {
        if turn == 0. || turn.signum() * sign < 0. {
            return false;
        }
        sign = turn.signum();
    }
    true
}

// one Sutherland-Hodgman pass against a single boundary
fn clip_against(
    input: &[Point],
    inside: impl Fn(Point) -> bool,
    crossing: impl Fn(Point, Point) -> Point,
) -> Vec<Point> {
    let mut output = Vec::with_capacity(input.len() + 1);
    let Some(&last) = input.last() else {
        return output;
    };

    let mut previous = last;
    for &current in input {
        match (inside(previous), inside(current)) {
            (true, true) => output.push(current),
            (true, false) => output.push(crossing(previous, current)),
            (false, true) => {
                output.push(crossing(previous, current));
                output.push(current);
            }
            (false, false) => {}
        }
        previous = current;
    }
    output
}

fn vertical_crossing(x: f64) -> impl Fn(Point, Point) -> Point {
    move |a, b| {
        let t = (x - a.x) / (b.x - a.x);
        Point::new(x, a.y + (b.y - a.y) * t)
    }
}

fn horizontal_crossing(y: f64) -> impl Fn(Point, Point) -> Point {
    move |a, b| {
        let t = (y - a.y) / (b.y - a.y);
        Point::new(a.x + (b.x - a.x) * t, y)
    }
}

/// The part of a convex polygon that lies inside `rect`, empty if they
/// don't overlap
pub fn clip_to_rect(polygon: &[Point], rect: &Box2D<f64>) -> Vec<Point> {
    let Box2D { min, max } = *rect;

    let clipped = clip_against(polygon, |p| p.x >= min.x, vertical_crossing(min.x));
    let clipped = clip_against(&clipped, |p| p.x <= max.x, vertical_crossing(max.x));
    let clipped = clip_against(&clipped, |p| p.y >= min.y, horizontal_crossing(min.y));
    clip_against(&clipped, |p| p.y <= max.y, horizontal_crossing(max.y))
}

pub fn overlap_area(polygon: &[Point], rect: &Box2D<f64>) -> f64 {
    area(&clip_to_rect(polygon, rect))
}

#[cfg(test)]
fn unit_rect(x: f64, y: f64) -> Box2D<f64> {
    use lyon_geom::euclid::default::Point2D;
    Box2D::new(Point2D::new(x, y), Point2D::new(x + 1., y + 1.))
}

#[test]
fn test_signed_area() {
    let square = [
        Point::new(0., 0.),
        Point::new(2., 0.),
        Point::new(2., 2.),
        Point::new(0., 2.),
    ];
    assert_eq!(signed_area(&square), 4.);

    let mut reversed = square;
    reversed.reverse();
    assert_eq!(signed_area(&reversed), -4.);
    assert_eq!(area(&reversed), 4.);
    assert_eq!(area(&[]), 0.);
}

#[test]
fn test_convexity() {
    let diamond = [
        Point::new(0., -1.),
        Point::new(1., 0.),
        Point::new(0., 1.),
        Point::new(-1., 0.),
    ];
    assert!(is_strictly_convex(&diamond));

    let bowtie = [
        Point::new(0., 0.),
        Point::new(1., 1.),
        Point::new(1., 0.),
        Point::new(0., 1.),
    ];
    assert!(!is_strictly_convex(&bowtie));
}

#[test]
fn test_clip_to_rect() {
    let diamond = [
        Point::new(0., -1.),
        Point::new(1., 0.),
        Point::new(0., 1.),
        Point::new(-1., 0.),
    ];

    // a quarter of the diamond lies in each unit square around the origin
    for (x, y) in [(0., 0.), (-1., 0.), (0., -1.), (-1., -1.)] {
        let overlap = overlap_area(&diamond, &unit_rect(x, y));
        assert!((overlap - 0.5).abs() < 1e-12, "{x}, {y}: {overlap}");
    }

    assert!(clip_to_rect(&diamond, &unit_rect(5., 5.)).is_empty());

    // fully contained
    let contained = overlap_area(&diamond, &Box2D::new((-2., -2.).into(), (2., 2.).into()));
    assert!((contained - 2.).abs() < 1e-12);
}

/// Number of grid units per unit of length, every point that takes part in
/// equality or hashing is snapped to this grid first
pub const PRECISION_SCALE: f64 = 1e7;

/// Length of one grid unit
pub const PRECISION_STEP: f64 = 1. / PRECISION_SCALE;

/// Two overlap areas closer than this are considered equal
pub const AREA_TOLERANCE: f64 = 1e-6;

pub fn make_precise(value: f64) -> f64 {
    (value * PRECISION_SCALE).round() / PRECISION_SCALE
}

// -0.0 and 0.0 both map to 0
pub fn grid_units(value: f64) -> i64 {
    (value * PRECISION_SCALE).round() as i64
}

#[test]
fn test_make_precise() {
    assert_eq!(make_precise(0.1 + 0.2), make_precise(0.3));
    assert_eq!(make_precise(1.000000049), 1.);
    assert_eq!(make_precise(-2.5e-8), 0.);
    assert_ne!(make_precise(1.00000006), 1.);
}

#[test]
fn test_grid_units() {
    assert_eq!(grid_units(-0.), grid_units(0.));
    assert_eq!(grid_units(0.1 + 0.2), grid_units(0.3));
    assert_eq!(grid_units(-1.5), -15_000_000);
}

pub use point::Point;
pub use precision::{make_precise, AREA_TOLERANCE, PRECISION_SCALE, PRECISION_STEP};

mod point;
pub mod polygon;
pub mod precision;

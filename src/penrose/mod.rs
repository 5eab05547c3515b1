//! De Bruijn's pentagrid: five families of parallel strips whose crossings
//! are dual to the rhombi of a Penrose tiling

pub use bounding_box::BoundingBox;
pub use geometry_error::GeometryError;
pub use pent_angle::{angular_sin, unit, PentAngle, FAMILY_COUNT, PENT_ANGLES};
pub use rhombus::{Rhombus, RhombusType};
pub use strip::{Anchor, RhombusWalk, Strip};
pub use strip_family::StripFamily;
pub use tiling::{PenroseTiling, RhombusVisitor};

mod bounding_box;
mod geometry_error;
mod pent_angle;
mod rhombus;
mod strip;
mod strip_family;
mod tiling;

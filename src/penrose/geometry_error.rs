use crate::penrose::Rhombus;
use std::fmt::{Display, Formatter};

/// Failures of a single geometric query, none of them are recoverable by
/// retrying
#[derive(Debug, Clone, PartialEq, Error)]
#[must_use]
pub enum GeometryError {
    /// Two strips of the same family never cross
    ParallelStrips { family: usize },
    /// There are only `FAMILY_COUNT` strip families
    UnknownFamily { family: usize },
    /// No box of the grid overlaps the rhombus, the rhombus was built wrong
    NoContainingBox { rhombus: Rhombus },
    InvalidOffset { family: usize, offset: f64 },
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParallelStrips { family } => {
                write!(f, "strips of family {family} are parallel and don't intersect")
            }
            Self::UnknownFamily { family } => {
                write!(f, "there is no strip family {family}")
            }
            Self::NoContainingBox { rhombus } => {
                write!(f, "no bounding box overlaps {rhombus}")
            }
            Self::InvalidOffset { family, offset } => {
                write!(f, "offset {offset} of family {family} is not finite")
            }
        }
    }
}

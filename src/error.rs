use crate::penrose::GeometryError;
use std::fmt::{Debug, Display, Formatter};
use std::{fmt, io, result};

#[derive(Debug)]
pub enum ErrorType {
    Geometry(GeometryError),
    Io(io::Error),
}

/// The second member contains a trace in reverse order
#[must_use]
pub struct Error(ErrorType, Vec<String>);

impl From<GeometryError> for Error {
    fn from(e: GeometryError) -> Self {
        Self(ErrorType::Geometry(e), vec![])
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self(ErrorType::Io(e), vec![])
    }
}

impl Error {
    pub fn with_trace_step<S: ToString>(mut self, s: S) -> Self {
        self.1.push(s.to_string());
        self
    }

    pub fn error_type(&self) -> &ErrorType {
        &self.0
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error:\n{:?}\nTrace:", self.0)?;
        for t in (self.1).iter().rev() {
            writeln!(f, " in {}", t)?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ErrorType::Geometry(e) => write!(f, "{e}")?,
            ErrorType::Io(e) => write!(f, "i/o error: {e}")?,
        }
        for t in (self.1).iter().rev() {
            write!(f, "\n in {}", t)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub type Result<T = (), E = Error> = result::Result<T, E>;

pub trait ErrorConversion {
    fn with_trace_step<S: ToString>(self, s: S) -> Self;
}

impl<T> ErrorConversion for Result<T> {
    fn with_trace_step<S: ToString>(self, s: S) -> Self {
        self.map_err(|e| e.with_trace_step(s.to_string()))
    }
}

#[test]
fn test_trace_is_reported_outermost_first() {
    let result: Result = Err(Error::from(GeometryError::ParallelStrips { family: 1 }));
    let error = result
        .with_trace_step("rhombus construction")
        .with_trace_step("box (0, 0)")
        .expect_err("still an error");

    assert!(matches!(
        error.error_type(),
        ErrorType::Geometry(GeometryError::ParallelStrips { family: 1 })
    ));
    assert_eq!(
        error.to_string(),
        concat!(
            "strips of family 1 are parallel and don't intersect\n",
            " in box (0, 0)\n",
            " in rhombus construction",
        )
    );
}

#[macro_use]
extern crate derive_more;

pub mod basic;
pub mod cli;
pub mod error;
pub mod generator;
pub mod output;
pub mod penrose;

pub use error::{Error, Result};
pub use generator::{GridConfig, PTGen, RhombusOutput};

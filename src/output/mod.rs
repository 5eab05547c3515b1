//! Consumers of a generation run that write the tiling out as svg

pub use svg::SvgOutput;
pub use svg_line::SvgLineOutput;
pub use svg_writer::SvgWriter;

mod svg;
mod svg_line;
mod svg_writer;

/// Layout options shared by the svg outputs
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SvgOptions {
    /// Space left between neighbouring boxes
    pub grid_spacing: f64,
    /// Outline every box, rhombi on the edge still stick out past it
    pub show_grid: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            grid_spacing: 2.5,
            show_grid: false,
        }
    }
}

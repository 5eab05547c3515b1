use crate::basic::Point;
use crate::error::Result;
use crate::generator::PTGen;
use crate::output::SvgOptions;
use crate::penrose::BoundingBox;
use std::io::Write;

/// How far a rhombus can stick out past the box that contains it, half the
/// long diagonal of a thin rhombus
pub fn max_protrusion() -> f64 {
    72_f64.to_radians().sin()
}

pub const BOUNDING_BOX_STYLE: &str = "\
rect.boundingBox {
    stroke: blue;
    stroke-width: .05;
    fill-opacity: 0;
    stroke-opacity: .5;
}
";

/// Writes the parts of the document shared by every svg output and keeps
/// track of the box currently being drawn
pub struct SvgWriter<W: Write> {
    out: W,
    options: SvgOptions,
    current_box: Option<BoundingBox>,
}

impl<W: Write> SvgWriter<W> {
    pub fn new(out: W, options: SvgOptions) -> Self {
        Self {
            out,
            options,
            current_box: None,
        }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The opening tag, sized so that the whole grid with the spacing
    /// between boxes is visible, followed by the style block
    pub fn write_header(&mut self, ptgen: &PTGen, rhombus_style: &str) -> Result {
        let config = ptgen.config();
        let spacing = self.options.grid_spacing;
        let protrusion = max_protrusion();

        let view_size = |size: f64, count: u32| {
            size * count as f64 + (count as f64 - 1.) * spacing + protrusion * 2.
        };
        let width = view_size(config.width, config.count_x);
        let height = view_size(config.height, config.count_y);
        let min_x = config.min_x - protrusion;
        let min_y = config.min_y - protrusion;

        writeln!(
            self.out,
            r#"<svg width="{width}mm" height="{height}mm" viewBox="{min_x} {min_y} {w} {h}">"#,
            w = width,
            h = height,
        )?;
        writeln!(self.out, "<style><![CDATA[")?;
        write!(self.out, "{BOUNDING_BOX_STYLE}{rhombus_style}")?;
        writeln!(self.out, "]]></style>")?;
        Ok(())
    }

    pub fn start_box(&mut self, bounding_box: &BoundingBox) {
        self.current_box = Some(*bounding_box);
    }

    /// Draws the box outline if the grid is shown
    pub fn end_box(&mut self, bounding_box: &BoundingBox) -> Result {
        self.current_box = None;
        if !self.options.show_grid {
            return Ok(());
        }

        let origin = bounding_box.origin + self.offset_of(bounding_box);
        let size = bounding_box.grid_size;
        writeln!(
            self.out,
            r#"<rect x="{:.6}" y="{:.6}" width="{:.6}" height="{:.6}" class="boundingBox"/>"#,
            origin.x, origin.y, size.x, size.y,
        )?;
        Ok(())
    }

    pub fn write_footer(&mut self) -> Result {
        writeln!(self.out, "</svg>")?;
        self.out.flush()?;
        Ok(())
    }

    /// Boxes are pulled apart by the grid spacing
    fn offset_of(&self, bounding_box: &BoundingBox) -> Point {
        Point::new(
            bounding_box.x_multiple as f64,
            bounding_box.y_multiple as f64,
        ) * self.options.grid_spacing
    }

    /// Where a point of the tiling lands in the document
    pub fn place(&self, point: Point) -> Point {
        match &self.current_box {
            Some(bounding_box) => point + self.offset_of(bounding_box),
            None => point,
        }
    }
}

/// Formats a point the way path data expects it
pub fn coordinate(point: Point) -> String {
    format!("{:.6},{:.6}", point.x, point.y)
}

#[test]
fn test_header_fits_grid() {
    use crate::generator::GridConfig;

    let ptgen = PTGen::new(GridConfig {
        min_x: 1.,
        min_y: -2.,
        width: 10.,
        height: 5.,
        count_x: 3,
        count_y: 1,
        ..GridConfig::default()
    });
    let mut writer = SvgWriter::new(vec![], SvgOptions::default());
    writer.write_header(&ptgen, "").expect("writing to a vec");
    let svg = String::from_utf8(writer.into_inner()).expect("valid utf-8");

    // unrounded, not the quantized table value
    let protrusion = 72_f64.to_radians().sin();
    assert_ne!(protrusion, crate::penrose::PENT_ANGLES[1].sin);
    let width = 30. + 2. * 2.5 + 2. * protrusion;
    let height = 5. + 2. * protrusion;
    let first_line = svg.lines().next().expect("header line");
    assert_eq!(
        first_line,
        format!(
            r#"<svg width="{width}mm" height="{height}mm" viewBox="{} {} {width} {height}">"#,
            1. - protrusion,
            -2. - protrusion,
        )
    );
    assert!(svg.contains("rect.boundingBox {"));
    assert!(svg.ends_with("]]></style>\n"));
}

#[test]
fn test_place_offsets_by_box() {
    let mut writer = SvgWriter::new(vec![], SvgOptions::default());
    let bounding_box = BoundingBox::new(Point::ORIGIN, Point::new(10., 10.), 2, 1);
    let point = Point::new(21., 13.);

    assert_eq!(writer.place(point), point);
    writer.start_box(&bounding_box);
    assert_eq!(writer.place(point), Point::new(26., 15.5));
}

#[test]
fn test_grid_rect_only_when_shown() {
    let bounding_box = BoundingBox::new(Point::ORIGIN, Point::new(10., 4.), 1, 0);

    let mut hidden = SvgWriter::new(vec![], SvgOptions::default());
    hidden.end_box(&bounding_box).expect("writing to a vec");
    assert!(hidden.into_inner().is_empty());

    let mut shown = SvgWriter::new(
        vec![],
        SvgOptions {
            show_grid: true,
            ..SvgOptions::default()
        },
    );
    shown.end_box(&bounding_box).expect("writing to a vec");
    assert_eq!(
        String::from_utf8(shown.into_inner()).expect("valid utf-8"),
        concat!(
            r#"<rect x="12.500000" y="0.000000" width="10.000000" height="4.000000" "#,
            r#"class="boundingBox"/>"#,
            "\n",
        )
    );
}

use crate::error::Result;
use crate::generator::{PTGen, RhombusOutput};
use crate::output::svg_writer::coordinate;
use crate::output::{SvgOptions, SvgWriter};
use crate::penrose::{BoundingBox, Rhombus, RhombusType, RhombusVisitor};
use std::io::Write;

const RHOMBUS_STYLE: &str = "\
path.thinRhombus {
    fill: #333333;
    stroke: #000000;
    stroke-width: .01;
}
path.thickRhombus {
    fill: #aaaaaa;
    stroke: #000000;
    stroke-width: .01;
}
";

/// Every rhombus as its own filled path, for display
pub struct SvgOutput<W: Write> {
    writer: SvgWriter<W>,
}

impl<W: Write> SvgOutput<W> {
    pub fn new(out: W, options: SvgOptions) -> Self {
        Self {
            writer: SvgWriter::new(out, options),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> RhombusVisitor for SvgOutput<W> {
    fn visit_rhombus(&mut self, rhombus: &Rhombus) -> Result {
        let class = match rhombus.rhombus_type() {
            RhombusType::Thin => "thinRhombus",
            RhombusType::Thick => "thickRhombus",
        };
        let (strip1, strip2) = (rhombus.strip1(), rhombus.strip2());
        let path = rhombus
            .vertices()
            .map(|vertex| coordinate(self.writer.place(vertex)))
            .join(" ");

        writeln!(
            self.writer.out(),
            r#"<path class="{class}" id="rhombus_{}-{}_{}-{}""#,
            strip1.family,
            strip1.multiple,
            strip2.family,
            strip2.multiple,
        )?;
        writeln!(
            self.writer.out(),
            r#" d="M {path} z"><desc>{}, {}</desc></path>"#,
            rhombus.lower_strip(),
            rhombus.upper_strip(),
        )?;
        Ok(())
    }
}

impl<W: Write> RhombusOutput for SvgOutput<W> {
    fn start(&mut self, ptgen: &PTGen) -> Result {
        self.writer.write_header(ptgen, RHOMBUS_STYLE)
    }

    fn start_box(&mut self, bounding_box: &BoundingBox) -> Result {
        self.writer.start_box(bounding_box);
        Ok(())
    }

    fn end_box(&mut self, bounding_box: &BoundingBox) -> Result {
        self.writer.end_box(bounding_box)
    }

    fn end(&mut self) -> Result {
        self.writer.write_footer()
    }
}

#[test]
fn test_one_path_per_rhombus() {
    use crate::generator::GridConfig;

    let ptgen = PTGen::new(GridConfig {
        seed: 3,
        width: 4.,
        height: 4.,
        count_x: 2,
        ..GridConfig::default()
    });
    let mut output = SvgOutput::new(vec![], SvgOptions::default());
    ptgen.visit_rhombii(&mut output).expect("writing to a vec");
    let svg = String::from_utf8(output.into_inner()).expect("valid utf-8");

    let expected: usize = ptgen
        .bounding_boxes()
        .iter()
        .map(|bounding_box| ptgen.tiling().rhombi_in(bounding_box).len())
        .sum();
    let thin = svg.matches(r#"class="thinRhombus""#).count();
    let thick = svg.matches(r#"class="thickRhombus""#).count();
    assert_eq!(thin + thick, expected);
    assert!(thin > 0 && thick > 0);
    assert_eq!(svg.matches("<desc>Strip(").count(), expected);

    assert!(svg.starts_with("<svg "));
    assert!(svg.ends_with("</svg>\n"));
    assert!(!svg.contains("<rect"));
}

#[test]
fn test_path_format() {
    use crate::penrose::Strip;

    let rhombus = Rhombus::new(Strip::new(0, 0), Strip::new(1, 0), [0; 5])
        .expect("distinct families");
    let mut output = SvgOutput::new(vec![], SvgOptions::default());
    output.visit_rhombus(&rhombus).expect("writing to a vec");
    let svg = String::from_utf8(output.into_inner()).expect("valid utf-8");

    let mut lines = svg.lines();
    assert_eq!(
        lines.next(),
        Some(r#"<path class="thickRhombus" id="rhombus_0-0_1-0""#)
    );
    let data = lines.next().expect("path data line");
    assert!(data.starts_with(r#" d="M 0.000000,0.000000 "#));
    assert!(data.ends_with(r#" z"><desc>Strip(0:0), Strip(1:0)</desc></path>"#));
    assert_eq!(data.matches(',').count(), 4 + 1);
}

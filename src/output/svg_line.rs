use crate::basic::Point;
use crate::error::Result;
use crate::generator::{PTGen, RhombusOutput};
use crate::output::svg_writer::coordinate;
use crate::output::{SvgOptions, SvgWriter};
use crate::penrose::{BoundingBox, Rhombus, RhombusVisitor};
use std::collections::HashSet;
use std::io::Write;

const EDGE_STYLE: &str = "\
path.rhombusEdge {
    stroke: #000000;
    stroke-width: .01;
}
";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Edge(Point, Point);

impl Edge {
    fn reversed(self) -> Self {
        Self(self.1, self.0)
    }
}

/// Only the rhombus edges as lines, an edge shared by two rhombi of the same
/// box is drawn once so that a plotter or mill doesn't trace it twice
pub struct SvgLineOutput<W: Write> {
    writer: SvgWriter<W>,
    box_edges: HashSet<Edge>,
}

impl<W: Write> SvgLineOutput<W> {
    pub fn new(out: W, options: SvgOptions) -> Self {
        Self {
            writer: SvgWriter::new(out, options),
            box_edges: HashSet::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> RhombusVisitor for SvgLineOutput<W> {
    fn visit_rhombus(&mut self, rhombus: &Rhombus) -> Result {
        for (from, to) in rhombus.edges() {
            let edge = Edge(from, to);
            if self.box_edges.contains(&edge) || self.box_edges.contains(&edge.reversed()) {
                continue;
            }

            let (from, to) = (self.writer.place(from), self.writer.place(to));
            writeln!(
                self.writer.out(),
                r#"<path class="rhombusEdge" id="edge{}" d="M {} {}"/>"#,
                self.box_edges.len(),
                coordinate(from),
                coordinate(to),
            )?;
            self.box_edges.insert(edge);
        }
        Ok(())
    }
}

impl<W: Write> RhombusOutput for SvgLineOutput<W> {
    fn start(&mut self, ptgen: &PTGen) -> Result {
        self.writer.write_header(ptgen, EDGE_STYLE)
    }

    fn start_box(&mut self, bounding_box: &BoundingBox) -> Result {
        self.box_edges.clear();
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

#[cfg(test)]
fn edge_lines(svg: &str) -> Vec<&str> {
    svg.lines()
        .filter(|line| line.starts_with(r#"<path class="rhombusEdge""#))
        .collect()
}

#[test]
fn test_shared_edge_written_once() {
    use crate::penrose::Strip;

    // both lie on strip (0:0) and meet across strip (1:0)
    let below = Rhombus::new(Strip::new(0, 0), Strip::new(1, -1), [0, 0, 0, 0, 0])
        .expect("distinct families");
    let above = Rhombus::new(Strip::new(0, 0), Strip::new(1, 0), [0, 1, 0, 0, 0])
        .expect("distinct families");
    let shared = below
        .edges()
        .into_iter()
        .filter(|&(a, b)| above.edges().iter().any(|&(c, d)| (a, b) == (c, d) || (a, b) == (d, c)))
        .count();
    assert_eq!(shared, 1);

    let mut output = SvgLineOutput::new(vec![], SvgOptions::default());
    output.visit_rhombus(&below).expect("writing to a vec");
    output.visit_rhombus(&above).expect("writing to a vec");
    let svg = String::from_utf8(output.into_inner()).expect("valid utf-8");

    let lines = edge_lines(&svg);
    assert_eq!(lines.len(), 7);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.contains(&format!(r#"id="edge{i}""#)));
    }
}

#[test]
fn test_edges_deduplicated_per_box() {
    use crate::generator::GridConfig;

    let ptgen = PTGen::new(GridConfig {
        seed: 5,
        width: 3.,
        height: 3.,
        count_x: 2,
        ..GridConfig::default()
    });
    let mut output = SvgLineOutput::new(vec![], SvgOptions::default());
    ptgen.visit_rhombii(&mut output).expect("writing to a vec");
    let svg = String::from_utf8(output.into_inner()).expect("valid utf-8");

    let expected: usize = ptgen
        .bounding_boxes()
        .iter()
        .map(|bounding_box| {
            let edges: HashSet<(Point, Point)> = ptgen
                .tiling()
                .rhombi_in(bounding_box)
                .iter()
                .flat_map(|rhombus| rhombus.edges())
                .map(|(a, b)| if (a.x, a.y) < (b.x, b.y) { (a, b) } else { (b, a) })
                .collect();
            edges.len()
        })
        .sum();
    assert_eq!(edge_lines(&svg).len(), expected);

    // numbering restarts with every box
    assert_eq!(svg.matches(r#"id="edge0""#).count(), 2);
}

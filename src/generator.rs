use crate::basic::Point;
use crate::error::{ErrorConversion, Result};
use crate::penrose::{BoundingBox, PenroseTiling, Rhombus, RhombusVisitor};
use itertools::Itertools;
use log::info;
use rayon::prelude::*;

/// What to generate, all lengths are in tiling units (one rhombus side)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub seed: u64,
    /// Lower left corner of the (0, 0) box
    pub min_x: f64,
    pub min_y: f64,
    /// Size of a single grid box
    pub width: f64,
    pub height: f64,
    pub count_x: u32,
    pub count_y: u32,
    /// Only visit the rhombi whose largest part lies in the box
    pub owned_only: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_x: 0.,
            min_y: 0.,
            width: 10.,
            height: 10.,
            count_x: 1,
            count_y: 1,
            owned_only: false,
        }
    }
}

/// Callbacks for a whole generation run, in order: `start` once, then for
/// every box `start_box`, the box's rhombi and `end_box`, finally `end` once
pub trait RhombusOutput: RhombusVisitor {
    fn start(&mut self, ptgen: &PTGen) -> Result;

    fn start_box(&mut self, bounding_box: &BoundingBox) -> Result;

    fn end_box(&mut self, bounding_box: &BoundingBox) -> Result;

    fn end(&mut self) -> Result;
}

/// Penrose-Tiling-Generator, drives an output over a grid of boxes
pub struct PTGen {
    config: GridConfig,
    tiling: PenroseTiling,
}

impl PTGen {
    pub fn new(config: GridConfig) -> Self {
        Self {
            tiling: PenroseTiling::from_seed(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn tiling(&self) -> &PenroseTiling {
        &self.tiling
    }

    pub fn grid_origin(&self) -> Point {
        Point::new(self.config.min_x, self.config.min_y).precise()
    }

    pub fn grid_size(&self) -> Point {
        Point::new(self.config.width, self.config.height).precise()
    }

    /// Every box of the grid, column by column
    pub fn bounding_boxes(&self) -> Vec<BoundingBox> {
        let (grid_origin, grid_size) = (self.grid_origin(), self.grid_size());
        (0..self.config.count_x as i32)
            .cartesian_product(0..self.config.count_y as i32)
            .map(|(x, y)| BoundingBox::new(grid_origin, grid_size, x, y))
            .collect()
    }

    fn box_rhombi(&self, bounding_box: &BoundingBox) -> Result<Vec<Rhombus>> {
        if !self.config.owned_only {
            return Ok(self.tiling.rhombi_in(bounding_box));
        }

        let mut owned = vec![];
        self.tiling
            .visit_owned_rhombii(bounding_box, &mut |rhombus: &Rhombus| -> Result {
                owned.push(*rhombus);
                Ok(())
            })?;
        Ok(owned)
    }

    /// Runs the whole generation, boxes are computed in parallel but the
    /// output sees them one after another in grid order
    pub fn visit_rhombii<O: RhombusOutput + ?Sized>(&self, output: &mut O) -> Result {
        let boxes = self.bounding_boxes();
        info!(
            "generating {} boxes of {}x{} from seed {}",
            boxes.len(),
            self.config.width,
            self.config.height,
            self.config.seed,
        );

        let rhombi: Vec<Result<Vec<Rhombus>>> = boxes
            .par_iter()
            .map(|bounding_box| self.box_rhombi(bounding_box))
            .collect();

        output.start(self)?;
        for (bounding_box, box_rhombi) in boxes.iter().zip(rhombi) {
            let trace =
                || format!("box ({}, {})", bounding_box.x_multiple, bounding_box.y_multiple);
            let box_rhombi = box_rhombi.with_trace_step(trace())?;

            output.start_box(bounding_box).with_trace_step(trace())?;
            for rhombus in &box_rhombi {
                output.visit_rhombus(rhombus).with_trace_step(trace())?;
            }
            output.end_box(bounding_box).with_trace_step(trace())?;
        }
        output.end()
    }
}

#[cfg(test)]
#[derive(Default)]
struct RecordingOutput {
    events: Vec<String>,
    rhombi: Vec<(BoundingBox, Rhombus)>,
    current_box: Option<BoundingBox>,
}

#[cfg(test)]
impl RhombusVisitor for RecordingOutput {
    fn visit_rhombus(&mut self, rhombus: &Rhombus) -> Result {
        let current_box = self.current_box.expect("rhombus outside of a box");
        self.rhombi.push((current_box, *rhombus));
        Ok(())
    }
}

#[cfg(test)]
impl RhombusOutput for RecordingOutput {
    fn start(&mut self, _ptgen: &PTGen) -> Result {
        self.events.push("start".into());
        Ok(())
    }

    fn start_box(&mut self, bounding_box: &BoundingBox) -> Result {
        self.events
            .push(format!("start_box {} {}", bounding_box.x_multiple, bounding_box.y_multiple));
        self.current_box = Some(*bounding_box);
        Ok(())
    }

    fn end_box(&mut self, bounding_box: &BoundingBox) -> Result {
        self.events
            .push(format!("end_box {} {}", bounding_box.x_multiple, bounding_box.y_multiple));
        self.current_box = None;
        Ok(())
    }

    fn end(&mut self) -> Result {
        self.events.push("end".into());
        Ok(())
    }
}

#[test]
fn test_lifecycle_order() {
    let ptgen = PTGen::new(GridConfig {
        width: 4.,
        height: 4.,
        count_x: 2,
        count_y: 2,
        ..GridConfig::default()
    });
    let mut output = RecordingOutput::default();
    ptgen.visit_rhombii(&mut output).expect("recording can't fail");

    assert_eq!(
        output.events,
        [
            "start",
            "start_box 0 0",
            "end_box 0 0",
            "start_box 0 1",
            "end_box 0 1",
            "start_box 1 0",
            "end_box 1 0",
            "start_box 1 1",
            "end_box 1 1",
            "end",
        ]
    );

    for bounding_box in ptgen.bounding_boxes() {
        let visited: Vec<Rhombus> = output
            .rhombi
            .iter()
            .filter(|(b, _)| *b == bounding_box)
            .map(|(_, rhombus)| *rhombus)
            .collect();
        assert_eq!(visited, ptgen.tiling().rhombi_in(&bounding_box));
    }
}

#[test]
fn test_owned_only_visits_each_rhombus_once() {
    let ptgen = PTGen::new(GridConfig {
        seed: 12,
        width: 3.,
        height: 3.,
        count_x: 3,
        count_y: 2,
        owned_only: true,
        ..GridConfig::default()
    });
    let mut output = RecordingOutput::default();
    ptgen.visit_rhombii(&mut output).expect("recording can't fail");

    let unique: std::collections::HashSet<Rhombus> =
        output.rhombi.iter().map(|(_, rhombus)| *rhombus).collect();
    assert_eq!(unique.len(), output.rhombi.len());
    assert!(!unique.is_empty());

    for bounding_box in ptgen.bounding_boxes() {
        let visited: Vec<Rhombus> = output
            .rhombi
            .iter()
            .filter(|(b, _)| *b == bounding_box)
            .map(|(_, rhombus)| *rhombus)
            .collect();
        let owned = ptgen
            .tiling()
            .owned_rhombi_in(&bounding_box)
            .expect("every rhombus has a container");
        assert_eq!(visited, owned);
    }
}

#[test]
fn test_same_config_same_output() {
    let config = GridConfig {
        seed: 99,
        min_x: -7.5,
        count_x: 2,
        ..GridConfig::default()
    };

    let mut a = RecordingOutput::default();
    let mut b = RecordingOutput::default();
    PTGen::new(config).visit_rhombii(&mut a).expect("recording can't fail");
    PTGen::new(config).visit_rhombii(&mut b).expect("recording can't fail");

    assert_eq!(a.events, b.events);
    assert_eq!(a.rhombi, b.rhombi);
}

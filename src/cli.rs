use crate::error::{Error, ErrorConversion, Result};
use crate::generator::{GridConfig, PTGen};
use crate::output::{SvgLineOutput, SvgOptions, SvgOutput};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    /// Every rhombus as a filled path
    Svg,
    /// Deduplicated rhombus edges as lines
    SvgLine,
}

/// Generates a grid of boxes cut from one Penrose rhombus tiling
#[derive(Parser, Debug)]
#[command(name = "ptgen", about, allow_negative_numbers = true)]
pub struct Args {
    /// x of the lower left corner of the first box
    #[arg(long, default_value_t = 0.)]
    pub min_x: f64,
    /// y of the lower left corner of the first box
    #[arg(long, default_value_t = 0.)]
    pub min_y: f64,
    #[arg(long, default_value_t = 10., value_parser = positive_length)]
    pub width: f64,
    #[arg(long, default_value_t = 10., value_parser = positive_length)]
    pub height: f64,
    /// Number of boxes along x
    #[arg(long, default_value_t = 1)]
    pub count_x: u32,
    /// Number of boxes along y
    #[arg(long, default_value_t = 1)]
    pub count_y: u32,
    #[arg(long = "type", value_enum, default_value_t = OutputType::Svg)]
    pub output_type: OutputType,
    /// Seed for the offsets of the strip families
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Space left between neighbouring boxes
    #[arg(long, default_value_t = 2.5)]
    pub grid_spacing: f64,
    /// Outline every box
    #[arg(long)]
    pub show_grid: bool,
    /// Give every rhombus to the single box holding most of it instead of to
    /// every box it overlaps
    #[arg(long)]
    pub owned: bool,
    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

fn positive_length(s: &str) -> result::Result<f64, String> {
    let length = s.parse::<f64>().map_err(|e| e.to_string())?;
    if length.is_finite() && length > 0. {
        Ok(length)
    } else {
        Err(format!("{s} is not a positive length"))
    }
}

impl Args {
    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            seed: self.seed,
            min_x: self.min_x,
            min_y: self.min_y,
            width: self.width,
            height: self.height,
            count_x: self.count_x,
            count_y: self.count_y,
            owned_only: self.owned,
        }
    }

    pub fn svg_options(&self) -> SvgOptions {
        SvgOptions {
            grid_spacing: self.grid_spacing,
            show_grid: self.show_grid,
        }
    }
}

/// Generates into any writer
pub fn generate<W: Write>(args: &Args, out: W) -> Result {
    let ptgen = PTGen::new(args.grid_config());
    match args.output_type {
        OutputType::Svg => ptgen.visit_rhombii(&mut SvgOutput::new(out, args.svg_options())),
        OutputType::SvgLine => {
            ptgen.visit_rhombii(&mut SvgLineOutput::new(out, args.svg_options()))
        }
    }
}

pub fn run(args: &Args) -> Result {
    match &args.output {
        Some(path) => {
            info!("writing to {}", path.display());
            let file = File::create(path)
                .map_err(Error::from)
                .with_trace_step(format!("creating {}", path.display()))?;
            generate(args, BufWriter::new(file))
        }
        None => generate(args, BufWriter::new(io::stdout().lock())),
    }
}

#[test]
fn test_defaults() {
    let args = Args::try_parse_from(["ptgen"]).expect("no arguments are required");
    assert_eq!(args.grid_config(), GridConfig::default());
    assert_eq!(args.svg_options(), SvgOptions::default());
    assert_eq!(args.output_type, OutputType::Svg);
    assert_eq!(args.output, None);
}

#[test]
fn test_parse_all() {
    let args = Args::try_parse_from([
        "ptgen",
        "--min-x",
        "-20",
        "--min-y",
        "-7.5",
        "--width",
        "40",
        "--height",
        "15",
        "--count-x",
        "3",
        "--count-y",
        "2",
        "--type",
        "svg-line",
        "--seed",
        "42",
        "--grid-spacing",
        "1",
        "--show-grid",
        "--owned",
        "--output",
        "tiling.svg",
    ])
    .expect("valid arguments");

    assert_eq!(
        args.grid_config(),
        GridConfig {
            seed: 42,
            min_x: -20.,
            min_y: -7.5,
            width: 40.,
            height: 15.,
            count_x: 3,
            count_y: 2,
            owned_only: true,
        }
    );
    assert_eq!(
        args.svg_options(),
        SvgOptions {
            grid_spacing: 1.,
            show_grid: true,
        }
    );
    assert_eq!(args.output_type, OutputType::SvgLine);
    assert_eq!(args.output, Some(PathBuf::from("tiling.svg")));
}

#[test]
fn test_unknown_type_rejected() {
    assert!(Args::try_parse_from(["ptgen", "--type", "png"]).is_err());
}

#[test]
fn test_box_size_must_be_positive() {
    for (flag, value) in [
        ("--width", "-10"),
        ("--height", "-0.5"),
        ("--width", "0"),
        ("--height", "inf"),
    ] {
        assert!(
            Args::try_parse_from(["ptgen", flag, value]).is_err(),
            "{flag} {value}"
        );
    }

    let args = Args::try_parse_from(["ptgen", "--width", "0.25"]).expect("valid arguments");
    assert_eq!(args.width, 0.25);
}

#[test]
fn test_generate_into_buffer() {
    let args = Args::try_parse_from([
        "ptgen", "--width", "3", "--height", "3", "--type", "svg-line",
    ])
    .expect("valid arguments");
    let mut buffer = vec![];
    generate(&args, &mut buffer).expect("writing to a vec");
    let svg = String::from_utf8(buffer).expect("valid utf-8");

    assert!(svg.contains("path.rhombusEdge {"));
    assert!(svg.contains(r#"id="edge0""#));
    assert!(svg.ends_with("</svg>\n"));
}

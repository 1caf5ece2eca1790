// main.rs
//
// Runs the candidate search on a stroke and prints a per-type summary.
//
//   sketchfit [stroke.json [params.json]]
//
// A stroke file holds `{ "points": [[x, y], ...], "closed": false, "corners": [3, 9] }`
// (`closed` and `corners` optional). Without one, a built-in S-shaped stroke is used.
// Set RUST_LOG=debug (or trace) for the search log.

use nalgebra::Point2;
use serde::Deserialize;
use sketchfit::float_types::{Real, TAU};
use sketchfit::{CurveType, FitError, LogDebug, Parameters, Polyline, fit_primitives};
use std::path::Path;
use std::{env, fs, process};

#[derive(Debug, Deserialize)]
struct StrokeFile {
    points: Vec<[Real; 2]>,
    #[serde(default)]
    closed: bool,
    /// Sample indices flagged as corners.
    #[serde(default)]
    corners: Vec<usize>,
}

fn demo_stroke() -> StrokeFile {
    let points = (0..40)
        .map(|i| {
            let t = i as Real / 39.0;
            [10.0 * t, 2.0 * (TAU * t).sin()]
        })
        .collect();
    StrokeFile {
        points,
        closed: false,
        corners: Vec::new(),
    }
}

fn run() -> Result<(), FitError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let stroke = match args.first() {
        Some(path) => serde_json::from_str::<StrokeFile>(&fs::read_to_string(path)?)?,
        None => demo_stroke(),
    };
    let params = match args.get(1) {
        Some(path) => Parameters::load(Path::new(path))?,
        None => Parameters::default(),
    };

    let pts = stroke.points.iter().map(|&[x, y]| Point2::new(x, y)).collect();
    let polyline = Polyline::from_points(pts, stroke.closed)?;
    let mut corners = vec![false; polyline.len()];
    for &idx in &stroke.corners {
        if let Some(flag) = corners.get_mut(idx) {
            *flag = true;
        }
    }

    let candidates = fit_primitives(&polyline, &corners, &params, &LogDebug)?;

    println!(
        "{} samples ({}), length {:.3}, algorithm {}",
        polyline.len(),
        if polyline.is_closed() { "closed" } else { "open" },
        polyline.length(),
        params.primitive_fitting
    );
    for ty in CurveType::ALL {
        let of_type: Vec<_> = candidates.iter().filter(|c| c.curve_type() == ty).collect();
        let longest = of_type.iter().map(|c| c.num_pts).max().unwrap_or(0);
        println!("  {:<10} {:>6} candidates, longest span {longest} samples", ty.name(), of_type.len());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

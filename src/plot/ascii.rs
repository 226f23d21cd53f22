//! ASCII plot of the standard curve.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - standards: `o`
//! - fitted curve: `-`
//! - resolved samples at their undiluted concentration: `x`

use crate::domain::{CalibrationModel, ModelFile, ResolvedSample, StandardPoint};

/// Render the standard curve with standards and resolved samples overlaid.
///
/// Samples are placed at `(raw_concentration, corrected_absorbance)`: the
/// plot shows where each unknown falls on the undiluted calibration axis.
pub fn render_standard_curve(
    standards: &[StandardPoint],
    model: &CalibrationModel,
    samples: &[ResolvedSample],
    width: usize,
    height: usize,
) -> String {
    let (x_min, x_max) = x_range(standards, samples).unwrap_or((0.0, 100.0));
    let curve = sample_curve(model, x_min, x_max, width.max(2));
    render_grid(standards, samples, &curve, x_min, x_max, width, height)
}

/// Render the curve stored in a saved model JSON (no overlay points).
pub fn render_model_file(model_file: &ModelFile, width: usize, height: usize) -> String {
    let grid = &model_file.grid;
    let curve: Vec<(f64, f64)> = grid
        .concentration
        .iter()
        .zip(grid.absorbance.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    let x_min = grid.concentration.first().copied().unwrap_or(0.0);
    let x_max = grid.concentration.last().copied().unwrap_or(100.0);
    render_grid(&[], &[], &curve, x_min, x_max, width, height)
}

fn render_grid(
    standards: &[StandardPoint],
    samples: &[ResolvedSample],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(standards, samples, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so points can overlay it.
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = '-';
    }

    for point in standards {
        let col = map_x(point.concentration, x_min, x_max, width);
        let row = map_y(point.averaged_absorbance(), y_min, y_max, height);
        grid[row][col] = 'o';
    }

    for sample in samples {
        if !sample.raw_concentration.is_finite() {
            continue;
        }
        let col = map_x(sample.raw_concentration, x_min, x_max, width);
        let row = map_y(sample.corrected_absorbance, y_min, y_max, height);
        grid[row][col] = 'x';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: conc=[{x_min:.1}, {x_max:.1}] ug/mL | absorbance=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str("legend: o standards | - fitted curve | x samples\n");

    out
}

fn sample_curve(model: &CalibrationModel, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, model.predict(x))
        })
        .collect()
}

fn x_range(standards: &[StandardPoint], samples: &[ResolvedSample]) -> Option<(f64, f64)> {
    let xs = standards
        .iter()
        .map(|p| p.concentration)
        .chain(samples.iter().map(|s| s.raw_concentration))
        .filter(|x| x.is_finite());

    min_max(xs)
}

fn y_range(
    standards: &[StandardPoint],
    samples: &[ResolvedSample],
    curve: &[(f64, f64)],
) -> Option<(f64, f64)> {
    let ys = standards
        .iter()
        .map(|p| p.averaged_absorbance())
        .chain(samples.iter().map(|s| s.corrected_absorbance))
        .chain(curve.iter().map(|&(_, y)| y))
        .filter(|y| y.is_finite());

    min_max(ys)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() && hi > lo {
        Some((lo, hi))
    } else {
        None
    }
}

fn pad_range(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    let pad = (hi - lo) * frac;
    (lo - pad, hi + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Terminal rows grow downward; invert so larger absorbance sits higher.
    let row = ((1.0 - u) * (height as f64 - 1.0)).round() as usize;
    row.min(height - 1)
}

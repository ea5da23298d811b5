//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - monthly observations: `o`
//! - connecting line: `-`
//!
//! The x axis is the month index (the series has at most 12 points), which
//! keeps spacing even regardless of day-of-month jitter in the timestamps.

use crate::domain::MonthlySample;
use crate::report::month_label;

/// Render an ASCII line chart of a monthly APY series.
pub fn render_ascii_chart(series: &[MonthlySample], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    if series.is_empty() {
        return "Plot: (no chart data in the window)\n".to_string();
    }

    let (y_min, y_max) = apy_range(series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first, so the point markers overlay it.
    let mut prev = None;
    for (i, sample) in series.iter().enumerate() {
        let x = map_x(i, series.len(), width);
        let y = map_y(sample.apy, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }
    for (i, sample) in series.iter().enumerate() {
        let x = map_x(i, series.len(), width);
        let y = map_y(sample.apy, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    // Small header with ranges.
    let first = month_label(&series[0].timestamp);
    let last = month_label(&series[series.len() - 1].timestamp);
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: months=[{first}, {last}] | apy=[{y_min:.2}, {y_max:.2}]%\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn apy_range(series: &[MonthlySample]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for sample in series {
        min_y = min_y.min(sample.apy);
        max_y = max_y.max(sample.apy);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        // Flat series: synthesize a band around the level.
        Some((min_y - 0.5, min_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, n: usize, width: usize) -> usize {
    let width = width.max(2);
    if n <= 1 {
        return 0;
    }
    let u = index as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

//! ASCII/Unicode rendering of the profile chart for terminal output.
//!
//! Fixed-size grid, deterministic output (helpful for golden tests).
//!
//! Plot elements:
//! - temperature profile: `*` line
//! - inverted bands: rows filled with `.`, labelled `Inversion` at the
//!   band's vertical middle

use super::ProfileChart;

const LABEL: &str = "Inversion";

pub fn render_ascii_profile(chart: &ProfileChart, width: usize, height: usize) -> String {
    let width = width.max(LABEL.len() + 2);
    let height = height.max(5);
    let [x_min, x_max] = chart.x_bounds;
    let [y_min, y_max] = chart.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    // Shading first so the profile draws on top of it.
    for band in &chart.shaded {
        let top = map_y(band.upper_ft, y_min, y_max, height);
        let bottom = map_y(band.lower_ft, y_min, y_max, height);
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row.iter_mut().for_each(|c| *c = '.');
        }
    }

    let mut prev = None;
    for &(t, h) in &chart.line {
        if h < y_min || h > y_max {
            prev = None;
            continue;
        }
        let x = map_x(t, x_min, x_max, width);
        let y = map_y(h, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '*');
        } else {
            grid[y][x] = '*';
        }
        prev = Some((x, y));
    }

    // Labels go on top of everything.
    let start = (width - LABEL.len()) / 2;
    for band in &chart.shaded {
        let mid = map_y(band.mid_ft(), y_min, y_max, height);
        for (k, ch) in LABEL.chars().enumerate() {
            grid[mid][start + k] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: temp=[{x_min:.1}, {x_max:.1}] F | height=[{y_min:.0}, {y_max:.0}] ft\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). The line overwrites shading.
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
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
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

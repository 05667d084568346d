//! SVG charts rendered with Plotters.
//!
//! Two files are written per run:
//!
//! - `profile.svg`: °F vs feet, inverted bands shaded and labelled
//! - `raw.svg`: report units (tenths °C vs meters) with a grid

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use super::{ProfileChart, RawChart, profile_chart, raw_chart};
use crate::app::pipeline::RunOutput;
use crate::domain::STATION_LABEL;
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (900, 1000);
const SHADE_ALPHA: f64 = 0.3;
const PROFILE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Render both charts into `out_dir`, returning the written paths.
pub fn write_svg_charts(run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(out_dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output dir '{}': {e}", out_dir.display()))
    })?;

    let title = chart_title(run);

    let profile_path = out_dir.join("profile.svg");
    {
        let root = SVGBackend::new(&profile_path, CHART_SIZE).into_drawing_area();
        draw_profile(&root, &profile_chart(&run.levels, &run.inversions), &title)
            .and_then(|_| root.present().map_err(Into::into))
            .map_err(|e| render_error(&profile_path, e))?;
    }

    let raw_path = out_dir.join("raw.svg");
    {
        let root = SVGBackend::new(&raw_path, CHART_SIZE).into_drawing_area();
        draw_raw(&root, &raw_chart(&run.levels), &title)
            .and_then(|_| root.present().map_err(Into::into))
            .map_err(|e| render_error(&raw_path, e))?;
    }

    info!(profile = %profile_path.display(), raw = %raw_path.display(), "wrote charts");
    Ok(vec![profile_path, raw_path])
}

fn chart_title(run: &RunOutput) -> String {
    match run.profile.header().valid_at {
        Some(t) => format!("{STATION_LABEL} {}Z", t.format("%Y-%m-%d %H")),
        None => STATION_LABEL.to_string(),
    }
}

fn render_error(path: &Path, e: Box<dyn Error>) -> AppError {
    AppError::new(2, format!("Failed to render chart '{}': {e}", path.display()))
}

fn draw_profile(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &ProfileChart,
    title: &str,
) -> Result<(), Box<dyn Error>> {
    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;

    root.fill(&WHITE)?;
    let mut ctx = ChartBuilder::on(root)
        .caption(format!("Temperature Inversions: {title}"), ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Temp (°F)")
        .y_desc("Height (feet)")
        .draw()?;

    ctx.draw_series(chart.shaded.iter().map(|b| {
        let (r, g, bl) = b.rgb;
        Rectangle::new(
            [(x0, b.lower_ft), (x1, b.upper_ft)],
            RGBColor(r, g, bl).mix(SHADE_ALPHA).filled(),
        )
    }))?;

    ctx.draw_series(LineSeries::new(chart.line.iter().copied(), PROFILE_COLOR.stroke_width(2)))?
        .label("Temperature at that Height")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PROFILE_COLOR));

    let x_mid = chart.x_mid();
    let label_style = ("sans-serif", 16)
        .into_font()
        .color(&RED)
        .pos(Pos::new(HPos::Center, VPos::Center));
    ctx.draw_series(
        chart
            .shaded
            .iter()
            .map(|b| Text::new("Inversion", (x_mid, b.mid_ft()), label_style.clone())),
    )?;

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_raw(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &RawChart,
    title: &str,
) -> Result<(), Box<dyn Error>> {
    let [x0, x1] = chart.x_bounds;
    let [y0, y1] = chart.y_bounds;

    root.fill(&WHITE)?;
    let mut ctx = ChartBuilder::on(root)
        .caption(format!("Report units: {title}"), ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .x_desc("TEMP (tenths °C)")
        .y_desc("HEIGHT (m)")
        .draw()?;

    ctx.draw_series(LineSeries::new(chart.line.iter().copied(), PROFILE_COLOR.stroke_width(2)))?
        .label("TEMP")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PROFILE_COLOR));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::analyze_report;
    use crate::domain::RunConfig;
    use crate::test_data::SAMPLE_REPORT;

    /// Count `<text>` elements whose trimmed body is exactly `body`.
    fn text_nodes(svg: &str, body: &str) -> usize {
        svg.split("<text")
            .skip(1)
            .filter_map(|el| {
                let start = el.find('>')? + 1;
                let end = el.find("</text>")?;
                el.get(start..end)
            })
            .filter(|inner| inner.trim() == body)
            .count()
    }

    #[test]
    fn writes_both_svg_files() {
        let run = analyze_report(SAMPLE_REPORT, &RunConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let paths = write_svg_charts(&run, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);

        let profile = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(profile.contains("<svg"));
        assert_eq!(text_nodes(&profile, "Inversion"), 3);

        let raw = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(raw.contains("HEIGHT (m)"));
    }
}

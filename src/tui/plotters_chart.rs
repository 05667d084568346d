//! Plotters-powered sounding chart widget for Ratatui.
//!
//! Rendering goes through `plotters-ratatui-backend`, which draws Plotters
//! primitives onto Ratatui's `Canvas`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A band to mark on the chart, in chart y units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandEdges {
    pub lower: f64,
    pub upper: f64,
    pub rgb: (u8, u8, u8),
}

/// A render-only chart description; series and bounds are computed by the caller.
pub struct SoundingChart<'a> {
    /// Temperature vs height, in profile order.
    pub line: &'a [(f64, f64)],
    /// Inverted bands, drawn as a pair of horizontal edges across the x-range.
    pub bands: &'a [BandEdges],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Draw a background grid (raw view).
    pub grid: bool,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for SoundingChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a very small area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let grid_color = RGBColor(90, 90, 90);
            let fmt_x = |v: &f64| (self.fmt_x)(*v);
            let fmt_y = |v: &f64| (self.fmt_y)(*v);
            {
                let mut mesh = chart.configure_mesh();
                if !self.grid {
                    mesh.disable_x_mesh().disable_y_mesh();
                }
                mesh.x_desc(self.x_label)
                    .y_desc(self.y_label)
                    .x_labels(5)
                    .y_labels(5)
                    .x_label_formatter(&fmt_x)
                    .y_label_formatter(&fmt_y)
                    .label_style(("sans-serif", 10).into_font().color(&WHITE))
                    .axis_style(&WHITE)
                    .bold_line_style(&grid_color)
                    .light_line_style(&grid_color)
                    .draw()?;
            }

            for band in self.bands {
                let (r, g, b) = band.rgb;
                let color = RGBColor(r, g, b);
                for edge in [band.lower, band.upper] {
                    chart.draw_series(LineSeries::new([(x0, edge), (x1, edge)], &color))?;
                }
            }

            let line_color = RGBColor(0, 255, 255); // cyan
            chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

//! Ratatui-based terminal UI.
//!
//! The TUI presents one already-computed run: the profile or raw chart
//! (toggled with Tab), the per-band flags and the scrollable sounding table.
//! It never refetches.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::domain::STATION_LABEL;
use crate::error::AppError;
use crate::plot::{ProfileChart, RawChart, profile_chart, raw_chart};

mod plotters_chart;

use plotters_chart::{BandEdges, SoundingChart};

/// Rows moved by PgUp/PgDn in the table.
const PAGE_ROWS: usize = 10;
/// Header lines of the formatted table that stay pinned while scrolling.
const TABLE_HEADER_LINES: usize = 2;

/// Start the TUI over a finished run.
pub fn run(run: RunOutput) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartView {
    Profile,
    Raw,
}

impl ChartView {
    fn toggle(self) -> Self {
        match self {
            ChartView::Profile => ChartView::Raw,
            ChartView::Raw => ChartView::Profile,
        }
    }

    fn title(self) -> &'static str {
        match self {
            ChartView::Profile => "Temperature profile (°F vs ft)",
            ChartView::Raw => "Report units (tenths °C vs m)",
        }
    }
}

struct App {
    run: RunOutput,
    profile: ProfileChart,
    raw: RawChart,
    view: ChartView,
    table: Vec<String>,
    scroll: usize,
    status: String,
}

impl App {
    fn new(run: RunOutput) -> Self {
        let profile = profile_chart(&run.levels, &run.inversions);
        let raw = raw_chart(&run.levels);
        let table = crate::report::format_table(&run.levels)
            .lines()
            .map(str::to_string)
            .collect();
        let status = format!(
            "{} records, {} inverted bands",
            run.profile.len(),
            profile.shaded.len()
        );
        Self {
            run,
            profile,
            raw,
            view: ChartView::Profile,
            table,
            scroll: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.view = self.view.toggle();
                self.status = format!("view: {}", self.view.title());
            }
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(PAGE_ROWS as isize)),
            KeyCode::PageDown => self.scroll_by(PAGE_ROWS as isize),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
        false
    }

    fn max_scroll(&self) -> usize {
        self.table
            .len()
            .saturating_sub(TABLE_HEADER_LINES)
            .saturating_sub(1)
    }

    fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll.saturating_add_signed(delta);
        self.scroll = next.min(self.max_scroll());
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = self.run.profile.header();
        let valid = header
            .valid_at
            .map(|t| format!("{}Z", t.format("%Y-%m-%d %H:%M")))
            .unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("raob", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" - temperature inversions at {STATION_LABEL}")),
            ]),
            Line::from(Span::styled(
                format!(
                    "valid: {valid} | records: {} | coldest point over: {}",
                    self.run.profile.len(),
                    self.run.inversions.scope.display_name(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let bands_height = self.run.inversions.bands.len() as u16 + 2;
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(bands_height), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_chart(frame, columns[0]);
        self.draw_bands(frame, right[0]);
        self.draw_table(frame, right[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let bands: Vec<BandEdges>;
        let axes: ChartAxes;
        let widget = match self.view {
            ChartView::Profile => {
                bands = self
                    .profile
                    .shaded
                    .iter()
                    .map(|b| BandEdges {
                        lower: b.lower_ft,
                        upper: b.upper_ft,
                        rgb: b.rgb,
                    })
                    .collect();
                axes = ChartAxes {
                    x_bounds: self.profile.x_bounds,
                    y_bounds: self.profile.y_bounds,
                    x_label: "temp (°F)",
                    y_label: "ft",
                };
                SoundingChart {
                    line: &self.profile.line,
                    bands: &bands,
                    x_bounds: axes.x_bounds,
                    y_bounds: axes.y_bounds,
                    x_label: axes.x_label,
                    y_label: axes.y_label,
                    grid: false,
                    fmt_x: fmt_axis_int,
                    fmt_y: fmt_axis_int,
                }
            }
            ChartView::Raw => {
                axes = ChartAxes {
                    x_bounds: self.raw.x_bounds,
                    y_bounds: self.raw.y_bounds,
                    x_label: "temp (0.1 °C)",
                    y_label: "m",
                };
                SoundingChart {
                    line: &self.raw.line,
                    bands: &[],
                    x_bounds: axes.x_bounds,
                    y_bounds: axes.y_bounds,
                    x_label: axes.x_label,
                    y_label: axes.y_label,
                    grid: true,
                    fmt_x: fmt_axis_int,
                    fmt_y: fmt_axis_int,
                }
            }
        };

        let (chart_rect, insets) = chart_layout(inner);
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, &axes);
        }
    }

    fn draw_bands(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .run
            .inversions
            .bands
            .iter()
            .enumerate()
            .map(|(i, b)| {
                if b.inverted {
                    let (r, g, bl) = crate::plot::band_color(i, self.run.inversions.bands.len());
                    ListItem::new(format!("{:<12} Inversion", b.band.label()))
                        .style(
                            Style::default()
                                .fg(Color::Rgb(r, g, bl))
                                .add_modifier(Modifier::BOLD),
                        )
                } else {
                    ListItem::new(format!("{:<12} -", b.band.label()))
                }
            })
            .collect();

        let list = List::new(items).block(Block::default().title("Bands").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = self
            .table
            .iter()
            .take(TABLE_HEADER_LINES)
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(Color::Gray))))
            .collect();
        lines.extend(
            self.table
                .iter()
                .skip(TABLE_HEADER_LINES + self.scroll)
                .map(|l| Line::from(l.as_str())),
        );

        let title = format!(
            "Sounding ({}/{})",
            (self.scroll + 1).min(self.run.levels.len()),
            self.run.levels.len()
        );
        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab chart  ↑/↓ PgUp/PgDn Home/End scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

struct ChartAxes {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: &'static str,
    y_label: &'static str,
}

fn fmt_axis_int(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    axes: &ChartAxes,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = axes.x_bounds;
    let [y0, y1] = axes.y_bounds;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_int(x0 + u * (x1 - x0));
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_int(y0 + u * (y1 - y0));
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(axes.x_label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(axes.y_label)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::analyze_report;
    use crate::domain::RunConfig;
    use crate::test_data::SAMPLE_REPORT;

    fn app() -> App {
        App::new(analyze_report(SAMPLE_REPORT, &RunConfig::default()).unwrap())
    }

    #[test]
    fn tab_toggles_chart_view() {
        let mut app = app();
        assert_eq!(app.view, ChartView::Profile);
        assert!(!app.handle_key(KeyCode::Tab));
        assert_eq!(app.view, ChartView::Raw);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view, ChartView::Profile);
    }

    #[test]
    fn scrolling_is_clamped_to_the_table() {
        let mut app = app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.scroll, 0);

        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.scroll, PAGE_ROWS);

        app.handle_key(KeyCode::End);
        assert_eq!(app.scroll, app.run.levels.len() - 1);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.scroll, app.run.levels.len() - 1);

        app.handle_key(KeyCode::Home);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }
}

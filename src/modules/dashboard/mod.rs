//! Dashboard module - panel-based default view

mod results;

pub use results::{bar, format_size, top_correlations, Exchange, Results};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::{Action, Context, Module};
use crate::infrastructure::api::ColumnStats;

const BAR_WIDTH: usize = 24;

/// Lines moved by PageUp/PageDown
const PAGE: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPanel {
    Dataset,
    Analysis,
    Models,
    Insights,
}

impl DashboardPanel {
    pub const ALL: [DashboardPanel; 4] = [
        DashboardPanel::Dataset,
        DashboardPanel::Analysis,
        DashboardPanel::Models,
        DashboardPanel::Insights,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardPanel::Dataset => "DATASET",
            DashboardPanel::Analysis => "ANALYSIS",
            DashboardPanel::Models => "MODELS",
            DashboardPanel::Insights => "INSIGHTS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    active_panel: DashboardPanel,
    /// First visible line of the active panel
    scroll: u16,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            active_panel: DashboardPanel::Dataset,
            scroll: 0,
        }
    }

    pub fn active_panel(&self) -> DashboardPanel {
        self.active_panel
    }

    pub fn select(&mut self, panel: DashboardPanel) {
        if panel != self.active_panel {
            self.scroll = 0;
        }
        self.active_panel = panel;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Clamped against the content when rendering
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn next_panel(&mut self) {
        self.select(match self.active_panel {
            DashboardPanel::Dataset => DashboardPanel::Analysis,
            DashboardPanel::Analysis => DashboardPanel::Models,
            DashboardPanel::Models => DashboardPanel::Insights,
            DashboardPanel::Insights => DashboardPanel::Dataset,
        });
    }

    pub fn prev_panel(&mut self) {
        self.select(match self.active_panel {
            DashboardPanel::Dataset => DashboardPanel::Insights,
            DashboardPanel::Analysis => DashboardPanel::Dataset,
            DashboardPanel::Models => DashboardPanel::Analysis,
            DashboardPanel::Insights => DashboardPanel::Models,
        });
    }

    /// Render the active panel into `area`
    pub fn render_with_data(
        &self,
        frame: &mut ratatui::Frame,
        area: Rect,
        ctx: &Context,
        results: &Results,
    ) {
        let lines = self.lines(ctx, results);
        let offset = clamp_scroll(self.scroll, lines.len());

        let title = if offset > 0 {
            format!("{} [{}/{}]", self.active_panel.title(), offset + 1, lines.len())
        } else {
            self.active_panel.title().to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0));
        frame.render_widget(paragraph, area);
    }
}

impl Dashboard {
    pub fn lines(&self, ctx: &Context, results: &Results) -> Vec<Line<'static>> {
        match self.active_panel {
            DashboardPanel::Dataset => dataset_lines(ctx, results),
            DashboardPanel::Analysis => analysis_lines(results),
            DashboardPanel::Models => model_lines(results),
            DashboardPanel::Insights => insight_lines(results),
        }
    }
}

/// Keep at least the last line on screen
fn clamp_scroll(scroll: u16, line_count: usize) -> u16 {
    let last = u16::try_from(line_count.saturating_sub(1)).unwrap_or(u16::MAX);
    scroll.min(last)
}

impl Module for Dashboard {
    fn id(&self) -> &'static str {
        "dashboard"
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &Context) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.next_panel();
                Action::None
            }
            KeyCode::BackTab => {
                self.prev_panel();
                Action::None
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.select(DashboardPanel::ALL[index]);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_down(1);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_up(1);
                Action::None
            }
            KeyCode::PageDown => {
                self.scroll_down(PAGE);
                Action::None
            }
            KeyCode::PageUp => {
                self.scroll_up(PAGE);
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll = 0;
                Action::None
            }
            KeyCode::Char('s') => Action::ToggleSidebar,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char(':') => Action::OpenCommand(None),
            KeyCode::Char('u') => Action::OpenCommand(Some("upload ".to_string())),
            KeyCode::Char('a') => {
                if ctx.data().is_bound() {
                    Action::OpenCommand(Some("ask ".to_string()))
                } else {
                    Action::OpenCommand(Some("upload ".to_string()))
                }
            }
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(name: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:<14}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

pub fn dataset_lines(ctx: &Context, results: &Results) -> Vec<Line<'static>> {
    let data = ctx.data();
    let mut lines = vec![heading("Dataset")];
    if !data.is_bound() {
        lines.push(hint("No dataset loaded"));
        lines.push(hint("Use :upload <path> or :use <file_id> <filename>"));
        return lines;
    }
    lines.push(field("file", data.filename.clone()));
    lines.push(field("id", data.file_id.clone()));

    if let Some(upload) = results.upload.as_ref() {
        lines.push(field("size", format_size(upload.size)));
        lines.push(field("shape", format!("{} rows x {} cols", upload.rows, upload.columns)));
        let uploaded = upload
            .uploaded_at()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| upload.upload_time.clone());
        lines.push(field("uploaded", uploaded));
        lines.push(field("columns", upload.column_names.join(", ")));
    }

    if let Some(quality) = results.quality {
        lines.push(field("quality", format!("{:.1}%", quality.quality_score)));
    }

    lines.push(Line::from(""));
    lines.push(heading("Summary"));
    match results.summary.as_ref() {
        None => lines.push(hint("Run :summary")),
        Some(summary) => {
            lines.push(field("rows", summary.row_count.to_string()));
            lines.push(field("columns", summary.column_count.to_string()));
            lines.push(field("memory", summary.memory_usage.clone()));
            lines.push(field("missing", summary.total_missing().to_string()));
            for (column, dtype) in &summary.data_types {
                let missing = summary.missing_values.get(column).copied().unwrap_or(0);
                lines.push(Line::from(format!("  {column:<20} {dtype:<10} {missing} missing")));
            }
            if !summary.numeric_summary.is_empty() {
                lines.push(Line::from(""));
                lines.push(heading("Describe"));
            }
            for (column, stats) in &summary.numeric_summary {
                let cells: Vec<String> = stats
                    .iter()
                    .map(|(name, value)| match value {
                        Some(value) => format!("{name} {value}"),
                        None => format!("{name} -"),
                    })
                    .collect();
                lines.push(Line::from(format!("  {column:<20} {}", cells.join("  "))));
            }
        }
    }
    lines
}

pub fn analysis_lines(results: &Results) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Column statistics")];
    match results.column_stats.as_ref() {
        None => lines.push(hint("Run :stats")),
        Some(stats) => {
            for (column, stat) in stats {
                let text = match stat {
                    ColumnStats::Numeric {
                        mean,
                        median,
                        min,
                        max,
                        ..
                    } => format!(
                        "  {column:<20} mean {mean:.2}  median {median:.2}  range {min:.2}..{max:.2}"
                    ),
                    ColumnStats::Categorical { unique, mode } => format!(
                        "  {column:<20} {unique} unique  mode {}",
                        mode.as_deref().unwrap_or("-")
                    ),
                };
                lines.push(Line::from(text));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Strongest correlations"));
    match results.correlation.as_ref() {
        None => lines.push(hint("Run :corr")),
        Some(matrix) => {
            let top = top_correlations(matrix, 5);
            if top.is_empty() {
                lines.push(hint("No numeric column pairs"));
            }
            for (left, right, value) in top {
                lines.push(Line::from(format!("  {left} ~ {right}: {value:+.3}")));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Outliers"));
    match results.outliers.as_ref() {
        None => lines.push(hint("Run :outliers")),
        Some(outliers) => {
            for (column, rows) in outliers {
                lines.push(Line::from(format!("  {column:<20} {} rows", rows.len())));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Distributions"));
    match results.charts.as_ref() {
        None => lines.push(hint("Run :charts")),
        Some(charts) => {
            for chart in &charts.charts {
                lines.push(Line::from(format!("  {} ({})", chart.name, chart.kind)));
                let max = chart.data.values().copied().max().unwrap_or(0);
                for (bucket, count) in &chart.data {
                    lines.push(Line::from(format!(
                        "    {bucket:>10} {} {count}",
                        bar(*count, max, BAR_WIDTH)
                    )));
                }
            }
        }
    }
    lines
}

pub fn model_lines(results: &Results) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Model")];
    match results.model.as_ref() {
        None => lines.push(hint("Run :train <target> [regression|classification]")),
        Some(model) => {
            lines.push(field("type", model.model_type.clone()));
            if let Some(target) = model.target.as_ref() {
                lines.push(field("target", target.clone()));
            }
            if let Some(samples) = model.samples_trained {
                lines.push(field("samples", samples.to_string()));
            }
            for (name, value) in model.reported() {
                lines.push(field(name, format!("{value:.4}")));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Forecast"));
    match results.forecast.as_ref() {
        None => lines.push(hint("Run :forecast <date_column> <value_column> [periods]")),
        Some(forecast) => {
            if let Some(error) = forecast.error.as_ref() {
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            if let Some(method) = forecast.method.as_ref() {
                lines.push(field("method", method.clone()));
            }
            for (i, point) in forecast.forecast.iter().enumerate() {
                let label = point
                    .ds
                    .as_deref()
                    .map(|ds| ds.split('T').next().unwrap_or(ds).to_string())
                    .unwrap_or_else(|| format!("t+{}", i + 1));
                let bounds = if forecast.has_bounds() {
                    match (forecast.lower_bound.get(i), forecast.upper_bound.get(i)) {
                        (Some(lo), Some(hi)) => format!("  [{lo:.2}, {hi:.2}]"),
                        _ => String::new(),
                    }
                } else {
                    String::new()
                };
                lines.push(Line::from(format!("  {label:<12} {:.2}{bounds}", point.value)));
            }
        }
    }
    lines
}

pub fn insight_lines(results: &Results) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Risk")];
    match results.risk.as_ref() {
        None => lines.push(hint("Run :risk [contamination]")),
        Some(risk) => {
            let color = if risk.risk_score >= 10.0 {
                Color::Red
            } else {
                Color::Green
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<14}", "score"), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:.1}%", risk.risk_score), Style::default().fg(color)),
            ]));
            lines.push(field("anomalies", risk.total_anomalies.to_string()));
            lines.push(Line::from(risk.summary.clone()));
            for row in risk.anomalies.iter().take(5) {
                let index = row
                    .get("row_index")
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "?".to_string());
                lines.push(Line::from(format!("  row {index}")));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Ask the data"));
    if results.conversation.is_empty() {
        lines.push(hint("Run :ask <question>"));
    }
    for exchange in &results.conversation {
        lines.push(Line::from(Span::styled(
            format!("> {}", exchange.question),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(exchange.response.answer.clone()));
        lines.push(hint(&format!(
            "  confidence {:.0}%",
            exchange.response.confidence * 100.0
        )));
    }

    lines.push(Line::from(""));
    lines.push(heading("Report"));
    match results.report.as_ref() {
        None => lines.push(hint("Run :report [html|pdf]")),
        Some(report) => {
            lines.push(field("format", report.format.to_string()));
            lines.push(field("status", report.status.clone()));
            if let Some(text) = report.report.as_ref() {
                lines.extend(text.lines().map(|line| Line::from(line.to_string())));
            }
        }
    }
    lines
}

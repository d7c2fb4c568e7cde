use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, InputMode};
use crate::core::NotifyLevel;
use crate::modules::dashboard::DashboardPanel;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size(), app.sidebar_open());

    draw_header(f, areas.header, app);
    if let (Some(sections), Some(dataset)) = (areas.sidebar_sections, areas.sidebar_dataset) {
        draw_sidebar(f, sections, dataset, app);
    }
    app.dashboard
        .render_with_data(f, areas.main, &app.ctx, &app.results);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "Datadash",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("API", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", app.ctx.api_endpoint)),
        Span::styled("Panel", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.dashboard.active_panel().title())),
    ]);

    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let backend = if app.ctx.backend_status.is_empty() {
        "--"
    } else {
        app.ctx.backend_status.as_str()
    };
    let backend_style = match backend {
        "healthy" => Style::default().fg(Color::Green),
        "unreachable" => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    let right_line = Line::from(vec![
        Span::styled("Backend ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{backend}  "), backend_style),
        Span::styled("Pending ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.in_flight.to_string()),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_sidebar(f: &mut Frame, sections_area: Rect, dataset_area: Rect, app: &App) {
    let active = app.dashboard.active_panel();
    let items: Vec<ListItem> = DashboardPanel::ALL
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let style = if *panel == active {
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(format!("{} {}", i + 1, panel.title()))).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Panels"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("-> ");

    let mut state = ListState::default();
    state.select(DashboardPanel::ALL.iter().position(|panel| *panel == active));
    f.render_stateful_widget(list, sections_area, &mut state);

    let data = app.ctx.data();
    let lines = if data.is_bound() {
        vec![
            Line::from(Span::styled("file", Style::default().fg(Color::DarkGray))),
            Line::from(data.filename.as_str()),
            Line::from(Span::styled("id", Style::default().fg(Color::DarkGray))),
            Line::from(data.file_id.as_str()),
        ]
    } else {
        vec![
            Line::from("No dataset"),
            Line::from(Span::styled(
                "u to upload",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };
    let dataset = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Dataset"))
        .wrap(Wrap { trim: true });
    f.render_widget(dataset, dataset_area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.status_text() {
        Some((text, level)) => {
            let color = match level {
                NotifyLevel::Info => Color::Green,
                NotifyLevel::Warn => Color::Yellow,
                NotifyLevel::Error => Color::Red,
            };
            Line::from(Span::styled(text, Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "Tab panels  j/k scroll  s sidebar  r refresh  : command  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn command_hint(input: &str) -> Option<&'static str> {
    let word = input.split_whitespace().next()?;
    let hint = match word {
        "upload" | "up" => "<path to .csv/.xlsx>",
        "use" => "<file_id> <filename>",
        "train" => "<target> [regression|classification]",
        "forecast" | "fc" => "<date_column> <value_column> [periods]",
        "risk" => "[contamination 0.01-0.5]",
        "ask" | "chat" => "<question>",
        "report" => "[html|pdf]",
        _ => return None,
    };
    Some(hint)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint_text = command_hint(&app.command.input).unwrap_or("Enter=run  Esc=cancel");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.as_str()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => Line::from(""),
    };
    f.render_widget(Paragraph::new(content), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  Tab / S-Tab  Next / previous panel"),
        Line::from("  1-4          Jump to panel"),
        Line::from("  j/k PgUp/Dn  Scroll panel (g to top)"),
        Line::from("  s            Toggle sidebar"),
        Line::from("  r            Refresh panel"),
        Line::from("  u / a        Upload / ask"),
        Line::from("  q            Quit"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :upload <path>          :use <id> <file>"),
        Line::from("  :summary  :stats  :corr  :outliers  :charts"),
        Line::from("  :train <target> [regression|classification]"),
        Line::from("  :forecast <date> <value> [periods]"),
        Line::from("  :risk [contamination]   :quality"),
        Line::from("  :ask <question>         :report [html|pdf]"),
        Line::from("  :health  :sidebar  :quit"),
    ];

    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

//! Terminal UI rendering with ratatui

use adlens_core::labels::{ChangeCategory, display_label};
use adlens_core::{SessionOutcome, View};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
};

use crate::app::{App, InputMode, StatusLevel, describe};

/// Metrics shown under the history legend
const SAMPLE_METRICS: &[&str] = &["actionClicks", "viralClicks", "approximateMemberReach"];

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(1), // View tabs
            Constraint::Min(1),    // View body
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command line
        ])
        .split(f.area());

    draw_title_bar(f, app, chunks[0]);
    draw_tabs(f, app, chunks[1]);
    match app.current_view() {
        View::Index => draw_index(f, app, chunks[2]),
        View::History => draw_history(f, app, chunks[2]),
        View::Profile => draw_profile(f, app, chunks[2]),
    }
    draw_status_bar(f, app, chunks[3]);
    draw_command_line(f, app, chunks[4]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let (indicator, color) = if app.session.authenticated {
        (format!(" [{}]", app.session.email), Color::Green)
    } else {
        (" [Signed out]".to_string(), Color::Yellow)
    };

    let title_bar = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" adlens {} ", app.current_view().path()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(indicator, Style::default().fg(color)),
    ]))
    .style(Style::default().bg(Color::DarkGray));

    f.render_widget(title_bar, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{}:{}", i + 1, v.name()))
        .collect();
    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn draw_index(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    if app.session.authenticated {
        lines.push(Line::from(format!("Welcome back, {}", app.session.email)));
        lines.push(Line::from(""));
        let account = app
            .accounts
            .selected()
            .unwrap_or_else(|| "none (press s to use your own)".to_string());
        lines.push(Line::from(format!("Ad account: {}", account)));
    } else {
        let reason = match app.outcome {
            Some(SessionOutcome::Unauthenticated(reason)) => describe(reason),
            _ => "Not signed in",
        };
        lines.push(Line::styled(reason, Style::default().fg(Color::Yellow)));
        lines.push(Line::from(""));
        lines.push(Line::from(
            "Sign in through the dashboard, then start adlens with ADLENS_ACCESS_TOKEN",
        ));
        lines.push(Line::from("and ADLENS_REFRESH_TOKEN set, or press r to check again."));
    }

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Index "));
    f.render_widget(body, area);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = ChangeCategory::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == app.category_cursor {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(category.title(), style)))
        })
        .collect();

    let title = match app.accounts.selected() {
        Some(id) => format!(" Changes for {} ", id),
        None => " Changes ".to_string(),
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, columns[0]);

    let category = app.selected_category();
    let mut lines: Vec<Line> = category
        .labels()
        .iter()
        .map(|label| Line::from(format!("  {}", label)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::styled("Metrics", Style::default().add_modifier(Modifier::BOLD)));
    lines.extend(
        SAMPLE_METRICS
            .iter()
            .map(|m| Line::from(format!("  {}", display_label(m)))),
    );

    let detail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} [{}] ", category.title(), category.key())),
    );
    f.render_widget(detail, columns[1]);
}

fn draw_profile(f: &mut Frame, app: &App, area: Rect) {
    let field = |name: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<12}", name), Style::default().fg(Color::DarkGray)),
            Span::raw(if value.is_empty() {
                "-".to_string()
            } else {
                value.to_string()
            }),
        ])
    };

    let lines = vec![
        field("Email", &app.session.email),
        field("Account", &app.session.account_id),
        field("LinkedIn", &app.session.linkedin_id),
        field("User", &app.session.user_id),
    ];

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Profile "));
    f.render_widget(body, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some((ref msg, level)) = app.status_message {
        let color = match level {
            StatusLevel::Info => Color::Blue,
            StatusLevel::Success => Color::Green,
            StatusLevel::Warning => Color::Yellow,
            StatusLevel::Error => Color::Red,
        };
        (msg.clone(), Style::default().fg(color))
    } else {
        let hints = match app.input_mode {
            InputMode::Normal => "1/2/3:view │ r:recheck s:account L:logout │ ?:help q:quit",
            InputMode::Command => "Type command │ Enter:execute │ Esc:cancel",
        };
        (hints.to_string(), Style::default().fg(Color::DarkGray))
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_command_line(f: &mut Frame, app: &App, area: Rect) {
    if app.input_mode != InputMode::Command {
        return;
    }

    let line = Paragraph::new(format!(":{}", app.command_input))
        .style(Style::default().fg(Color::White));
    f.render_widget(line, area);

    let x = area.x + 1 + app.command_input.len() as u16;
    f.set_cursor_position((x, area.y));
}

//! ratatui rendering. Everything here reads the current `App` state and
//! draws it; all formatting decisions live in `view`.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Focus, Screen};
use crate::state::{MatchPanel, SectionState, SessionState, Tone};
use crate::view;

pub fn render(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Scanner => render_scanner(f, app),
        Screen::Login => render_credentials(f, app, true),
        Screen::Register => render_credentials(f, app, false),
        Screen::Admin => render_admin(f, app),
    }
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Neutral => Style::default(),
        Tone::Busy => Style::default().fg(Color::Yellow),
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Error => Style::default().fg(Color::Red),
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status.text.as_str())
        .style(tone_style(app.status.tone))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Status").borders(Borders::ALL));
    f.render_widget(status, area);
}

fn render_scanner(f: &mut Frame, app: &App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_profile(f, app, vertical[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [Constraint::Percentage(55), Constraint::Percentage(45)].as_ref(),
        )
        .split(vertical[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)].as_ref())
        .split(main[0]);
    render_upload(f, app, left[0]);
    render_results(f, app, left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)].as_ref())
        .split(main[1]);
    render_matches(f, app, right[0]);
    render_credit_form(f, app, right[1]);

    render_status(f, app, vertical[2]);
}

fn render_profile(f: &mut Frame, app: &App, area: Rect) {
    let (lines, title) = match &app.session {
        SessionState::Authenticated(profile) => {
            let mut lines: Vec<Line> = view::profile_lines(profile)
                .into_iter()
                .map(Line::from)
                .collect();
            lines.push(Line::from(Span::styled(
                "l: logout   a: admin dashboard (admins)",
                Style::default().fg(Color::DarkGray),
            )));
            (lines, "Profile")
        }
        _ => {
            let lines = vec![
                Line::from(Span::styled(
                    view::ANONYMOUS_NOTICE,
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    "l: login   r: register",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            (lines, "Profile")
        }
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn input_line<'a>(value: &'a str, focused: bool) -> Line<'a> {
    if focused {
        Line::from(vec![
            Span::raw(value),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else {
        Line::from(value)
    }
}

fn render_upload(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::FilePath;
    let title = if focused {
        "Document (editing, Enter: scan, Esc: done)"
    } else {
        "Document (e: edit path, s: scan)"
    };
    let upload = Paragraph::new(input_line(&app.file_input, focused))
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(upload, area);
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match app.scan.report() {
        // The results container stays hidden until a scan succeeds.
        None => Vec::new(),
        Some(report) => {
            let results = view::scan_results_view(report);
            let mut lines: Vec<Line> = results
                .rows
                .iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{label}: "),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(value.clone()),
                    ])
                })
                .collect();
            if results.match_trigger.is_some() {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "[m] View All Matches",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            lines
        }
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Scan Results").borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn render_matches(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match &app.matches {
        MatchPanel::Hidden => Vec::new(),
        MatchPanel::Loading => vec![Line::from(Span::styled(
            "Loading matches...",
            Style::default().fg(Color::Yellow),
        ))],
        MatchPanel::Loaded(entries) => view::match_lines(entries)
            .into_iter()
            .map(Line::from)
            .collect(),
        MatchPanel::Failed(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Matches").borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn render_credit_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::CreditAmount;
    let title = if focused {
        "Request Credits (editing, Enter: submit, Esc: done)"
    } else {
        "Request Credits (c: edit amount)"
    };
    let form = Paragraph::new(input_line(&app.credit_input, focused))
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(form, area);
}

fn render_credentials(f: &mut Frame, app: &App, login: bool) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let (form, title) = if login {
        (&app.login_form, "Login")
    } else {
        (&app.register_form, "Register")
    };

    let username = Paragraph::new(input_line(
        &form.username,
        !form.focus_password,
    ))
    .block(Block::default().title("Username").borders(Borders::ALL));
    f.render_widget(username, vertical[0]);

    let masked = "*".repeat(form.password.chars().count());
    let password = Paragraph::new(input_line(&masked, form.focus_password))
        .block(Block::default().title("Password").borders(Borders::ALL));
    f.render_widget(password, vertical[1]);

    let help = Paragraph::new(Line::from(Span::styled(
        "Tab: switch field   Enter: submit   Esc: back",
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(help, vertical[2]);

    render_status(f, app, vertical[3]);
}

fn render_admin(f: &mut Frame, app: &App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(6),
                Constraint::Min(8),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_pending(f, app, vertical[0]);
    render_analytics(f, app, vertical[1]);
    render_status(f, app, vertical[2]);
}

fn render_pending(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Pending Credit Requests (j/k: move, y: approve, n: reject, g: reload)")
        .borders(Borders::ALL);

    match &app.admin.pending {
        SectionState::Loading => {
            let panel = Paragraph::new("Loading...").block(block);
            f.render_widget(panel, area);
        }
        SectionState::Failed(message) => {
            let panel = Paragraph::new(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))
            .block(block);
            f.render_widget(panel, area);
        }
        SectionState::Loaded(rows) => {
            let items: Vec<ListItem> = rows
                .iter()
                .map(|row| ListItem::new(view::pending_line(row)))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::new()
                        .bg(Color::Cyan)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            let mut list_state = ListState::default();
            if !rows.is_empty() {
                list_state.select(Some(app.admin.selected));
            }
            f.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn render_analytics(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("Analytics").borders(Borders::ALL);

    let lines: Vec<Line> = match &app.admin.analytics {
        SectionState::Loading => vec![Line::from("Loading...")],
        SectionState::Failed(message) => vec![Line::from(Span::styled(
            format!("Error loading analytics: {message}"),
            Style::default().fg(Color::Red),
        ))],
        SectionState::Loaded(report) => view::analytics_lines(report)
            .into_iter()
            .map(Line::from)
            .collect(),
    };

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(panel, area);
}

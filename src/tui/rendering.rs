use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::ReviewApp;

pub fn ui(f: &mut Frame, app: &mut ReviewApp) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(f, chunks[0], app);
    render_move_list(f, chunks[1], app);
    render_preview(f, chunks[2], app);
    render_footer(f, chunks[3], app);

    if app.picker.is_some() {
        render_candidate_popup(f, app);
    }

    if app.show_help {
        render_help_popup(f);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &ReviewApp) {
    let title = format!(
        "mvodb - Review moves ({} of {} approved)",
        app.approved_count(),
        app.items.len()
    );
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn render_move_list(f: &mut Frame, area: Rect, app: &mut ReviewApp) {
    let items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            let (marker, color) = if item.approved {
                ("[x]", Color::Green)
            } else {
                ("[ ]", Color::DarkGray)
            };
            let file_name = item.proposal.media.file_name.as_str();
            let destination = item.destination(&app.format);

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(color)),
                Span::styled(file_name.to_string(), Style::default().fg(Color::White)),
                Span::styled(" -> ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    destination.display().to_string(),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Proposed moves"))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_preview(f: &mut Frame, area: Rect, app: &ReviewApp) {
    let lines = match app.selected() {
        Some(i) => {
            let item = &app.items[i];
            vec![
                Line::from(vec![
                    Span::styled("From: ", Style::default().fg(Color::Yellow)),
                    Span::raw(item.proposal.media.path.display().to_string()),
                ]),
                Line::from(vec![
                    Span::styled("To:   ", Style::default().fg(Color::Yellow)),
                    Span::raw(item.destination(&app.format).display().to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Match: ", Style::default().fg(Color::Yellow)),
                    Span::raw(format!(
                        "{} ({} of {})",
                        item.proposal.candidates[item.choice].identity,
                        item.choice + 1,
                        item.proposal.candidates.len()
                    )),
                ]),
            ]
        }
        None => vec![Line::from("Nothing to review")],
    };

    let preview = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Preview"));
    f.render_widget(preview, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &ReviewApp) {
    let text = app.status_message.clone().unwrap_or_else(|| {
        "y/n: approve/decline  space: toggle  a: accept all  c: candidates  Enter: move  q: quit  h: help"
            .to_string()
    });
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn render_candidate_popup(f: &mut Frame, app: &mut ReviewApp) {
    let Some(i) = app.selected() else {
        return;
    };
    let item = &app.items[i];

    let mut rows: Vec<ListItem> = item
        .proposal
        .candidates
        .iter()
        .enumerate()
        .map(|(n, candidate)| {
            ListItem::new(format!(
                "{}. {}  ->  {}",
                n + 1,
                candidate.identity,
                candidate.destination(&app.format).display()
            ))
        })
        .collect();
    rows.push(ListItem::new("Skip this file").style(Style::default().fg(Color::Red)));

    let title = format!("Candidates for {}", item.proposal.media.file_name);
    let list = List::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let area = centered_rect(80, 50, f.area());
    f.render_widget(Clear, area);
    if let Some(state) = app.picker.as_mut() {
        f.render_stateful_widget(list, area, state);
    }
}

fn render_help_popup(f: &mut Frame) {
    let help = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("j/k, arrows  move selection"),
        Line::from("y / n        approve / decline and advance"),
        Line::from("space        toggle approval"),
        Line::from("a            accept all"),
        Line::from("c            choose another candidate"),
        Line::from("Enter        perform approved moves"),
        Line::from("q / Esc      quit without moving anything"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(help).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

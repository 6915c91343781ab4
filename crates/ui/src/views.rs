//! Phase screens: login, intro, active question, summary.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table, Wrap},
};

use keydrill_core::model::LeaderboardEntry;
use keydrill_core::session::Phase;

use crate::app::{LoginField, Notice, UiApp};

const ACCENT: Color = Color::Yellow;
const PRIMARY: Color = Color::Blue;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &UiApp) {
    match app.session().phase() {
        Phase::Login => draw_login(frame, app),
        Phase::Intro => draw_intro(frame, app),
        Phase::Active => draw_active(frame, app),
        Phase::Summary => draw_summary(frame, app),
    }
}

fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Centers a fixed-size box inside the given area, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn draw_login(frame: &mut Frame, app: &UiApp) {
    let area = centered(frame.area(), 46, 12);
    let block = Block::default()
        .title(" keydrill login ")
        .title_style(title_style())
        .borders(Borders::ALL);
    frame.render_widget(block, area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1), // error line
            Constraint::Length(1),
            Constraint::Length(1), // name
            Constraint::Length(1), // password
            Constraint::Length(1),
            Constraint::Min(1), // hint
        ])
        .split(area);

    if let Some(error) = &app.login.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            inner[0],
        );
    }

    let field_style = |field: LoginField| {
        if app.login.focus == field {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        }
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Name:     ", field_style(LoginField::Name)),
            Span::raw(app.login.name.as_str()),
            cursor_span(app.login.focus == LoginField::Name),
        ])),
        inner[2],
    );

    let masked = "*".repeat(app.login.password.chars().count());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Password: ", field_style(LoginField::Password)),
            Span::raw(masked),
            cursor_span(app.login.focus == LoginField::Password),
        ])),
        inner[3],
    );

    frame.render_widget(
        Paragraph::new("Tab switches fields, Enter logs in, F10 quits").style(muted()),
        inner[5],
    );
}

fn cursor_span(focused: bool) -> Span<'static> {
    if focused {
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))
    } else {
        Span::raw("")
    }
}

fn draw_intro(frame: &mut Frame, app: &UiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(4), // instructions
            Constraint::Min(5),    // catalog
            Constraint::Length(8), // leaderboard
            Constraint::Length(1), // hint
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new("Welcome to keydrill")
            .style(title_style())
            .alignment(Alignment::Center),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(
            "Each round shows a task; press the matching keyboard shortcut. \
             The faster you answer, the more points you earn: 15 points drop \
             to 0 over fifteen seconds. You get one free retry per question.",
        )
        .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let rows: Vec<Row> = app
        .session()
        .questions()
        .iter()
        .map(|q| {
            Row::new(vec![
                q.display().to_string(),
                q.description().to_string(),
            ])
        })
        .collect();
    let catalog = Table::new(rows, [Constraint::Length(24), Constraint::Min(20)])
        .header(Row::new(vec!["Shortcut", "Description"]).style(title_style()))
        .block(
            Block::default()
                .title(" shortcuts you will practice ")
                .borders(Borders::ALL),
        );
    frame.render_widget(catalog, chunks[2]);

    draw_leaderboard(frame, chunks[3], " all scores ", &app.leaderboard, None);

    frame.render_widget(
        Paragraph::new("Press Enter to start").style(muted()),
        chunks[4],
    );
}

fn draw_active(frame: &mut Frame, app: &UiApp) {
    let session = app.session();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(3), // progress
            Constraint::Length(1), // counter
            Constraint::Length(3), // task
            Constraint::Length(2), // notice
            Constraint::Min(0),
            Constraint::Length(1), // hint
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new("keydrill")
            .style(title_style())
            .alignment(Alignment::Center),
        chunks[0],
    );

    let total = session.total().max(1);
    let ratio = session.current_index() as f64 / total as f64;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(PRIMARY))
        .label(format!("{}/{}", session.current_index(), session.total()))
        .ratio(ratio.clamp(0.0, 1.0));
    frame.render_widget(gauge, chunks[1]);

    frame.render_widget(
        Paragraph::new(format!(
            "Question {} of {}",
            session.current_index() + 1,
            session.total()
        ))
        .alignment(Alignment::Center),
        chunks[2],
    );

    let description = session
        .current_question()
        .map(|q| q.description().to_string())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Press the shortcut for: "),
            Span::styled(description, Style::default().add_modifier(Modifier::BOLD)),
        ]))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center),
        chunks[3],
    );

    if let Some(notice) = &app.notice {
        let (text, style) = match notice {
            Notice::Correct { points } => (
                format!("Correct! +{points} points"),
                Style::default().fg(Color::Green),
            ),
            Notice::TryAgain => (
                "Try again.".to_string(),
                Style::default().fg(Color::Red),
            ),
            Notice::Reveal { answer } => (
                format!("Wrong, the answer is '{answer}'. On to the next question."),
                Style::default().fg(Color::Red),
            ),
        };
        frame.render_widget(
            Paragraph::new(text).style(style).alignment(Alignment::Center),
            chunks[4],
        );
    }

    frame.render_widget(
        Paragraph::new("Esc restarts, F10 quits").style(muted()),
        chunks[6],
    );
}

fn draw_summary(frame: &mut Frame, app: &UiApp) {
    let session = app.session();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),  // title
            Constraint::Length(2),  // total
            Constraint::Min(6),     // per-question table
            Constraint::Length(9),  // top 5 + ranking
            Constraint::Length(1),  // hint
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new("Finished!")
            .style(title_style())
            .alignment(Alignment::Center),
        chunks[0],
    );

    let mut total_line = vec![Span::styled(
        format!(
            "Total score: {} out of a possible {}",
            session.score(),
            session.max_score()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(improvement) = app.improvement {
        let text = match improvement {
            1.. => format!("  ({improvement} better than your previous best)"),
            0 => "  (matching your previous best)".to_string(),
            _ => format!("  ({} short of your previous best)", -improvement),
        };
        total_line.push(Span::styled(text, muted()));
    }
    frame.render_widget(
        Paragraph::new(Line::from(total_line)).alignment(Alignment::Center),
        chunks[1],
    );

    let rows: Vec<Row> = session
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Row::new(vec![
                format!("{}", i + 1),
                record.question.clone(),
                format!("{}s", record.elapsed),
                format!("{}", record.points),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(24),
            Constraint::Length(7),
            Constraint::Length(6),
        ],
    )
    .header(Row::new(vec!["#", "Question", "Time", "Points"]).style(title_style()))
    .block(Block::default().title(" per question ").borders(Borders::ALL));
    frame.render_widget(table, chunks[2]);

    let top: Vec<LeaderboardEntry> = app.leaderboard.iter().take(5).cloned().collect();
    draw_leaderboard(frame, chunks[3], " top 5 scores ", &top, app.ranking);

    frame.render_widget(
        Paragraph::new("Enter plays again, F10 quits").style(muted()),
        chunks[4],
    );
}

fn draw_leaderboard(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[LeaderboardEntry],
    ranking: Option<usize>,
) {
    let mut lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Line::from(format!("{}. {} - {} points", i + 1, entry.name, entry.score))
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("no scores yet", muted())));
    }
    if let Some(rank) = ranking {
        lines.push(Line::from(Span::styled(
            format!("Congratulations, you are number {rank}!"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }
    let board = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(board, area);
}

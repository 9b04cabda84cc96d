use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::Theme;
use crate::git::FileStatus;
use crate::workflow::{Focus, Session, TextInput, SUBJECT_LIMIT};

const HELP: &str = "Ctrl+S commit & switch  Ctrl+T stash & switch  Esc cancel  Tab focus  Space expand";

fn centered(area: Rect) -> Rect {
    let width = area.width.saturating_sub(6).clamp(20, 100);
    let height = area.height.saturating_sub(4).clamp(12, 36);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn status_color(status: FileStatus, theme: &Theme) -> ratatui::style::Color {
    match status {
        FileStatus::Added => theme.diff_add,
        FileStatus::Deleted => theme.diff_remove,
        FileStatus::Unmerged => theme.log_error,
        FileStatus::Unknown => theme.untracked,
        _ => theme.unstaged,
    }
}

fn diff_line<'a>(line: &'a str, theme: &Theme) -> Line<'a> {
    let color = if line.starts_with("===") || line.starts_with("@@") {
        theme.diff_hunk
    } else if line.starts_with('+') {
        theme.diff_add
    } else if line.starts_with('-') {
        theme.diff_remove
    } else {
        theme.muted
    };
    Line::styled(format!("      {}", line), Style::default().fg(color))
}

fn file_lines<'a>(session: &'a Session, theme: &Theme, diff_lines: usize) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let focused = session.focus == Focus::Files;

    for (i, change) in session.changes.iter().enumerate() {
        let selected = i == session.selected;
        let expanded = session.is_expanded(&change.path);
        let pointer = if selected && focused { "> " } else { "  " };
        let fold = if expanded { "▾ " } else { "▸ " };

        let mut row = Style::default().fg(theme.foreground);
        if selected {
            row = row.bg(theme.selection).add_modifier(Modifier::BOLD);
        }

        lines.push(Line::from(vec![
            Span::styled(pointer, row),
            Span::styled(fold, row.fg(theme.muted)),
            Span::styled(
                format!("{} {:<2} ", change.status.symbol(), change.sides()),
                row.fg(status_color(change.status, theme)),
            ),
            Span::styled(change.path.clone(), row),
            Span::styled(format!("  +{}", change.lines_added), row.fg(theme.diff_add)),
            Span::styled(format!(" -{}", change.lines_deleted), row.fg(theme.diff_remove)),
        ]));

        if expanded {
            if let Some(diff) = session.diff_for(&change.path) {
                let total = diff.lines().count();
                lines.extend(diff.lines().take(diff_lines).map(|l| diff_line(l, theme)));
                if total > diff_lines {
                    lines.push(Line::styled(
                        format!("      … {} more lines", total - diff_lines),
                        Style::default().fg(theme.muted),
                    ));
                }
            }
        }
    }
    lines
}

fn input_box<'a>(input: &'a TextInput, title: String, focused: bool, theme: &Theme) -> Paragraph<'a> {
    let border = if focused { theme.border_focused } else { theme.border };
    Paragraph::new(input.text())
        .style(Style::default().fg(theme.foreground))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        )
}

/// Cursor cell of a single-line input, clamped to the box.
fn cursor_in(area: Rect, input: &TextInput) -> (u16, u16) {
    let inner_width = area.width.saturating_sub(2).max(1);
    let cursor = input.cursor() as u16;
    (area.x + 1 + cursor.min(inner_width - 1), area.y + 1)
}

/// Cursor cell of the multi-line body, following explicit line breaks.
fn body_cursor(area: Rect, input: &TextInput) -> (u16, u16) {
    let before: String = input.text().chars().take(input.cursor()).collect();
    let row = before.matches('\n').count() as u16;
    let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) as u16;
    let max_x = area.width.saturating_sub(3);
    let max_y = area.height.saturating_sub(3);
    (area.x + 1 + col.min(max_x), area.y + 1 + row.min(max_y))
}

pub fn render(frame: &mut Frame, session: &Session, theme: &Theme, diff_lines: usize) {
    let area = centered(frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Uncommitted changes ")
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [intro, files, subject, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(2),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Switching to "),
            Span::styled(
                session.target.display.clone(),
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
            ),
            Span::raw(": commit or stash your changes first"),
        ]))
        .style(Style::default().fg(theme.foreground)),
        intro,
    );

    let file_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Files ({}) ", session.changes.len()))
        .border_style(Style::default().fg(if session.focus == Focus::Files {
            theme.border_focused
        } else {
            theme.border
        }));
    let lines = file_lines(session, theme, diff_lines);
    // Keep the selected file in view.
    let visible = files.height.saturating_sub(2) as usize;
    let selected_row = lines_before_selection(session, diff_lines);
    let scroll = selected_row.saturating_sub(visible.saturating_sub(1)) as u16;
    frame.render_widget(Paragraph::new(lines).block(file_block).scroll((scroll, 0)), files);

    let subject_title = format!(" Subject ({}/{}) ", session.subject.len(), SUBJECT_LIMIT);
    frame.render_widget(
        input_box(&session.subject, subject_title, session.focus == Focus::Subject, theme),
        subject,
    );
    frame.render_widget(
        input_box(&session.body, " Body (optional) ".to_string(), session.focus == Focus::Body, theme),
        body,
    );

    let mut footer_lines = Vec::new();
    if let Some(notice) = &session.notice {
        footer_lines.push(Line::styled(notice.clone(), Style::default().fg(theme.log_error)));
    }
    footer_lines.push(Line::styled(HELP, Style::default().fg(theme.muted)));
    frame.render_widget(Paragraph::new(footer_lines), footer);

    match session.focus {
        Focus::Subject => frame.set_cursor_position(cursor_in(subject, &session.subject)),
        Focus::Body => frame.set_cursor_position(body_cursor(body, &session.body)),
        Focus::Files => {}
    }
}

fn lines_before_selection(session: &Session, diff_lines: usize) -> usize {
    session
        .changes
        .iter()
        .take(session.selected)
        .map(|change| {
            let extra = if session.is_expanded(&change.path) {
                session
                    .diff_for(&change.path)
                    .map(|d| {
                        let total = d.lines().count();
                        total.min(diff_lines) + usize::from(total > diff_lines)
                    })
                    .unwrap_or(0)
            } else {
                0
            };
            1 + extra
        })
        .sum()
}

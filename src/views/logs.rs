use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::logger::{LogLevel, LogLine, LogViewer};

fn level_color(level: LogLevel, theme: &Theme) -> ratatui::style::Color {
    match level {
        LogLevel::Debug => theme.log_debug,
        LogLevel::Info => theme.log_info,
        LogLevel::Warn => theme.log_warn,
        LogLevel::Error => theme.log_error,
        LogLevel::Success => theme.log_success,
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    lines: &[LogLine],
    viewer: &LogViewer,
    focused: bool,
) {
    let border_color = if focused { theme.border_focused } else { theme.border };
    let title = if viewer.is_following() {
        " Logs ".to_string()
    } else {
        " Logs (scrolled) ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));

    let visible: Vec<Line> = lines[viewer.window(lines.len())]
        .iter()
        .map(|line| {
            let color = level_color(line.level, theme);
            Line::from(vec![
                Span::styled(
                    format!("{} ", line.time.format("%H:%M:%S")),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(format!("[{:<5}] ", line.level.label()), Style::default().fg(color)),
                Span::styled(line.message.clone(), Style::default().fg(theme.foreground)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

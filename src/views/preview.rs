use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::truncate;
use crate::config::Theme;
use crate::git::CommitInfo;

const SUBJECT_WIDTH: usize = 50;

/// Latest commits of the selected branch.
#[derive(Debug, Default)]
pub struct PreviewView {
    pub branch: Option<String>,
    pub commits: Vec<CommitInfo>,
}

impl PreviewView {
    pub fn update(&mut self, branch: Option<String>, commits: Vec<CommitInfo>) {
        self.branch = branch;
        self.commits = commits;
    }

    pub fn clear(&mut self) {
        self.branch = None;
        self.commits.clear();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title = match &self.branch {
            Some(branch) => format!(" Recent commits on {} ", branch),
            None => " Recent commits ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(theme.border));

        let lines: Vec<Line> = if self.commits.is_empty() {
            vec![Line::styled("No commits to show", Style::default().fg(theme.muted))]
        } else {
            self.commits
                .iter()
                .map(|commit| {
                    Line::from(vec![
                        Span::styled(format!("{} ", commit.short_id), Style::default().fg(theme.diff_hunk)),
                        Span::styled(
                            format!("{:<16}", commit.relative_time()),
                            Style::default().fg(theme.muted),
                        ),
                        Span::styled(format!("{:<16} ", truncate(&commit.author, 16)), Style::default().fg(theme.branch_local)),
                        Span::styled(truncate(&commit.subject, SUBJECT_WIDTH), Style::default().fg(theme.foreground)),
                    ])
                })
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

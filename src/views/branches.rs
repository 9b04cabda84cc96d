use chrono::Local;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use super::truncate;
use crate::config::Theme;
use crate::git::Branch;

const MESSAGE_WIDTH: usize = 60;

pub struct BranchesView {
    pub branches: Vec<Branch>,
    pub current: Option<String>,
    state: TableState,
}

impl Default for BranchesView {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchesView {
    pub fn new() -> Self {
        Self {
            branches: Vec::new(),
            current: None,
            state: TableState::default(),
        }
    }

    /// Replace the listing and put the cursor on the first row.
    pub fn update(&mut self, branches: Vec<Branch>, current: Option<String>) {
        self.branches = branches;
        self.current = current;
        self.state = TableState::default();
        if !self.branches.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn selected_branch(&self) -> Option<&Branch> {
        self.state.selected().and_then(|i| self.branches.get(i))
    }

    /// Returns whether the selection changed.
    pub fn move_up(&mut self) -> bool {
        let len = self.branches.len();
        if len == 0 {
            return false;
        }
        let selected = self.state.selected().unwrap_or(0);
        // Wrap to last item
        let next = if selected > 0 { selected - 1 } else { len - 1 };
        self.state.select(Some(next));
        next != selected
    }

    pub fn move_down(&mut self) -> bool {
        let len = self.branches.len();
        if len == 0 {
            return false;
        }
        let selected = self.state.selected().unwrap_or(0);
        let next = if selected + 1 < len { selected + 1 } else { 0 };
        self.state.select(Some(next));
        next != selected
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let border_color = if focused { theme.border_focused } else { theme.border };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let header = Row::new(["Branch", "Last Used", "Last Commit", "Commit Message"])
            .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = if self.branches.is_empty() {
            vec![Row::new([Cell::from("No branches found")]).style(Style::default().fg(theme.muted))]
        } else {
            self.branches
                .iter()
                .map(|branch| {
                    let is_current = !branch.is_remote && Some(&branch.name) == self.current.as_ref();
                    let name_color = if is_current {
                        theme.branch_current
                    } else if branch.is_remote {
                        theme.branch_remote
                    } else {
                        theme.branch_local
                    };
                    let marker = if is_current { "* " } else { "  " };

                    Row::new(vec![
                        Cell::from(Line::from(format!("{}{}", marker, branch.name)))
                            .style(Style::default().fg(name_color)),
                        Cell::from(branch.relative_time.clone()),
                        Cell::from(
                            branch
                                .commit_time
                                .with_timezone(&Local)
                                .format("%Y-%m-%d")
                                .to_string(),
                        ),
                        Cell::from(truncate(&branch.subject, MESSAGE_WIDTH)),
                    ])
                    .style(Style::default().fg(theme.foreground))
                })
                .collect()
        };

        let widths = [
            Constraint::Percentage(30),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(theme.selection_text)
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD),
            );

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

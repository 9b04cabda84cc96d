use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{debug, error, info};

use crate::cli::ListOptions;
use crate::config::{Config, Theme};
use crate::error::{Error, Result};
use crate::git::{SwitchTarget, Vcs};
use crate::guard::ChangeGuard;
use crate::input::{modal_action, normal_action, Action, EventReader, ModalAction};
use crate::logger::{LogBuffer, LogViewer, VISIBLE_LOG_LINES};
use crate::resolver::Resolver;
use crate::switch::{Applied, Began, Switcher};
use crate::tui::Terminal;
use crate::views::{logs, switch_modal, BranchesView, PreviewView};
use crate::workflow::SwitchWorkflow;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);
const MAX_PREVIEW_ROWS: usize = 50;

/// Preview panel height: the commit rows plus borders.
fn preview_height(commits: usize) -> u16 {
    commits.min(MAX_PREVIEW_ROWS) as u16 + 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Branches,
    Logs,
}

/// Follow-up work queued by key handling and run before the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    SelectionChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct App<V: Vcs> {
    vcs: V,
    config: Config,
    options: ListOptions,
    theme: Theme,

    pub branches_view: BranchesView,
    pub preview_view: PreviewView,
    pub workflow: SwitchWorkflow,
    logs: LogBuffer,
    log_viewer: LogViewer,

    pub focused_panel: Panel,
    pub message: Option<StatusMessage>,
    events: VecDeque<AppEvent>,
    pub should_quit: bool,
}

impl<V: Vcs> App<V> {
    pub fn new(vcs: V, config: Config, options: ListOptions, logs: LogBuffer) -> Self {
        let theme = config.current_theme();
        Self {
            vcs,
            config,
            options,
            theme,
            branches_view: BranchesView::new(),
            preview_view: PreviewView::default(),
            workflow: SwitchWorkflow::new(),
            logs,
            log_viewer: LogViewer::default(),
            focused_panel: Panel::Branches,
            message: None,
            events: VecDeque::new(),
            should_quit: false,
        }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// First listing. Failures here end the program.
    pub fn load(&mut self) -> Result<()> {
        self.refresh()?;
        self.process_events();
        Ok(())
    }

    pub fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        let mut reader = EventReader::new();
        terminal.init()?;

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if let Some(key) = reader.read_key(POLL_TIMEOUT)? {
                self.handle_key(key);
            }

            if self.should_quit {
                break;
            }
        }

        terminal.restore()?;
        info!("Exiting");
        Ok(())
    }

    pub fn title(&self) -> String {
        let scope = if self.options.include_remote {
            "local + remote"
        } else {
            "local only"
        };
        match self.options.filter.label() {
            Some(authors) => format!("Recent Git Branches ({}, {} branches)", authors, scope),
            None => format!("Recent Git Branches ({} branches)", scope),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.workflow.is_open() {
            self.handle_modal_key(key);
        } else if let Some(action) = normal_action(&key) {
            self.handle_action(action);
        }
        self.process_events();
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Up if self.focused_panel == Panel::Logs => {
                self.log_viewer.scroll_up(self.logs.len());
            }
            Action::Down if self.focused_panel == Panel::Logs => {
                self.log_viewer.scroll_down(self.logs.len());
            }
            Action::Up => {
                if self.branches_view.move_up() {
                    self.events.push_back(AppEvent::SelectionChanged);
                }
            }
            Action::Down => {
                if self.branches_view.move_down() {
                    self.events.push_back(AppEvent::SelectionChanged);
                }
            }
            Action::Switch => self.request_switch(),
            Action::Refresh => {
                if self.refresh_or_report() {
                    self.set_message("Refreshed", false);
                }
            }
            Action::ClearMessage => self.message = None,
            Action::ClearLogs => {
                self.logs.clear();
                self.log_viewer.reset();
            }
            Action::ToggleLogFocus => {
                self.focused_panel = match self.focused_panel {
                    Panel::Branches => Panel::Logs,
                    Panel::Logs => Panel::Branches,
                };
            }
            Action::ToggleTheme => {
                self.config.toggle_theme();
                self.theme = self.config.current_theme();
            }
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(focus) = self.workflow.session().map(|s| s.focus) else {
            return;
        };
        let Some(action) = modal_action(&key, focus) else {
            return;
        };

        match action {
            ModalAction::Commit => {
                if self.workflow.latch_commit() {
                    self.finish_decision();
                }
            }
            ModalAction::Stash => {
                if self.workflow.latch_stash() {
                    self.finish_decision();
                }
            }
            ModalAction::Cancel => {
                if self.workflow.latch_cancel() {
                    self.finish_decision();
                }
            }
            ModalAction::FocusNext => self.workflow.focus_next(),
            ModalAction::FocusPrev => self.workflow.focus_prev(),
            ModalAction::Up | ModalAction::Down => self.navigate_modal(action),
            ModalAction::ToggleExpand => {
                if let Some(path) = self.workflow.toggle_expanded() {
                    self.load_diff(path);
                }
            }
            edit => {
                if let Some(input) = self.workflow.session_mut().and_then(|s| s.active_input()) {
                    match edit {
                        ModalAction::Insert(c) => input.insert_char(c),
                        ModalAction::Backspace => input.backspace(),
                        ModalAction::Delete => input.delete(),
                        ModalAction::Left => input.move_left(),
                        ModalAction::Right => input.move_right(),
                        ModalAction::Home => input.home(),
                        ModalAction::End => input.end(),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Arrows move through files, or hop between subject and body.
    fn navigate_modal(&mut self, action: ModalAction) {
        use crate::workflow::Focus;

        let Some(focus) = self.workflow.session().map(|s| s.focus) else {
            return;
        };
        match (focus, action) {
            (Focus::Files, ModalAction::Up) => self.workflow.select_prev(),
            (Focus::Files, _) => self.workflow.select_next(),
            (Focus::Subject, ModalAction::Down) => self.workflow.focus_next(),
            (Focus::Body, ModalAction::Up) => self.workflow.focus_prev(),
            _ => {}
        }
    }

    fn load_diff(&mut self, path: String) {
        let diff = match ChangeGuard::new(&self.vcs).diff(&path) {
            Ok(diff) => diff,
            Err(e) => {
                debug!(path = %path, error = %e, "No diff for file");
                String::new()
            }
        };
        self.workflow.store_diff(path, diff);
    }

    fn process_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            match event {
                AppEvent::SelectionChanged => self.on_selection_changed(),
            }
        }
    }

    fn on_selection_changed(&mut self) {
        let Some(branch) = self.branches_view.selected_branch() else {
            self.preview_view.clear();
            return;
        };
        let name = branch.name.clone();
        let rev = branch.rev();

        match self.vcs.recent_commits(&rev, self.config.preview_commits) {
            Ok(commits) => self.preview_view.update(Some(name), commits),
            Err(e) => {
                error!(branch = %name, error = %e, "Could not load commit preview");
                self.preview_view.update(Some(name), Vec::new());
            }
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let resolver = Resolver::new(&self.vcs, self.config.resolver_options());
        let branches = resolver.resolve(
            self.options.limit,
            self.options.include_remote,
            &self.options.filter,
        )?;
        let current = self.vcs.current_branch().unwrap_or(None);

        self.branches_view.update(branches, current);
        self.events.push_back(AppEvent::SelectionChanged);
        Ok(())
    }

    fn refresh_or_report(&mut self) -> bool {
        match self.refresh() {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Refresh failed");
                self.set_message(&e.user_message(), true);
                false
            }
        }
    }

    fn request_switch(&mut self) {
        let Some(target) = self.branches_view.selected_branch().map(SwitchTarget::from) else {
            return;
        };

        match Switcher::new(&self.vcs).begin(&target) {
            Ok(Began::Switched) => {
                self.set_message(&format!("Switched to {}", target.name), false);
                self.refresh_or_report();
            }
            Ok(Began::NeedsDecision(changes)) => {
                info!(branch = %target.name, files = changes.len(), "Uncommitted changes, asking what to do");
                self.workflow.open(target, changes);
            }
            Err(e @ Error::AlreadyOnBranch(_)) => {
                self.set_message(&e.user_message(), false);
            }
            Err(e) => {
                error!(branch = %target.name, error = %e, "Switch failed");
                self.set_message(&e.user_message(), true);
            }
        }
    }

    /// Carry out the latched decision and close the dialog.
    fn finish_decision(&mut self) {
        let Some((target, decision)) = self.workflow.take_decision() else {
            return;
        };
        let result = Switcher::new(&self.vcs).apply(&target, &decision);
        self.workflow.close();

        match result {
            Ok(Some(Applied::Committed)) => {
                self.set_message(&format!("Committed and switched to {}", target.name), false);
                self.refresh_or_report();
            }
            Ok(Some(Applied::Stashed)) => {
                self.set_message(&format!("Stashed changes and switched to {}", target.name), false);
                self.refresh_or_report();
            }
            Ok(Some(Applied::Cancelled)) => self.set_message("Switch cancelled", false),
            Ok(None) => {}
            Err(e) => {
                error!(branch = %target.name, error = %e, "Switch workflow failed");
                self.set_message(&e.user_message(), true);
                if e.is_partial() {
                    self.refresh_or_report();
                }
            }
        }
    }

    fn set_message(&mut self, text: &str, is_error: bool) {
        self.message = Some(StatusMessage {
            text: text.to_string(),
            is_error,
        });
    }

    fn draw(&mut self, frame: &mut Frame) {
        let theme = self.theme.clone();
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(theme.background)),
            frame.area(),
        );

        let [title, table, preview, log_area, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(preview_height(self.config.preview_commits)),
            Constraint::Length(VISIBLE_LOG_LINES as u16 + 2),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Line::styled(
                self.title(),
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
            )),
            title,
        );

        self.branches_view
            .render(frame, table, &theme, self.focused_panel == Panel::Branches);
        self.preview_view.render(frame, preview, &theme);
        logs::render(
            frame,
            log_area,
            &theme,
            &self.logs.snapshot(),
            &self.log_viewer,
            self.focused_panel == Panel::Logs,
        );
        self.render_footer(frame, footer, &theme);

        if let Some(session) = self.workflow.session() {
            switch_modal::render(frame, session, &theme, self.config.diff_preview_lines);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let line = match &self.message {
            Some(message) => {
                let color = if message.is_error { theme.log_error } else { theme.log_success };
                Line::styled(message.text.clone(), Style::default().fg(color))
            }
            None => {
                let keys = [
                    ("↑↓/jk", "move"),
                    ("enter", "switch"),
                    ("r", "refresh"),
                    ("tab", "logs"),
                    ("l", "clear logs"),
                    ("T", "theme"),
                    ("q", "quit"),
                ];
                let mut spans = Vec::new();
                for (i, (key, desc)) in keys.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" │ ", Style::default().fg(theme.border)));
                    }
                    spans.push(Span::styled(*key, Style::default().fg(theme.border_focused)));
                    spans.push(Span::styled(format!(" {}", desc), Style::default().fg(theme.muted)));
                }
                Line::from(spans)
            }
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::git::{ChangeEntry, SwitchTarget};

pub const SUBJECT_LIMIT: usize = 72;

/// Single-field text editor. The cursor counts characters, not bytes.
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    buf: String,
    cursor: usize,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn with_limit(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.buf
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.buf.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.buf.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    /// Ignored once the limit is reached.
    pub fn insert_char(&mut self, c: char) {
        if self.max_chars.is_some_and(|max| self.len() >= max) {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.buf.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buf.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.buf.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buf
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.buf.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Files,
    Subject,
    Body,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Files => Focus::Subject,
            Focus::Subject => Focus::Body,
            Focus::Body => Focus::Files,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Files => Focus::Body,
            Focus::Subject => Focus::Files,
            Focus::Body => Focus::Subject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchDecision {
    None,
    Commit { subject: String, body: String },
    Stash,
    Cancel,
}

impl SwitchDecision {
    /// `subject`, or `subject`, a blank line and `body` when there is a body.
    /// The body keeps its leading indentation.
    pub fn commit_message(subject: &str, body: &str) -> String {
        let subject = subject.trim();
        let body = body.trim_end();
        if body.trim().is_empty() {
            subject.to_string()
        } else {
            format!("{}\n\n{}", subject, body)
        }
    }
}

/// Everything the dialog shows and edits while it is open. Rebuilt on
/// every `open`, so nothing leaks between switches.
#[derive(Debug)]
pub struct Session {
    pub target: SwitchTarget,
    pub changes: Vec<ChangeEntry>,
    pub selected: usize,
    pub focus: Focus,
    pub subject: TextInput,
    pub body: TextInput,
    expanded: HashSet<String>,
    diffs: HashMap<String, String>,
    decision: SwitchDecision,
    /// Why the last commit attempt was refused.
    pub notice: Option<String>,
}

impl Session {
    fn new(target: SwitchTarget, changes: Vec<ChangeEntry>) -> Self {
        Self {
            target,
            changes,
            selected: 0,
            focus: Focus::Files,
            subject: TextInput::with_limit(SUBJECT_LIMIT),
            body: TextInput::default(),
            expanded: HashSet::new(),
            diffs: HashMap::new(),
            decision: SwitchDecision::None,
            notice: None,
        }
    }

    pub fn decision(&self) -> &SwitchDecision {
        &self.decision
    }

    pub fn selected_change(&self) -> Option<&ChangeEntry> {
        self.changes.get(self.selected)
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn diff_for(&self, path: &str) -> Option<&str> {
        self.diffs.get(path).map(String::as_str)
    }

    /// Input that receives typed characters, if any.
    pub fn active_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::Files => None,
            Focus::Subject => Some(&mut self.subject),
            Focus::Body => Some(&mut self.body),
        }
    }
}

/// Commit / stash / cancel dialog guarding a switch away from a dirty tree.
#[derive(Debug, Default)]
pub struct SwitchWorkflow {
    session: Option<Session>,
}

impl SwitchWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, target: SwitchTarget, changes: Vec<ChangeEntry>) {
        debug!(target = %target.name, files = changes.len(), "Opening switch dialog");
        self.session = Some(Session::new(target, changes));
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Refused while the subject is blank; the dialog stays open either way.
    pub fn latch_commit(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.subject.is_blank() {
            session.notice = Some("Commit subject is required".to_string());
            session.focus = Focus::Subject;
            return false;
        }
        session.notice = None;
        session.decision = SwitchDecision::Commit {
            subject: session.subject.text().trim().to_string(),
            body: session.body.text().to_string(),
        };
        true
    }

    pub fn latch_stash(&mut self) -> bool {
        self.latch(SwitchDecision::Stash)
    }

    pub fn latch_cancel(&mut self) -> bool {
        self.latch(SwitchDecision::Cancel)
    }

    fn latch(&mut self, decision: SwitchDecision) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.decision = decision;
                true
            }
            None => false,
        }
    }

    /// Hand over the latched decision. Returns it once; later calls see none.
    pub fn take_decision(&mut self) -> Option<(SwitchTarget, SwitchDecision)> {
        let session = self.session.as_mut()?;
        if session.decision == SwitchDecision::None {
            return None;
        }
        let decision = std::mem::replace(&mut session.decision, SwitchDecision::None);
        Some((session.target.clone(), decision))
    }

    pub fn focus_next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.focus = session.focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.focus = session.focus.prev();
        }
    }

    pub fn select_next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.selected + 1 < session.changes.len() {
                session.selected += 1;
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.selected = session.selected.saturating_sub(1);
        }
    }

    /// Expand or collapse the selected file. Returns the path when it was
    /// expanded and its diff has not been loaded yet.
    pub fn toggle_expanded(&mut self) -> Option<String> {
        let session = self.session.as_mut()?;
        let path = session.selected_change()?.path.clone();
        if session.expanded.remove(&path) {
            return None;
        }
        session.expanded.insert(path.clone());
        (!session.diffs.contains_key(&path)).then_some(path)
    }

    pub fn store_diff(&mut self, path: String, diff: String) {
        if let Some(session) = self.session.as_mut() {
            session.diffs.insert(path, diff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dirty_workflow() -> SwitchWorkflow {
        let mut workflow = SwitchWorkflow::new();
        workflow.open(
            SwitchTarget::local("feature-x"),
            vec![
                ChangeEntry::new("src/lib.rs", ' ', 'M'),
                ChangeEntry::new("README.md", 'M', ' '),
            ],
        );
        workflow
    }

    fn type_text(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.insert_char(c);
        }
    }

    #[test]
    fn empty_subject_never_latches_commit() {
        let mut workflow = dirty_workflow();
        assert!(!workflow.latch_commit());

        let session = workflow.session_mut().unwrap();
        type_text(&mut session.subject, "   ");
        assert!(!workflow.latch_commit());

        assert!(workflow.is_open());
        assert_eq!(workflow.take_decision(), None);
        let session = workflow.session().unwrap();
        assert_eq!(session.focus, Focus::Subject);
        assert!(session.notice.is_some());
    }

    #[test]
    fn commit_latches_with_subject_and_body() {
        let mut workflow = dirty_workflow();
        let session = workflow.session_mut().unwrap();
        type_text(&mut session.subject, "  Fix parser ");
        type_text(&mut session.body, "Details");

        assert!(workflow.latch_commit());
        assert!(workflow.is_open());
        let (target, decision) = workflow.take_decision().unwrap();
        assert_eq!(target.name, "feature-x");
        assert_eq!(
            decision,
            SwitchDecision::Commit {
                subject: "Fix parser".to_string(),
                body: "Details".to_string(),
            }
        );
    }

    #[test]
    fn decision_is_consumed_once() {
        let mut workflow = dirty_workflow();
        assert!(workflow.latch_stash());
        assert_eq!(
            workflow.take_decision().map(|(_, d)| d),
            Some(SwitchDecision::Stash)
        );
        assert_eq!(workflow.take_decision(), None);
    }

    #[test]
    fn reopening_resets_session_state() {
        let mut workflow = dirty_workflow();
        workflow.select_next();
        workflow.focus_next();
        workflow.toggle_expanded();
        let session = workflow.session_mut().unwrap();
        type_text(&mut session.subject, "half written");
        workflow.latch_cancel();

        workflow.open(SwitchTarget::local("other"), vec![ChangeEntry::new("a", ' ', 'M')]);
        let session = workflow.session().unwrap();
        assert_eq!(session.target.name, "other");
        assert_eq!(session.decision(), &SwitchDecision::None);
        assert_eq!(session.selected, 0);
        assert_eq!(session.focus, Focus::Files);
        assert!(session.subject.is_empty());
        assert!(!session.is_expanded("README.md"));
    }

    #[test]
    fn closed_workflow_latches_nothing() {
        let mut workflow = SwitchWorkflow::new();
        assert!(!workflow.latch_stash());
        assert!(!workflow.latch_commit());
        assert_eq!(workflow.take_decision(), None);
    }

    #[test]
    fn cancel_then_close() {
        let mut workflow = dirty_workflow();
        workflow.latch_cancel();
        assert_eq!(
            workflow.take_decision().map(|(_, d)| d),
            Some(SwitchDecision::Cancel)
        );
        workflow.close();
        assert!(!workflow.is_open());
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(Focus::Files.next(), Focus::Subject);
        assert_eq!(Focus::Subject.next(), Focus::Body);
        assert_eq!(Focus::Body.next(), Focus::Files);
        assert_eq!(Focus::Files.prev(), Focus::Body);
    }

    #[test]
    fn file_selection_is_bounded() {
        let mut workflow = dirty_workflow();
        workflow.select_prev();
        assert_eq!(workflow.session().unwrap().selected, 0);
        workflow.select_next();
        workflow.select_next();
        assert_eq!(workflow.session().unwrap().selected, 1);
    }

    #[test]
    fn expanding_requests_diff_once() {
        let mut workflow = dirty_workflow();
        assert_eq!(workflow.toggle_expanded().as_deref(), Some("src/lib.rs"));
        workflow.store_diff("src/lib.rs".to_string(), "diff".to_string());
        assert_eq!(workflow.toggle_expanded(), None);
        assert!(!workflow.session().unwrap().is_expanded("src/lib.rs"));
        assert_eq!(workflow.toggle_expanded(), None);
        assert!(workflow.session().unwrap().is_expanded("src/lib.rs"));
        assert_eq!(workflow.session().unwrap().diff_for("src/lib.rs"), Some("diff"));
    }

    #[test]
    fn subject_is_capped() {
        let mut input = TextInput::with_limit(SUBJECT_LIMIT);
        type_text(&mut input, &"a".repeat(100));
        assert_eq!(input.len(), SUBJECT_LIMIT);
    }

    #[test]
    fn text_input_edits_multibyte_text() {
        let mut input = TextInput::default();
        type_text(&mut input, "héllo");
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.text(), "hélo");
        input.home();
        input.delete();
        assert_eq!(input.text(), "élo");
        input.end();
        input.insert_char('!');
        assert_eq!(input.text(), "élo!");
    }

    #[test]
    fn commit_message_shape() {
        assert_eq!(SwitchDecision::commit_message("x", ""), "x");
        assert_eq!(SwitchDecision::commit_message("x", "  \n"), "x");
        assert_eq!(SwitchDecision::commit_message("x", "body\n"), "x\n\nbody");
    }

    #[test]
    fn commit_body_keeps_indentation() {
        assert_eq!(
            SwitchDecision::commit_message(" x ", "  - one\n  - two\n\n"),
            "x\n\n  - one\n  - two"
        );
    }
}

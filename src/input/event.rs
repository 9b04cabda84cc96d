use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::workflow::Focus;

/// Key bindings of the branch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Switch,
    Refresh,
    ClearMessage,
    ClearLogs,
    ToggleLogFocus,
    ToggleTheme,
    Quit,
}

/// Key bindings while the switch dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Commit,
    Stash,
    Cancel,
    FocusNext,
    FocusPrev,
    Up,
    Down,
    ToggleExpand,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

pub fn normal_action(key: &KeyEvent) -> Option<Action> {
    if is_ctrl(key, 'c') {
        return Some(Action::Quit);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Enter => Action::Switch,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('c') => Action::ClearMessage,
        KeyCode::Char('l') => Action::ClearLogs,
        KeyCode::Tab => Action::ToggleLogFocus,
        KeyCode::Char('T') => Action::ToggleTheme,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

pub fn modal_action(key: &KeyEvent, focus: Focus) -> Option<ModalAction> {
    if is_ctrl(key, 's') {
        return Some(ModalAction::Commit);
    }
    if is_ctrl(key, 't') {
        return Some(ModalAction::Stash);
    }

    let action = match (key.code, focus) {
        (KeyCode::Esc, _) => ModalAction::Cancel,
        (KeyCode::Tab, _) => ModalAction::FocusNext,
        (KeyCode::BackTab, _) => ModalAction::FocusPrev,
        (KeyCode::Up, _) => ModalAction::Up,
        (KeyCode::Down, _) => ModalAction::Down,

        (KeyCode::Char('k'), Focus::Files) => ModalAction::Up,
        (KeyCode::Char('j'), Focus::Files) => ModalAction::Down,
        (KeyCode::Char(' ') | KeyCode::Enter, Focus::Files) => ModalAction::ToggleExpand,
        (_, Focus::Files) => return None,

        (KeyCode::Enter, Focus::Body) => ModalAction::Insert('\n'),
        (KeyCode::Enter, Focus::Subject) => ModalAction::FocusNext,
        (KeyCode::Char(c), _) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            ModalAction::Insert(c)
        }
        (KeyCode::Backspace, _) => ModalAction::Backspace,
        (KeyCode::Delete, _) => ModalAction::Delete,
        (KeyCode::Left, _) => ModalAction::Left,
        (KeyCode::Right, _) => ModalAction::Right,
        (KeyCode::Home, _) => ModalAction::Home,
        (KeyCode::End, _) => ModalAction::End,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn normal_bindings() {
        assert_eq!(normal_action(&key(KeyCode::Char('j'))), Some(Action::Down));
        assert_eq!(normal_action(&key(KeyCode::Up)), Some(Action::Up));
        assert_eq!(normal_action(&key(KeyCode::Enter)), Some(Action::Switch));
        assert_eq!(normal_action(&ctrl('c')), Some(Action::Quit));
        assert_eq!(
            normal_action(&KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT)),
            Some(Action::ToggleTheme)
        );
        assert_eq!(normal_action(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn modal_shortcuts_work_in_any_focus() {
        for focus in [Focus::Files, Focus::Subject, Focus::Body] {
            assert_eq!(modal_action(&ctrl('s'), focus), Some(ModalAction::Commit));
            assert_eq!(modal_action(&ctrl('t'), focus), Some(ModalAction::Stash));
            assert_eq!(modal_action(&key(KeyCode::Esc), focus), Some(ModalAction::Cancel));
        }
    }

    #[test]
    fn typing_goes_to_text_fields_only() {
        assert_eq!(
            modal_action(&key(KeyCode::Char('j')), Focus::Subject),
            Some(ModalAction::Insert('j'))
        );
        assert_eq!(
            modal_action(&key(KeyCode::Char('j')), Focus::Files),
            Some(ModalAction::Down)
        );
        assert_eq!(modal_action(&key(KeyCode::Char('x')), Focus::Files), None);
        assert_eq!(
            modal_action(&key(KeyCode::Enter), Focus::Body),
            Some(ModalAction::Insert('\n'))
        );
        assert_eq!(
            modal_action(&key(KeyCode::Char(' ')), Focus::Files),
            Some(ModalAction::ToggleExpand)
        );
    }
}

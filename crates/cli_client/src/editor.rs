//! Single-line prompt editor
//!
//! Maps raw key events onto prompt actions. History recall and submission
//! are forwarded to the session; the editor only owns the typed text.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Prefix whose argument is masked on screen
const MASKED_PREFIX: &str = "/password ";

/// What a key press asks the prompt loop to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Enter pressed; the line has already been taken out of the buffer
    Submit(String),
    HistoryOlder,
    HistoryNewer,
    /// Buffer changed by an ordinary edit
    Edited,
    Exit,
    /// Key ignored
    None,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer (history recall)
    pub fn set(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Buffer as drawn, with a password argument replaced by `*`
    pub fn display_text(&self) -> String {
        match self.buffer.strip_prefix(MASKED_PREFIX) {
            Some(secret) => format!("{}{}", MASKED_PREFIX, "*".repeat(secret.chars().count())),
            None => self.buffer.clone(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.kind == KeyEventKind::Release {
            return EditorAction::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => EditorAction::Exit,
            KeyCode::Char('d') if ctrl => {
                if self.buffer.is_empty() {
                    EditorAction::Exit
                } else {
                    EditorAction::None
                }
            }
            KeyCode::Char('u') if ctrl => {
                self.buffer.clear();
                EditorAction::Edited
            }
            KeyCode::Char(_) if ctrl => EditorAction::None,
            KeyCode::Char(c) => {
                self.buffer.push(c);
                EditorAction::Edited
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                EditorAction::Edited
            }
            KeyCode::Esc => {
                self.buffer.clear();
                EditorAction::Edited
            }
            KeyCode::Enter => EditorAction::Submit(std::mem::take(&mut self.buffer)),
            KeyCode::Up => EditorAction::HistoryOlder,
            KeyCode::Down => EditorAction::HistoryNewer,
            _ => EditorAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(editor: &mut LineEditor, code: KeyCode) -> EditorAction {
        editor.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(editor: &mut LineEditor, text: &str) {
        for c in text.chars() {
            assert_eq!(press(editor, KeyCode::Char(c)), EditorAction::Edited);
        }
    }

    #[test]
    fn test_submit_takes_buffer() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "list");
        assert_eq!(press(&mut editor, KeyCode::Enter), EditorAction::Submit("list".into()));
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_arrows_map_to_history() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "partial");
        assert_eq!(press(&mut editor, KeyCode::Up), EditorAction::HistoryOlder);
        assert_eq!(press(&mut editor, KeyCode::Down), EditorAction::HistoryNewer);
        // Navigation leaves the typed text alone until the session recalls something.
        assert_eq!(editor.buffer(), "partial");
    }

    #[test]
    fn test_backspace_and_escape() {
        let mut editor = LineEditor::new();
        type_text(&mut editor, "say hi");
        press(&mut editor, KeyCode::Backspace);
        assert_eq!(editor.buffer(), "say h");
        press(&mut editor, KeyCode::Esc);
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_control_keys() {
        let mut editor = LineEditor::new();
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_d), EditorAction::Exit);

        type_text(&mut editor, "abc");
        assert_eq!(editor.handle_key(ctrl_d), EditorAction::None);
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_u), EditorAction::Edited);
        assert_eq!(editor.buffer(), "");

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(ctrl_c), EditorAction::Exit);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut editor = LineEditor::new();
        let mut key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(editor.handle_key(key), EditorAction::None);
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn test_password_masked() {
        let mut editor = LineEditor::new();
        editor.set("/password hunter2");
        assert_eq!(editor.display_text(), "/password *******");
        editor.set("/host localhost");
        assert_eq!(editor.display_text(), "/host localhost");
    }
}

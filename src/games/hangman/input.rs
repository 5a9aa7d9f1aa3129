use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::game::Phase;

/// Player intents the round cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    LetterPressed(char),
    RestartRequested,
    QuitRequested,
}

impl InputEvent {
    /// While playing every letter is a guess (including `r`); once the
    /// round is over `r` or Enter restarts.
    pub fn from_key(key: KeyEvent, phase: Phase) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Esc => Some(Self::QuitRequested),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Self::QuitRequested)
            }
            KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => None,
            KeyCode::Char(c) if phase == Phase::Playing && c.is_alphabetic() => {
                Some(Self::LetterPressed(c))
            }
            KeyCode::Char('r' | 'R') | KeyCode::Enter if phase != Phase::Playing => {
                Some(Self::RestartRequested)
            }
            _ => None,
        }
    }
}

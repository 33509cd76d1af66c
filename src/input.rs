use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    GuessUp,
    GuessDown,
    EndGame,
    Restart,
    FocusTicker,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
}

pub fn parse_game_command(key_code: &KeyCode) -> Option<GameCommand> {
    match key_code {
        KeyCode::Up => Some(GameCommand::GuessUp),
        KeyCode::Down => Some(GameCommand::GuessDown),
        KeyCode::Tab => Some(GameCommand::FocusTicker),
        KeyCode::Char('/') => Some(GameCommand::FocusTicker),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'e' => Some(GameCommand::EndGame),
            'r' => Some(GameCommand::Restart),
            'q' => Some(GameCommand::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Keys while the ticker field has focus; nothing here reaches the game.
pub fn parse_form_command(key_code: &KeyCode) -> Option<FormCommand> {
    match key_code {
        KeyCode::Enter => Some(FormCommand::Submit),
        KeyCode::Backspace => Some(FormCommand::Backspace),
        KeyCode::Esc | KeyCode::Tab => Some(FormCommand::Cancel),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | ':') => {
            Some(FormCommand::Insert(*c))
        }
        _ => None,
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::handler::{Command, Direction};

/// 把一個按鍵事件映射為編輯器命令，無法識別的按鍵返回 None
pub fn handle_key_event(event: KeyEvent) -> Option<Command> {
    match (event.code, event.modifiers) {
        // 基本移動
        (KeyCode::Up, KeyModifiers::NONE) => Some(Command::Move(Direction::Up)),
        (KeyCode::Down, KeyModifiers::NONE) => Some(Command::Move(Direction::Down)),
        (KeyCode::Left, KeyModifiers::NONE) => Some(Command::Move(Direction::Left)),
        (KeyCode::Right, KeyModifiers::NONE) => Some(Command::Move(Direction::Right)),
        (KeyCode::Home, KeyModifiers::NONE) => Some(Command::MoveHome),
        (KeyCode::End, KeyModifiers::NONE) => Some(Command::MoveEnd),
        (KeyCode::PageUp, KeyModifiers::NONE) => Some(Command::PageUp),
        (KeyCode::PageDown, KeyModifiers::NONE) => Some(Command::PageDown),

        // 編輯
        (KeyCode::Enter, _) => Some(Command::InsertNewline),
        (KeyCode::Backspace, _) => Some(Command::Backspace),
        (KeyCode::Char('h'), KeyModifiers::CONTROL) => Some(Command::Backspace),
        (KeyCode::Delete, _) => Some(Command::Delete),
        (KeyCode::Tab, KeyModifiers::NONE) => Some(Command::Insert('\t')),

        // Ctrl 組合鍵
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Some(Command::Save),
        (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(Command::Quit),
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Some(Command::Find),
        // Ctrl+L 傳統上是重繪，每次按鍵後本來就會重繪，忽略即可
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => None,

        // ESC 清除訊息
        (KeyCode::Esc, _) => Some(Command::ClearMessage),

        // 字符輸入
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Some(Command::Insert(c))
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_keys_map_to_file_operations() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Command::Save)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(Command::Find)
        );
    }

    #[test]
    fn printable_chars_insert_with_and_without_shift() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(Command::Insert('a'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Command::Insert('A'))
        );
    }

    #[test]
    fn tab_inserts_literal_tab() {
        assert_eq!(
            handle_key_event(key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Command::Insert('\t'))
        );
    }

    #[test]
    fn enter_and_deletions() {
        assert_eq!(
            handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Command::InsertNewline)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Command::Backspace)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('h'), KeyModifiers::CONTROL)),
            Some(Command::Backspace)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Delete, KeyModifiers::NONE)),
            Some(Command::Delete)
        );
    }

    #[test]
    fn unhandled_keys_map_to_none() {
        assert_eq!(handle_key_event(key(KeyCode::Char('l'), KeyModifiers::CONTROL)), None);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'), KeyModifiers::ALT)), None);
        assert_eq!(handle_key_event(key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }
}

//! Key events to the bytes a terminal would send

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What to do with a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward these bytes to the process
    Send(Vec<u8>),
    /// Leave the session (Ctrl+])
    Detach,
    Ignore,
}

/// Encode a key event as terminal input
pub fn encode_key(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl && key.code == KeyCode::Char(']') {
        return KeyAction::Detach;
    }

    let bytes = match key.code {
        KeyCode::Char(c) if ctrl => match control_byte(c) {
            Some(b) => vec![b],
            None => return KeyAction::Ignore,
        },
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            let mut bytes = Vec::with_capacity(5);
            if alt {
                bytes.push(0x1b);
            }
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            bytes
        }
        KeyCode::Enter => vec![b'\r'],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::BackTab => b"\x1b[Z".to_vec(),
        KeyCode::Backspace => vec![0x7f],
        KeyCode::Esc => vec![0x1b],
        KeyCode::Up => b"\x1b[A".to_vec(),
        KeyCode::Down => b"\x1b[B".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        KeyCode::Delete => b"\x1b[3~".to_vec(),
        KeyCode::Insert => b"\x1b[2~".to_vec(),
        KeyCode::PageUp => b"\x1b[5~".to_vec(),
        KeyCode::PageDown => b"\x1b[6~".to_vec(),
        _ => return KeyAction::Ignore,
    };

    KeyAction::Send(bytes)
}

/// Ctrl+A = 0x01 ... Ctrl+Z = 0x1a, plus the punctuation controls
fn control_byte(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        '@' | ' ' | '2' => Some(0x00),
        '[' | '3' => Some(0x1b),
        '\\' | '4' => Some(0x1c),
        '^' | '6' => Some(0x1e),
        '_' | '7' => Some(0x1f),
        '?' => Some(0x7f),
        _ => None,
    }
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
    fn printable_chars_are_utf8() {
        assert_eq!(encode_key(key(KeyCode::Char('a'))), KeyAction::Send(b"a".to_vec()));
        assert_eq!(
            encode_key(key(KeyCode::Char('é'))),
            KeyAction::Send("é".as_bytes().to_vec())
        );
    }

    #[test]
    fn editing_keys() {
        assert_eq!(encode_key(key(KeyCode::Enter)), KeyAction::Send(b"\r".to_vec()));
        assert_eq!(encode_key(key(KeyCode::Backspace)), KeyAction::Send(vec![0x7f]));
        assert_eq!(encode_key(key(KeyCode::Tab)), KeyAction::Send(b"\t".to_vec()));
        assert_eq!(encode_key(key(KeyCode::Esc)), KeyAction::Send(vec![0x1b]));
        assert_eq!(encode_key(key(KeyCode::Delete)), KeyAction::Send(b"\x1b[3~".to_vec()));
    }

    #[test]
    fn arrows_and_navigation() {
        assert_eq!(encode_key(key(KeyCode::Up)), KeyAction::Send(b"\x1b[A".to_vec()));
        assert_eq!(encode_key(key(KeyCode::Down)), KeyAction::Send(b"\x1b[B".to_vec()));
        assert_eq!(encode_key(key(KeyCode::Right)), KeyAction::Send(b"\x1b[C".to_vec()));
        assert_eq!(encode_key(key(KeyCode::Left)), KeyAction::Send(b"\x1b[D".to_vec()));
        assert_eq!(encode_key(key(KeyCode::Home)), KeyAction::Send(b"\x1b[H".to_vec()));
        assert_eq!(encode_key(key(KeyCode::End)), KeyAction::Send(b"\x1b[F".to_vec()));
    }

    #[test]
    fn ctrl_letters_become_control_codes() {
        assert_eq!(encode_key(ctrl('c')), KeyAction::Send(vec![0x03]));
        assert_eq!(encode_key(ctrl('D')), KeyAction::Send(vec![0x04]));
        assert_eq!(encode_key(ctrl('l')), KeyAction::Send(vec![0x0c]));
    }

    #[test]
    fn ctrl_close_bracket_detaches() {
        assert_eq!(encode_key(ctrl(']')), KeyAction::Detach);
    }

    #[test]
    fn alt_prefixes_escape() {
        let event = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT);
        assert_eq!(encode_key(event), KeyAction::Send(b"\x1bb".to_vec()));
    }

    #[test]
    fn releases_and_function_keys_are_ignored() {
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(encode_key(release), KeyAction::Ignore);
        assert_eq!(encode_key(key(KeyCode::F(5))), KeyAction::Ignore);
    }
}

/// Keys the terminal pane forwards to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermKey {
    Text(String),
    Enter,
    Backspace,
    Tab,
    Escape,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    /// Ctrl + letter, e.g. `Ctrl('c')`
    Ctrl(char),
}

/// Bytes an xterm-compatible terminal sends for `key`.
pub fn encode_key(key: &TermKey) -> Vec<u8> {
    match key {
        TermKey::Text(s) => s.as_bytes().to_vec(),
        TermKey::Enter => b"\r".to_vec(),
        TermKey::Backspace => vec![0x7f],
        TermKey::Tab => b"\t".to_vec(),
        TermKey::Escape => vec![0x1b],
        TermKey::Up => b"\x1b[A".to_vec(),
        TermKey::Down => b"\x1b[B".to_vec(),
        TermKey::Right => b"\x1b[C".to_vec(),
        TermKey::Left => b"\x1b[D".to_vec(),
        TermKey::Home => b"\x1b[H".to_vec(),
        TermKey::End => b"\x1b[F".to_vec(),
        TermKey::Delete => b"\x1b[3~".to_vec(),
        TermKey::PageUp => b"\x1b[5~".to_vec(),
        TermKey::PageDown => b"\x1b[6~".to_vec(),
        TermKey::Ctrl(c) => match c.to_ascii_lowercase() {
            l @ 'a'..='z' => vec![l as u8 - b'a' + 1],
            _ => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through() {
        assert_eq!(encode_key(&TermKey::Text("ls -la".into())), b"ls -la");
        assert_eq!(encode_key(&TermKey::Text("ñ".into())), "ñ".as_bytes());
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(encode_key(&TermKey::Enter), b"\r");
        assert_eq!(encode_key(&TermKey::Backspace), [0x7f]);
        assert_eq!(encode_key(&TermKey::Ctrl('c')), [0x03]);
        assert_eq!(encode_key(&TermKey::Ctrl('D')), [0x04]);
        assert!(encode_key(&TermKey::Ctrl('1')).is_empty());
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(encode_key(&TermKey::Up), b"\x1b[A");
        assert_eq!(encode_key(&TermKey::Left), b"\x1b[D");
        assert_eq!(encode_key(&TermKey::Delete), b"\x1b[3~");
    }
}

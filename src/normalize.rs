/// Canonical form of a single character used for comparisons.
///
/// A non-breaking space compares equal to a regular space; every other
/// character is returned unchanged.
pub fn normalize_char(c: char) -> char {
    match c {
        '\u{00A0}' => ' ',
        other => other,
    }
}

/// Normalizes raw keyboard input.
///
/// Returns `None` when the input holds no character. When a burst of
/// synthesized input arrives, only its last character counts.
pub fn normalize(input: &str) -> Option<char> {
    input.chars().last().map(normalize_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_breaking_space_becomes_space() {
        assert_eq!(normalize("\u{00A0}"), Some(' '));
        assert_eq!(normalize_char('\u{00A0}'), ' ');
    }

    #[test]
    fn test_empty_input_is_nothing() {
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn test_plain_character_unchanged() {
        assert_eq!(normalize("a"), Some('a'));
        assert_eq!(normalize(" "), Some(' '));
        assert_eq!(normalize("é"), Some('é'));
        assert_eq!(normalize_char('Z'), 'Z');
    }

    #[test]
    fn test_burst_keeps_last_character() {
        assert_eq!(normalize("abc"), Some('c'));
        assert_eq!(normalize("x\u{00A0}"), Some(' '));
    }
}

//! Lexical helpers shared by the pattern-based scanners.
//!
//! Masking replaces characters with ASCII spaces of equal byte length and keeps
//! newlines, so byte offsets and line numbers of the masked text match the original.

/// Identifier characters of the JavaScript family, `$` included.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_char),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Blank out comments, keep string literals verbatim.
    Comments,
    /// Blank out comments and the contents of string and template literals.
    /// Quote characters themselves are kept.
    CommentsAndStrings,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str(char),
}

pub fn mask_source(content: &str, mode: MaskMode) -> String {
    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut chars = content.chars().peekable();

    let blank = |out: &mut String, c: char| {
        if c == '\n' {
            out.push('\n');
        } else {
            for _ in 0..c.len_utf8() {
                out.push(' ');
            }
        }
    };

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '\'' | '"' | '`' => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::Str(quote) => {
                let keep = mode == MaskMode::Comments;
                if c == '\\' {
                    if keep {
                        out.push(c);
                    } else {
                        blank(&mut out, c);
                    }
                    if let Some(escaped) = chars.next() {
                        if keep {
                            out.push(escaped);
                        } else {
                            blank(&mut out, escaped);
                        }
                    }
                } else if c == quote {
                    out.push(c);
                    state = State::Code;
                } else if c == '\n' && quote != '`' {
                    // Unterminated single-line string.
                    out.push('\n');
                    state = State::Code;
                } else if keep {
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }
    out
}

/// 1-based line of a byte offset.
pub fn line_of_offset(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
        + 1
}

/// 1-based character column of a byte offset.
pub fn column_of_offset(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    let line_start = content[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0);
    content[line_start..offset].chars().count() + 1
}

/// Byte offset of the delimiter closing the one at `open`, skipping nested pairs.
///
/// `text` should be masked with [`MaskMode::CommentsAndStrings`] so delimiters in
/// literals and comments are not counted.
pub fn matching_delimiter(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'{' => (b'{', b'}'),
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        b'<' => (b'<', b'>'),
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        if *b == open_ch {
            depth += 1;
        } else if *b == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split on `sep` at nesting depth zero of `()`, `[]`, `{}` and `<>`.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            // `=>` is an arrow, not a closing angle bracket.
            '>' if prev != '=' => depth -= 1,
            _ if c == sep && depth <= 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_offsets() {
        let src = "const a = 'x // y'; // trailing\n/* block\n */ let b = 1;";
        let masked = mask_source(src, MaskMode::Comments);
        assert_eq!(masked.len(), src.len());
        assert!(masked.contains("'x // y'"));
        assert!(!masked.contains("trailing"));
        assert!(!masked.contains("block"));
        assert_eq!(masked.lines().count(), src.lines().count());
    }

    #[test]
    fn test_mask_strings_hides_braces() {
        let src = "f('{', `}`) { }";
        let masked = mask_source(src, MaskMode::CommentsAndStrings);
        let open = masked.find('{').unwrap();
        assert_eq!(matching_delimiter(&masked, open), Some(src.len() - 1));
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        let parts = split_top_level("a: Map<K, V>, b: (x, y) => z, c", ',');
        assert_eq!(parts, vec!["a: Map<K, V>", " b: (x, y) => z", " c"]);
    }
}

use wayfinder_plugin::text::is_ident_char;

/// The identifier touching a 1-based `line`/`column` cursor and the 1-based
/// column it starts at. A cursor just past the last character still counts.
pub fn identifier_at(content: &str, line: usize, column: usize) -> Option<(String, usize)> {
    if line == 0 || column == 0 {
        return None;
    }
    let text = content.lines().nth(line - 1)?;
    let chars: Vec<char> = text.chars().collect();
    let mut at = column - 1;
    if at >= chars.len() || !is_ident_char(chars[at]) {
        if at > 0 && at <= chars.len() && is_ident_char(chars[at - 1]) {
            at -= 1;
        } else {
            return None;
        }
    }
    let mut start = at;
    while start > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = at;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    let word: String = chars[start..end].iter().collect();
    if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((word, start + 1))
}

/// Byte offset and 1-based char column of every whole-word occurrence of `word` in `line`.
pub fn word_occurrences(line: &str, word: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    if word.is_empty() {
        return out;
    }
    for (at, _) in line.match_indices(word) {
        let before = line[..at].chars().next_back();
        let after = line[at + word.len()..].chars().next();
        if before.is_some_and(is_ident_char) || after.is_some_and(is_ident_char) {
            continue;
        }
        out.push((at, line[..at].chars().count() + 1));
    }
    out
}

use once_cell::sync::Lazy;
use regex::Regex;
use wayfinder_plugin::text::{
    MaskMode, column_of_offset, is_ident_char, line_of_offset, mask_source, matching_delimiter,
    split_top_level,
};
use wayfinder_plugin::{ClassHeader, HeaderKind};

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(class|interface)\s+([A-Za-z_$][\w$]*)")
        .expect("built-in heritage pattern must compile")
});

/// `ns.Base<T>` -> `Base`; `Mixin(Base)` -> `Mixin`.
fn bare_type_name(raw: &str) -> Option<String> {
    let head = raw.trim().split(['<', '(']).next().unwrap_or_default();
    let last = head.rsplit('.').next().unwrap_or(head).trim();
    if !last.is_empty() && last.chars().all(is_ident_char) {
        Some(last.to_string())
    } else {
        None
    }
}

fn type_list(text: &str) -> Vec<String> {
    split_top_level(text, ',')
        .into_iter()
        .filter_map(bare_type_name)
        .collect()
}

/// Byte offset of `keyword` as a whole word at nesting depth zero of `text`.
fn keyword_at_top_level(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' | b')' | b']' | b'}' => depth -= 1,
            _ if depth == 0 && bytes[i..].starts_with(keyword.as_bytes()) => {
                let before_ok = i == 0 || !is_ident_char(char::from(bytes[i - 1]));
                let after = bytes.get(i + keyword.len()).copied().map(char::from);
                if before_ok && after.is_none_or(|c| !is_ident_char(c)) {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Class and interface headers with their heritage clauses, in source order.
pub fn extract_class_headers(content: &str) -> Vec<ClassHeader> {
    let masked = mask_source(content, MaskMode::CommentsAndStrings);
    let mut headers = Vec::new();

    for caps in HEADER_RE.captures_iter(&masked) {
        let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if matches!(name.as_str(), "extends" | "implements") {
            continue;
        }
        // Skip `foo.class` style property access.
        if masked[..keyword.start()].trim_end().ends_with('.') {
            continue;
        }

        // 1. Header text between the name and the body
        let mut header_start = name.end();
        if masked[header_start..].trim_start().starts_with('<') {
            let open = header_start + masked[header_start..].find('<').unwrap_or(0);
            header_start = matching_delimiter(&masked, open).map_or(header_start, |c| c + 1);
        }
        let Some(body_at) = masked[header_start..].find(['{', ';']) else {
            continue;
        };
        let header = &masked[header_start..header_start + body_at];

        // 2. `extends` / `implements` clauses
        let extends_at = keyword_at_top_level(header, "extends");
        let implements_at = keyword_at_top_level(header, "implements");
        let extends = extends_at
            .map(|at| {
                let start = at + "extends".len();
                let end = implements_at.filter(|i| *i > at).unwrap_or(header.len());
                type_list(&header[start..end])
            })
            .unwrap_or_default();
        let implements = implements_at
            .map(|at| {
                let start = at + "implements".len();
                let end = extends_at.filter(|e| *e > at).unwrap_or(header.len());
                type_list(&header[start..end])
            })
            .unwrap_or_default();

        let kind = if keyword.as_str() == "class" {
            HeaderKind::Class
        } else {
            HeaderKind::Interface
        };
        headers.push(ClassHeader {
            kind,
            name: name.as_str().to_string(),
            line: line_of_offset(content, name.start()),
            column: column_of_offset(content, name.start()),
            extends,
            implements,
        });
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_type_name_strips_qualifiers() {
        assert_eq!(bare_type_name(" ns.Base<T> ").as_deref(), Some("Base"));
        assert_eq!(bare_type_name("Mixin(Base)").as_deref(), Some("Mixin"));
        assert_eq!(bare_type_name("  "), None);
    }

    #[test]
    fn test_generic_header_with_both_clauses() {
        let headers = extract_class_headers(
            "export class Repo<T extends Entity> extends Base<T> implements Store<T>, Disposable {}",
        );
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].extends, vec!["Base"]);
        assert_eq!(headers[0].implements, vec!["Store", "Disposable"]);
    }
}

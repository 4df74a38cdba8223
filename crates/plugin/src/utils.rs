use std::path::Path;
use tree_sitter::Node;
use wayfinder_api::models::SymbolLocation;

pub fn node_text(node: Node, source: &str) -> String {
    node.utf8_text(source.as_bytes())
        .unwrap_or_default()
        .to_string()
}

/// 1-based character column of a node's start.
///
/// Tree-sitter columns count bytes; symbol locations count characters.
pub fn char_column(node: Node, source: &str) -> usize {
    let start = node.start_byte().min(source.len());
    let line_start = start.saturating_sub(node.start_position().column);
    source
        .get(line_start..start)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(node.start_position().column)
        + 1
}

/// Location of a declaration: anchored at its name, spanning to its last line.
pub fn location_from_ts(
    path: &Path,
    source: &str,
    declaration: Node,
    name: Node,
) -> SymbolLocation {
    let start = name.start_position();
    let end = declaration.end_position();
    SymbolLocation::new(path, start.row + 1, end.row + 1).with_column(char_column(name, source))
}

/// Declaration head: text before the body, or the first line when there is none.
/// Whitespace is collapsed.
pub fn signature_text(declaration: Node, source: &str) -> String {
    let text = node_text(declaration, source);
    let head = match declaration.child_by_field_name("body") {
        Some(body) => {
            let cut = body.start_byte().saturating_sub(declaration.start_byte());
            text.get(..cut).unwrap_or(&text)
        }
        None => text.lines().next().unwrap_or_default(),
    };
    let collapsed: Vec<&str> = head.split_whitespace().collect();
    collapsed
        .join(" ")
        .trim_end_matches(['{', ';', ' '])
        .to_string()
}

//! Line-pattern symbol extraction.
//!
//! Works on source with comments and literal contents blanked out, tracking brace
//! depth to tell declarations from code nested in bodies. Less precise than the
//! syntax-tree walk but tolerant of input the grammar rejects.

use crate::constants::{MEMBER_MODIFIERS, is_control_keyword};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;
use wayfinder_api::models::{CodeSymbol, Modifier, SymbolKind, SymbolLocation};
use wayfinder_plugin::text::{
    MaskMode, column_of_offset, is_ident_char, is_ident_start, is_identifier, line_of_offset,
    mask_source, matching_delimiter, split_top_level,
};
use wayfinder_plugin::{BoxError, SymbolParser};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in symbol pattern must compile")
}

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*((?:(?:export|default|declare|abstract)\s+)*)class(?:\s+([A-Za-z_$][\w$]*))?")
});
static INTERFACE_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*((?:(?:export|declare)\s+)*)interface\s+([A-Za-z_$][\w$]*)")
});
static ENUM_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*((?:(?:export|declare|const)\s+)*)enum\s+([A-Za-z_$][\w$]*)")
});
static NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*((?:(?:export|declare)\s+)*)(namespace|module)\s+([A-Za-z_$][\w$.]*)")
});
static TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*((?:(?:export|declare)\s+)*)type\s+([A-Za-z_$][\w$]*)\s*(?:<[^=]*>)?\s*=")
});
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^\s*((?:(?:export|default|declare|async)\s+)*)function\b\s*\*?\s*([A-Za-z_$][\w$]*)?\s*[(<]",
    )
});
static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*((?:(?:export|declare)\s+)*)(const|let|var)\s+"));
static EXPORT_CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*export\s+(?:type\s+)?\{([^}]*)\}\s*(from\b)?"));
static EXPORT_DEFAULT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*export\s+default\s+([A-Za-z_$][\w$]*)\s*;?\s*$"));
static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^\s*((?:(?:public|private|protected|static|readonly|async|abstract|declare|override|get|set)\s+)*)\*?\s*(#?[A-Za-z_$][\w$]*)\s*[?!]?\s*(?:<[^>(]*>)?\s*\(",
    )
});
static PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^\s*((?:(?:public|private|protected|static|readonly|declare|override|abstract)\s+)*)(#?[A-Za-z_$][\w$]*)\s*[?!]?\s*(:|=|;|$)",
    )
});
static INTERFACE_MEMBER_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*(?:readonly\s+)?([A-Za-z_$][\w$]*)\s*\??\s*([(:<])"));
static PARAMETER_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*((?:(?:public|private|protected|readonly|override)\s+)*)([A-Za-z_$][\w$]*)")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Class,
    Interface,
    Enum,
    Namespace,
}

struct Frame {
    name: String,
    kind: FrameKind,
    body_depth: i32,
    end_line: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PatternParser;

impl PatternParser {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolParser for PatternParser {
    fn strategy(&self) -> &'static str {
        "pattern"
    }

    fn parse_symbols(&self, path: &Path, content: &str) -> Result<Vec<CodeSymbol>, BoxError> {
        let mut scan = Scan::new(path, content);
        scan.run();
        Ok(scan.finish())
    }
}

fn modifiers_of(group: Option<regex::Match<'_>>) -> Vec<Modifier> {
    group
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .filter_map(Modifier::from_keyword)
                .collect()
        })
        .unwrap_or_default()
}

fn looks_like_function(value: &str) -> bool {
    let value = value.trim_start();
    let value = value.strip_prefix("async").map(str::trim_start).unwrap_or(value);
    if value.starts_with("function") {
        return true;
    }
    let Some(arrow) = value.find("=>") else {
        return false;
    };
    let head = value[..arrow].trim();
    head.starts_with('(') || head.starts_with('<') || is_identifier(head)
}

struct Scan<'a> {
    path: &'a Path,
    content: &'a str,
    masked: String,
    symbols: Vec<CodeSymbol>,
    local_exports: Vec<(String, bool)>,
}

impl<'a> Scan<'a> {
    fn new(path: &'a Path, content: &'a str) -> Self {
        Self {
            path,
            content,
            masked: mask_source(content, MaskMode::CommentsAndStrings),
            symbols: Vec::new(),
            local_exports: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<CodeSymbol> {
        for (name, is_default) in std::mem::take(&mut self.local_exports) {
            for symbol in self
                .symbols
                .iter_mut()
                .filter(|s| s.container_name.is_none() && s.name == name)
            {
                symbol.add_modifier(Modifier::Export);
                if is_default {
                    symbol.add_modifier(Modifier::Default);
                }
            }
        }
        self.symbols
    }

    fn run(&mut self) {
        let masked = self.masked.clone();
        let mut frames: Vec<Frame> = Vec::new();
        let mut depth: i32 = 0;
        let mut offset = 0usize;

        for (index, line) in masked.split('\n').enumerate() {
            let line_no = index + 1;
            while frames.last().is_some_and(|f| f.end_line < line_no) {
                frames.pop();
            }
            let expected = frames.last().map(|f| f.body_depth).unwrap_or(0);

            if depth == expected {
                let frame = frames.last().map(|f| (f.kind, f.name.clone()));
                match frame {
                    None => self.declaration(line, offset, depth, None, &mut frames),
                    Some((FrameKind::Namespace, name)) => {
                        self.declaration(line, offset, depth, Some(name.as_str()), &mut frames)
                    }
                    Some((FrameKind::Class, name)) => self.class_member(line, offset, &name),
                    Some((FrameKind::Interface, name)) => {
                        self.interface_member(line, offset, &name)
                    }
                    Some((FrameKind::Enum, name)) => self.enum_members(line, offset, &name),
                }
            }

            for c in line.chars() {
                match c {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            offset += line.len() + 1;
        }
    }

    /// Line of the brace closing the first block opened at or after `from`,
    /// or `None` when a `;` ends the statement first.
    fn block_end_line(&self, from: usize) -> Option<usize> {
        let rest = self.masked.get(from..)?;
        let open = rest.find(['{', ';'])? + from;
        if self.masked.as_bytes()[open] != b'{' {
            return None;
        }
        let close = matching_delimiter(&self.masked, open)?;
        Some(line_of_offset(&self.masked, close))
    }

    /// Body end for callables: skip the parameter list first.
    fn callable_end_line(&self, paren_search_from: usize) -> Option<usize> {
        let rest = self.masked.get(paren_search_from..)?;
        let open = rest.find('(')? + paren_search_from;
        let close = matching_delimiter(&self.masked, open)?;
        self.block_end_line(close + 1)
    }

    fn details_at(&self, offset: usize) -> Option<String> {
        let start = self.content[..offset].rfind('\n').map(|p| p + 1).unwrap_or(0);
        let end = self.content[offset..]
            .find('\n')
            .map(|p| p + offset)
            .unwrap_or(self.content.len());
        let line = &self.content[start..end];
        let collapsed: Vec<&str> = line.split_whitespace().collect();
        let text = collapsed.join(" ");
        let text = text.trim_end_matches(['{', ';', ' ']).to_string();
        Some(text).filter(|t| !t.is_empty())
    }

    fn push(
        &mut self,
        name: &str,
        kind: SymbolKind,
        name_offset: usize,
        end_line: Option<usize>,
        container: Option<&str>,
        modifiers: Vec<Modifier>,
    ) {
        let line = line_of_offset(self.content, name_offset);
        let column = column_of_offset(self.content, name_offset);
        let location =
            SymbolLocation::new(self.path, line, end_line.unwrap_or(line)).with_column(column);
        let mut symbol = CodeSymbol::new(name, kind, location);
        symbol.container_name = container.map(str::to_string);
        symbol.details = self.details_at(name_offset);
        for m in modifiers {
            symbol.add_modifier(m);
        }
        self.symbols.push(symbol);
    }

    fn open_frame(
        &mut self,
        frames: &mut Vec<Frame>,
        name: &str,
        kind: FrameKind,
        depth: i32,
        end_line: Option<usize>,
    ) {
        if let Some(end_line) = end_line {
            frames.push(Frame {
                name: name.to_string(),
                kind,
                body_depth: depth + 1,
                end_line,
            });
        }
    }

    fn declaration(
        &mut self,
        line: &str,
        offset: usize,
        depth: i32,
        container: Option<&str>,
        frames: &mut Vec<Frame>,
    ) {
        // 1. Containers
        if let Some(caps) = CLASS_RE.captures(line) {
            let mods = modifiers_of(caps.get(1));
            let (name, name_at) = match caps.get(2) {
                Some(m) if m.as_str() != "extends" && m.as_str() != "implements" => {
                    (m.as_str().to_string(), offset + m.start())
                }
                _ if mods.contains(&Modifier::Default) => {
                    ("default".to_string(), offset + caps.get(0).map_or(0, |m| m.end()))
                }
                _ => return,
            };
            let end = self.block_end_line(name_at);
            self.push(&name, SymbolKind::Class, name_at, end, container, mods);
            self.open_frame(frames, &name, FrameKind::Class, depth, end);
            return;
        }
        if let Some(caps) = INTERFACE_RE.captures(line) {
            let kinds = (SymbolKind::Interface, FrameKind::Interface);
            self.container_decl(&caps, 2, kinds, offset, depth, container, frames);
            return;
        }
        if let Some(caps) = ENUM_RE.captures(line) {
            let kinds = (SymbolKind::Enum, FrameKind::Enum);
            self.container_decl(&caps, 2, kinds, offset, depth, container, frames);
            return;
        }
        if let Some(caps) = NAMESPACE_RE.captures(line) {
            let kind = if caps.get(2).is_some_and(|m| m.as_str() == "module") {
                SymbolKind::Module
            } else {
                SymbolKind::Namespace
            };
            let kinds = (kind, FrameKind::Namespace);
            self.container_decl(&caps, 3, kinds, offset, depth, container, frames);
            return;
        }

        // 2. Single declarations
        if let Some(caps) = TYPE_RE.captures(line) {
            if let Some(name) = caps.get(2) {
                let mods = modifiers_of(caps.get(1));
                let at = offset + name.start();
                self.push(name.as_str(), SymbolKind::TypeAlias, at, None, container, mods);
            }
            return;
        }
        if let Some(caps) = FUNCTION_RE.captures(line) {
            let mods = modifiers_of(caps.get(1));
            let (name, name_at) = match caps.get(2) {
                Some(m) => (m.as_str().to_string(), offset + m.start()),
                None if mods.contains(&Modifier::Default) => {
                    let at = line.find("function").unwrap_or(0);
                    ("default".to_string(), offset + at)
                }
                None => return,
            };
            let end = self.callable_end_line(name_at);
            self.push(&name, SymbolKind::Function, name_at, end, container, mods);
            return;
        }
        if let Some(caps) = VARIABLE_RE.captures(line) {
            self.variables(&caps, offset, container);
            return;
        }

        // 3. Export lists naming earlier declarations
        if container.is_some() {
            return;
        }
        if let Some(caps) = EXPORT_CLAUSE_RE.captures(line) {
            if caps.get(2).is_none() {
                let list = caps.get(1).map_or("", |m| m.as_str());
                for item in list.split(',') {
                    let mut words = item.split_whitespace().filter(|w| *w != "type");
                    let Some(name) = words.next() else { continue };
                    let alias_default =
                        words.next() == Some("as") && words.next() == Some("default");
                    self.local_exports.push((name.to_string(), alias_default));
                }
            }
        } else if let Some(caps) = EXPORT_DEFAULT_NAME_RE.captures(line) {
            if let Some(name) = caps.get(1) {
                self.local_exports.push((name.as_str().to_string(), true));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn container_decl(
        &mut self,
        caps: &Captures<'_>,
        name_group: usize,
        (kind, frame_kind): (SymbolKind, FrameKind),
        offset: usize,
        depth: i32,
        container: Option<&str>,
        frames: &mut Vec<Frame>,
    ) {
        let Some(name) = caps.get(name_group) else {
            return;
        };
        let mods = modifiers_of(caps.get(1));
        let name_at = offset + name.start();
        let end = self.block_end_line(name_at);
        self.push(name.as_str(), kind, name_at, end, container, mods);
        self.open_frame(frames, name.as_str(), frame_kind, depth, end);
    }

    /// Byte offset just past the statement starting at `start`.
    fn statement_end(&self, start: usize) -> usize {
        let bytes = self.masked.as_bytes();
        let mut depth = 0i32;
        let mut i = start;
        while i < bytes.len() {
            match bytes[i] {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    depth -= 1;
                    if depth < 0 {
                        return i;
                    }
                }
                b';' if depth == 0 => return i,
                b'\n' if depth == 0 => {
                    let before = self.masked[start..i].trim_end();
                    let after = self.masked[i + 1..].trim_start();
                    let continues = before.ends_with([',', '=', '>', '+', '-', '?', ':', '|'])
                        || after.starts_with(['.', ',', '?', ':', '+', '|', '=']);
                    if !continues {
                        return i;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        bytes.len()
    }

    fn variables(&mut self, caps: &Captures<'_>, offset: usize, container: Option<&str>) {
        let Some(whole) = caps.get(0) else {
            return;
        };
        let mods = modifiers_of(caps.get(1));
        let is_const = caps.get(2).is_some_and(|m| m.as_str() == "const");
        let start = offset + whole.end();
        let end = self.statement_end(start);
        let statement = self.masked[start..end].to_string();

        let mut part_offset = start;
        for part in split_top_level(&statement, ',') {
            let part_start = part_offset;
            part_offset += part.len() + 1;

            let binding = split_top_level(part, '=')
                .first()
                .copied()
                .unwrap_or(part);
            let value = part.get(binding.len() + 1..);
            let is_function = value.is_some_and(looks_like_function);
            let kind = if is_function {
                SymbolKind::Function
            } else if is_const {
                SymbolKind::Constant
            } else {
                SymbolKind::Variable
            };
            let mut declarator_mods = mods.clone();
            if is_function && value.is_some_and(|v| v.trim_start().starts_with("async")) {
                declarator_mods.push(Modifier::Async);
            }
            let end_line = line_of_offset(self.content, part_start + part.len());

            for (name, at) in binding_identifiers(binding) {
                self.push(
                    &name,
                    kind,
                    part_start + at,
                    Some(end_line),
                    container,
                    declarator_mods.clone(),
                );
            }
        }
    }

    fn class_member(&mut self, line: &str, offset: usize, class: &str) {
        if let Some(caps) = METHOD_RE.captures(line) {
            let Some(name) = caps.get(2) else { return };
            let text = name.as_str();
            if is_control_keyword(text) || MEMBER_MODIFIERS.contains(&text) {
                return;
            }
            let mods = modifiers_of(caps.get(1));
            let name_at = offset + name.start();
            let end = self.callable_end_line(name_at);
            if text == "constructor" {
                self.push(text, SymbolKind::Constructor, name_at, end, Some(class), mods);
                self.constructor_parameters(name_at, class);
            } else {
                self.push(text, SymbolKind::Method, name_at, end, Some(class), mods);
            }
            return;
        }
        if let Some(caps) = PROPERTY_RE.captures(line) {
            let Some(name) = caps.get(2) else { return };
            let text = name.as_str();
            if MEMBER_MODIFIERS.contains(&text) {
                return;
            }
            let mods = modifiers_of(caps.get(1));
            let name_at = offset + name.start();
            let value = line
                .get(name.end()..)
                .and_then(|rest| rest.split_once('='))
                .map(|(_, v)| v);
            let kind = if value.is_some_and(looks_like_function) {
                SymbolKind::Method
            } else if text.starts_with('#') {
                SymbolKind::Field
            } else {
                SymbolKind::Property
            };
            let end = if kind == SymbolKind::Method {
                let end = self.statement_end(name_at);
                Some(line_of_offset(self.content, end))
            } else {
                None
            };
            self.push(text, kind, name_at, end, Some(class), mods);
        }
    }

    fn constructor_parameters(&mut self, name_at: usize, class: &str) {
        let open = self.masked.get(name_at..).and_then(|r| r.find('('));
        let Some(open) = open.map(|p| p + name_at) else {
            return;
        };
        let Some(close) = matching_delimiter(&self.masked, open) else {
            return;
        };
        let container = format!("{}.constructor", class);
        let list = self.masked[open + 1..close].to_string();
        let mut part_offset = open + 1;
        for part in split_top_level(&list, ',') {
            let part_start = part_offset;
            part_offset += part.len() + 1;
            let Some(caps) = PARAMETER_RE.captures(part) else {
                continue;
            };
            let Some(name) = caps.get(2) else { continue };
            if name.as_str() == "this" {
                continue;
            }
            let mods = modifiers_of(caps.get(1));
            self.push(
                name.as_str(),
                SymbolKind::Parameter,
                part_start + name.start(),
                None,
                Some(container.as_str()),
                mods,
            );
        }
    }

    fn interface_member(&mut self, line: &str, offset: usize, interface: &str) {
        let Some(caps) = INTERFACE_MEMBER_RE.captures(line) else {
            return;
        };
        let (Some(name), Some(marker)) = (caps.get(1), caps.get(2)) else {
            return;
        };
        let kind = if marker.as_str() == ":" {
            SymbolKind::Property
        } else if is_control_keyword(name.as_str()) {
            return;
        } else {
            SymbolKind::Method
        };
        let at = offset + name.start();
        self.push(name.as_str(), kind, at, None, Some(interface), Vec::new());
    }

    fn enum_members(&mut self, line: &str, offset: usize, enumeration: &str) {
        let mut part_offset = offset;
        for part in split_top_level(line, ',') {
            let part_start = part_offset;
            part_offset += part.len() + 1;
            let trimmed = part.trim_start();
            let lead = part.len() - trimmed.len();
            let name: String = trimmed
                .chars()
                .take_while(|c| is_ident_char(*c))
                .collect();
            if name.is_empty() || !trimmed.starts_with(is_ident_start) {
                continue;
            }
            let rest = trimmed[name.len()..].trim_start();
            if !(rest.is_empty() || rest.starts_with('=')) {
                continue;
            }
            let at = part_start + lead;
            self.push(&name, SymbolKind::EnumMember, at, None, Some(enumeration), Vec::new());
        }
    }
}

/// Identifiers bound by a declarator head, with their byte offsets in `binding`.
/// Handles plain names and one level of object or array destructuring.
fn binding_identifiers(binding: &str) -> Vec<(String, usize)> {
    let trimmed = binding.trim_start();
    let lead = binding.len() - trimmed.len();
    let Some(first) = trimmed.chars().next() else {
        return Vec::new();
    };

    if first == '{' || first == '[' {
        let inner_end = matching_delimiter(trimmed, 0).unwrap_or(trimmed.len());
        let inner = &trimmed[1..inner_end.min(trimmed.len())];
        let mut out = Vec::new();
        let mut item_offset = lead + 1;
        for item in split_top_level(inner, ',') {
            let item_start = item_offset;
            item_offset += item.len() + 1;
            // `key: local` binds `local`; defaults after `=` are dropped.
            let target = match item.split_once(':') {
                Some((key, local)) if first == '{' => (local, item_start + key.len() + 1),
                _ => (item, item_start),
            };
            let (text, at) = target;
            let text = text.split('=').next().unwrap_or_default();
            let stripped = text.trim_start();
            let stripped = stripped.strip_prefix("...").unwrap_or(stripped);
            let name: String = stripped
                .chars()
                .take_while(|c| is_ident_char(*c))
                .collect();
            if is_identifier(&name) {
                let pos = text.find(name.as_str()).unwrap_or(0);
                out.push((name, at + pos));
            }
        }
        return out;
    }

    let name: String = trimmed
        .chars()
        .take_while(|c| is_ident_char(*c))
        .collect();
    if is_identifier(&name) {
        vec![(name, lead)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_identifiers_destructuring() {
        let names: Vec<String> = binding_identifiers(" { a, b: c, ...rest } ")
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["a", "c", "rest"]);
    }

    #[test]
    fn test_looks_like_function() {
        assert!(looks_like_function(" (a: number) => a * 2"));
        assert!(looks_like_function(" async x => x"));
        assert!(looks_like_function(" function () {}"));
        assert!(!looks_like_function(" compute(1)"));
    }
}

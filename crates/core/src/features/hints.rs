use super::WorkspaceIndex;
use super::navigation::Navigator;
use crate::error::Result;
use crate::util::word_occurrences;
use once_cell::sync::Lazy;
use regex::Regex;
use wayfinder_api::{CodeSymbol, Modifier, PositionQuery, SymbolKind, TypeHint};
use wayfinder_plugin::text::{MaskMode, mask_source, matching_delimiter, split_top_level};

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^-?(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|\d[\d_]*(?:\.\d*)?(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)$",
    )
    .expect("number pattern must compile")
});
static BIGINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d[\d_]*n$").expect("bigint pattern must compile"));

/// A line ending in one of these carries the expression onto the next line.
const CONTINUES_LINE: [char; 12] = ['=', '+', '-', '*', '/', '|', '&', '?', ':', ',', '(', '>'];
const CONTINUES_NEXT: [char; 9] = ['.', '?', ':', '+', '-', '*', '/', '|', '&'];

const COMPARISONS: [&str; 8] = ["===", "!==", "==", "!=", "<=", ">=", " < ", " > "];

/// Heuristic type information from source text alone.
pub struct TypeHintInferrer<'a> {
    index: &'a dyn WorkspaceIndex,
}

impl<'a> TypeHintInferrer<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex) -> Self {
        Self { index }
    }

    pub fn infer(&self, position: &PositionQuery) -> Result<Option<TypeHint>> {
        let Some(symbol) = Navigator::new(self.index).symbol_at(position)? else {
            return Ok(None);
        };
        let content = self.index.content(&symbol.location.path)?;
        Ok(Some(hint_for(&symbol, &content)))
    }
}

fn hint(symbol: &CodeSymbol, declared: Option<String>, returns: Option<String>) -> TypeHint {
    TypeHint {
        name: symbol.name.clone(),
        kind: symbol.kind,
        declared_type: declared,
        return_type: returns,
        inferred: true,
        rationale: String::new(),
    }
}

trait Rationale {
    fn because(self, rationale: &str) -> Self;
    fn annotated(self) -> Self;
}

impl Rationale for TypeHint {
    fn because(mut self, rationale: &str) -> Self {
        self.rationale = rationale.to_string();
        self
    }

    fn annotated(mut self) -> Self {
        self.inferred = false;
        self
    }
}

/// Best-effort hint for a symbol declared in `content`.
pub fn hint_for(symbol: &CodeSymbol, content: &str) -> TypeHint {
    let structure = mask_source(content, MaskMode::CommentsAndStrings);
    let Some(after) = name_end(symbol, content) else {
        return hint(symbol, None, None).because("declaration not found in source");
    };
    let scan = Scan {
        code: content,
        structure: &structure,
    };

    match symbol.kind {
        SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum => {
            hint(symbol, Some(symbol.name.clone()), None)
                .annotated()
                .because("the declaration names its own type")
        }
        SymbolKind::Module | SymbolKind::Namespace => {
            hint(symbol, Some(format!("typeof {}", symbol.name)), None)
                .annotated()
                .because("namespaces are values of their own shape")
        }
        SymbolKind::TypeAlias => {
            let at = scan.skip_generics(scan.skip_ws(after));
            match scan.byte(at) {
                Some(b'=') => {
                    let aliased = scan.expression(at + 1, &[b';']);
                    hint(symbol, Some(aliased), None)
                        .annotated()
                        .because("aliased type")
                }
                _ => hint(symbol, None, None).because("alias has no right-hand side"),
            }
        }
        SymbolKind::EnumMember => {
            let at = scan.skip_ws(after);
            let literal = match scan.byte(at) {
                Some(b'=') => infer_expression(&scan.expression(at + 1, &[b',', b'}'])),
                _ => None,
            };
            let declared = match literal.as_deref() {
                Some("string") => "string".to_string(),
                _ => symbol
                    .container_name
                    .clone()
                    .unwrap_or_else(|| "number".to_string()),
            };
            hint(symbol, Some(declared), None).because("enum members take their enum's type")
        }
        SymbolKind::Constructor => {
            let class = symbol.container_name.clone().unwrap_or_default();
            hint(symbol, None, Some(class)).because("constructors produce their class")
        }
        SymbolKind::Function | SymbolKind::Method => callable_hint(symbol, &scan, after),
        SymbolKind::Variable
        | SymbolKind::Constant
        | SymbolKind::Property
        | SymbolKind::Field
        | SymbolKind::Parameter => value_hint(symbol, &scan, after),
    }
}

/// Byte offset just past the symbol's name.
fn name_end(symbol: &CodeSymbol, content: &str) -> Option<usize> {
    let line_no = symbol.location.start_line;
    let mut line_start = 0;
    for (idx, raw) in content.split('\n').enumerate() {
        if idx + 1 == line_no {
            let hits = word_occurrences(raw, &symbol.name);
            let (byte, _) = match symbol.location.column {
                Some(column) => hits.iter().find(|(_, c)| *c == column).or(hits.first()),
                None => hits.first(),
            }?;
            return Some(line_start + byte + symbol.name.len());
        }
        line_start += raw.len() + 1;
    }
    None
}

fn value_hint(symbol: &CodeSymbol, scan: &Scan, after: usize) -> TypeHint {
    let mut at = scan.skip_ws(after);
    if matches!(scan.byte(at), Some(b'?') | Some(b'!')) {
        at = scan.skip_ws(at + 1);
    }
    let stops: &[u8] = if symbol.kind == SymbolKind::Parameter {
        &[b',', b')', b'=']
    } else {
        &[b';', b',', b'=']
    };
    match scan.byte(at) {
        Some(b':') => {
            let declared = scan.expression(at + 1, stops);
            hint(symbol, Some(declared), None)
                .annotated()
                .because("explicit type annotation")
        }
        Some(b'=') if scan.byte(at + 1) != Some(b'=') => {
            let initializer = scan.expression(at + 1, &[b';', b',', b')']);
            match infer_expression(&initializer) {
                Some(ty) => hint(symbol, Some(ty), None).because("inferred from the initializer"),
                None => hint(symbol, None, None)
                    .because("initializer is not a recognizable literal or construction"),
            }
        }
        _ => hint(symbol, None, None).because("no annotation or initializer"),
    }
}

fn callable_hint(symbol: &CodeSymbol, scan: &Scan, after: usize) -> TypeHint {
    let mut at = scan.skip_ws(after);
    if scan.byte(at) == Some(b'?') {
        at = scan.skip_ws(at + 1);
    }
    let mut is_async = symbol.has_modifier(Modifier::Async);

    match scan.byte(at) {
        // `const f: Handler = ...`
        Some(b':') => {
            let declared = scan.expression(at + 1, &[b';', b'=']);
            return hint(symbol, Some(declared), None)
                .annotated()
                .because("explicit type annotation on the binding");
        }
        // `const f = async function () {}` or `const f = (x) => x`
        Some(b'=') => {
            at = scan.skip_ws(at + 1);
            if scan.keyword_at(at, "async") {
                is_async = true;
                at = scan.skip_ws(at + "async".len());
            }
            if scan.keyword_at(at, "function") {
                at = scan.skip_ws(at + "function".len());
                if scan.byte(at) == Some(b'*') {
                    at = scan.skip_ws(at + 1);
                }
                at = scan.skip_ws(scan.skip_identifier(at));
            }
        }
        _ => {}
    }
    at = scan.skip_ws(scan.skip_generics(at));

    // Parameters: `(a, b)` or a single bare `x =>`.
    let params_end = match scan.byte(at) {
        Some(b'(') => match matching_delimiter(scan.structure, at) {
            Some(close) => close + 1,
            None => return hint(symbol, None, None).because("unbalanced parameter list"),
        },
        _ if scan.identifier_at(at) => scan.skip_identifier(at),
        _ => return hint(symbol, None, None).because("no parameter list found"),
    };

    let mut at = scan.skip_ws(params_end);
    if scan.byte(at) == Some(b':') {
        let annotation = scan.return_annotation(at + 1);
        return hint(symbol, None, Some(annotation))
            .annotated()
            .because("explicit return annotation");
    }

    let wrap = |ty: String| {
        if is_async && !ty.starts_with("Promise<") {
            format!("Promise<{}>", ty)
        } else {
            ty
        }
    };

    if scan.starts_with(at, "=>") {
        at = scan.skip_ws(at + 2);
        if scan.byte(at) != Some(b'{') {
            let body = scan.expression(at, &[b';', b',', b')']);
            let ty = infer_expression(&body).unwrap_or_else(|| "unknown".to_string());
            return hint(symbol, None, Some(wrap(ty)))
                .because("expression-bodied arrow function");
        }
    }
    if scan.byte(at) != Some(b'{') {
        return hint(symbol, None, None).because("declaration has no body to inspect");
    }
    let Some(close) = matching_delimiter(scan.structure, at) else {
        return hint(symbol, None, None).because("unbalanced function body");
    };

    let returns = scan.return_expressions(at + 1, close);
    if returns.is_empty() {
        return hint(symbol, None, Some(wrap("void".to_string())))
            .because("no return statements");
    }
    let mut types: Vec<String> = Vec::new();
    for expr in &returns {
        let ty = if expr.is_empty() {
            Some("void".to_string())
        } else {
            infer_expression(expr)
        };
        if let Some(ty) = ty
            && !types.contains(&ty)
        {
            types.push(ty);
        }
    }
    let ty = if types.is_empty() {
        "unknown".to_string()
    } else {
        types.join(" | ")
    };
    let rationale = format!("inferred from {} return statement(s)", returns.len());
    hint(symbol, None, Some(wrap(ty))).because(&rationale)
}

/// The type an expression evaluates to, when its shape makes that obvious.
pub fn infer_expression(expr: &str) -> Option<String> {
    let expr = expr.trim().trim_end_matches(';').trim();
    if expr.is_empty() {
        return None;
    }
    if let Some(inner) = expr.strip_prefix('(').and_then(|e| e.strip_suffix(')'))
        && matching_delimiter(&mask_source(expr, MaskMode::CommentsAndStrings), 0)
            == Some(expr.len() - 1)
    {
        return infer_expression(inner);
    }
    if let Some(rest) = expr.strip_prefix("await ") {
        return infer_expression(rest);
    }

    let masked = mask_source(expr, MaskMode::CommentsAndStrings);
    let top = |needle: &str| contains_top_level(&masked, needle);

    // `x as T` names its type outright.
    if let Some(at) = rfind_top_level(&masked, " as ") {
        let ty = expr[at + 4..].trim();
        if ty != "const" {
            return Some(ty.to_string());
        }
        return infer_expression(&expr[..at]);
    }
    let is_arrow =
        masked.contains("=>") && (masked.starts_with('(') || masked.starts_with("async"));
    if is_arrow || masked.starts_with("function") {
        return Some("Function".to_string());
    }
    if COMPARISONS.iter().any(|op| top(op))
        || top(" instanceof ")
        || top(" in ")
        || expr.starts_with('!')
    {
        return Some("boolean".to_string());
    }
    if expr.starts_with("typeof ") {
        return Some("string".to_string());
    }

    match expr.as_bytes()[0] {
        b'\'' | b'"' | b'`' if is_single_literal(&masked) => return Some("string".to_string()),
        b'[' => return Some(array_type(expr)),
        b'{' => return Some("object".to_string()),
        _ => {}
    }
    if top(" + ") || top("+") {
        let parts = split_operands(expr, &masked, '+');
        let types: Vec<Option<String>> = parts.iter().map(|p| infer_expression(p)).collect();
        if types.iter().any(|t| t.as_deref() == Some("string")) {
            return Some("string".to_string());
        }
        if types.iter().all(|t| t.as_deref() == Some("number")) {
            return Some("number".to_string());
        }
        return None;
    }
    if ['-', '*', '/', '%'].iter().any(|op| top(&format!(" {} ", op))) {
        return Some("number".to_string());
    }

    match expr {
        "true" | "false" => return Some("boolean".to_string()),
        "null" => return Some("null".to_string()),
        "undefined" | "void 0" => return Some("undefined".to_string()),
        _ => {}
    }
    if BIGINT_RE.is_match(expr) {
        return Some("bigint".to_string());
    }
    if NUMBER_RE.is_match(expr) {
        return Some("number".to_string());
    }
    if let Some(rest) = expr.strip_prefix("new ") {
        let end = rest.find('(').unwrap_or(rest.len());
        let ty = rest[..end].trim();
        if !ty.is_empty() {
            return Some(ty.to_string());
        }
    }
    None
}

/// True when the masked text is exactly one string or template literal.
fn is_single_literal(masked: &str) -> bool {
    let Some(quote) = masked.chars().next() else {
        return false;
    };
    masked.len() > 1 && masked.ends_with(quote) && masked[1..masked.len() - 1].trim().is_empty()
}

fn array_type(expr: &str) -> String {
    let inner = expr
        .strip_prefix('[')
        .and_then(|e| e.strip_suffix(']'))
        .unwrap_or("");
    let elements: Vec<&str> = split_top_level(inner, ',')
        .into_iter()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect();
    let mut types: Vec<String> = Vec::new();
    for element in &elements {
        match infer_expression(element) {
            Some(ty) if !types.contains(&ty) => types.push(ty),
            Some(_) => {}
            None => return "any[]".to_string(),
        }
    }
    match types.as_slice() {
        [single] => format!("{}[]", single),
        _ => "any[]".to_string(),
    }
}

/// Byte offsets at nesting depth zero, for `masked` text.
fn top_level_positions(masked: &str, needle: &str) -> Vec<usize> {
    let bytes = masked.as_bytes();
    let mut depth: i32 = 0;
    let mut out = Vec::new();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            _ => {}
        }
        if depth == 0 && bytes[i..].starts_with(needle.as_bytes()) {
            out.push(i);
        }
    }
    out
}

fn contains_top_level(masked: &str, needle: &str) -> bool {
    !top_level_positions(masked, needle).is_empty()
}

fn rfind_top_level(masked: &str, needle: &str) -> Option<usize> {
    top_level_positions(masked, needle).last().copied()
}

fn split_operands<'e>(expr: &'e str, masked: &str, op: char) -> Vec<&'e str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for at in top_level_positions(masked, &op.to_string()) {
        parts.push(&expr[start..at]);
        start = at + op.len_utf8();
    }
    parts.push(&expr[start..]);
    parts
}

/// Cursor helpers over the original text and its masked twin.
struct Scan<'s> {
    code: &'s str,
    structure: &'s str,
}

impl<'s> Scan<'s> {
    fn byte(&self, at: usize) -> Option<u8> {
        self.structure.as_bytes().get(at).copied()
    }

    fn starts_with(&self, at: usize, needle: &str) -> bool {
        self.structure
            .as_bytes()
            .get(at..)
            .is_some_and(|rest| rest.starts_with(needle.as_bytes()))
    }

    fn skip_ws(&self, mut at: usize) -> usize {
        while self.byte(at).is_some_and(|b| b.is_ascii_whitespace()) {
            at += 1;
        }
        at
    }

    fn is_ident_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
    }

    fn identifier_at(&self, at: usize) -> bool {
        self.byte(at)
            .is_some_and(|b| Self::is_ident_byte(b) && !b.is_ascii_digit())
    }

    fn skip_identifier(&self, mut at: usize) -> usize {
        while self.byte(at).is_some_and(Self::is_ident_byte) {
            at += 1;
        }
        at
    }

    fn keyword_at(&self, at: usize, keyword: &str) -> bool {
        let before_ok = at == 0 || !self.byte(at - 1).is_some_and(Self::is_ident_byte);
        let after_ok = !self
            .byte(at + keyword.len())
            .is_some_and(Self::is_ident_byte);
        before_ok && after_ok && self.starts_with(at, keyword)
    }

    fn skip_generics(&self, at: usize) -> usize {
        if self.byte(at) == Some(b'<') {
            matching_delimiter(self.structure, at).map_or(at, |close| close + 1)
        } else {
            at
        }
    }

    /// Original text from `start` to the first top-level stop byte, a closing
    /// bracket that was never opened, or a line break ending the expression.
    fn expression(&self, start: usize, stops: &[u8]) -> String {
        let end = self.expression_end(start, stops);
        self.code[start..end].trim().to_string()
    }

    fn expression_end(&self, start: usize, stops: &[u8]) -> usize {
        let bytes = self.structure.as_bytes();
        let mut depth: i32 = 0;
        let mut at = start;
        while at < bytes.len() {
            let b = bytes[at];
            match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' if depth == 0 => return at,
                b')' | b']' | b'}' => depth -= 1,
                b'=' if depth == 0 && stops.contains(&b'=') => {
                    // `=>` and `==` are not assignments.
                    let arrow = matches!(bytes.get(at + 1), Some(b'>') | Some(b'='));
                    let compared =
                        at > 0 && matches!(bytes[at - 1], b'=' | b'!' | b'<' | b'>');
                    if !arrow && !compared {
                        return at;
                    }
                }
                b'\n' if depth == 0 => {
                    let so_far = self.structure[start..at].trim_end();
                    let next = self.structure[at..].trim_start();
                    let continues = so_far.is_empty()
                        || so_far.ends_with(CONTINUES_LINE)
                        || next.starts_with(CONTINUES_NEXT);
                    if !continues {
                        return at;
                    }
                }
                _ if depth == 0 && b != b'=' && stops.contains(&b) => return at,
                _ => {}
            }
            at += 1;
        }
        bytes.len()
    }

    /// Return-type annotation text after `: ` up to the body or the arrow.
    fn return_annotation(&self, start: usize) -> String {
        let at = self.skip_ws(start);
        if self.byte(at) == Some(b'{')
            && let Some(close) = matching_delimiter(self.structure, at)
        {
            return self.code[at..=close].trim().to_string();
        }
        let bytes = self.structure.as_bytes();
        let mut depth: i32 = 0;
        let mut i = at;
        while i < bytes.len() {
            match bytes[i] {
                b'(' | b'[' | b'<' => depth += 1,
                b')' | b']' => depth -= 1,
                b'>' if i > 0 && bytes[i - 1] != b'=' => depth -= 1,
                b'{' | b';' | b'\n' if depth <= 0 => break,
                b'=' if depth <= 0 && bytes.get(i + 1) == Some(&b'>') => break,
                _ => {}
            }
            i += 1;
        }
        self.code[start..i].trim().to_string()
    }

    /// `return` expressions of a body, not descending into nested functions.
    fn return_expressions(&self, start: usize, end: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut at = start;
        while at < end {
            if self.keyword_at(at, "function") {
                let open = self.structure[at..end].find('{').map(|o| at + o);
                match open.and_then(|o| matching_delimiter(self.structure, o)) {
                    Some(close) => {
                        at = close + 1;
                        continue;
                    }
                    None => break,
                }
            }
            if self.starts_with(at, "=>") {
                let body = self.skip_ws(at + 2);
                if self.byte(body) == Some(b'{')
                    && let Some(close) = matching_delimiter(self.structure, body)
                {
                    at = close + 1;
                    continue;
                }
                at += 2;
                continue;
            }
            if self.keyword_at(at, "return") {
                let expr_start = at + "return".len();
                let expr_end = self.expression_end(expr_start, &[b';']).min(end);
                out.push(self.code[expr_start..expr_end].trim().to_string());
                at = expr_end.max(expr_start);
                continue;
            }
            at += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_api::SymbolLocation;

    fn symbol(name: &str, kind: SymbolKind, line: usize, column: usize) -> CodeSymbol {
        CodeSymbol::new(
            name,
            kind,
            SymbolLocation::new("/w/a.ts", line, line).with_column(column),
        )
    }

    #[test]
    fn test_literals() {
        assert_eq!(infer_expression("'a'").as_deref(), Some("string"));
        assert_eq!(infer_expression("`x${y}`").as_deref(), Some("string"));
        assert_eq!(infer_expression("42").as_deref(), Some("number"));
        assert_eq!(infer_expression("0xff").as_deref(), Some("number"));
        assert_eq!(infer_expression("10n").as_deref(), Some("bigint"));
        assert_eq!(infer_expression("a === b").as_deref(), Some("boolean"));
        assert_eq!(infer_expression("[1, 2]").as_deref(), Some("number[]"));
        assert_eq!(
            infer_expression("[1, 'a']").as_deref(),
            Some("any[]")
        );
        assert_eq!(
            infer_expression("new Map<string, number>()").as_deref(),
            Some("Map<string, number>")
        );
        assert_eq!(infer_expression("'a' + count").as_deref(), Some("string"));
        assert_eq!(infer_expression("x as Foo").as_deref(), Some("Foo"));
        assert_eq!(infer_expression("compute()"), None);
    }

    #[test]
    fn test_annotated_return() {
        let src = "function area(r: number): number {\n  return r * r;\n}\n";
        let h = hint_for(&symbol("area", SymbolKind::Function, 1, 10), src);
        assert_eq!(h.return_type.as_deref(), Some("number"));
        assert!(!h.inferred);
    }

    #[test]
    fn test_union_of_returns_skips_nested_functions() {
        let src = concat!(
            "function pick(flag) {\n",
            "  const inner = function () { return [] };\n",
            "  if (flag) return 'yes';\n",
            "  return 0;\n",
            "}\n",
        );
        let h = hint_for(&symbol("pick", SymbolKind::Function, 1, 10), src);
        assert_eq!(h.return_type.as_deref(), Some("string | number"));
        assert!(h.inferred);
    }

    #[test]
    fn test_async_without_return_is_promise_void() {
        let mut s = symbol("run", SymbolKind::Function, 1, 16);
        s.add_modifier(Modifier::Async);
        let h = hint_for(&s, "async function run() {\n  await go();\n}\n");
        assert_eq!(h.return_type.as_deref(), Some("Promise<void>"));
    }

    #[test]
    fn test_arrow_binding_and_variables() {
        let src = concat!(
            "const double = (n: number) => n * 2;\n",
            "let label = 'x';\n",
            "const limit: Limit = load();\n",
        );
        let arrow = hint_for(&symbol("double", SymbolKind::Function, 1, 7), src);
        assert_eq!(arrow.return_type.as_deref(), Some("number"));

        let label = hint_for(&symbol("label", SymbolKind::Variable, 2, 5), src);
        assert_eq!(label.declared_type.as_deref(), Some("string"));

        let limit = hint_for(&symbol("limit", SymbolKind::Constant, 3, 7), src);
        assert_eq!(limit.declared_type.as_deref(), Some("Limit"));
        assert!(!limit.inferred);
    }
}

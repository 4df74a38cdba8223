//! Import and export statement extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use wayfinder_api::models::{ExportInfo, ImportInfo};
use wayfinder_plugin::ModuleSyntax;
use wayfinder_plugin::text::{MaskMode, is_identifier, mask_source, split_top_level};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in module pattern must compile")
}

static IMPORT_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r#"\bimport\s+(?:type\s+)?([^;'"`()]*?)\s*\bfrom\s*['"]([^'"]+)['"]"#)
});
static IMPORT_SIDE_EFFECT_RE: Lazy<Regex> =
    Lazy::new(|| compile(r#"\bimport\s*['"]([^'"]+)['"]"#));
static IMPORT_REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r#"\bimport\s+([A-Za-z_$][\w$]*)\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
});
static REQUIRE_BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r#"\b(?:const|let|var)\s+([^=;]+?)\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
});
static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#));
static DYNAMIC_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| compile(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#));
static EXPORT_STAR_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r#"\bexport\s+(?:type\s+)?\*\s*(?:as\s+([A-Za-z_$][\w$]*)\s*)?from\s*['"]([^'"]+)['"]"#)
});
static EXPORT_LIST_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r#"\bexport\s+(?:type\s+)?\{([^}]*)\}(?:\s*from\s*['"]([^'"]+)['"])?"#)
});
static EXPORT_DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"\bexport\s+default\s+(?:(?:abstract\s+)?class\b\s*|(?:async\s+)?function\b\s*\*?\s*)?([A-Za-z_$][\w$]*)?",
    )
});
static EXPORT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"\bexport\s+(?:declare\s+)?(?:abstract\s+)?(?:async\s+)?(class|interface|const\s+enum|enum|type|namespace|module|function\s*\*?|const|let|var)\s+",
    )
});
static IDENT_RE: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Za-z_$][\w$]*"));
static EXPORT_ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"\bexport\s*=\s*([A-Za-z_$][\w$]*)"));

/// Parse an import clause such as `Def, { a, b as c }` or `* as ns`.
fn clause_imports(clause: &str, source: &str) -> Vec<ImportInfo> {
    let mut out = Vec::new();
    let clause = clause.trim();
    let (head, braces) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if close > open => {
            (&clause[..open], Some(&clause[open + 1..close]))
        }
        _ => (clause, None),
    };

    for part in head.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(ns) = part.strip_prefix('*') {
            let local = ns.trim().strip_prefix("as").map(str::trim).unwrap_or_default();
            out.push(ImportInfo {
                name: "*".to_string(),
                source: source.to_string(),
                is_default: false,
                is_namespace: true,
                local_name: Some(local.to_string()).filter(|l| !l.is_empty()),
            });
        } else if is_identifier(part) {
            out.push(ImportInfo {
                name: part.to_string(),
                source: source.to_string(),
                is_default: true,
                is_namespace: false,
                local_name: None,
            });
        }
    }

    if let Some(list) = braces {
        for item in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let item = item.strip_prefix("type ").map(str::trim).unwrap_or(item);
            let mut words = item.split_whitespace();
            let Some(name) = words.next() else { continue };
            let local = match (words.next(), words.next()) {
                (Some("as"), Some(alias)) => Some(alias.to_string()),
                _ => None,
            };
            out.push(ImportInfo {
                name: name.to_string(),
                source: source.to_string(),
                is_default: name == "default",
                is_namespace: false,
                local_name: local,
            });
        }
    }
    out
}

/// Bindings of `const <binding> = require(...)`.
fn require_imports(binding: &str, source: &str) -> Vec<ImportInfo> {
    let binding = binding.trim();
    let binding = if binding.starts_with('{') {
        binding
    } else {
        binding.split(':').next().unwrap_or(binding).trim()
    };
    if is_identifier(binding) {
        return vec![ImportInfo {
            name: "*".to_string(),
            source: source.to_string(),
            is_default: false,
            is_namespace: true,
            local_name: Some(binding.to_string()),
        }];
    }
    let Some(inner) = binding.strip_prefix('{').and_then(|b| b.strip_suffix('}')) else {
        return vec![ImportInfo::named("", source)];
    };
    inner
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|item| {
            let (name, local) = match item.split_once(':') {
                Some((name, local)) => (name.trim(), Some(local.trim().to_string())),
                None => (item, None),
            };
            ImportInfo {
                local_name: local,
                ..ImportInfo::named(name, source)
            }
        })
        .collect()
}

/// Names declared by `export <keyword> ...` starting at `rest`.
fn declared_names(keyword: &str, rest: &str) -> Vec<String> {
    let is_variable = matches!(keyword, "const" | "let" | "var");
    if !is_variable {
        return IDENT_RE
            .find(rest)
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();
    }
    let mut end = rest.find(';').unwrap_or(rest.len());
    for (at, _) in rest[..end].match_indices('\n') {
        if !rest[..at].trim_end().ends_with([',', '=', '{', '(', '[']) {
            end = at;
            break;
        }
    }
    let statement = &rest[..end];
    let mut names = Vec::new();
    for part in split_top_level(statement, ',') {
        let binding = split_top_level(part, '=').first().copied().unwrap_or(part);
        let binding = binding.trim();
        let binding = match binding.strip_prefix(['{', '[']) {
            Some(inner) => inner.trim_end_matches([' ', '}', ']']),
            None => binding.split(':').next().unwrap_or(binding),
        };
        // Destructured names: `{ a, b: c }` exports `a` and `c`.
        for item in binding.split(',') {
            let local = item.rsplit(':').next().unwrap_or(item).trim();
            let local = local.strip_prefix("...").unwrap_or(local);
            if is_identifier(local) {
                names.push(local.to_string());
            }
        }
    }
    names
}

/// Extract every import and export of one module, in source order.
pub fn extract_module_syntax(content: &str) -> ModuleSyntax {
    let code = mask_source(content, MaskMode::Comments);
    let structure = mask_source(content, MaskMode::CommentsAndStrings);

    let mut imports: Vec<(usize, ImportInfo)> = Vec::new();
    let mut exports: Vec<(usize, ExportInfo)> = Vec::new();
    let mut claimed: Vec<std::ops::Range<usize>> = Vec::new();
    let mut bindings: Vec<std::ops::Range<usize>> = Vec::new();
    let is_claimed =
        |claimed: &[std::ops::Range<usize>], at: usize| claimed.iter().any(|r| r.contains(&at));

    // 1. ES imports
    for caps in IMPORT_FROM_RE.captures_iter(&code) {
        let (Some(whole), Some(clause), Some(source)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        claimed.push(whole.range());
        bindings.push(whole.range());
        for info in clause_imports(clause.as_str(), source.as_str()) {
            imports.push((whole.start(), info));
        }
    }
    for caps in IMPORT_SIDE_EFFECT_RE.captures_iter(&code) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        imports.push((whole.start(), ImportInfo::named("", source.as_str())));
    }

    // 2. CommonJS and dynamic imports
    for caps in IMPORT_REQUIRE_RE.captures_iter(&code) {
        let (Some(whole), Some(local), Some(source)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        claimed.push(whole.range());
        bindings.push(whole.range());
        imports.push((
            whole.start(),
            ImportInfo {
                name: "*".to_string(),
                source: source.as_str().to_string(),
                is_default: false,
                is_namespace: true,
                local_name: Some(local.as_str().to_string()),
            },
        ));
    }
    for caps in REQUIRE_BINDING_RE.captures_iter(&code) {
        let (Some(whole), Some(binding), Some(source)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        claimed.push(whole.range());
        bindings.push(whole.range());
        for info in require_imports(binding.as_str(), source.as_str()) {
            imports.push((whole.start(), info));
        }
    }
    for caps in REQUIRE_RE.captures_iter(&code) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if is_claimed(&claimed, whole.start()) {
            continue;
        }
        imports.push((whole.start(), ImportInfo::named("", source.as_str())));
    }
    for caps in DYNAMIC_IMPORT_RE.captures_iter(&code) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        imports.push((
            whole.start(),
            ImportInfo {
                name: "*".to_string(),
                source: source.as_str().to_string(),
                is_default: false,
                is_namespace: true,
                local_name: None,
            },
        ));
    }

    // 3. Re-exports and export lists
    for caps in EXPORT_STAR_RE.captures_iter(&code) {
        let (Some(whole), Some(source)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let name = caps.get(1).map_or("*", |m| m.as_str());
        bindings.push(whole.range());
        exports.push((
            whole.start(),
            ExportInfo {
                name: name.to_string(),
                is_default: false,
                is_re_export: true,
                source: Some(source.as_str().to_string()),
            },
        ));
    }
    for caps in EXPORT_LIST_RE.captures_iter(&code) {
        let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let source = caps.get(2).map(|m| m.as_str().to_string());
        if source.is_some() {
            bindings.push(whole.range());
        }
        for item in list.as_str().split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let item = item.strip_prefix("type ").map(str::trim).unwrap_or(item);
            let words: Vec<&str> = item.split_whitespace().collect();
            let exported = match words.as_slice() {
                [_, "as", alias] => *alias,
                [name, ..] => *name,
                [] => continue,
            };
            exports.push((
                whole.start(),
                ExportInfo {
                    name: exported.to_string(),
                    is_default: exported == "default",
                    is_re_export: source.is_some(),
                    source: source.clone(),
                },
            ));
        }
    }

    // 4. Exported declarations, matched on the string-blind text
    for caps in EXPORT_DEFAULT_RE.captures_iter(&structure) {
        let Some(whole) = caps.get(0) else { continue };
        let name = caps.get(1).map_or("default", |m| m.as_str());
        exports.push((
            whole.start(),
            ExportInfo {
                name: name.to_string(),
                is_default: true,
                is_re_export: false,
                source: None,
            },
        ));
    }
    for caps in EXPORT_DECL_RE.captures_iter(&structure) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let keyword = keyword.as_str().trim_end_matches(['*', ' ']);
        for name in declared_names(keyword, &structure[whole.end()..]) {
            exports.push((whole.start(), ExportInfo::local(name)));
        }
    }
    for caps in EXPORT_ASSIGN_RE.captures_iter(&structure) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        exports.push((
            whole.start(),
            ExportInfo {
                name: name.as_str().to_string(),
                is_default: true,
                is_re_export: false,
                source: None,
            },
        ));
    }

    imports.sort_by_key(|(at, _)| *at);
    exports.sort_by_key(|(at, _)| *at);
    bindings.sort_by_key(|r| r.start);
    ModuleSyntax {
        imports: imports.into_iter().map(|(_, i)| i).collect(),
        exports: exports.into_iter().map(|(_, e)| e).collect(),
        binding_ranges: bindings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_default_and_named() {
        let imports = clause_imports("React, { useState, useEffect as effect }", "react");
        assert_eq!(imports.len(), 3);
        assert!(imports[0].is_default);
        assert_eq!(imports[2].binding(), "effect");
    }

    #[test]
    fn test_binding_ranges_cover_import_statements() {
        let source = "import { f } from './a';\nf();\n";
        let syntax = extract_module_syntax(source);
        assert_eq!(syntax.binding_ranges.len(), 1);
        assert!(syntax.is_binding_offset(source.find('f').unwrap()));
        assert!(!syntax.is_binding_offset(source.rfind("f(").unwrap()));
    }

    #[test]
    fn test_declared_names_multiple_declarators() {
        assert_eq!(declared_names("const", "a = 1, b = { c: 2 };"), vec!["a", "b"]);
        assert_eq!(declared_names("function", "make<T>() {}"), vec!["make"]);
    }
}

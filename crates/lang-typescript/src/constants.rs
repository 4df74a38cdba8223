/// Extensions handled by the plugin.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Suffixes tried, in order, for an extension-less specifier.
pub const RESOLUTION_EXTENSIONS: &[&str] =
    &["ts", "tsx", "d.ts", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Words that read like `name(` but start a statement or expression.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "typeof", "with", "do",
    "else", "new",
];

/// Member modifiers recognised ahead of a class member name.
pub const MEMBER_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "static",
    "readonly",
    "async",
    "abstract",
    "declare",
    "override",
    "get",
    "set",
];

pub fn is_control_keyword(word: &str) -> bool {
    CONTROL_KEYWORDS.contains(&word)
}

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Source language of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Cow<'static, str>);

impl Language {
    pub const TYPESCRIPT: Language = Language(Cow::Borrowed("typescript"));
    pub const TSX: Language = Language(Cow::Borrowed("tsx"));
    pub const JAVASCRIPT: Language = Language(Cow::Borrowed("javascript"));
    pub const UNKNOWN: Language = Language(Cow::Borrowed("unknown"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" | "mts" | "cts" => Self::TYPESCRIPT,
            "tsx" | "jsx" => Self::TSX,
            "js" | "mjs" | "cjs" => Self::JAVASCRIPT,
            _ => Self::UNKNOWN,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

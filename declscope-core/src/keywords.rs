//! Recognized C++ keywords.
//!
//! The engine only needs fixed-prefix checks for a handful of these, but it
//! receives the whole set so callers can swap in a different vocabulary.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::normalize::starts_with_prefix;

/// C++98 reserved words.
const CPP_KEYWORDS: &[&str] = &[
    "asm", "auto", "bool", "break", "case", "catch", "char", "class", "const",
    "const_cast", "continue", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new",
    "operator", "private", "protected", "public", "register", "reinterpret_cast",
    "return", "short", "signed", "sizeof", "static", "static_cast", "struct",
    "switch", "template", "this", "throw", "true", "try", "typedef", "typeid",
    "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
    "wchar_t", "while",
];

pub const NAMESPACE: &str = "namespace";
pub const CLASS: &str = "class";
pub const STRUCT: &str = "struct";

/// An immutable set of keywords.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    words: HashSet<&'static str>,
}

impl KeywordSet {
    /// Builds a set from an explicit word list.
    pub fn new(words: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }

    /// The shared C++ keyword set.
    pub fn cpp() -> &'static KeywordSet {
        static SET: OnceLock<KeywordSet> = OnceLock::new();
        SET.get_or_init(|| KeywordSet::new(CPP_KEYWORDS.iter().copied()))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True if `keyword` belongs to the set and `line` starts with it.
    pub fn line_opens(&self, line: &str, keyword: &str) -> bool {
        self.contains(keyword) && starts_with_prefix(line, keyword)
    }
}

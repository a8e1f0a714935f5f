//! Language descriptors for syntax highlighting.
//!
//! A [`Language`] is a read-only grammar entry: file-match patterns, keyword
//! lists, comment markers, and feature flags. The registry selects one per
//! document by filename; selection is immutable until the file is renamed.

use std::path::Path;

/// Language-specific rules for classification.
#[derive(Debug, Clone)]
pub struct Language {
    pub name: &'static str,
    /// Patterns starting with '.' match the file extension exactly;
    /// anything else matches as a substring of the filename.
    pub file_match: &'static [&'static str],
    /// Primary keywords (control flow, declarations)
    pub keywords: &'static [&'static str],
    /// Secondary keywords: type names, classified distinctly
    pub types: &'static [&'static str],
    pub line_comment: &'static str,
    pub block_comment_start: &'static str,
    pub block_comment_end: &'static str,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

impl Language {
    pub fn c() -> Self {
        Self {
            name: "c",
            file_match: &[".c", ".h", ".cpp"],
            keywords: &[
                "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
                "union", "typedef", "static", "enum", "class", "case",
            ],
            types: &[
                "int", "long", "double", "float", "char", "unsigned", "signed", "void",
            ],
            line_comment: "//",
            block_comment_start: "/*",
            block_comment_end: "*/",
            highlight_numbers: true,
            highlight_strings: true,
        }
    }

    pub fn rust() -> Self {
        Self {
            name: "rust",
            file_match: &[".rs"],
            keywords: &[
                "as", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
                "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
                "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
                "type", "unsafe", "use", "where", "while",
            ],
            types: &[
                "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "u8", "u16", "u32",
                "u64", "isize", "usize", "f32", "f64", "Vec", "Option", "Result", "Box",
            ],
            line_comment: "//",
            block_comment_start: "/*",
            block_comment_end: "*/",
            highlight_numbers: true,
            highlight_strings: true,
        }
    }

    pub fn go() -> Self {
        Self {
            name: "go",
            file_match: &[".go"],
            keywords: &[
                "if", "else", "for", "switch", "case", "default", "break", "continue", "goto",
                "fallthrough", "return", "select", "var", "const", "type", "func", "package",
                "import", "go", "chan", "defer", "range", "struct", "interface", "map",
            ],
            types: &[
                "bool", "string", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
                "uint16", "uint32", "uint64", "byte", "rune", "float32", "float64", "error",
            ],
            line_comment: "//",
            block_comment_start: "/*",
            block_comment_end: "*/",
            highlight_numbers: true,
            highlight_strings: true,
        }
    }
}

/// Ordered table of known languages; first matching entry wins.
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            languages: vec![Language::c(), Language::rust(), Language::go()],
        }
    }

    /// Select a language for a filename.
    ///
    /// Extension patterns are tried across the whole table before substring
    /// patterns, so an exact extension match always beats a looser one.
    pub fn detect(&self, filename: &str) -> Option<&Language> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e));

        for lang in &self.languages {
            if let Some(ext) = &ext {
                if lang
                    .file_match
                    .iter()
                    .any(|pat| pat.starts_with('.') && pat == ext)
                {
                    return Some(lang);
                }
            }
        }

        for lang in &self.languages {
            if lang
                .file_match
                .iter()
                .any(|pat| !pat.starts_with('.') && filename.contains(pat))
            {
                return Some(lang);
            }
        }

        None
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

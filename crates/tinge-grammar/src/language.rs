//! Built-in language identifiers.

use std::path::Path;

/// Languages with a built-in grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    PlainText,
    C,
    Cpp,
}

const C_EXTENSIONS: &[&str] = &["c", "h"];
const CPP_EXTENSIONS: &[&str] = &[
    "cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++", "ipp", "tpp",
];

impl Language {
    /// Every built-in language, plain text included.
    pub const ALL: [Language; 3] = [Language::PlainText, Language::C, Language::Cpp];

    /// File extensions claimed by the language, lowercase and without the dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::PlainText => &[],
            Language::C => C_EXTENSIONS,
            Language::Cpp => CPP_EXTENSIONS,
        }
    }

    /// Detects the language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        [Language::C, Language::Cpp]
            .into_iter()
            .find(|language| language.extensions().contains(&ext.as_str()))
            .unwrap_or(Language::PlainText)
    }

    /// Detects the language from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::PlainText)
    }

    /// Looks a language up by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "c" => Some(Language::C),
            "cpp" | "c++" | "cxx" => Some(Language::Cpp),
            "text" | "plain" | "plaintext" => Some(Language::PlainText),
            _ => None,
        }
    }

    /// Short name used as the grammar name.
    pub fn id(self) -> &'static str {
        match self {
            Language::PlainText => "text",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    /// Display name for the language.
    pub fn name(self) -> &'static str {
        match self {
            Language::PlainText => "Plain Text",
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

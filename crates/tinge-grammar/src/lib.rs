//! # Tinge Grammar
//!
//! Declarative grammar tables for the C family of languages.
//!
//! A [`Grammar`] says *what* the tokenizer should recognise: which words are
//! keywords, which are types, how comments are delimited, which operators
//! exist and which optional features (preprocessor, raw strings, digit
//! separators) apply. It holds no scanning logic; `tinge-lexer` walks text and
//! consults the table.
//!
//! ## Built-in and custom grammars
//!
//! C and C++ ship as built-ins (see [`Grammar::c`] and [`Grammar::cpp`]).
//! Further C-like languages can be described in TOML and loaded through a
//! [`GrammarRegistry`]:
//!
//! ```toml
//! name = "glsl"
//! extensions = ["vert", "frag"]
//! keywords = ["uniform", "in", "out", "layout"]
//! types = ["vec2", "vec3", "vec4", "mat4"]
//! preprocessor = true
//! ```

mod builtin;
mod grammar;
mod language;
mod registry;

pub use grammar::{BlockComment, Grammar, GrammarOverride, WordClass, WordList};
pub use language::Language;
pub use registry::GrammarRegistry;

/// Errors that can occur while loading or validating grammars.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("Unknown grammar: {0}")]
    UnknownGrammar(String),

    #[error("Invalid grammar '{name}': {reason}")]
    Invalid { name: String, reason: String },

    #[error("Failed to read grammar file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for grammar operations
pub type GrammarResult<T> = Result<T, GrammarError>;

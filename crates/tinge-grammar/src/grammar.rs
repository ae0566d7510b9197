//! The grammar table and its word lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::{GrammarError, GrammarResult};

/// A set of words belonging to one token category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordList(HashSet<String>);

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from static words.
    pub fn from_static(words: &[&str]) -> Self {
        Self(words.iter().map(|w| (*w).to_string()).collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.0.insert(word.into())
    }

    pub fn remove(&mut self, word: &str) -> bool {
        self.0.remove(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for WordList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Start and end markers of a block comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockComment {
    pub start: String,
    pub end: String,
}

impl BlockComment {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Category a grammar assigns to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    /// `true`, `false`
    Boolean,
    /// `NULL`, `nullptr`
    Null,
    /// Control flow keywords: `if`, `for`, `return`, ...
    Control,
    /// Any other reserved word
    Keyword,
    /// Built-in and well-known library types
    Type,
}

/// Declarative description of a C-like language.
///
/// Word classification checks the lists in the order of [`WordClass`], so a
/// word listed both as a constant and as a keyword is a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grammar {
    /// Grammar name, used for lookups
    pub name: String,

    /// File extensions (without the dot) handled by this grammar
    pub extensions: Vec<String>,

    /// Reserved words
    pub keywords: WordList,

    /// Control flow keywords
    pub control: WordList,

    /// Built-in type names
    pub types: WordList,

    /// Boolean literals
    pub constants: WordList,

    /// Null pointer literals
    pub null_literals: WordList,

    /// Line comment marker
    pub line_comment: Option<String>,

    /// Block comment markers
    pub block_comment: Option<BlockComment>,

    /// Operators and punctuators other than brackets, `,` and `;`
    pub operators: Vec<String>,

    /// Encoding prefixes for string and character literals (`u8`, `L`, ...)
    pub string_prefixes: Vec<String>,

    /// Recognise `#directive` lines
    pub preprocessor: bool,

    /// Recognise `R"delim(...)delim"` raw strings
    pub raw_strings: bool,

    /// Allow `'` between digits of a number
    pub digit_separators: bool,
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            name: String::new(),
            extensions: Vec::new(),
            keywords: WordList::new(),
            control: WordList::new(),
            types: WordList::new(),
            constants: WordList::new(),
            null_literals: WordList::new(),
            line_comment: Some("//".to_string()),
            block_comment: Some(BlockComment::new("/*", "*/")),
            operators: crate::builtin::C_OPERATORS
                .iter()
                .map(|op| (*op).to_string())
                .collect(),
            string_prefixes: Vec::new(),
            preprocessor: false,
            raw_strings: false,
            digit_separators: false,
        }
    }
}

impl Grammar {
    /// Parses a grammar from TOML and validates it.
    pub fn from_toml_str(source: &str) -> GrammarResult<Self> {
        let grammar: Self = toml::from_str(source)?;
        grammar.validate()?;
        Ok(grammar)
    }

    /// Loads a grammar from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> GrammarResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks that the table can drive a tokenizer.
    pub fn validate(&self) -> GrammarResult<()> {
        let invalid = |reason: String| GrammarError::Invalid {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(invalid("name must not contain whitespace".to_string()));
        }
        if matches!(&self.line_comment, Some(marker) if marker.is_empty()) {
            return Err(invalid("line comment marker is empty".to_string()));
        }
        if let Some(block) = &self.block_comment {
            if block.start.is_empty() || block.end.is_empty() {
                return Err(invalid("block comment markers must not be empty".to_string()));
            }
        }
        for op in &self.operators {
            if op.is_empty() {
                return Err(invalid("empty operator".to_string()));
            }
            if op
                .bytes()
                .any(|b| b.is_ascii_whitespace() || b.is_ascii_alphanumeric() || matches!(b, b'_' | b'"' | b'\''))
            {
                return Err(invalid(format!("operator '{op}' may only contain punctuation")));
            }
        }
        for prefix in &self.string_prefixes {
            if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(invalid(format!("string prefix '{prefix}' must be an identifier")));
            }
        }
        Ok(())
    }

    /// Classifies a word, or returns `None` for plain identifiers.
    pub fn classify_word(&self, word: &str) -> Option<WordClass> {
        if self.constants.contains(word) {
            Some(WordClass::Boolean)
        } else if self.null_literals.contains(word) {
            Some(WordClass::Null)
        } else if self.control.contains(word) {
            Some(WordClass::Control)
        } else if self.keywords.contains(word) {
            Some(WordClass::Keyword)
        } else if self.types.contains(word) {
            Some(WordClass::Type)
        } else {
            None
        }
    }

    /// Returns the length of the longest operator at the start of `rest`.
    pub fn match_operator(&self, rest: &[u8]) -> Option<usize> {
        self.operators
            .iter()
            .map(String::as_bytes)
            .filter(|op| !op.is_empty() && rest.starts_with(op))
            .map(<[u8]>::len)
            .max()
    }

    /// Returns the longest encoding prefix at the start of `rest`.
    pub fn match_string_prefix(&self, rest: &[u8]) -> Option<usize> {
        self.string_prefixes
            .iter()
            .map(String::as_bytes)
            .filter(|prefix| !prefix.is_empty() && rest.starts_with(prefix))
            .map(<[u8]>::len)
            .max()
    }

    /// Returns true if the grammar claims this extension.
    pub fn handles_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Extends the grammar with user-supplied words and extensions.
    pub fn apply(&mut self, overrides: &GrammarOverride) {
        for ext in &overrides.extensions {
            if !self.handles_extension(ext) {
                self.extensions.push(ext.clone());
            }
        }
        self.keywords.extend(overrides.keywords.iter().cloned());
        self.control.extend(overrides.control.iter().cloned());
        self.types.extend(overrides.types.iter().cloned());
        self.constants.extend(overrides.constants.iter().cloned());
        self.null_literals.extend(overrides.null_literals.iter().cloned());
    }
}

/// Additions to an existing grammar, usually from the user config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarOverride {
    pub extensions: Vec<String>,
    pub keywords: Vec<String>,
    pub control: Vec<String>,
    pub types: Vec<String>,
    pub constants: Vec<String>,
    pub null_literals: Vec<String>,
}

impl GrammarOverride {
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
            && self.keywords.is_empty()
            && self.control.is_empty()
            && self.types.is_empty()
            && self.constants.is_empty()
            && self.null_literals.is_empty()
    }
}

//! Token types produced by the lexers.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A byte range in the source text.
pub type TokenSpan = Range<usize>;

/// A single classified span of source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The byte span in the source text
    pub span: TokenSpan,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: TokenSpan) -> Self {
        Self { kind, span }
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> usize {
        self.span.end - self.span.start
    }

    pub fn is_empty(&self) -> bool {
        self.span.start == self.span.end
    }

    /// The token's bytes within `text`.
    pub fn text<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        &text[self.span.clone()]
    }

    /// Returns the token moved by `delta` bytes.
    pub(crate) fn shifted(&self, delta: isize) -> Self {
        Self {
            kind: self.kind,
            span: self.span.start.wrapping_add_signed(delta)..self.span.end.wrapping_add_signed(delta),
        }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Whitespace,
    Comment,
    /// `#include`, `#define`, ...
    Preprocessor,

    // Literals
    String,
    Char,
    Number,
    Boolean,
    Null,

    // Words
    Keyword,
    KeywordControl,
    TypeName,
    FunctionName,
    Namespace,
    Constant,
    Identifier,

    // Punctuation
    Operator,
    Delimiter,
    Separator,

    /// Unclassified text from the plain text lexer
    Text,
    Error,
}

impl TokenKind {
    /// Every token kind.
    pub const ALL: [TokenKind; 20] = [
        TokenKind::Whitespace,
        TokenKind::Comment,
        TokenKind::Preprocessor,
        TokenKind::String,
        TokenKind::Char,
        TokenKind::Number,
        TokenKind::Boolean,
        TokenKind::Null,
        TokenKind::Keyword,
        TokenKind::KeywordControl,
        TokenKind::TypeName,
        TokenKind::FunctionName,
        TokenKind::Namespace,
        TokenKind::Constant,
        TokenKind::Identifier,
        TokenKind::Operator,
        TokenKind::Delimiter,
        TokenKind::Separator,
        TokenKind::Text,
        TokenKind::Error,
    ];

    /// Whitespace or comment.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_error(self) -> bool {
        matches!(self, TokenKind::Error)
    }

    pub fn is_keyword(self) -> bool {
        matches!(self, TokenKind::Keyword | TokenKind::KeywordControl)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Char
                | TokenKind::Number
                | TokenKind::Boolean
                | TokenKind::Null
        )
    }

    /// Stable name used by themes and CSS classes.
    pub fn theme_key(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Preprocessor => "preprocessor",
            TokenKind::String => "string",
            TokenKind::Char => "char",
            TokenKind::Number => "number",
            TokenKind::Boolean => "boolean",
            TokenKind::Null => "null",
            TokenKind::Keyword => "keyword",
            TokenKind::KeywordControl => "keyword_control",
            TokenKind::TypeName => "type_name",
            TokenKind::FunctionName => "function_name",
            TokenKind::Namespace => "namespace",
            TokenKind::Constant => "constant",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Separator => "separator",
            TokenKind::Text => "text",
            TokenKind::Error => "error",
        }
    }
}

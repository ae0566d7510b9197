//! # Tinge Lexer
//!
//! Turns source text into a stream of classified tokens.
//!
//! A lexer walks the text left to right, consults a [`Grammar`] and emits
//! [`Token`]s: a [`TokenKind`] plus a byte span. The stream always tiles the
//! input, so concatenating the token texts reproduces it exactly, and a
//! whitespace token never runs past a newline.
//!
//! ```
//! use tinge_lexer::{Language, LexerRegistry, TokenKind};
//!
//! let lexer = LexerRegistry::get_lexer(Language::C);
//! let tokens = lexer.tokenize(b"return NULL;");
//! assert_eq!(tokens[0].kind, TokenKind::KeywordControl);
//! assert_eq!(tokens[2].kind, TokenKind::Null);
//! ```
//!
//! ## Incremental highlighting
//!
//! Editors re-highlight on every keystroke. [`SyntaxHighlighter`] keeps the
//! token stream of a document and, after an edit, re-lexes from the start of
//! the affected line until the new tokens line up with the old ones again.

mod highlighter;
mod lexer;
mod scanner;
mod token;

pub use highlighter::{SyntaxHighlighter, TextEdit};
pub use lexer::{Lexer, LexerRegistry, PlainTextLexer};
pub use scanner::GrammarLexer;
pub use token::{Token, TokenKind, TokenSpan};

pub use tinge_grammar::{Grammar, Language};

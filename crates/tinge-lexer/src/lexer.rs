//! The lexer trait and the registry that hands lexers out.

use std::sync::Arc;

use tinge_grammar::{Grammar, Language};

use crate::scanner::GrammarLexer;
use crate::{Token, TokenKind};

/// A tokenizer for one language.
pub trait Lexer: Send + Sync {
    /// Name of the grammar driving this lexer.
    fn name(&self) -> &str;

    /// Lexes `text` starting at byte `start`.
    ///
    /// `start` must be a restart point: offset 0, the start of a line, or the
    /// start of a token previously produced for the same text prefix.
    fn tokens_from<'a>(
        &'a self,
        text: &'a [u8],
        start: usize,
    ) -> Box<dyn Iterator<Item = Token> + 'a>;

    /// Tokenizes the whole text.
    fn tokenize(&self, text: &[u8]) -> Vec<Token> {
        self.tokens_from(text, 0).collect()
    }
}

/// Hands out lexers for languages and grammars.
pub struct LexerRegistry;

impl LexerRegistry {
    /// Gets a lexer for a built-in language.
    pub fn get_lexer(language: Language) -> Box<dyn Lexer> {
        match Grammar::builtin(language) {
            Some(grammar) => Box::new(GrammarLexer::new(grammar)),
            None => Box::new(PlainTextLexer),
        }
    }

    /// Gets a lexer driven by an arbitrary grammar.
    pub fn for_grammar(grammar: Arc<Grammar>) -> Box<dyn Lexer> {
        Box::new(GrammarLexer::new(grammar))
    }
}

/// Lexer for text without a grammar: one `Text` token per line.
pub struct PlainTextLexer;

impl Lexer for PlainTextLexer {
    fn name(&self) -> &str {
        Language::PlainText.id()
    }

    fn tokens_from<'a>(
        &'a self,
        text: &'a [u8],
        start: usize,
    ) -> Box<dyn Iterator<Item = Token> + 'a> {
        let mut pos = start;
        Box::new(std::iter::from_fn(move || {
            if pos >= text.len() {
                return None;
            }
            let line_start = pos;
            pos = text[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(text.len(), |i| pos + i + 1);
            Some(Token::new(TokenKind::Text, line_start..pos))
        }))
    }
}

#[inline]
pub(crate) fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t')
}

/// Whitespace other than the newline.
#[inline]
pub(crate) fn is_inline_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | 0x0b | 0x0c)
}

#[inline]
pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

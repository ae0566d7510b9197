//! Incremental syntax highlighting.
//!
//! [`SyntaxHighlighter`] caches the token stream of a document. Edits are
//! recorded as a single dirty region; on the next [`update`] only the lines
//! around that region are re-lexed and the untouched tail of the old stream
//! is spliced back in, shifted by the length change.
//!
//! [`update`]: SyntaxHighlighter::update

use std::ops::Range;

use tinge_grammar::Language;

use crate::{Lexer, LexerRegistry, Token, TokenKind};

/// A change to the document, in byte offsets.
///
/// `start..old_end` is the replaced range in the text before the edit and
/// `start..new_end` the range it occupies afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl TextEdit {
    pub fn insert(at: usize, len: usize) -> Self {
        Self {
            start: at,
            old_end: at,
            new_end: at + len,
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            old_end: range.end,
            new_end: range.start,
        }
    }

    pub fn replace(range: Range<usize>, new_len: usize) -> Self {
        Self {
            start: range.start,
            old_end: range.end,
            new_end: range.start + new_len,
        }
    }

    /// Change in document length.
    pub fn delta(&self) -> isize {
        self.new_end as isize - self.old_end as isize
    }
}

/// Changed region since the last update, in current coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dirty {
    start: usize,
    end: usize,
    /// Accumulated length change
    delta: isize,
}

impl Dirty {
    fn merge(self, edit: &TextEdit) -> Self {
        // Where the old dirty end lands once `edit` is applied
        let end = if self.end < edit.start {
            self.end
        } else if self.end < edit.old_end {
            edit.new_end
        } else {
            self.end.saturating_add_signed(edit.delta())
        };

        Self {
            start: self.start.min(edit.start),
            end: end.max(edit.new_end),
            delta: self.delta + edit.delta(),
        }
    }
}

/// Token cache for one document.
pub struct SyntaxHighlighter {
    lexer: Box<dyn Lexer>,
    tokens: Vec<Token>,
    /// Length of the text `tokens` was produced for
    doc_len: usize,
    tokenized: bool,
    dirty: Option<Dirty>,
}

impl SyntaxHighlighter {
    pub fn new(lexer: Box<dyn Lexer>) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            doc_len: 0,
            tokenized: false,
            dirty: None,
        }
    }

    /// Creates a highlighter using the built-in lexer for `language`.
    pub fn for_language(language: Language) -> Self {
        Self::new(LexerRegistry::get_lexer(language))
    }

    /// Name of the grammar driving the lexer.
    pub fn lexer_name(&self) -> &str {
        self.lexer.name()
    }

    /// Records an edit made to the document.
    pub fn edit(&mut self, edit: TextEdit) {
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.merge(&edit),
            None => Dirty {
                start: edit.start,
                end: edit.new_end,
                delta: edit.delta(),
            },
        });
    }

    /// Marks a range for re-lexing without changing the document length.
    pub fn mark_dirty(&mut self, range: Range<usize>) {
        self.edit(TextEdit {
            start: range.start,
            old_end: range.end,
            new_end: range.end,
        });
    }

    /// True if tokens are stale until the next [`update`](Self::update).
    pub fn is_dirty(&self) -> bool {
        !self.tokenized || self.dirty.is_some()
    }

    /// Brings the tokens in line with `text`.
    ///
    /// Re-lexes only the dirty region when the cache is consistent with the
    /// recorded edits; otherwise, or when `force` is set, re-lexes everything.
    pub fn update(&mut self, text: &[u8], force: bool) {
        match self.dirty.take() {
            None if self.tokenized && !force && self.doc_len == text.len() => return,
            Some(dirty) if self.tokenized && !force && self.is_consistent(text, &dirty) => {
                self.relex_region(text, dirty);
            }
            _ => self.relex_all(text),
        }
        self.doc_len = text.len();
        self.tokenized = true;
    }

    fn is_consistent(&self, text: &[u8], dirty: &Dirty) -> bool {
        self.doc_len as isize + dirty.delta == text.len() as isize && dirty.end <= text.len()
    }

    fn relex_all(&mut self, text: &[u8]) {
        tracing::debug!("Full re-lex of {} bytes with '{}'", text.len(), self.lexer.name());
        self.tokens = self.lexer.tokenize(text);
    }

    fn relex_region(&mut self, text: &[u8], dirty: Dirty) {
        let lo = dirty.start.min(text.len());
        let hi = dirty.end;
        let line_start = text[..lo]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);

        // Tokens ending before the line are untouched. The next one may be a
        // comment or string that started on an earlier line, or one that ran to
        // the old end of input and ends exactly at `line_start`
        let first = self.tokens.partition_point(|t| t.span.end < line_start);
        let restart = self.tokens.get(first).map_or(line_start, |t| t.span.start);

        let mut fresh = Vec::new();
        let mut resume = self.tokens.len();
        for token in self.lexer.tokens_from(text, restart) {
            let end = token.span.end;
            fresh.push(token);
            if end <= hi || text[end - 1] != b'\n' {
                continue;
            }
            let Ok(old_pos) = usize::try_from(end as isize - dirty.delta) else {
                continue;
            };
            if let Ok(i) = self.tokens[first..].binary_search_by_key(&old_pos, |t| t.span.start) {
                resume = first + i;
                break;
            }
        }

        tracing::trace!(
            "Re-lexed {}..{}: {} old token(s) replaced by {}",
            restart,
            fresh.last().map_or(restart, |t| t.span.end),
            resume - first,
            fresh.len()
        );

        let kept_from = first + fresh.len();
        self.tokens.splice(first..resume, fresh);
        if dirty.delta != 0 {
            for token in &mut self.tokens[kept_from..] {
                *token = token.shifted(dirty.delta);
            }
        }
    }

    /// All tokens, as of the last update.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Kind of the token covering byte `offset`.
    pub fn kind_at(&self, offset: usize) -> Option<TokenKind> {
        let i = self.tokens.partition_point(|t| t.span.end <= offset);
        self.tokens
            .get(i)
            .filter(|t| t.span.start <= offset)
            .map(|t| t.kind)
    }

    /// Tokens overlapping `range`.
    pub fn tokens_in_range(&self, range: Range<usize>) -> &[Token] {
        let lo = self.tokens.partition_point(|t| t.span.end <= range.start);
        let hi = self.tokens.partition_point(|t| t.span.start < range.end);
        &self.tokens[lo..hi.max(lo)]
    }
}

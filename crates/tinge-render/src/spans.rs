//! Styled spans: tokens resolved against a theme.

use std::ops::Range;

use tinge_lexer::Token;

use crate::{RenderError, RenderResult, Theme, TokenStyle};

/// A byte range drawn with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub style: TokenStyle,
}

/// Resolves each token's style and merges neighbours that look the same.
///
/// This is the form editors paint from: one run per visual change rather than
/// one per token.
pub fn styled_spans(text: &str, tokens: &[Token], theme: &Theme) -> RenderResult<Vec<StyledSpan>> {
    let mut spans: Vec<StyledSpan> = Vec::with_capacity(tokens.len());
    for token in tokens {
        check_span(text, token)?;
        let style = theme.get_style(token.kind);
        match spans.last_mut() {
            Some(last) if last.style == style && last.range.end == token.span.start => {
                last.range.end = token.span.end;
            }
            _ => spans.push(StyledSpan {
                range: token.span.clone(),
                style,
            }),
        }
    }
    Ok(spans)
}

/// Ensures a token can be sliced out of `text`.
pub(crate) fn check_span(text: &str, token: &Token) -> RenderResult<()> {
    let span = &token.span;
    if span.start > span.end || text.get(span.clone()).is_none() {
        return Err(RenderError::InvalidSpan {
            start: span.start,
            end: span.end,
            len: text.len(),
        });
    }
    Ok(())
}

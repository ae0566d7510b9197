//! # Tinge Render
//!
//! Turns token streams into something a human looks at.
//!
//! A [`Theme`] maps token kinds to [`TokenStyle`]s. A [`Renderer`] walks the
//! tokens and the text they cover and produces annotated output:
//!
//! - [`HtmlRenderer`]: a `<pre>` block with CSS classes or inline styles
//! - [`AnsiRenderer`]: SGR escape sequences for terminals
//!
//! Editors that paint text themselves can use [`styled_spans`] instead, which
//! resolves styles and merges adjacent tokens that look the same.

mod ansi;
mod html;
mod spans;
mod theme;

use serde::{Deserialize, Serialize};
use tinge_lexer::Token;

pub use ansi::AnsiRenderer;
pub use html::HtmlRenderer;
pub use spans::{StyledSpan, styled_spans};
pub use theme::{Color, Theme, ThemeError, ThemeResult, TokenStyle};

/// Produces annotated output from text and its tokens.
pub trait Renderer {
    /// Renders `tokens`, which must tile `text`.
    fn render(&self, text: &str, tokens: &[Token], theme: &Theme) -> RenderResult<String>;
}

/// Output formats with a built-in renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Ansi,
}

/// Errors that can occur while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Token span {start}..{end} is not a valid range of a {len}-byte text")]
    InvalidSpan { start: usize, end: usize, len: usize },

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

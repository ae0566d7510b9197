//! Terminal output with ANSI escape sequences.

use std::fmt::Write as _;

use tinge_lexer::{Token, TokenKind};

use crate::spans::check_span;
use crate::{Color, RenderResult, Renderer, Theme, TokenStyle};

const RESET: &str = "\x1b[0m";

/// Renders tokens with SGR escape sequences.
///
/// Every styled run is closed with a reset before the next newline, so the
/// output can be split into lines or piped through `less -R` safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsiRenderer {
    /// Use 24-bit colors; otherwise approximate with the 256-color palette
    pub true_color: bool,
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self { true_color: true }
    }
}

impl AnsiRenderer {
    /// SGR sequence that switches to `style`.
    pub fn sgr(&self, style: &TokenStyle, page_bg: Option<Color>) -> String {
        let mut codes = Vec::new();
        if style.bold {
            codes.push("1".to_string());
        }
        if style.italic {
            codes.push("3".to_string());
        }
        if style.underline {
            codes.push("4".to_string());
        }
        codes.push(self.color_code(38, style.fg));
        if let Some(bg) = style.bg.filter(|bg| Some(*bg) != page_bg) {
            codes.push(self.color_code(48, bg));
        }
        format!("\x1b[{}m", codes.join(";"))
    }

    fn color_code(&self, base: u8, color: Color) -> String {
        if self.true_color {
            format!("{base};2;{};{};{}", color.r, color.g, color.b)
        } else {
            format!("{base};5;{}", color.to_ansi256())
        }
    }
}

impl Renderer for AnsiRenderer {
    fn render(&self, text: &str, tokens: &[Token], theme: &Theme) -> RenderResult<String> {
        let mut out = String::with_capacity(text.len() * 3);
        for token in tokens {
            check_span(text, token)?;
            let slice = &text[token.span.clone()];
            if token.kind == TokenKind::Whitespace {
                out.push_str(slice);
                continue;
            }

            let sgr = self.sgr(&theme.get_style(token.kind), theme.background());
            for piece in slice.split_inclusive('\n') {
                let (body, newline) = match piece.strip_suffix('\n') {
                    Some(body) => (body, true),
                    None => (piece, false),
                };
                if !body.is_empty() {
                    write!(out, "{sgr}{body}{RESET}")?;
                }
                if newline {
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }
}

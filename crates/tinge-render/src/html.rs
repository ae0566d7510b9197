//! HTML output.

use std::fmt::Write as _;

use tinge_lexer::{Token, TokenKind};

use crate::spans::check_span;
use crate::{RenderResult, Renderer, Theme, TokenStyle};

/// Renders tokens as an HTML `<pre>` block.
///
/// In class mode every token becomes `<span class="{prefix}{kind}">` and
/// colors come from [`HtmlRenderer::stylesheet`]. In inline mode the style is
/// written into each span, which suits e-mail and other places without CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderer {
    /// Prefix for every CSS class
    pub class_prefix: String,
    /// Write `style="..."` attributes instead of classes
    pub inline_styles: bool,
    /// Wrap each line in a numbered span
    pub line_numbers: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            class_prefix: "tg-".to_string(),
            inline_styles: false,
            line_numbers: false,
        }
    }
}

impl HtmlRenderer {
    /// CSS rules for class mode.
    pub fn stylesheet(&self, theme: &Theme) -> String {
        let prefix = &self.class_prefix;
        let mut css = String::new();

        css.push_str(&format!(
            ".{prefix}code {{ {} }}\n",
            declarations(&theme.default_style, None)
        ));
        for kind in TokenKind::ALL {
            if kind == TokenKind::Whitespace {
                continue;
            }
            let style = theme.get_style(kind);
            css.push_str(&format!(
                ".{prefix}{} {{ {} }}\n",
                kind.theme_key(),
                declarations(&style, theme.background())
            ));
        }
        if self.line_numbers {
            css.push_str(&format!(
                ".{prefix}line::before {{ content: attr(data-line); display: inline-block; \
                 width: 4ch; margin-right: 1ch; text-align: right; opacity: 0.5; }}\n"
            ));
        }
        css
    }

    fn push_token(
        &self,
        out: &mut String,
        kind: TokenKind,
        text: &str,
        theme: &Theme,
    ) -> RenderResult<()> {
        if kind == TokenKind::Whitespace {
            escape_into(out, text);
            return Ok(());
        }

        if self.inline_styles {
            let style = theme.get_style(kind);
            if style == theme.default_style {
                escape_into(out, text);
                return Ok(());
            }
            write!(
                out,
                "<span style=\"{}\">",
                declarations(&style, theme.background())
            )?;
        } else {
            write!(out, "<span class=\"{}{}\">", self.class_prefix, kind.theme_key())?;
        }
        escape_into(out, text);
        out.push_str("</span>");
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, text: &str, tokens: &[Token], theme: &Theme) -> RenderResult<String> {
        let mut out = String::with_capacity(text.len() * 2 + 64);

        write!(out, "<pre class=\"{}code\"", self.class_prefix)?;
        if self.inline_styles {
            write!(out, " style=\"{}\"", declarations(&theme.default_style, None))?;
        }
        out.push('>');

        let mut line = 1;
        let mut line_open = false;
        for token in tokens {
            check_span(text, token)?;
            for piece in text[token.span.clone()].split_inclusive('\n') {
                let (body, newline) = match piece.strip_suffix('\n') {
                    Some(body) => (body, true),
                    None => (piece, false),
                };

                if self.line_numbers && !line_open {
                    write!(out, "<span class=\"{}line\" data-line=\"{line}\">", self.class_prefix)?;
                    line_open = true;
                }
                if !body.is_empty() {
                    self.push_token(&mut out, token.kind, body, theme)?;
                }
                if newline {
                    if line_open {
                        out.push_str("</span>");
                        line_open = false;
                    }
                    out.push('\n');
                    line += 1;
                }
            }
        }
        if line_open {
            out.push_str("</span>");
        }

        out.push_str("</pre>");
        Ok(out)
    }
}

/// CSS declarations for a style. `bg` is skipped when it equals `page_bg`.
fn declarations(style: &TokenStyle, page_bg: Option<crate::Color>) -> String {
    let mut css = format!("color: {};", style.fg);
    if let Some(bg) = style.bg.filter(|bg| Some(*bg) != page_bg) {
        css.push_str(&format!(" background-color: {bg};"));
    }
    if style.bold {
        css.push_str(" font-weight: bold;");
    }
    if style.italic {
        css.push_str(" font-style: italic;");
    }
    if style.underline {
        css.push_str(" text-decoration: underline;");
    }
    css
}

/// Appends `text` with HTML special characters escaped.
fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use tinge_lexer::{Language, LexerRegistry};

    fn render(renderer: &HtmlRenderer, language: Language, text: &str) -> String {
        let tokens = LexerRegistry::get_lexer(language).tokenize(text.as_bytes());
        renderer.render(text, &tokens, &Theme::dark()).unwrap()
    }

    #[test]
    fn test_class_mode() {
        let html = render(&HtmlRenderer::default(), Language::C, "return x < 1;");
        assert_eq!(
            html,
            "<pre class=\"tg-code\"><span class=\"tg-keyword_control\">return</span> \
             <span class=\"tg-identifier\">x</span> <span class=\"tg-operator\">&lt;</span> \
             <span class=\"tg-number\">1</span><span class=\"tg-separator\">;</span></pre>"
        );
    }

    #[test]
    fn test_escaping() {
        let html = render(&HtmlRenderer::default(), Language::C, "s = \"<a href='x'>&\";");
        assert!(html.contains("&quot;&lt;a href=&#39;x&#39;&gt;&amp;&quot;"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_inline_styles() {
        let renderer = HtmlRenderer {
            inline_styles: true,
            ..Default::default()
        };
        let html = render(&renderer, Language::C, "/* c */ x;");

        assert!(html.starts_with(
            "<pre class=\"tg-code\" style=\"color: #d4d4d4; background-color: #1e1e1e;\">"
        ));
        assert!(html.contains("<span style=\"color: #6a9955; font-style: italic;\">/* c */</span>"));
        assert!(html.contains("<span style=\"color: #9cdcfe;\">x</span>"));
        // Default-styled punctuation inherits from the <pre>
        assert!(html.ends_with("</span>;</pre>"));
        assert!(!html.contains("<span class="));
    }

    #[test]
    fn test_line_numbers_split_multiline_tokens() {
        let renderer = HtmlRenderer {
            line_numbers: true,
            ..Default::default()
        };
        let html = render(&renderer, Language::C, "/* a\nb */\n\nx");

        assert_eq!(
            html,
            "<pre class=\"tg-code\">\
             <span class=\"tg-line\" data-line=\"1\"><span class=\"tg-comment\">/* a</span></span>\n\
             <span class=\"tg-line\" data-line=\"2\"><span class=\"tg-comment\">b */</span></span>\n\
             <span class=\"tg-line\" data-line=\"3\"></span>\n\
             <span class=\"tg-line\" data-line=\"4\"><span class=\"tg-identifier\">x</span></span>\
             </pre>"
        );
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let renderer = HtmlRenderer {
            line_numbers: true,
            ..Default::default()
        };
        let html = render(&renderer, Language::PlainText, "one\n");
        assert!(!html.contains("data-line=\"2\""));
        assert!(html.contains("<span class=\"tg-text\">one</span>"));
    }

    #[test]
    fn test_stylesheet() {
        let renderer = HtmlRenderer {
            class_prefix: "hl-".to_string(),
            line_numbers: true,
            ..Default::default()
        };
        let mut theme = Theme::dark();
        theme.set_style(
            TokenKind::Error,
            TokenStyle::new(Color::from_u32(0xFF0000)).bg(Color::from_u32(0x330000)),
        );
        let css = renderer.stylesheet(&theme);

        assert!(css.contains(".hl-code { color: #d4d4d4; background-color: #1e1e1e; }"));
        assert!(css.contains(".hl-comment { color: #6a9955; font-style: italic; }"));
        assert!(css.contains(".hl-keyword_control { color: #c586c0; font-weight: bold; }"));
        assert!(css.contains(".hl-error { color: #ff0000; background-color: #330000; }"));
        // Default-styled kinds do not repeat the page background
        assert!(css.contains(".hl-operator { color: #d4d4d4; }"));
        assert!(css.contains(".hl-line::before"));
        assert!(!css.contains(".hl-whitespace"));

        // One rule per line: the page, every non-whitespace kind, line numbers
        assert_eq!(css.lines().count(), 1 + TokenKind::ALL.len() - 1 + 1);
        assert!(css.lines().all(|rule| rule.starts_with(".hl-") && rule.ends_with(" }")));
        assert!(css.ends_with("}\n"));
    }

    #[test]
    fn test_invalid_span() {
        let tokens = [Token::new(TokenKind::Identifier, 2..10)];
        let result = HtmlRenderer::default().render("abc", &tokens, &Theme::dark());
        assert!(matches!(result, Err(crate::RenderError::InvalidSpan { .. })));
    }
}

//! # Tinge
//!
//! Syntax highlighting for C and C++, built from three layers:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Highlighter                      │
//! │        config · language detection · file IO         │
//! └──────────────────────────────────────────────────────┘
//!        │                    │                   │
//! ┌──────┴───────┐   ┌────────┴───────┐   ┌───────┴───────┐
//! │ tinge-grammar│ ← │  tinge-lexer   │ ← │ tinge-render  │
//! │ word lists,  │   │ tokens, incre- │   │ themes, HTML, │
//! │ operators    │   │ mental re-lex  │   │ ANSI          │
//! └──────────────┘   └────────────────┘   └───────────────┘
//! ```
//!
//! ```
//! use tinge::Highlighter;
//!
//! let highlighter = Highlighter::new();
//! let html = highlighter.render("int main(void) { return 0; }", "c").unwrap();
//! assert!(html.contains("<span class=\"tg-keyword_control\">return</span>"));
//! ```

pub mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

pub use config::{Config, ConfigError, RenderConfig, ThemeConfig};
pub use tinge_grammar::{Grammar, GrammarError, GrammarOverride, GrammarRegistry, Language};
pub use tinge_lexer::{
    Lexer, LexerRegistry, PlainTextLexer, SyntaxHighlighter, TextEdit, Token, TokenKind,
};
pub use tinge_render::{
    AnsiRenderer, Color, HtmlRenderer, OutputFormat, RenderError, Renderer, StyledSpan, Theme,
    ThemeError, TokenStyle, styled_spans,
};

/// Result type for highlighter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running the highlighter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Grammars, a theme and output settings bundled together.
#[derive(Debug, Clone)]
pub struct Highlighter {
    grammars: GrammarRegistry,
    theme: Theme,
    render: RenderConfig,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Built-in grammars, the dark theme and HTML output.
    pub fn new() -> Self {
        Self {
            grammars: GrammarRegistry::with_builtins(),
            theme: Theme::default(),
            render: RenderConfig::default(),
        }
    }

    /// Builds a highlighter from configuration.
    ///
    /// Custom grammars are loaded from every configured directory before the
    /// per-language overrides are applied, so overrides may target them too.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut grammars = GrammarRegistry::with_builtins();
        for dir in &config.grammar_dirs {
            grammars.load_dir(dir)?;
        }
        grammars.apply_overrides(&config.languages)?;

        let theme = match &config.theme.path {
            Some(path) => Theme::load(path)?,
            None => Theme::by_name(&config.theme.name)?,
        };

        tracing::info!(
            "Highlighter ready: {} grammar(s), theme '{}', {:?} output",
            grammars.names().len(),
            theme.name,
            config.render.format
        );

        Ok(Self {
            grammars,
            theme,
            render: config.render.clone(),
        })
    }

    /// Loads the config from its default location and builds a highlighter.
    pub fn from_default_config() -> Result<Self> {
        Self::from_config(&Config::load()?)
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn grammars(&self) -> &GrammarRegistry {
        &self.grammars
    }

    /// Mutable access, e.g. to register a grammar at runtime.
    pub fn grammars_mut(&mut self) -> &mut GrammarRegistry {
        &mut self.grammars
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// The grammar for a file, by extension. `None` means plain text.
    pub fn language_for_path(&self, path: impl AsRef<Path>) -> Option<Arc<Grammar>> {
        self.grammars.for_path(path)
    }

    /// A lexer for a grammar name; `text` selects the plain text lexer.
    pub fn lexer(&self, grammar_name: &str) -> Result<Box<dyn Lexer>> {
        if Language::from_name(grammar_name) == Some(Language::PlainText) {
            return Ok(Box::new(PlainTextLexer));
        }
        let grammar = self
            .grammars
            .by_name(grammar_name)
            .ok_or_else(|| GrammarError::UnknownGrammar(grammar_name.to_string()))?;
        Ok(LexerRegistry::for_grammar(grammar))
    }

    /// An incremental highlighter for editing a document in `grammar_name`.
    pub fn syntax_highlighter(&self, grammar_name: &str) -> Result<SyntaxHighlighter> {
        Ok(SyntaxHighlighter::new(self.lexer(grammar_name)?))
    }

    /// Tokenizes `source` with the named grammar.
    pub fn tokenize(&self, source: &str, grammar_name: &str) -> Result<Vec<Token>> {
        Ok(self.lexer(grammar_name)?.tokenize(source.as_bytes()))
    }

    /// Tokenizes and renders `source` in the configured format.
    pub fn render(&self, source: &str, grammar_name: &str) -> Result<String> {
        let tokens = self.tokenize(source, grammar_name)?;
        self.render_tokens(source, &tokens)
    }

    /// Renders tokens already produced for `source`.
    pub fn render_tokens(&self, source: &str, tokens: &[Token]) -> Result<String> {
        let output = match self.render.format {
            OutputFormat::Html => self.render.html_renderer().render(source, tokens, &self.theme)?,
            OutputFormat::Ansi => self.render.ansi_renderer().render(source, tokens, &self.theme)?,
        };
        Ok(output)
    }

    /// CSS to accompany class-mode HTML output.
    pub fn stylesheet(&self) -> String {
        self.render.html_renderer().stylesheet(&self.theme)
    }

    /// Reads, tokenizes and renders a file.
    ///
    /// The grammar comes from the file extension; unknown extensions render
    /// as plain text. Invalid UTF-8 is replaced rather than rejected.
    pub fn render_path(&self, path: impl AsRef<Path>) -> anyhow::Result<String> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(
                    "{} is not valid UTF-8 ({}), decoding lossily",
                    path.display(),
                    e.utf8_error()
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let lexer = match self.language_for_path(path) {
            Some(grammar) => {
                tracing::debug!("Highlighting {} as {}", path.display(), grammar.name);
                LexerRegistry::for_grammar(grammar)
            }
            None => Box::new(PlainTextLexer),
        };
        let tokens = lexer.tokenize(source.as_bytes());

        self.render_tokens(&source, &tokens)
            .with_context(|| format!("Failed to render {}", path.display()))
    }
}

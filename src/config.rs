//! Highlighter configuration.
//!
//! Configuration lives in a TOML file, by default
//! `<config dir>/tinge/config.toml`. Every section is optional; `#[serde(default)]`
//! fills in whatever is missing, so an empty file is a valid config.
//!
//! ```toml
//! grammar_dirs = ["/usr/share/tinge/grammars"]
//!
//! [theme]
//! name = "light"
//!
//! [render]
//! format = "ansi"
//! true_color = false
//!
//! [languages.c]
//! types = ["gboolean", "gchar"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tinge_grammar::GrammarOverride;
use tinge_render::{AnsiRenderer, HtmlRenderer, OutputFormat};

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories scanned for custom `*.toml` grammars
    pub grammar_dirs: Vec<PathBuf>,

    /// Color theme selection
    pub theme: ThemeConfig,

    /// Output settings
    pub render: RenderConfig,

    /// Per-grammar additions, keyed by grammar name
    pub languages: HashMap<String, GrammarOverride>,
}

impl Config {
    /// Loads config from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tinge").join("config.toml"))
    }

    /// Saves the config to a file, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Theme selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Built-in theme name (`dark` or `light`)
    pub name: String,

    /// JSON theme file; takes precedence over `name`
    pub path: Option<PathBuf>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "dark".to_string(),
            path: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output format
    pub format: OutputFormat,

    /// Prefix for HTML class names
    pub class_prefix: String,

    /// Inline CSS instead of classes
    pub inline_styles: bool,

    /// Number lines in HTML output
    pub line_numbers: bool,

    /// 24-bit terminal colors
    pub true_color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            class_prefix: "tg-".to_string(),
            inline_styles: false,
            line_numbers: false,
            true_color: true,
        }
    }
}

impl RenderConfig {
    pub fn html_renderer(&self) -> HtmlRenderer {
        HtmlRenderer {
            class_prefix: self.class_prefix.clone(),
            inline_styles: self.inline_styles,
            line_numbers: self.line_numbers,
        }
    }

    pub fn ansi_renderer(&self) -> AnsiRenderer {
        AnsiRenderer {
            true_color: self.true_color,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

//! Color themes.
//!
//! A theme maps every [`TokenKind`] to a [`TokenStyle`]. Kinds without an
//! entry use the theme's default style, so hand-written theme files only need
//! to list what they change.
//!
//! Themes are stored as JSON:
//!
//! ```json
//! {
//!   "name": "Midnight",
//!   "is_dark": true,
//!   "default_style": { "fg": "#c0c0c0" },
//!   "styles": {
//!     "comment": { "fg": "#5c6370", "italic": true },
//!     "keyword_control": { "fg": "#c678dd", "bold": true }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use tinge_lexer::TokenKind;

/// Errors that can occur while loading themes.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Invalid color '{0}': expected #rrggbb or #rgb")]
    InvalidColor(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Failed to access theme file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Theme parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for theme operations
pub type ThemeResult<T> = Result<T, ThemeError>;

/// An opaque RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0xRRGGBB`.
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }

    /// Parses `#rrggbb` or the short form `#rgb`. The `#` is optional.
    pub fn from_hex(hex: &str) -> ThemeResult<Self> {
        let invalid = || ThemeError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Self::from_u32(value)),
            3 => {
                let expand = |nibble: u32| (nibble as u8 & 0xF) * 0x11;
                Ok(Self::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            _ => Err(invalid()),
        }
    }

    /// Nearest entry in the xterm 256-color palette.
    pub fn to_ansi256(self) -> u8 {
        let Self { r, g, b } = self;
        if r == g && g == b {
            return match r {
                0..=7 => 16,
                249..=255 => 231,
                _ => 232 + ((u16::from(r) - 8) * 24 / 241) as u8,
            };
        }
        let level = |v: u8| match v {
            0..=47 => 0,
            48..=114 => 1,
            _ => (v - 35) / 40,
        };
        16 + 36 * level(r) + 6 * level(g) + level(b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// The visual style of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenStyle {
    /// Foreground color
    pub fg: Color,
    /// Background color; `None` keeps the surrounding background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl TokenStyle {
    pub const fn new(fg: Color) -> Self {
        Self {
            fg,
            bg: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub const fn bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }
}

/// A syntax color theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Theme name
    pub name: String,

    /// Is this a dark theme?
    pub is_dark: bool,

    /// Style for kinds without an entry in `styles`; its background is the
    /// page background
    pub default_style: TokenStyle,

    /// Per-kind styles
    pub styles: BTreeMap<TokenKind, TokenStyle>,
}

impl Theme {
    /// Creates the default dark theme.
    pub fn dark() -> Self {
        let fg = Color::from_u32(0xD4D4D4);
        let keyword = Color::from_u32(0xC586C0);
        let literal = Color::from_u32(0x569CD6);
        let string = Color::from_u32(0xCE9178);
        let type_name = Color::from_u32(0x4EC9B0);

        let styles = BTreeMap::from([
            (TokenKind::Comment, TokenStyle::new(Color::from_u32(0x6A9955)).italic()),
            (TokenKind::Preprocessor, TokenStyle::new(keyword)),
            (TokenKind::String, TokenStyle::new(string)),
            (TokenKind::Char, TokenStyle::new(string)),
            (TokenKind::Number, TokenStyle::new(Color::from_u32(0xB5CEA8))),
            (TokenKind::Boolean, TokenStyle::new(literal).bold()),
            (TokenKind::Null, TokenStyle::new(literal).bold()),
            (TokenKind::Keyword, TokenStyle::new(literal)),
            (TokenKind::KeywordControl, TokenStyle::new(keyword).bold()),
            (TokenKind::TypeName, TokenStyle::new(type_name)),
            (TokenKind::FunctionName, TokenStyle::new(Color::from_u32(0xDCDCAA))),
            (TokenKind::Namespace, TokenStyle::new(type_name)),
            (TokenKind::Constant, TokenStyle::new(Color::from_u32(0x4FC1FF))),
            (TokenKind::Identifier, TokenStyle::new(Color::from_u32(0x9CDCFE))),
            (TokenKind::Error, TokenStyle::new(Color::from_u32(0xF44747)).underline()),
        ]);

        Self {
            name: "Tinge Dark".to_string(),
            is_dark: true,
            default_style: TokenStyle::new(fg).bg(Color::from_u32(0x1E1E1E)),
            styles,
        }
    }

    /// Creates a light theme.
    pub fn light() -> Self {
        let keyword = Color::from_u32(0x0000FF);
        let control = Color::from_u32(0xAF00DB);
        let string = Color::from_u32(0xA31515);
        let type_name = Color::from_u32(0x267F99);

        let styles = BTreeMap::from([
            (TokenKind::Comment, TokenStyle::new(Color::from_u32(0x008000)).italic()),
            (TokenKind::Preprocessor, TokenStyle::new(control)),
            (TokenKind::String, TokenStyle::new(string)),
            (TokenKind::Char, TokenStyle::new(string)),
            (TokenKind::Number, TokenStyle::new(Color::from_u32(0x098658))),
            (TokenKind::Boolean, TokenStyle::new(keyword).bold()),
            (TokenKind::Null, TokenStyle::new(keyword).bold()),
            (TokenKind::Keyword, TokenStyle::new(keyword)),
            (TokenKind::KeywordControl, TokenStyle::new(control).bold()),
            (TokenKind::TypeName, TokenStyle::new(type_name)),
            (TokenKind::FunctionName, TokenStyle::new(Color::from_u32(0x795E26))),
            (TokenKind::Namespace, TokenStyle::new(type_name)),
            (TokenKind::Constant, TokenStyle::new(Color::from_u32(0x0070C1))),
            (TokenKind::Identifier, TokenStyle::new(Color::from_u32(0x001080))),
            (TokenKind::Error, TokenStyle::new(Color::from_u32(0xFF0000)).underline()),
        ]);

        Self {
            name: "Tinge Light".to_string(),
            is_dark: false,
            default_style: TokenStyle::new(Color::from_u32(0x000000)).bg(Color::from_u32(0xFFFFFF)),
            styles,
        }
    }

    /// Looks up a built-in theme: `dark` or `light`.
    pub fn by_name(name: &str) -> ThemeResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "tinge dark" => Ok(Self::dark()),
            "light" | "tinge light" => Ok(Self::light()),
            _ => Err(ThemeError::UnknownTheme(name.to_string())),
        }
    }

    /// Style for a token kind, falling back to the default style.
    pub fn get_style(&self, kind: TokenKind) -> TokenStyle {
        self.styles
            .get(&kind)
            .copied()
            .unwrap_or(self.default_style)
    }

    pub fn set_style(&mut self, kind: TokenKind, style: TokenStyle) {
        self.styles.insert(kind, style);
    }

    /// Page background color.
    pub fn background(&self) -> Option<Color> {
        self.default_style.bg
    }

    /// Loads a theme from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ThemeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let theme: Self = serde_json::from_str(&content)?;
        tracing::debug!("Loaded theme '{}' from {}", theme.name, path.display());
        Ok(theme)
    }

    /// Saves the theme as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ThemeResult<()> {
        let path = path.as_ref();
        let io_err = |source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

//! Grammar-driven scanner for C-like languages.
//!
//! The scanner is a pure function of the text and its start offset. It looks
//! back only within the current line (to recognise `#` directives and
//! `#include <...>` header names) and looks ahead only within the current line
//! (to spot calls and scope qualifiers). Whitespace tokens never run past a
//! newline, so every line start outside a comment or string is a token
//! boundary. The incremental highlighter relies on both properties.

use std::sync::Arc;

use tinge_grammar::{Grammar, WordClass};

use crate::lexer::{is_blank, is_ident_continue, is_ident_start, is_inline_space};
use crate::{Lexer, Token, TokenKind};

/// Longest raw string delimiter the standard allows.
const MAX_RAW_DELIMITER: usize = 16;

const INCLUDE_DIRECTIVES: &[&[u8]] = &[b"include", b"include_next", b"import"];

/// A lexer driven by a [`Grammar`] table.
#[derive(Debug, Clone)]
pub struct GrammarLexer {
    grammar: Arc<Grammar>,
}

impl GrammarLexer {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

impl Lexer for GrammarLexer {
    fn name(&self) -> &str {
        &self.grammar.name
    }

    fn tokens_from<'a>(
        &'a self,
        text: &'a [u8],
        start: usize,
    ) -> Box<dyn Iterator<Item = Token> + 'a> {
        Box::new(Scanner {
            grammar: &self.grammar,
            text,
            pos: start,
        })
    }
}

struct Scanner<'a> {
    grammar: &'a Grammar,
    text: &'a [u8],
    pos: usize,
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let mut kind = self.scan_token();
        if self.pos <= start {
            self.pos = start + 1;
            kind = TokenKind::Error;
        }
        Some(Token::new(kind, start..self.pos))
    }
}

impl Scanner<'_> {
    fn peek(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    fn rest(&self) -> &[u8] {
        &self.text[self.pos..]
    }

    fn scan_token(&mut self) -> TokenKind {
        let grammar = self.grammar;
        let b = self.text[self.pos];

        if b == b'\n' || is_inline_space(b) {
            self.scan_whitespace();
            return TokenKind::Whitespace;
        }
        if b == b'\\' {
            if let Some(len) = line_break_len(&self.text[self.pos + 1..]) {
                self.pos += 1 + len;
                return TokenKind::Whitespace;
            }
        }
        if let Some(marker) = grammar.line_comment.as_deref() {
            if !marker.is_empty() && self.rest().starts_with(marker.as_bytes()) {
                self.scan_line_comment(marker.len());
                return TokenKind::Comment;
            }
        }
        if let Some(block) = &grammar.block_comment {
            if !block.start.is_empty() && self.rest().starts_with(block.start.as_bytes()) {
                self.scan_block_comment(block.start.len(), block.end.as_bytes());
                return TokenKind::Comment;
            }
        }
        if grammar.preprocessor {
            if b == b'#' && self.at_line_start() {
                self.scan_directive();
                return TokenKind::Preprocessor;
            }
            if b == b'<' && self.after_include_directive() {
                self.scan_header_name();
                return TokenKind::String;
            }
        }

        match b {
            b'"' => {
                self.scan_quoted(b'"');
                TokenKind::String
            }
            b'\'' => {
                self.scan_quoted(b'\'');
                TokenKind::Char
            }
            b'0'..=b'9' => {
                self.scan_number();
                TokenKind::Number
            }
            b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number();
                TokenKind::Number
            }
            _ if is_ident_start(b) => self.scan_word(),
            b'(' | b')' | b'{' | b'}' | b'[' | b']' => {
                self.pos += 1;
                TokenKind::Delimiter
            }
            b',' | b';' => {
                self.pos += 1;
                TokenKind::Separator
            }
            _ => match self.grammar.match_operator(self.rest()) {
                Some(len) => {
                    self.pos += len;
                    TokenKind::Operator
                }
                None => {
                    self.pos += utf8_char_len(self.rest());
                    TokenKind::Error
                }
            },
        }
    }

    /// Consumes inline spaces and at most one trailing newline.
    fn scan_whitespace(&mut self) {
        while let Some(b) = self.peek(0) {
            self.pos += 1;
            if b == b'\n' {
                break;
            }
            if !self.peek(0).is_some_and(|c| c == b'\n' || is_inline_space(c)) {
                break;
            }
        }
    }

    /// Consumes a line comment, following backslash continuations.
    fn scan_line_comment(&mut self, marker_len: usize) {
        self.pos += marker_len;
        while let Some(b) = self.peek(0) {
            if b == b'\n' && !self.continued_line() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consumes a block comment; an unterminated one runs to the end of input.
    fn scan_block_comment(&mut self, start_len: usize, end: &[u8]) {
        self.pos += start_len;
        self.pos = match find(self.rest(), end) {
            Some(offset) => self.pos + offset + end.len(),
            None => self.text.len(),
        };
    }

    /// Consumes `#`, optional blanks and the directive name.
    fn scan_directive(&mut self) {
        self.pos += 1;
        let mut name = self.pos;
        while self.text.get(name).copied().is_some_and(is_blank) {
            name += 1;
        }
        if self.text.get(name).copied().is_some_and(is_ident_start) {
            self.pos = name;
            while self.peek(0).is_some_and(is_ident_continue) {
                self.pos += 1;
            }
        }
    }

    /// Consumes `<header>` up to the closing `>` or the end of the line.
    fn scan_header_name(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
            if b == b'>' {
                break;
            }
        }
    }

    /// Consumes a quoted literal. Unterminated literals stop before the
    /// newline; an escaped newline continues the literal.
    fn scan_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => {
                    self.pos += 1 + line_break_len(&self.text[self.pos + 1..]).unwrap_or(1);
                    self.pos = self.pos.min(self.text.len());
                }
                b'\n' => break,
                _ if b == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn scan_number(&mut self) {
        let hex = self.text[self.pos] == b'0' && matches!(self.peek(1), Some(b'x' | b'X'));
        let binary = self.text[self.pos] == b'0' && matches!(self.peek(1), Some(b'b' | b'B'));

        if hex {
            self.pos += 2;
            self.eat_digits(|c| c.is_ascii_hexdigit());
            if self.peek(0) == Some(b'.') {
                self.pos += 1;
                self.eat_digits(|c| c.is_ascii_hexdigit());
            }
            self.eat_exponent(b'p');
        } else if binary {
            self.pos += 2;
            self.eat_digits(|c| c == b'0' || c == b'1');
        } else {
            self.eat_digits(|c| c.is_ascii_digit());
            if self.peek(0) == Some(b'.') {
                self.pos += 1;
                self.eat_digits(|c| c.is_ascii_digit());
            }
            self.eat_exponent(b'e');
        }

        // Suffixes: u, l, ll, f, z, wb, and C++ user-defined `_suffix`
        while self.peek(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
    }

    fn eat_digits(&mut self, is_digit: impl Fn(u8) -> bool) {
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            if is_digit(c) {
                self.pos += 1;
            } else if c == b'\''
                && self.grammar.digit_separators
                && self.pos > start
                && self.peek(1).is_some_and(&is_digit)
            {
                self.pos += 2;
            } else {
                break;
            }
        }
    }

    /// Consumes an exponent introduced by `marker` (either case) when digits follow.
    fn eat_exponent(&mut self, marker: u8) {
        if !self.peek(0).is_some_and(|c| c.eq_ignore_ascii_case(&marker)) {
            return;
        }
        let sign = usize::from(matches!(self.peek(1), Some(b'+' | b'-')));
        if self.peek(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1 + sign;
            self.eat_digits(|c| c.is_ascii_digit());
        }
    }

    /// Scans an identifier, keyword, or a prefixed string/char literal.
    fn scan_word(&mut self) -> TokenKind {
        let prefix = self.grammar.match_string_prefix(self.rest()).unwrap_or(0);

        if self.grammar.raw_strings && self.rest()[prefix..].starts_with(b"R\"") {
            if let Some(end) = raw_string_end(self.text, self.pos + prefix + 2) {
                self.pos = end;
                return TokenKind::String;
            }
        }
        if prefix > 0 {
            match self.peek(prefix) {
                Some(b'"') => {
                    self.pos += prefix;
                    self.scan_quoted(b'"');
                    return TokenKind::String;
                }
                Some(b'\'') => {
                    self.pos += prefix;
                    self.scan_quoted(b'\'');
                    return TokenKind::Char;
                }
                _ => {}
            }
        }

        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.text[start..self.pos]).unwrap_or_default();

        match self.grammar.classify_word(word) {
            Some(WordClass::Boolean) => TokenKind::Boolean,
            Some(WordClass::Null) => TokenKind::Null,
            Some(WordClass::Control) => TokenKind::KeywordControl,
            Some(WordClass::Keyword) => TokenKind::Keyword,
            Some(WordClass::Type) => TokenKind::TypeName,
            None => self.classify_identifier(word),
        }
    }

    /// Heuristics for words the grammar does not list.
    fn classify_identifier(&self, word: &str) -> TokenKind {
        let mut next = self.pos;
        while self.text.get(next).copied().is_some_and(is_blank) {
            next += 1;
        }
        let after = &self.text[next..];

        if after.starts_with(b"(") {
            TokenKind::FunctionName
        } else if after.starts_with(b"::") && self.grammar.match_operator(b"::") == Some(2) {
            TokenKind::Namespace
        } else if is_constant_name(word) {
            TokenKind::Constant
        } else {
            TokenKind::Identifier
        }
    }

    /// True if only blanks separate the cursor from the start of its line.
    fn at_line_start(&self) -> bool {
        self.text[..self.pos]
            .iter()
            .rev()
            .find(|&&b| !is_blank(b))
            .is_none_or(|&b| b == b'\n')
    }

    /// True if the line so far reads `#include` (or a sibling directive).
    fn after_include_directive(&self) -> bool {
        let line_start = self.text[..self.pos]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let line = trim_blanks(&self.text[line_start..self.pos]);
        let Some(directive) = line.strip_prefix(b"#") else {
            return false;
        };
        INCLUDE_DIRECTIVES.contains(&trim_blanks(directive))
    }

    /// True if the newline at the cursor is escaped by a backslash.
    fn continued_line(&self) -> bool {
        let before = &self.text[..self.pos];
        let before = before.strip_suffix(b"\r").unwrap_or(before);
        before.ends_with(b"\\")
    }
}

/// Length of a line break (`\n` or `\r\n`) at the start of `rest`.
fn line_break_len(rest: &[u8]) -> Option<usize> {
    if rest.starts_with(b"\n") {
        Some(1)
    } else if rest.starts_with(b"\r\n") {
        Some(2)
    } else {
        None
    }
}

/// Finds the end of a raw string whose delimiter starts at `delim_start`.
///
/// Returns `None` if the delimiter is malformed; an unterminated raw string
/// runs to the end of input.
fn raw_string_end(text: &[u8], delim_start: usize) -> Option<usize> {
    let rest = &text[delim_start..];
    let open = rest
        .iter()
        .take(MAX_RAW_DELIMITER + 1)
        .position(|&b| !is_raw_delimiter_char(b))?;
    if rest[open] != b'(' {
        return None;
    }
    let delimiter = &rest[..open];
    let body_start = delim_start + open + 1;

    let mut closing = Vec::with_capacity(delimiter.len() + 2);
    closing.push(b')');
    closing.extend_from_slice(delimiter);
    closing.push(b'"');

    Some(match find(&text[body_start..], &closing) {
        Some(offset) => body_start + offset + closing.len(),
        None => text.len(),
    })
}

fn is_raw_delimiter_char(b: u8) -> bool {
    b.is_ascii_graphic() && !matches!(b, b'(' | b')' | b'\\' | b'"')
}

/// All-caps words of two or more characters, e.g. `MAX_SIZE` or `EOF`.
fn is_constant_name(word: &str) -> bool {
    word.len() > 1
        && word.bytes().any(|b| b.is_ascii_uppercase())
        && word
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Byte length of the UTF-8 sequence at the start of `rest` (at least 1).
fn utf8_char_len(rest: &[u8]) -> usize {
    let expected = match rest.first() {
        Some(0xC0..=0xDF) => 2,
        Some(0xE0..=0xEF) => 3,
        Some(0xF0..=0xF7) => 4,
        _ => 1,
    };
    1 + rest
        .iter()
        .skip(1)
        .take(expected - 1)
        .take_while(|&&b| (0x80..=0xBF).contains(&b))
        .count()
}

fn trim_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_blank(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_blank(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinge_grammar::Language;

    fn lex(language: Language, source: &str) -> Vec<(TokenKind, &str)> {
        let lexer = GrammarLexer::new(Grammar::builtin(language).unwrap());
        lexer
            .tokenize(source.as_bytes())
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, &source[t.span]))
            .collect()
    }

    fn kinds_of<'a>(tokens: &[(TokenKind, &'a str)], kind: TokenKind) -> Vec<&'a str> {
        tokens
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| *text)
            .collect()
    }

    #[test]
    fn test_c_function() {
        let tokens = lex(Language::C, "int main(void) { return 0; }");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::TypeName, "int"),
                (TokenKind::FunctionName, "main"),
                (TokenKind::Delimiter, "("),
                (TokenKind::TypeName, "void"),
                (TokenKind::Delimiter, ")"),
                (TokenKind::Delimiter, "{"),
                (TokenKind::KeywordControl, "return"),
                (TokenKind::Number, "0"),
                (TokenKind::Separator, ";"),
                (TokenKind::Delimiter, "}"),
            ]
        );
    }

    #[test]
    fn test_whitespace_stops_after_newline() {
        let lexer = GrammarLexer::new(Grammar::builtin(Language::C).unwrap());
        let tokens = lexer.tokenize(b"a  \n\n  b");
        let spans: Vec<_> = tokens.iter().map(|t| t.span.clone()).collect();
        assert_eq!(spans, vec![0..1, 1..4, 4..5, 5..7, 7..8]);
    }

    #[test]
    fn test_comments() {
        let tokens = lex(
            Language::C,
            "x; // trailing\n/* block\n spans */ y; // continued \\\n still comment\nz",
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::Comment),
            vec![
                "// trailing",
                "/* block\n spans */",
                "// continued \\\n still comment"
            ]
        );
        assert_eq!(kinds_of(&tokens, TokenKind::Identifier), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let tokens = lex(Language::C, "a /* never closed\nint b;");
        assert_eq!(tokens.last(), Some(&(TokenKind::Comment, "/* never closed\nint b;")));
    }

    #[test]
    fn test_preprocessor() {
        let source = "#include <stdio.h>\n  #  define MAX 10\n#include \"local.h\"\n#define STR(x) #x\n\
                      #import <legacy.h>\n#include_next <limits.h>\n";
        let tokens = lex(Language::C, source);

        assert_eq!(
            kinds_of(&tokens, TokenKind::Preprocessor),
            vec!["#include", "#  define", "#include", "#define", "#import", "#include_next"]
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::String),
            vec!["<stdio.h>", "\"local.h\"", "<legacy.h>", "<limits.h>"]
        );
        assert_eq!(kinds_of(&tokens, TokenKind::Constant), vec!["MAX"]);
        assert_eq!(kinds_of(&tokens, TokenKind::FunctionName), vec!["STR"]);
        // Stringizing `#` mid-line is an operator
        assert_eq!(kinds_of(&tokens, TokenKind::Operator), vec!["#"]);
    }

    #[test]
    fn test_less_than_is_not_a_header_outside_include() {
        let tokens = lex(Language::C, "if (a <b) {}\n#if A < B\n#endif");
        assert_eq!(kinds_of(&tokens, TokenKind::Operator), vec!["<", "<"]);
        assert!(kinds_of(&tokens, TokenKind::String).is_empty());
    }

    #[test]
    fn test_strings_and_chars() {
        let tokens = lex(
            Language::C,
            r#"s = "esc \"q\" \\"; c = '\''; w = L"wide"; u = u8"utf"; k = U'x';"#,
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::String),
            vec![r#""esc \"q\" \\""#, r#"L"wide""#, r#"u8"utf""#]
        );
        assert_eq!(kinds_of(&tokens, TokenKind::Char), vec![r"'\''", "U'x'"]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let tokens = lex(Language::C, "\"open\nnext");
        assert_eq!(
            tokens,
            vec![(TokenKind::String, "\"open"), (TokenKind::Identifier, "next")]
        );

        let tokens = lex(Language::C, "\"line \\\ncontinued\" x");
        assert_eq!(tokens[0], (TokenKind::String, "\"line \\\ncontinued\""));
    }

    #[test]
    fn test_numbers() {
        let tokens = lex(
            Language::Cpp,
            "0x1F 0b1010 0755 3.14f .5 1e-9 6.02E+23L 1'000'000ull 0x1.8p3 42_km 10uz",
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::Number),
            vec![
                "0x1F", "0b1010", "0755", "3.14f", ".5", "1e-9", "6.02E+23L", "1'000'000ull",
                "0x1.8p3", "42_km", "10uz"
            ]
        );
        assert_eq!(tokens.len(), 11);
    }

    #[test]
    fn test_digit_separator_needs_digits_on_both_sides() {
        let tokens = lex(Language::Cpp, "f(1,'a')");
        assert_eq!(kinds_of(&tokens, TokenKind::Number), vec!["1"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Char), vec!["'a'"]);
    }

    #[test]
    fn test_raw_strings() {
        let source = "auto a = R\"(plain)\"; auto b = u8R\"sql(SELECT \")\" ;)sql\"; auto R = 1;";
        let tokens = lex(Language::Cpp, source);
        assert_eq!(
            kinds_of(&tokens, TokenKind::String),
            vec!["R\"(plain)\"", "u8R\"sql(SELECT \")\" ;)sql\""]
        );
        assert_eq!(kinds_of(&tokens, TokenKind::Constant), Vec::<&str>::new());
        assert!(tokens.contains(&(TokenKind::Identifier, "R")));
    }

    #[test]
    fn test_raw_strings_are_cpp_only() {
        let tokens = lex(Language::C, "R\"(x)\"");
        assert_eq!(tokens[0], (TokenKind::Identifier, "R"));
    }

    #[test]
    fn test_unterminated_raw_string_runs_to_end() {
        let tokens = lex(Language::Cpp, "R\"x(never\nclosed)\" done");
        assert_eq!(tokens, vec![(TokenKind::String, "R\"x(never\nclosed)\" done")]);
    }

    #[test]
    fn test_cpp_words() {
        let tokens = lex(
            Language::Cpp,
            "template <typename T> std::unique_ptr<T> make() { co_return nullptr; }",
        );
        assert_eq!(kinds_of(&tokens, TokenKind::Keyword), vec!["template", "typename"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Namespace), vec!["std"]);
        assert_eq!(kinds_of(&tokens, TokenKind::TypeName), vec!["unique_ptr"]);
        assert_eq!(kinds_of(&tokens, TokenKind::FunctionName), vec!["make"]);
        assert_eq!(kinds_of(&tokens, TokenKind::KeywordControl), vec!["co_return"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Null), vec!["nullptr"]);
        assert_eq!(kinds_of(&tokens, TokenKind::Operator), vec!["<", ">", "::", "<", ">"]);
    }

    #[test]
    fn test_operators_longest_match() {
        let tokens = lex(Language::Cpp, "a <=> b; p->*m; x <<= 2; args...");
        assert_eq!(
            kinds_of(&tokens, TokenKind::Operator),
            vec!["<=>", "->*", "<<=", "..."]
        );

        // C has no spaceship operator
        let tokens = lex(Language::C, "a <=> b");
        assert_eq!(kinds_of(&tokens, TokenKind::Operator), vec!["<=", ">"]);
    }

    #[test]
    fn test_errors_span_whole_chars() {
        let source = "a @ é $";
        let tokens = lex(Language::C, source);
        assert_eq!(kinds_of(&tokens, TokenKind::Error), vec!["@", "é", "$"]);
    }

    #[test]
    fn test_line_continuation_is_whitespace() {
        let lexer = GrammarLexer::new(Grammar::builtin(Language::C).unwrap());
        let source = b"#define X \\\n  1\n";
        let tokens = lexer.tokenize(source);
        assert!(tokens.contains(&Token::new(TokenKind::Whitespace, 10..12)));
        assert!(tokens.contains(&Token::new(TokenKind::Number, 14..15)));
    }

    #[test]
    fn test_resume_from_line_start() {
        let lexer = GrammarLexer::new(Grammar::builtin(Language::C).unwrap());
        let source = b"int a;\nfloat b;\n";
        let full = lexer.tokenize(source);
        let resumed: Vec<_> = lexer.tokens_from(source, 7).collect();
        let tail: Vec<_> = full.into_iter().filter(|t| t.span.start >= 7).collect();
        assert_eq!(resumed, tail);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(utf8_char_len("é".as_bytes()), 2);
        assert_eq!(utf8_char_len(&[0xE2, b'x']), 1);
        assert_eq!(trim_blanks(b"  # include \t"), b"# include");
        assert_eq!(raw_string_end(b"R\"(x)\"", 2), Some(6));
        assert_eq!(raw_string_end(b"R\"a b(x)a b\"", 2), None);
        assert!(is_constant_name("EOF"));
        assert!(is_constant_name("MAX_2"));
        assert!(!is_constant_name("X"));
        assert!(!is_constant_name("Max"));
        assert!(!is_constant_name("__"));
    }
}

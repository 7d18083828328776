//! Jack Tokenizer for the `Nand2Tetris` course
//!
//! Lazily produces a stream of tokens from a Jack source buffer. Skips
//! whitespace, `//` line comments and `/* */` block comments (block comments
//! do not nest). Tracks `(line, column)` on every token for diagnostics.
//!
//! # Architecture
//! - [`Token`]/[`TokenKind`]/[`TokenValue`]: the token data model
//! - [`Tokenizer`]: the zero-copy scanner over the source buffer
//! - [`errors`]: the crate's typed error taxonomy

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod errors;

pub use errors::LexError;

/// The fixed 19-symbol punctuation set of the Jack grammar.
const SYMBOLS: &[u8] = b"{}()[].,;+-*/&|<>=~";

static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "class", "constructor", "function", "method",
    "field", "static", "var",
    "int", "char", "boolean", "void",
    "true", "false", "null", "this",
    "let", "do", "if", "else", "while", "return",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Ident,
    IntConst,
    StringConst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    Keyword(String),
    Symbol(char),
    Ident(String),
    IntConst(u16),
    StringConst(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Returns the token's identifier/keyword text, if it has one.
    #[must_use]
    pub fn as_word(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Keyword(s) | TokenValue::Ident(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<char> {
        match self.value {
            TokenValue::Symbol(c) => Some(c),
            _ => None,
        }
    }
}

/// Scans a Jack source buffer into [`Token`]s on demand. Operates on byte
/// offsets into the original `&str` (Jack source is ASCII-only outside
/// string constants), matching the teacher's zero-copy parsing style.
pub struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    index: usize,
    line: u32,
    column: u32,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            source,
            bytes: source.as_bytes(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.index + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.index += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                (Some(b'/'), Some(b'/')) => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some(b'*'), Some(b'/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                return Err(LexError::UnterminatedComment { line, column })
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Advances past any whitespace/comments and reports whether a token
    /// remains in the buffer.
    ///
    /// # Errors
    /// Propagates an unterminated block comment encountered while skipping.
    pub fn has_next(&mut self) -> Result<bool, LexError> {
        self.skip_trivia()?;
        Ok(self.index < self.bytes.len())
    }

    /// Consumes and returns the next token. Callers must check
    /// [`Tokenizer::has_next`] first.
    ///
    /// # Errors
    /// Returns [`LexError`] on an unrecognised character, an unterminated
    /// string constant, or an integer literal that overflows `u16`.
    pub fn advance(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let line = self.line;
        let column = self.column;
        let start = self.index;

        let b = self
            .peek()
            .expect("advance() called with no tokens remaining");

        if SYMBOLS.contains(&b) {
            self.bump();
            return Ok(Token {
                kind: TokenKind::Symbol,
                value: TokenValue::Symbol(b as char),
                line,
                column,
            });
        }

        if b.is_ascii_digit() {
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.bump();
            }
            let text = &self.source[start..self.index];
            let value = text
                .parse::<u16>()
                .map_err(|_| LexError::IntegerOverflow {
                    value: text.to_string(),
                    line,
                    column,
                })?;
            return Ok(Token {
                kind: TokenKind::IntConst,
                value: TokenValue::IntConst(value),
                line,
                column,
            });
        }

        if b == b'"' {
            self.bump();
            let text_start = self.index;
            loop {
                match self.peek() {
                    Some(b'"') => break,
                    Some(_) => {
                        self.bump();
                    }
                    None => return Err(LexError::UnterminatedString { line, column }),
                }
            }
            let text = self.source[text_start..self.index].to_string();
            self.bump(); // closing quote
            return Ok(Token {
                kind: TokenKind::StringConst,
                value: TokenValue::StringConst(text),
                line,
                column,
            });
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            while self.peek().is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_') {
                self.bump();
            }
            let text = &self.source[start..self.index];
            return if KEYWORDS.contains(text) {
                Ok(Token {
                    kind: TokenKind::Keyword,
                    value: TokenValue::Keyword(text.to_string()),
                    line,
                    column,
                })
            } else {
                Ok(Token {
                    kind: TokenKind::Ident,
                    value: TokenValue::Ident(text.to_string()),
                    line,
                    column,
                })
            };
        }

        Err(LexError::InvalidCharacter {
            ch: b as char,
            line,
            column,
        })
    }

    /// Tokenizes the full remaining buffer eagerly, for callers that don't
    /// need the lazy interface.
    ///
    /// # Errors
    /// Returns the first [`LexError`] encountered.
    pub fn tokenize_all(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while self.has_next()? {
            tokens.push(self.advance()?);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(src: &str) -> Vec<Token> {
        Tokenizer::new(src).tokenize_all().unwrap()
    }

    #[test]
    fn classifies_keyword_identifier_symbol_and_constants() {
        let tokens = tokenize(r#"class Foo { field int x; }"#);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Symbol);
    }

    #[test]
    fn integer_constants_parse_as_u16() {
        let tokens = tokenize("push constant 32767");
        let int_tok = tokens.last().unwrap();
        assert_eq!(int_tok.value, TokenValue::IntConst(32767));
    }

    #[test]
    fn oversized_integer_literal_is_an_error() {
        let err = Tokenizer::new("99999").tokenize_all().unwrap_err();
        assert!(matches!(err, LexError::IntegerOverflow { .. }));
    }

    #[test]
    fn string_constants_keep_unescaped_inner_text() {
        let tokens = tokenize(r#""hello world""#);
        assert_eq!(
            tokens[0].value,
            TokenValue::StringConst("hello world".to_string())
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Tokenizer::new("\"oops").tokenize_all().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn line_comments_are_skipped() {
        let tokens = tokenize("// a comment\nlet x = 1;");
        assert_eq!(tokens[0].as_word(), Some("let"));
    }

    #[test]
    fn block_comments_are_skipped_without_nesting() {
        let tokens = tokenize("/* a /* nested */ x */ let");
        // The first `*/` ends the comment; `x */ let` is then tokenized.
        assert_eq!(tokens[0].as_word(), Some("x"));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let err = Tokenizer::new("/* never closes").tokenize_all().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn line_and_column_are_tracked_across_newlines() {
        let tokens = tokenize("let x\n= 1;");
        let eq_token = tokens.iter().find(|t| t.as_symbol() == Some('=')).unwrap();
        assert_eq!(eq_token.line, 2);
    }

    #[test]
    fn invalid_character_is_rejected() {
        let err = Tokenizer::new("let x = @;").tokenize_all().unwrap_err();
        assert!(matches!(err, LexError::InvalidCharacter { ch: '@', .. }));
    }
}

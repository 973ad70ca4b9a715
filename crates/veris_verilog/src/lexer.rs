//! Lexical analyzer for Verilog-2005-subset source text.
//!
//! Converts source text into a sequence of [`Token`]s plus a separate
//! comment stream, handling case-sensitive keywords, sized/based literals
//! (`4'b1010`), string literals with C-style escapes, and line and block
//! comments. Lexing is total: an unrecognized character produces a
//! diagnostic and a [`VerilogToken::Error`] token, and lexing continues.

use crate::token::{lookup_keyword, Token, VerilogToken};
use serde::{Deserialize, Serialize};
use veris_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use veris_source::{FileId, Span};

/// The kind of a source comment.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CommentKind {
    /// A `// ...` comment extending to end of line.
    Line,
    /// A `/* ... */` comment.
    Block,
}

/// A source comment, preserved out-of-band so the generator can re-emit it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    /// Whether this is a line or block comment.
    pub kind: CommentKind,
    /// The raw comment text, including its delimiters.
    pub text: String,
    /// The source span covering the comment.
    pub span: Span,
}

/// The lexer's output: tokens and comments, each in source order.
pub struct LexOutput {
    /// The token stream. Always ends with [`VerilogToken::Eof`].
    pub tokens: Vec<Token>,
    /// The comment stream, in source order.
    pub comments: Vec<Comment>,
}

/// Lexes the given Verilog source text.
///
/// Whitespace is skipped; comments are collected into the separate comment
/// stream. The returned token vector always ends with an `Eof` token. Lexer
/// errors are reported via the diagnostic sink and produce `Error` tokens.
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> LexOutput {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        text: source,
        pos: 0,
        file,
        sink,
        comments: Vec::new(),
    };
    let tokens = lexer.lex_all();
    LexOutput {
        tokens,
        comments: lexer.comments,
    }
}

struct Lexer<'a> {
    source: &'a [u8],
    text: &'a str,
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
    comments: Vec<Comment>,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: VerilogToken::Eof,
                    span: Span::point(self.file, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn advance(&mut self) -> u8 {
        let b = self.source[self.pos];
        self.pos += 1;
        b
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink
            .emit(Diagnostic::error(DiagnosticCode::SYNTAX_ERROR, msg, span));
    }

    fn push_comment(&mut self, kind: CommentKind, start: usize) {
        let span = self.span_from(start);
        self.comments.push(Comment {
            kind,
            text: self.text[start..self.pos].to_string(),
            span,
        });
    }

    /// Skips whitespace; collects comments into the comment stream.
    fn skip_trivia(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return;
            }
            // Line comment: //
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                let start = self.pos;
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                self.push_comment(CommentKind::Line, start);
                continue;
            }
            // Block comment: /* ... */ (non-nesting in Verilog)
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        self.error("unterminated block comment", self.span_from(start));
                        break;
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                self.push_comment(CommentKind::Block, start);
                continue;
            }
            // Compiler directive (`define, `timescale, ...): diagnostic, skip line
            if self.peek() == b'`' {
                let start = self.pos;
                self.pos += 1;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                self.error(
                    "compiler directives are not supported",
                    self.span_from(start),
                );
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return self.lex_identifier_or_keyword(start);
        }
        if b.is_ascii_digit() {
            return self.lex_number(start);
        }
        if b == b'"' {
            return self.lex_string(start);
        }
        self.lex_operator(start)
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }

        let text = &self.text[start..self.pos];
        let kind = lookup_keyword(text).unwrap_or(VerilogToken::Identifier);

        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.eat_decimal_digits();

        // Sized literal: digits ' base digits
        if self.pos < self.source.len() && self.source[self.pos] == b'\'' {
            let base = self.peek_at(1).to_ascii_lowercase();
            if matches!(base, b'b' | b'o' | b'd' | b'h') {
                self.pos += 2; // skip ' and base letter
                let digits_start = self.pos;
                self.eat_based_digits(base);
                if self.pos == digits_start {
                    self.error("expected digits after base specifier", self.span_from(start));
                    return Token {
                        kind: VerilogToken::Error,
                        span: self.span_from(start),
                    };
                }
                return Token {
                    kind: VerilogToken::SizedLiteral,
                    span: self.span_from(start),
                };
            }
        }

        Token {
            kind: VerilogToken::IntLiteral,
            span: self.span_from(start),
        }
    }

    fn eat_decimal_digits(&mut self) {
        while self.pos < self.source.len() {
            let ch = self.source[self.pos];
            if ch.is_ascii_digit() || ch == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn eat_based_digits(&mut self, base: u8) {
        while self.pos < self.source.len() {
            let ch = self.source[self.pos].to_ascii_lowercase();
            let valid = match base {
                b'b' => matches!(ch, b'0' | b'1' | b'x' | b'z' | b'?' | b'_'),
                b'o' => matches!(ch, b'0'..=b'7' | b'x' | b'z' | b'?' | b'_'),
                b'd' => ch.is_ascii_digit() || ch == b'_',
                b'h' => ch.is_ascii_hexdigit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
                _ => false,
            };
            if valid {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1; // skip opening "
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error("unterminated string literal", self.span_from(start));
                return Token {
                    kind: VerilogToken::Error,
                    span: self.span_from(start),
                };
            }
            if self.source[self.pos] == b'\\' {
                // C-style escape: skip the next character
                self.pos += 2;
                continue;
            }
            if self.source[self.pos] == b'"' {
                self.pos += 1; // skip closing "
                return Token {
                    kind: VerilogToken::StringLiteral,
                    span: self.span_from(start),
                };
            }
            self.pos += 1;
        }
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let b = self.advance();
        let kind = match b {
            b'(' => VerilogToken::LeftParen,
            b')' => VerilogToken::RightParen,
            b'[' => VerilogToken::LeftBracket,
            b']' => VerilogToken::RightBracket,
            b'{' => VerilogToken::LeftBrace,
            b'}' => VerilogToken::RightBrace,
            b',' => VerilogToken::Comma,
            b';' => VerilogToken::Semicolon,
            b':' => VerilogToken::Colon,
            b'.' => VerilogToken::Dot,
            b'#' => VerilogToken::Hash,
            b'@' => VerilogToken::At,
            b'?' => VerilogToken::Question,
            b'~' => VerilogToken::Tilde,
            b'+' => VerilogToken::Plus,
            b'-' => VerilogToken::Minus,
            b'/' => VerilogToken::Slash,
            b'%' => VerilogToken::Percent,
            b'^' => VerilogToken::Caret,
            b'=' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    if self.peek() == b'=' {
                        self.pos += 1;
                        VerilogToken::TripleEquals
                    } else {
                        VerilogToken::DoubleEquals
                    }
                } else {
                    VerilogToken::Equals
                }
            }
            b'!' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    if self.peek() == b'=' {
                        self.pos += 1;
                        VerilogToken::BangDoubleEquals
                    } else {
                        VerilogToken::BangEquals
                    }
                } else {
                    VerilogToken::Bang
                }
            }
            b'<' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    VerilogToken::LessEquals
                } else if self.peek() == b'<' {
                    self.pos += 1;
                    VerilogToken::DoubleLess
                } else {
                    VerilogToken::LessThan
                }
            }
            b'>' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    VerilogToken::GreaterEquals
                } else if self.peek() == b'>' {
                    self.pos += 1;
                    if self.peek() == b'>' {
                        self.pos += 1;
                        VerilogToken::TripleGreater
                    } else {
                        VerilogToken::DoubleGreater
                    }
                } else {
                    VerilogToken::GreaterThan
                }
            }
            b'*' => {
                if self.peek() == b'*' {
                    self.pos += 1;
                    VerilogToken::DoubleStar
                } else {
                    VerilogToken::Star
                }
            }
            b'&' => {
                if self.peek() == b'&' {
                    self.pos += 1;
                    VerilogToken::DoubleAmpersand
                } else {
                    VerilogToken::Ampersand
                }
            }
            b'|' => {
                if self.peek() == b'|' {
                    self.pos += 1;
                    VerilogToken::DoublePipe
                } else {
                    VerilogToken::Pipe
                }
            }
            _ => {
                self.error(
                    &format!("unrecognized character '{}'", b as char),
                    self.span_from(start),
                );
                VerilogToken::Error
            }
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

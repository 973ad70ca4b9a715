//! Core parser infrastructure and top-level parsing rules.
//!
//! The [`VerilogParser`] struct provides primitive operations (advance,
//! expect, eat) and error recovery, while top-level methods parse source
//! units, modules, ANSI-style port lists, and parameter port lists.

use crate::cst::*;
use crate::token::{Token, VerilogToken};
use veris_common::{Ident, Interner};
use veris_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use veris_source::{FileId, Span};

/// A recursive descent parser for the Verilog-2005 subset.
///
/// The parser consumes a token stream produced by the lexer and builds a
/// [`SourceUnit`] CST. Errors are reported to the diagnostic sink and
/// represented as `Error` variants in the tree; parsing never aborts on the
/// first error.
pub struct VerilogParser<'src> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) source: &'src str,
    #[allow(dead_code)]
    file: FileId,
    pub(crate) interner: &'src Interner,
    pub(crate) sink: &'src DiagnosticSink,
}

impl<'src> VerilogParser<'src> {
    /// Creates a new parser from a token stream produced by the lexer.
    ///
    /// The `tokens` must have been lexed from `source` for the given `file`.
    /// Identifiers are interned via `interner`; parse errors are emitted to
    /// `sink`.
    pub fn new(
        tokens: Vec<Token>,
        source: &'src str,
        file: FileId,
        interner: &'src Interner,
        sink: &'src DiagnosticSink,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            file,
            interner,
            sink,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    /// Returns the kind of the current token.
    pub(crate) fn current(&self) -> VerilogToken {
        self.tokens[self.pos].kind
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Returns the source text of the current token.
    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    /// Returns `true` if the current token matches the given kind.
    pub(crate) fn at(&self, kind: VerilogToken) -> bool {
        self.current() == kind
    }

    /// Returns `true` if the parser is at end of file.
    pub(crate) fn at_eof(&self) -> bool {
        self.current() == VerilogToken::Eof
    }

    /// Returns the span of the previous token.
    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    /// Advances past the current token.
    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches. Returns `true` if consumed.
    pub(crate) fn eat(&mut self, kind: VerilogToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind. Emits a
    /// missing-token error if not.
    pub(crate) fn expect(&mut self, kind: VerilogToken) {
        if !self.eat(kind) {
            self.expected(token_description(kind));
        }
    }

    /// Expects and returns an identifier. Emits an error and returns a dummy
    /// name if not.
    pub(crate) fn expect_ident(&mut self) -> Ident {
        if self.at(VerilogToken::Identifier) {
            let text = self.current_text();
            let ident = self.interner.get_or_intern(text);
            self.advance();
            ident
        } else {
            self.expected("identifier");
            self.interner.get_or_intern("<missing>")
        }
    }

    /// Returns the kind of the token at pos+offset.
    pub(crate) fn peek_kind(&self, offset: usize) -> VerilogToken {
        let idx = self.pos + offset;
        if idx < self.tokens.len() {
            self.tokens[idx].kind
        } else {
            VerilogToken::Eof
        }
    }

    // ========================================================================
    // Error handling and recovery
    // ========================================================================

    /// Emits an unexpected-token error at the current position.
    pub(crate) fn error(&self, msg: &str) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::UNEXPECTED_TOKEN,
            msg,
            self.current_span(),
        ));
    }

    /// Emits an "expected X, found Y" error at the current position.
    pub(crate) fn expected(&self, what: &str) {
        let found = match self.current() {
            VerilogToken::Eof => "end of file".to_string(),
            _ => format!("'{}'", self.current_text()),
        };
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::MISSING_TOKEN,
            format!("expected {what}, found {found}"),
            self.current_span(),
        ));
    }

    /// Recovers to a semicolon, consuming everything up to and including it.
    pub(crate) fn recover_to_semicolon(&mut self) {
        while !self.at_eof()
            && !self.at(VerilogToken::Semicolon)
            && !self.at(VerilogToken::Endmodule)
        {
            self.advance();
        }
        self.eat(VerilogToken::Semicolon);
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses a complete source unit.
    pub fn parse_source_unit(&mut self) -> SourceUnit {
        let start = self.current_span();
        let mut items = Vec::new();

        while !self.at_eof() {
            match self.current() {
                VerilogToken::Module => {
                    items.push(SourceItem::Module(self.parse_module()));
                }
                _ => {
                    let span = self.current_span();
                    self.expected("'module'");
                    self.advance();
                    items.push(SourceItem::Error(span));
                }
            }
        }

        let span = if items.is_empty() {
            start
        } else {
            start.merge(self.prev_span())
        };

        SourceUnit { items, span }
    }

    /// Parses a module declaration.
    fn parse_module(&mut self) -> ModuleDecl {
        let start = self.current_span();
        self.expect(VerilogToken::Module);
        let name = self.expect_ident();

        // Optional parameter port list: #(...)
        let params = if self.at(VerilogToken::Hash) {
            self.parse_parameter_port_list()
        } else {
            Vec::new()
        };

        // Optional ANSI-style port list
        let ports = if self.at(VerilogToken::LeftParen) {
            self.parse_port_list()
        } else {
            Vec::new()
        };

        self.expect(VerilogToken::Semicolon);

        let items = self.parse_module_items();

        self.expect(VerilogToken::Endmodule);
        let span = start.merge(self.prev_span());

        ModuleDecl {
            name,
            params,
            ports,
            items,
            span,
        }
    }

    /// Parses a parameter port list: `#( param_decl {, param_decl} )`.
    fn parse_parameter_port_list(&mut self) -> Vec<ParameterDecl> {
        self.expect(VerilogToken::Hash);
        self.expect(VerilogToken::LeftParen);

        let mut params = Vec::new();
        if !self.at(VerilogToken::RightParen) {
            loop {
                params.push(self.parse_single_parameter_decl(false));
                if !self.eat(VerilogToken::Comma) {
                    break;
                }
            }
        }

        self.expect(VerilogToken::RightParen);
        params
    }

    /// Parses a single parameter declaration.
    pub(crate) fn parse_single_parameter_decl(&mut self, local: bool) -> ParameterDecl {
        let start = self.current_span();
        let is_local = if self.eat(VerilogToken::Localparam) {
            true
        } else {
            self.eat(VerilogToken::Parameter);
            local
        };

        let range = if self.at(VerilogToken::LeftBracket) {
            Some(self.parse_range())
        } else {
            None
        };

        let name = self.expect_ident();

        let value = if self.eat(VerilogToken::Equals) {
            Some(self.parse_expr())
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        ParameterDecl {
            local: is_local,
            range,
            name,
            value,
            span,
        }
    }

    /// Parses an ANSI-style port list.
    fn parse_port_list(&mut self) -> Vec<PortDecl> {
        self.expect(VerilogToken::LeftParen);

        // Empty port list
        if self.eat(VerilogToken::RightParen) {
            return Vec::new();
        }

        if !self.current().is_direction() {
            self.expected("port direction ('input', 'output', or 'inout')");
            while !self.at_eof() && !self.eat(VerilogToken::RightParen) {
                self.advance();
            }
            return Vec::new();
        }

        let ports = self.parse_ansi_port_list();
        self.expect(VerilogToken::RightParen);
        ports
    }

    /// Parses ANSI-style port declarations: `dir [wire|reg] [range] name {, name}`.
    fn parse_ansi_port_list(&mut self) -> Vec<PortDecl> {
        let mut ports = Vec::new();
        let mut current_dir = Direction::Input;

        loop {
            let start = self.current_span();

            // Direction (optional: inherits from the previous declaration)
            let dir = if self.eat(VerilogToken::Input) {
                current_dir = Direction::Input;
                Direction::Input
            } else if self.eat(VerilogToken::Output) {
                current_dir = Direction::Output;
                Direction::Output
            } else if self.eat(VerilogToken::Inout) {
                current_dir = Direction::Inout;
                Direction::Inout
            } else {
                current_dir
            };

            // Optional storage class
            let net_type = if self.eat(VerilogToken::Wire) {
                Some(NetType::Wire)
            } else if self.eat(VerilogToken::Reg) {
                Some(NetType::Reg)
            } else {
                None
            };

            // Optional range
            let range = if self.at(VerilogToken::LeftBracket) {
                Some(self.parse_range())
            } else {
                None
            };

            // Names sharing this declaration
            let mut names = Vec::new();
            names.push(self.expect_ident());
            while self.at(VerilogToken::Comma) {
                // A comma followed by a new direction/type starts a new group.
                let next = self.peek_kind(1);
                if next.is_direction() || next == VerilogToken::Wire || next == VerilogToken::Reg {
                    break;
                }
                self.advance(); // eat comma
                if self.at(VerilogToken::Identifier) {
                    names.push(self.expect_ident());
                } else {
                    break;
                }
            }

            let span = start.merge(self.prev_span());
            ports.push(PortDecl {
                direction: dir,
                net_type,
                range,
                names,
                span,
            });

            if !self.eat(VerilogToken::Comma) {
                break;
            }
        }

        ports
    }

    /// Parses a range: `[ expr : expr ]`.
    pub(crate) fn parse_range(&mut self) -> Range {
        let start = self.current_span();
        self.expect(VerilogToken::LeftBracket);
        let msb = self.parse_expr();
        self.expect(VerilogToken::Colon);
        let lsb = self.parse_expr();
        self.expect(VerilogToken::RightBracket);
        let span = start.merge(self.prev_span());
        Range { msb, lsb, span }
    }
}

/// Returns a human-readable description of a token kind for error messages.
fn token_description(kind: VerilogToken) -> &'static str {
    match kind {
        VerilogToken::Semicolon => "';'",
        VerilogToken::Colon => "':'",
        VerilogToken::Comma => "','",
        VerilogToken::LeftParen => "'('",
        VerilogToken::RightParen => "')'",
        VerilogToken::LeftBracket => "'['",
        VerilogToken::RightBracket => "']'",
        VerilogToken::LeftBrace => "'{'",
        VerilogToken::RightBrace => "'}'",
        VerilogToken::At => "'@'",
        VerilogToken::Hash => "'#'",
        VerilogToken::Equals => "'='",
        VerilogToken::Module => "'module'",
        VerilogToken::Endmodule => "'endmodule'",
        VerilogToken::Endcase => "'endcase'",
        VerilogToken::Begin => "'begin'",
        VerilogToken::End => "'end'",
        VerilogToken::Case => "'case'",
        VerilogToken::Identifier => "identifier",
        _ => "token",
    }
}

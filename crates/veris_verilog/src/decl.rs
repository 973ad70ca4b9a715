//! Declaration and module item parsing for the Verilog-2005 subset.
//!
//! Handles wire/reg/integer declarations, parameter/localparam, continuous
//! assign, always/initial blocks, and module instantiation.
//!
//! **Instantiation detection:** when an identifier appears at module-item
//! level, the parser peeks at the next token: if it's also an identifier or
//! `#`, this is a module instantiation rather than a declaration.

use crate::cst::*;
use crate::parser::VerilogParser;
use crate::token::VerilogToken;

impl VerilogParser<'_> {
    /// Parses module items until `endmodule` or EOF.
    pub fn parse_module_items(&mut self) -> Vec<ModuleItem> {
        let mut items = Vec::new();
        while !self.at(VerilogToken::Endmodule) && !self.at_eof() {
            items.push(self.parse_module_item());
        }
        items
    }

    /// Parses a single module item.
    pub(crate) fn parse_module_item(&mut self) -> ModuleItem {
        match self.current() {
            VerilogToken::Wire => self.parse_wire_declaration(),
            VerilogToken::Reg => self.parse_reg_declaration(),
            VerilogToken::Integer => self.parse_integer_declaration(),
            VerilogToken::Parameter => {
                let decl = self.parse_parameter_declaration(false);
                ModuleItem::ParameterDecl(decl)
            }
            VerilogToken::Localparam => {
                let decl = self.parse_parameter_declaration(true);
                ModuleItem::LocalparamDecl(decl)
            }
            VerilogToken::Assign => self.parse_continuous_assign(),
            VerilogToken::Always => self.parse_always_block(),
            VerilogToken::Initial => self.parse_initial_block(),
            VerilogToken::Identifier => {
                // Detect instantiation: ident ident or ident #
                let next = self.peek_kind(1);
                if next == VerilogToken::Identifier || next == VerilogToken::Hash {
                    self.parse_module_instantiation()
                } else {
                    let span = self.current_span();
                    self.expected("module item");
                    self.recover_to_semicolon();
                    ModuleItem::Error(span)
                }
            }
            _ => {
                let span = self.current_span();
                self.expected("module item");
                self.recover_to_semicolon();
                ModuleItem::Error(span)
            }
        }
    }

    /// Parses a wire declaration: `wire [range] name {, name} ;`.
    fn parse_wire_declaration(&mut self) -> ModuleItem {
        let start = self.current_span();
        self.expect(VerilogToken::Wire);
        let range = if self.at(VerilogToken::LeftBracket) {
            Some(self.parse_range())
        } else {
            None
        };
        let names = self.parse_ident_list();
        self.expect(VerilogToken::Semicolon);
        let span = start.merge(self.prev_span());
        ModuleItem::WireDecl(WireDecl { range, names, span })
    }

    /// Parses a reg declaration: `reg [range] name [array] {, name [array]} ;`.
    fn parse_reg_declaration(&mut self) -> ModuleItem {
        let start = self.current_span();
        self.expect(VerilogToken::Reg);
        let range = if self.at(VerilogToken::LeftBracket) {
            Some(self.parse_range())
        } else {
            None
        };
        let names = self.parse_decl_name_list();
        self.expect(VerilogToken::Semicolon);
        let span = start.merge(self.prev_span());
        ModuleItem::RegDecl(RegDecl { range, names, span })
    }

    /// Parses an integer declaration: `integer name {, name} ;`.
    fn parse_integer_declaration(&mut self) -> ModuleItem {
        let start = self.current_span();
        self.expect(VerilogToken::Integer);
        let names = self.parse_ident_list();
        self.expect(VerilogToken::Semicolon);
        let span = start.merge(self.prev_span());
        ModuleItem::IntegerDecl(IntegerDecl { names, span })
    }

    /// Parses a comma-separated list of plain identifiers.
    fn parse_ident_list(&mut self) -> Vec<veris_common::Ident> {
        let mut names = Vec::new();
        names.push(self.expect_ident());
        while self.eat(VerilogToken::Comma) {
            names.push(self.expect_ident());
        }
        names
    }

    /// Parses a comma-separated list of declared names with optional array
    /// dimensions.
    fn parse_decl_name_list(&mut self) -> Vec<DeclName> {
        let mut names = Vec::new();
        loop {
            let start = self.current_span();
            let name = self.expect_ident();
            let array = if self.at(VerilogToken::LeftBracket) {
                Some(self.parse_range())
            } else {
                None
            };
            let span = start.merge(self.prev_span());
            names.push(DeclName { name, array, span });
            if !self.eat(VerilogToken::Comma) {
                break;
            }
        }
        names
    }

    /// Parses a parameter or localparam declaration item (with semicolon).
    fn parse_parameter_declaration(&mut self, local: bool) -> ParameterDecl {
        let decl = self.parse_single_parameter_decl(local);
        self.expect(VerilogToken::Semicolon);
        decl
    }

    /// Parses a continuous assignment: `assign target = value ;`.
    fn parse_continuous_assign(&mut self) -> ModuleItem {
        let start = self.current_span();
        self.expect(VerilogToken::Assign);
        let target = self.parse_lvalue();
        self.expect(VerilogToken::Equals);
        let value = self.parse_expr();
        self.expect(VerilogToken::Semicolon);
        let span = start.merge(self.prev_span());
        ModuleItem::ContinuousAssign(ContinuousAssign {
            target,
            value,
            span,
        })
    }

    /// Parses an always block: `always @(...) stmt`.
    fn parse_always_block(&mut self) -> ModuleItem {
        let start = self.current_span();
        self.expect(VerilogToken::Always);
        let body = if self.at(VerilogToken::At) {
            self.parse_event_control()
        } else {
            self.expected("'@'");
            self.parse_statement()
        };
        let span = start.merge(self.prev_span());
        ModuleItem::AlwaysBlock(AlwaysBlock { body, span })
    }

    /// Parses an initial block: `initial stmt`.
    fn parse_initial_block(&mut self) -> ModuleItem {
        let start = self.current_span();
        self.expect(VerilogToken::Initial);
        let body = self.parse_statement();
        let span = start.merge(self.prev_span());
        ModuleItem::InitialBlock(InitialBlock { body, span })
    }

    /// Parses a module instantiation:
    /// `type [#(overrides)] name ( connections ) ;`.
    fn parse_module_instantiation(&mut self) -> ModuleItem {
        let start = self.current_span();
        let module_name = self.expect_ident();

        let param_overrides = if self.eat(VerilogToken::Hash) {
            self.parse_connection_list()
        } else {
            Vec::new()
        };

        let instance_name = self.expect_ident();
        let connections = self.parse_connection_list();
        self.expect(VerilogToken::Semicolon);
        let span = start.merge(self.prev_span());

        ModuleItem::Instantiation(Instantiation {
            module_name,
            param_overrides,
            instance_name,
            connections,
            span,
        })
    }

    /// Parses a parenthesized connection list, named or positional.
    fn parse_connection_list(&mut self) -> Vec<Connection> {
        self.expect(VerilogToken::LeftParen);
        let mut connections = Vec::new();

        if self.eat(VerilogToken::RightParen) {
            return connections;
        }

        loop {
            let start = self.current_span();
            if self.eat(VerilogToken::Dot) {
                // Named connection: .formal(actual) or .formal()
                let formal = self.expect_ident();
                self.expect(VerilogToken::LeftParen);
                let actual = if self.at(VerilogToken::RightParen) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                self.expect(VerilogToken::RightParen);
                let span = start.merge(self.prev_span());
                connections.push(Connection {
                    formal: Some(formal),
                    actual,
                    span,
                });
            } else {
                // Positional connection
                let actual = self.parse_expr();
                let span = start.merge(self.prev_span());
                connections.push(Connection {
                    formal: None,
                    actual: Some(actual),
                    span,
                });
            }
            if !self.eat(VerilogToken::Comma) {
                break;
            }
        }

        self.expect(VerilogToken::RightParen);
        connections
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::*;
    use crate::lexer;
    use crate::parser::VerilogParser;
    use veris_common::Interner;
    use veris_diagnostics::{Diagnostic, DiagnosticSink};
    use veris_source::FileId;

    fn parse_items(body: &str) -> (Vec<ModuleItem>, Vec<Diagnostic>) {
        let full = format!("module test; {body} endmodule");
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(0);
        let output = lexer::lex(&full, file, &sink);
        let mut parser = VerilogParser::new(output.tokens, &full, file, &interner, &sink);
        let unit = parser.parse_source_unit();
        let items = match unit.items.into_iter().next() {
            Some(SourceItem::Module(m)) => m.items,
            other => panic!("expected module, got {other:?}"),
        };
        (items, sink.take_all())
    }

    fn parse_items_ok(body: &str) -> Vec<ModuleItem> {
        let (items, errors) = parse_items(body);
        assert!(
            errors.is_empty(),
            "unexpected errors: {:?}",
            errors.iter().map(|e| &e.message).collect::<Vec<_>>()
        );
        items
    }

    #[test]
    fn wire_declaration() {
        let items = parse_items_ok("wire [7:0] data;");
        match &items[0] {
            ModuleItem::WireDecl(d) => {
                assert!(d.range.is_some());
                assert_eq!(d.names.len(), 1);
            }
            other => panic!("expected wire decl, got {other:?}"),
        }
    }

    #[test]
    fn wire_multiple_names() {
        let items = parse_items_ok("wire a, b, c;");
        match &items[0] {
            ModuleItem::WireDecl(d) => assert_eq!(d.names.len(), 3),
            other => panic!("expected wire decl, got {other:?}"),
        }
    }

    #[test]
    fn reg_with_array_dimension() {
        let items = parse_items_ok("reg [7:0] mem [0:255];");
        match &items[0] {
            ModuleItem::RegDecl(d) => {
                assert!(d.range.is_some());
                assert!(d.names[0].array.is_some());
            }
            other => panic!("expected reg decl, got {other:?}"),
        }
    }

    #[test]
    fn integer_declaration() {
        let items = parse_items_ok("integer i, j;");
        match &items[0] {
            ModuleItem::IntegerDecl(d) => assert_eq!(d.names.len(), 2),
            other => panic!("expected integer decl, got {other:?}"),
        }
    }

    #[test]
    fn localparam_declaration() {
        let items = parse_items_ok("localparam [1:0] IDLE = 2'b00;");
        match &items[0] {
            ModuleItem::LocalparamDecl(d) => {
                assert!(d.local);
                assert!(d.range.is_some());
                assert!(d.value.is_some());
            }
            other => panic!("expected localparam, got {other:?}"),
        }
    }

    #[test]
    fn parameter_declaration() {
        let items = parse_items_ok("parameter WIDTH = 8;");
        match &items[0] {
            ModuleItem::ParameterDecl(d) => assert!(!d.local),
            other => panic!("expected parameter, got {other:?}"),
        }
    }

    #[test]
    fn continuous_assign() {
        let items = parse_items_ok("assign y = a & b;");
        assert!(matches!(&items[0], ModuleItem::ContinuousAssign(_)));
    }

    #[test]
    fn always_block_sequential() {
        let items = parse_items_ok("always @(posedge clk) q <= d;");
        match &items[0] {
            ModuleItem::AlwaysBlock(b) => {
                assert!(matches!(b.body, Statement::EventControl { .. }));
            }
            other => panic!("expected always block, got {other:?}"),
        }
    }

    #[test]
    fn always_block_combinational() {
        let items = parse_items_ok("always @(*) begin y = a; end");
        assert!(matches!(&items[0], ModuleItem::AlwaysBlock(_)));
    }

    #[test]
    fn initial_block() {
        let items = parse_items_ok("initial begin q = 0; end");
        assert!(matches!(&items[0], ModuleItem::InitialBlock(_)));
    }

    #[test]
    fn named_instantiation() {
        let items = parse_items_ok("counter #(.WIDTH(8)) u1 (.clk(clk), .count(c));");
        match &items[0] {
            ModuleItem::Instantiation(inst) => {
                assert_eq!(inst.param_overrides.len(), 1);
                assert_eq!(inst.connections.len(), 2);
                assert!(inst.connections[0].formal.is_some());
            }
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn positional_instantiation() {
        let items = parse_items_ok("adder u2 (a, b, sum);");
        match &items[0] {
            ModuleItem::Instantiation(inst) => {
                assert_eq!(inst.connections.len(), 3);
                assert!(inst.connections[0].formal.is_none());
            }
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn unconnected_port() {
        let items = parse_items_ok("sub u3 (.clk(clk), .unused());");
        match &items[0] {
            ModuleItem::Instantiation(inst) => {
                assert!(inst.connections[1].actual.is_none());
            }
            other => panic!("expected instantiation, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_function_is_error() {
        // "function" lexes as an identifier; item-level recovery kicks in.
        let (_items, errors) = parse_items("function f; endfunction");
        assert!(!errors.is_empty());
    }

    #[test]
    fn error_recovery_continues_to_next_item() {
        let (items, errors) = parse_items("bogus!!; wire ok;");
        assert!(!errors.is_empty());
        assert!(items.iter().any(|i| matches!(i, ModuleItem::WireDecl(_))));
    }

    #[test]
    fn always_without_event_control() {
        let (_, errors) = parse_items("always begin q = 0; end");
        assert!(!errors.is_empty());
    }
}

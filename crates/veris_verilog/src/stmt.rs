//! Statement parsing for the Verilog-2005 subset.
//!
//! Handles blocking and non-blocking assignments, if/else, case/casex/casez,
//! event control (`@`), and begin/end blocks.
//!
//! **`<=` disambiguation:** in statement context, the LHS is parsed with the
//! restricted lvalue parser. If `=` follows, it's a blocking assignment; if
//! `<=` follows, it's a non-blocking assignment. In expression context
//! (inside conditions), `<=` is the comparison operator handled by the Pratt
//! parser.

use crate::cst::*;
use crate::parser::VerilogParser;
use crate::token::VerilogToken;

impl VerilogParser<'_> {
    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Statement {
        match self.current() {
            VerilogToken::Begin => self.parse_begin_end_block(),
            VerilogToken::If => self.parse_if_statement(),
            VerilogToken::Case | VerilogToken::Casex | VerilogToken::Casez => {
                self.parse_case_statement()
            }
            VerilogToken::At => {
                let span = self.current_span();
                self.error("event control is only allowed at the top of an always block");
                self.recover_to_semicolon();
                Statement::Error(span)
            }
            VerilogToken::Semicolon => {
                let span = self.current_span();
                self.advance();
                Statement::Null { span }
            }
            VerilogToken::Identifier | VerilogToken::LeftBrace => self.parse_assignment(),
            _ => {
                let span = self.current_span();
                self.expected("statement");
                self.recover_to_semicolon();
                Statement::Error(span)
            }
        }
    }

    /// Parses a begin ... end block.
    fn parse_begin_end_block(&mut self) -> Statement {
        let start = self.current_span();
        self.expect(VerilogToken::Begin);

        let mut stmts = Vec::new();
        while !self.at(VerilogToken::End) && !self.at(VerilogToken::Endmodule) && !self.at_eof() {
            stmts.push(self.parse_statement());
        }

        self.expect(VerilogToken::End);
        let span = start.merge(self.prev_span());

        Statement::Block { stmts, span }
    }

    /// Parses an if statement.
    fn parse_if_statement(&mut self) -> Statement {
        let start = self.current_span();
        self.expect(VerilogToken::If);
        self.expect(VerilogToken::LeftParen);
        let condition = self.parse_expr();
        self.expect(VerilogToken::RightParen);

        let then_stmt = self.parse_statement();

        let else_stmt = if self.eat(VerilogToken::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        Statement::If {
            condition,
            then_stmt: Box::new(then_stmt),
            else_stmt,
            span,
        }
    }

    /// Parses a case/casex/casez statement.
    fn parse_case_statement(&mut self) -> Statement {
        let start = self.current_span();
        let kind = match self.current() {
            VerilogToken::Casex => {
                self.advance();
                CaseKind::Casex
            }
            VerilogToken::Casez => {
                self.advance();
                CaseKind::Casez
            }
            _ => {
                self.expect(VerilogToken::Case);
                CaseKind::Case
            }
        };

        self.expect(VerilogToken::LeftParen);
        let selector = self.parse_expr();
        self.expect(VerilogToken::RightParen);

        let mut arms = Vec::new();
        while !self.at(VerilogToken::Endcase) && !self.at(VerilogToken::Endmodule) && !self.at_eof()
        {
            arms.push(self.parse_case_arm());
        }

        self.expect(VerilogToken::Endcase);
        let span = start.merge(self.prev_span());

        Statement::Case {
            kind,
            selector,
            arms,
            span,
        }
    }

    /// Parses a single case arm.
    fn parse_case_arm(&mut self) -> CaseArm {
        let start = self.current_span();

        if self.eat(VerilogToken::Default) {
            self.eat(VerilogToken::Colon);
            let body = self.parse_statement();
            let span = start.merge(self.prev_span());
            CaseArm {
                patterns: Vec::new(),
                is_default: true,
                body,
                span,
            }
        } else {
            let mut patterns = Vec::new();
            patterns.push(self.parse_expr());
            while self.eat(VerilogToken::Comma) {
                patterns.push(self.parse_expr());
            }
            self.expect(VerilogToken::Colon);
            let body = self.parse_statement();
            let span = start.merge(self.prev_span());
            CaseArm {
                patterns,
                is_default: false,
                body,
                span,
            }
        }
    }

    /// Parses an event control: `@(sensitivity_list) stmt`, `@* stmt`, or
    /// `@(*) stmt`.
    pub(crate) fn parse_event_control(&mut self) -> Statement {
        let start = self.current_span();
        self.expect(VerilogToken::At);

        // @* shorthand
        if self.eat(VerilogToken::Star) {
            let body = self.parse_statement();
            let span = start.merge(self.prev_span());
            return Statement::EventControl {
                sensitivity: SensitivityList::Star,
                body: Box::new(body),
                span,
            };
        }

        self.expect(VerilogToken::LeftParen);

        // @(*)
        if self.at(VerilogToken::Star) {
            self.advance();
            self.expect(VerilogToken::RightParen);
            let body = self.parse_statement();
            let span = start.merge(self.prev_span());
            return Statement::EventControl {
                sensitivity: SensitivityList::Star,
                body: Box::new(body),
                span,
            };
        }

        let mut items = Vec::new();
        items.push(self.parse_sensitivity_item());
        while self.eat(VerilogToken::Or) || self.eat(VerilogToken::Comma) {
            items.push(self.parse_sensitivity_item());
        }

        self.expect(VerilogToken::RightParen);

        let body = self.parse_statement();
        let span = start.merge(self.prev_span());

        Statement::EventControl {
            sensitivity: SensitivityList::List(items),
            body: Box::new(body),
            span,
        }
    }

    /// Parses a single sensitivity list item.
    fn parse_sensitivity_item(&mut self) -> SensitivityItem {
        let start = self.current_span();
        let edge = if self.eat(VerilogToken::Posedge) {
            Some(EdgeKind::Posedge)
        } else if self.eat(VerilogToken::Negedge) {
            Some(EdgeKind::Negedge)
        } else {
            None
        };
        let signal = self.expect_ident();
        let span = start.merge(self.prev_span());
        SensitivityItem { edge, signal, span }
    }

    /// Parses a blocking or non-blocking assignment.
    fn parse_assignment(&mut self) -> Statement {
        let start = self.current_span();
        let target = self.parse_lvalue();

        match self.current() {
            VerilogToken::Equals => {
                self.advance();
                let value = self.parse_expr();
                self.expect(VerilogToken::Semicolon);
                let span = start.merge(self.prev_span());
                Statement::Blocking {
                    target,
                    value,
                    span,
                }
            }
            VerilogToken::LessEquals => {
                self.advance();
                let value = self.parse_expr();
                self.expect(VerilogToken::Semicolon);
                let span = start.merge(self.prev_span());
                Statement::NonBlocking {
                    target,
                    value,
                    span,
                }
            }
            _ => {
                let span = self.current_span();
                self.expected("'=' or '<='");
                self.recover_to_semicolon();
                Statement::Error(start.merge(span))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::*;
    use crate::lexer;
    use crate::parser::VerilogParser;
    use veris_common::Interner;
    use veris_diagnostics::DiagnosticSink;
    use veris_source::FileId;

    fn parse_stmt(source: &str) -> Statement {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(0);
        let output = lexer::lex(source, file, &sink);
        let mut parser = VerilogParser::new(output.tokens, source, file, &interner, &sink);
        let stmt = parser.parse_statement();
        assert!(
            !sink.has_errors(),
            "unexpected errors: {:?}",
            sink.diagnostics()
        );
        stmt
    }

    fn parse_event(source: &str) -> Statement {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(0);
        let output = lexer::lex(source, file, &sink);
        let mut parser = VerilogParser::new(output.tokens, source, file, &interner, &sink);
        let stmt = parser.parse_event_control();
        assert!(
            !sink.has_errors(),
            "unexpected errors: {:?}",
            sink.diagnostics()
        );
        stmt
    }

    fn parse_stmt_with_errors(source: &str) -> (Statement, usize) {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(0);
        let output = lexer::lex(source, file, &sink);
        let mut parser = VerilogParser::new(output.tokens, source, file, &interner, &sink);
        let stmt = parser.parse_statement();
        (stmt, sink.error_count())
    }

    #[test]
    fn blocking_assignment() {
        assert!(matches!(parse_stmt("a = b;"), Statement::Blocking { .. }));
    }

    #[test]
    fn non_blocking_assignment() {
        assert!(matches!(parse_stmt("q <= d;"), Statement::NonBlocking { .. }));
    }

    #[test]
    fn non_blocking_with_comparison_rhs() {
        // q <= a <= b;: first <= is the assignment, second the comparison
        match parse_stmt("q <= a <= b;") {
            Statement::NonBlocking { value, .. } => {
                assert!(matches!(value, Expr::Binary { op: BinaryOp::Le, .. }));
            }
            other => panic!("expected non-blocking, got {other:?}"),
        }
    }

    #[test]
    fn bit_select_target() {
        match parse_stmt("mem[3] = 1'b1;") {
            Statement::Blocking { target, .. } => {
                assert!(matches!(target, Expr::BitSelect { .. }));
            }
            other => panic!("expected blocking, got {other:?}"),
        }
    }

    #[test]
    fn concat_target() {
        match parse_stmt("{carry, sum} = a + b;") {
            Statement::Blocking { target, .. } => {
                assert!(matches!(target, Expr::Concat { .. }));
            }
            other => panic!("expected blocking, got {other:?}"),
        }
    }

    #[test]
    fn begin_end_block() {
        match parse_stmt("begin a = 1; b = 2; end") {
            Statement::Block { stmts, .. } => assert_eq!(stmts.len(), 2),
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn if_else_chain() {
        match parse_stmt("if (a) x = 1; else if (b) x = 2; else x = 3;") {
            Statement::If { else_stmt, .. } => {
                let else_stmt = else_stmt.expect("else branch");
                assert!(matches!(*else_stmt, Statement::If { .. }));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn case_statement() {
        let source = "case (state)
            2'b00: next = 2'b01;
            2'b01, 2'b10: next = 2'b00;
            default: next = 2'b00;
        endcase";
        match parse_stmt(source) {
            Statement::Case { kind, arms, .. } => {
                assert_eq!(kind, CaseKind::Case);
                assert_eq!(arms.len(), 3);
                assert_eq!(arms[1].patterns.len(), 2);
                assert!(arms[2].is_default);
            }
            other => panic!("expected case, got {other:?}"),
        }
    }

    #[test]
    fn casez_statement() {
        match parse_stmt("casez (x) 2'b1?: y = 1; endcase") {
            Statement::Case { kind, .. } => assert_eq!(kind, CaseKind::Casez),
            other => panic!("expected case, got {other:?}"),
        }
    }

    #[test]
    fn event_control_star() {
        match parse_event("@(*) y = a & b;") {
            Statement::EventControl { sensitivity, .. } => {
                assert!(matches!(sensitivity, SensitivityList::Star));
            }
            other => panic!("expected event control, got {other:?}"),
        }
    }

    #[test]
    fn event_control_bare_star() {
        match parse_event("@* y = a;") {
            Statement::EventControl { sensitivity, .. } => {
                assert!(matches!(sensitivity, SensitivityList::Star));
            }
            other => panic!("expected event control, got {other:?}"),
        }
    }

    #[test]
    fn event_control_edges() {
        match parse_event("@(posedge clk or negedge rst_n) q <= d;") {
            Statement::EventControl { sensitivity, .. } => match sensitivity {
                SensitivityList::List(items) => {
                    assert_eq!(items.len(), 2);
                    assert_eq!(items[0].edge, Some(EdgeKind::Posedge));
                    assert_eq!(items[1].edge, Some(EdgeKind::Negedge));
                }
                other => panic!("expected list, got {other:?}"),
            },
            other => panic!("expected event control, got {other:?}"),
        }
    }

    #[test]
    fn event_control_comma_separator() {
        match parse_event("@(a, b, c) y = a;") {
            Statement::EventControl { sensitivity, .. } => match sensitivity {
                SensitivityList::List(items) => {
                    assert_eq!(items.len(), 3);
                    assert!(items.iter().all(|i| i.edge.is_none()));
                }
                other => panic!("expected list, got {other:?}"),
            },
            other => panic!("expected event control, got {other:?}"),
        }
    }

    #[test]
    fn null_statement() {
        assert!(matches!(parse_stmt(";"), Statement::Null { .. }));
    }

    #[test]
    fn error_recovery_bad_statement() {
        let (stmt, errors) = parse_stmt_with_errors("module x = 1;");
        assert!(matches!(stmt, Statement::Error(_)));
        assert!(errors > 0);
    }

    #[test]
    fn error_recovery_missing_assign_op() {
        let (stmt, errors) = parse_stmt_with_errors("foo bar;");
        assert!(matches!(stmt, Statement::Error(_)));
        assert!(errors > 0);
    }
}

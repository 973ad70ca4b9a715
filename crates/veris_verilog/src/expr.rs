//! Pratt expression parser for the Verilog-2005 subset.
//!
//! Implements operator-precedence parsing following IEEE 1364-2005 Table 5-4:
//!
//! | BP (L,R) | Operators |
//! |----------|-----------|
//! | (1,2)    | `\|\|` |
//! | (3,4)    | `&&` |
//! | (5,6)    | `\|` |
//! | (7,8)    | `^` |
//! | (9,10)   | `&` |
//! | (11,12)  | `==` `!=` `===` `!==` |
//! | (13,14)  | `<` `<=` `>` `>=` |
//! | (15,16)  | `<<` `>>` `>>>` |
//! | (17,18)  | `+` `-` |
//! | (19,20)  | `*` `/` `%` |
//! | (22,21)  | `**` (right-assoc) |
//! | prefix 23 | `+` `-` `!` `~` |
//!
//! Ternary `? :` is handled as a special case at min_bp=0
//! (right-associative). `<=` only reaches this parser in expression context;
//! in statement position the lvalue parser stops before it so it can be read
//! as non-blocking assignment.

use crate::cst::*;
use crate::parser::VerilogParser;
use crate::token::VerilogToken;

/// Binding power for binary operators. Returns (left_bp, right_bp).
fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::LogOr => (1, 2),
        BinaryOp::LogAnd => (3, 4),
        BinaryOp::BitOr => (5, 6),
        BinaryOp::BitXor => (7, 8),
        BinaryOp::BitAnd => (9, 10),
        BinaryOp::Eq | BinaryOp::Neq | BinaryOp::CaseEq | BinaryOp::CaseNeq => (11, 12),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => (13, 14),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::AShr => (15, 16),
        BinaryOp::Add | BinaryOp::Sub => (17, 18),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (19, 20),
        BinaryOp::Pow => (22, 21), // right-associative
    }
}

impl VerilogParser<'_> {
    /// Parses an expression.
    pub fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(0)
    }

    /// Parses an expression with minimum binding power.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_prefix_expr();

        loop {
            if self.at_eof() {
                break;
            }

            // Ternary `? :` binds loosest and is right-associative.
            if self.at(VerilogToken::Question) && min_bp == 0 {
                let op_span = self.current_span();
                self.advance(); // eat ?
                let then_expr = self.parse_expr_bp(0);
                self.expect(VerilogToken::Colon);
                let else_expr = self.parse_expr_bp(0);
                let span = lhs.span().merge(else_expr.span()).merge(op_span);
                lhs = Expr::Ternary {
                    condition: Box::new(lhs),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                    span,
                };
                continue;
            }

            let op = match self.current_as_binary_op() {
                Some(op) => op,
                None => break,
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.advance(); // consume operator token

            let rhs = self.parse_expr_bp(r_bp);
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
                span,
            };
        }

        lhs
    }

    /// Maps the current token to a binary operator, if it is one.
    fn current_as_binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current() {
            VerilogToken::DoublePipe => BinaryOp::LogOr,
            VerilogToken::DoubleAmpersand => BinaryOp::LogAnd,
            VerilogToken::Pipe => BinaryOp::BitOr,
            VerilogToken::Caret => BinaryOp::BitXor,
            VerilogToken::Ampersand => BinaryOp::BitAnd,
            VerilogToken::DoubleEquals => BinaryOp::Eq,
            VerilogToken::BangEquals => BinaryOp::Neq,
            VerilogToken::TripleEquals => BinaryOp::CaseEq,
            VerilogToken::BangDoubleEquals => BinaryOp::CaseNeq,
            VerilogToken::LessThan => BinaryOp::Lt,
            VerilogToken::LessEquals => BinaryOp::Le,
            VerilogToken::GreaterThan => BinaryOp::Gt,
            VerilogToken::GreaterEquals => BinaryOp::Ge,
            VerilogToken::DoubleLess => BinaryOp::Shl,
            VerilogToken::DoubleGreater => BinaryOp::Shr,
            VerilogToken::TripleGreater => BinaryOp::AShr,
            VerilogToken::Plus => BinaryOp::Add,
            VerilogToken::Minus => BinaryOp::Sub,
            VerilogToken::Star => BinaryOp::Mul,
            VerilogToken::Slash => BinaryOp::Div,
            VerilogToken::Percent => BinaryOp::Mod,
            VerilogToken::DoubleStar => BinaryOp::Pow,
            _ => return None,
        };
        Some(op)
    }

    /// Parses a prefix expression (unary operators, literals, names, braces).
    fn parse_prefix_expr(&mut self) -> Expr {
        let start = self.current_span();

        let unary_op = match self.current() {
            VerilogToken::Plus => Some(UnaryOp::Plus),
            VerilogToken::Minus => Some(UnaryOp::Minus),
            VerilogToken::Bang => Some(UnaryOp::LogNot),
            VerilogToken::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = unary_op {
            self.advance();
            let operand = self.parse_expr_bp(23);
            let span = start.merge(operand.span());
            return Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            };
        }

        match self.current() {
            VerilogToken::IntLiteral | VerilogToken::SizedLiteral => {
                let span = self.current_span();
                self.advance();
                Expr::Literal { span }
            }
            VerilogToken::StringLiteral => {
                let span = self.current_span();
                self.advance();
                Expr::StringLiteral { span }
            }
            VerilogToken::LeftParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(VerilogToken::RightParen);
                let span = start.merge(self.prev_span());
                Expr::Paren {
                    inner: Box::new(inner),
                    span,
                }
            }
            VerilogToken::LeftBrace => self.parse_concat_or_replication(),
            VerilogToken::Identifier => self.parse_name_expr(),
            _ => {
                let span = self.current_span();
                self.error("expected expression");
                self.advance();
                Expr::Error(span)
            }
        }
    }

    /// Parses an identifier with an optional bit or range select.
    pub(crate) fn parse_name_expr(&mut self) -> Expr {
        let start = self.current_span();
        let name = self.expect_ident();

        if !self.at(VerilogToken::LeftBracket) {
            return Expr::Identifier { name, span: start };
        }

        self.advance(); // eat [
        let first = self.parse_expr();

        if self.eat(VerilogToken::Colon) {
            let lsb = self.parse_expr();
            self.expect(VerilogToken::RightBracket);
            let span = start.merge(self.prev_span());
            Expr::RangeSelect {
                name,
                msb: Box::new(first),
                lsb: Box::new(lsb),
                span,
            }
        } else {
            self.expect(VerilogToken::RightBracket);
            let span = start.merge(self.prev_span());
            Expr::BitSelect {
                name,
                index: Box::new(first),
                span,
            }
        }
    }

    /// Parses a concatenation `{a, b}` or replication `{3{a, b}}`.
    pub(crate) fn parse_concat_or_replication(&mut self) -> Expr {
        let start = self.current_span();
        self.expect(VerilogToken::LeftBrace);

        if self.at(VerilogToken::RightBrace) {
            self.advance();
            self.error("empty concatenation");
            return Expr::Error(start);
        }

        let first = self.parse_expr();

        // Replication: {count{elem, ...}}
        if self.at(VerilogToken::LeftBrace) {
            self.advance();
            let mut elements = Vec::new();
            elements.push(self.parse_expr());
            while self.eat(VerilogToken::Comma) {
                elements.push(self.parse_expr());
            }
            self.expect(VerilogToken::RightBrace);
            self.expect(VerilogToken::RightBrace);
            let span = start.merge(self.prev_span());
            return Expr::Replication {
                count: Box::new(first),
                elements,
                span,
            };
        }

        let mut elements = vec![first];
        while self.eat(VerilogToken::Comma) {
            elements.push(self.parse_expr());
        }
        self.expect(VerilogToken::RightBrace);
        let span = start.merge(self.prev_span());
        Expr::Concat { elements, span }
    }

    /// Parses an assignment target: an identifier with optional select, or a
    /// concatenation. Stops before `=` / `<=` so the statement parser can
    /// read them as assignment operators.
    pub(crate) fn parse_lvalue(&mut self) -> Expr {
        if self.at(VerilogToken::LeftBrace) {
            return self.parse_concat_or_replication();
        }
        self.parse_name_expr()
    }
}

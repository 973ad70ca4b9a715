//! Lowers the concrete syntax tree into the typed AST.
//!
//! The builder runs after parsing: every user-source problem has already
//! been reported, so `Error` nodes left by recovery are silently skipped and
//! missing pieces are filled with degraded placeholders. The only failure
//! mode here is an [`InternalError`] raised on a tree shape the parser
//! cannot legally produce: that is a bug in the parser or builder, never in
//! the user's source.

use crate::expr::{BinaryOp, Expression, Range, UnaryOp};
use crate::module::*;
use crate::stmt::{CaseItem, CaseKind, CaseStatement, Statement};
use veris_common::{InternalError, Interner, VerisResult};
use veris_diagnostics::DiagnosticSink;
use veris_source::FileId;
use veris_verilog::{cst, Comment};

/// Builds typed [`Module`]s from a parsed source unit.
///
/// `source` must be the text the unit was parsed from; literal texts are
/// extracted from it by span.
pub fn build_modules(
    unit: &cst::SourceUnit,
    source: &str,
    interner: &Interner,
) -> VerisResult<Vec<Module>> {
    let builder = Builder { source, interner };
    let mut modules = Vec::new();
    for item in &unit.items {
        match item {
            cst::SourceItem::Module(decl) => modules.push(builder.build_module(decl)?),
            // Recovery node: the parser already reported the problem.
            cst::SourceItem::Error(_) => {}
        }
    }
    Ok(modules)
}

/// Lexes, parses, and builds in one step.
///
/// Diagnostics land in `sink`; the returned modules reflect whatever could
/// be recovered.
pub fn parse_and_build(
    source: &str,
    file: FileId,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> VerisResult<(Vec<Module>, Vec<Comment>)> {
    let (unit, comments) = veris_verilog::parse_source(source, file, interner, sink);
    let modules = build_modules(&unit, source, interner)?;
    Ok((modules, comments))
}

struct Builder<'a> {
    source: &'a str,
    interner: &'a Interner,
}

impl Builder<'_> {
    fn name(&self, ident: veris_common::Ident) -> String {
        self.interner.resolve(ident).to_string()
    }

    fn text(&self, span: veris_source::Span) -> String {
        self.source[span.start as usize..span.end as usize].to_string()
    }

    fn build_module(&self, decl: &cst::ModuleDecl) -> VerisResult<Module> {
        let mut module = Module::new(self.name(decl.name));
        module.span = Some(decl.span);

        for port in &decl.ports {
            for name in &port.names {
                module.ports.push(PortDeclaration {
                    direction: build_direction(port.direction),
                    net: port.net_type.map(build_net_kind),
                    range: port.range.as_ref().map(|r| self.build_range(r)),
                    name: self.name(*name),
                    span: Some(port.span),
                });
            }
        }

        for param in &decl.params {
            module.parameters.push(self.build_parameter(param));
        }

        for item in &decl.items {
            self.build_module_item(item, &mut module)?;
        }

        Ok(module)
    }

    fn build_module_item(&self, item: &cst::ModuleItem, module: &mut Module) -> VerisResult<()> {
        match item {
            cst::ModuleItem::WireDecl(decl) => {
                module.declarations.push(Declaration::Wire {
                    range: decl.range.as_ref().map(|r| self.build_range(r)),
                    names: decl.names.iter().map(|n| self.name(*n)).collect(),
                    span: Some(decl.span),
                });
            }
            cst::ModuleItem::RegDecl(decl) => {
                self.build_reg_decl(decl, module);
            }
            cst::ModuleItem::IntegerDecl(decl) => {
                module.declarations.push(Declaration::Integer {
                    names: decl.names.iter().map(|n| self.name(*n)).collect(),
                    span: Some(decl.span),
                });
            }
            cst::ModuleItem::ParameterDecl(decl) | cst::ModuleItem::LocalparamDecl(decl) => {
                module.declarations.push(self.build_parameter(decl));
            }
            cst::ModuleItem::ContinuousAssign(assign) => {
                module.assigns.push(ContinuousAssign {
                    target: self.build_expr(&assign.target),
                    value: self.build_expr(&assign.value),
                    span: Some(assign.span),
                });
            }
            cst::ModuleItem::AlwaysBlock(block) => {
                if let Some(always) = self.build_always(block)? {
                    module.always_blocks.push(always);
                }
            }
            cst::ModuleItem::InitialBlock(block) => {
                if let Some(body) = self.build_statement(&block.body)? {
                    module.initial_blocks.push(InitialBlock {
                        body,
                        span: Some(block.span),
                    });
                }
            }
            cst::ModuleItem::Instantiation(inst) => {
                module.instances.push(Instance {
                    module_name: self.name(inst.module_name),
                    instance_name: self.name(inst.instance_name),
                    param_overrides: inst
                        .param_overrides
                        .iter()
                        .map(|c| self.build_connection(c))
                        .collect(),
                    connections: inst
                        .connections
                        .iter()
                        .map(|c| self.build_connection(c))
                        .collect(),
                    span: Some(inst.span),
                });
            }
            // Recovery node: already reported by the parser.
            cst::ModuleItem::Error(_) => {}
        }
        Ok(())
    }

    /// Splits a reg declaration so that each array-dimensioned name gets its
    /// own [`Declaration::Reg`]; consecutive plain names stay grouped.
    fn build_reg_decl(&self, decl: &cst::RegDecl, module: &mut Module) {
        let range = decl.range.as_ref().map(|r| self.build_range(r));
        let mut plain: Vec<String> = Vec::new();
        for name in &decl.names {
            match &name.array {
                None => plain.push(self.name(name.name)),
                Some(array) => {
                    if !plain.is_empty() {
                        module.declarations.push(Declaration::Reg {
                            range: range.clone(),
                            names: std::mem::take(&mut plain),
                            array: None,
                            span: Some(decl.span),
                        });
                    }
                    module.declarations.push(Declaration::Reg {
                        range: range.clone(),
                        names: vec![self.name(name.name)],
                        array: Some(self.build_range(array)),
                        span: Some(decl.span),
                    });
                }
            }
        }
        if !plain.is_empty() {
            module.declarations.push(Declaration::Reg {
                range,
                names: plain,
                array: None,
                span: Some(decl.span),
            });
        }
    }

    fn build_parameter(&self, decl: &cst::ParameterDecl) -> Declaration {
        let range = decl.range.as_ref().map(|r| self.build_range(r));
        let name = self.name(decl.name);
        // A parameter without a value already produced a parse diagnostic;
        // carry a zero so downstream passes see a complete declaration.
        let value = decl
            .value
            .as_ref()
            .map(|v| self.build_expr(v))
            .unwrap_or_else(|| Expression::number("0"));
        let span = Some(decl.span);
        if decl.local {
            Declaration::Localparam {
                range,
                name,
                value,
                span,
            }
        } else {
            Declaration::Parameter {
                range,
                name,
                value,
                span,
            }
        }
    }

    fn build_always(&self, block: &cst::AlwaysBlock) -> VerisResult<Option<AlwaysBlock>> {
        let cst::Statement::EventControl {
            sensitivity, body, ..
        } = &block.body
        else {
            // Recovery case (`always` without `@`): diagnosed by the parser.
            return Ok(None);
        };

        let sensitivity = match sensitivity {
            cst::SensitivityList::Star => Sensitivity::Star,
            cst::SensitivityList::List(items) => {
                if items.is_empty() {
                    return Err(InternalError::new(
                        "ast-builder",
                        "malformed CST: empty sensitivity list",
                    ));
                }
                Sensitivity::List(
                    items
                        .iter()
                        .map(|item| SensitivityItem {
                            signal: self.name(item.signal),
                            edge: item.edge.map(build_edge),
                        })
                        .collect(),
                )
            }
        };

        let kind = match &sensitivity {
            Sensitivity::Star => AlwaysKind::Combinational,
            Sensitivity::List(items) => {
                if items.iter().any(|item| item.edge.is_some()) {
                    AlwaysKind::Sequential
                } else {
                    AlwaysKind::Combinational
                }
            }
        };

        let body = self
            .build_statement(body)?
            .unwrap_or(Statement::BeginEnd {
                statements: Vec::new(),
                span: None,
            });

        Ok(Some(AlwaysBlock {
            kind,
            sensitivity,
            body,
            span: Some(block.span),
        }))
    }

    /// Builds a statement; `None` means the statement dissolved (null or
    /// recovery node).
    fn build_statement(&self, stmt: &cst::Statement) -> VerisResult<Option<Statement>> {
        let built = match stmt {
            cst::Statement::Blocking {
                target,
                value,
                span,
            } => Some(Statement::Blocking {
                target: self.build_expr(target),
                value: self.build_expr(value),
                span: Some(*span),
            }),
            cst::Statement::NonBlocking {
                target,
                value,
                span,
            } => Some(Statement::NonBlocking {
                target: self.build_expr(target),
                value: self.build_expr(value),
                span: Some(*span),
            }),
            cst::Statement::Block { stmts, span } => {
                let mut statements = Vec::new();
                for s in stmts {
                    if let Some(built) = self.build_statement(s)? {
                        statements.push(built);
                    }
                }
                Some(Statement::BeginEnd {
                    statements,
                    span: Some(*span),
                })
            }
            cst::Statement::If {
                condition,
                then_stmt,
                else_stmt,
                span,
            } => {
                let then_branch = self
                    .build_statement(then_stmt)?
                    .unwrap_or(Statement::BeginEnd {
                        statements: Vec::new(),
                        span: None,
                    });
                let else_branch = match else_stmt {
                    Some(e) => self.build_statement(e)?.map(Box::new),
                    None => None,
                };
                Some(Statement::If {
                    condition: self.build_expr(condition),
                    then_branch: Box::new(then_branch),
                    else_branch,
                    span: Some(*span),
                })
            }
            cst::Statement::Case {
                kind,
                selector,
                arms,
                span,
            } => {
                let mut items = Vec::new();
                for arm in arms {
                    items.push(self.build_case_arm(arm)?);
                }
                Some(Statement::Case(CaseStatement {
                    kind: build_case_kind(*kind),
                    selector: self.build_expr(selector),
                    items,
                    span: Some(*span),
                }))
            }
            cst::Statement::EventControl { .. } => {
                // The parser only produces event controls as always bodies.
                return Err(InternalError::new(
                    "ast-builder",
                    "malformed CST: nested event control statement",
                ));
            }
            cst::Statement::Null { .. } => None,
            cst::Statement::Error(_) => None,
        };
        Ok(built)
    }

    fn build_case_arm(&self, arm: &cst::CaseArm) -> VerisResult<CaseItem> {
        if arm.is_default && !arm.patterns.is_empty() {
            return Err(InternalError::new(
                "ast-builder",
                "malformed CST: default case arm carries patterns",
            ));
        }
        if !arm.is_default && arm.patterns.is_empty() {
            return Err(InternalError::new(
                "ast-builder",
                "malformed CST: case arm without patterns",
            ));
        }

        // One level of begin/end around the arm body flattens into the item's
        // statement list; the generator re-wraps multi-statement bodies.
        let body = match &arm.body {
            cst::Statement::Block { stmts, .. } => {
                let mut body = Vec::new();
                for s in stmts {
                    if let Some(built) = self.build_statement(s)? {
                        body.push(built);
                    }
                }
                body
            }
            other => self.build_statement(other)?.into_iter().collect(),
        };

        Ok(CaseItem {
            values: arm.patterns.iter().map(|p| self.build_expr(p)).collect(),
            is_default: arm.is_default,
            body,
            span: Some(arm.span),
        })
    }

    fn build_connection(&self, conn: &cst::Connection) -> Connection {
        Connection {
            formal: conn.formal.map(|f| self.name(f)),
            actual: conn.actual.as_ref().map(|a| self.build_expr(a)),
        }
    }

    fn build_range(&self, range: &cst::Range) -> Range {
        Range {
            msb: self.build_expr(&range.msb),
            lsb: self.build_expr(&range.lsb),
        }
    }

    fn build_expr(&self, expr: &cst::Expr) -> Expression {
        match expr {
            cst::Expr::Identifier { name, .. } => Expression::Identifier {
                name: self.name(*name),
            },
            cst::Expr::Literal { span } => Expression::Number {
                value: self.text(*span),
            },
            cst::Expr::StringLiteral { span } => Expression::StringLiteral {
                value: self.text(*span),
            },
            cst::Expr::BitSelect { name, index, .. } => Expression::BitSelect {
                signal: self.name(*name),
                index: Box::new(self.build_expr(index)),
            },
            cst::Expr::RangeSelect { name, msb, lsb, .. } => Expression::RangeSelect {
                signal: self.name(*name),
                msb: Box::new(self.build_expr(msb)),
                lsb: Box::new(self.build_expr(lsb)),
            },
            cst::Expr::Concat { elements, .. } => Expression::Concat {
                elements: elements.iter().map(|e| self.build_expr(e)).collect(),
            },
            cst::Expr::Replication {
                count, elements, ..
            } => Expression::Replication {
                count: Box::new(self.build_expr(count)),
                elements: elements.iter().map(|e| self.build_expr(e)).collect(),
            },
            cst::Expr::Unary { op, operand, .. } => Expression::Unary {
                op: build_unary_op(*op),
                operand: Box::new(self.build_expr(operand)),
            },
            cst::Expr::Binary {
                left, op, right, ..
            } => Expression::Binary {
                op: build_binary_op(*op),
                left: Box::new(self.build_expr(left)),
                right: Box::new(self.build_expr(right)),
            },
            cst::Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => Expression::Ternary {
                condition: Box::new(self.build_expr(condition)),
                then_expr: Box::new(self.build_expr(then_expr)),
                else_expr: Box::new(self.build_expr(else_expr)),
            },
            // Parentheses are surface syntax; the printer re-derives them
            // from precedence.
            cst::Expr::Paren { inner, .. } => self.build_expr(inner),
            // Recovery node: degrade to a zero so downstream passes see a
            // complete expression.
            cst::Expr::Error(_) => Expression::number("0"),
        }
    }
}

fn build_direction(dir: cst::Direction) -> Direction {
    match dir {
        cst::Direction::Input => Direction::Input,
        cst::Direction::Output => Direction::Output,
        cst::Direction::Inout => Direction::Inout,
    }
}

fn build_net_kind(net: cst::NetType) -> NetKind {
    match net {
        cst::NetType::Wire => NetKind::Wire,
        cst::NetType::Reg => NetKind::Reg,
    }
}

fn build_edge(edge: cst::EdgeKind) -> Edge {
    match edge {
        cst::EdgeKind::Posedge => Edge::Posedge,
        cst::EdgeKind::Negedge => Edge::Negedge,
    }
}

fn build_case_kind(kind: cst::CaseKind) -> CaseKind {
    match kind {
        cst::CaseKind::Case => CaseKind::Case,
        cst::CaseKind::Casex => CaseKind::Casex,
        cst::CaseKind::Casez => CaseKind::Casez,
    }
}

fn build_unary_op(op: cst::UnaryOp) -> UnaryOp {
    match op {
        cst::UnaryOp::Plus => UnaryOp::Plus,
        cst::UnaryOp::Minus => UnaryOp::Minus,
        cst::UnaryOp::LogNot => UnaryOp::LogNot,
        cst::UnaryOp::BitNot => UnaryOp::BitNot,
    }
}

fn build_binary_op(op: cst::BinaryOp) -> BinaryOp {
    match op {
        cst::BinaryOp::Add => BinaryOp::Add,
        cst::BinaryOp::Sub => BinaryOp::Sub,
        cst::BinaryOp::Mul => BinaryOp::Mul,
        cst::BinaryOp::Div => BinaryOp::Div,
        cst::BinaryOp::Mod => BinaryOp::Mod,
        cst::BinaryOp::Pow => BinaryOp::Pow,
        cst::BinaryOp::Eq => BinaryOp::Eq,
        cst::BinaryOp::Neq => BinaryOp::Neq,
        cst::BinaryOp::CaseEq => BinaryOp::CaseEq,
        cst::BinaryOp::CaseNeq => BinaryOp::CaseNeq,
        cst::BinaryOp::Lt => BinaryOp::Lt,
        cst::BinaryOp::Le => BinaryOp::Le,
        cst::BinaryOp::Gt => BinaryOp::Gt,
        cst::BinaryOp::Ge => BinaryOp::Ge,
        cst::BinaryOp::LogAnd => BinaryOp::LogAnd,
        cst::BinaryOp::LogOr => BinaryOp::LogOr,
        cst::BinaryOp::BitAnd => BinaryOp::BitAnd,
        cst::BinaryOp::BitOr => BinaryOp::BitOr,
        cst::BinaryOp::BitXor => BinaryOp::BitXor,
        cst::BinaryOp::Shl => BinaryOp::Shl,
        cst::BinaryOp::Shr => BinaryOp::Shr,
        cst::BinaryOp::AShr => BinaryOp::AShr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_diagnostics::DiagnosticSink;

    fn build(source: &str) -> Vec<Module> {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (modules, _) = parse_and_build(source, FileId::from_raw(0), &interner, &sink)
            .expect("builder should not fail on parser output");
        assert!(
            !sink.has_errors(),
            "unexpected errors: {:?}",
            sink.diagnostics()
        );
        modules
    }

    fn build_lossy(source: &str) -> Vec<Module> {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let (modules, _) = parse_and_build(source, FileId::from_raw(0), &interner, &sink)
            .expect("builder should not fail on parser output");
        modules
    }

    #[test]
    fn empty_module() {
        let modules = build("module empty; endmodule");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "empty");
        assert!(modules[0].ports.is_empty());
        assert!(modules[0].declarations.is_empty());
    }

    #[test]
    fn ports_flattened_per_name() {
        let modules = build("module m(input a, b, output reg [7:0] q); endmodule");
        let m = &modules[0];
        assert_eq!(m.ports.len(), 3);
        assert_eq!(m.ports[0].name, "a");
        assert_eq!(m.ports[1].name, "b");
        assert_eq!(m.ports[1].direction, Direction::Input);
        assert_eq!(m.ports[2].name, "q");
        assert_eq!(m.ports[2].net, Some(NetKind::Reg));
        assert!(m.ports[2].range.is_some());
    }

    #[test]
    fn items_partitioned() {
        let modules = build(
            "module m(input clk);
                wire w;
                reg r;
                localparam A = 1;
                assign w = r;
                always @(posedge clk) r <= w;
                initial r = 0;
            endmodule",
        );
        let m = &modules[0];
        assert_eq!(m.declarations.len(), 3);
        assert_eq!(m.assigns.len(), 1);
        assert_eq!(m.always_blocks.len(), 1);
        assert_eq!(m.initial_blocks.len(), 1);
    }

    #[test]
    fn always_classification() {
        let modules = build(
            "module m(input clk, d, output reg q, y);
                always @(posedge clk) q <= d;
                always @(*) y = d;
                always @(d) y = d;
            endmodule",
        );
        let m = &modules[0];
        assert_eq!(m.always_blocks[0].kind, AlwaysKind::Sequential);
        assert_eq!(m.always_blocks[1].kind, AlwaysKind::Combinational);
        assert_eq!(m.always_blocks[2].kind, AlwaysKind::Combinational);
    }

    #[test]
    fn number_text_verbatim() {
        let modules = build("module m; localparam [7:0] X = 8'hFF; endmodule");
        match &modules[0].declarations[0] {
            Declaration::Localparam { value, .. } => {
                assert_eq!(value, &Expression::number("8'hFF"));
            }
            other => panic!("expected localparam, got {other:?}"),
        }
    }

    #[test]
    fn parens_dropped() {
        let modules = build("module m(input a, b, c, output w); assign w = (a + b) * c; endmodule");
        match &modules[0].assigns[0].value {
            Expression::Binary { op, left, .. } => {
                assert_eq!(*op, BinaryOp::Mul);
                assert!(matches!(**left, Expression::Binary { .. }));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn case_arm_body_flattened() {
        let modules = build(
            "module m(input [1:0] s, output reg [1:0] n);
                always @(*) begin
                    case (s)
                        2'b00: begin n = 2'b01; n = 2'b10; end
                        2'b01: n = 2'b00;
                        default: n = 2'b00;
                    endcase
                end
            endmodule",
        );
        let m = &modules[0];
        let body = &m.always_blocks[0].body;
        let Statement::BeginEnd { statements, .. } = body else {
            panic!("expected begin/end, got {body:?}");
        };
        let Statement::Case(case) = &statements[0] else {
            panic!("expected case");
        };
        assert_eq!(case.items[0].body.len(), 2);
        assert_eq!(case.items[1].body.len(), 1);
        assert!(case.items[2].is_default);
    }

    #[test]
    fn reg_array_split() {
        let modules = build("module m; reg [7:0] a, mem [0:255], b; endmodule");
        let decls = &modules[0].declarations;
        assert_eq!(decls.len(), 3);
        assert!(matches!(
            &decls[0],
            Declaration::Reg { names, array: None, .. } if names == &vec!["a".to_string()]
        ));
        assert!(matches!(
            &decls[1],
            Declaration::Reg { array: Some(_), .. }
        ));
        assert!(matches!(
            &decls[2],
            Declaration::Reg { names, array: None, .. } if names == &vec!["b".to_string()]
        ));
    }

    #[test]
    fn instance_connections() {
        let modules = build(
            "module m(input clk);
                counter #(.WIDTH(8)) u1 (.clk(clk), .q());
            endmodule",
        );
        let inst = &modules[0].instances[0];
        assert_eq!(inst.module_name, "counter");
        assert_eq!(inst.instance_name, "u1");
        assert_eq!(inst.param_overrides.len(), 1);
        assert_eq!(inst.connections.len(), 2);
        assert!(inst.connections[1].actual.is_none());
    }

    #[test]
    fn error_items_skipped() {
        let modules = build_lossy("module m; bogus!!; wire ok; endmodule");
        // The error item dissolves; the good declaration survives.
        assert_eq!(modules[0].declarations.len(), 1);
    }

    #[test]
    fn module_span_present_and_positions_positive() {
        let modules = build("module m; endmodule");
        let span = modules[0].span.expect("span");
        assert_eq!(span.start, 0);
        assert!(span.end > span.start);
    }
}

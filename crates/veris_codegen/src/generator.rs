//! AST → formatted Verilog text.
//!
//! Emission is a straight walk over the tree writing into a `String`. The
//! printer re-derives parentheses from operator precedence, so the output
//! re-parses to a structurally equal AST regardless of how the input was
//! originally written.

use crate::options::{GenOptions, Indent};
use std::fmt::Write;
use veris_ast::{
    AlwaysBlock, CaseItem, CaseStatement, Connection, Declaration, Direction, Edge, Expression,
    Instance, Module, NetKind, Range, Sensitivity, Statement, UnaryOp,
};
use veris_verilog::Comment;

/// Generates formatted Verilog text for a module.
pub fn generate(module: &Module, opts: &GenOptions) -> String {
    generate_with_comments(module, &[], opts)
}

/// Renders a single expression as Verilog text, with parentheses derived
/// from operator precedence.
pub fn expression_text(expr: &Expression) -> String {
    let gen = Generator {
        opts: &GenOptions {
            preserve_comments: false,
            ..GenOptions::default()
        },
        comments: &[],
        emitted_comments: std::cell::RefCell::new(std::collections::HashSet::new()),
    };
    gen.expr(expr)
}

/// Generates formatted Verilog text, re-emitting `comments` above the
/// nearest following item when `opts.preserve_comments` is set.
pub fn generate_with_comments(module: &Module, comments: &[Comment], opts: &GenOptions) -> String {
    let gen = Generator {
        opts,
        comments: if opts.preserve_comments {
            comments
        } else {
            &[]
        },
        emitted_comments: std::cell::RefCell::new(std::collections::HashSet::new()),
    };
    gen.emit_module(module)
}

struct Generator<'a> {
    opts: &'a GenOptions,
    comments: &'a [Comment],
    /// Indices of comments already re-emitted; split declarations can share
    /// a source span and must not duplicate their comment.
    emitted_comments: std::cell::RefCell<std::collections::HashSet<usize>>,
}

impl Generator<'_> {
    fn ind(&self, level: usize) -> String {
        self.opts.indent.at(level)
    }

    // ========================================================================
    // Module layout
    // ========================================================================

    fn emit_module(&self, module: &Module) -> String {
        let mut out = String::new();

        self.emit_comments_before(module.span.map(|s| s.start), module, &mut out, 0);
        self.emit_header(module, &mut out);

        let mut sections: Vec<String> = Vec::new();

        if !module.declarations.is_empty() {
            let mut section = String::new();
            self.emit_declarations(module, &mut section);
            sections.push(section);
        }

        if !module.assigns.is_empty() {
            let mut section = String::new();
            for assign in &module.assigns {
                self.emit_item_comments(assign.span, module, &mut section, 1);
                let _ = writeln!(
                    section,
                    "{}assign {} = {};",
                    self.ind(1),
                    self.expr(&assign.target),
                    self.expr(&assign.value)
                );
            }
            sections.push(section);
        }

        for always in &module.always_blocks {
            let mut section = String::new();
            self.emit_item_comments(always.span, module, &mut section, 1);
            self.emit_always(always, &mut section);
            sections.push(section);
        }

        for initial in &module.initial_blocks {
            let mut section = String::new();
            self.emit_item_comments(initial.span, module, &mut section, 1);
            self.emit_initial(initial, &mut section);
            sections.push(section);
        }

        if !module.instances.is_empty() {
            let mut section = String::new();
            for inst in &module.instances {
                self.emit_item_comments(inst.span, module, &mut section, 1);
                self.emit_instance(inst, &mut section);
            }
            sections.push(section);
        }

        if !sections.is_empty() {
            out.push('\n');
            out.push_str(&sections.join("\n"));
        }

        self.emit_trailing_comments(module, &mut out);
        out.push_str("endmodule\n");
        out
    }

    fn emit_header(&self, module: &Module, out: &mut String) {
        let has_params = !module.parameters.is_empty();
        let has_ports = !module.ports.is_empty();

        if !has_params && !has_ports {
            let _ = writeln!(out, "module {};", module.name);
            return;
        }

        // A short, unaligned, parameterless header stays on one line.
        if !has_params && !self.opts.align_ports {
            let inline = format!(
                "module {}({});",
                module.name,
                module
                    .ports
                    .iter()
                    .map(|p| self.port_text(p, 0))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            if inline.len() <= self.opts.line_width as usize {
                let _ = writeln!(out, "{inline}");
                return;
            }
        }

        let _ = write!(out, "module {}", module.name);

        if has_params {
            let _ = writeln!(out, " #(");
            for (i, param) in module.parameters.iter().enumerate() {
                let text = self.parameter_text(param);
                let comma = if i + 1 < module.parameters.len() { "," } else { "" };
                let _ = writeln!(out, "{}{}{}", self.ind(1), text, comma);
            }
            let _ = write!(out, ")");
        }

        if has_ports {
            if has_params {
                let _ = writeln!(out, " (");
            } else {
                let _ = writeln!(out, "(");
            }
            let name_col = if self.opts.align_ports {
                module
                    .ports
                    .iter()
                    .map(|p| self.port_prefix(p).len())
                    .max()
                    .unwrap_or(0)
            } else {
                0
            };
            for (i, port) in module.ports.iter().enumerate() {
                let comma = if i + 1 < module.ports.len() { "," } else { "" };
                let _ = writeln!(out, "{}{}{}", self.ind(1), self.port_text(port, name_col), comma);
            }
            let _ = writeln!(out, ");");
        } else {
            let _ = writeln!(out, ";");
        }
    }

    /// Everything before the port name: `input wire [7:0] `.
    fn port_prefix(&self, port: &veris_ast::PortDeclaration) -> String {
        let mut text = match port.direction {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Inout => "inout",
        }
        .to_string();
        match port.net {
            Some(NetKind::Wire) => text.push_str(" wire"),
            Some(NetKind::Reg) => text.push_str(" reg"),
            None => {}
        }
        if let Some(range) = &port.range {
            let _ = write!(text, " {}", self.range_text(range));
        }
        text.push(' ');
        text
    }

    fn port_text(&self, port: &veris_ast::PortDeclaration, name_col: usize) -> String {
        let mut prefix = self.port_prefix(port);
        while prefix.len() < name_col {
            prefix.push(' ');
        }
        format!("{}{}", prefix, port.name)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn emit_declarations(&self, module: &Module, out: &mut String) {
        let name_col = if self.opts.align_decls {
            module
                .declarations
                .iter()
                .filter_map(|d| self.decl_prefix(d))
                .map(|p| p.len())
                .max()
                .unwrap_or(0)
        } else {
            0
        };

        for decl in &module.declarations {
            self.emit_item_comments(decl.span(), module, out, 1);
            let _ = writeln!(out, "{}{}", self.ind(1), self.declaration_text(decl, name_col));
        }
    }

    /// The alignable prefix of a wire/reg declaration: `wire [7:0] `.
    fn decl_prefix(&self, decl: &Declaration) -> Option<String> {
        let (keyword, range) = match decl {
            Declaration::Wire { range, .. } => ("wire", range),
            Declaration::Reg { range, .. } => ("reg", range),
            _ => return None,
        };
        let mut text = keyword.to_string();
        if let Some(range) = range {
            let _ = write!(text, " {}", self.range_text(range));
        }
        text.push(' ');
        Some(text)
    }

    fn declaration_text(&self, decl: &Declaration, name_col: usize) -> String {
        match decl {
            Declaration::Wire { names, .. } | Declaration::Reg { names, array: None, .. } => {
                let mut prefix = self.decl_prefix(decl).unwrap();
                while prefix.len() < name_col {
                    prefix.push(' ');
                }
                format!("{}{};", prefix, names.join(", "))
            }
            Declaration::Reg { names, array: Some(array), .. } => {
                let mut prefix = self.decl_prefix(decl).unwrap();
                while prefix.len() < name_col {
                    prefix.push(' ');
                }
                format!("{}{} {};", prefix, names.join(", "), self.range_text(array))
            }
            Declaration::Integer { names, .. } => format!("integer {};", names.join(", ")),
            Declaration::Parameter { .. } | Declaration::Localparam { .. } => {
                format!("{};", self.parameter_text(decl))
            }
        }
    }

    /// Parameter text without the trailing semicolon (shared with headers).
    fn parameter_text(&self, decl: &Declaration) -> String {
        match decl {
            Declaration::Parameter { range, name, value, .. } => match range {
                Some(r) => format!("parameter {} {} = {}", self.range_text(r), name, self.expr(value)),
                None => format!("parameter {} = {}", name, self.expr(value)),
            },
            Declaration::Localparam { range, name, value, .. } => match range {
                Some(r) => {
                    format!("localparam {} {} = {}", self.range_text(r), name, self.expr(value))
                }
                None => format!("localparam {} = {}", name, self.expr(value)),
            },
            other => unreachable!("not a parameter declaration: {other:?}"),
        }
    }

    // ========================================================================
    // Procedural blocks
    // ========================================================================

    fn emit_always(&self, always: &AlwaysBlock, out: &mut String) {
        let sensitivity = match &always.sensitivity {
            Sensitivity::Star => "*".to_string(),
            Sensitivity::List(items) => items
                .iter()
                .map(|item| match item.edge {
                    Some(Edge::Posedge) => format!("posedge {}", item.signal),
                    Some(Edge::Negedge) => format!("negedge {}", item.signal),
                    None => item.signal.clone(),
                })
                .collect::<Vec<_>>()
                .join(" or "),
        };
        let header = format!("{}always @({})", self.ind(1), sensitivity);
        self.emit_headed_statement(&header, &always.body, 1, out);
    }

    fn emit_initial(&self, initial: &veris_ast::InitialBlock, out: &mut String) {
        let header = format!("{}initial", self.ind(1));
        self.emit_headed_statement(&header, &initial.body, 1, out);
    }

    /// Emits `header stmt`: `header begin ... end` for blocks, otherwise the
    /// statement indented on the following line.
    fn emit_headed_statement(&self, header: &str, stmt: &Statement, level: usize, out: &mut String) {
        match stmt {
            Statement::BeginEnd { statements, .. } => {
                let _ = writeln!(out, "{header} begin");
                for s in statements {
                    self.emit_statement(s, level + 1, out);
                }
                let _ = writeln!(out, "{}end", self.ind(level));
            }
            other => {
                let _ = writeln!(out, "{header}");
                self.emit_statement(other, level + 1, out);
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn emit_statement(&self, stmt: &Statement, level: usize, out: &mut String) {
        match stmt {
            Statement::Blocking { target, value, .. } => {
                let _ = writeln!(
                    out,
                    "{}{} = {};",
                    self.ind(level),
                    self.expr(target),
                    self.expr(value)
                );
            }
            Statement::NonBlocking { target, value, .. } => {
                let _ = writeln!(
                    out,
                    "{}{} <= {};",
                    self.ind(level),
                    self.expr(target),
                    self.expr(value)
                );
            }
            Statement::BeginEnd { statements, .. } => {
                let _ = writeln!(out, "{}begin", self.ind(level));
                for s in statements {
                    self.emit_statement(s, level + 1, out);
                }
                let _ = writeln!(out, "{}end", self.ind(level));
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let lead = format!("{}if", self.ind(level));
                self.emit_if(&lead, condition, then_branch, else_branch.as_deref(), level, out);
            }
            Statement::Case(case) => self.emit_case(case, level, out),
        }
    }

    /// Emits an if/else chain. `lead` already contains the indentation and
    /// any `end else ` prefix from an enclosing chain.
    fn emit_if(
        &self,
        lead: &str,
        condition: &Expression,
        then_branch: &Statement,
        else_branch: Option<&Statement>,
        level: usize,
        out: &mut String,
    ) {
        let then_is_block = matches!(then_branch, Statement::BeginEnd { .. });

        if then_is_block {
            let _ = writeln!(out, "{lead} ({}) begin", self.expr(condition));
            if let Statement::BeginEnd { statements, .. } = then_branch {
                for s in statements {
                    self.emit_statement(s, level + 1, out);
                }
            }
            match else_branch {
                None => {
                    let _ = writeln!(out, "{}end", self.ind(level));
                }
                Some(els) => {
                    let lead = format!("{}end else", self.ind(level));
                    self.emit_else(&lead, els, level, out);
                }
            }
        } else {
            let _ = writeln!(out, "{lead} ({})", self.expr(condition));
            self.emit_statement(then_branch, level + 1, out);
            if let Some(els) = else_branch {
                let lead = format!("{}else", self.ind(level));
                self.emit_else(&lead, els, level, out);
            }
        }
    }

    fn emit_else(&self, lead: &str, els: &Statement, level: usize, out: &mut String) {
        match els {
            // `end else if (...) begin` collapse
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let lead = format!("{lead} if");
                self.emit_if(&lead, condition, then_branch, else_branch.as_deref(), level, out);
            }
            Statement::BeginEnd { statements, .. } => {
                let _ = writeln!(out, "{lead} begin");
                for s in statements {
                    self.emit_statement(s, level + 1, out);
                }
                let _ = writeln!(out, "{}end", self.ind(level));
            }
            other => {
                let _ = writeln!(out, "{lead}");
                self.emit_statement(other, level + 1, out);
            }
        }
    }

    fn emit_case(&self, case: &CaseStatement, level: usize, out: &mut String) {
        let _ = writeln!(
            out,
            "{}{} ({})",
            self.ind(level),
            case.kind.keyword(),
            self.expr(&case.selector)
        );
        for item in &case.items {
            self.emit_case_item(item, level + 1, out);
        }
        let _ = writeln!(out, "{}endcase", self.ind(level));
    }

    fn emit_case_item(&self, item: &CaseItem, level: usize, out: &mut String) {
        let label = if item.is_default {
            "default".to_string()
        } else {
            item.values
                .iter()
                .map(|v| self.expr(v))
                .collect::<Vec<_>>()
                .join(", ")
        };

        match item.body.as_slice() {
            [] => {
                let _ = writeln!(out, "{}{}: ;", self.ind(level), label);
            }
            [single @ (Statement::Blocking { .. } | Statement::NonBlocking { .. })] => {
                let mut line = String::new();
                self.emit_statement(single, 0, &mut line);
                let _ = write!(out, "{}{}: {}", self.ind(level), label, line);
            }
            [single] => {
                let _ = writeln!(out, "{}{}:", self.ind(level), label);
                self.emit_statement(single, level + 1, out);
            }
            many => {
                let _ = writeln!(out, "{}{}: begin", self.ind(level), label);
                for s in many {
                    self.emit_statement(s, level + 1, out);
                }
                let _ = writeln!(out, "{}end", self.ind(level));
            }
        }
    }

    // ========================================================================
    // Instances
    // ========================================================================

    fn emit_instance(&self, inst: &Instance, out: &mut String) {
        let mut line = format!("{}{}", self.ind(1), inst.module_name);
        if !inst.param_overrides.is_empty() {
            let _ = write!(line, " #({})", self.connections_text(&inst.param_overrides));
        }
        let _ = write!(
            line,
            " {} ({});",
            inst.instance_name,
            self.connections_text(&inst.connections)
        );
        let _ = writeln!(out, "{line}");
    }

    fn connections_text(&self, connections: &[Connection]) -> String {
        connections
            .iter()
            .map(|conn| match (&conn.formal, &conn.actual) {
                (Some(formal), Some(actual)) => format!(".{}({})", formal, self.expr(actual)),
                (Some(formal), None) => format!(".{formal}()"),
                (None, Some(actual)) => self.expr(actual),
                (None, None) => String::new(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn range_text(&self, range: &Range) -> String {
        format!("[{}:{}]", self.expr(&range.msb), self.expr(&range.lsb))
    }

    fn expr(&self, expr: &Expression) -> String {
        self.expr_prec(expr, 0)
    }

    /// Precedence of an expression for parenthesization: ternary is 0,
    /// binary is its operator's strength, atoms bind tightest.
    fn precedence_of(expr: &Expression) -> u8 {
        match expr {
            Expression::Ternary { .. } => 0,
            Expression::Binary { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }

    fn expr_prec(&self, expr: &Expression, min_prec: u8) -> String {
        let text = match expr {
            Expression::Identifier { name } => name.clone(),
            Expression::Number { value } => value.clone(),
            Expression::StringLiteral { value } => value.clone(),
            Expression::BitSelect { signal, index } => {
                format!("{}[{}]", signal, self.expr(index))
            }
            Expression::RangeSelect { signal, msb, lsb } => {
                format!("{}[{}:{}]", signal, self.expr(msb), self.expr(lsb))
            }
            Expression::Concat { elements } => format!(
                "{{{}}}",
                elements
                    .iter()
                    .map(|e| self.expr(e))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Expression::Replication { count, elements } => format!(
                "{{{}{{{}}}}}",
                self.expr(count),
                elements
                    .iter()
                    .map(|e| self.expr(e))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Expression::Unary { op, operand } => {
                let needs_parens = matches!(
                    **operand,
                    Expression::Binary { .. } | Expression::Ternary { .. }
                );
                // `- -x` must not fuse into a decrement-looking `--x`.
                let space = if matches!(
                    (op, operand.as_ref()),
                    (UnaryOp::Minus, Expression::Unary { op: UnaryOp::Minus, .. })
                        | (UnaryOp::Plus, Expression::Unary { op: UnaryOp::Plus, .. })
                ) {
                    " "
                } else {
                    ""
                };
                if needs_parens {
                    format!("{}({})", op.symbol(), self.expr(operand))
                } else {
                    format!("{}{}{}", op.symbol(), space, self.expr_prec(operand, u8::MAX))
                }
            }
            Expression::Binary { op, left, right } => {
                let p = op.precedence();
                let right_assoc = matches!(op, veris_ast::BinaryOp::Pow);
                let left_min = if right_assoc { p + 1 } else { p };
                let right_min = if right_assoc { p } else { p + 1 };
                format!(
                    "{} {} {}",
                    self.expr_prec(left, left_min),
                    op.symbol(),
                    self.expr_prec(right, right_min)
                )
            }
            Expression::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                format!(
                    "{} ? {} : {}",
                    self.expr_prec(condition, 1),
                    self.expr(then_expr),
                    self.expr(else_expr)
                )
            }
        };

        if Self::precedence_of(expr) < min_prec {
            format!("({text})")
        } else {
            text
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Where a comment is re-emitted: above the module header, above the
    /// item starting at the given offset, or just before `endmodule`.
    fn anchor_of(&self, comment: &Comment, module: &Module) -> CommentAnchor {
        if let Some(span) = module.span {
            if comment.span.start < span.start {
                return CommentAnchor::Header;
            }
        }
        match self.nearest_item_start(comment.span.start, module) {
            Some(start) => CommentAnchor::Item(start),
            None => CommentAnchor::Trailing,
        }
    }

    /// Comments that precede the module header itself.
    fn emit_comments_before(
        &self,
        header_start: Option<u32>,
        module: &Module,
        out: &mut String,
        level: usize,
    ) {
        if header_start.is_none() {
            return;
        }
        for (i, comment) in self.comments.iter().enumerate() {
            if self.anchor_of(comment, module) == CommentAnchor::Header
                && self.emitted_comments.borrow_mut().insert(i)
            {
                let _ = writeln!(out, "{}{}", self.ind(level), comment.text);
            }
        }
    }

    /// Comments whose nearest following item (by source position) is `span`.
    fn emit_item_comments(
        &self,
        span: Option<veris_source::Span>,
        module: &Module,
        out: &mut String,
        level: usize,
    ) {
        let Some(span) = span else { return };
        for (i, comment) in self.comments.iter().enumerate() {
            if self.anchor_of(comment, module) == CommentAnchor::Item(span.start)
                && self.emitted_comments.borrow_mut().insert(i)
            {
                let _ = writeln!(out, "{}{}", self.ind(level), comment.text);
            }
        }
    }

    /// Comments positioned after every item: they precede `endmodule`.
    fn emit_trailing_comments(&self, module: &Module, out: &mut String) {
        let mut emitted = false;
        for (i, comment) in self.comments.iter().enumerate() {
            if self.anchor_of(comment, module) == CommentAnchor::Trailing
                && self.emitted_comments.borrow_mut().insert(i)
            {
                if !emitted {
                    out.push('\n');
                    emitted = true;
                }
                let _ = writeln!(out, "{}{}", self.ind(1), comment.text);
            }
        }
    }

    /// The start offset of the first item at or after `pos`.
    fn nearest_item_start(&self, pos: u32, module: &Module) -> Option<u32> {
        let mut starts: Vec<u32> = Vec::new();
        for decl in &module.declarations {
            starts.extend(decl.span().map(|s| s.start));
        }
        starts.extend(module.assigns.iter().filter_map(|a| a.span).map(|s| s.start));
        starts.extend(module.always_blocks.iter().filter_map(|a| a.span).map(|s| s.start));
        starts.extend(module.initial_blocks.iter().filter_map(|i| i.span).map(|s| s.start));
        starts.extend(module.instances.iter().filter_map(|i| i.span).map(|s| s.start));
        starts.into_iter().filter(|s| *s >= pos).min()
    }
}

#[derive(PartialEq, Eq)]
enum CommentAnchor {
    Header,
    Item(u32),
    Trailing,
}

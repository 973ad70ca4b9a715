//! AST traversal helpers used by multiple lint rules.
//!
//! These functions walk statement and expression trees to collect signal
//! usage information needed for checks like undriven signals, multiple
//! drivers, and assignment-style rules. Bit and range selects count as
//! references to the underlying name.

use std::collections::HashSet;
use veris_ast::{Expression, Module, Statement};

/// Collects every name referenced (read) in an expression tree.
///
/// The base name of a bit/range select is included, as are index and range
/// sub-expressions.
pub fn collect_expr_names(expr: &Expression, out: &mut HashSet<String>) {
    match expr {
        Expression::Identifier { name } => {
            out.insert(name.clone());
        }
        Expression::Number { .. } | Expression::StringLiteral { .. } => {}
        Expression::Binary { left, right, .. } => {
            collect_expr_names(left, out);
            collect_expr_names(right, out);
        }
        Expression::Unary { operand, .. } => collect_expr_names(operand, out),
        Expression::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            collect_expr_names(condition, out);
            collect_expr_names(then_expr, out);
            collect_expr_names(else_expr, out);
        }
        Expression::Concat { elements } => {
            for e in elements {
                collect_expr_names(e, out);
            }
        }
        Expression::Replication { count, elements } => {
            collect_expr_names(count, out);
            for e in elements {
                collect_expr_names(e, out);
            }
        }
        Expression::BitSelect { signal, index } => {
            out.insert(signal.clone());
            collect_expr_names(index, out);
        }
        Expression::RangeSelect { signal, msb, lsb } => {
            out.insert(signal.clone());
            collect_expr_names(msb, out);
            collect_expr_names(lsb, out);
        }
    }
}

/// The base names assigned by a target expression.
///
/// A plain identifier or a select targets its base name; a concatenation
/// target assigns every element.
pub fn collect_target_names(target: &Expression, out: &mut HashSet<String>) {
    match target {
        Expression::Identifier { name } => {
            out.insert(name.clone());
        }
        Expression::BitSelect { signal, .. } | Expression::RangeSelect { signal, .. } => {
            out.insert(signal.clone());
        }
        Expression::Concat { elements } => {
            for e in elements {
                collect_target_names(e, out);
            }
        }
        _ => {}
    }
}

/// Collects every name assigned anywhere in a statement tree.
///
/// Recurses through if branches, case arms, and begin/end blocks.
pub fn collect_written_names(stmt: &Statement, out: &mut HashSet<String>) {
    match stmt {
        Statement::Blocking { target, .. } | Statement::NonBlocking { target, .. } => {
            collect_target_names(target, out);
        }
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect_written_names(then_branch, out);
            if let Some(e) = else_branch {
                collect_written_names(e, out);
            }
        }
        Statement::Case(case) => {
            for item in &case.items {
                for s in &item.body {
                    collect_written_names(s, out);
                }
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                collect_written_names(s, out);
            }
        }
    }
}

/// Visits every assignment in a statement tree, in traversal order.
///
/// The callback receives the assignment statement itself; distinguish
/// blocking from non-blocking by matching on the variant.
pub fn for_each_assignment<'a>(stmt: &'a Statement, f: &mut impl FnMut(&'a Statement)) {
    match stmt {
        Statement::Blocking { .. } | Statement::NonBlocking { .. } => f(stmt),
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            for_each_assignment(then_branch, f);
            if let Some(e) = else_branch {
                for_each_assignment(e, f);
            }
        }
        Statement::Case(case) => {
            for item in &case.items {
                for s in &item.body {
                    for_each_assignment(s, f);
                }
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                for_each_assignment(s, f);
            }
        }
    }
}

/// Visits every case statement in a statement tree, in traversal order.
pub fn for_each_case<'a>(
    stmt: &'a Statement,
    f: &mut impl FnMut(&'a veris_ast::CaseStatement),
) {
    match stmt {
        Statement::Blocking { .. } | Statement::NonBlocking { .. } => {}
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            for_each_case(then_branch, f);
            if let Some(e) = else_branch {
                for_each_case(e, f);
            }
        }
        Statement::Case(case) => {
            f(case);
            for item in &case.items {
                for s in &item.body {
                    for_each_case(s, f);
                }
            }
        }
        Statement::BeginEnd { statements, .. } => {
            for s in statements {
                for_each_case(s, f);
            }
        }
    }
}

/// All names a module introduces: ports, declarations, and parameters.
pub fn declared_names(module: &Module) -> HashSet<String> {
    let mut names: HashSet<String> = module.ports.iter().map(|p| p.name.clone()).collect();
    for decl in module.parameters.iter().chain(module.declarations.iter()) {
        for name in decl.declared_names() {
            names.insert(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_ast::{BinaryOp, Expression};

    #[test]
    fn expr_names_include_select_bases() {
        let expr = Expression::Binary {
            op: BinaryOp::BitAnd,
            left: Box::new(Expression::BitSelect {
                signal: "data".into(),
                index: Box::new(Expression::ident("i")),
            }),
            right: Box::new(Expression::ident("mask")),
        };
        let mut names = HashSet::new();
        collect_expr_names(&expr, &mut names);
        assert!(names.contains("data"));
        assert!(names.contains("i"));
        assert!(names.contains("mask"));
    }

    #[test]
    fn target_names_through_concat() {
        let target = Expression::Concat {
            elements: vec![Expression::ident("carry"), Expression::ident("sum")],
        };
        let mut names = HashSet::new();
        collect_target_names(&target, &mut names);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn written_names_recurse_into_case() {
        let stmt = Statement::Case(veris_ast::CaseStatement {
            kind: veris_ast::CaseKind::Case,
            selector: Expression::ident("s"),
            items: vec![veris_ast::CaseItem {
                values: vec![Expression::number("1'b0")],
                is_default: false,
                body: vec![Statement::Blocking {
                    target: Expression::ident("y"),
                    value: Expression::number("1'b1"),
                    span: None,
                }],
                span: None,
            }],
            span: None,
        });
        let mut names = HashSet::new();
        collect_written_names(&stmt, &mut names);
        assert!(names.contains("y"));
    }
}

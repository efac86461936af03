//! Pass 3: call signatures, return statements, and condition types.
//!
//! Bracketed walk with the same scope discipline as pass 2, so `resolve`
//! works inside function bodies. Operand and argument types that cannot be
//! resolved (undeclared names, already reported by pass 2) are skipped
//! rather than reported a second time.

use super::{Analyzer, EntryKind};
use crate::ast::{Node, NodeKind, Op, Type, walk};

pub(super) fn run(analyzer: &mut Analyzer, root: &mut Node) {
    walk::bracketed(root, &mut |node, _depth, before| match node.kind {
        NodeKind::MainDecl | NodeKind::FuncDecl => {
            if before {
                analyzer.enter_function(&node.name);
                check_returns(analyzer, node);
            } else {
                analyzer.leave_function();
            }
        }
        NodeKind::FuncCall if before => check_call(analyzer, node),
        NodeKind::If if before => check_condition(analyzer, node, "if"),
        NodeKind::While if before => check_condition(analyzer, node, "while"),
        NodeKind::Assn if before => check_assignment(analyzer, node),
        _ => {}
    });
}

/// Checks 4 and 5: argument count and types against the callee's parameter
/// list, and the ban on calling `main`.
fn check_call(analyzer: &mut Analyzer, node: &Node) {
    let Some(id) = analyzer.symbols.lookup_function(&node.name) else {
        return;
    };
    let entry = analyzer.symbols.entry(id);
    if entry.kind == EntryKind::MainDecl {
        analyzer
            .diagnostics
            .error_at(node.line, "main function cannot be called");
        return;
    }
    let Some(table) = entry.table else {
        return;
    };

    let params = analyzer.symbols.params_of(table);
    if node.children.len() != params.len() {
        analyzer.diagnostics.error_at(
            node.line,
            format!(
                "call to '{}' has {} argument(s) but expected {}",
                node.name,
                node.children.len(),
                params.len()
            ),
        );
        return;
    }

    for (index, arg) in node.children.iter().enumerate() {
        let want = params
            .iter()
            .find(|(param_index, _)| *param_index as usize == index + 1)
            .and_then(|(_, ty)| *ty);
        let given = type_of(analyzer, arg);
        if let (Some(want), Some(given)) = (want, given)
            && want != given
        {
            analyzer.diagnostics.error_at(
                node.line,
                format!("{given} used instead of {want} in call to '{}'", node.name),
            );
        }
    }
}

/// Checks 8–11: existence and type of return statements. Detection is
/// syntactic, over the top-level statements of the function body.
fn check_returns(analyzer: &mut Analyzer, func: &Node) {
    let ret_ty = func.ty;
    let returns: Vec<&Node> = func
        .body()
        .map(|block| {
            block
                .children
                .iter()
                .filter(|stmt| stmt.kind == NodeKind::Return)
                .collect()
        })
        .unwrap_or_default();

    match ret_ty {
        // `main` (untyped) and void functions must not return a value.
        None | Some(Type::Void) => {
            for ret in returns {
                if !ret.children.is_empty() {
                    analyzer.diagnostics.error_at(
                        ret.line,
                        format!("void function '{}' cannot return a value", func.name),
                    );
                }
            }
        }
        Some(want) => {
            if returns.is_empty() {
                analyzer.diagnostics.error_at(
                    func.line,
                    format!("no return statement in non-void function '{}'", func.name),
                );
            }
            for ret in returns {
                match ret.children.first() {
                    None => analyzer.diagnostics.error_at(
                        ret.line,
                        format!("non-void function '{}' must return a value", func.name),
                    ),
                    Some(value) => {
                        if let Some(given) = type_of(analyzer, value)
                            && given != want
                        {
                            analyzer.diagnostics.error_at(
                                ret.line,
                                format!("returned {given} but '{}' returns {want}", func.name),
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Check 12: `if`/`while` conditions must be boolean.
fn check_condition(analyzer: &mut Analyzer, node: &Node, stmt: &str) {
    let Some(cond) = node.children.first() else {
        return;
    };
    if let Some(ty) = type_of(analyzer, cond)
        && ty != Type::Boolean
    {
        analyzer
            .diagnostics
            .error_at(node.line, format!("{stmt} condition must be of boolean type"));
    }
}

/// Check 7 (assignment form): the right-hand side must have the declared
/// type of the target.
fn check_assignment(analyzer: &mut Analyzer, node: &Node) {
    let want = analyzer.symbols.resolve_type(&node.name);
    let given = node
        .children
        .get(1)
        .and_then(|rhs| type_of(analyzer, rhs));
    if let (Some(want), Some(given)) = (want, given)
        && want != given
    {
        analyzer.diagnostics.error_at(
            node.line,
            format!("assignment type mismatch for '{}'", node.name),
        );
    }
}

/// Recursive type synthesis (check 7 for operator expressions).
///
/// `Compare` and `Logical` yield boolean, `Arithmetic` yields int, literals
/// their own type; identifiers and calls yield their resolved type or `None`
/// without further errors.
pub(super) fn type_of(analyzer: &mut Analyzer, node: &Node) -> Option<Type> {
    match node.kind {
        NodeKind::Num => Some(Type::Int),
        NodeKind::Literal => Some(Type::Boolean),
        NodeKind::Str => Some(Type::Str),
        NodeKind::Id => analyzer.symbols.resolve_type(&node.name),
        NodeKind::FuncCall => {
            let id = analyzer.symbols.lookup_function(&node.name)?;
            analyzer.symbols.entry(id).ty
        }
        NodeKind::Compare => {
            let lhs = node.children.first().and_then(|c| type_of(analyzer, c));
            let rhs = node.children.get(1).and_then(|c| type_of(analyzer, c));
            match node.op {
                Some(Op::Eq) | Some(Op::Ne) => {
                    if let (Some(lhs), Some(rhs)) = (lhs, rhs)
                        && lhs != rhs
                    {
                        operand_mismatch(analyzer, node);
                    }
                }
                _ => {
                    // <, >, <=, >= compare ints only.
                    if [lhs, rhs].into_iter().flatten().any(|ty| ty != Type::Int) {
                        operand_mismatch(analyzer, node);
                    }
                }
            }
            Some(Type::Boolean)
        }
        NodeKind::Logical => {
            let mismatch = node
                .children
                .iter()
                .filter_map(|child| type_of(analyzer, child))
                .any(|ty| ty != Type::Boolean);
            if mismatch {
                operand_mismatch(analyzer, node);
            }
            Some(Type::Boolean)
        }
        NodeKind::Arithmetic => {
            let mismatch = node
                .children
                .iter()
                .filter_map(|child| type_of(analyzer, child))
                .any(|ty| ty != Type::Int);
            if mismatch {
                operand_mismatch(analyzer, node);
            }
            Some(Type::Int)
        }
        _ => None,
    }
}

fn operand_mismatch(analyzer: &mut Analyzer, node: &Node) {
    let op = node.op.map(|op| op.as_str()).unwrap_or("");
    analyzer
        .diagnostics
        .error_at(node.line, format!("type mismatch for operator '{op}'"));
}

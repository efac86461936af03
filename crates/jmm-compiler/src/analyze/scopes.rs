//! Pass 2: scope construction and reference resolution.
//!
//! Bracketed walk. Function entries push the per-function map built in pass
//! 1 and pop it on the way out; the block-nesting counter enforces the rule
//! that local declarations sit in a function's outermost block. Every `Id`
//! and `FuncCall` is resolved here and annotated with its entry.

use super::{Analyzer, Entry};
use crate::ast::{Node, NodeKind, walk};

pub(super) fn run(analyzer: &mut Analyzer, root: &mut Node) {
    analyzer.block_depth = 0;
    walk::bracketed(root, &mut |node, depth, before| match node.kind {
        NodeKind::MainDecl | NodeKind::FuncDecl => {
            if before {
                analyzer.enter_function(&node.name);
                analyzer.block_depth = 0;
            } else {
                analyzer.leave_function();
            }
        }
        NodeKind::Block => {
            if before {
                analyzer.block_depth += 1;
            } else {
                analyzer.block_depth -= 1;
            }
        }
        NodeKind::VarDecl if before && depth > 1 => {
            if analyzer.block_depth > 1 {
                analyzer.diagnostics.error_at(
                    node.line,
                    format!(
                        "local declaration of '{}' is not in an outermost block",
                        node.name
                    ),
                );
            }
            let entry = Entry::var(depth, node.ty);
            match analyzer.symbols.insert_unique(&node.name, entry) {
                Some(id) => node.sym = Some(id),
                None => analyzer.diagnostics.error_at(
                    node.line,
                    format!("identifier '{}' redefined within the same scope", node.name),
                ),
            }
        }
        NodeKind::Param if before => {
            let entry = Entry::param(depth, node.ty, node.param_index);
            match analyzer.symbols.insert_unique(&node.name, entry) {
                Some(id) => node.sym = Some(id),
                None => analyzer.diagnostics.error_at(
                    node.line,
                    format!("parameter '{}' redefined within the same scope", node.name),
                ),
            }
        }
        NodeKind::Id if before => match analyzer.symbols.resolve(&node.name) {
            Some(id) => node.sym = Some(id),
            None => analyzer
                .diagnostics
                .error_at(node.line, format!("undeclared identifier '{}'", node.name)),
        },
        NodeKind::FuncCall if before => match analyzer.symbols.resolve(&node.name) {
            Some(id) => node.sym = Some(id),
            None => analyzer.diagnostics.error_at(
                node.line,
                format!("call to undeclared function '{}'", node.name),
            ),
        },
        _ => {}
    });
}

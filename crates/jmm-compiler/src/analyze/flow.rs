//! Pass 4: `break` placement.
//!
//! Bracketed walk tracking `while` nesting; a `break` at depth zero is
//! outside every loop.

use super::Analyzer;
use crate::ast::{Node, NodeKind, walk};

pub(super) fn run(analyzer: &mut Analyzer, root: &mut Node) {
    analyzer.while_depth = 0;
    walk::bracketed(root, &mut |node, _depth, before| match node.kind {
        NodeKind::While => {
            if before {
                analyzer.while_depth += 1;
            } else {
                analyzer.while_depth -= 1;
            }
        }
        NodeKind::Break if before && analyzer.while_depth == 0 => {
            analyzer
                .diagnostics
                .error_at(node.line, "break statement outside of a while loop");
        }
        _ => {}
    });
}

//! Child-order normalization.
//!
//! The parser reduces declaration and statement lists back-to-front, the way
//! the right-recursive grammar productions stack up. This pass reverses the
//! affected child lists exactly once, after parsing; every later pass
//! assumes `children` is in source order. Reversal is an involution, so
//! applying it twice restores the original tree.

use super::{Node, NodeKind};

/// Puts `Prog`, `Block`, `MainDecl`, and `FuncDecl` child lists into source
/// order. Other node kinds are built in source order by the parser and are
/// only recursed into.
pub fn normalize(root: &mut Node) {
    if matches!(
        root.kind,
        NodeKind::Prog | NodeKind::Block | NodeKind::MainDecl | NodeKind::FuncDecl
    ) {
        root.children.reverse();
    }
    for child in &mut root.children {
        normalize(child);
    }
}

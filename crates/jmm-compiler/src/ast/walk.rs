//! Traversal combinators over the AST.
//!
//! All three walks thread an integer scope counter: it starts at 1 (the
//! global scope), is incremented when descending into a `MainDecl` or
//! `FuncDecl` body, and decremented on the way out. A node that opens a
//! scope is therefore reported at the surrounding depth by the pre/post
//! walks and its children at the inner depth.
//!
//! The combinators only count; pushing and popping the analyzer's scope
//! stack is done by the passes themselves on the bracketed hooks.

use super::{Node, NodeKind};

fn opens_scope(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::MainDecl | NodeKind::FuncDecl)
}

/// Visit children left-to-right, then the node.
pub fn post_order<F>(root: &mut Node, f: &mut F)
where
    F: FnMut(&mut Node, u32),
{
    fn go<F: FnMut(&mut Node, u32)>(node: &mut Node, scope: &mut u32, f: &mut F) {
        let opened = opens_scope(node.kind);
        if opened {
            *scope += 1;
        }
        for child in &mut node.children {
            go(child, scope, f);
        }
        if opened {
            *scope -= 1;
        }
        f(node, *scope);
    }
    let mut scope = 1;
    go(root, &mut scope, f);
}

/// Visit the node, then children left-to-right.
pub fn pre_order<F>(root: &mut Node, f: &mut F)
where
    F: FnMut(&mut Node, u32),
{
    fn go<F: FnMut(&mut Node, u32)>(node: &mut Node, scope: &mut u32, f: &mut F) {
        f(node, *scope);
        let opened = opens_scope(node.kind);
        if opened {
            *scope += 1;
        }
        for child in &mut node.children {
            go(child, scope, f);
        }
        if opened {
            *scope -= 1;
        }
    }
    let mut scope = 1;
    go(root, &mut scope, f);
}

/// Visit each node twice: once with `before = true` ahead of its children
/// and once with `before = false` after them. Passes that maintain the
/// scope stack use this form.
pub fn bracketed<F>(root: &mut Node, f: &mut F)
where
    F: FnMut(&mut Node, u32, bool),
{
    fn go<F: FnMut(&mut Node, u32, bool)>(node: &mut Node, scope: &mut u32, f: &mut F) {
        f(node, *scope, true);
        let opened = opens_scope(node.kind);
        if opened {
            *scope += 1;
        }
        for child in &mut node.children {
            go(child, scope, f);
        }
        if opened {
            *scope -= 1;
        }
        f(node, *scope, false);
    }
    let mut scope = 1;
    go(root, &mut scope, f);
}

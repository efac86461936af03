//! Pass 1: global declarations.
//!
//! Post-order walk that only acts on the direct children of `Prog` (scope
//! depth 1): global variables get entries in the global scope, functions
//! additionally get a fresh per-function map for the later passes. The
//! main-function checks run once the whole scope has been collected.

use super::{Analyzer, Entry, EntryKind};
use crate::ast::{Node, NodeKind, walk};

pub(super) fn run(analyzer: &mut Analyzer, root: &mut Node) {
    walk::post_order(root, &mut |node, scope| {
        if scope != 1 {
            return;
        }
        match node.kind {
            NodeKind::VarDecl => {
                let entry = Entry::var(1, node.ty);
                match analyzer.symbols.insert_unique(&node.name, entry) {
                    Some(id) => node.sym = Some(id),
                    None => analyzer.diagnostics.error_at(
                        node.line,
                        format!("identifier '{}' redefined within the same scope", node.name),
                    ),
                }
            }
            NodeKind::MainDecl | NodeKind::FuncDecl => {
                let kind = if node.kind == NodeKind::MainDecl {
                    analyzer.mains_seen += 1;
                    EntryKind::MainDecl
                } else {
                    EntryKind::FuncDecl
                };
                let table = analyzer.symbols.new_scope();
                let entry = Entry::function(kind, node.ty, table);
                match analyzer.symbols.insert_unique(&node.name, entry) {
                    Some(id) => node.sym = Some(id),
                    None => analyzer.diagnostics.error_at(
                        node.line,
                        format!("function '{}' redefined within the same scope", node.name),
                    ),
                }
            }
            _ => {}
        }
    });

    if analyzer.mains_seen == 0 {
        analyzer.diagnostics.error("No main function found");
    } else if analyzer.mains_seen > 1 {
        analyzer.diagnostics.error("Multiple main functions found");
    }
}

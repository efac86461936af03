//! Semantic analysis: four passes over the normalized AST.
//!
//! - pass 1 ([`decls`]): global declarations and the main-function checks
//! - pass 2 ([`scopes`]): scope construction and reference resolution
//! - pass 3 ([`types`]): call signatures, return statements, condition and
//!   assignment types
//! - pass 4 ([`flow`]): `break` placement
//!
//! Every check reports where it fires and lets the pass run on, so one run
//! surfaces all errors. The caller inspects the returned diagnostics.

mod decls;
mod flow;
mod scopes;
mod symbols;
mod types;

#[cfg(test)]
mod analyze_tests;
#[cfg(test)]
mod symbols_tests;

pub use symbols::{Entry, EntryId, EntryKind, GLOBAL, PREDEFINED, ScopeId, SymbolTable};

use crate::ast::Node;
use crate::diagnostics::Diagnostics;

/// Shared state threaded through the passes.
pub struct Analyzer {
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: Diagnostics,
    /// `MainDecl` nodes seen by pass 1 (duplicate keys cannot coexist in the
    /// global map, so the multiple-main check counts nodes, not entries).
    pub(crate) mains_seen: u32,
    /// Block nesting inside the current function (pass 2).
    pub(crate) block_depth: u32,
    /// `while` nesting (pass 4).
    pub(crate) while_depth: u32,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            mains_seen: 0,
            block_depth: 0,
            while_depth: 0,
        }
    }

    /// Pushes the per-function scope recorded for `name` by pass 1. A fresh
    /// scope is substituted when the name was lost to a redeclaration, so
    /// the push/pop discipline stays balanced either way.
    pub(crate) fn enter_function(&mut self, name: &str) {
        let table = self
            .symbols
            .lookup_in(GLOBAL, name)
            .and_then(|id| self.symbols.entry(id).table);
        let table = table.unwrap_or_else(|| self.symbols.new_scope());
        self.symbols.push(table);
    }

    pub(crate) fn leave_function(&mut self) {
        self.symbols.pop();
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs all four passes and returns the populated symbol tables together
/// with whatever was found. An empty diagnostics collection means the
/// program is ready for code generation.
pub fn analyze(root: &mut Node) -> (SymbolTable, Diagnostics) {
    let mut analyzer = Analyzer::new();
    decls::run(&mut analyzer, root);
    scopes::run(&mut analyzer, root);
    types::run(&mut analyzer, root);
    flow::run(&mut analyzer, root);
    (analyzer.symbols, analyzer.diagnostics)
}

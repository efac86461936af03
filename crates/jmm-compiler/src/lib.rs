//! J-- batch compiler: lexer, parser, semantic analyzer, and MIPS code
//! generator.
//!
//! The pipeline is strictly staged and synchronous:
//!
//! ```text
//! source → lex → parse → normalize → analyze (4 passes) → generate → asm
//! ```
//!
//! # Example
//!
//! ```
//! use jmm_compiler::Compiler;
//!
//! let mut compiler = Compiler::parse("void main() { }", "hello.j").expect("valid source");
//! let diagnostics = compiler.analyze();
//! assert!(diagnostics.is_empty());
//! let asm = compiler.generate();
//! assert!(asm.starts_with("\t.globl main"));
//! ```

pub mod analyze;
pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

pub use ast::{Node, NodeKind, Op, Type, Value};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use parser::{ParseError, Parser};

/// Errors that end a compilation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Lexical or syntax error; parsing stops at the first one.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// One or more semantic checks failed.
    #[error("{} error(s) found", .0.len())]
    Semantic(Diagnostics),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Staged compilation of one source file.
///
/// [`Compiler::parse`] builds and normalizes the AST; [`Compiler::analyze`]
/// runs the semantic passes and returns what they found; [`Compiler::generate`]
/// produces the assembly text. The driver sequences the stages so it can
/// report between them; [`compile`] runs them all for callers that only want
/// the assembly.
pub struct Compiler {
    ast: Node,
}

impl Compiler {
    /// Lexes and parses `source`, normalizing child order to source order.
    pub fn parse(source: &str, file_name: &str) -> std::result::Result<Self, ParseError> {
        let mut ast = Parser::new(source, file_name)?.parse()?;
        ast::normalize(&mut ast);
        Ok(Self { ast })
    }

    /// The textual AST dump printed before code generation.
    pub fn dump(&self) -> String {
        ast::dump(&self.ast)
    }

    /// Runs the four semantic passes, annotating the tree with symbol
    /// references. Empty diagnostics mean the program is valid.
    pub fn analyze(&mut self) -> Diagnostics {
        let (_symbols, diagnostics) = analyze::analyze(&mut self.ast);
        diagnostics
    }

    /// Emits the MIPS assembly text. Only meaningful after [`Self::analyze`]
    /// reported no errors.
    pub fn generate(&self) -> String {
        codegen::generate(&self.ast)
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }
}

/// One-shot convenience: full pipeline, returning the assembly text.
pub fn compile(source: &str, file_name: &str) -> Result<String> {
    let mut compiler = Compiler::parse(source, file_name)?;
    let diagnostics = compiler.analyze();
    if !diagnostics.is_empty() {
        return Err(Error::Semantic(diagnostics));
    }
    Ok(compiler.generate())
}

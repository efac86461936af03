//! MIPS code generation.
//!
//! Single traversal over the analyzed AST, targeting SPIM-style 32-bit MIPS.
//! Three text sections are assembled during the walk: the data section
//! (string constants), the main section, and one section per user function.
//! Emission never mutates the tree.
//!
//! Frame layout: every variable in the program, globals and locals alike,
//! occupies one 4-byte slot in a single flat list collected before emission.
//! The slot list's final length fixes both the `main` stack allocation and
//! every `$sp`-relative address, so a declaration's position inside its
//! block does not matter.
//!
//! Registers: an expression evaluated into `$t{r}` uses `$t{r+1}` and
//! `$t{r+2}` for its operands; the register counter is back at `r` when the
//! expression is done. Each statement starts over at `$t0`.

mod intrinsics;


use std::fmt::{self, Write};

use crate::ast::{Node, NodeKind, Op, Value};

/// Generates the complete `output.asm` text for a semantically valid program.
pub fn generate(prog: &Node) -> String {
    Generator::new(prog).run()
}

pub(crate) struct Generator<'a> {
    prog: &'a Node,
    /// String constants, headed by `.globl main` / `.data`.
    data: String,
    main: String,
    funcs: String,
    label_num: u32,
    /// Exit labels of the enclosing loops, innermost last.
    loop_exits: Vec<u32>,
    cur_reg: u32,
    /// Flat variable stack in declaration order.
    slots: Vec<String>,
    func_names: Vec<String>,
    in_main: bool,
}

impl<'a> Generator<'a> {
    fn new(prog: &'a Node) -> Self {
        let mut slots = Vec::new();
        collect_slots(prog, &mut slots);
        let func_names = prog
            .children
            .iter()
            .filter(|c| c.kind == NodeKind::FuncDecl)
            .map(|c| c.name.clone())
            .collect();
        Self {
            prog,
            data: String::from("\t.globl main\n\t.data\n"),
            main: String::new(),
            funcs: String::new(),
            label_num: 0,
            loop_exits: Vec::new(),
            cur_reg: 0,
            slots,
            func_names,
            in_main: false,
        }
    }

    fn run(mut self) -> String {
        self.emit_program()
            .expect("String write never fails");

        let mut file = self.data;
        file.push_str("\n\t.text\nmain:\n");
        writeln!(file, "sub $sp, $sp, {}", 4 * self.slots.len())
            .expect("String write never fails");
        file.push_str(&self.main);
        file.push_str("end:\nli $v0, 10\nsyscall\n");
        file.push_str(&self.funcs);
        file
    }

    fn emit_program(&mut self) -> fmt::Result {
        let prog = self.prog;
        for child in &prog.children {
            match child.kind {
                NodeKind::MainDecl => {
                    self.in_main = true;
                    let mut out = String::new();
                    for stmt in &child.children {
                        self.emit_stmt(stmt, &mut out)?;
                    }
                    self.main.push_str(&out);
                    self.in_main = false;
                }
                NodeKind::FuncDecl => {
                    let mut out = String::new();
                    writeln!(out, "{}:", child.name)?;
                    for stmt in &child.children {
                        self.emit_stmt(stmt, &mut out)?;
                    }
                    out.push_str("jr $ra\n");
                    self.funcs.push_str(&out);
                }
                // Global slots were collected up front.
                _ => {}
            }
        }
        Ok(())
    }

    fn next_label(&mut self) -> u32 {
        let label = self.label_num;
        self.label_num += 1;
        label
    }

    pub(crate) fn next_labels(&mut self, count: u32) -> u32 {
        let base = self.label_num;
        self.label_num += count;
        base
    }

    /// `$sp`-relative byte offset of a variable slot. Slot names are
    /// validated by the analyzer before emission starts.
    pub(crate) fn offset_of(&self, name: &str) -> usize {
        self.slots
            .iter()
            .position(|slot| slot == name)
            .map_or(0, |index| 4 * (self.slots.len() - 1 - index))
    }

    pub(crate) fn data_mut(&mut self) -> &mut String {
        &mut self.data
    }

    fn emit_stmt(&mut self, node: &Node, out: &mut String) -> fmt::Result {
        self.cur_reg = 0;
        match node.kind {
            NodeKind::Block => {
                for stmt in &node.children {
                    self.emit_stmt(stmt, out)?;
                }
                Ok(())
            }
            NodeKind::Assn => self.emit_assignment(node, out),
            NodeKind::If => self.emit_if(node, out),
            NodeKind::While => self.emit_while(node, out),
            NodeKind::Break => self.emit_break(out),
            NodeKind::Return => self.emit_return(node, out),
            NodeKind::FuncCall => self.emit_call(node, out),
            // VarDecl slots were collected up front; Null and Param emit nothing.
            _ => Ok(()),
        }
    }

    fn emit_assignment(&mut self, node: &Node, out: &mut String) -> fmt::Result {
        let Some(rhs) = node.children.get(1) else {
            return Ok(());
        };
        let reg = self.cur_reg;
        match rhs.kind {
            NodeKind::FuncCall => {
                self.emit_call(rhs, out)?;
                writeln!(out, "move $t{reg}, $v0")?;
            }
            NodeKind::Id => {
                writeln!(out, "lw $t{reg}, {}($sp)", self.offset_of(&rhs.name))?;
            }
            NodeKind::Num | NodeKind::Literal => {
                writeln!(out, "li $t{reg}, {}", imm_text(rhs))?;
            }
            _ => self.eval_expr(rhs, reg, out)?,
        }
        writeln!(out, "sw $t{reg}, {}($sp)", self.offset_of(&node.name))
    }

    fn emit_if(&mut self, node: &Node, out: &mut String) -> fmt::Result {
        let Some(cond) = node.children.first() else {
            return Ok(());
        };
        let has_else = node.children.last().is_some_and(|c| c.kind == NodeKind::Else);
        let end = self.next_label();
        self.write_test(cond, end, out)?;

        for child in node.children.iter().skip(1) {
            if child.kind != NodeKind::Else {
                self.emit_stmt(child, out)?;
            }
        }

        if has_else {
            let after = self.next_label();
            writeln!(out, "b label{after}")?;
            writeln!(out, "label{end}:")?;
            if let Some(else_node) = node.children.last() {
                for child in &else_node.children {
                    self.emit_stmt(child, out)?;
                }
            }
            writeln!(out, "label{after}:")
        } else {
            writeln!(out, "label{end}:")
        }
    }

    fn emit_while(&mut self, node: &Node, out: &mut String) -> fmt::Result {
        let Some(cond) = node.children.first() else {
            return Ok(());
        };
        let top = self.next_label();
        let exit = self.next_label();
        self.loop_exits.push(exit);

        writeln!(out, "label{top}:")?;
        self.write_test(cond, exit, out)?;
        for child in node.children.iter().skip(1) {
            self.emit_stmt(child, out)?;
        }
        writeln!(out, "b label{top}")?;
        writeln!(out, "label{exit}:")?;

        self.loop_exits.pop();
        Ok(())
    }

    fn emit_break(&mut self, out: &mut String) -> fmt::Result {
        // The analyzer rejects breaks outside loops, so the stack is never
        // empty here.
        if let Some(&exit) = self.loop_exits.last() {
            writeln!(out, "b label{exit}")?;
        }
        Ok(())
    }

    fn emit_return(&mut self, node: &Node, out: &mut String) -> fmt::Result {
        if self.in_main {
            return writeln!(out, "j end");
        }
        let Some(value) = node.children.first() else {
            return Ok(());
        };
        match value.kind {
            NodeKind::Num | NodeKind::Literal => writeln!(out, "li $v0, {}", imm_text(value)),
            NodeKind::Id => writeln!(out, "lw $v0, {}($sp)", self.offset_of(&value.name)),
            // A call leaves its result in $v0 already.
            NodeKind::FuncCall => self.emit_call(value, out),
            _ => {
                let reg = self.cur_reg;
                self.eval_expr(value, reg, out)?;
                writeln!(out, "move $v0, $t{reg}")
            }
        }
    }

    /// Evaluates an expression into `$t{reg}`, using `$t{reg+1}`/`$t{reg+2}`
    /// for binary operands.
    pub(crate) fn eval_expr(&mut self, node: &Node, reg: u32, out: &mut String) -> fmt::Result {
        match node.kind {
            NodeKind::Num | NodeKind::Literal => writeln!(out, "li $t{reg}, {}", imm_text(node)),
            NodeKind::Id => writeln!(out, "lw $t{reg}, {}($sp)", self.offset_of(&node.name)),
            NodeKind::FuncCall => {
                self.emit_call(node, out)?;
                writeln!(out, "move $t{reg}, $v0")
            }
            NodeKind::Arithmetic | NodeKind::Compare | NodeKind::Logical => {
                self.load_operand(&node.children[0], reg + 1, out)?;
                let unary = node.children.len() == 1;
                if !unary {
                    self.load_operand(&node.children[1], reg + 2, out)?;
                }
                let mnemonic = mnemonic_for(node.op, unary);
                if unary {
                    writeln!(out, "{mnemonic} $t{reg}, $t{}", reg + 1)?;
                } else {
                    writeln!(out, "{mnemonic} $t{reg}, $t{}, $t{}", reg + 1, reg + 2)?;
                }
                self.cur_reg = reg;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn load_operand(&mut self, node: &Node, reg: u32, out: &mut String) -> fmt::Result {
        match node.kind {
            NodeKind::Num | NodeKind::Literal => writeln!(out, "li $t{reg}, {}", imm_text(node)),
            NodeKind::Id => writeln!(out, "lw $t{reg}, {}($sp)", self.offset_of(&node.name)),
            _ => self.eval_expr(node, reg, out),
        }
    }

    /// Emits code that jumps to `label{target}` when the condition is false.
    /// A literal `true` falls through; a literal `false` always branches.
    fn write_test(&mut self, cond: &Node, target: u32, out: &mut String) -> fmt::Result {
        if cond.kind == NodeKind::Literal {
            return match cond.value {
                Some(Value::Bool(true)) => Ok(()),
                _ => writeln!(out, "b label{target}"),
            };
        }
        let reg = self.cur_reg;
        self.eval_expr(cond, reg, out)?;
        writeln!(out, "beq $0, $t{reg}, label{target}")
    }

    /// Calls: intrinsics are lowered inline; user functions get their first
    /// four arguments in `$a0..$a3` and the rest in `$t0..`, then `jal`.
    /// Either way the result, if any, is in `$v0` afterwards.
    pub(crate) fn emit_call(&mut self, node: &Node, out: &mut String) -> fmt::Result {
        if intrinsics::is_intrinsic(&node.name) {
            return intrinsics::emit(self, node, out);
        }
        if !self.func_names.iter().any(|name| name == &node.name) {
            return Ok(());
        }

        for (index, arg) in node.children.iter().enumerate() {
            let reg = if index < 4 {
                format!("$a{index}")
            } else {
                format!("$t{}", index - 4)
            };
            match arg.kind {
                NodeKind::Num | NodeKind::Literal => writeln!(out, "li {reg}, {}", imm_text(arg))?,
                NodeKind::Id => writeln!(out, "lw {reg}, {}($sp)", self.offset_of(&arg.name))?,
                _ => {
                    let scratch = self.cur_reg;
                    self.eval_expr(arg, scratch, out)?;
                    writeln!(out, "move {reg}, $t{scratch}")?;
                }
            }
        }
        writeln!(out, "jal {}", node.name)
    }
}

/// Immediate text for `Num` and `Literal` operands; booleans are 1/0.
pub(crate) fn imm_text(node: &Node) -> String {
    match &node.value {
        Some(Value::Int(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        Some(Value::Bool(false)) => "0".to_string(),
        _ => "0".to_string(),
    }
}

fn mnemonic_for(op: Option<Op>, unary: bool) -> &'static str {
    match op {
        Some(Op::Add) => "add",
        Some(Op::Sub) if unary => "neg",
        Some(Op::Sub) => "sub",
        Some(Op::Mul) => "mul",
        Some(Op::Div) => "div",
        Some(Op::Mod) => "rem",
        Some(Op::Eq) => "seq",
        Some(Op::Ne) => "sne",
        Some(Op::Ge) => "sge",
        Some(Op::Le) => "sle",
        Some(Op::Gt) => "sgt",
        Some(Op::Lt) => "slt",
        Some(Op::And) => "and",
        Some(Op::Or) => "or",
        Some(Op::Not) => "not",
        None => "nop",
    }
}

/// Pre-order sweep collecting every variable declaration, in the order the
/// emitter would meet them.
fn collect_slots(node: &Node, slots: &mut Vec<String>) {
    if node.kind == NodeKind::VarDecl {
        slots.push(node.name.clone());
    }
    for child in &node.children {
        collect_slots(child, slots);
    }
}

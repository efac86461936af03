//! Runtime intrinsic lowering.
//!
//! The six predefined routines have no function bodies; their code is
//! emitted inline at each call site and their string constants go to the
//! data section.

use std::fmt::{self, Write};

use super::{Generator, imm_text};
use crate::ast::{Node, NodeKind, Value};

const INTRINSICS: &[&str] = &["getchar", "halt", "printb", "printc", "printi", "prints"];

pub(super) fn is_intrinsic(name: &str) -> bool {
    INTRINSICS.contains(&name)
}

pub(super) fn emit(generator: &mut Generator, node: &Node, out: &mut String) -> fmt::Result {
    match node.name.as_str() {
        "halt" => writeln!(out, "j end"),
        "getchar" => emit_getchar(generator, out),
        "printi" => emit_printi(generator, node, out),
        "prints" => emit_prints(generator, node, out),
        "printb" => emit_printb(generator, node, out),
        "printc" => emit_printc(generator, node, out),
        _ => Ok(()),
    }
}

/// Prompt, then the read-integer syscall. The result stays in `$v0` for the
/// caller to move.
fn emit_getchar(generator: &mut Generator, out: &mut String) -> fmt::Result {
    let label = generator.next_labels(1);
    writeln!(
        generator.data_mut(),
        "label{label}: .asciiz \"Enter an int now:\""
    )?;
    writeln!(out, "li $v0, 4\nla $a0, label{label}\nsyscall")?;
    writeln!(out, "li $v0, 5\nsyscall")
}

fn emit_printi(generator: &mut Generator, node: &Node, out: &mut String) -> fmt::Result {
    let arg = prepare_arg(generator, node.children.first(), out)?;
    writeln!(out, "li $v0, 1")?;
    load_a0(&arg, out)?;
    writeln!(out, "syscall")
}

fn emit_prints(generator: &mut Generator, node: &Node, out: &mut String) -> fmt::Result {
    let label = generator.next_labels(1);
    let text = match node.children.first().map(|arg| &arg.value) {
        Some(Some(Value::Str(s))) => s.as_str(),
        _ => "\"\"",
    };
    writeln!(generator.data_mut(), "label{label}: .asciiz {text}")?;
    writeln!(out, "li $v0, 4\nla $a0, label{label}\nsyscall")
}

/// Branches between two `.asciiz` constants on the argument's value.
fn emit_printb(generator: &mut Generator, node: &Node, out: &mut String) -> fmt::Result {
    let arg = prepare_arg(generator, node.children.first(), out)?;
    let base = generator.next_labels(4);
    let (true_label, false_label, skip, done) = (base, base + 1, base + 2, base + 3);
    writeln!(generator.data_mut(), "label{true_label}: .asciiz \"true\"")?;
    writeln!(generator.data_mut(), "label{false_label}: .asciiz \"false\"")?;

    writeln!(out, "li $v0, 4")?;
    load_a0(&arg, out)?;
    writeln!(out, "beq $0, $a0, label{skip}")?;
    writeln!(out, "la $a0, label{true_label}\nsyscall\nb label{done}")?;
    writeln!(out, "label{skip}:")?;
    writeln!(out, "la $a0, label{false_label}\nsyscall")?;
    writeln!(out, "label{done}:")
}

/// Prints the single character whose codepoint is the argument's value.
fn emit_printc(generator: &mut Generator, node: &Node, out: &mut String) -> fmt::Result {
    let arg = prepare_arg(generator, node.children.first(), out)?;
    load_a0(&arg, out)?;
    writeln!(out, "li $v0, 11\nsyscall")
}

/// Where a print argument will come from when it is moved into `$a0`.
enum ArgSource {
    Imm(String),
    Slot(usize),
    Reg(u32),
    Missing,
}

/// Classifies a print argument. Compound expressions (including calls, which
/// clobber `$v0`) are evaluated into a temporary here, before the caller
/// sets up its syscall number.
fn prepare_arg(
    generator: &mut Generator,
    arg: Option<&Node>,
    out: &mut String,
) -> Result<ArgSource, fmt::Error> {
    let Some(arg) = arg else {
        return Ok(ArgSource::Missing);
    };
    Ok(match arg.kind {
        NodeKind::Num | NodeKind::Literal => ArgSource::Imm(imm_text(arg)),
        NodeKind::Id => ArgSource::Slot(generator.offset_of(&arg.name)),
        _ => {
            let reg = generator.cur_reg;
            generator.eval_expr(arg, reg, out)?;
            ArgSource::Reg(reg)
        }
    })
}

fn load_a0(arg: &ArgSource, out: &mut String) -> fmt::Result {
    match arg {
        ArgSource::Imm(text) => writeln!(out, "li $a0, {text}"),
        ArgSource::Slot(offset) => writeln!(out, "lw $a0, {offset}($sp)"),
        ArgSource::Reg(reg) => writeln!(out, "move $a0, $t{reg}"),
        ArgSource::Missing => Ok(()),
    }
}

//! Textual AST dump.
//!
//! One line per node, indented two spaces per depth level. Printed to stdout
//! between parsing and code generation.

use std::fmt::Write;

use super::{Node, NodeKind, Type, Value};

/// Renders the tree rooted at `root` (normally the `Prog` node).
pub fn dump(root: &Node) -> String {
    let mut out = String::new();
    write_node(root, 0, &mut out).expect("String write never fails");
    out
}

fn write_node(node: &Node, depth: usize, out: &mut String) -> std::fmt::Result {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str("--");

    let line = node.line;
    match node.kind {
        NodeKind::Prog => writeln!(out, "Program: {{'filename': {}}}", node.name)?,
        NodeKind::MainDecl => writeln!(
            out,
            "Main Function Declaration: {{'name': {}, 'lineno': {line}}}",
            node.name
        )?,
        NodeKind::FuncDecl => writeln!(
            out,
            "Function Declaration: {{'return type': {}, 'id': {}, 'lineno': {line}}}",
            ty_text(node.ty),
            node.name
        )?,
        NodeKind::VarDecl => writeln!(
            out,
            "Variable Declaration: {{'type': {}, 'id': {}, 'lineno': {line}}}",
            ty_text(node.ty),
            node.name
        )?,
        NodeKind::Param => writeln!(
            out,
            "Formal Parameter: {{'type': {}, 'id': {}, 'lineno': {line}}}",
            ty_text(node.ty),
            node.name
        )?,
        NodeKind::Block => writeln!(out, "Block: {{'lineno': {line}}}")?,
        NodeKind::If => writeln!(out, "If Statement: {{'lineno': {line}}}")?,
        NodeKind::Else => writeln!(out, "Else Statement: {{'lineno': {line}}}")?,
        NodeKind::While => writeln!(out, "While Statement: {{'lineno': {line}}}")?,
        NodeKind::Assn => writeln!(
            out,
            "Assign Statement: {{'id': {}, 'lineno': {line}}}",
            node.name
        )?,
        NodeKind::Null => writeln!(out, "Null Statement: {{'lineno': {line}}}")?,
        NodeKind::Return => writeln!(out, "Return Statement: {{'lineno': {line}}}")?,
        NodeKind::Break => writeln!(out, "Break Statement: {{'lineno': {line}}}")?,
        NodeKind::Num => writeln!(
            out,
            "Num: {{'value': {}, 'lineno': {line}}}",
            value_text(node)
        )?,
        NodeKind::Literal => writeln!(
            out,
            "Literal: {{'value': {}, 'lineno': {line}}}",
            value_text(node)
        )?,
        NodeKind::Str => writeln!(
            out,
            "String Literal: {{'value': {}, 'lineno': {line}}}",
            value_text(node)
        )?,
        NodeKind::Id => writeln!(out, "Id: {{'name': {}, 'lineno': {line}}}", node.name)?,
        NodeKind::Compare => writeln!(
            out,
            "Comparison operator: {{'type': {}, 'lineno': {line}}}",
            op_text(node)
        )?,
        NodeKind::Arithmetic => writeln!(
            out,
            "Arithmetic operator: {{'type': {}, 'lineno': {line}}}",
            op_text(node)
        )?,
        NodeKind::Logical => writeln!(
            out,
            "Logical operator: {{'type': {}, 'lineno': {line}}}",
            op_text(node)
        )?,
        NodeKind::FuncCall => writeln!(
            out,
            "Function Invocation: {{'name': {}, 'lineno': {line}}}",
            node.name
        )?,
    }

    for child in &node.children {
        write_node(child, depth + 1, out)?;
    }
    Ok(())
}

fn ty_text(ty: Option<Type>) -> String {
    ty.map(|t| t.to_string()).unwrap_or_default()
}

fn op_text(node: &Node) -> &'static str {
    node.op.map(|op| op.as_str()).unwrap_or("")
}

fn value_text(node: &Node) -> String {
    match &node.value {
        Some(Value::Int(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Str(s)) => s.clone(),
        None => String::new(),
    }
}

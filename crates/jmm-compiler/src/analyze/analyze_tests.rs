use indoc::indoc;

use super::{SymbolTable, analyze};
use crate::ast::{self, Node, NodeKind, Op, Type, Value};
use crate::diagnostics::Diagnostics;
use crate::parser::Parser;

fn check(source: &str) -> (SymbolTable, Diagnostics) {
    let mut ast = Parser::new(source, "test.j")
        .expect("lexes")
        .parse()
        .expect("parses");
    ast::normalize(&mut ast);
    analyze(&mut ast)
}

fn errors_of(source: &str) -> Diagnostics {
    check(source).1
}

#[test]
fn valid_program_has_no_errors() {
    let diagnostics = errors_of(indoc! {"
        int counter;
        int twice(int n) {
            return n + n;
        }
        void main() {
            counter = twice(4);
            while (counter > 0) {
                printi(counter);
                counter = counter - 1;
            }
        }
    "});
    assert!(diagnostics.is_empty(), "unexpected errors: {diagnostics}");
}

#[test]
fn missing_main_is_detected() {
    let diagnostics = errors_of("int f() { return 0; }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("No main function found"));
}

#[test]
fn multiple_mains_are_detected() {
    let diagnostics = errors_of("void main() { } void main() { }");
    assert!(diagnostics.mentions("Multiple main functions found"));
}

#[test]
fn local_declaration_must_be_in_outermost_block() {
    let diagnostics = errors_of(indoc! {"
        void main() {
            if (true) {
                int x;
            }
        }
    "});
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("local declaration of 'x' is not in an outermost block"));
}

#[test]
fn argument_count_mismatch_is_check_4() {
    let diagnostics = errors_of("void main() { printi(); }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("call to 'printi' has 0 argument(s) but expected 1"));
}

#[test]
fn argument_type_mismatch_is_check_4() {
    let diagnostics = errors_of("void main() { printi(true); }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("boolean used instead of int in call to 'printi'"));
}

#[test]
fn user_function_arguments_are_checked_by_position() {
    let diagnostics = errors_of(indoc! {"
        int f(int a, boolean b) {
            return a;
        }
        void main() {
            int x;
            x = f(1, 2);
        }
    "});
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("int used instead of boolean in call to 'f'"));
}

#[test]
fn main_cannot_be_called() {
    let diagnostics = errors_of("void main() { main(); }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("main function cannot be called"));
}

#[test]
fn break_outside_while_is_rejected() {
    let diagnostics = errors_of("void main() { break; }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("break statement outside of a while loop"));
}

#[test]
fn break_inside_while_is_fine() {
    let diagnostics = errors_of("void main() { while (true) { break; } }");
    assert!(diagnostics.is_empty());
}

#[test]
fn operator_operand_mismatch_is_check_7() {
    let diagnostics = errors_of("void main() { int x; x = 1 + true; }");
    assert!(diagnostics.mentions("type mismatch for operator '+'"));
}

#[test]
fn equality_requires_matching_operand_types() {
    let diagnostics = errors_of("void main() { if (1 == true) { } }");
    assert!(diagnostics.mentions("type mismatch for operator '=='"));
}

#[test]
fn relational_operators_require_ints() {
    let diagnostics = errors_of("void main() { if (true < false) { } }");
    assert!(diagnostics.mentions("type mismatch for operator '<'"));
}

#[test]
fn logical_operators_require_booleans() {
    let diagnostics = errors_of("void main() { if (1 && true) { } }");
    assert!(diagnostics.mentions("type mismatch for operator '&&'"));
}

#[test]
fn assignment_type_mismatch_is_reported() {
    let diagnostics = errors_of("void main() { int x; x = true; }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("assignment type mismatch for 'x'"));
}

#[test]
fn non_void_function_needs_a_return_statement() {
    let diagnostics = errors_of(indoc! {"
        int f() {
            int x;
            x = 1;
        }
        void main() { }
    "});
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("no return statement in non-void function 'f'"));
}

#[test]
fn void_function_cannot_return_a_value() {
    let diagnostics = errors_of("void f() { return 1; } void main() { }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("void function 'f' cannot return a value"));
}

#[test]
fn main_cannot_return_a_value() {
    let diagnostics = errors_of("void main() { return 1; }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("void function 'main' cannot return a value"));
}

#[test]
fn bare_return_in_main_is_fine() {
    let diagnostics = errors_of("void main() { return; }");
    assert!(diagnostics.is_empty());
}

#[test]
fn non_void_function_must_return_a_value() {
    let diagnostics = errors_of("int f() { return; } void main() { }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("non-void function 'f' must return a value"));
}

#[test]
fn returned_value_must_match_the_return_type() {
    let diagnostics = errors_of("int f() { return true; } void main() { }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("returned boolean but 'f' returns int"));
}

#[test]
fn if_condition_must_be_boolean() {
    let diagnostics = errors_of("void main() { if (1) { } }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("if condition must be of boolean type"));
}

#[test]
fn while_condition_must_be_boolean() {
    let diagnostics = errors_of("void main() { while (1) { } }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("while condition must be of boolean type"));
}

#[test]
fn redefined_local_is_check_13() {
    let diagnostics = errors_of("void main() { int x; int x; }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("identifier 'x' redefined within the same scope"));
}

#[test]
fn redefined_global_is_check_13() {
    let diagnostics = errors_of("int x; boolean x; void main() { }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("identifier 'x' redefined within the same scope"));
}

#[test]
fn redefined_function_is_check_13() {
    let diagnostics = errors_of(indoc! {"
        int f() { return 0; }
        int f() { return 1; }
        void main() { }
    "});
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("function 'f' redefined within the same scope"));
}

#[test]
fn reused_parameter_name_is_check_13() {
    let diagnostics = errors_of("int f(int a, int a) { return 0; } void main() { }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("parameter 'a' redefined within the same scope"));
}

#[test]
fn undeclared_identifier_is_check_14() {
    let diagnostics = errors_of("void main() { x = 1; }");
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = diagnostics.iter().next().expect("one error");
    assert!(diagnostic.message.contains("undeclared identifier 'x'"));
    assert_eq!(diagnostic.line, Some(1));
}

#[test]
fn undeclared_function_is_check_14() {
    let diagnostics = errors_of("void main() { f(); }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("call to undeclared function 'f'"));
}

#[test]
fn scope_stack_closes_back_to_two_entries() {
    let (symbols, _) = check(indoc! {"
        int f(int a) {
            return a;
        }
        int g() {
            return 2;
        }
        void main() {
            printi(f(1));
            printi(g());
        }
    "});
    assert_eq!(symbols.depth(), 2);
}

#[test]
fn params_and_locals_share_the_function_scope() {
    let diagnostics = errors_of(indoc! {"
        int f(int a) {
            int a;
            return a;
        }
        void main() { }
    "});
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.mentions("identifier 'a' redefined within the same scope"));
}

#[test]
fn errors_accumulate_across_checks() {
    let diagnostics = errors_of(indoc! {"
        void main() {
            break;
            y = 1;
            if (1) { }
        }
    "});
    assert_eq!(diagnostics.len(), 3);
}

#[test]
fn error_lines_point_at_the_offending_statement() {
    let diagnostics = errors_of(indoc! {"
        void main() {
            int x;
            x = true;
        }
    "});
    let diagnostic = diagnostics.iter().next().expect("one error");
    assert_eq!(diagnostic.line, Some(3));
    insta::assert_snapshot!(
        diagnostic.to_string(),
        @"Error: assignment type mismatch for 'x' near line 3."
    );
}

#[test]
fn type_synthesis_for_operator_nodes() {
    let mut analyzer = super::Analyzer::new();

    let num = Node::new(NodeKind::Num, 1)
        .with_type(Type::Int)
        .with_value(Value::Int(3));
    let lit = Node::new(NodeKind::Literal, 1)
        .with_type(Type::Boolean)
        .with_value(Value::Bool(true));

    let compare = Node::new(NodeKind::Compare, 1)
        .with_op(Op::Lt)
        .with_children(vec![num.clone(), num.clone()]);
    assert_eq!(
        super::types::type_of(&mut analyzer, &compare),
        Some(Type::Boolean)
    );

    let arith = Node::new(NodeKind::Arithmetic, 1)
        .with_op(Op::Add)
        .with_children(vec![num.clone(), num.clone()]);
    assert_eq!(
        super::types::type_of(&mut analyzer, &arith),
        Some(Type::Int)
    );

    let logical = Node::new(NodeKind::Logical, 1)
        .with_op(Op::Not)
        .with_children(vec![lit.clone()]);
    assert_eq!(
        super::types::type_of(&mut analyzer, &logical),
        Some(Type::Boolean)
    );

    assert_eq!(super::types::type_of(&mut analyzer, &num), Some(Type::Int));
    assert_eq!(
        super::types::type_of(&mut analyzer, &lit),
        Some(Type::Boolean)
    );
    assert!(analyzer.diagnostics().is_empty());
}

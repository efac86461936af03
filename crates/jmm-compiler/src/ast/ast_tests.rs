use indoc::indoc;

use super::{Node, NodeKind, Op, Type, dump, normalize, walk};
use crate::parser::Parser;

fn parse_raw(source: &str) -> Node {
    Parser::new(source, "test.j")
        .expect("lexes")
        .parse()
        .expect("parses")
}

fn parse(source: &str) -> Node {
    let mut ast = parse_raw(source);
    normalize(&mut ast);
    ast
}

#[test]
fn normalization_is_an_involution() {
    let raw = parse_raw(indoc! {"
        int x;
        int f(int a) {
            return a;
        }
        void main() {
            x = 1;
            x = 2;
        }
    "});

    let mut once = raw.clone();
    normalize(&mut once);
    assert_ne!(once, raw, "a multi-declaration program must actually reorder");

    let mut twice = raw.clone();
    normalize(&mut twice);
    normalize(&mut twice);
    assert_eq!(twice, raw);
}

#[test]
fn normalization_restores_source_order() {
    let prog = parse("int a; int b; void main() { }");
    let names: Vec<&str> = prog
        .children
        .iter()
        .take(2)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn scope_counter_tracks_function_bodies() {
    let mut prog = parse(indoc! {"
        int g;
        void main() {
            int x;
        }
    "});
    let mut seen = Vec::new();
    walk::post_order(&mut prog, &mut |node, scope| {
        if node.kind == NodeKind::VarDecl {
            seen.push((node.name.clone(), scope));
        }
    });
    assert_eq!(seen, vec![("g".to_string(), 1), ("x".to_string(), 2)]);
}

#[test]
fn pre_order_visits_parents_first() {
    let mut prog = parse("void main() { ; }");
    let mut kinds = Vec::new();
    walk::pre_order(&mut prog, &mut |node, _| kinds.push(node.kind));
    assert_eq!(
        kinds,
        vec![
            NodeKind::Prog,
            NodeKind::MainDecl,
            NodeKind::Block,
            NodeKind::Null,
        ]
    );
}

#[test]
fn bracketed_visits_each_node_twice() {
    let mut prog = parse("void main() { ; ; }");
    let mut before_count = 0usize;
    let mut after_count = 0usize;
    let mut first = None;
    let mut last = None;
    walk::bracketed(&mut prog, &mut |node, _, before| {
        if before {
            before_count += 1;
            first.get_or_insert(node.kind);
        } else {
            after_count += 1;
            last = Some(node.kind);
        }
    });
    assert_eq!(before_count, after_count);
    assert_eq!(first, Some(NodeKind::Prog));
    assert_eq!(last, Some(NodeKind::Prog));
}

#[test]
fn body_finds_the_block_after_params() {
    let prog = parse("int f(int a, int b) { return a; } void main() { }");
    let func = &prog.children[0];
    let body = func.body().expect("function body");
    assert_eq!(body.kind, NodeKind::Block);
}

#[test]
fn operator_rendering() {
    insta::assert_snapshot!(Op::Gt.as_str(), @">");
    insta::assert_snapshot!(Op::Ne.as_str(), @"!=");
    insta::assert_snapshot!(Type::Str.to_string(), @"string");
    insta::assert_snapshot!(Type::Boolean.to_string(), @"boolean");
}

#[test]
fn dump_lists_one_line_per_node() {
    let prog = parse(indoc! {"
        int x;
        void main() {
            x = 1 + 2;
        }
    "});
    assert_eq!(
        dump(&prog),
        indoc! {"
            --Program: {'filename': test.j}
              --Variable Declaration: {'type': int, 'id': x, 'lineno': 1}
              --Main Function Declaration: {'name': main, 'lineno': 2}
                --Block: {'lineno': 2}
                  --Assign Statement: {'id': x, 'lineno': 3}
                    --Id: {'name': x, 'lineno': 3}
                    --Arithmetic operator: {'type': +, 'lineno': 3}
                      --Num: {'value': 1, 'lineno': 3}
                      --Num: {'value': 2, 'lineno': 3}
        "}
    );
}

#[test]
fn dump_covers_control_flow_and_literals() {
    let prog = parse(indoc! {r#"
        void main() {
            if (true) {
                prints("hi");
            } else {
                ;
            }
        }
    "#});
    let text = dump(&prog);
    assert!(text.contains("--If Statement: {'lineno': 2}"));
    assert!(text.contains("--Literal: {'value': true, 'lineno': 2}"));
    assert!(text.contains("--Else Statement: {'lineno': 4}"));
    assert!(text.contains(r#"--String Literal: {'value': "hi", 'lineno': 3}"#));
    assert!(text.contains("--Function Invocation: {'name': prints, 'lineno': 3}"));
}

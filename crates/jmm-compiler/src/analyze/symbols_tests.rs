use super::symbols::{Entry, EntryKind, GLOBAL, PREDEFINED, SymbolTable};
use crate::ast::Type;

#[test]
fn predefined_names_are_always_resolvable() {
    let table = SymbolTable::new();
    for name in ["getchar", "halt", "printb", "printc", "printi", "prints"] {
        assert!(table.resolve(name).is_some(), "{name} must resolve");
    }
    assert_eq!(table.resolve_type("getchar"), Some(Type::Int));
    assert_eq!(table.resolve_type("halt"), Some(Type::Void));
    assert_eq!(table.resolve_type("printi"), Some(Type::Void));
}

#[test]
fn intrinsic_parameters_carry_types_and_indices() {
    let table = SymbolTable::new();
    let printb = table.resolve("printb").expect("printb");
    let scope = table.entry(printb).table.expect("param table");
    let params = table.params_of(scope);
    assert_eq!(params, vec![(1, Some(Type::Boolean))]);

    let prints = table.resolve("prints").expect("prints");
    let scope = table.entry(prints).table.expect("param table");
    assert_eq!(table.params_of(scope), vec![(1, Some(Type::Str))]);
}

#[test]
fn insert_unique_rejects_duplicates_in_the_top_scope() {
    let mut table = SymbolTable::new();
    assert!(table.insert_unique("x", Entry::var(1, Some(Type::Int))).is_some());
    assert!(table.insert_unique("x", Entry::var(1, Some(Type::Boolean))).is_none());
    // The first declaration is untouched.
    assert_eq!(table.resolve_type("x"), Some(Type::Int));
}

#[test]
fn resolve_searches_innermost_out() {
    let mut table = SymbolTable::new();
    table.insert_unique("x", Entry::var(1, Some(Type::Int)));

    let inner = table.new_scope();
    table.push(inner);
    assert_eq!(table.resolve_type("x"), Some(Type::Int));

    table.insert_unique("x", Entry::var(2, Some(Type::Boolean)));
    assert_eq!(table.resolve_type("x"), Some(Type::Boolean));

    table.pop();
    assert_eq!(table.resolve_type("x"), Some(Type::Int));
}

#[test]
fn user_declarations_shadow_intrinsics_for_calls() {
    let mut table = SymbolTable::new();
    let scope = table.new_scope();
    table.insert_unique("printi", Entry::function(EntryKind::FuncDecl, Some(Type::Int), scope));

    let id = table.lookup_function("printi").expect("resolves");
    assert_eq!(table.entry(id).ty, Some(Type::Int));
    // The intrinsic itself is still reachable in its own scope.
    assert!(table.lookup_in(PREDEFINED, "printi").is_some());
}

#[test]
fn stack_starts_at_predefined_and_global() {
    let table = SymbolTable::new();
    assert_eq!(table.depth(), 2);
    assert!(table.scope(GLOBAL).is_empty());
    assert_eq!(table.scope(PREDEFINED).len(), 6);
}

//! Symbol-table arenas and the scope stack.
//!
//! Entries and scope maps live in growable arenas addressed by stable index
//! newtypes; AST nodes refer to entries by [`EntryId`] instead of pointers.
//! The scope stack holds [`ScopeId`]s: index 0 is the predefined scope with
//! the runtime intrinsics, index 1 is the global scope, and each function
//! body gets one flat map of its own (nested blocks do not open scopes).

use indexmap::IndexMap;

use crate::ast::Type;

/// Stable index of a symbol-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u32);

impl EntryId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable index of a scope map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Runtime intrinsics; always resolvable, never redeclarable.
pub const PREDEFINED: ScopeId = ScopeId(0);
/// Top-level declarations.
pub const GLOBAL: ScopeId = ScopeId(1);

/// What a declared name is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    VarDecl,
    FuncDecl,
    MainDecl,
    Param,
}

/// One declared name.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Scope depth the name was declared at (0 predefined, 1 global, ≥2 local).
    pub scope: u32,
    /// Declared type; `None` for the untyped `main` declaration.
    pub ty: Option<Type>,
    pub kind: EntryKind,
    /// 1-based position for parameters, 0 otherwise.
    pub param_index: u32,
    /// Per-function name map for function-kind entries.
    pub table: Option<ScopeId>,
}

impl Entry {
    pub fn var(scope: u32, ty: Option<Type>) -> Self {
        Self {
            scope,
            ty,
            kind: EntryKind::VarDecl,
            param_index: 0,
            table: None,
        }
    }

    pub fn param(scope: u32, ty: Option<Type>, param_index: u32) -> Self {
        Self {
            scope,
            ty,
            kind: EntryKind::Param,
            param_index,
            table: None,
        }
    }

    pub fn function(kind: EntryKind, ty: Option<Type>, table: ScopeId) -> Self {
        Self {
            scope: 1,
            ty,
            kind,
            param_index: 0,
            table: Some(table),
        }
    }
}

/// Entry arena, scope-map arena, and the stack of active scopes.
pub struct SymbolTable {
    entries: Vec<Entry>,
    scopes: Vec<IndexMap<String, EntryId>>,
    stack: Vec<ScopeId>,
}

impl SymbolTable {
    /// Creates the predefined and global scopes, populates the intrinsics,
    /// and leaves the stack at `[predefined, global]`.
    pub fn new() -> Self {
        let mut table = Self {
            entries: Vec::new(),
            scopes: vec![IndexMap::new(), IndexMap::new()],
            stack: vec![PREDEFINED, GLOBAL],
        };
        table.add_intrinsics();
        table
    }

    /// Allocates a fresh empty scope map (not pushed).
    pub fn new_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(IndexMap::new());
        id
    }

    pub fn push(&mut self, scope: ScopeId) {
        self.stack.push(scope);
    }

    pub fn pop(&mut self) -> Option<ScopeId> {
        self.stack.pop()
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Inserts into the innermost scope. Returns `None` if the name is
    /// already present there (the caller reports a redefinition).
    pub fn insert_unique(&mut self, name: &str, entry: Entry) -> Option<EntryId> {
        let &top = self.stack.last()?;
        if self.scopes[top.index()].contains_key(name) {
            return None;
        }
        let id = EntryId(self.entries.len() as u32);
        self.entries.push(entry);
        self.scopes[top.index()].insert(name.to_string(), id);
        Some(id)
    }

    /// Searches the active scopes from innermost to outermost.
    pub fn resolve(&self, name: &str) -> Option<EntryId> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| self.scopes[scope.index()].get(name).copied())
    }

    /// Declared type of the innermost visible `name`, if any.
    pub fn resolve_type(&self, name: &str) -> Option<Type> {
        self.resolve(name).and_then(|id| self.entry(id).ty)
    }

    /// Looks `name` up in one specific scope, ignoring the stack.
    pub fn lookup_in(&self, scope: ScopeId, name: &str) -> Option<EntryId> {
        self.scopes[scope.index()].get(name).copied()
    }

    /// Call-target lookup: user declarations shadow intrinsics.
    pub fn lookup_function(&self, name: &str) -> Option<EntryId> {
        self.lookup_in(GLOBAL, name)
            .or_else(|| self.lookup_in(PREDEFINED, name))
    }

    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.index()]
    }

    /// The name→entry map of one scope, in insertion order.
    pub fn scope(&self, id: ScopeId) -> &IndexMap<String, EntryId> {
        &self.scopes[id.index()]
    }

    /// Parameter types of a function scope as `(param_index, type)` pairs,
    /// in declaration order.
    pub fn params_of(&self, scope: ScopeId) -> Vec<(u32, Option<Type>)> {
        self.scopes[scope.index()]
            .values()
            .map(|&id| self.entry(id))
            .filter(|e| e.kind == EntryKind::Param)
            .map(|e| (e.param_index, e.ty))
            .collect()
    }

    fn add_intrinsics(&mut self) {
        self.add_intrinsic("getchar", Some(Type::Int), &[]);
        self.add_intrinsic("halt", Some(Type::Void), &[]);
        self.add_intrinsic("printb", Some(Type::Void), &[("b", Type::Boolean)]);
        self.add_intrinsic("printc", Some(Type::Void), &[("c", Type::Int)]);
        self.add_intrinsic("printi", Some(Type::Void), &[("i", Type::Int)]);
        self.add_intrinsic("prints", Some(Type::Void), &[("s", Type::Str)]);
    }

    fn add_intrinsic(&mut self, name: &str, ty: Option<Type>, params: &[(&str, Type)]) {
        let table = self.new_scope();
        for (index, (param, param_ty)) in params.iter().enumerate() {
            let id = EntryId(self.entries.len() as u32);
            self.entries
                .push(Entry::param(1, Some(*param_ty), index as u32 + 1));
            self.scopes[table.index()].insert((*param).to_string(), id);
        }
        let id = EntryId(self.entries.len() as u32);
        self.entries.push(Entry {
            scope: 0,
            ty,
            kind: EntryKind::FuncDecl,
            param_index: 0,
            table: Some(table),
        });
        self.scopes[PREDEFINED.index()].insert(name.to_string(), id);
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

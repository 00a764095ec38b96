use rustc_hash::FxHashMap;

use crate::util::symbol::Symbol;

/// alias, we use interned Symbol as key everywhere in the project
pub type Env<T> = FxHashMap<Symbol, T>;

/// stack of environments, lookups search from the innermost scope outwards
#[derive(Debug, Clone)]
pub struct ScopedEnv<T> {
    scopes: Vec<Env<T>>,
}

impl<T> Default for ScopedEnv<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopedEnv<T> {
    /// creates env without any scope, call enter_scope before adding items
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Env::default());
    }

    /// drops all bindings of the innermost scope
    pub fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// associates k with v in the innermost scope, shadowing outer bindings
    pub fn add(&mut self, k: Symbol, v: T) {
        if self.scopes.is_empty() {
            self.enter_scope();
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(k, v);
        }
    }

    /// associates k with v only if the innermost scope does not contain k yet,
    /// otherwise gives v back
    pub fn add_unique(&mut self, k: Symbol, v: T) -> Result<(), T> {
        if self.probe(k).is_some() {
            Err(v)
        } else {
            self.add(k, v);
            Ok(())
        }
    }

    /// searches all scopes, innermost first
    pub fn lookup(&self, k: Symbol) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&k))
    }

    /// searches only the innermost scope
    pub fn probe(&self, k: Symbol) -> Option<&T> {
        self.scopes.last().and_then(|scope| scope.get(&k))
    }
}

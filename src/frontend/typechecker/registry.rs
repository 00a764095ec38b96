use tracing::debug;

use crate::frontend::ast::{Class, Keyed};
use crate::frontend::error::{SemantError, SemantErrorKind, SourceLocation};
use crate::frontend::typechecker::util::get_builtins;
use crate::meta::{GetLocation, LocationMeta};
use crate::util::env::ScopedEnv;
use crate::util::symbol::{IdTable, Symbol};

/// owns declarations of all classes of the program (basic and user-defined),
/// read-only once the inheritance graph is validated
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: ScopedEnv<Class<LocationMeta>>,
    /// registration order, used for deterministic iteration
    order: Vec<Symbol>,
    builtin_count: usize,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// creates registry without any classes, not even the basic ones
    pub fn new() -> Self {
        let mut classes = ScopedEnv::new();
        classes.enter_scope();
        Self { classes, order: Vec::new(), builtin_count: 0 }
    }

    /// creates registry containing all basic classes
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for cls in get_builtins() {
            let ident = cls.get_key();
            if registry.classes.add_unique(ident, cls).is_ok() {
                registry.order.push(ident);
            }
        }
        registry.builtin_count = registry.order.len();
        registry
    }

    /// adds class to the registry, the class registered first wins
    pub fn register(&mut self, cls: Class<LocationMeta>, ids: &IdTable) -> Result<(), SemantError> {
        let ident = cls.get_key();
        let location = SourceLocation::new(&cls.item.file, cls.get_location().line);
        debug!(class = ids.resolve(ident), "registering class");
        if self.classes.probe(ident).is_some() {
            let kind = SemantErrorKind::DuplicateClass { class: String::from(ids.resolve(ident)) };
            return Err(SemantError::new(kind, location));
        }
        if ident == Symbol::SELF_TYPE {
            return Err(SemantError::new(SemantErrorKind::ReservedClassName, location));
        }
        self.classes.add(ident, cls);
        self.order.push(ident);
        Ok(())
    }

    pub fn lookup(&self, ident: Symbol) -> Option<&Class<LocationMeta>> {
        self.classes.probe(ident)
    }

    pub fn contains(&self, ident: Symbol) -> bool {
        self.lookup(ident).is_some()
    }

    /// SELF_TYPE or any registered class can be used as a declared type
    pub fn is_declared_type(&self, t: Symbol) -> bool {
        t == Symbol::SELF_TYPE || self.contains(t)
    }

    pub fn is_builtin(&self, ident: Symbol) -> bool {
        self.order[..self.builtin_count].contains(&ident)
    }

    pub fn get_parent(&self, ident: Symbol) -> Option<Symbol> {
        self.lookup(ident).and_then(|cls| cls.item.parent)
    }

    /// all classes, in registration order
    pub fn classes(&self) -> impl Iterator<Item=&Class<LocationMeta>> {
        self.order.iter().filter_map(move |ident| self.lookup(*ident))
    }

    /// user-defined classes, in registration order
    pub fn user_classes(&self) -> impl Iterator<Item=&Class<LocationMeta>> {
        self.order[self.builtin_count..].iter().filter_map(move |ident| self.lookup(*ident))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

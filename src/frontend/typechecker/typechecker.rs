use rustc_hash::FxHashSet;
use tracing::debug;

use crate::frontend::ast::{Class, Expression, Keyed};
use crate::frontend::error::{Diagnostics, SemantErrorKind, SourceLocation};
use crate::frontend::typechecker::registry::ClassRegistry;
use crate::meta::{GetType, LocationMeta, TypeMeta};
use crate::util::env::ScopedEnv;
use crate::util::symbol::{IdTable, Symbol};

#[derive(Debug)]
pub struct TypeChecker<'prog> {
    /// contains all classes of the program, hierarchy is already validated
    registry: &'prog ClassRegistry,

    /// names of all identifiers, for error messages
    ids: &'prog IdTable,

    /// class which is currently checked, SELF_TYPE is resolved to it
    current_class: Symbol,

    /// file of the current class, for error locations
    current_file: String,

    /// maps identifiers in scope to their declared types
    env: ScopedEnv<Symbol>,

    /// methods of the current class checked so far
    declared_methods: FxHashSet<Symbol>,

    /// all errors found so far
    diagnostics: Diagnostics,
}

impl<'p> TypeChecker<'p> {
    /// typechecker is created with empty env, with lifetime same as the lifetime of the registry
    pub fn new(registry: &'p ClassRegistry, ids: &'p IdTable) -> Self {
        Self {
            registry,
            ids,
            current_class: Symbol::OBJECT,
            current_file: String::new(),
            env: ScopedEnv::new(),
            declared_methods: FxHashSet::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn registry(&self) -> &'p ClassRegistry {
        self.registry
    }

    pub fn get_current_class(&self) -> Symbol {
        self.current_class
    }

    /// errors found by all checks performed with this typechecker
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// switches context to the given class: fresh environment containing self
    /// and attributes of all ancestors (closest ancestor shadowing farther ones)
    pub fn with_class(&mut self, cls: &Class<LocationMeta>) {
        self.current_class = cls.get_key();
        self.current_file = cls.item.file.clone();
        self.env = ScopedEnv::new();
        self.declared_methods.clear();
        self.env.enter_scope();
        self.env.add(Symbol::SELF, Symbol::SELF_TYPE);

        let registry = self.registry;
        if let Some(parent) = cls.item.parent {
            for ancestor in registry.ancestors(parent).into_iter().rev() {
                if let Some(ancestor_cls) = registry.lookup(ancestor) {
                    // an attribute named self is already reported in its own class
                    for attr in ancestor_cls.item.attributes().filter(|attr| attr.ident != Symbol::SELF) {
                        let t = if registry.is_declared_type(attr.t) { attr.t } else { Symbol::OBJECT };
                        self.env.add(attr.ident, t);
                    }
                }
            }
        }
        self.env.enter_scope();
        debug!(class = self.ids.resolve(self.current_class), "checking class");
    }

    /// runs f in a nested scope, the scope is always closed before returning
    pub fn in_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    pub fn add_variable(&mut self, ident: Symbol, t: Symbol) {
        self.env.add(ident, t);
    }

    pub fn get_variable(&self, ident: Symbol) -> Option<Symbol> {
        self.env.lookup(ident).copied()
    }

    /// marks method as declared in the current class, false if it already was
    pub fn declare_method(&mut self, ident: Symbol) -> bool {
        self.declared_methods.insert(ident)
    }

    /// true if ident is already declared in the innermost scope
    pub fn is_declared_locally(&self, ident: Symbol) -> bool {
        self.env.probe(ident).is_some()
    }

    /// resolved name of the identifier, used in error messages
    pub fn name(&self, sym: Symbol) -> String {
        String::from(self.ids.resolve(sym))
    }

    /// record an error located at given line of the current class file
    pub fn report(&mut self, kind: SemantErrorKind, line: u32) {
        let location = SourceLocation::new(&self.current_file, line);
        self.diagnostics.report(kind, location);
    }

    /// check if rvalue conforms to lvalue (lvalue == rvalue or lvalue is superclass of rvalue)
    pub fn check_assignment(&self, lvalue: Symbol, rvalue: Symbol) -> bool {
        self.registry.is_subtype(rvalue, lvalue)
    }

    /// get lowest common ancestor (most specific common type) for 2 types
    pub fn get_types_lca(&self, t1: Symbol, t2: Symbol) -> Symbol {
        self.registry.lub(t1, t2)
    }

    /// SELF_TYPE or a registered class name
    pub fn is_declared_type(&self, t: Symbol) -> bool {
        self.registry.is_declared_type(t)
    }

    /// checks arguments of a call to method defined for class dispatch_t,
    /// returns declared return type of the method if it exists
    pub fn check_call(
        &mut self, line: u32, dispatch_t: Symbol, method: Symbol, args: &[Expression<TypeMeta>],
    ) -> Option<Symbol> {
        let registry = self.registry;
        match registry.find_method(dispatch_t, method) {
            None => {
                let kind = SemantErrorKind::UndefinedMethod { method: self.name(method) };
                self.report(kind, line);
                Option::None
            }
            Some(found) => {
                if found.formals.len() != args.len() {
                    let kind = SemantErrorKind::ArgumentCount { method: self.name(method) };
                    self.report(kind, line);
                }
                for (index, (formal, arg)) in found.formals.iter().zip(args.iter()).enumerate() {
                    let arg_t = arg.get_type();
                    if !self.check_assignment(formal.item.t, arg_t) {
                        let kind = SemantErrorKind::ArgumentNonConforming {
                            method: self.name(method),
                            index,
                            actual: self.name(arg_t),
                            declared: self.name(formal.item.t),
                        };
                        self.report(kind, line);
                    }
                }
                Option::Some(found.ret)
            }
        }
    }
}

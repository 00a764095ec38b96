use tracing::debug;

use crate::frontend::ast::{AttributeItem, Formal, MethodItem};
use crate::frontend::error::{Diagnostics, SemantErrorKind, SourceLocation};
use crate::frontend::typechecker::registry::ClassRegistry;
use crate::frontend::typechecker::typechecker::TypeChecker;
use crate::meta::{GetLocation, GetType, LocationMeta, TypeMeta};
use crate::util::mapper::AstMapper;
use crate::util::symbol::Symbol;

impl TypeChecker<'_> {
    /// checks declaration and initializer of an attribute of the current class, binds it in the class scope
    pub fn check_attribute(&mut self, attr: &AttributeItem<LocationMeta>, line: u32) -> AttributeItem<TypeMeta> {
        let attr_t = if self.is_declared_type(attr.t) {
            attr.t
        } else {
            let kind = SemantErrorKind::UndefinedAttributeType { attr: self.name(attr.ident), t: self.name(attr.t) };
            self.report(kind, line);
            Symbol::OBJECT
        };

        let registry = self.registry();
        let inherited = registry.get_parent(self.get_current_class())
            .and_then(|parent| registry.find_attribute(parent, attr.ident))
            .is_some();
        let bound = if attr.ident == Symbol::SELF {
            self.report(SemantErrorKind::SelfAttribute, line);
            false
        } else if inherited {
            let kind = SemantErrorKind::InheritedAttribute { attr: self.name(attr.ident) };
            self.report(kind, line);
            true
        } else if self.is_declared_locally(attr.ident) {
            let kind = SemantErrorKind::DuplicateAttribute { attr: self.name(attr.ident) };
            self.report(kind, line);
            true
        } else {
            true
        };

        // initializer sees only the attributes declared before this one
        let mapped_init = attr.init.as_ref().map(|init| Box::new(self.map_expression(init)));
        if let Some(init_t) = mapped_init.as_ref().map(|init| init.get_type()) {
            if !self.check_assignment(attr_t, init_t) {
                let kind = SemantErrorKind::AttributeInitNonConforming {
                    attr: self.name(attr.ident),
                    actual: self.name(init_t),
                    declared: self.name(attr_t),
                };
                self.report(kind, line);
            }
        }

        if bound {
            self.add_variable(attr.ident, attr_t);
        }
        AttributeItem { ident: attr.ident, t: attr.t, init: mapped_init }
    }

    fn check_formal(&mut self, formal: &Formal) {
        let line = formal.get_location().line;
        let ident = formal.item.ident;
        let formal_t = if formal.item.t == Symbol::SELF_TYPE {
            let kind = SemantErrorKind::SelfTypeFormal { formal: self.name(ident) };
            self.report(kind, line);
            Symbol::OBJECT
        } else if !self.registry().contains(formal.item.t) {
            let kind = SemantErrorKind::UndefinedFormalType { formal: self.name(ident), t: self.name(formal.item.t) };
            self.report(kind, line);
            Symbol::OBJECT
        } else {
            formal.item.t
        };

        if ident == Symbol::SELF {
            self.report(SemantErrorKind::SelfFormal, line);
        } else if self.is_declared_locally(ident) {
            let kind = SemantErrorKind::DuplicateFormal { formal: self.name(ident) };
            self.report(kind, line);
        } else {
            self.add_variable(ident, formal_t);
        }
    }

    /// checks signature and body of a method of the current class,
    /// including compatibility with the method it overrides
    pub fn check_method(&mut self, method: &MethodItem<LocationMeta>, line: u32) -> MethodItem<TypeMeta> {
        let ret_t = if self.is_declared_type(method.ret) {
            method.ret
        } else {
            let kind = SemantErrorKind::UndefinedReturnType { method: self.name(method.ident), t: self.name(method.ret) };
            self.report(kind, line);
            Symbol::OBJECT
        };
        if !self.declare_method(method.ident) {
            let kind = SemantErrorKind::DuplicateMethod { method: self.name(method.ident) };
            self.report(kind, line);
        }

        let mapped_body = self.in_scope(|checker| {
            for formal in method.formals.iter() {
                checker.check_formal(formal);
            }
            method.body.as_ref().map(|body| Box::new(checker.map_expression(body)))
        });

        if let Some(body_t) = mapped_body.as_ref().map(|body| body.get_type()) {
            // SELF_TYPE result is guaranteed only by a body of type SELF_TYPE
            let conforms = if ret_t == Symbol::SELF_TYPE {
                body_t == Symbol::SELF_TYPE
            } else {
                self.check_assignment(ret_t, body_t)
            };
            if !conforms {
                let kind = SemantErrorKind::ReturnNonConforming {
                    method: self.name(method.ident),
                    actual: self.name(body_t),
                    declared: self.name(ret_t),
                };
                self.report(kind, line);
            }
        }

        self.check_override(method, line);
        MethodItem {
            ident: method.ident,
            formals: method.formals.clone(),
            ret: method.ret,
            body: mapped_body,
        }
    }

    /// overriding method must have exactly the same signature as the original one
    fn check_override(&mut self, method: &MethodItem<LocationMeta>, line: u32) {
        let registry = self.registry();
        let original = match registry.get_parent(self.get_current_class())
            .and_then(|parent| registry.find_method(parent, method.ident)) {
            Some(original) => original,
            None => return,
        };

        if original.formals.len() != method.formals.len() {
            let kind = SemantErrorKind::OverrideArity { method: self.name(method.ident) };
            self.report(kind, line);
        } else {
            for (formal, original_formal) in method.formals.iter().zip(original.formals.iter()) {
                if formal.item.t != original_formal.item.t {
                    let kind = SemantErrorKind::OverrideFormalType {
                        method: self.name(method.ident),
                        actual: self.name(formal.item.t),
                        original: self.name(original_formal.item.t),
                    };
                    self.report(kind, formal.get_location().line);
                }
            }
        }
        if original.ret != method.ret {
            let kind = SemantErrorKind::OverrideReturnType {
                method: self.name(method.ident),
                actual: self.name(method.ret),
                original: self.name(original.ret),
            };
            self.report(kind, line);
        }
    }
}

/// class Main has to exist and define method main without arguments
pub fn check_main(registry: &ClassRegistry, diagnostics: &mut Diagnostics) {
    debug!("checking entrypoint");
    let main_cls = match registry.lookup(Symbol::MAIN) {
        Some(cls) => cls,
        None => {
            diagnostics.report(SemantErrorKind::MissingMain, SourceLocation::program());
            return;
        }
    };
    let location = SourceLocation::new(&main_cls.item.file, main_cls.get_location().line);
    match main_cls.item.get_method(Symbol::MAIN_METHOD) {
        None => diagnostics.report(SemantErrorKind::MissingMainMethod, location),
        Some(main) if !main.formals.is_empty() => {
            diagnostics.report(SemantErrorKind::MainMethodArguments, location)
        }
        Some(_) => {}
    }
}

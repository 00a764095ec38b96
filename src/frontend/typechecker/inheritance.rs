use rustc_hash::FxHashSet;
use tracing::debug;

use crate::frontend::ast::Keyed;
use crate::frontend::error::{Diagnostics, SemantErrorKind, SourceLocation};
use crate::frontend::typechecker::registry::ClassRegistry;
use crate::meta::GetLocation;
use crate::util::symbol::{IdTable, Symbol};

/// checks that every parent exists, is not a primitive class and that no class
/// is (or inherits from) a member of an inheritance cycle
pub fn check_inheritance(registry: &ClassRegistry, ids: &IdTable, diagnostics: &mut Diagnostics) {
    for cls in registry.classes() {
        let parent = match cls.item.parent {
            Some(parent) => parent,
            None => continue,
        };
        let ident = cls.get_key();
        let location = SourceLocation::new(&cls.item.file, cls.get_location().line);
        debug!(class = ids.resolve(ident), parent = ids.resolve(parent), "checking inheritance");

        if parent.is_primitive() {
            let kind = SemantErrorKind::PrimitiveInheritance {
                class: String::from(ids.resolve(ident)),
                parent: String::from(ids.resolve(parent)),
            };
            diagnostics.report(kind, location);
        } else if !registry.contains(parent) {
            let kind = SemantErrorKind::UndefinedParent {
                class: String::from(ids.resolve(ident)),
                parent: String::from(ids.resolve(parent)),
            };
            diagnostics.report(kind, location);
        } else if reaches_cycle(registry, ident, parent) {
            let kind = SemantErrorKind::InheritanceCycle { class: String::from(ids.resolve(ident)) };
            diagnostics.report(kind, location);
        }
    }
}

/// walks parent links starting at parent, true if any class is visited twice
fn reaches_cycle(registry: &ClassRegistry, ident: Symbol, parent: Symbol) -> bool {
    let mut visited = FxHashSet::default();
    visited.insert(ident);
    let mut current = Option::Some(parent);
    while let Some(t) = current {
        if !visited.insert(t) {
            return true;
        }
        current = registry.get_parent(t);
    }
    false
}

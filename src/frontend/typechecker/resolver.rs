use tracing::trace;

use crate::frontend::ast::{AttributeItem, Class, MethodItem};
use crate::frontend::typechecker::registry::ClassRegistry;
use crate::meta::LocationMeta;
use crate::util::symbol::Symbol;

impl ClassRegistry {
    /// registered classes met when following parent links from cls, cls first
    fn lineage(&self, cls: Symbol) -> impl Iterator<Item=&Class<LocationMeta>> {
        let mut current = self.lookup(cls);
        let mut remaining = self.len();
        std::iter::from_fn(move || {
            let c = current.filter(|_| remaining > 0)?;
            remaining -= 1;
            current = c.item.parent.and_then(|parent| self.lookup(parent));
            Option::Some(c)
        })
    }

    /// attempts to get a method matching given identifier from class or closest superclass
    pub fn find_method(&self, cls: Symbol, method: Symbol) -> Option<&MethodItem<LocationMeta>> {
        let found = self.lineage(cls).find_map(|c| c.item.get_method(method));
        trace!(found = found.is_some(), "method lookup");
        found
    }

    /// attempts to get an attribute matching given identifier from class or closest superclass
    pub fn find_attribute(&self, cls: Symbol, attr: Symbol) -> Option<&AttributeItem<LocationMeta>> {
        self.lineage(cls).find_map(|c| c.item.get_attribute(attr))
    }
}

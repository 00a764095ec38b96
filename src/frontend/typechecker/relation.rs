use crate::frontend::typechecker::registry::ClassRegistry;
use crate::util::symbol::Symbol;

impl ClassRegistry {
    /// get t and all its ancestors, ending at Object;
    /// assumes the hierarchy is already validated (acyclic)
    pub fn ancestors(&self, t: Symbol) -> Vec<Symbol> {
        let mut chain = vec![t];
        let mut current = self.get_parent(t);
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.get_parent(parent);
        }
        if !chain.contains(&Symbol::OBJECT) {
            chain.push(Symbol::OBJECT);
        }
        chain
    }

    /// check if child conforms to parent:
    /// SELF_TYPE conforms to everything, nothing concrete conforms to SELF_TYPE
    pub fn is_subtype(&self, child: Symbol, parent: Symbol) -> bool {
        if child == Symbol::SELF_TYPE {
            return true;
        }
        if parent == Symbol::SELF_TYPE {
            return false;
        }
        if child == parent {
            return true;
        }
        // bounded by the number of classes, parent links may still contain a cycle here
        let mut current = self.get_parent(child);
        for _ in 0..self.len() {
            match current {
                Some(t) if t == parent => return true,
                Some(t) => current = self.get_parent(t),
                None => break,
            }
        }
        false
    }

    /// least upper bound (most specific common ancestor) of 2 types
    pub fn lub(&self, t1: Symbol, t2: Symbol) -> Symbol {
        match (t1 == Symbol::SELF_TYPE, t2 == Symbol::SELF_TYPE) {
            (true, true) => Symbol::SELF_TYPE,
            (true, false) | (false, true) => Symbol::OBJECT,
            (false, false) => {
                let t1_ancestors = self.ancestors(t1);
                self.ancestors(t2)
                    .into_iter()
                    .find(|t| t1_ancestors.contains(t))
                    .unwrap_or(Symbol::OBJECT)
            }
        }
    }
}

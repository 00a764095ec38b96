use crate::meta::Meta;
use crate::util::symbol::Symbol;

/// metadata attached to checked expressions: source line and the inferred static type
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TypeMeta {
    pub line: u32,
    pub t: Symbol,
}

pub trait GetType {
    fn get_type(&self) -> Symbol;
}

impl<ItemT> GetType for Meta<ItemT, TypeMeta> {
    fn get_type(&self) -> Symbol {
        self.get_meta().t
    }
}

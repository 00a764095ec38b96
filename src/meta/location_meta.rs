use crate::meta::{Meta, TypeMeta};

/// metadata type for location data (line in the cool source file, as reported by the parser)
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct LocationMeta {
    pub line: u32,
}

impl From<u32> for LocationMeta {
    fn from(line: u32) -> Self {
        Self { line }
    }
}

pub trait GetLocation {
    fn get_location(&self) -> LocationMeta;
}

impl<ItemT> GetLocation for Meta<ItemT, LocationMeta> {
    fn get_location(&self) -> LocationMeta {
        *self.get_meta()
    }
}

impl<ItemT> GetLocation for Meta<ItemT, TypeMeta> {
    fn get_location(&self) -> LocationMeta {
        LocationMeta::from(self.get_meta().line)
    }
}

use rustc_hash::FxHashMap;

/// interned identifier, compared by index
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Symbol(u32);

/// names every IdTable starts with, the order must match the constants below
const WELL_KNOWN: [&str; 27] = [
    "Object",
    "IO",
    "Int",
    "Float",
    "String",
    "Bool",
    "SELF_TYPE",
    "_no_class",
    "_no_type",
    "_prim_slot",
    "self",
    "Main",
    "main",
    "abort",
    "type_name",
    "copy",
    "out_string",
    "out_int",
    "in_string",
    "in_int",
    "length",
    "concat",
    "substr",
    "arg",
    "arg2",
    "val",
    "str_field",
];

impl Symbol {
    pub const OBJECT: Symbol = Symbol(0);
    pub const IO: Symbol = Symbol(1);
    pub const INT: Symbol = Symbol(2);
    pub const FLOAT: Symbol = Symbol(3);
    pub const STRING: Symbol = Symbol(4);
    pub const BOOL: Symbol = Symbol(5);
    pub const SELF_TYPE: Symbol = Symbol(6);
    pub const NO_CLASS: Symbol = Symbol(7);
    pub const NO_TYPE: Symbol = Symbol(8);
    pub const PRIM_SLOT: Symbol = Symbol(9);
    pub const SELF: Symbol = Symbol(10);
    pub const MAIN: Symbol = Symbol(11);
    pub const MAIN_METHOD: Symbol = Symbol(12);
    pub const ABORT: Symbol = Symbol(13);
    pub const TYPE_NAME: Symbol = Symbol(14);
    pub const COPY: Symbol = Symbol(15);
    pub const OUT_STRING: Symbol = Symbol(16);
    pub const OUT_INT: Symbol = Symbol(17);
    pub const IN_STRING: Symbol = Symbol(18);
    pub const IN_INT: Symbol = Symbol(19);
    pub const LENGTH: Symbol = Symbol(20);
    pub const CONCAT: Symbol = Symbol(21);
    pub const SUBSTR: Symbol = Symbol(22);
    pub const ARG: Symbol = Symbol(23);
    pub const ARG2: Symbol = Symbol(24);
    pub const VAL: Symbol = Symbol(25);
    pub const STR_FIELD: Symbol = Symbol(26);

    /// primitive classes cannot be inherited from
    pub fn is_primitive(self) -> bool {
        self == Symbol::INT || self == Symbol::FLOAT || self == Symbol::STRING || self == Symbol::BOOL
    }
}

/// maps every distinct name to a canonical Symbol
#[derive(Debug, Clone)]
pub struct IdTable {
    map: FxHashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Default for IdTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IdTable {
    /// creates a table seeded with all well-known names
    pub fn new() -> Self {
        let mut table = Self { map: FxHashMap::default(), strings: Vec::new() };
        for name in WELL_KNOWN.iter() {
            table.intern(name);
        }
        table
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.map.get(name) {
            return *sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(String::from(name));
        self.map.insert(String::from(name), sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    /// get symbol of a name without interning it
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

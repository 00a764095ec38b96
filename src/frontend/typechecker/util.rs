use crate::frontend::ast::{
    AttributeItem, Class, ClassItem, Feature, FeatureKind, Formal, FormalItem, MethodItem,
};
use crate::meta::LocationMeta;
use crate::util::symbol::Symbol;

/// file tag of the basic classes
pub const BASIC_CLASS_FILE: &str = "<basic class>";

fn method(ident: Symbol, formals: Vec<(Symbol, Symbol)>, ret: Symbol) -> Feature<LocationMeta> {
    let formals: Vec<Formal> = formals.into_iter()
        .map(|(ident, t)| Formal::new(FormalItem { ident, t }, LocationMeta::default()))
        .collect();
    let item = MethodItem { ident, formals, ret, body: Option::None };
    Feature::new(FeatureKind::Method(item), LocationMeta::default())
}

fn attribute(ident: Symbol, t: Symbol) -> Feature<LocationMeta> {
    let item = AttributeItem { ident, t, init: Option::None };
    Feature::new(FeatureKind::Attribute(item), LocationMeta::default())
}

fn class(ident: Symbol, parent: Option<Symbol>, features: Vec<Feature<LocationMeta>>) -> Class<LocationMeta> {
    Class::new(ClassItem::new(ident, parent, features, BASIC_CLASS_FILE), LocationMeta::default())
}

/// get declarations of all basic classes, in registration order;
/// method bodies are irrelevant for static checking so they are left empty
pub fn get_builtins() -> Vec<Class<LocationMeta>> {
    let object = class(Symbol::OBJECT, Option::None, vec![
        method(Symbol::ABORT, vec![], Symbol::OBJECT),
        method(Symbol::TYPE_NAME, vec![], Symbol::STRING),
        method(Symbol::COPY, vec![], Symbol::SELF_TYPE),
    ]);
    let io = class(Symbol::IO, Option::Some(Symbol::OBJECT), vec![
        method(Symbol::OUT_STRING, vec![(Symbol::ARG, Symbol::STRING)], Symbol::SELF_TYPE),
        method(Symbol::OUT_INT, vec![(Symbol::ARG, Symbol::INT)], Symbol::SELF_TYPE),
        method(Symbol::IN_STRING, vec![], Symbol::STRING),
        method(Symbol::IN_INT, vec![], Symbol::INT),
    ]);
    let int = class(Symbol::INT, Option::Some(Symbol::OBJECT), vec![
        attribute(Symbol::VAL, Symbol::PRIM_SLOT),
    ]);
    let boolean = class(Symbol::BOOL, Option::Some(Symbol::OBJECT), vec![
        attribute(Symbol::VAL, Symbol::PRIM_SLOT),
    ]);
    let string = class(Symbol::STRING, Option::Some(Symbol::OBJECT), vec![
        attribute(Symbol::VAL, Symbol::INT),
        attribute(Symbol::STR_FIELD, Symbol::PRIM_SLOT),
        method(Symbol::LENGTH, vec![], Symbol::INT),
        method(Symbol::CONCAT, vec![(Symbol::ARG, Symbol::STRING)], Symbol::STRING),
        method(Symbol::SUBSTR, vec![(Symbol::ARG, Symbol::INT), (Symbol::ARG2, Symbol::INT)], Symbol::STRING),
    ]);
    let float = class(Symbol::FLOAT, Option::Some(Symbol::OBJECT), vec![
        attribute(Symbol::VAL, Symbol::PRIM_SLOT),
    ]);
    vec![object, io, int, boolean, string, float]
}

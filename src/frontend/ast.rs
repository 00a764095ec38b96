use crate::meta::{LocationMeta, Meta};
use crate::util::symbol::Symbol;

/// trait for marking ast items that can searched by key (in an environment)
pub trait Keyed {
    fn get_key(&self) -> Symbol;
}

/// alias for all metadata containers attached to ast items
pub type AstItem<ItemT, MetaT> = Meta<ItemT, MetaT>;

impl<ItemT: Keyed, MetaT> Keyed for AstItem<ItemT, MetaT> {
    /// if item is keyed, the whole wrapper can also be keyed using same key
    fn get_key(&self) -> Symbol {
        self.item.get_key()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArithOperator {
    Plus,
    Minus,
    Times,
    Divide,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CompareOperator {
    Less,
    LessEqual,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Neg,
    Not,
}

impl ArithOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOperator::Plus => "+",
            ArithOperator::Minus => "-",
            ArithOperator::Times => "*",
            ArithOperator::Divide => "/",
        }
    }
}

impl CompareOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOperator::Less => "<",
            CompareOperator::LessEqual => "<=",
        }
    }
}

/// every expression form of the language; MetaT is LocationMeta after parsing
/// and TypeMeta after type checking
#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind<MetaT> {
    /// digits as written in the source
    LitInt { val: String },
    LitFloat { val: f64 },
    LitStr { val: String },
    LitBool { val: bool },
    Object { ident: Symbol },
    Assign { ident: Symbol, expr: Box<Expression<MetaT>> },
    Dispatch {
        receiver: Box<Expression<MetaT>>,
        method: Symbol,
        args: Vec<Expression<MetaT>>,
    },
    StaticDispatch {
        receiver: Box<Expression<MetaT>>,
        class: Symbol,
        method: Symbol,
        args: Vec<Expression<MetaT>>,
    },
    Cond {
        pred: Box<Expression<MetaT>>,
        then_expr: Box<Expression<MetaT>>,
        else_expr: Box<Expression<MetaT>>,
    },
    Loop { pred: Box<Expression<MetaT>>, body: Box<Expression<MetaT>> },
    Block { body: Vec<Expression<MetaT>> },
    Let {
        ident: Symbol,
        t: Symbol,
        init: Option<Box<Expression<MetaT>>>,
        body: Box<Expression<MetaT>>,
    },
    Case { scrutinee: Box<Expression<MetaT>>, branches: Vec<CaseBranch<MetaT>> },
    Arith {
        op: ArithOperator,
        left: Box<Expression<MetaT>>,
        right: Box<Expression<MetaT>>,
    },
    Compare {
        op: CompareOperator,
        left: Box<Expression<MetaT>>,
        right: Box<Expression<MetaT>>,
    },
    Equal { left: Box<Expression<MetaT>>, right: Box<Expression<MetaT>> },
    Unary { op: UnaryOperator, arg: Box<Expression<MetaT>> },
    IsVoid { arg: Box<Expression<MetaT>> },
    New { t: Symbol },
}

pub type Expression<MetaT> = AstItem<ExpressionKind<MetaT>, MetaT>;

#[derive(Debug, PartialEq, Clone)]
pub struct CaseBranchItem<MetaT> {
    pub ident: Symbol,
    pub t: Symbol,
    pub body: Box<Expression<MetaT>>,
}

pub type CaseBranch<MetaT> = AstItem<CaseBranchItem<MetaT>, LocationMeta>;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct FormalItem {
    pub ident: Symbol,
    pub t: Symbol,
}

pub type Formal = AstItem<FormalItem, LocationMeta>;

impl Keyed for FormalItem {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct AttributeItem<MetaT> {
    pub ident: Symbol,
    pub t: Symbol,
    pub init: Option<Box<Expression<MetaT>>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodItem<MetaT> {
    pub ident: Symbol,
    pub formals: Vec<Formal>,
    pub ret: Symbol,
    /// None only for methods of the basic classes
    pub body: Option<Box<Expression<MetaT>>>,
}

impl<MetaT> MethodItem<MetaT> {
    /// declared types of all formals, in order
    pub fn formal_types(&self) -> Vec<Symbol> {
        self.formals.iter().map(|formal| formal.item.t).collect()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum FeatureKind<MetaT> {
    Attribute(AttributeItem<MetaT>),
    Method(MethodItem<MetaT>),
}

pub type Feature<MetaT> = AstItem<FeatureKind<MetaT>, LocationMeta>;

impl<MetaT> Keyed for FeatureKind<MetaT> {
    fn get_key(&self) -> Symbol {
        match self {
            FeatureKind::Attribute(attr) => attr.ident,
            FeatureKind::Method(method) => method.ident,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassItem<MetaT> {
    ident: Symbol,
    /// None only for the root of the hierarchy
    pub parent: Option<Symbol>,
    pub features: Vec<Feature<MetaT>>,
    /// name of the source file the class was declared in
    pub file: String,
}

pub type Class<MetaT> = AstItem<ClassItem<MetaT>, LocationMeta>;

impl<MetaT> ClassItem<MetaT> {
    pub fn new(ident: Symbol, parent: Option<Symbol>, features: Vec<Feature<MetaT>>, file: &str) -> Self {
        Self { ident, parent, features, file: String::from(file) }
    }

    pub fn methods(&self) -> impl Iterator<Item=&MethodItem<MetaT>> {
        self.features.iter().filter_map(|feature| match &feature.item {
            FeatureKind::Method(method) => Option::Some(method),
            FeatureKind::Attribute(_) => Option::None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item=&AttributeItem<MetaT>> {
        self.features.iter().filter_map(|feature| match &feature.item {
            FeatureKind::Attribute(attr) => Option::Some(attr),
            FeatureKind::Method(_) => Option::None,
        })
    }

    pub fn get_method(&self, ident: Symbol) -> Option<&MethodItem<MetaT>> {
        self.methods().find(|method| method.ident == ident)
    }

    pub fn get_attribute(&self, ident: Symbol) -> Option<&AttributeItem<MetaT>> {
        self.attributes().find(|attr| attr.ident == ident)
    }
}

impl<MetaT> Keyed for ClassItem<MetaT> {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

/// the result of parsing and all subsequent operations (ast root)
#[derive(Debug, PartialEq, Clone)]
pub struct Program<MetaT> {
    pub classes: Vec<Class<MetaT>>,
}

impl<MetaT> Program<MetaT> {
    pub fn new(classes: Vec<Class<MetaT>>) -> Self {
        Self { classes }
    }

    pub fn get_class(&self, ident: Symbol) -> Option<&Class<MetaT>> {
        self.classes.iter().find(|cls| cls.get_key() == ident)
    }
}

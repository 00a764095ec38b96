#![allow(dead_code)]

use cool::config::SemantConfig;
use cool::frontend::ast::*;
use cool::frontend::error::{Diagnostics, SemantErrorKind};
use cool::frontend::typechecker::{check_types, CheckedProgram, ClassRegistry, TypeChecker};
use cool::meta::{GetType, LocationMeta};
use cool::util::mapper::AstMapper;
use cool::util::symbol::{IdTable, Symbol};

pub const FILE: &str = "test.cl";

pub type Expr = Expression<LocationMeta>;

fn at(line: u32, kind: ExpressionKind<LocationMeta>) -> Expr {
    Expression::new(kind, LocationMeta::from(line))
}

fn e(kind: ExpressionKind<LocationMeta>) -> Expr {
    at(1, kind)
}

pub fn int(val: i64) -> Expr {
    e(ExpressionKind::LitInt { val: val.to_string() })
}

pub fn float(val: f64) -> Expr {
    e(ExpressionKind::LitFloat { val })
}

pub fn boolean(val: bool) -> Expr {
    e(ExpressionKind::LitBool { val })
}

pub fn string(val: &str) -> Expr {
    e(ExpressionKind::LitStr { val: String::from(val) })
}

pub fn object(ident: Symbol) -> Expr {
    e(ExpressionKind::Object { ident })
}

pub fn self_object() -> Expr {
    object(Symbol::SELF)
}

pub fn new(t: Symbol) -> Expr {
    e(ExpressionKind::New { t })
}

pub fn assign(ident: Symbol, expr: Expr) -> Expr {
    e(ExpressionKind::Assign { ident, expr: Box::new(expr) })
}

pub fn dispatch(receiver: Expr, method: Symbol, args: Vec<Expr>) -> Expr {
    e(ExpressionKind::Dispatch { receiver: Box::new(receiver), method, args })
}

pub fn static_dispatch(receiver: Expr, class: Symbol, method: Symbol, args: Vec<Expr>) -> Expr {
    e(ExpressionKind::StaticDispatch { receiver: Box::new(receiver), class, method, args })
}

pub fn cond(pred: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
    e(ExpressionKind::Cond {
        pred: Box::new(pred),
        then_expr: Box::new(then_expr),
        else_expr: Box::new(else_expr),
    })
}

pub fn while_loop(pred: Expr, body: Expr) -> Expr {
    e(ExpressionKind::Loop { pred: Box::new(pred), body: Box::new(body) })
}

pub fn block(body: Vec<Expr>) -> Expr {
    e(ExpressionKind::Block { body })
}

pub fn let_in(ident: Symbol, t: Symbol, init: Option<Expr>, body: Expr) -> Expr {
    e(ExpressionKind::Let { ident, t, init: init.map(Box::new), body: Box::new(body) })
}

pub fn case(scrutinee: Expr, branches: Vec<(Symbol, Symbol, Expr)>) -> Expr {
    let branches = branches.into_iter()
        .map(|(ident, t, body)| {
            CaseBranch::new(CaseBranchItem { ident, t, body: Box::new(body) }, LocationMeta::from(1))
        })
        .collect();
    e(ExpressionKind::Case { scrutinee: Box::new(scrutinee), branches })
}

pub fn plus(left: Expr, right: Expr) -> Expr {
    e(ExpressionKind::Arith { op: ArithOperator::Plus, left: Box::new(left), right: Box::new(right) })
}

pub fn less(left: Expr, right: Expr) -> Expr {
    e(ExpressionKind::Compare { op: CompareOperator::Less, left: Box::new(left), right: Box::new(right) })
}

pub fn equal(left: Expr, right: Expr) -> Expr {
    e(ExpressionKind::Equal { left: Box::new(left), right: Box::new(right) })
}

pub fn neg(arg: Expr) -> Expr {
    e(ExpressionKind::Unary { op: UnaryOperator::Neg, arg: Box::new(arg) })
}

pub fn not(arg: Expr) -> Expr {
    e(ExpressionKind::Unary { op: UnaryOperator::Not, arg: Box::new(arg) })
}

pub fn isvoid(arg: Expr) -> Expr {
    e(ExpressionKind::IsVoid { arg: Box::new(arg) })
}

pub fn attr(ident: Symbol, t: Symbol, init: Option<Expr>) -> Feature<LocationMeta> {
    let item = AttributeItem { ident, t, init: init.map(Box::new) };
    Feature::new(FeatureKind::Attribute(item), LocationMeta::from(1))
}

pub fn method(ident: Symbol, formals: Vec<(Symbol, Symbol)>, ret: Symbol, body: Expr) -> Feature<LocationMeta> {
    let formals = formals.into_iter()
        .map(|(ident, t)| Formal::new(FormalItem { ident, t }, LocationMeta::from(1)))
        .collect();
    let item = MethodItem { ident, formals, ret, body: Some(Box::new(body)) };
    Feature::new(FeatureKind::Method(item), LocationMeta::from(1))
}

pub fn class(ident: Symbol, parent: Symbol, features: Vec<Feature<LocationMeta>>) -> Class<LocationMeta> {
    Class::new(ClassItem::new(ident, Some(parent), features, FILE), LocationMeta::from(1))
}

/// run the whole analysis with default configuration
pub fn analyze(ids: &IdTable, classes: Vec<Class<LocationMeta>>) -> Result<CheckedProgram, Diagnostics> {
    check_types(Program::new(classes), ids, &SemantConfig::default())
}

/// errors of a program that is expected to fail
pub fn errors_of(ids: &IdTable, classes: Vec<Class<LocationMeta>>) -> Vec<SemantErrorKind> {
    match analyze(ids, classes) {
        Ok(_) => Vec::new(),
        Err(diagnostics) => diagnostics.into_vec().into_iter().map(|e| e.item).collect(),
    }
}

/// inferred type of the body of given method
pub fn body_type(program: &CheckedProgram, cls: Symbol, method: Symbol) -> Option<Symbol> {
    program.get_class(cls)?
        .item
        .get_method(method)?
        .body
        .as_ref()
        .map(|body| body.get_type())
}

/// checks types of all classes even if some checks fail, returns the checked program with all errors
pub fn check_with_errors(ids: &IdTable, classes: Vec<Class<LocationMeta>>) -> (CheckedProgram, Vec<SemantErrorKind>) {
    let mut registry = ClassRegistry::with_builtins();
    for cls in classes {
        registry.register(cls, ids).expect("class should be registered");
    }
    let mut checker = TypeChecker::new(&registry, ids);
    let program = checker.map_classes(registry.user_classes());
    let errors = checker.into_diagnostics().into_vec().into_iter().map(|e| e.item).collect();
    (program, errors)
}

/// wraps expression into method `test` of class `Test`, returns its inferred type and all errors
pub fn check_expression(
    ids: &mut IdTable, mut classes: Vec<Class<LocationMeta>>, expr: Expr,
) -> (Symbol, Vec<SemantErrorKind>) {
    let test_cls = ids.intern("Test");
    let test_method = ids.intern("test");
    classes.push(class(test_cls, Symbol::OBJECT, vec![method(test_method, vec![], Symbol::OBJECT, expr)]));
    let (program, errors) = check_with_errors(ids, classes);
    let t = body_type(&program, test_cls, test_method).expect("test method should be checked");
    (t, errors)
}

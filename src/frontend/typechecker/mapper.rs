use rustc_hash::FxHashSet;
use tracing::trace;

use crate::frontend::ast::*;
use crate::frontend::error::SemantErrorKind;
use crate::frontend::typechecker::typechecker::TypeChecker;
use crate::meta::{GetLocation, GetType, LocationMeta, TypeMeta};
use crate::util::mapper::AstMapper;
use crate::util::symbol::Symbol;

/// the only 2 numeric types, arithmetic is defined only when both operands have the same one
fn numeric_result(left: Symbol, right: Symbol) -> Option<Symbol> {
    match (left, right) {
        (Symbol::INT, Symbol::INT) => Option::Some(Symbol::INT),
        (Symbol::FLOAT, Symbol::FLOAT) => Option::Some(Symbol::FLOAT),
        _ => Option::None,
    }
}

impl TypeChecker<'_> {
    fn map_boxed(&mut self, expr: &Expression<LocationMeta>) -> Box<Expression<TypeMeta>> {
        Box::new(self.map_expression(expr))
    }

    fn map_args(&mut self, args: &[Expression<LocationMeta>]) -> Vec<Expression<TypeMeta>> {
        args.iter().map(|arg| self.map_expression(arg)).collect()
    }

    /// type of a dispatch result: SELF_TYPE return is replaced with the receiver type
    fn dispatch_result(ret: Option<Symbol>, receiver_t: Symbol) -> Symbol {
        match ret {
            Some(Symbol::SELF_TYPE) => receiver_t,
            Some(t) => t,
            None => Symbol::OBJECT,
        }
    }
}

impl AstMapper<LocationMeta, TypeMeta> for TypeChecker<'_> {
    fn map_expression(&mut self, expr: &Expression<LocationMeta>) -> Expression<TypeMeta> {
        let line = expr.get_location().line;
        let (kind, t) = match &expr.item {
            ExpressionKind::LitInt { val } => {
                (ExpressionKind::LitInt { val: val.clone() }, Symbol::INT)
            }
            ExpressionKind::LitFloat { val } => {
                (ExpressionKind::LitFloat { val: *val }, Symbol::FLOAT)
            }
            ExpressionKind::LitStr { val } => {
                (ExpressionKind::LitStr { val: val.clone() }, Symbol::STRING)
            }
            ExpressionKind::LitBool { val } => {
                (ExpressionKind::LitBool { val: *val }, Symbol::BOOL)
            }
            ExpressionKind::Object { ident } => {
                let t = match self.get_variable(*ident) {
                    Some(t) => t,
                    None => {
                        let kind = SemantErrorKind::UndeclaredIdentifier { ident: self.name(*ident) };
                        self.report(kind, line);
                        Symbol::OBJECT
                    }
                };
                (ExpressionKind::Object { ident: *ident }, t)
            }
            ExpressionKind::Assign { ident, expr: rhs } => {
                let mapped_rhs = self.map_boxed(rhs);
                let rhs_t = mapped_rhs.get_type();
                let t = if *ident == Symbol::SELF {
                    self.report(SemantErrorKind::SelfAssignment, line);
                    rhs_t
                } else {
                    match self.get_variable(*ident) {
                        None => {
                            let kind = SemantErrorKind::AssignToUndeclared { ident: self.name(*ident) };
                            self.report(kind, line);
                            Symbol::OBJECT
                        }
                        Some(declared) => {
                            if !self.check_assignment(declared, rhs_t) {
                                let kind = SemantErrorKind::AssignmentNonConforming {
                                    ident: self.name(*ident),
                                    actual: self.name(rhs_t),
                                    declared: self.name(declared),
                                };
                                self.report(kind, line);
                            }
                            declared
                        }
                    }
                };
                (ExpressionKind::Assign { ident: *ident, expr: mapped_rhs }, t)
            }
            ExpressionKind::Dispatch { receiver, method, args } => {
                let mapped_receiver = self.map_boxed(receiver);
                let mapped_args = self.map_args(args);
                let receiver_t = mapped_receiver.get_type();
                // methods of SELF_TYPE are looked up in the enclosing class
                let dispatch_t = if receiver_t == Symbol::SELF_TYPE {
                    self.get_current_class()
                } else {
                    receiver_t
                };
                let ret = self.check_call(line, dispatch_t, *method, &mapped_args);
                let t = Self::dispatch_result(ret, receiver_t);
                let mapped_kind = ExpressionKind::Dispatch {
                    receiver: mapped_receiver,
                    method: *method,
                    args: mapped_args,
                };
                (mapped_kind, t)
            }
            ExpressionKind::StaticDispatch { receiver, class, method, args } => {
                let mapped_receiver = self.map_boxed(receiver);
                let mapped_args = self.map_args(args);
                let receiver_t = mapped_receiver.get_type();
                let t = if *class == Symbol::SELF_TYPE || !self.registry().contains(*class) {
                    let kind = SemantErrorKind::UndefinedStaticDispatchType { t: self.name(*class) };
                    self.report(kind, line);
                    Symbol::OBJECT
                } else {
                    if !self.check_assignment(*class, receiver_t) {
                        let kind = SemantErrorKind::StaticDispatchNonConforming {
                            actual: self.name(receiver_t),
                            t: self.name(*class),
                        };
                        self.report(kind, line);
                    }
                    let ret = self.check_call(line, *class, *method, &mapped_args);
                    Self::dispatch_result(ret, *class)
                };
                let mapped_kind = ExpressionKind::StaticDispatch {
                    receiver: mapped_receiver,
                    class: *class,
                    method: *method,
                    args: mapped_args,
                };
                (mapped_kind, t)
            }
            ExpressionKind::Cond { pred, then_expr, else_expr } => {
                let mapped_pred = self.map_boxed(pred);
                if mapped_pred.get_type() != Symbol::BOOL {
                    self.report(SemantErrorKind::NonBoolCondPredicate, line);
                }
                let mapped_then = self.map_boxed(then_expr);
                let mapped_else = self.map_boxed(else_expr);
                let t = self.get_types_lca(mapped_then.get_type(), mapped_else.get_type());
                let mapped_kind = ExpressionKind::Cond {
                    pred: mapped_pred,
                    then_expr: mapped_then,
                    else_expr: mapped_else,
                };
                (mapped_kind, t)
            }
            ExpressionKind::Loop { pred, body } => {
                let mapped_pred = self.map_boxed(pred);
                if mapped_pred.get_type() != Symbol::BOOL {
                    self.report(SemantErrorKind::NonBoolLoopPredicate, line);
                }
                let mapped_body = self.map_boxed(body);
                (ExpressionKind::Loop { pred: mapped_pred, body: mapped_body }, Symbol::OBJECT)
            }
            ExpressionKind::Block { body } => {
                let mapped_body = self.map_args(body);
                let t = mapped_body.last().map_or(Symbol::OBJECT, |last| last.get_type());
                (ExpressionKind::Block { body: mapped_body }, t)
            }
            ExpressionKind::Let { ident, t: declared, init, body } => {
                let binding_t = if self.is_declared_type(*declared) {
                    *declared
                } else {
                    let kind = SemantErrorKind::UndefinedLetType {
                        ident: self.name(*ident),
                        t: self.name(*declared),
                    };
                    self.report(kind, line);
                    Symbol::OBJECT
                };
                // initializer is checked before the new binding is visible
                let mapped_init = init.as_ref().map(|init| self.map_boxed(init));
                if let Some(init_t) = mapped_init.as_ref().map(|init| init.get_type()) {
                    if !self.check_assignment(binding_t, init_t) {
                        let kind = SemantErrorKind::LetInitNonConforming {
                            ident: self.name(*ident),
                            actual: self.name(init_t),
                            declared: self.name(binding_t),
                        };
                        self.report(kind, line);
                    }
                }
                let ident = *ident;
                let mapped_body = self.in_scope(|checker| {
                    if ident == Symbol::SELF {
                        checker.report(SemantErrorKind::SelfLetBinding, line);
                    } else {
                        checker.add_variable(ident, binding_t);
                    }
                    checker.map_boxed(body)
                });
                let t = mapped_body.get_type();
                let mapped_kind = ExpressionKind::Let {
                    ident,
                    t: *declared,
                    init: mapped_init,
                    body: mapped_body,
                };
                (mapped_kind, t)
            }
            ExpressionKind::Case { scrutinee, branches } => {
                let mapped_scrutinee = self.map_boxed(scrutinee);
                let mut seen_types = FxHashSet::default();
                for branch in branches.iter() {
                    let branch_t = branch.item.t;
                    if !seen_types.insert(branch_t) {
                        let kind = SemantErrorKind::DuplicateCaseBranch { t: self.name(branch_t) };
                        self.report(kind, branch.get_location().line);
                    }
                }
                let mapped_branches: Vec<_> = branches.iter()
                    .map(|branch| self.map_case_branch(branch))
                    .collect();
                let t = mapped_branches.iter()
                    .map(|branch| branch.item.body.get_type())
                    .fold(Option::None, |acc, t| match acc {
                        None => Option::Some(t),
                        Some(acc) => Option::Some(self.get_types_lca(acc, t)),
                    })
                    .unwrap_or(Symbol::OBJECT);
                let mapped_kind = ExpressionKind::Case {
                    scrutinee: mapped_scrutinee,
                    branches: mapped_branches,
                };
                (mapped_kind, t)
            }
            ExpressionKind::Arith { op, left, right } => {
                let mapped_left = self.map_boxed(left);
                let mapped_right = self.map_boxed(right);
                let (left_t, right_t) = (mapped_left.get_type(), mapped_right.get_type());
                let t = match numeric_result(left_t, right_t) {
                    Some(t) => t,
                    None => {
                        let kind = SemantErrorKind::NonNumericOperands {
                            op: String::from(op.symbol()),
                            left: self.name(left_t),
                            right: self.name(right_t),
                        };
                        self.report(kind, line);
                        Symbol::INT
                    }
                };
                (ExpressionKind::Arith { op: *op, left: mapped_left, right: mapped_right }, t)
            }
            ExpressionKind::Compare { op, left, right } => {
                let mapped_left = self.map_boxed(left);
                let mapped_right = self.map_boxed(right);
                let (left_t, right_t) = (mapped_left.get_type(), mapped_right.get_type());
                if numeric_result(left_t, right_t).is_none() {
                    let kind = SemantErrorKind::NonNumericOperands {
                        op: String::from(op.symbol()),
                        left: self.name(left_t),
                        right: self.name(right_t),
                    };
                    self.report(kind, line);
                }
                (ExpressionKind::Compare { op: *op, left: mapped_left, right: mapped_right }, Symbol::BOOL)
            }
            ExpressionKind::Equal { left, right } => {
                let mapped_left = self.map_boxed(left);
                let mapped_right = self.map_boxed(right);
                let (left_t, right_t) = (mapped_left.get_type(), mapped_right.get_type());
                if (left_t.is_primitive() || right_t.is_primitive()) && left_t != right_t {
                    self.report(SemantErrorKind::IllegalComparison, line);
                }
                (ExpressionKind::Equal { left: mapped_left, right: mapped_right }, Symbol::BOOL)
            }
            ExpressionKind::Unary { op, arg } => {
                let mapped_arg = self.map_boxed(arg);
                let arg_t = mapped_arg.get_type();
                let t = match (op, arg_t) {
                    (UnaryOperator::Neg, Symbol::INT) | (UnaryOperator::Neg, Symbol::FLOAT) => arg_t,
                    (UnaryOperator::Neg, _) => {
                        let kind = SemantErrorKind::NonNumericNegation { actual: self.name(arg_t) };
                        self.report(kind, line);
                        Symbol::INT
                    }
                    (UnaryOperator::Not, Symbol::BOOL) => Symbol::BOOL,
                    (UnaryOperator::Not, _) => {
                        let kind = SemantErrorKind::NonBoolNegation { actual: self.name(arg_t) };
                        self.report(kind, line);
                        Symbol::BOOL
                    }
                };
                (ExpressionKind::Unary { op: *op, arg: mapped_arg }, t)
            }
            ExpressionKind::IsVoid { arg } => {
                let mapped_arg = self.map_boxed(arg);
                (ExpressionKind::IsVoid { arg: mapped_arg }, Symbol::BOOL)
            }
            ExpressionKind::New { t } => {
                let new_t = if self.is_declared_type(*t) {
                    *t
                } else {
                    let kind = SemantErrorKind::UndefinedNewType { t: self.name(*t) };
                    self.report(kind, line);
                    Symbol::OBJECT
                };
                (ExpressionKind::New { t: *t }, new_t)
            }
        };
        trace!(line, t = self.name(t).as_str(), "inferred expression type");
        Expression::new(kind, TypeMeta { line, t })
    }

    fn map_case_branch(&mut self, branch: &CaseBranch<LocationMeta>) -> CaseBranch<TypeMeta> {
        let loc = branch.get_location();
        let CaseBranchItem { ident, t, body } = &branch.item;
        let binding_t = if *t == Symbol::SELF_TYPE {
            let kind = SemantErrorKind::SelfTypeCaseBranch { ident: self.name(*ident) };
            self.report(kind, loc.line);
            Symbol::OBJECT
        } else if !self.registry().contains(*t) {
            let kind = SemantErrorKind::UndefinedCaseType { t: self.name(*t) };
            self.report(kind, loc.line);
            Symbol::OBJECT
        } else {
            *t
        };
        let ident = *ident;
        let mapped_body = self.in_scope(|checker| {
            if ident == Symbol::SELF {
                checker.report(SemantErrorKind::SelfCaseBinding, loc.line);
            } else {
                checker.add_variable(ident, binding_t);
            }
            checker.map_boxed(body)
        });
        CaseBranch::new(CaseBranchItem { ident, t: *t, body: mapped_body }, loc)
    }

    fn map_feature(&mut self, feature: &Feature<LocationMeta>) -> Feature<TypeMeta> {
        let loc = feature.get_location();
        let mapped_kind = match &feature.item {
            FeatureKind::Attribute(attr) => FeatureKind::Attribute(self.check_attribute(attr, loc.line)),
            FeatureKind::Method(method) => FeatureKind::Method(self.check_method(method, loc.line)),
        };
        Feature::new(mapped_kind, loc)
    }

    fn map_class(&mut self, class: &Class<LocationMeta>) -> Class<TypeMeta> {
        self.with_class(class);

        // attributes first, so that every method body sees all of them
        let mut mapped: Vec<Option<Feature<TypeMeta>>> = vec![Option::None; class.item.features.len()];
        for (idx, feature) in class.item.features.iter().enumerate() {
            if let FeatureKind::Attribute(_) = feature.item {
                mapped[idx] = Option::Some(self.map_feature(feature));
            }
        }
        for (idx, feature) in class.item.features.iter().enumerate() {
            if let FeatureKind::Method(_) = feature.item {
                mapped[idx] = Option::Some(self.map_feature(feature));
            }
        }
        let features: Vec<Feature<TypeMeta>> = mapped.into_iter().flatten().collect();

        let item = ClassItem::new(class.get_key(), class.item.parent, features, &class.item.file);
        Class::new(item, class.get_location())
    }
}

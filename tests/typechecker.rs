extern crate cool;
extern crate rstest;

use rstest::rstest;

use cool::config::SemantConfig;
use cool::frontend::ast::Program;
use cool::frontend::error::SemantErrorKind;
use cool::frontend::typechecker::check_types;
use cool::util::symbol::{IdTable, Symbol};

mod common;

use common::*;

#[test]
fn self_type_return_takes_receiver_type() {
    let mut ids = IdTable::new();
    let (a, b, foo) = (ids.intern("A"), ids.intern("B"), ids.intern("foo"));
    let classes = vec![
        class(a, Symbol::OBJECT, vec![method(foo, vec![], Symbol::SELF_TYPE, self_object())]),
        class(b, a, vec![]),
    ];
    let (t, errors) = check_expression(&mut ids, classes, dispatch(new(b), foo, vec![]));
    assert_eq!(errors, vec![]);
    assert_eq!(t, b);
}

#[test]
fn self_type_is_kept_for_dispatch_on_self() {
    let mut ids = IdTable::new();
    let (a, foo, bar) = (ids.intern("A"), ids.intern("foo"), ids.intern("bar"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        method(foo, vec![], Symbol::SELF_TYPE, self_object()),
        method(bar, vec![], Symbol::SELF_TYPE, dispatch(self_object(), foo, vec![])),
    ])];
    let (program, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![]);
    assert_eq!(body_type(&program, a, bar), Some(Symbol::SELF_TYPE));
}

#[test]
fn conditional_branches_are_joined() {
    let mut ids = IdTable::new();
    let expr = cond(boolean(true), int(1), string("s"));
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![]);
    assert_eq!(t, Symbol::OBJECT);
}

#[test]
fn let_initializer_mismatch_is_reported_once() {
    let mut ids = IdTable::new();
    let x = ids.intern("x");
    let expr = let_in(x, Symbol::INT, Some(boolean(true)), plus(object(x), int(1)));
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![SemantErrorKind::LetInitNonConforming {
        ident: String::from("x"),
        actual: String::from("Bool"),
        declared: String::from("Int"),
    }]);
    assert_eq!(t, Symbol::INT);
}

#[test]
fn let_binding_is_not_visible_in_its_initializer() {
    let mut ids = IdTable::new();
    let x = ids.intern("x");
    let expr = let_in(x, Symbol::OBJECT, Some(object(x)), object(x));
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![SemantErrorKind::UndeclaredIdentifier { ident: String::from("x") }]);
    assert_eq!(t, Symbol::OBJECT);
}

#[test]
fn undefined_method_is_reported_once() {
    let mut ids = IdTable::new();
    let (a, nope) = (ids.intern("A"), ids.intern("nope"));
    let classes = vec![class(a, Symbol::OBJECT, vec![])];
    let expr = dispatch(new(a), nope, vec![int(1), plus(int(1), int(2))]);
    let (t, errors) = check_expression(&mut ids, classes, expr);
    assert_eq!(errors, vec![SemantErrorKind::UndefinedMethod { method: String::from("nope") }]);
    assert_eq!(t, Symbol::OBJECT);
}

#[test]
fn arguments_are_checked_after_arity_error() {
    let mut ids = IdTable::new();
    let (a, foo, n) = (ids.intern("A"), ids.intern("foo"), ids.intern("n"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        method(foo, vec![(n, Symbol::INT)], Symbol::INT, object(n)),
    ])];
    let expr = dispatch(new(a), foo, vec![string("x"), int(2)]);
    let (t, errors) = check_expression(&mut ids, classes, expr);
    assert_eq!(errors, vec![
        SemantErrorKind::ArgumentCount { method: String::from("foo") },
        SemantErrorKind::ArgumentNonConforming {
            method: String::from("foo"),
            index: 0,
            actual: String::from("String"),
            declared: String::from("Int"),
        },
    ]);
    assert_eq!(t, Symbol::INT);
}

#[test]
fn static_dispatch_uses_named_class() {
    let mut ids = IdTable::new();
    let (a, b, foo) = (ids.intern("A"), ids.intern("B"), ids.intern("foo"));
    let classes = vec![
        class(a, Symbol::OBJECT, vec![method(foo, vec![], Symbol::SELF_TYPE, self_object())]),
        class(b, a, vec![]),
    ];
    let (t, errors) = check_expression(&mut ids, classes, static_dispatch(new(b), a, foo, vec![]));
    assert_eq!(errors, vec![]);
    assert_eq!(t, a);
}

#[test]
fn static_dispatch_on_self_is_rewritten_to_named_class() {
    let mut ids = IdTable::new();
    let (a, foo, bar) = (ids.intern("A"), ids.intern("foo"), ids.intern("bar"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        method(foo, vec![], Symbol::SELF_TYPE, self_object()),
        method(bar, vec![], Symbol::OBJECT, static_dispatch(self_object(), a, foo, vec![])),
    ])];
    let (program, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![]);
    assert_eq!(body_type(&program, a, bar), Some(a));
}

#[test]
fn static_dispatch_receiver_has_to_conform() {
    let mut ids = IdTable::new();
    let (a, b, foo) = (ids.intern("A"), ids.intern("B"), ids.intern("foo"));
    let classes = vec![
        class(a, Symbol::OBJECT, vec![method(foo, vec![], Symbol::INT, int(1))]),
        class(b, a, vec![]),
    ];
    let (t, errors) = check_expression(&mut ids, classes, static_dispatch(new(a), b, foo, vec![]));
    assert_eq!(errors, vec![SemantErrorKind::StaticDispatchNonConforming {
        actual: String::from("A"),
        t: String::from("B"),
    }]);
    assert_eq!(t, Symbol::INT);
}

#[rstest]
#[case(Symbol::SELF_TYPE, "SELF_TYPE")]
#[case(Symbol::NO_TYPE, "_no_type")]
fn static_dispatch_to_invalid_type_skips_lookup(#[case] target: Symbol, #[case] name: &str) {
    let mut ids = IdTable::new();
    let expr = static_dispatch(self_object(), target, Symbol::COPY, vec![]);
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![SemantErrorKind::UndefinedStaticDispatchType { t: String::from(name) }]);
    assert_eq!(t, Symbol::OBJECT);
}

#[test]
fn self_type_method_must_return_self_type() {
    let mut ids = IdTable::new();
    let (a, good, bad) = (ids.intern("A"), ids.intern("good"), ids.intern("bad"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        method(good, vec![], Symbol::SELF_TYPE, self_object()),
        method(bad, vec![], Symbol::SELF_TYPE, new(a)),
    ])];
    let (_, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![SemantErrorKind::ReturnNonConforming {
        method: String::from("bad"),
        actual: String::from("A"),
        declared: String::from("SELF_TYPE"),
    }]);
}

#[test]
fn identical_override_is_accepted() {
    let mut ids = IdTable::new();
    let (a, b, foo, n) = (ids.intern("A"), ids.intern("B"), ids.intern("foo"), ids.intern("n"));
    let classes = vec![
        class(a, Symbol::OBJECT, vec![method(foo, vec![(n, Symbol::INT)], Symbol::INT, object(n))]),
        class(b, a, vec![method(foo, vec![(n, Symbol::INT)], Symbol::INT, int(0))]),
    ];
    assert!(analyze(&ids, classes).is_ok());
}

#[rstest]
#[case(vec![Symbol::INT, Symbol::INT], Symbol::INT, SemantErrorKind::OverrideArity { method: String::from("foo") })]
#[case(vec![Symbol::OBJECT], Symbol::INT, SemantErrorKind::OverrideFormalType {
    method: String::from("foo"),
    actual: String::from("Object"),
    original: String::from("Int"),
})]
#[case(vec![Symbol::INT], Symbol::OBJECT, SemantErrorKind::OverrideReturnType {
    method: String::from("foo"),
    actual: String::from("Object"),
    original: String::from("Int"),
})]
fn incompatible_override_is_reported(
    #[case] formal_types: Vec<Symbol>, #[case] ret: Symbol, #[case] expected: SemantErrorKind,
) {
    let mut ids = IdTable::new();
    let (a, b, foo, n) = (ids.intern("A"), ids.intern("B"), ids.intern("foo"), ids.intern("n"));
    let formals: Vec<(Symbol, Symbol)> = formal_types.into_iter()
        .enumerate()
        .map(|(idx, t)| (ids.intern(&format!("arg{}", idx)), t))
        .collect();
    let classes = vec![
        class(a, Symbol::OBJECT, vec![method(foo, vec![(n, Symbol::INT)], Symbol::INT, int(0))]),
        class(b, a, vec![method(foo, formals, ret, int(0))]),
    ];
    assert_eq!(errors_of(&ids, classes), vec![expected]);
}

#[test]
fn hierarchy_errors_stop_before_type_checking() {
    let mut ids = IdTable::new();
    let (a, b, c, zorp, x) = (ids.intern("A"), ids.intern("B"), ids.intern("C"), ids.intern("Zorp"), ids.intern("x"));
    let classes = vec![
        class(a, b, vec![]),
        class(b, a, vec![]),
        class(c, zorp, vec![method(x, vec![], Symbol::INT, object(x))]),
    ];
    let errors = errors_of(&ids, classes);
    assert_eq!(errors, vec![
        SemantErrorKind::InheritanceCycle { class: String::from("A") },
        SemantErrorKind::InheritanceCycle { class: String::from("B") },
        SemantErrorKind::UndefinedParent { class: String::from("C"), parent: String::from("Zorp") },
    ]);
}

#[test]
fn primitive_parent_is_rejected() {
    let mut ids = IdTable::new();
    let a = ids.intern("A");
    assert_eq!(errors_of(&ids, vec![class(a, Symbol::INT, vec![])]), vec![
        SemantErrorKind::PrimitiveInheritance { class: String::from("A"), parent: String::from("Int") },
    ]);
}

#[test]
fn inherited_attributes_are_visible() {
    let mut ids = IdTable::new();
    let (a, b, x, get) = (ids.intern("A"), ids.intern("B"), ids.intern("x"), ids.intern("get"));
    let classes = vec![
        class(a, Symbol::OBJECT, vec![attr(x, Symbol::STRING, Some(string("a")))]),
        class(b, a, vec![method(get, vec![], Symbol::STRING, object(x))]),
    ];
    let program = analyze(&ids, classes).expect("program should be correct");
    assert_eq!(body_type(&program, b, get), Some(Symbol::STRING));
}

#[test]
fn attribute_errors_are_accumulated() {
    let mut ids = IdTable::new();
    let (a, b, x, y, z, zorp) = (
        ids.intern("A"), ids.intern("B"), ids.intern("x"), ids.intern("y"), ids.intern("z"), ids.intern("Zorp"),
    );
    let classes = vec![
        class(a, Symbol::OBJECT, vec![attr(x, Symbol::INT, None)]),
        class(b, a, vec![
            attr(x, Symbol::INT, None),
            attr(y, zorp, None),
            attr(y, Symbol::INT, None),
            attr(Symbol::SELF, Symbol::INT, None),
            // initializer does not see the attribute itself
            attr(z, Symbol::OBJECT, Some(object(z))),
        ]),
    ];
    let (_, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![
        SemantErrorKind::InheritedAttribute { attr: String::from("x") },
        SemantErrorKind::UndefinedAttributeType { attr: String::from("y"), t: String::from("Zorp") },
        SemantErrorKind::DuplicateAttribute { attr: String::from("y") },
        SemantErrorKind::SelfAttribute,
        SemantErrorKind::UndeclaredIdentifier { ident: String::from("z") },
    ]);
}

#[test]
fn ancestor_self_attribute_keeps_self_type_in_subclass() {
    let mut ids = IdTable::new();
    let (a, b, m) = (ids.intern("A"), ids.intern("B"), ids.intern("m"));
    let classes = vec![
        class(a, Symbol::OBJECT, vec![attr(Symbol::SELF, Symbol::INT, None)]),
        class(b, a, vec![method(m, vec![], Symbol::SELF_TYPE, self_object())]),
    ];
    let (program, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![SemantErrorKind::SelfAttribute]);
    assert_eq!(body_type(&program, b, m), Some(Symbol::SELF_TYPE));
}

#[test]
fn duplicate_attribute_is_rebound_with_latest_type() {
    let mut ids = IdTable::new();
    let (a, x, get) = (ids.intern("A"), ids.intern("x"), ids.intern("get"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        attr(x, Symbol::INT, None),
        attr(x, Symbol::STRING, None),
        method(get, vec![], Symbol::STRING, object(x)),
    ])];
    let (program, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![SemantErrorKind::DuplicateAttribute { attr: String::from("x") }]);
    assert_eq!(body_type(&program, a, get), Some(Symbol::STRING));
}

#[test]
fn formals_are_not_visible_in_other_methods() {
    let mut ids = IdTable::new();
    let (a, f, g, n) = (ids.intern("A"), ids.intern("f"), ids.intern("g"), ids.intern("n"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        method(f, vec![(n, Symbol::INT)], Symbol::INT, object(n)),
        method(g, vec![], Symbol::OBJECT, object(n)),
    ])];
    let (program, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![SemantErrorKind::UndeclaredIdentifier { ident: String::from("n") }]);
    assert_eq!(body_type(&program, a, g), Some(Symbol::OBJECT));
}

#[test]
fn let_and_case_bindings_end_with_their_body() {
    let mut ids = IdTable::new();
    let (x, y) = (ids.intern("x"), ids.intern("y"));
    let expr = block(vec![
        let_in(x, Symbol::INT, Some(int(1)), object(x)),
        object(x),
        case(int(2), vec![(y, Symbol::INT, object(y))]),
        object(y),
    ]);
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![
        SemantErrorKind::UndeclaredIdentifier { ident: String::from("x") },
        SemantErrorKind::UndeclaredIdentifier { ident: String::from("y") },
    ]);
    assert_eq!(t, Symbol::OBJECT);
}

#[test]
fn formals_are_validated() {
    let mut ids = IdTable::new();
    let (a, foo, bar, n) = (ids.intern("A"), ids.intern("foo"), ids.intern("bar"), ids.intern("n"));
    let classes = vec![class(a, Symbol::OBJECT, vec![
        method(foo, vec![(n, Symbol::INT), (n, Symbol::STRING)], Symbol::INT, object(n)),
        method(bar, vec![(Symbol::SELF, Symbol::INT), (n, Symbol::SELF_TYPE)], Symbol::OBJECT, object(n)),
        method(bar, vec![], Symbol::OBJECT, int(1)),
    ])];
    let (_, errors) = check_with_errors(&ids, classes);
    assert_eq!(errors, vec![
        SemantErrorKind::DuplicateFormal { formal: String::from("n") },
        SemantErrorKind::SelfFormal,
        SemantErrorKind::SelfTypeFormal { formal: String::from("n") },
        SemantErrorKind::DuplicateMethod { method: String::from("bar") },
    ]);
}

#[test]
fn assignment_yields_declared_type() {
    let mut ids = IdTable::new();
    let (a, b, x) = (ids.intern("A"), ids.intern("B"), ids.intern("x"));
    let classes = vec![class(a, Symbol::OBJECT, vec![]), class(b, a, vec![])];
    let expr = let_in(x, a, None, assign(x, new(b)));
    let (t, errors) = check_expression(&mut ids, classes, expr);
    assert_eq!(errors, vec![]);
    assert_eq!(t, a);
}

#[test]
fn assignment_errors() {
    let mut ids = IdTable::new();
    let (x, y) = (ids.intern("x"), ids.intern("y"));
    let expr = block(vec![
        let_in(x, Symbol::INT, None, assign(x, string("s"))),
        assign(Symbol::SELF, int(1)),
        assign(y, int(1)),
    ]);
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![
        SemantErrorKind::AssignmentNonConforming {
            ident: String::from("x"),
            actual: String::from("String"),
            declared: String::from("Int"),
        },
        SemantErrorKind::SelfAssignment,
        SemantErrorKind::AssignToUndeclared { ident: String::from("y") },
    ]);
    assert_eq!(t, Symbol::OBJECT);
}

#[test]
fn case_joins_branch_bodies() {
    let mut ids = IdTable::new();
    let (a, b, c, x) = (ids.intern("A"), ids.intern("B"), ids.intern("C"), ids.intern("x"));
    let classes = vec![class(a, Symbol::OBJECT, vec![]), class(b, a, vec![]), class(c, a, vec![])];
    let expr = case(int(1), vec![
        (x, Symbol::INT, new(b)),
        (x, Symbol::OBJECT, new(c)),
    ]);
    let (t, errors) = check_expression(&mut ids, classes, expr);
    assert_eq!(errors, vec![]);
    assert_eq!(t, a);
}

#[test]
fn case_branch_errors() {
    let mut ids = IdTable::new();
    let (x, zorp) = (ids.intern("x"), ids.intern("Zorp"));
    let expr = case(int(1), vec![
        (x, Symbol::INT, object(x)),
        (x, Symbol::INT, int(2)),
        (x, Symbol::SELF_TYPE, int(3)),
        (x, zorp, int(4)),
        (Symbol::SELF, Symbol::BOOL, int(5)),
    ]);
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(errors, vec![
        SemantErrorKind::DuplicateCaseBranch { t: String::from("Int") },
        SemantErrorKind::SelfTypeCaseBranch { ident: String::from("x") },
        SemantErrorKind::UndefinedCaseType { t: String::from("Zorp") },
        SemantErrorKind::SelfCaseBinding,
    ]);
    assert_eq!(t, Symbol::INT);
}

#[rstest]
#[case(plus(int(1), int(2)), Symbol::INT, 0)]
#[case(plus(float(1.0), float(2.0)), Symbol::FLOAT, 0)]
#[case(plus(int(1), float(2.0)), Symbol::INT, 1)]
#[case(plus(string("a"), int(2)), Symbol::INT, 1)]
#[case(less(int(1), int(2)), Symbol::BOOL, 0)]
#[case(less(boolean(true), int(2)), Symbol::BOOL, 1)]
#[case(equal(int(1), int(2)), Symbol::BOOL, 0)]
#[case(equal(int(1), string("a")), Symbol::BOOL, 1)]
#[case(equal(new(Symbol::IO), new(Symbol::OBJECT)), Symbol::BOOL, 0)]
#[case(equal(new(Symbol::IO), boolean(false)), Symbol::BOOL, 1)]
#[case(neg(int(1)), Symbol::INT, 0)]
#[case(neg(float(1.5)), Symbol::FLOAT, 0)]
#[case(neg(boolean(true)), Symbol::INT, 1)]
#[case(not(boolean(true)), Symbol::BOOL, 0)]
#[case(not(int(1)), Symbol::BOOL, 1)]
#[case(isvoid(new(Symbol::IO)), Symbol::BOOL, 0)]
#[case(while_loop(int(1), int(2)), Symbol::OBJECT, 1)]
#[case(while_loop(boolean(false), int(2)), Symbol::OBJECT, 0)]
#[case(cond(int(1), int(2), int(3)), Symbol::INT, 1)]
#[case(block(vec![int(1), string("s")]), Symbol::STRING, 0)]
#[case(new(Symbol::SELF_TYPE), Symbol::SELF_TYPE, 0)]
#[case(dispatch(self_object(), Symbol::COPY, vec![]), Symbol::SELF_TYPE, 0)]
#[case(dispatch(string("ab"), Symbol::SUBSTR, vec![int(0), int(1)]), Symbol::STRING, 0)]
fn operator_rules(#[case] expr: Expr, #[case] expected: Symbol, #[case] error_count: usize) {
    let mut ids = IdTable::new();
    let (t, errors) = check_expression(&mut ids, vec![], expr);
    assert_eq!(t, expected);
    assert_eq!(errors.len(), error_count, "{:?}", errors);
}

#[test]
fn undefined_new_type_falls_back_to_object() {
    let mut ids = IdTable::new();
    let zorp = ids.intern("Zorp");
    let (t, errors) = check_expression(&mut ids, vec![], new(zorp));
    assert_eq!(errors, vec![SemantErrorKind::UndefinedNewType { t: String::from("Zorp") }]);
    assert_eq!(t, Symbol::OBJECT);
}

#[rstest]
#[case(false, 0)]
#[case(true, 1)]
fn main_is_required_only_when_configured(#[case] require_main: bool, #[case] error_count: usize) {
    let mut ids = IdTable::new();
    let a = ids.intern("A");
    let config = SemantConfig::default().with_require_main(require_main);
    let result = check_types(Program::new(vec![class(a, Symbol::OBJECT, vec![])]), &ids, &config);
    assert_eq!(result.err().map_or(0, |diagnostics| diagnostics.len()), error_count);
}

#[test]
fn main_method_must_not_take_arguments() {
    let mut ids = IdTable::new();
    let n = ids.intern("n");
    let main = class(Symbol::MAIN, Symbol::IO, vec![
        method(Symbol::MAIN_METHOD, vec![(n, Symbol::INT)], Symbol::OBJECT, int(0)),
    ]);
    let config = SemantConfig::default().with_require_main(true);
    let diagnostics = check_types(Program::new(vec![main]), &ids, &config).unwrap_err();
    assert_eq!(diagnostics.kinds(), vec![&SemantErrorKind::MainMethodArguments]);
}

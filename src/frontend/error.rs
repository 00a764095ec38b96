use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::meta::Meta;

/// every check of the semantic analysis that can fail, names are already resolved
#[derive(Debug, PartialEq, Clone, Error)]
pub enum SemantErrorKind {
    #[error("Class {class} was previously defined.")]
    DuplicateClass { class: String },
    #[error("Class cannot be named SELF_TYPE.")]
    ReservedClassName,
    #[error("Class {class} cannot inherit from built-in type {parent}.")]
    PrimitiveInheritance { class: String, parent: String },
    #[error("Class {class} inherits from an undefined class {parent}.")]
    UndefinedParent { class: String, parent: String },
    #[error("Class {class}, or an ancestor of {class}, is involved in an inheritance cycle.")]
    InheritanceCycle { class: String },
    #[error("Class Main is not defined.")]
    MissingMain,
    #[error("No 'main' method in class Main.")]
    MissingMainMethod,
    #[error("'main' method in class Main should have no arguments.")]
    MainMethodArguments,

    #[error("Class {t} of attribute {attr} is undefined.")]
    UndefinedAttributeType { attr: String, t: String },
    #[error("Undefined return type {t} in method {method}.")]
    UndefinedReturnType { method: String, t: String },
    #[error("Class {t} of formal parameter {formal} is undefined.")]
    UndefinedFormalType { formal: String, t: String },
    #[error("Formal parameter {formal} cannot have type SELF_TYPE.")]
    SelfTypeFormal { formal: String },
    #[error("Class {t} of let-bound identifier {ident} is undefined.")]
    UndefinedLetType { ident: String, t: String },
    #[error("'new' used with undefined class {t}.")]
    UndefinedNewType { t: String },
    #[error("Static dispatch to undefined class {t}.")]
    UndefinedStaticDispatchType { t: String },
    #[error("Class {t} of case branch is undefined.")]
    UndefinedCaseType { t: String },
    #[error("Identifier {ident} declared with type SELF_TYPE in case branch.")]
    SelfTypeCaseBranch { ident: String },
    #[error("Duplicate branch {t} in case statement.")]
    DuplicateCaseBranch { t: String },

    #[error("'self' cannot be the name of an attribute.")]
    SelfAttribute,
    #[error("'self' cannot be the name of a formal parameter.")]
    SelfFormal,
    #[error("'self' cannot be bound in a 'let' expression.")]
    SelfLetBinding,
    #[error("'self' bound in 'case'.")]
    SelfCaseBinding,
    #[error("Cannot assign to 'self'.")]
    SelfAssignment,
    #[error("Attribute {attr} is multiply defined in class.")]
    DuplicateAttribute { attr: String },
    #[error("Attribute {attr} is an attribute of an inherited class.")]
    InheritedAttribute { attr: String },
    #[error("Method {method} is multiply defined.")]
    DuplicateMethod { method: String },
    #[error("Formal parameter {formal} is multiply defined.")]
    DuplicateFormal { formal: String },

    #[error("Undeclared identifier {ident}.")]
    UndeclaredIdentifier { ident: String },
    #[error("Assignment to undeclared variable {ident}.")]
    AssignToUndeclared { ident: String },
    #[error("Type {actual} of assigned expression does not conform to declared type {declared} of identifier {ident}.")]
    AssignmentNonConforming { ident: String, actual: String, declared: String },
    #[error("Inferred type {actual} of initialization of attribute {attr} does not conform to declared type {declared}.")]
    AttributeInitNonConforming { attr: String, actual: String, declared: String },
    #[error("Inferred type {actual} of initialization of {ident} does not conform to identifier's declared type {declared}.")]
    LetInitNonConforming { ident: String, actual: String, declared: String },
    #[error("Inferred return type {actual} of method {method} does not conform to declared return type {declared}.")]
    ReturnNonConforming { method: String, actual: String, declared: String },
    #[error("In call of method {method}, type {actual} of parameter {index} does not conform to declared type {declared}.")]
    ArgumentNonConforming { method: String, index: usize, actual: String, declared: String },
    #[error("Expression type {actual} does not conform to declared static dispatch type {t}.")]
    StaticDispatchNonConforming { actual: String, t: String },
    #[error("Method {method} called with wrong number of arguments.")]
    ArgumentCount { method: String },
    #[error("Dispatch to undefined method {method}.")]
    UndefinedMethod { method: String },

    #[error("In redefined method {method}, parameter number differs from original.")]
    OverrideArity { method: String },
    #[error("In redefined method {method}, parameter type {actual} differs from original type {original}.")]
    OverrideFormalType { method: String, actual: String, original: String },
    #[error("In redefined method {method}, return type {actual} differs from original return type {original}.")]
    OverrideReturnType { method: String, actual: String, original: String },

    #[error("Predicate of 'if' does not have type Bool.")]
    NonBoolCondPredicate,
    #[error("Loop condition does not have type Bool.")]
    NonBoolLoopPredicate,
    #[error("non-Int arguments: {left} {op} {right}")]
    NonNumericOperands { op: String, left: String, right: String },
    #[error("Argument of '~' has type {actual} instead of Int.")]
    NonNumericNegation { actual: String },
    #[error("Argument of 'not' has type {actual} instead of Bool.")]
    NonBoolNegation { actual: String },
    #[error("Illegal comparison with a basic type.")]
    IllegalComparison,
}

/// place in the cool program an error is reported for
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: &str, line: u32) -> Self {
        Self { file: String::from(file), line }
    }

    /// location for errors concerning the whole program
    pub fn program() -> Self {
        Self::new("<program>", 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:", self.file, self.line)
    }
}

/// standardized type to remember all semantic errors
pub type SemantError = Meta<SemantErrorKind, SourceLocation>;

/// collects errors of all checks, nothing is aborted on the first error
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<SemantError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn report(&mut self, kind: SemantErrorKind, location: SourceLocation) {
        self.errors.push(SemantError::new(kind, location));
    }

    pub fn push(&mut self, error: SemantError) {
        self.errors.push(error);
    }

    /// merge errors collected by another check
    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// kinds of all reported errors, in report order
    pub fn kinds(&self) -> Vec<&SemantErrorKind> {
        self.errors.iter().map(|e| &e.item).collect()
    }

    pub fn into_vec(self) -> Vec<SemantError> {
        self.errors
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.errors.iter().join("\n"))
    }
}

/// kinds of errors reported by the frontend as a whole
#[derive(Debug, PartialEq, Clone, Error)]
pub enum FrontendErrorKind {
    #[error("DumpError: {message}")]
    DumpError { message: String },
    #[error("{0}")]
    SemantError(SemantErrorKind),
    #[error("SystemError: {message}")]
    SystemError { message: String },
}

/// standardized type to remember all frontend errors
pub type FrontendError<LocationT> = Meta<FrontendErrorKind, LocationT>;

impl From<SemantError> for FrontendError<String> {
    fn from(err: SemantError) -> Self {
        let location = err.get_meta().to_string();
        FrontendError::new(FrontendErrorKind::SemantError(err.item), location)
    }
}

use tracing::debug;

use crate::config::SemantConfig;
use crate::frontend::ast::Program;
use crate::frontend::error::Diagnostics;
use crate::meta::{LocationMeta, TypeMeta};
use crate::util::mapper::AstMapper;
use crate::util::symbol::IdTable;

pub use self::class::check_main;
pub use self::inheritance::check_inheritance;
pub use self::registry::ClassRegistry;
pub use self::typechecker::TypeChecker;
pub use self::util::{get_builtins, BASIC_CLASS_FILE};

mod class;
mod inheritance;
mod mapper;
mod registry;
mod relation;
mod resolver;
mod typechecker;
mod util;

pub type CheckedProgram = Program<TypeMeta>;
pub type TypeCheckResult<AstT> = Result<AstT, Diagnostics>;

/// main typechecker function: registers all classes, validates the inheritance graph
/// and checks types of every feature of every user class;
/// the checked program contains the user classes in registration order
pub fn check_types(
    program: Program<LocationMeta>, ids: &IdTable, config: &SemantConfig,
) -> TypeCheckResult<CheckedProgram> {
    let mut diagnostics = Diagnostics::new();

    let mut registry = ClassRegistry::with_builtins();
    for cls in program.classes {
        if let Err(e) = registry.register(cls, ids) {
            diagnostics.push(e);
        }
    }
    check_inheritance(&registry, ids, &mut diagnostics);

    // types cannot be checked without a well-formed class tree
    if diagnostics.has_errors() {
        debug!(errors = diagnostics.len(), "class hierarchy is invalid");
        return Err(diagnostics);
    }

    let mut typechecker = TypeChecker::new(&registry, ids);
    let checked = typechecker.map_classes(registry.user_classes());
    diagnostics.extend(typechecker.into_diagnostics());
    if config.require_main {
        check_main(&registry, &mut diagnostics);
    }

    if diagnostics.has_errors() {
        debug!(errors = diagnostics.len(), "type checking failed");
        Err(diagnostics)
    } else {
        Ok(checked)
    }
}

use std::fs;
use std::ops::Add;
use std::sync::Arc;

use codemap::{CodeMap, File, Pos};
use tracing::debug;

use crate::config::SemantConfig;
use crate::meta::MetaMapper;
use crate::util::symbol::IdTable;

use self::dump::{dump_program, read_program, DumpError};
use self::error::{FrontendError, FrontendErrorKind};
use self::typechecker::check_types;
pub use self::typechecker::CheckedProgram;

pub mod ast;
pub mod dump;
pub mod error;
pub mod typechecker;

pub type Error = FrontendError<String>;

/// checked program together with the names of all its identifiers
#[derive(Debug)]
pub struct AnalyzedProgram {
    pub ids: IdTable,
    pub program: CheckedProgram,
}

impl AnalyzedProgram {
    /// typed ast in the dump format, input for the code generator
    pub fn dump(&self) -> String {
        dump_program(&self.program, &self.ids)
    }
}

/// load ast dump from path and analyze it
pub fn process_file(path: &str, config: &SemantConfig) -> Result<AnalyzedProgram, Vec<Error>> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            let err = FrontendError::new(
                FrontendErrorKind::SystemError { message: format!("Failed to read file {}: {}", path, e) },
                String::from(path),
            );
            return Err(vec![err]);
        }
    };
    process_dump(path, &source, config)
}

/// analyze ast dump of the file given by name
pub fn process_dump(file_name: &str, source: &str, config: &SemantConfig) -> Result<AnalyzedProgram, Vec<Error>> {
    // setup codemap for mapping byte offset to (file, line, column)
    let mut codemap = CodeMap::new();
    let codemap_file = codemap.add_file(String::from(file_name), String::from(source));

    let mut ids = IdTable::new();
    let parsed = match read_program(source, &mut ids) {
        Ok(parsed) => parsed,
        Err(errors) => {
            let located_errors: Vec<_> = errors.into_iter()
                .map(|e| locate_error(e, &codemap_file, &codemap))
                .collect();
            return Err(located_errors);
        }
    };
    debug!(file = file_name, classes = parsed.classes.len(), "ast dump loaded");

    match check_types(parsed, &ids, config) {
        Ok(program) => Ok(AnalyzedProgram { ids, program }),
        Err(diagnostics) => Err(diagnostics.into_vec().into_iter().map(Error::from).collect()),
    }
}

/// necessary for mapping dump location
impl MetaMapper<usize, Pos> for Arc<File> {
    fn map_meta(&self, from: &usize) -> Pos {
        self.span.low().add(*from as u64)
    }
}

/// necessary for mapping dump location
impl MetaMapper<Pos, String> for CodeMap {
    fn map_meta(&self, from: &Pos) -> String {
        self.look_up_pos(*from).to_string()
    }
}

/// translate location from byte offset in the dump to (file, line, column), using provided MetaMappers
fn locate_error(e: DumpError, file: &Arc<File>, code_map: &CodeMap) -> Error {
    e.map_meta(file).map_meta(code_map)
}

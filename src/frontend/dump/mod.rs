//! text format of the ast exchanged with the parser (input) and the code generator (output)

pub use self::reader::{read_program, DumpError, DumpResult};
pub use self::writer::{dump_expression, dump_program, DumpType};

mod reader;
mod writer;

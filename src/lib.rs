mod codegen;
mod derivative;
mod error;
mod eval;
mod expression;
mod hoist;
mod parser;
mod printer;
mod program;
mod subexpression;

pub use codegen::{CodeGenerator, GeneratedCode, Statement};
pub use error::ExpressionError;
pub use eval::Bindings;
pub use expression::{funexpr, Expression, Kind, DOUBLE};
pub use hoist::MAX_DEPTH;
pub use parser::parse;
pub use program::{FunctionalProgram, Style};

//! Crate root: wires together the compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the syntax tree.
//! - `syntax` defines the tree model shared by the parser and the backend.
//! - `env` and `context` hold the per-function symbol table and the state
//!   threaded through code generation.
//! - `codegen` lowers the tree into 32-bit x86 AT&T assembly.
//! - `error` centralises the error type shared by the other modules.

pub mod codegen;
pub mod context;
pub mod env;
pub mod error;
pub mod parser;
pub mod syntax;
pub mod tokenizer;

pub use error::{CompileError, CompileResult};
pub use syntax::Syntax;

/// Parse a source string into a syntax tree.
pub fn parse_program(source: &str) -> CompileResult<Syntax> {
  let tokens = tokenizer::tokenize(source)?;
  parser::parse(tokens, source)
}

/// Compile a source string into AT&T assembly.
pub fn generate_assembly(source: &str) -> CompileResult<String> {
  let program = parse_program(source)?;
  codegen::generate(&program)
}

//! Infix-to-bytecode compiler.
//!
//! The pipeline is validate, tokenize, parse-and-emit. Parsing produces the
//! final instruction buffer directly; there is no intermediate tree.

mod lexer;
mod parser;
mod tokens;

use crate::error::CalcError;
use crate::evaluator::CompiledExpr;

/// Compile an infix expression program into an executable form.
///
/// The program is one or more sub-expressions separated by `;`, where all
/// but exactly one must be assignments (`X := expr`). Whitespace-only input
/// is rejected with [`CalcError::NullArg`].
pub fn compile(infix: &str) -> Result<CompiledExpr, CalcError> {
    if infix.trim().is_empty() {
        return Err(CalcError::NullArg);
    }
    let tokens = lexer::tokenize(infix)?;
    let code = parser::Parser::new(&tokens).parse_program()?;
    Ok(CompiledExpr::new(code.into_boxed_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(compile("").unwrap_err(), CalcError::NullArg);
        assert_eq!(compile("  \t ").unwrap_err(), CalcError::NullArg);
    }

    #[test]
    fn simple_program_compiles() {
        let expr = compile("a + b * 2").unwrap();
        assert_eq!(expr.instructions().len(), 5);
    }
}

//! Compile infix formula programs to bytecode and evaluate them repeatedly
//! on a bounded stack machine.
//!
//! A program is one or more sub-expressions separated by `;`, exactly one of
//! which is a bare expression producing the result; the others assign to the
//! twelve variables `A` through `L`. Compilation happens once, evaluation
//! many times against caller-supplied argument values:
//!
//! ```
//! use calcexpr::{compile, CALC_NARGS};
//!
//! let expr = compile("c := a + b; c * 2").unwrap();
//! let mut args = [0.0; CALC_NARGS];
//! args[0] = 1.5; // A
//! args[1] = 2.5; // B
//! let result = expr.eval(&mut args, 0.0).unwrap();
//! assert_eq!(result, 8.0);
//! assert_eq!(args[2], 4.0); // C was assigned
//! ```
//!
//! Names are case-insensitive. The language has the usual arithmetic,
//! relational, boolean and bitwise operators (`AND`, `OR`, `XOR` and `NOT`
//! are keywords for the bitwise forms), a `? :` conditional, a library of
//! algebraic, trigonometric and hyperbolic functions, the constants `pi`,
//! `D2R` and `R2D`, the random operand `rndm`, and `VAL` for the previous
//! result of the expression.
//!
//! Arithmetic follows IEEE-754: division by zero and domain errors produce
//! infinities or NaN, never an `Err`. Errors are reserved for malformed
//! source text (compile time) and for corrupt hand-built instruction buffers
//! (evaluation time); each carries a stable numeric code and message, see
//! [`CalcError`] and [`error_str`].
//!
//! A [`CompiledExpr`] is immutable and `Send + Sync`; evaluation state lives
//! entirely in the caller's frame, so one compiled program can serve many
//! threads concurrently.

mod compiler;
mod error;
mod evaluator;
mod instruction;

pub use compiler::compile;
pub use error::{error_str, CalcError};
pub use evaluator::{ArgUsage, CompiledExpr};
pub use instruction::Instruction;

/// Number of argument slots (the variables A through L).
pub const CALC_NARGS: usize = 12;

/// Capacity of the evaluation operand stack. The compiler rejects programs
/// that could exceed it, so evaluation of compiled programs never does.
pub const CALC_STACK: usize = 80;

#[cfg(test)]
mod tests;

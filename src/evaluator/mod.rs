//! Compiled expressions and their evaluation.

mod disasm;
mod execution;
mod usage;

pub use usage::ArgUsage;

use std::fmt;
use std::io;

use crate::error::CalcError;
use crate::instruction::Instruction;
use crate::CALC_NARGS;

/// A compiled expression program, ready for repeated evaluation.
///
/// The instruction buffer is immutable after construction, so a
/// `CompiledExpr` is `Send + Sync` and can be shared across threads freely;
/// every [`eval`](CompiledExpr::eval) call keeps its operand stack on the
/// caller's stack frame. Only the caller-owned argument bank is mutated, by
/// assignment sub-expressions.
///
/// The buffer length is bounded by construction: a program lexed from `n`
/// input characters can never need more than a few instructions per token,
/// and the compiler rejects anything whose evaluation would exceed the
/// 80-slot runtime stack.
#[derive(Clone, PartialEq)]
pub struct CompiledExpr {
    code: Box<[Instruction]>,
}

impl CompiledExpr {
    pub(crate) fn new(code: Box<[Instruction]>) -> Self {
        CompiledExpr { code }
    }

    /// Build directly from an instruction buffer, bypassing the compiler.
    ///
    /// Programs built this way get no compile-time depth validation, so
    /// evaluation may report the defensive [`CalcError::Underflow`],
    /// [`CalcError::Overflow`], [`CalcError::TooMany`] or
    /// [`CalcError::Internal`] errors that [`crate::compile`] output never
    /// triggers.
    pub fn from_instructions(code: Vec<Instruction>) -> Self {
        CompiledExpr {
            code: code.into_boxed_slice(),
        }
    }

    /// The program's instructions in evaluation order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// Run the program against an argument bank and a previous-result value.
    ///
    /// `args` supplies the values of the variables A through L and receives
    /// any assignments; `val` is what the `VAL` operand pushes. Arithmetic
    /// follows IEEE-754 rules, so division by zero and domain errors yield
    /// infinities or NaN rather than an `Err`.
    pub fn eval(&self, args: &mut [f64; CALC_NARGS], val: f64) -> Result<f64, CalcError> {
        execution::run(&self.code, args, val)
    }

    /// Which argument slots the program reads and which it assigns.
    pub fn arg_usage(&self) -> ArgUsage {
        usage::scan(&self.code)
    }

    /// Write a human-readable program listing to `out`, one instruction per
    /// line in evaluation order.
    pub fn disassemble<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        disasm::dump(&self.code, out)
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpr")
            .field("instructions", &self.code.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn is_send_and_sync() {
        assert_send_sync::<CompiledExpr>();
    }

    #[test]
    fn debug_is_compact() {
        let expr = crate::compile("1+2").unwrap();
        assert_eq!(format!("{expr:?}"), "CompiledExpr { instructions: 3 }");
    }
}

//! Token definitions and the built-in function table.

use crate::error::CalcError;
use crate::instruction::Instruction;

/// A lexical token. Names are resolved by the lexer, so variables, constants
/// and functions arrive here already classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal (also produced for the `Inf` and `NaN` keywords).
    Literal(f64),
    /// Argument slot 0..=11 (letters A through L).
    Variable(u8),
    /// The previous-result keyword `VAL`.
    Val,
    /// Named constant, pre-resolved to its push instruction.
    Const(Instruction),
    /// The zero-argument random operand `rndm`.
    Random,
    /// Built-in function name; argument list follows in parentheses.
    Function(Func),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    /// `**` or `^`.
    Power,

    Lt,
    Le,
    Gt,
    Ge,
    /// `=` or `==`.
    Eq,
    /// `!=` or `#`.
    Ne,

    /// `<<`.
    Shl,
    /// `>>`.
    Shr,
    /// `&` or the `AND` keyword.
    BitAnd,
    /// `|` or the `OR` keyword.
    BitOr,
    /// The `XOR` keyword.
    BitXor,
    /// `~` or the `NOT` keyword.
    BitNot,

    /// `&&`.
    RelAnd,
    /// `||`.
    RelOr,
    /// `!`.
    RelNot,

    Question,
    Colon,
    Semicolon,
    Comma,
    /// `:=`.
    Assign,
    LParen,
    RParen,
}

/// A built-in function. Fixed-arity functions map straight to one
/// instruction; the variadic four pack their argument count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Abs,
    Exp,
    Log10,
    LogE,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Ceil,
    Floor,
    Nint,
    IsInf,
    Min,
    Max,
    IsNan,
    Finite,
}

impl Func {
    /// Fixed argument count, or `None` for the variadic functions.
    pub fn fixed_arity(self) -> Option<u8> {
        match self {
            Func::Atan2 => Some(2),
            Func::Min | Func::Max | Func::IsNan | Func::Finite => None,
            _ => Some(1),
        }
    }

    /// Instruction for a call with `argc` arguments. The parser has already
    /// checked `argc` against [`Func::fixed_arity`], so a mismatch here only
    /// occurs through internal misuse.
    pub fn instruction(self, argc: u8) -> Result<Instruction, CalcError> {
        if let Some(n) = self.fixed_arity() {
            if argc != n {
                return Err(CalcError::Internal);
            }
        }
        Ok(match self {
            Func::Abs => Instruction::Abs,
            Func::Exp => Instruction::Exp,
            Func::Log10 => Instruction::Log10,
            Func::LogE => Instruction::LogE,
            Func::Sqrt => Instruction::Sqrt,
            Func::Sin => Instruction::Sin,
            Func::Cos => Instruction::Cos,
            Func::Tan => Instruction::Tan,
            Func::Asin => Instruction::Asin,
            Func::Acos => Instruction::Acos,
            Func::Atan => Instruction::Atan,
            Func::Atan2 => Instruction::Atan2,
            Func::Sinh => Instruction::Sinh,
            Func::Cosh => Instruction::Cosh,
            Func::Tanh => Instruction::Tanh,
            Func::Ceil => Instruction::Ceil,
            Func::Floor => Instruction::Floor,
            Func::Nint => Instruction::Nint,
            Func::IsInf => Instruction::IsInf,
            Func::Min => Instruction::Min(argc),
            Func::Max => Instruction::Max(argc),
            Func::IsNan => Instruction::IsNan(argc),
            Func::Finite => Instruction::Finite(argc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arities() {
        assert_eq!(Func::Sin.fixed_arity(), Some(1));
        assert_eq!(Func::Atan2.fixed_arity(), Some(2));
        assert_eq!(Func::Min.fixed_arity(), None);
    }

    #[test]
    fn variadic_instruction_packs_argc() {
        assert_eq!(Func::Max.instruction(3), Ok(Instruction::Max(3)));
        assert_eq!(Func::Sin.instruction(1), Ok(Instruction::Sin));
        assert_eq!(Func::Sin.instruction(2), Err(CalcError::Internal));
    }
}

//! Bytecode instruction definitions.
//!
//! An [`Instruction`] sequence is the only contract between the compiler and
//! the evaluator: the compiler emits instructions in postfix order, the
//! evaluator executes them against a bounded operand stack. Variants are
//! either pure stack operations, variable traffic against the caller's
//! 12-slot argument bank, or the three structural markers that implement the
//! conditional operator without a jump table.

use std::fmt;

/// One stack-machine instruction.
///
/// `Literal` embeds its IEEE-754 double directly; the four variadic function
/// variants pack their argument count (always at least 1, and bounded by the
/// stack capacity). Everything else is a unit variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// Push an embedded double.
    Literal(f64),
    /// Push argument slot `i` (0 = A .. 11 = L).
    Fetch(u8),
    /// Push the previous-result value supplied by the caller.
    FetchVal,
    /// Pop into argument slot `i`.
    Store(u8),

    /// Push the constant pi.
    ConstPi,
    /// Push pi/180 (degrees-to-radians multiplier).
    ConstD2R,
    /// Push 180/pi (radians-to-degrees multiplier).
    ConstR2D,
    /// Push a uniform random value in [0, 1).
    Random,

    UnaryNeg,
    Add,
    Sub,
    Mul,
    Div,
    /// Integer modulo: both operands truncated toward zero to `i32`.
    Modulo,
    Power,

    Abs,
    Exp,
    /// Base-10 logarithm.
    Log10,
    /// Natural logarithm.
    LogE,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// Pops b then a; computes the angle of b/a (arguments swapped relative
    /// to the C library convention).
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Ceil,
    Floor,
    /// Round to nearest integer, halves away from zero.
    Nint,
    /// 1.0 if the operand is +inf or -inf, else 0.0.
    IsInf,

    /// Minimum of the top `n` values; NaN-propagating.
    Min(u8),
    /// Maximum of the top `n` values; NaN-propagating.
    Max(u8),
    /// 1.0 if any of the top `n` values is NaN, else 0.0.
    IsNan(u8),
    /// 1.0 if all of the top `n` values are finite, else 0.0.
    Finite(u8),

    RelOr,
    RelAnd,
    RelNot,
    BitOr,
    BitAnd,
    BitXor,
    BitNot,
    LeftShift,
    RightShift,

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    /// Pops the condition; if it is exactly 0.0, control skips forward past
    /// the matching `CondElse`.
    CondIf,
    /// End of the taken true branch: control skips past the matching
    /// `CondEnd`. When reached by a skip, execution resumes just after it.
    CondElse,
    /// Structural no-op closing a conditional.
    CondEnd,
}

impl Instruction {
    /// Net effect on stack depth, as tracked by the compiler's depth
    /// simulation. Pushes are +1, binary operators -1, variadic functions
    /// `1 - n`. `CondElse` counts -1 here because in the simulation the
    /// false branch replaces the true branch's value.
    pub(crate) fn stack_effect(self) -> i32 {
        use Instruction::*;
        match self {
            Literal(_) | Fetch(_) | FetchVal | ConstPi | ConstD2R | ConstR2D | Random => 1,
            Store(_) => -1,
            UnaryNeg | Abs | Exp | Log10 | LogE | Sqrt | Sin | Cos | Tan | Asin | Acos | Atan
            | Sinh | Cosh | Tanh | Ceil | Floor | Nint | IsInf | RelNot | BitNot => 0,
            Add | Sub | Mul | Div | Modulo | Power | Atan2 | RelOr | RelAnd | BitOr | BitAnd
            | BitXor | LeftShift | RightShift | Eq | Ne | Lt | Le | Gt | Ge => -1,
            Min(n) | Max(n) | IsNan(n) | Finite(n) => 1 - i32::from(n),
            CondIf | CondElse => -1,
            CondEnd => 0,
        }
    }
}

/// Letter for an argument slot index; `?` for out-of-range indices in
/// hand-built buffers.
fn slot_letter(i: u8) -> char {
    if i < crate::CALC_NARGS as u8 {
        (b'A' + i) as char
    } else {
        '?'
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Literal(v) => write!(f, "LITERAL {v}"),
            Fetch(i) => write!(f, "FETCH {}", slot_letter(i)),
            FetchVal => f.write_str("FETCH VAL"),
            Store(i) => write!(f, "STORE {}", slot_letter(i)),
            ConstPi => f.write_str("CONST PI"),
            ConstD2R => f.write_str("CONST D2R"),
            ConstR2D => f.write_str("CONST R2D"),
            Random => f.write_str("RNDM"),
            UnaryNeg => f.write_str("UNARY_NEG"),
            Add => f.write_str("ADD"),
            Sub => f.write_str("SUB"),
            Mul => f.write_str("MUL"),
            Div => f.write_str("DIV"),
            Modulo => f.write_str("MODULO"),
            Power => f.write_str("POWER"),
            Abs => f.write_str("ABS"),
            Exp => f.write_str("EXP"),
            Log10 => f.write_str("LOG10"),
            LogE => f.write_str("LOGE"),
            Sqrt => f.write_str("SQRT"),
            Sin => f.write_str("SIN"),
            Cos => f.write_str("COS"),
            Tan => f.write_str("TAN"),
            Asin => f.write_str("ASIN"),
            Acos => f.write_str("ACOS"),
            Atan => f.write_str("ATAN"),
            Atan2 => f.write_str("ATAN2"),
            Sinh => f.write_str("SINH"),
            Cosh => f.write_str("COSH"),
            Tanh => f.write_str("TANH"),
            Ceil => f.write_str("CEIL"),
            Floor => f.write_str("FLOOR"),
            Nint => f.write_str("NINT"),
            IsInf => f.write_str("ISINF"),
            Min(n) => write!(f, "MIN({n})"),
            Max(n) => write!(f, "MAX({n})"),
            IsNan(n) => write!(f, "ISNAN({n})"),
            Finite(n) => write!(f, "FINITE({n})"),
            RelOr => f.write_str("REL_OR"),
            RelAnd => f.write_str("REL_AND"),
            RelNot => f.write_str("REL_NOT"),
            BitOr => f.write_str("BIT_OR"),
            BitAnd => f.write_str("BIT_AND"),
            BitXor => f.write_str("BIT_XOR"),
            BitNot => f.write_str("BIT_NOT"),
            LeftShift => f.write_str("LEFT_SHIFT"),
            RightShift => f.write_str("RIGHT_SHIFT"),
            Eq => f.write_str("EQ"),
            Ne => f.write_str("NE"),
            Lt => f.write_str("LT"),
            Le => f.write_str("LE"),
            Gt => f.write_str("GT"),
            Ge => f.write_str("GE"),
            CondIf => f.write_str("COND_IF"),
            CondElse => f.write_str("COND_ELSE"),
            CondEnd => f.write_str("COND_END"),
        }
    }
}

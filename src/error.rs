use std::fmt;

/// Errors reported by the expression compiler and evaluator.
///
/// Each variant carries a stable small-integer code (see [`CalcError::code`])
/// mirrored by the static string table behind [`error_str`]; the two are kept
/// in lockstep by a single `match` and a unit test. Code 0 means "no error"
/// and has no variant here, since success is expressed as `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// More than one non-assignment sub-expression in the program,
    /// or (at evaluation time) a foreign buffer left extra values behind.
    TooMany,
    /// Malformed numeric literal text.
    BadLiteral,
    /// No non-assignment sub-expression in the program.
    BadAssignment,
    /// Comma outside a function argument list.
    BadSeparator,
    /// Close parenthesis without a matching open.
    ParenNotOpen,
    /// Open parenthesis still unmatched at the end of the expression.
    ParenOpen,
    /// Unbalanced `?` / `:` conditional operators.
    Conditional,
    /// Operand missing from an expression.
    Incomplete,
    /// Runtime stack would underflow (defensive; unreachable for
    /// compiler-produced buffers).
    Underflow,
    /// Simulated or actual stack depth would exceed [`crate::CALC_STACK`].
    Overflow,
    /// Any other syntax error, including unknown names and bad assignment
    /// targets.
    Syntax,
    /// Empty or blank input.
    NullArg,
    /// Internal inconsistency, e.g. a hand-built instruction buffer with
    /// unbalanced conditional markers. Never produced for valid input.
    Internal,
}

/// Stable error strings, indexed by error code. Index 0 is the success text.
const ERROR_STRS: [&str; 14] = [
    "No error",
    "Too many results returned",
    "Bad numeric literal",
    "Bad assignment target",
    "Comma without enclosing parentheses",
    "Close parenthesis found without open",
    "Open parenthesis at end of expression",
    "Unbalanced conditional ?: operators",
    "Incomplete expression, operand missing",
    "Runtime stack would underflow",
    "Runtime stack would overflow",
    "Syntax error",
    "NULL or empty input argument",
    "Internal error, unknown element type",
];

impl CalcError {
    /// Stable numeric code for this error (1 through 13; 0 is success).
    pub const fn code(self) -> u8 {
        match self {
            CalcError::TooMany => 1,
            CalcError::BadLiteral => 2,
            CalcError::BadAssignment => 3,
            CalcError::BadSeparator => 4,
            CalcError::ParenNotOpen => 5,
            CalcError::ParenOpen => 6,
            CalcError::Conditional => 7,
            CalcError::Incomplete => 8,
            CalcError::Underflow => 9,
            CalcError::Overflow => 10,
            CalcError::Syntax => 11,
            CalcError::NullArg => 12,
            CalcError::Internal => 13,
        }
    }
}

/// Human-readable text for an error code, including 0 ("No error").
///
/// Out-of-range codes yield a fixed placeholder rather than panicking.
pub fn error_str(code: u8) -> &'static str {
    ERROR_STRS
        .get(code as usize)
        .copied()
        .unwrap_or("Unknown error code")
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(error_str(self.code()))
    }
}

impl std::error::Error for CalcError {}

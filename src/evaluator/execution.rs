//! The stack machine.
//!
//! Execution walks the instruction buffer once, left to right, against a
//! fixed 80-slot operand stack held in the caller's frame. Conditionals are
//! resolved by scanning forward for the matching structural marker instead
//! of encoded jump offsets, which keeps the buffer position-independent.
//!
//! Integer operators (`%`, shifts, bitwise) truncate their operands toward
//! zero to `i32` and convert the result back to `f64`. Booleans are exactly
//! 1.0 and 0.0, with any non-zero operand (including NaN) counting as true.

use crate::error::CalcError;
use crate::instruction::Instruction;
use crate::{CALC_NARGS, CALC_STACK};

/// Boolean results are exactly 1.0 or 0.0.
fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Forward scan from a `CondIf` at `from` to its matching `CondElse`.
fn skip_to_else(code: &[Instruction], from: usize) -> Result<usize, CalcError> {
    let mut nest = 0u32;
    let mut i = from + 1;
    while i < code.len() {
        match code[i] {
            Instruction::CondIf => nest += 1,
            Instruction::CondElse if nest == 0 => return Ok(i),
            Instruction::CondEnd if nest == 0 => return Err(CalcError::Internal),
            Instruction::CondEnd => nest -= 1,
            _ => {}
        }
        i += 1;
    }
    Err(CalcError::Internal)
}

/// Forward scan from a `CondElse` at `from` to its matching `CondEnd`.
fn skip_to_end(code: &[Instruction], from: usize) -> Result<usize, CalcError> {
    let mut nest = 0u32;
    let mut i = from + 1;
    while i < code.len() {
        match code[i] {
            Instruction::CondIf => nest += 1,
            Instruction::CondEnd if nest == 0 => return Ok(i),
            Instruction::CondEnd => nest -= 1,
            _ => {}
        }
        i += 1;
    }
    Err(CalcError::Internal)
}

pub(crate) fn run(
    code: &[Instruction],
    args: &mut [f64; CALC_NARGS],
    val: f64,
) -> Result<f64, CalcError> {
    let mut stack = [0.0f64; CALC_STACK];
    let mut top = 0usize;
    let mut pc = 0usize;

    macro_rules! push {
        ($v:expr) => {{
            if top == CALC_STACK {
                return Err(CalcError::Overflow);
            }
            stack[top] = $v;
            top += 1;
        }};
    }
    macro_rules! pop {
        () => {{
            if top == 0 {
                return Err(CalcError::Underflow);
            }
            top -= 1;
            stack[top]
        }};
    }
    // Unary operators rewrite the top slot in place.
    macro_rules! unary {
        ($f:expr) => {{
            if top == 0 {
                return Err(CalcError::Underflow);
            }
            let f: fn(f64) -> f64 = $f;
            stack[top - 1] = f(stack[top - 1]);
        }};
    }
    macro_rules! binary {
        ($f:expr) => {{
            let b = pop!();
            let a = pop!();
            let f: fn(f64, f64) -> f64 = $f;
            push!(f(a, b));
        }};
    }

    while pc < code.len() {
        match code[pc] {
            Instruction::Literal(v) => push!(v),
            Instruction::Fetch(i) => {
                let v = *args.get(i as usize).ok_or(CalcError::Internal)?;
                push!(v);
            }
            Instruction::FetchVal => push!(val),
            Instruction::Store(i) => {
                let v = pop!();
                *args.get_mut(i as usize).ok_or(CalcError::Internal)? = v;
            }

            Instruction::ConstPi => push!(std::f64::consts::PI),
            Instruction::ConstD2R => push!(std::f64::consts::PI / 180.0),
            Instruction::ConstR2D => push!(180.0 / std::f64::consts::PI),
            Instruction::Random => push!(rand::random::<f64>()),

            Instruction::UnaryNeg => unary!(|a| -a),
            Instruction::Add => binary!(|a, b| a + b),
            Instruction::Sub => binary!(|a, b| a - b),
            Instruction::Mul => binary!(|a, b| a * b),
            Instruction::Div => binary!(|a, b| a / b),
            Instruction::Modulo => binary!(|a, b| {
                let bi = b as i32;
                if bi == 0 {
                    f64::NAN
                } else {
                    f64::from((a as i32).wrapping_rem(bi))
                }
            }),
            Instruction::Power => binary!(f64::powf),

            Instruction::Abs => unary!(f64::abs),
            Instruction::Exp => unary!(f64::exp),
            Instruction::Log10 => unary!(f64::log10),
            Instruction::LogE => unary!(f64::ln),
            Instruction::Sqrt => unary!(f64::sqrt),
            Instruction::Sin => unary!(f64::sin),
            Instruction::Cos => unary!(f64::cos),
            Instruction::Tan => unary!(f64::tan),
            Instruction::Asin => unary!(f64::asin),
            Instruction::Acos => unary!(f64::acos),
            Instruction::Atan => unary!(f64::atan),
            // atan2(a, b) is documented as the angle of b/a, so the second
            // argument is the ordinate.
            Instruction::Atan2 => binary!(|a, b| b.atan2(a)),
            Instruction::Sinh => unary!(f64::sinh),
            Instruction::Cosh => unary!(f64::cosh),
            Instruction::Tanh => unary!(f64::tanh),
            Instruction::Ceil => unary!(f64::ceil),
            Instruction::Floor => unary!(f64::floor),
            Instruction::Nint => unary!(f64::round),
            Instruction::IsInf => unary!(|a| truth(a.is_infinite())),

            Instruction::Min(n) => {
                let mut m = pop!();
                for _ in 1..n {
                    let v = pop!();
                    if v.is_nan() || m.is_nan() {
                        m = f64::NAN;
                    } else if v < m {
                        m = v;
                    }
                }
                push!(m);
            }
            Instruction::Max(n) => {
                let mut m = pop!();
                for _ in 1..n {
                    let v = pop!();
                    if v.is_nan() || m.is_nan() {
                        m = f64::NAN;
                    } else if v > m {
                        m = v;
                    }
                }
                push!(m);
            }
            Instruction::IsNan(n) => {
                let mut any = false;
                for _ in 0..n {
                    any |= pop!().is_nan();
                }
                push!(truth(any));
            }
            Instruction::Finite(n) => {
                let mut all = true;
                for _ in 0..n {
                    all &= pop!().is_finite();
                }
                push!(truth(all));
            }

            Instruction::RelOr => binary!(|a, b| truth(a != 0.0 || b != 0.0)),
            Instruction::RelAnd => binary!(|a, b| truth(a != 0.0 && b != 0.0)),
            Instruction::RelNot => unary!(|a| truth(a == 0.0)),
            Instruction::BitOr => binary!(|a, b| f64::from((a as i32) | (b as i32))),
            Instruction::BitAnd => binary!(|a, b| f64::from((a as i32) & (b as i32))),
            Instruction::BitXor => binary!(|a, b| f64::from((a as i32) ^ (b as i32))),
            Instruction::BitNot => unary!(|a| f64::from(!(a as i32))),
            Instruction::LeftShift => {
                binary!(|a, b| f64::from((a as i32).wrapping_shl(b as i32 as u32)))
            }
            Instruction::RightShift => {
                // Arithmetic shift; the count is masked to 0..=31.
                binary!(|a, b| f64::from((a as i32).wrapping_shr(b as i32 as u32)))
            }

            Instruction::Eq => binary!(|a, b| truth(a == b)),
            Instruction::Ne => binary!(|a, b| truth(a != b)),
            Instruction::Lt => binary!(|a, b| truth(a < b)),
            Instruction::Le => binary!(|a, b| truth(a <= b)),
            Instruction::Gt => binary!(|a, b| truth(a > b)),
            Instruction::Ge => binary!(|a, b| truth(a >= b)),

            Instruction::CondIf => {
                let cond = pop!();
                if cond == 0.0 {
                    pc = skip_to_else(code, pc)?;
                }
            }
            Instruction::CondElse => {
                pc = skip_to_end(code, pc)?;
            }
            Instruction::CondEnd => {}
        }
        pc += 1;
    }

    match top {
        1 => Ok(stack[0]),
        0 => Err(CalcError::Underflow),
        _ => Err(CalcError::TooMany),
    }
}

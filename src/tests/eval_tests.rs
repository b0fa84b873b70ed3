//! End-to-end evaluation semantics.

use crate::{compile, CALC_NARGS};

/// Compile and evaluate with all arguments zero and `val` zero.
fn eval(src: &str) -> f64 {
    let mut args = [0.0; CALC_NARGS];
    compile(src)
        .unwrap()
        .eval(&mut args, 0.0)
        .unwrap()
}

/// Compile and evaluate with the given argument slots preset.
fn eval_with(src: &str, preset: &[(usize, f64)]) -> f64 {
    let mut args = [0.0; CALC_NARGS];
    for &(i, v) in preset {
        args[i] = v;
    }
    compile(src)
        .unwrap()
        .eval(&mut args, 0.0)
        .unwrap()
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(eval("2+3*4"), 14.0);
    assert_eq!(eval("(2+3)*4"), 20.0);
    assert_eq!(eval("10-4-3"), 3.0);
    assert_eq!(eval("12/4/3"), 1.0);
}

#[test]
fn power_operator() {
    assert_eq!(eval("2**3"), 8.0);
    assert_eq!(eval("2^3"), 8.0);
    // Left-associative: (2**3)**2, not 2**(3**2).
    assert_eq!(eval("2**3**2"), 64.0);
    // Unary minus binds tighter: (-2)**2.
    assert_eq!(eval("-2**2"), 4.0);
    assert_eq!(eval("+3"), 3.0);
}

#[test]
fn ieee_arithmetic_never_errors() {
    assert_eq!(eval("1/0"), f64::INFINITY);
    assert_eq!(eval("-1/0"), f64::NEG_INFINITY);
    assert!(eval("0/0").is_nan());
    assert!(eval("sqrt(0-1)").is_nan());
    assert_eq!(eval("log(0)"), f64::NEG_INFINITY);
}

#[test]
fn assignment_and_sequencing() {
    let expr = compile("a:=1;a+1").unwrap();
    let mut args = [0.0; CALC_NARGS];
    args[0] = 42.0; // overwritten before the fetch
    assert_eq!(expr.eval(&mut args, 0.0), Ok(2.0));
    assert_eq!(args[0], 1.0);
}

#[test]
fn unchanged_inputs_give_identical_results() {
    let expr = compile("a*2+b").unwrap();
    let mut args = [0.0; CALC_NARGS];
    args[0] = 1.25;
    args[1] = 0.5;
    let first = expr.eval(&mut args, 0.0).unwrap();
    assert_eq!(first, 3.0);
    assert_eq!(expr.eval(&mut args, 0.0), Ok(first));
    assert_eq!(args[0], 1.25);
}

#[test]
fn repeated_eval_accumulates_only_through_args() {
    let expr = compile("a:=a+1;a").unwrap();
    let mut args = [0.0; CALC_NARGS];
    assert_eq!(expr.eval(&mut args, 0.0), Ok(1.0));
    assert_eq!(expr.eval(&mut args, 0.0), Ok(2.0));
    assert_eq!(args[0], 2.0);

    // Fresh argument bank, fresh state: the program itself holds none.
    let mut fresh = [0.0; CALC_NARGS];
    assert_eq!(expr.eval(&mut fresh, 0.0), Ok(1.0));
}

#[test]
fn val_is_the_previous_result() {
    let expr = compile("val*2+1").unwrap();
    let mut args = [0.0; CALC_NARGS];
    assert_eq!(expr.eval(&mut args, 3.0), Ok(7.0));
    assert_eq!(expr.eval(&mut args, 7.0), Ok(15.0));
}

#[test]
fn variables_are_case_insensitive() {
    assert_eq!(eval_with("A+b", &[(0, 1.0), (1, 2.0)]), 3.0);
    assert_eq!(eval_with("L", &[(11, 9.0)]), 9.0);
}

#[test]
fn constants() {
    assert_eq!(eval("pi"), std::f64::consts::PI);
    assert_eq!(eval("180*D2R"), std::f64::consts::PI);
    assert_eq!(eval("pi*R2D"), 180.0);
    assert_eq!(eval("inf"), f64::INFINITY);
    assert!(eval("nan").is_nan());
}

#[test]
fn comparisons_yield_exact_booleans() {
    assert_eq!(eval("2>1"), 1.0);
    assert_eq!(eval("1>2"), 0.0);
    assert_eq!(eval("1>=1"), 1.0);
    assert_eq!(eval("1<=0"), 0.0);
    assert_eq!(eval("3=3"), 1.0);
    assert_eq!(eval("3==3"), 1.0);
    assert_eq!(eval("3#4"), 1.0);
    assert_eq!(eval("3!=3"), 0.0);
}

#[test]
fn boolean_operators() {
    assert_eq!(eval("1&&2"), 1.0);
    assert_eq!(eval("1&&0"), 0.0);
    assert_eq!(eval("0||3"), 1.0);
    assert_eq!(eval("0||0"), 0.0);
    assert_eq!(eval("!5"), 0.0);
    assert_eq!(eval("!0"), 1.0);
}

#[test]
fn keyword_operators_are_bitwise() {
    assert_eq!(eval("5 AND 3"), 1.0);
    assert_eq!(eval("5 OR 2"), 7.0);
    assert_eq!(eval("6 xor 3"), 5.0);
    assert_eq!(eval("not 0"), -1.0);
    assert_eq!(eval("5&3"), 1.0);
    assert_eq!(eval("5|2"), 7.0);
    assert_eq!(eval("~0"), -1.0);
    assert_eq!(eval("~~5"), 5.0);
}

#[test]
fn bitwise_precedence() {
    // & binds tighter than xor, which binds tighter than |.
    assert_eq!(eval("1|6&2"), 3.0);
    assert_eq!(eval("1 or 6 and 2"), 3.0);
}

#[test]
fn integer_operators_truncate_toward_zero() {
    assert_eq!(eval("7%3"), 1.0);
    assert_eq!(eval("-7%3"), -1.0);
    assert_eq!(eval("7%-3"), 1.0);
    assert_eq!(eval("7.9%3"), 1.0);
    assert!(eval("5%0").is_nan());
    assert_eq!(eval("1<<3"), 8.0);
    assert_eq!(eval("16>>2"), 4.0);
    // Arithmetic right shift preserves the sign.
    assert_eq!(eval("-1>>1"), -1.0);
    assert_eq!(eval("-8>>2"), -2.0);
}

#[test]
fn conditional_operator() {
    assert_eq!(eval("1?2:3"), 2.0);
    assert_eq!(eval("0?2:3"), 3.0);
    // NaN is non-zero, hence true.
    assert_eq!(eval("(0/0)?2:3"), 2.0);
    // Chained conditionals nest to the right.
    assert_eq!(eval_with("a?1:b?2:3", &[(0, 0.0), (1, 1.0)]), 2.0);
    assert_eq!(eval("0?1:0?2:3"), 3.0);
    // The untaken branch is skipped entirely, even when it could not
    // evaluate cleanly on its own.
    assert_eq!(eval("1?5:sqrt(0-1)"), 5.0);
}

#[test]
fn algebraic_functions() {
    assert_eq!(eval("abs(0-3)"), 3.0);
    assert_eq!(eval("sqrt(16)"), 4.0);
    assert_eq!(eval("sqr(16)"), 4.0);
    assert_eq!(eval("log(100)"), 2.0);
    assert_eq!(eval("ln(exp(2))"), 2.0);
    assert_eq!(eval("loge(exp(1))"), 1.0);
    assert_eq!(eval("ceil(1.2)"), 2.0);
    assert_eq!(eval("floor(1.8)"), 1.0);
    assert_eq!(eval("floor(-1.2)"), -2.0);
}

#[test]
fn nint_rounds_half_away_from_zero() {
    assert_eq!(eval("nint(2.5)"), 3.0);
    assert_eq!(eval("nint(-2.5)"), -3.0);
    assert_eq!(eval("nint(2.4)"), 2.0);
    assert_eq!(eval("nint(-2.4)"), -2.0);
}

#[test]
fn trigonometry() {
    assert!((eval("sin(pi/2)") - 1.0).abs() < 1e-12);
    assert_eq!(eval("cos(0)"), 1.0);
    assert!((eval("tan(pi/4)") - 1.0).abs() < 1e-12);
    assert!((eval("asin(1)") - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!((eval("tanh(0)")).abs() < 1e-12);
    assert_eq!(eval("cosh(0)"), 1.0);
}

#[test]
fn atan2_takes_abscissa_first() {
    // atan2(a, b) is the angle of b/a.
    assert!((eval("atan2(1,1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    assert_eq!(eval("atan2(1,0)"), 0.0);
    assert!((eval("atan2(0,1)") - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn variadic_functions() {
    assert_eq!(eval("min(5)"), 5.0);
    assert_eq!(eval("min(3,1,2)"), 1.0);
    assert_eq!(eval("max(3,1,2)"), 3.0);
    assert_eq!(eval("max(0-3,0-1,0-2)"), -1.0);
    assert!(eval("min(1,0/0,2)").is_nan());
    assert!(eval("max(1,0/0,2)").is_nan());
}

#[test]
fn float_classification() {
    assert_eq!(eval("isnan(0/0)"), 1.0);
    assert_eq!(eval("isnan(1,2,3)"), 0.0);
    assert_eq!(eval("isnan(1,0/0)"), 1.0);
    assert_eq!(eval("finite(1,2,3)"), 1.0);
    assert_eq!(eval("finite(1/0)"), 0.0);
    assert_eq!(eval("finite(1,0/0)"), 0.0);
    assert_eq!(eval("isinf(1/0)"), 1.0);
    assert_eq!(eval("isinf(0-1/0)"), 1.0);
    assert_eq!(eval("isinf(0)"), 0.0);
    assert_eq!(eval("isinf(0/0)"), 0.0);
}

#[test]
fn rndm_stays_in_unit_interval() {
    let expr = compile("rndm").unwrap();
    let mut args = [0.0; CALC_NARGS];
    for _ in 0..1000 {
        let v = expr.eval(&mut args, 0.0).unwrap();
        assert!((0.0..1.0).contains(&v), "rndm produced {v}");
    }
}

#[test]
fn hand_built_buffers_hit_the_defensive_checks() {
    use crate::{CalcError, CompiledExpr, Instruction};

    let mut args = [0.0; CALC_NARGS];
    let expr = CompiledExpr::from_instructions(vec![Instruction::Add]);
    assert_eq!(expr.eval(&mut args, 0.0), Err(CalcError::Underflow));

    let expr = CompiledExpr::from_instructions(vec![
        Instruction::Literal(1.0),
        Instruction::Literal(2.0),
    ]);
    assert_eq!(expr.eval(&mut args, 0.0), Err(CalcError::TooMany));
}

#[test]
fn deep_but_legal_nesting() {
    // 40 pending operands stays well inside the 80-slot stack.
    let mut src = String::new();
    for _ in 0..40 {
        src.push_str("1+(");
    }
    src.push('1');
    for _ in 0..40 {
        src.push(')');
    }
    assert_eq!(eval(&src), 41.0);
}

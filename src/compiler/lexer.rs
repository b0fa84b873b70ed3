//! Tokenizer for the infix expression language.
//!
//! Names are case-insensitive; the lexer uppercases each identifier and
//! resolves it through a static keyword table, so the parser never sees raw
//! name strings. Multi-character operators are matched before their
//! single-character prefixes.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::error::CalcError;
use crate::instruction::Instruction;

use super::tokens::{Func, Token};

/// Keyword table mapping uppercased names to tokens. Built once on first use.
fn keywords() -> &'static FxHashMap<&'static str, Token> {
    static KEYWORDS: OnceLock<FxHashMap<&'static str, Token>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        let mut m = FxHashMap::default();
        m.insert("VAL", Token::Val);
        m.insert("RNDM", Token::Random);

        m.insert("PI", Token::Const(Instruction::ConstPi));
        m.insert("D2R", Token::Const(Instruction::ConstD2R));
        m.insert("R2D", Token::Const(Instruction::ConstR2D));
        m.insert("INF", Token::Literal(f64::INFINITY));
        m.insert("INFINITY", Token::Literal(f64::INFINITY));
        m.insert("NAN", Token::Literal(f64::NAN));

        // Keyword forms of the bitwise operators. The boolean operators have
        // no keyword spellings.
        m.insert("AND", Token::BitAnd);
        m.insert("OR", Token::BitOr);
        m.insert("XOR", Token::BitXor);
        m.insert("NOT", Token::BitNot);

        m.insert("ABS", Token::Function(Func::Abs));
        m.insert("EXP", Token::Function(Func::Exp));
        m.insert("LOG", Token::Function(Func::Log10));
        m.insert("LN", Token::Function(Func::LogE));
        m.insert("LOGE", Token::Function(Func::LogE));
        m.insert("SQR", Token::Function(Func::Sqrt));
        m.insert("SQRT", Token::Function(Func::Sqrt));
        m.insert("SIN", Token::Function(Func::Sin));
        m.insert("COS", Token::Function(Func::Cos));
        m.insert("TAN", Token::Function(Func::Tan));
        m.insert("ASIN", Token::Function(Func::Asin));
        m.insert("ACOS", Token::Function(Func::Acos));
        m.insert("ATAN", Token::Function(Func::Atan));
        m.insert("ATAN2", Token::Function(Func::Atan2));
        m.insert("SINH", Token::Function(Func::Sinh));
        m.insert("COSH", Token::Function(Func::Cosh));
        m.insert("TANH", Token::Function(Func::Tanh));
        m.insert("CEIL", Token::Function(Func::Ceil));
        m.insert("FLOOR", Token::Function(Func::Floor));
        m.insert("NINT", Token::Function(Func::Nint));
        m.insert("ISINF", Token::Function(Func::IsInf));
        m.insert("MIN", Token::Function(Func::Min));
        m.insert("MAX", Token::Function(Func::Max));
        m.insert("ISNAN", Token::Function(Func::IsNan));
        m.insert("FINITE", Token::Function(Func::Finite));
        m
    })
}

/// Tokenize `input`, which must be ASCII-clean in its meaningful characters.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let (tok, next) = lex_number(bytes, i, input)?;
                tokens.push(tok);
                i = next;
            }
            b'A'..=b'Z' | b'a'..=b'z' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let name = input[start..i].to_ascii_uppercase();
                let tok = lookup_name(&name)?;
                tokens.push(tok);
            }
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push(Token::Power);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            b'<' => {
                i += match bytes.get(i + 1) {
                    Some(&b'<') => {
                        tokens.push(Token::Shl);
                        2
                    }
                    Some(&b'=') => {
                        tokens.push(Token::Le);
                        2
                    }
                    _ => {
                        tokens.push(Token::Lt);
                        1
                    }
                };
            }
            b'>' => {
                i += match bytes.get(i + 1) {
                    Some(&b'>') => {
                        tokens.push(Token::Shr);
                        2
                    }
                    Some(&b'=') => {
                        tokens.push(Token::Ge);
                        2
                    }
                    _ => {
                        tokens.push(Token::Gt);
                        1
                    }
                };
            }
            b'=' => {
                // Both `=` and `==` spell equality.
                tokens.push(Token::Eq);
                i += if bytes.get(i + 1) == Some(&b'=') { 2 } else { 1 };
            }
            b'!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token::Ne);
                    i += 2;
                } else {
                    tokens.push(Token::RelNot);
                    i += 1;
                }
            }
            b'&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(Token::RelAnd);
                    i += 2;
                } else {
                    tokens.push(Token::BitAnd);
                    i += 1;
                }
            }
            b'|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(Token::RelOr);
                    i += 2;
                } else {
                    tokens.push(Token::BitOr);
                    i += 1;
                }
            }
            b':' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Token::Assign);
                    i += 2;
                } else {
                    tokens.push(Token::Colon);
                    i += 1;
                }
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            b'^' => {
                tokens.push(Token::Power);
                i += 1;
            }
            b'#' => {
                tokens.push(Token::Ne);
                i += 1;
            }
            b'~' => {
                tokens.push(Token::BitNot);
                i += 1;
            }
            b'?' => {
                tokens.push(Token::Question);
                i += 1;
            }
            b';' => {
                tokens.push(Token::Semicolon);
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return Err(CalcError::Syntax),
        }
    }

    Ok(tokens)
}

/// Resolve an uppercased identifier: single letters A..L are argument slots,
/// everything else must be in the keyword table.
fn lookup_name(name: &str) -> Result<Token, CalcError> {
    if name.len() == 1 {
        let b = name.as_bytes()[0];
        if (b'A'..=b'L').contains(&b) {
            return Ok(Token::Variable(b - b'A'));
        }
    }
    keywords().get(name).copied().ok_or(CalcError::Syntax)
}

/// Lex a numeric literal starting at `start`. Consumes digits and dots, then
/// an optional exponent (`e`/`E`, optional sign, at least one digit). Dots
/// are collected greedily so that `1.2.3` fails as one bad literal instead
/// of parsing as `1.2` followed by `.3`.
fn lex_number(bytes: &[u8], start: usize, input: &str) -> Result<(Token, usize), CalcError> {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            i = j + 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    let text = &input[start..i];
    let value: f64 = text.parse().map_err(|_| CalcError::BadLiteral)?;
    Ok((Token::Literal(value), i))
}

//! Pratt parser emitting postfix bytecode directly.
//!
//! There is no AST: each prefix or infix production emits its instructions as
//! soon as its operands are complete, so the output buffer is already in
//! evaluation order when parsing finishes. The parser simulates the runtime
//! stack depth on every emitted instruction, which catches expressions too
//! deep for the evaluator at compile time and makes runtime underflow and
//! overflow unreachable for compiler-produced programs.

use crate::error::CalcError;
use crate::instruction::Instruction;
use crate::CALC_STACK;

use super::tokens::Token;

/// Binding power of the conditional `?`.
const BP_COND: u8 = 2;
/// Binding power given to prefix operators' operands. Above every infix
/// operator, so `-2 ** 2` negates before raising.
const BP_UNARY: u8 = 25;

/// Infix binding powers: `(lbp, rbp)`. Every binary operator is
/// left-associative, including `**`, so `rbp = lbp + 1` throughout.
fn infix_binding(tok: Token) -> Option<(u8, u8)> {
    let lbp = match tok {
        Token::Question => BP_COND,
        Token::RelOr => 4,
        Token::RelAnd => 6,
        Token::BitOr => 8,
        Token::BitXor => 10,
        Token::BitAnd => 12,
        Token::Eq | Token::Ne | Token::Lt | Token::Le | Token::Gt | Token::Ge => 14,
        Token::Shl | Token::Shr => 16,
        Token::Plus | Token::Minus => 18,
        Token::Star | Token::Slash | Token::Percent => 20,
        Token::Power => 22,
        _ => return None,
    };
    Some((lbp, lbp + 1))
}

/// Instruction for a plain binary operator token. `None` for tokens with no
/// binary role; `infix_binding` admits only those and `Question`.
fn binary_instruction(tok: Token) -> Option<Instruction> {
    let instr = match tok {
        Token::Plus => Instruction::Add,
        Token::Minus => Instruction::Sub,
        Token::Star => Instruction::Mul,
        Token::Slash => Instruction::Div,
        Token::Percent => Instruction::Modulo,
        Token::Power => Instruction::Power,
        Token::RelOr => Instruction::RelOr,
        Token::RelAnd => Instruction::RelAnd,
        Token::BitOr => Instruction::BitOr,
        Token::BitXor => Instruction::BitXor,
        Token::BitAnd => Instruction::BitAnd,
        Token::Shl => Instruction::LeftShift,
        Token::Shr => Instruction::RightShift,
        Token::Eq => Instruction::Eq,
        Token::Ne => Instruction::Ne,
        Token::Lt => Instruction::Lt,
        Token::Le => Instruction::Le,
        Token::Gt => Instruction::Gt,
        Token::Ge => Instruction::Ge,
        _ => return None,
    };
    Some(instr)
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    code: Vec<Instruction>,
    depth: i32,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            code: Vec::new(),
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<Token> {
        self.tokens.get(self.pos + 1).copied()
    }

    fn next_token(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Emit one instruction, updating the simulated stack depth.
    fn emit(&mut self, instr: Instruction) -> Result<(), CalcError> {
        self.depth += instr.stack_effect();
        if self.depth > CALC_STACK as i32 {
            return Err(CalcError::Overflow);
        }
        if self.depth < 0 {
            return Err(CalcError::Underflow);
        }
        self.code.push(instr);
        Ok(())
    }

    /// Parse a whole program: semicolon-separated sub-expressions, exactly
    /// one of which must be a bare (non-assignment) expression.
    pub fn parse_program(mut self) -> Result<Vec<Instruction>, CalcError> {
        let mut bare = 0usize;
        loop {
            self.parse_subexpression(&mut bare)?;
            match self.peek() {
                None => break,
                // A trailing `;` falls through to the next iteration, where
                // the missing sub-expression reports Incomplete.
                Some(Token::Semicolon) => self.pos += 1,
                Some(Token::RParen) => return Err(CalcError::ParenNotOpen),
                Some(Token::Comma) => return Err(CalcError::BadSeparator),
                Some(Token::Colon) => return Err(CalcError::Conditional),
                Some(_) => return Err(CalcError::Syntax),
            }
        }
        match bare {
            1 => Ok(self.code),
            0 => Err(CalcError::BadAssignment),
            _ => Err(CalcError::TooMany),
        }
    }

    /// One `;`-delimited unit: either `X := expr` for a variable letter, or
    /// a bare expression whose value becomes the program result.
    fn parse_subexpression(&mut self, bare: &mut usize) -> Result<(), CalcError> {
        if let Some(Token::Variable(slot)) = self.peek() {
            if self.peek2() == Some(Token::Assign) {
                self.pos += 2;
                self.parse_expr(0)?;
                return self.emit(Instruction::Store(slot));
            }
        }
        self.parse_expr(0)?;
        *bare += 1;
        Ok(())
    }

    /// Standard Pratt loop: parse a prefix production, then fold in infix
    /// operators whose left binding power reaches `min_bp`.
    fn parse_expr(&mut self, min_bp: u8) -> Result<(), CalcError> {
        self.parse_prefix()?;
        while let Some(tok) = self.peek() {
            let Some((lbp, rbp)) = infix_binding(tok) else {
                break;
            };
            if lbp < min_bp {
                break;
            }
            self.pos += 1;
            if tok == Token::Question {
                self.parse_conditional()?;
            } else {
                self.parse_expr(rbp)?;
                let instr = binary_instruction(tok).ok_or(CalcError::Internal)?;
                self.emit(instr)?;
            }
        }
        Ok(())
    }

    /// `cond ? a : b`, with `?` already consumed and the condition already
    /// emitted. The else branch re-enters at `BP_COND` so chained
    /// conditionals nest to the right.
    fn parse_conditional(&mut self) -> Result<(), CalcError> {
        self.emit(Instruction::CondIf)?;
        self.parse_expr(0)?;
        match self.next_token() {
            Some(Token::Colon) => {}
            _ => return Err(CalcError::Conditional),
        }
        self.emit(Instruction::CondElse)?;
        self.parse_expr(BP_COND)?;
        self.emit(Instruction::CondEnd)
    }

    fn parse_prefix(&mut self) -> Result<(), CalcError> {
        match self.next_token() {
            Some(Token::Literal(v)) => self.emit(Instruction::Literal(v)),
            Some(Token::Variable(slot)) => self.emit(Instruction::Fetch(slot)),
            Some(Token::Val) => self.emit(Instruction::FetchVal),
            Some(Token::Const(instr)) => self.emit(instr),
            Some(Token::Random) => self.emit(Instruction::Random),
            Some(Token::Function(f)) => self.parse_call(f),
            Some(Token::LParen) => {
                self.parse_expr(0)?;
                match self.next_token() {
                    Some(Token::RParen) => Ok(()),
                    Some(Token::Comma) => Err(CalcError::BadSeparator),
                    Some(Token::Colon) => Err(CalcError::Conditional),
                    None => Err(CalcError::ParenOpen),
                    Some(_) => Err(CalcError::Syntax),
                }
            }
            // Unary plus is accepted as a no-op.
            Some(Token::Plus) => self.parse_expr(BP_UNARY),
            Some(Token::Minus) => {
                self.parse_expr(BP_UNARY)?;
                self.emit(Instruction::UnaryNeg)
            }
            Some(Token::RelNot) => {
                self.parse_expr(BP_UNARY)?;
                self.emit(Instruction::RelNot)
            }
            Some(Token::BitNot) => {
                self.parse_expr(BP_UNARY)?;
                self.emit(Instruction::BitNot)
            }
            Some(Token::Colon) => Err(CalcError::Conditional),
            Some(Token::Assign) => Err(CalcError::Syntax),
            // An operator, separator or closing paren where an operand was
            // expected, or the end of input.
            Some(_) | None => Err(CalcError::Incomplete),
        }
    }

    /// Parenthesized argument list of a built-in function.
    fn parse_call(&mut self, f: super::tokens::Func) -> Result<(), CalcError> {
        match self.next_token() {
            Some(Token::LParen) => {}
            _ => return Err(CalcError::Syntax),
        }
        let mut argc: u8 = 0;
        loop {
            // An immediate `)` or `,` lands in parse_prefix as Incomplete,
            // so argc is at least 1 on exit.
            self.parse_expr(0)?;
            argc = argc.saturating_add(1);
            match self.next_token() {
                Some(Token::RParen) => break,
                Some(Token::Comma) => {}
                Some(Token::Colon) => return Err(CalcError::Conditional),
                None => return Err(CalcError::ParenOpen),
                Some(_) => return Err(CalcError::Syntax),
            }
        }
        if let Some(n) = f.fixed_arity() {
            if argc != n {
                return Err(CalcError::Syntax);
            }
        }
        let instr = f.instruction(argc)?;
        self.emit(instr)
    }
}

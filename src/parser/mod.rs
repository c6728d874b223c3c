// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hand-written parser for variable formulas.
//!
//! Binary operators are handled by precedence climbing over a primary
//! parser; the grammar has no implicit multiplication, comparisons, or
//! boolean operators.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::builtins::{Loc, UntypedBuiltinFn};
use crate::common::EquationError;
use crate::eqn_err;
use crate::token::{Lexer, Spanned, Token};

#[cfg(test)]
mod tests;

/// Formulas are short strings typed by humans; the longest default formula
/// is under forty tokens.  Inputs past these limits would otherwise recurse
/// deep enough to overflow the stack -- in the parser for nested forms, and
/// in the evaluator (and drop glue) for the left-deep trees long operator
/// chains build.
const MAX_TOKENS: usize = 1024;
const MAX_DEPTH: usize = 64;

/// Operator precedence: `^` binds tightest and is the only right-associative
/// operator.  Right associativity falls out of not bumping the minimum
/// precedence when recursing into the right operand.
fn binary_op(token: &Token) -> Option<(BinaryOp, u8, bool)> {
    match token {
        Token::Exp => Some((BinaryOp::Exp, 4, true)),
        Token::Mul => Some((BinaryOp::Mul, 3, false)),
        Token::Div => Some((BinaryOp::Div, 3, false)),
        Token::Plus => Some((BinaryOp::Add, 2, false)),
        Token::Minus => Some((BinaryOp::Sub, 2, false)),
        _ => None,
    }
}

struct Parser<'input> {
    tokens: Vec<Spanned<Token<'input>>>,
    pos: usize,
    text_len: usize,
}

impl<'input> Parser<'input> {
    /// Collects all tokens up front, failing on the first lexer error.
    fn new(input: &'input str) -> Result<Self, EquationError> {
        let mut tokens = Vec::new();
        for result in Lexer::new(input) {
            match result {
                Ok(tok) => tokens.push(tok),
                Err(e) => return Err(e),
            }
        }
        if tokens.len() > MAX_TOKENS {
            let end = input.len().min(u16::MAX as usize);
            return eqn_err!(TooComplex, 0, end);
        }
        Ok(Parser {
            tokens,
            pos: 0,
            text_len: input.len(),
        })
    }

    fn peek(&self) -> Option<&Spanned<Token<'input>>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Spanned<Token<'input>>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    fn eof_position(&self) -> usize {
        if let Some((_, _, end)) = self.tokens.last() {
            *end
        } else {
            self.text_len
        }
    }

    fn parse_formula(&mut self) -> Result<Expr, EquationError> {
        let expr = self.parse_expr(0, 0)?;

        // a complete expression must consume every token
        if let Some((start, _, end)) = self.peek() {
            return eqn_err!(ExtraToken, *start, *end);
        }

        Ok(expr)
    }

    /// Precedence climbing: parse a primary, then greedily fold in binary
    /// operators at or above `min_precedence`.  `depth` counts recursive
    /// entries, so right-associative chains like `2^2^2^...` hit MAX_DEPTH
    /// even though the left-associative fold is a loop.
    fn parse_expr(&mut self, min_precedence: u8, depth: usize) -> Result<Expr, EquationError> {
        let mut left = self.parse_primary(depth)?;

        while let Some((_, tok, _)) = self.peek() {
            let Some((op, precedence, right_assoc)) = binary_op(tok) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance();

            // left-associative operators bump the threshold by one level,
            // forcing left-to-right grouping among equal-precedence ops
            let next_min = if right_assoc {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_expr(next_min, depth + 1)?;
            let loc = left.get_loc().union(&right.get_loc());
            left = Expr::Op2(op, Box::new(left), Box::new(right), loc);
        }

        Ok(left)
    }

    /// Primaries: number literal, function call, variable reference, unary
    /// minus, parenthesized expression.  Unary minus recurses into another
    /// primary, so it binds tighter than every binary operator: `-2^2`
    /// parses as `(-2)^2`.
    fn parse_primary(&mut self, depth: usize) -> Result<Expr, EquationError> {
        let Some(&(lpos, tok, rpos)) = self.peek() else {
            let pos = self.eof_position();
            return eqn_err!(UnrecognizedEof, pos, pos + 1);
        };

        if depth >= MAX_DEPTH {
            return eqn_err!(TooComplex, lpos, rpos);
        }

        match tok {
            Token::Num(s) => {
                self.advance();
                match s.parse::<f64>() {
                    Ok(n) => Ok(Expr::Const(s.to_string(), n, Loc::new(lpos, rpos))),
                    Err(_) => eqn_err!(ExpectedNumber, lpos, rpos, s),
                }
            }
            Token::Ident(s) => {
                self.advance();
                if let Some((_, Token::LParen, _)) = self.peek() {
                    self.advance(); // consume '('
                    let args = self.parse_call_args(depth + 1)?;
                    let (_, _, rpos) = self.expect_rparen()?;
                    Ok(Expr::App(
                        UntypedBuiltinFn(s.to_string(), args),
                        Loc::new(lpos, rpos),
                    ))
                } else {
                    Ok(Expr::Var(s.to_string(), Loc::new(lpos, rpos)))
                }
            }
            Token::Minus => {
                self.advance();
                let operand = self.parse_primary(depth + 1)?;
                let rpos = operand.get_loc().end as usize;
                Ok(Expr::Op1(
                    UnaryOp::Negative,
                    Box::new(operand),
                    Loc::new(lpos, rpos),
                ))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr(0, depth + 1)?;
                self.expect_rparen()?;
                Ok(expr)
            }
            _ => eqn_err!(UnrecognizedToken, lpos, rpos),
        }
    }

    /// Comma-separated argument expressions; the empty list is allowed when
    /// `)` immediately follows `(`.  Does not consume the closing paren.
    fn parse_call_args(&mut self, depth: usize) -> Result<Vec<Expr>, EquationError> {
        let mut args = Vec::new();

        if let Some((_, Token::RParen, _)) = self.peek() {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr(0, depth)?);

            match self.peek() {
                Some((_, Token::Comma, _)) => {
                    self.advance();
                }
                Some((_, Token::RParen, _)) => break,
                Some(&(start, _, end)) => return eqn_err!(MalformedArgs, start, end),
                None => break, // expect_rparen reports the missing paren
            }
        }

        Ok(args)
    }

    fn expect_rparen(&mut self) -> Result<Spanned<Token<'input>>, EquationError> {
        match self.peek() {
            Some(&(start, Token::RParen, end)) => {
                self.advance();
                Ok((start, Token::RParen, end))
            }
            Some(&(start, _, end)) => eqn_err!(UnclosedParen, start, end),
            None => {
                let pos = self.eof_position();
                eqn_err!(UnclosedParen, pos, pos + 1)
            }
        }
    }
}

/// Parse a formula string into an AST.  Empty input is an error: every
/// computed variable must have a formula.  Inputs past MAX_TOKENS or nested
/// past MAX_DEPTH fail with `TooComplex` instead of exhausting the stack,
/// which also bounds the depth of every tree handed to the evaluator.
pub fn parse(input: &str) -> Result<Expr, EquationError> {
    let mut parser = Parser::new(input)?;
    parser.parse_formula()
}

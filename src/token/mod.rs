// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::str::CharIndices;

use unicode_xid::UnicodeXID;

use self::Token::*;
use crate::common::{EquationError, ErrorCode};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'input> {
    Plus,
    Minus,
    Mul,
    Div,
    Exp,
    LParen,
    RParen,
    Comma,
    Ident(&'input str),
    Num(&'input str),
}

pub type Spanned<T> = (usize, T, usize);

/// Lexer splits a formula into a stream of spanned tokens.  Whitespace is
/// discarded; any character outside the grammar is an error, not a skip.
pub struct Lexer<'input> {
    text: &'input str,
    chars: CharIndices<'input>,
    lookahead: Option<(usize, char)>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        let mut t = Lexer {
            text: input,
            chars: input.char_indices(),
            lookahead: None,
        };
        t.bump();
        t
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.lookahead = self.chars.next();
        self.lookahead
    }

    fn take_while<F>(&mut self, mut keep_going: F) -> Option<usize>
    where
        F: FnMut(char) -> bool,
    {
        loop {
            match self.lookahead {
                None => {
                    return None;
                }
                Some((idx1, c)) => {
                    if !keep_going(c) {
                        return Some(idx1);
                    } else {
                        self.bump();
                    }
                }
            }
        }
    }

    fn identifier(&mut self, idx0: usize) -> Spanned<Token<'input>> {
        match self.take_while(is_identifier_continue) {
            Some(end) => (idx0, Ident(&self.text[idx0..end]), end),
            None => (idx0, Ident(&self.text[idx0..]), self.text.len()),
        }
    }

    /// Numbers are lexed as raw decimal text: digits and dots only, no
    /// exponent notation, no sign (unary minus is handled by the parser).
    fn number(&mut self, idx0: usize) -> Spanned<Token<'input>> {
        match self.take_while(is_number_continue) {
            Some(end) => (idx0, Num(&self.text[idx0..end]), end),
            None => (idx0, Num(&self.text[idx0..]), self.text.len()),
        }
    }

    #[allow(clippy::unnecessary_wraps)]
    fn consume(
        &mut self,
        i: usize,
        tok: Token<'input>,
    ) -> Option<Result<Spanned<Token<'input>>, EquationError>> {
        self.bump();
        Some(Ok((i, tok, i + 1)))
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Result<Spanned<Token<'input>>, EquationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.lookahead {
                Some((i, '+')) => self.consume(i, Plus),
                Some((i, '-')) => self.consume(i, Minus),
                Some((i, '*')) => self.consume(i, Mul),
                Some((i, '/')) => self.consume(i, Div),
                Some((i, '^')) => self.consume(i, Exp),
                Some((i, '(')) => self.consume(i, LParen),
                Some((i, ')')) => self.consume(i, RParen),
                Some((i, ',')) => self.consume(i, Comma),
                Some((i, c)) if is_number_start(c) => Some(Ok(self.number(i))),
                Some((i, c)) if is_identifier_start(c) => Some(Ok(self.identifier(i))),
                Some((_, c)) if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                Some((i, c)) => {
                    self.bump(); // eat whatever is killing us
                    Some(Err(EquationError::with_details(
                        ErrorCode::InvalidCharacter,
                        i,
                        i + c.len_utf8(),
                        c.to_string(),
                    )))
                }
                None => None,
            };
        }
    }
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_number_continue(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_identifier_start(c: char) -> bool {
    UnicodeXID::is_xid_start(c) || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    UnicodeXID::is_xid_continue(c) || c == '_'
}

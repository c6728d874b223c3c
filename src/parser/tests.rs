// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::*;
use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::builtins::{Loc, UntypedBuiltinFn};
use crate::common::ErrorCode;
use proptest::prelude::*;

fn num(s: &str) -> Expr {
    Expr::Const(s.to_string(), s.parse().unwrap(), Loc::default())
}

fn var(s: &str) -> Expr {
    Expr::Var(s.to_string(), Loc::default())
}

fn op2(op: BinaryOp, l: Expr, r: Expr) -> Expr {
    Expr::Op2(op, Box::new(l), Box::new(r), Loc::default())
}

fn neg(e: Expr) -> Expr {
    Expr::Op1(UnaryOp::Negative, Box::new(e), Loc::default())
}

fn app(name: &str, args: Vec<Expr>) -> Expr {
    Expr::App(UntypedBuiltinFn(name.to_string(), args), Loc::default())
}

fn parse_stripped(input: &str) -> Expr {
    parse(input).unwrap().strip_loc()
}

#[test]
fn constants_and_variables() {
    assert_eq!(num("42"), parse_stripped("42"));
    assert_eq!(num("0.5"), parse_stripped("0.5"));
    assert_eq!(var("laborSupply"), parse_stripped("laborSupply"));
}

#[test]
fn additive_is_left_associative() {
    assert_eq!(
        op2(
            BinaryOp::Sub,
            op2(BinaryOp::Sub, num("1"), num("2")),
            num("3")
        ),
        parse_stripped("1 - 2 - 3"),
    );
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        op2(
            BinaryOp::Add,
            num("1"),
            op2(BinaryOp::Mul, num("3"), num("2"))
        ),
        parse_stripped("1 + 3 * 2"),
    );
}

#[test]
fn exponentiation_is_right_associative() {
    assert_eq!(
        op2(
            BinaryOp::Exp,
            num("2"),
            op2(BinaryOp::Exp, num("3"), num("2"))
        ),
        parse_stripped("2^3^2"),
    );
}

#[test]
fn unary_minus_binds_tighter_than_exponentiation() {
    // `-2^2` is `(-2)^2` under this grammar, unlike conventional notation
    assert_eq!(
        op2(BinaryOp::Exp, neg(num("2")), num("2")),
        parse_stripped("-2^2"),
    );
}

#[test]
fn unary_minus_in_right_operand() {
    assert_eq!(
        op2(BinaryOp::Exp, num("2"), neg(num("3"))),
        parse_stripped("2^-3"),
    );
    assert_eq!(neg(neg(num("1"))), parse_stripped("--1"));
}

#[test]
fn parens_override_precedence() {
    assert_eq!(
        op2(
            BinaryOp::Mul,
            op2(BinaryOp::Add, num("1"), num("3")),
            num("2")
        ),
        parse_stripped("(1 + 3) * 2"),
    );
}

#[test]
fn function_calls() {
    assert_eq!(
        op2(
            BinaryOp::Mul,
            app(
                "max",
                vec![num("2"), op2(BinaryOp::Add, num("1"), num("3"))]
            ),
            num("2")
        ),
        parse_stripped("max(2, 1 + 3) * 2"),
    );

    // empty argument lists are allowed by the grammar
    assert_eq!(app("pi", vec![]), parse_stripped("pi()"));

    // nested calls
    assert_eq!(
        app("abs", vec![app("min", vec![var("a"), var("b")])]),
        parse_stripped("abs(min(a, b))"),
    );
}

#[test]
fn error_unexpected_eof() {
    assert_eq!(ErrorCode::UnrecognizedEof, parse("").unwrap_err().code);
    assert_eq!(ErrorCode::UnrecognizedEof, parse("1 +").unwrap_err().code);
}

#[test]
fn error_extra_token() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(ErrorCode::ExtraToken, err.code);
    assert_eq!((2, 3), (err.start as usize, err.end as usize));
}

#[test]
fn error_unclosed_paren() {
    assert_eq!(ErrorCode::UnclosedParen, parse("(1 + 2").unwrap_err().code);
    assert_eq!(ErrorCode::UnclosedParen, parse("(1 2)").unwrap_err().code);
    assert_eq!(ErrorCode::UnclosedParen, parse("max(1, 2").unwrap_err().code);
}

#[test]
fn error_malformed_args() {
    assert_eq!(ErrorCode::MalformedArgs, parse("max(1 2)").unwrap_err().code);
    // trailing comma needs another argument expression
    assert_eq!(
        ErrorCode::UnrecognizedToken,
        parse("max(1, 2,)").unwrap_err().code
    );
}

#[test]
fn error_unrecognized_token() {
    assert_eq!(ErrorCode::UnrecognizedToken, parse("* 2").unwrap_err().code);
    assert_eq!(ErrorCode::UnrecognizedToken, parse("1 + ,").unwrap_err().code);
}

#[test]
fn error_bad_number_literal() {
    let err = parse("1.2.3").unwrap_err();
    assert_eq!(ErrorCode::ExpectedNumber, err.code);
    assert_eq!(Some("1.2.3".to_string()), err.details);
}

#[test]
fn error_deep_nesting() {
    // past MAX_DEPTH but under the token cap
    let input = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(ErrorCode::TooComplex, parse(&input).unwrap_err().code);

    // far past both limits
    let input = format!("{}1{}", "(".repeat(4000), ")".repeat(4000));
    assert_eq!(ErrorCode::TooComplex, parse(&input).unwrap_err().code);

    // right-associative chains recurse in parse_expr, not parse_primary
    let input = format!("2{}", "^2".repeat(400));
    assert_eq!(ErrorCode::TooComplex, parse(&input).unwrap_err().code);

    let input = format!("{}1", "-".repeat(400));
    assert_eq!(ErrorCode::TooComplex, parse(&input).unwrap_err().code);
}

#[test]
fn error_oversized_formula() {
    // parses without parser recursion, but the left-deep tree it would
    // build is too deep to evaluate or drop
    let input = format!("1{}", " + 1".repeat(20000));
    assert_eq!(ErrorCode::TooComplex, parse(&input).unwrap_err().code);
}

#[test]
fn generous_but_sane_formulas_parse() {
    let input = format!("{}1{}", "(".repeat(32), ")".repeat(32));
    assert!(parse(&input).is_ok());

    let input = format!("1{}", " + 1".repeat(100));
    assert!(parse(&input).is_ok());
}

#[test]
fn error_invalid_character() {
    let err = parse("a ? b").unwrap_err();
    assert_eq!(ErrorCode::InvalidCharacter, err.code);
    assert_eq!(Some("?".to_string()), err.details);
}

#[test]
fn locs_span_the_expression() {
    let expr = parse("1 + 3 * 2").unwrap();
    assert_eq!(Loc::new(0, 9), expr.get_loc());

    let expr = parse("max(2, 1)").unwrap();
    assert_eq!(Loc::new(0, 9), expr.get_loc());
}

proptest! {
    // bad input must come back as Err, never as a panic
    #[test]
    fn parse_never_panics(input in ".{0,64}") {
        let _ = parse(&input);
    }

    #[test]
    fn parse_arithmetic_roundtrips(a in 0u32..1000, b in 0u32..1000) {
        let input = format!("{a} + {b}");
        prop_assert!(parse(&input).is_ok());
    }

    // nesting on either side of MAX_DEPTH is an Ok or an Err, never an abort
    #[test]
    fn nested_parens_never_panic(depth in 0usize..256) {
        let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let _ = parse(&input);
    }
}

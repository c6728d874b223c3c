// Copyright 2026 The Sectorsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::builtins::UntypedBuiltinFn;
use crate::common::{EquationError, EquationResult};
use crate::eqn_err;
use crate::parser::parse;

/// Evaluator walks a formula AST against a variable context.  Arithmetic is
/// plain IEEE-754: division by zero and log of a negative number produce
/// inf/NaN and propagate silently -- only structural problems (a variable
/// absent from the context, a call to an unknown function) are errors.
pub struct Evaluator<'a> {
    context: &'a HashMap<String, f64>,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a HashMap<String, f64>) -> Self {
        Evaluator { context }
    }

    pub fn eval(&self, expr: &Expr) -> EquationResult<f64> {
        match expr {
            Expr::Const(_, n, _) => Ok(*n),
            Expr::Var(name, loc) => match self.context.get(name) {
                Some(value) => Ok(*value),
                // absence is distinguished from a present zero
                None => eqn_err!(
                    MissingVariable,
                    loc.start as usize,
                    loc.end as usize,
                    name.as_str()
                ),
            },
            Expr::Op1(UnaryOp::Negative, operand, _) => Ok(-self.eval(operand)?),
            Expr::Op2(op, l, r, _) => {
                let l = self.eval(l)?;
                let r = self.eval(r)?;
                Ok(match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Exp => l.powf(r),
                })
            }
            Expr::App(UntypedBuiltinFn(name, args), loc) => {
                let start = loc.start as usize;
                let end = loc.end as usize;
                // the validator already excludes unknown functions, but the
                // evaluator re-checks independently
                match name.as_str() {
                    "min" => {
                        let args = self.eval_args(args)?;
                        match args.split_first() {
                            // f64 is only PartialOrd, fold by hand
                            Some((first, rest)) => Ok(rest
                                .iter()
                                .fold(*first, |acc, v| if *v < acc { *v } else { acc })),
                            None => eqn_err!(BadBuiltinArgs, start, end, name.as_str()),
                        }
                    }
                    "max" => {
                        let args = self.eval_args(args)?;
                        match args.split_first() {
                            Some((first, rest)) => Ok(rest
                                .iter()
                                .fold(*first, |acc, v| if *v > acc { *v } else { acc })),
                            None => eqn_err!(BadBuiltinArgs, start, end, name.as_str()),
                        }
                    }
                    // natural log of the first argument; extra arguments are
                    // evaluated and ignored
                    "log" => Ok(self.first_arg(args, name, start, end)?.ln()),
                    "exp" => Ok(self.first_arg(args, name, start, end)?.exp()),
                    "abs" => Ok(self.first_arg(args, name, start, end)?.abs()),
                    _ => eqn_err!(UnknownBuiltin, start, end, name.as_str()),
                }
            }
        }
    }

    fn eval_args(&self, args: &[Expr]) -> EquationResult<Vec<f64>> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    fn first_arg(
        &self,
        args: &[Expr],
        name: &str,
        start: usize,
        end: usize,
    ) -> EquationResult<f64> {
        let values = self.eval_args(args)?;
        match values.first() {
            Some(v) => Ok(*v),
            None => eqn_err!(BadBuiltinArgs, start, end, name),
        }
    }
}

pub fn eval(expr: &Expr, context: &HashMap<String, f64>) -> EquationResult<f64> {
    Evaluator::new(context).eval(expr)
}

/// safe_eval parses and evaluates a formula, converting every failure into
/// a result value.  Nothing propagates to the caller as a panic: a bad
/// formula yields an error the simulation engine turns into a log line.
pub fn safe_eval(input: &str, context: &HashMap<String, f64>) -> Result<f64, EquationError> {
    let ast = parse(input)?;
    eval(&ast, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use proptest::prelude::*;

    fn ctx(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn eval_str(input: &str) -> f64 {
        safe_eval(input, &HashMap::new()).unwrap()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(7.0, eval_str("1 + 3 * 2"));
        assert_eq!(512.0, eval_str("2^3^2"));
        assert_eq!(4.0, eval_str("-2^2"));
        assert_eq!(0.125, eval_str("2^-3"));
        assert_eq!(8.0, eval_str("max(2, 1 + 3) * 2"));
        assert_eq!(1.0, eval_str("min(1, 2, 3)"));
        assert_eq!(3.0, eval_str("abs(-3)"));
        assert_eq!(1.0, eval_str("exp(0)"));
        assert_eq!(0.0, eval_str("log(1)"));
    }

    #[test]
    fn variables_resolve_from_context() {
        let context = ctx(&[("laborSupply", 100.0), ("sectorShareA", 0.6)]);
        assert_eq!(
            60.0,
            safe_eval("laborSupply * sectorShareA", &context).unwrap()
        );
    }

    #[test]
    fn ieee_semantics_are_not_errors() {
        assert!(eval_str("1 / 0").is_infinite());
        assert!(eval_str("0 / 0").is_nan());
        assert!(eval_str("log(-1)").is_nan());
        assert!(eval_str("log(0)").is_infinite());
    }

    #[test]
    fn missing_variable_is_an_error() {
        let context = ctx(&[("present", 0.0)]);
        // a present zero is fine...
        assert_eq!(0.0, safe_eval("present", &context).unwrap());
        // ...but absence is an error
        let err = safe_eval("absent", &context).unwrap_err();
        assert_eq!(ErrorCode::MissingVariable, err.code);
        assert_eq!("Missing variable: absent", err.message());
    }

    #[test]
    fn unknown_function_is_rechecked() {
        let err = safe_eval("sqrt(4)", &HashMap::new()).unwrap_err();
        assert_eq!(ErrorCode::UnknownBuiltin, err.code);
        assert_eq!("Unknown function: sqrt", err.message());
    }

    #[test]
    fn zero_arity_calls_are_errors() {
        for input in ["min()", "max()", "log()", "exp()", "abs()"] {
            let err = safe_eval(input, &HashMap::new()).unwrap_err();
            assert_eq!(ErrorCode::BadBuiltinArgs, err.code, "for {input}");
        }
    }

    #[test]
    fn extra_args_are_evaluated_then_ignored() {
        assert_eq!(2.0, eval_str("abs(-2, 17)"));
        // an error in an ignored argument still propagates
        let err = safe_eval("abs(2, nope)", &HashMap::new()).unwrap_err();
        assert_eq!(ErrorCode::MissingVariable, err.code);
    }

    #[test]
    fn oversized_formulas_error_instead_of_aborting() {
        let input = format!("1{}", " + 1".repeat(20000));
        let err = safe_eval(&input, &HashMap::new()).unwrap_err();
        assert_eq!(ErrorCode::TooComplex, err.code);
        assert_eq!("Formula too complex", err.message());

        let input = format!("{}1{}", "(".repeat(4000), ")".repeat(4000));
        let err = safe_eval(&input, &HashMap::new()).unwrap_err();
        assert_eq!(ErrorCode::TooComplex, err.code);
    }

    #[test]
    fn longest_allowed_chain_evaluates() {
        // just under the token cap; the deepest tree eval will ever see
        let input = format!("1{}", " + 1".repeat(511));
        assert_eq!(512.0, safe_eval(&input, &HashMap::new()).unwrap());
    }

    #[test]
    fn parse_errors_become_values() {
        let err = safe_eval("1 +* 2", &HashMap::new()).unwrap_err();
        assert_eq!(ErrorCode::UnrecognizedToken, err.code);
    }

    proptest! {
        // anything the parser accepts either evaluates to a float (finite
        // or IEEE-special) or fails with a structured error -- never a panic
        #[test]
        fn eval_never_panics(input in ".{0,64}") {
            let _ = safe_eval(&input, &HashMap::new());
        }

        #[test]
        fn binary_ops_match_ieee(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            let context = ctx(&[("a", a), ("b", b)]);
            prop_assert_eq!(a + b, safe_eval("a + b", &context).unwrap());
            prop_assert_eq!(a - b, safe_eval("a - b", &context).unwrap());
            prop_assert_eq!(a * b, safe_eval("a * b", &context).unwrap());
        }
    }
}
